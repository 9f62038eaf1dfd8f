//! Accumulation of per-package conflict constraints, grouped by major version.

use std::collections::{BTreeMap, BTreeSet};

use crate::version::natural::natural_cmp;
use crate::version::normalize::NormalizedVersion;

/// Finalized constraints: major version → package → comma-joined range.
///
/// Both levels are key-sorted, which fixes the key order of the emitted file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictMap(BTreeMap<u32, BTreeMap<String, String>>);

impl ConflictMap {
    pub fn for_major(&self, major: u32) -> Option<&BTreeMap<String, String>> {
        self.0.get(&major)
    }

    pub fn majors(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collects `<version` constraints for one run.
///
/// Only grows: there is no way to remove a constraint once ingested.
#[derive(Debug)]
pub struct ConstraintAggregator {
    root_package: String,
    alias_package: String,
    constraints: BTreeMap<u32, BTreeMap<String, BTreeSet<String>>>,
}

impl ConstraintAggregator {
    /// `root_package` is the platform distribution; `alias_package` is its
    /// subtree split, which never has advisories of its own but must be
    /// constrained identically.
    pub fn new(root_package: impl Into<String>, alias_package: impl Into<String>) -> Self {
        Self {
            root_package: root_package.into(),
            alias_package: alias_package.into(),
            constraints: BTreeMap::new(),
        }
    }

    pub fn ingest(&mut self, major: u32, package: &str, version: &NormalizedVersion) {
        self.constraints
            .entry(major)
            .or_default()
            .entry(package.to_string())
            .or_default()
            .insert(format!("<{}", version.as_str()));
    }

    pub fn finalize(self) -> ConflictMap {
        let mut out = BTreeMap::new();

        for (major, packages) in self.constraints {
            let mut joined: BTreeMap<String, String> = packages
                .into_iter()
                .map(|(package, set)| {
                    let mut list: Vec<String> = set.into_iter().collect();
                    list.sort_by(|a, b| natural_cmp(a, b));
                    (package, list.join(","))
                })
                .collect();

            if !joined.contains_key(&self.alias_package) {
                if let Some(root) = joined.get(&self.root_package).cloned() {
                    joined.insert(self.alias_package.clone(), root);
                }
            }

            out.insert(major, joined);
        }

        ConflictMap(out)
    }
}
