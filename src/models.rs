use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One page of the release feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPage {
    pub list: Vec<AdvisoryRecord>,
    /// Continuation link; absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

/// A single security release announcement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdvisoryRecord {
    #[serde(rename = "field_release_project")]
    pub project: ProjectRef,
    #[serde(rename = "field_release_version")]
    pub version: String,
}

impl AdvisoryRecord {
    /// Major platform version inferred from the first character of the version string.
    ///
    /// Anything that does not start with a decimal digit maps to `0`, which
    /// places it below every supported major.
    pub fn major(&self) -> u32 {
        self.version
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectRef {
    #[serde(deserialize_with = "numeric_id")]
    pub id: u64,
}

/// Response of a project lookup by node id.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectPage {
    pub list: Vec<ProjectNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectNode {
    #[serde(deserialize_with = "numeric_id")]
    pub nid: u64,
    #[serde(rename = "field_project_machine_name")]
    pub machine_name: String,
}

/// Resolved project metadata, memoized per project id for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub id: u64,
    pub machine_name: String,
    pub is_core: bool,
}

/// The emitted `composer.json` document.
///
/// Field order here is the key order in the written file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub license: String,
    pub conflict: BTreeMap<String, String>,
}

/// The API serves ids as strings; accept numbers too.
fn numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid numeric id: {:?}", s))),
    }
}
