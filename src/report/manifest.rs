use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::{Config, PackageConfig};
use crate::conflict::ConflictMap;
use crate::models::Manifest;

/// A manifest that was written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenManifest {
    pub major: u32,
    pub path: PathBuf,
    pub packages: usize,
    pub constraints: usize,
}

pub fn build_manifest(package: &PackageConfig, conflict: &BTreeMap<String, String>) -> Manifest {
    Manifest {
        name: package.name.clone(),
        description: package.description.clone(),
        kind: "metapackage".to_string(),
        license: package.license.clone(),
        conflict: conflict.clone(),
    }
}

/// Pretty JSON with 4-space indentation and a trailing newline.
///
/// Slashes and non-ASCII characters are written as-is.
pub fn to_json(manifest: &Manifest) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    manifest.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

/// Write `<root>/<target dir>/composer.json` for every configured major
/// that has conflicts. Majors without a target are not written.
pub fn write_manifests(
    root: &Path,
    config: &Config,
    conflicts: &ConflictMap,
) -> Result<Vec<WrittenManifest>> {
    let mut written = Vec::new();

    for major in conflicts.majors() {
        let Some(dir) = config.target_dir(major) else {
            tracing::debug!(major, "no target configured, not emitting");
            continue;
        };
        let Some(conflict) = conflicts.for_major(major) else {
            continue;
        };

        let manifest = build_manifest(&config.package, conflict);
        let json = to_json(&manifest)?;

        let target = root.join(dir);
        std::fs::create_dir_all(&target)
            .with_context(|| format!("creating {}", target.display()))?;
        let path = target.join("composer.json");
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

        written.push(WrittenManifest {
            major,
            path,
            packages: conflict.len(),
            constraints: conflict.values().map(|c| c.split(',').count()).sum(),
        });
    }

    Ok(written)
}
