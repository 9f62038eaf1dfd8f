use std::path::Path;

use anyhow::{bail, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.advisory-conflicts/config.toml`.
///
/// Every section is optional; omitted fields take the built-in defaults.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where releases and projects are fetched from.
    pub feed: FeedConfig,
    /// Metadata of the generated metapackage and package naming.
    pub package: PackageConfig,
    /// Which major versions get a manifest, and where.
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    /// Base of the REST API, without a trailing slash (e.g. `https://www.drupal.org/api-d7`).
    pub api_base: String,
    /// Query selecting security releases.
    pub release_query: String,
    /// Per-request timeout in seconds; unset leaves the client default (none).
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PackageConfig {
    pub name: String,
    pub description: String,
    pub license: String,
    /// Composer vendor prefix for every conflicting package.
    pub namespace: String,
    /// Machine name that identifies the platform core project.
    pub core_machine_name: String,
    /// Machine name of the core subtree split that mirrors the root package.
    pub core_alias: String,
    /// Releases for majors below this are ignored.
    pub min_major: u32,
}

/// A major version and the directory its manifest is written to.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Target {
    pub major: u32,
    pub dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            feed: FeedConfig::default(),
            package: PackageConfig::default(),
            targets: vec![
                Target {
                    major: 7,
                    dir: "build-7.x".to_string(),
                },
                Target {
                    major: 8,
                    dir: "build-8.x".to_string(),
                },
            ],
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            api_base: "https://www.drupal.org/api-d7".to_string(),
            release_query:
                "type=project_release&taxonomy_vocabulary_7=100&field_release_build_type=static"
                    .to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            name: "drupal-composer/drupal-security-advisories".to_string(),
            description:
                "Prevents installation of composer packages with known security vulnerabilities"
                    .to_string(),
            license: "GPL-2.0-or-later".to_string(),
            namespace: "drupal".to_string(),
            core_machine_name: "drupal".to_string(),
            core_alias: "core".to_string(),
            min_major: 7,
        }
    }
}

impl Config {
    /// First page of the security release feed.
    pub fn feed_url(&self) -> String {
        format!(
            "{}/node.json?{}",
            self.feed.api_base.trim_end_matches('/'),
            self.feed.release_query
        )
    }

    /// Lookup URL for a project node.
    pub fn project_url(&self, id: u64) -> String {
        format!(
            "{}/node.json?nid={}",
            self.feed.api_base.trim_end_matches('/'),
            id
        )
    }

    /// Composer package name for a project machine name.
    pub fn package_name(&self, machine_name: &str) -> String {
        format!("{}/{}", self.package.namespace, machine_name)
    }

    pub fn root_package(&self) -> String {
        self.package_name(&self.package.core_machine_name)
    }

    pub fn alias_package(&self) -> String {
        self.package_name(&self.package.core_alias)
    }

    pub fn is_core(&self, machine_name: &str) -> bool {
        machine_name == self.package.core_machine_name
    }

    pub fn target_dir(&self, major: u32) -> Option<&str> {
        self.targets
            .iter()
            .find(|t| t.major == major)
            .map(|t| t.dir.as_str())
    }

    fn validate(self) -> Result<Self> {
        let mut seen = Vec::new();
        for target in &self.targets {
            if seen.contains(&target.major) {
                bail!("duplicate target for major version {}", target.major);
            }
            if target.dir.trim().is_empty() {
                bail!("target for major version {} has an empty dir", target.major);
            }
            seen.push(target.major);
        }
        if self.package.namespace.is_empty() {
            bail!("package.namespace must not be empty");
        }
        Ok(self)
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<output_root>/.advisory-conflicts/config.toml`
/// 3. `~/.config/advisory-conflicts/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(output_root: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = output_root.join(".advisory-conflicts").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("advisory-conflicts")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}
