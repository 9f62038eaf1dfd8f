use std::path::PathBuf;

use clap::Parser;

use crate::registry::drupal::CacheMode;

#[derive(Parser, Debug)]
#[command(
    name = "advisory-conflicts",
    about = "Build composer conflict metapackages from published security advisories",
    version
)]
pub struct Cli {
    /// Directory the per-version target directories are written under
    #[arg(default_value = ".")]
    pub output: PathBuf,

    /// Config file [default: <OUTPUT>/.advisory-conflicts/config.toml, fallback ~/.config/advisory-conflicts/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Response cache directory [default: user cache dir, fallback <OUTPUT>/cache]
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Do not read or write the response cache
    #[arg(long, conflicts_with = "refresh")]
    pub no_cache: bool,

    /// Ignore cached responses but store fresh ones
    #[arg(long)]
    pub refresh: bool,

    /// Show progress and a run summary, and log skipped releases and requests
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// A successful run writes files and nothing else unless `--verbose`.
    pub fn silent(&self) -> bool {
        !self.verbose
    }

    pub fn cache_mode(&self) -> CacheMode {
        if self.no_cache {
            CacheMode::Off
        } else if self.refresh {
            CacheMode::Refresh
        } else {
            CacheMode::ReadWrite
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|d| d.join("advisory-conflicts"))
                .unwrap_or_else(|| self.output.join("cache"))
        })
    }
}
