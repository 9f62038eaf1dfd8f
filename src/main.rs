//! `advisory-conflicts` — turn published security releases into composer conflict metapackages.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Page through the security release feed ([`pipeline::collect_releases`]).
//! 4. Resolve each release's project, normalize its version and aggregate
//!    `<version` constraints per package ([`pipeline::build_conflicts`], [`conflict`]).
//! 5. Write one `composer.json` per configured major version ([`report::manifest`]).
//! 6. With `--verbose`, print a summary to stderr ([`report::terminal`]).
//!
//! A successful run is otherwise silent.
//!
//! Any failure other than a skipped release aborts before anything is written.

mod cli;
mod config;
mod conflict;
mod models;
mod pipeline;
mod registry;
mod report;
mod version;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::load_config;
use registry::cache::ResponseCache;
use registry::drupal::DrupalClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.output.clone();
    let config = load_config(&root, cli.config.as_deref())?;

    let cache = ResponseCache::new(cli.cache_dir());
    tracing::debug!(dir = %cache.dir().display(), mode = ?cli.cache_mode(), "response cache");
    let api = DrupalClient::new(config.clone(), cache, cli.cache_mode())?;

    if !cli.silent() {
        eprintln!("  {} {}", "→".cyan(), config.feed_url());
    }

    let fetch_progress = spinner(cli.silent())?;
    let process_progress = bar(cli.silent())?;
    let outcome = pipeline::run(&api, &config, &fetch_progress, &process_progress).await?;

    if outcome.conflicts.is_empty() {
        tracing::warn!("feed produced no constraints");
    }

    let written = report::manifest::write_manifests(&root, &config, &outcome.conflicts)?;

    if !cli.silent() {
        report::terminal::render(&written, &outcome.stats, &root);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn spinner(hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Ok(pb)
}

fn bar(hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
