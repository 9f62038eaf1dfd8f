//! Feed pagination and per-release processing.

use std::collections::HashMap;

use anyhow::Result;
use indicatif::ProgressBar;

use crate::config::Config;
use crate::conflict::{ConflictMap, ConstraintAggregator};
use crate::models::{AdvisoryRecord, ProjectInfo};
use crate::registry::{json_endpoint, FetchError, ReleaseApi};
use crate::version::normalize::normalize;

/// Counters reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub pages: usize,
    pub releases: usize,
    pub legacy: usize,
    pub lookup_failed: usize,
    pub invalid: usize,
    pub ingested: usize,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub conflicts: ConflictMap,
    pub stats: RunStats,
}

/// Follow the feed from `start_url` until a page has no continuation link.
pub async fn collect_releases<A>(
    api: &A,
    start_url: &str,
    progress: &ProgressBar,
) -> Result<(Vec<AdvisoryRecord>, usize)>
where
    A: ReleaseApi,
{
    let mut releases = Vec::new();
    let mut pages = 0;
    let mut next = Some(start_url.to_string());

    while let Some(url) = next {
        let page = api.fetch_page(&url).await?;
        pages += 1;
        releases.extend(page.list);
        progress.set_message(format!("{} pages, {} releases", pages, releases.len()));
        progress.tick();

        next = page.next.as_deref().map(json_endpoint).transpose()?;
    }

    Ok((releases, pages))
}

/// Project lookups memoized by project id for the duration of one run.
struct ProjectResolver<'a, A: ?Sized> {
    api: &'a A,
    known: HashMap<u64, ProjectInfo>,
}

impl<'a, A> ProjectResolver<'a, A>
where
    A: ReleaseApi + ?Sized,
{
    fn new(api: &'a A) -> Self {
        Self {
            api,
            known: HashMap::new(),
        }
    }

    /// Failures are not remembered; the next release of the project retries.
    async fn resolve(&mut self, id: u64) -> Result<&ProjectInfo, FetchError> {
        if !self.known.contains_key(&id) {
            let project = self.api.fetch_project(id).await?;
            tracing::debug!(id = project.id, machine_name = %project.machine_name, core = project.is_core, "resolved project");
            self.known.insert(id, project);
        }
        Ok(&self.known[&id])
    }
}

/// Turn releases into finalized conflict constraints.
///
/// Legacy releases, failed project lookups and invalid versions skip only
/// the release at hand. Transport, decode and cache failures abort the run.
pub async fn build_conflicts<A>(
    api: &A,
    config: &Config,
    releases: &[AdvisoryRecord],
    progress: &ProgressBar,
) -> Result<(ConflictMap, RunStats)>
where
    A: ReleaseApi,
{
    let mut stats = RunStats {
        releases: releases.len(),
        ..RunStats::default()
    };
    let mut resolver = ProjectResolver::new(api);
    let mut aggregator = ConstraintAggregator::new(config.root_package(), config.alias_package());

    for release in releases {
        progress.inc(1);

        let major = release.major();
        if major < config.package.min_major {
            stats.legacy += 1;
            continue;
        }

        let project = match resolver.resolve(release.project.id).await {
            Ok(project) => project,
            Err(e) if e.is_skippable_lookup() => {
                tracing::warn!(
                    project = release.project.id,
                    version = %release.version,
                    error = %e,
                    "skipping release: project lookup failed"
                );
                stats.lookup_failed += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let version = match normalize(&release.version, project.is_core) {
            Ok(version) => version,
            Err(reason) => {
                tracing::warn!(
                    project = %project.machine_name,
                    version = %release.version,
                    %reason,
                    "skipping release: invalid version"
                );
                stats.invalid += 1;
                continue;
            }
        };

        aggregator.ingest(major, &config.package_name(&project.machine_name), &version);
        stats.ingested += 1;
    }

    Ok((aggregator.finalize(), stats))
}

/// Fetch every page, then process every release.
pub async fn run<A>(
    api: &A,
    config: &Config,
    fetch_progress: &ProgressBar,
    process_progress: &ProgressBar,
) -> Result<RunOutcome>
where
    A: ReleaseApi,
{
    let (releases, pages) = collect_releases(api, &config.feed_url(), fetch_progress).await?;
    fetch_progress.finish_and_clear();

    process_progress.set_length(releases.len() as u64);
    let (conflicts, mut stats) = build_conflicts(api, config, &releases, process_progress).await?;
    process_progress.finish_and_clear();

    stats.pages = pages;
    Ok(RunOutcome { conflicts, stats })
}
