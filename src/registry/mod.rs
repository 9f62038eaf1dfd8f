//! HTTP access to the release feed and project lookups.
//!
//! - [`drupal`] — the [`ReleaseApi`] implementation over the REST API.
//! - [`cache`] — on-disk response cache honoring `Cache-Control: max-age`.
//!
//! Orchestration only talks to [`ReleaseApi`], so it can be driven by an
//! in-memory fake in tests.

pub mod cache;
pub mod drupal;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::models::{FeedPage, ProjectInfo};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("server error {status} from {url}")]
    Server { status: u16, url: String },
    #[error("unexpected status {status} from {url}")]
    Client { status: u16, url: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("project {id} not found")]
    EmptyProjectList { id: u64 },
    #[error("invalid continuation link {link:?}: {reason}")]
    BadLink { link: String, reason: String },
    #[error("response cache: {0}")]
    Cache(#[from] std::io::Error),
}

impl FetchError {
    /// Lookup failures that concern a single project rather than the feed
    /// or the connection: server errors, error statuses and empty results.
    pub fn is_skippable_lookup(&self) -> bool {
        matches!(
            self,
            FetchError::Server { .. } | FetchError::Client { .. } | FetchError::EmptyProjectList { .. }
        )
    }
}

#[async_trait]
pub trait ReleaseApi {
    /// Fetch one page of the security release feed.
    async fn fetch_page(&self, url: &str) -> Result<FeedPage, FetchError>;

    /// Look up a project by node id.
    async fn fetch_project(&self, id: u64) -> Result<ProjectInfo, FetchError>;
}

/// Point a feed continuation link at the JSON endpoint.
///
/// The feed links to `.../node?...`; the JSON resource is `.../node.json?...`.
/// Links whose last path segment already has an extension are returned as-is.
pub fn json_endpoint(link: &str) -> Result<String, FetchError> {
    let mut url = Url::parse(link).map_err(|e| FetchError::BadLink {
        link: link.to_string(),
        reason: e.to_string(),
    })?;

    let path = url.path().to_string();
    let last = path.rsplit('/').next().unwrap_or("");
    if !last.is_empty() && !last.contains('.') {
        url.set_path(&format!("{}.json", path));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_endpoint_appends_extension() {
        assert_eq!(
            json_endpoint("https://www.drupal.org/api-d7/node?type=project_release&page=1").unwrap(),
            "https://www.drupal.org/api-d7/node.json?type=project_release&page=1"
        );
    }

    #[test]
    fn test_json_endpoint_keeps_json_links() {
        let link = "https://www.drupal.org/api-d7/node.json?type=project_release&page=2";
        assert_eq!(json_endpoint(link).unwrap(), link);
    }

    #[test]
    fn test_json_endpoint_rejects_garbage() {
        assert!(matches!(
            json_endpoint("not a url"),
            Err(FetchError::BadLink { .. })
        ));
    }

    #[test]
    fn test_project_level_failures_are_skippable() {
        let server = FetchError::Server {
            status: 503,
            url: "u".into(),
        };
        let client = FetchError::Client {
            status: 404,
            url: "u".into(),
        };
        assert!(server.is_skippable_lookup());
        assert!(client.is_skippable_lookup());
        assert!(FetchError::EmptyProjectList { id: 1 }.is_skippable_lookup());

        let decode = FetchError::Decode {
            url: "u".into(),
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        };
        assert!(!decode.is_skippable_lookup());
        assert!(!FetchError::Cache(std::io::Error::new(std::io::ErrorKind::Other, "disk")).is_skippable_lookup());
    }
}
