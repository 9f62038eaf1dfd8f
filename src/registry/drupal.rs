use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::cache::{CachePolicy, ResponseCache};
use super::{FetchError, ReleaseApi};
use crate::config::Config;
use crate::models::{FeedPage, ProjectInfo, ProjectPage};

const USER_AGENT: &str = concat!("advisory-conflicts/", env!("CARGO_PKG_VERSION"));

/// How the response cache participates in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Serve fresh entries and store new responses.
    ReadWrite,
    /// Always hit the network, but store new responses.
    Refresh,
    /// Never touch the cache.
    Off,
}

/// Release feed client for the REST API described by [`Config::feed`].
pub struct DrupalClient {
    client: Client,
    config: Config,
    cache: Option<ResponseCache>,
    read_cache: bool,
}

impl DrupalClient {
    pub fn new(config: Config, cache: ResponseCache, mode: CacheMode) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.feed.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let (cache, read_cache) = match mode {
            CacheMode::ReadWrite => (Some(cache), true),
            CacheMode::Refresh => (Some(cache), false),
            CacheMode::Off => (None, false),
        };

        Ok(Self {
            client,
            config,
            cache,
            read_cache,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.get_body(url).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        if self.read_cache {
            if let Some(body) = self.cache.as_ref().and_then(|c| c.lookup(url)) {
                tracing::debug!(url, "cache hit");
                return Ok(body);
            }
        }

        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(FetchError::Server {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Client {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let policy = CachePolicy::from_header(
            response
                .headers()
                .get(CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
        );
        let body = response.text().await?;

        if let Some(cache) = &self.cache {
            if cache.store(url, &body, policy)? {
                tracing::debug!(url, ?policy, "cached response");
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl ReleaseApi for DrupalClient {
    async fn fetch_page(&self, url: &str) -> Result<FeedPage, FetchError> {
        self.get_json(url).await
    }

    async fn fetch_project(&self, id: u64) -> Result<ProjectInfo, FetchError> {
        let page: ProjectPage = self.get_json(&self.config.project_url(id)).await?;
        let node = page
            .list
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyProjectList { id })?;

        Ok(ProjectInfo {
            id: node.nid,
            is_core: self.config.is_core(&node.machine_name),
            machine_name: node.machine_name,
        })
    }
}
