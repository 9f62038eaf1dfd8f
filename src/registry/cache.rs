use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How a response may be cached, from its `Cache-Control` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    NoStore,
    MaxAge(u64),
}

impl CachePolicy {
    pub fn from_header(header: Option<&str>) -> Self {
        static MAX_AGE: OnceLock<Regex> = OnceLock::new();
        static NO_STORE: OnceLock<Regex> = OnceLock::new();

        let Some(value) = header else {
            return CachePolicy::NoStore;
        };
        let value = value.to_ascii_lowercase();

        let no_store = NO_STORE.get_or_init(|| Regex::new(r"\bno-(store|cache)\b").unwrap());
        if no_store.is_match(&value) {
            return CachePolicy::NoStore;
        }

        let max_age = MAX_AGE.get_or_init(|| Regex::new(r"\bmax-age\s*=\s*(\d+)").unwrap());
        match max_age
            .captures(&value)
            .and_then(|c| c[1].parse::<u64>().ok())
        {
            Some(secs) if secs > 0 => CachePolicy::MaxAge(secs),
            _ => CachePolicy::NoStore,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    url: String,
    stored_at: u64,
    max_age: u64,
    body: String,
}

/// GET response bodies on disk, one file per URL.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        self.dir.join(format!("{}.json", hash))
    }

    /// Fresh body for `url`, if any.
    pub fn lookup(&self, url: &str) -> Option<String> {
        self.lookup_at(url, now_secs())
    }

    fn lookup_at(&self, url: &str, now: u64) -> Option<String> {
        let path = self.entry_path(url);
        let raw = std::fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
                return None;
            }
        };

        if entry.url != url || now >= entry.stored_at.saturating_add(entry.max_age) {
            return None;
        }
        Some(entry.body)
    }

    /// Store `body` when `policy` allows it. Returns whether it was stored.
    pub fn store(&self, url: &str, body: &str, policy: CachePolicy) -> std::io::Result<bool> {
        self.store_at(url, body, policy, now_secs())
    }

    fn store_at(
        &self,
        url: &str,
        body: &str,
        policy: CachePolicy,
        now: u64,
    ) -> std::io::Result<bool> {
        let CachePolicy::MaxAge(max_age) = policy else {
            return Ok(false);
        };

        std::fs::create_dir_all(&self.dir)?;
        let entry = CacheEntry {
            url: url.to_string(),
            stored_at: now,
            max_age,
            body: body.to_string(),
        };
        std::fs::write(self.entry_path(url), serde_json::to_vec(&entry)?)?;
        Ok(true)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
