//! Persistent HTTP response cache.
//!
//! Wraps any [`Fetcher`] so repeated runs do not refetch pages that are
//! already on disk. Each entry is two files named after the SHA-256 of the
//! URL: `<hash>.json` with metadata and `<hash>.body` with the raw bytes.
//! Only successful responses are stored.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{RawResponse, compute_hash};
use crate::traits::Fetcher;

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    stored_at: DateTime<Utc>,
}

/// Directory-backed response store.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: None,
        }
    }

    /// Ignore entries older than `ttl`.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    fn paths(&self, url: &str) -> (PathBuf, PathBuf) {
        let key = compute_hash(url);
        (
            self.dir.join(format!("{key}.json")),
            self.dir.join(format!("{key}.body")),
        )
    }

    fn is_expired(&self, stored_at: DateTime<Utc>) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let age = Utc::now().signed_duration_since(stored_at);
        age.to_std().map(|age| age > ttl).unwrap_or(false)
    }

    /// Look up a stored response. Missing, expired or unreadable entries
    /// are all misses.
    pub async fn get(&self, url: &str) -> Option<RawResponse> {
        let (meta_path, body_path) = self.paths(url);
        let raw_meta = tokio::fs::read(&meta_path).await.ok()?;
        let meta: EntryMeta = match serde_json::from_slice(&raw_meta) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(path = %meta_path.display(), "Ignoring corrupt cache entry: {e}");
                return None;
            }
        };
        if meta.url != url || self.is_expired(meta.stored_at) {
            return None;
        }
        let body = tokio::fs::read(&body_path).await.ok()?;
        Some(RawResponse::new(meta.url, meta.status, body))
    }

    /// Store a response, replacing any previous entry for the same URL.
    pub async fn put(&self, url: &str, response: &RawResponse) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::CacheError(format!("{}: {e}", self.dir.display())))?;
        let (meta_path, body_path) = self.paths(url);
        let meta = EntryMeta {
            url: url.to_string(),
            status: response.status,
            stored_at: Utc::now(),
        };
        tokio::fs::write(&body_path, &response.body)
            .await
            .map_err(|e| AppError::CacheError(format!("{}: {e}", body_path.display())))?;
        tokio::fs::write(&meta_path, serde_json::to_vec(&meta)?)
            .await
            .map_err(|e| AppError::CacheError(format!("{}: {e}", meta_path.display())))?;
        Ok(())
    }

    /// Remove every stored entry. Returns how many responses were dropped.
    pub async fn clear(&self) -> Result<usize, AppError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(AppError::CacheError(format!("{}: {e}", self.dir.display()))),
        };
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => {
                    tokio::fs::remove_file(&path).await?;
                    removed += 1;
                }
                Some("body") => tokio::fs::remove_file(&path).await?,
                _ => {}
            }
        }
        tracing::info!(removed, dir = %self.dir.display(), "HTTP cache cleared");
        Ok(removed)
    }
}

/// A [`Fetcher`] wrapper that serves repeated GETs from a [`DiskCache`].
#[derive(Clone)]
pub struct CachedFetcher<F> {
    inner: F,
    cache: DiskCache,
}

impl<F: Fetcher> CachedFetcher<F> {
    pub fn new(inner: F, cache: DiskCache) -> Self {
        Self { inner, cache }
    }
}

impl<F: Fetcher> Fetcher for CachedFetcher<F> {
    async fn get(&self, url: &str) -> Result<RawResponse, AppError> {
        if let Some(hit) = self.cache.get(url).await {
            tracing::debug!(url = %url, "Cache hit");
            return Ok(hit);
        }

        let response = self.inner.get(url).await?;
        if response.is_success() {
            if let Err(e) = self.cache.put(url, &response).await {
                tracing::warn!(url = %url, "Failed to cache response: {e}");
            }
        }
        Ok(response)
    }
}
