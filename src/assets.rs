//! Offline asset cache.
//!
//! A named cache keyed by a fixed version tag. Install pre-populates a fixed
//! allow-list of asset paths; fetch serves the cached copy when present and
//! falls through to the network otherwise. No revalidation, no eviction: the
//! asset list is small and fixed. Versioning is entirely by renaming the
//! cache, and old caches are not cleaned up.

use bytes::Bytes;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::AssetCacheConfig;
use crate::error::{Result, TrackError};

/// Fetch-through cache for the agent's static assets.
pub struct AssetCache {
    client: reqwest::Client,
    origin: String,
    dir: PathBuf,
    preload: Vec<String>,
}

impl AssetCache {
    /// Open the named cache under the configured root.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Config`] when the cache name or origin is empty.
    pub fn new(config: &AssetCacheConfig) -> Result<Self> {
        if config.name.trim().is_empty() {
            return Err(TrackError::Config("cache.name is not set".to_owned()));
        }
        if config.origin.trim().is_empty() {
            return Err(TrackError::Config("cache.origin is not set".to_owned()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            origin: config.origin.trim_end_matches('/').to_owned(),
            dir: config.root_dir.join(&config.name),
            preload: config.preload.clone(),
        })
    }

    /// Pre-populate the allow-listed assets from the origin.
    ///
    /// Any failed fetch or write fails the install; a later install can be
    /// attempted by restarting the agent.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Cache`] on a fetch failure and I/O errors on a
    /// write failure.
    pub async fn install(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        for path in &self.preload {
            let bytes = self.fetch_network(path).await?;
            std::fs::write(self.entry_path(path), &bytes)?;
        }
        info!(
            cache = %self.dir.display(),
            count = self.preload.len(),
            "asset cache installed"
        );
        Ok(())
    }

    /// Serve an asset from the cache, falling through to the network on a
    /// miss. Misses are not written back.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Cache`] when the asset is neither cached nor
    /// fetchable.
    pub async fn fetch(&self, path: &str) -> Result<Bytes> {
        let entry = self.entry_path(path);
        if entry.is_file() {
            debug!(path, "asset served from cache");
            return Ok(Bytes::from(std::fs::read(&entry)?));
        }

        debug!(path, "asset cache miss; fetching from network");
        self.fetch_network(path).await
    }

    fn entry_path(&self, path: &str) -> PathBuf {
        self.dir.join(urlencoding::encode(path).as_ref())
    }

    async fn fetch_network(&self, path: &str) -> Result<Bytes> {
        let url = format!("{}{}", self.origin, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrackError::Cache(format!("cannot fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackError::Cache(format!("{url} returned {status}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| TrackError::Cache(format!("cannot read {url}: {e}")))
    }
}
