//! PostgREST store adapter (Supabase-compatible).
//!
//! One logical table of samples with nullable numeric geo columns. Reads are
//! a select-all ordered by capture time; writes insert a single record with
//! absent fields as JSON null, never a sentinel value.

use async_trait::async_trait;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, TrackError};
use crate::sample::{NewSample, StoredSample};
use crate::store::SampleStore;

/// HTTP client for a PostgREST sample table.
#[derive(Debug)]
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl PostgrestStore {
    /// Build a store client from config.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Config`] when the base URL or table is empty.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(TrackError::Config("store.base_url is not set".to_owned()));
        }
        if config.table.trim().is_empty() {
            return Err(TrackError::Config("store.table is not set".to_owned()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn map_http_error(status: reqwest::StatusCode, body: &str) -> TrackError {
        let detail = body.trim();
        if detail.is_empty() {
            TrackError::StoreUnavailable(format!("backend returned {status}"))
        } else {
            TrackError::StoreUnavailable(format!("backend returned {status}: {detail}"))
        }
    }
}

#[async_trait]
impl SampleStore for PostgrestStore {
    async fn fetch_all(&self) -> Result<Vec<StoredSample>> {
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("order", "captured_at.asc")])
            .send()
            .await
            .map_err(|e| TrackError::StoreUnavailable(format!("fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_http_error(status, &body));
        }

        let records: Vec<StoredSample> = response
            .json()
            .await
            .map_err(|e| TrackError::StoreUnavailable(format!("fetch returned bad records: {e}")))?;

        debug!(count = records.len(), "fetched stored samples");
        Ok(records)
    }

    async fn insert_one(&self, sample: &NewSample) -> Result<()> {
        // PostgREST insert takes an array of rows; always one here.
        let response = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&[sample])
            .send()
            .await
            .map_err(|e| TrackError::StoreUnavailable(format!("insert failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_http_error(status, &body));
        }

        debug!(session_id = %sample.session_id, "sample persisted");
        Ok(())
    }
}
