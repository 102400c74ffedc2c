//! Store client: durable persistence of samples.
//!
//! The backend is external; this module carries the contract plus a
//! PostgREST-style HTTP implementation. Failures on either path are reported
//! to the caller and never retried here.

pub mod postgrest;

pub use postgrest::PostgrestStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::sample::{NewSample, StoredSample};

/// Thin contract over the external persistence backend.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// All stored samples, ordered ascending by capture time.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::StoreUnavailable`](crate::error::TrackError::StoreUnavailable)
    /// on any transport or backend failure; the caller must not assume
    /// partial results were applied.
    async fn fetch_all(&self) -> Result<Vec<StoredSample>>;

    /// Insert one sample.
    ///
    /// Fire-and-forget from the caller's perspective: a failure is reported,
    /// never rolled back or retried automatically.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::StoreUnavailable`](crate::error::TrackError::StoreUnavailable)
    /// on any transport or backend failure.
    async fn insert_one(&self, sample: &NewSample) -> Result<()>;
}
