//! Per-tick orchestration: acquire → display → persist.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::acquire::{Acquirer, Unavailable};
use crate::display::{DisplayRow, DisplaySink};
use crate::sample::{NewSample, RowId, Sample};
use crate::session::Session;
use crate::store::SampleStore;

/// Runs one acquisition-display-persist cycle per scheduler tick.
pub struct SyncPipeline {
    session: Session,
    acquirer: Acquirer,
    sink: Box<dyn DisplaySink>,
    store: Arc<dyn SampleStore>,
}

impl SyncPipeline {
    /// Assemble the pipeline around an initialized session.
    pub fn new(
        session: Session,
        acquirer: Acquirer,
        sink: Box<dyn DisplaySink>,
        store: Arc<dyn SampleStore>,
    ) -> Self {
        Self {
            session,
            acquirer,
            sink,
            store,
        }
    }

    /// Execute one tick.
    ///
    /// The display row is appended whatever the acquisition outcome, with
    /// unavailable markers for missing fields; the store insert runs only for
    /// a geolocated sample. The two stages fail independently: an append
    /// error is logged and does not suppress the insert, and vice versa.
    /// Recovery from any failure here is the next scheduled tick.
    ///
    /// Returns the handle of the in-flight insert, if one was started. The
    /// insert is detached: a slow store round trip from one tick may complete
    /// after the next tick has begun, and the store orders on `captured_at`,
    /// not arrival.
    pub async fn run_tick(&mut self) -> Option<JoinHandle<()>> {
        let captured_at = Utc::now();

        let sample = match self.acquirer.acquire().await {
            Ok(position) => Sample::geolocated(self.session.id(), captured_at, position),
            Err(Unavailable::Unsupported) => {
                warn!("no positioning capability; display-only tick");
                Sample::unavailable(self.session.id(), captured_at)
            }
            Err(Unavailable::Error(reason)) => {
                warn!(%reason, "acquisition failed; display-only tick");
                Sample::unavailable(self.session.id(), captured_at)
            }
        };

        let row = DisplayRow::from_sample(&sample, RowId::Local(self.session.take_sequence()));
        if let Err(e) = self.sink.append_row(&row) {
            error!(error = %e, "cannot append row to display");
        }

        let Some(payload) = NewSample::from_sample(&sample) else {
            debug!("sample has no position; skipping persistence");
            return None;
        };

        let store = Arc::clone(&self.store);
        Some(tokio::spawn(async move {
            if let Err(e) = store.insert_one(&payload).await {
                error!(error = %e, "cannot persist sample");
            }
        }))
    }
}
