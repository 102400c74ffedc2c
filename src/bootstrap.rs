//! Startup load of previously stored samples.

use tracing::{info, warn};

use crate::display::{DisplayRow, DisplaySink};
use crate::session::Session;
use crate::store::SampleStore;

/// Fetch all stored samples and render them before scheduling begins.
///
/// On success the rows are rendered in store order (ascending capture time)
/// and the session counter continues numbering after them. On store failure
/// the table stays empty and startup continues; there is no retry.
pub async fn load_existing(
    store: &dyn SampleStore,
    sink: &mut dyn DisplaySink,
    session: &mut Session,
) {
    let records = match store.fetch_all().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "cannot load stored samples; starting with an empty table");
            return;
        }
    };

    info!(count = records.len(), "loaded stored samples");
    for record in &records {
        let row = DisplayRow::from_stored(record);
        if let Err(e) = sink.append_row(&row) {
            warn!(record_id = record.id, error = %e, "cannot render stored sample");
        }
    }

    session.reset_sequence(records.len() as u64 + 1);
}
