//! Append-only display sink for sample rows.
//!
//! Rows are immutable once appended; there is no update or delete. Each row
//! carries six fields in fixed order: row id, session id, display timestamp,
//! longitude, latitude, elevation.

use std::io::Write;
use uuid::Uuid;

use crate::error::Result;
use crate::sample::{RowId, Sample, StoredSample, display_timestamp};

/// One table row, ready to render.
///
/// Geo fields are kept independently optional so a store-loaded record with
/// any subset of them still renders, field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// Store-assigned or session-local identifier.
    pub row_id: RowId,
    /// Session that captured the row.
    pub session_id: Uuid,
    /// Locale-formatted capture time.
    pub timestamp: String,
    /// Longitude, when present.
    pub longitude: Option<f64>,
    /// Latitude, when present.
    pub latitude: Option<f64>,
    /// Elevation, when present. Zero renders as `0.00 m`, absent as `N/A`.
    pub elevation: Option<f64>,
}

impl DisplayRow {
    /// Row for a freshly acquired sample, numbered with a local sequence id.
    pub fn from_sample(sample: &Sample, row_id: RowId) -> Self {
        Self {
            row_id,
            session_id: sample.session_id,
            timestamp: display_timestamp(&sample.captured_at),
            longitude: sample.position.map(|p| p.longitude),
            latitude: sample.position.map(|p| p.latitude),
            elevation: sample.position.and_then(|p| p.elevation),
        }
    }

    /// Row for a record loaded from the store.
    pub fn from_stored(record: &StoredSample) -> Self {
        Self {
            row_id: RowId::Stored(record.id),
            session_id: record.session_id,
            timestamp: display_timestamp(&record.captured_at),
            longitude: record.longitude,
            latitude: record.latitude,
            elevation: record.elevation,
        }
    }
}

/// Append-only visual list of sample rows.
pub trait DisplaySink: Send {
    /// Append one row. Rows are never updated or removed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error when the row cannot be written; the caller treats
    /// this as non-fatal for the tick.
    fn append_row(&mut self, row: &DisplayRow) -> Result<()>;
}

/// Plain-text table sink writing one aligned line per row.
pub struct TextTableSink<W: Write> {
    out: W,
    wrote_header: bool,
}

impl TextTableSink<std::io::Stdout> {
    /// Sink writing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TextTableSink<W> {
    /// Sink writing to the given writer.
    pub fn new(out: W) -> Self {
        Self {
            out,
            wrote_header: false,
        }
    }

    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(
            self.out,
            "{:>6}  {:<36}  {:<19}  {:>12}  {:>12}  {:>10}",
            "id", "session", "timestamp", "longitude", "latitude", "elevation"
        )
    }
}

/// Coordinate cell: four decimal places, or `N/A`.
pub fn format_coordinate(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| format!("{v:.4}"))
}

/// Elevation cell: two decimal places with a meter suffix, or `N/A`.
pub fn format_elevation(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| format!("{v:.2} m"))
}

impl<W: Write + Send> DisplaySink for TextTableSink<W> {
    fn append_row(&mut self, row: &DisplayRow) -> Result<()> {
        if !self.wrote_header {
            self.write_header()?;
            self.wrote_header = true;
        }
        writeln!(
            self.out,
            "{:>6}  {:<36}  {:<19}  {:>12}  {:>12}  {:>10}",
            row.row_id.to_string(),
            row.session_id.to_string(),
            row.timestamp,
            format_coordinate(row.longitude),
            format_coordinate(row.latitude),
            format_elevation(row.elevation),
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::sample::Position;
    use chrono::Utc;

    #[test]
    fn coordinates_render_with_four_decimals() {
        assert_eq!(format_coordinate(Some(37.1234)), "37.1234");
        assert_eq!(format_coordinate(Some(-122.56781)), "-122.5678");
        assert_eq!(format_coordinate(None), "N/A");
    }

    #[test]
    fn elevation_renders_with_unit_suffix() {
        assert_eq!(format_elevation(Some(15.2)), "15.20 m");
        assert_eq!(format_elevation(None), "N/A");
    }

    #[test]
    fn zero_elevation_is_distinct_from_absent() {
        assert_eq!(format_elevation(Some(0.0)), "0.00 m");
        assert_ne!(format_elevation(Some(0.0)), format_elevation(None));
    }

    #[test]
    fn row_from_unavailable_sample_has_no_geo_fields() {
        let sample = Sample::unavailable(Uuid::new_v4(), Utc::now());
        let row = DisplayRow::from_sample(&sample, RowId::Local(3));

        assert_eq!(row.row_id, RowId::Local(3));
        assert_eq!(row.latitude, None);
        assert_eq!(row.longitude, None);
        assert_eq!(row.elevation, None);
    }

    #[test]
    fn sink_writes_header_then_rows() {
        let sample = Sample::geolocated(
            Uuid::new_v4(),
            Utc::now(),
            Position::validated(37.1234, -122.5678, Some(15.2)).unwrap(),
        );
        let row = DisplayRow::from_sample(&sample, RowId::Local(1));

        let mut buffer = Vec::new();
        {
            let mut sink = TextTableSink::new(&mut buffer);
            sink.append_row(&row).unwrap();
            sink.append_row(&row).unwrap();
        }

        let rendered = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("elevation"));
        assert!(lines[1].contains("37.1234"));
        assert!(lines[1].contains("-122.5678"));
        assert!(lines[1].contains("15.20 m"));
    }

    #[test]
    fn stored_row_keeps_store_assigned_id() {
        let record: StoredSample = serde_json::from_value(serde_json::json!({
            "id": 42,
            "session_id": Uuid::new_v4(),
            "captured_at": "2026-08-05T12:00:00Z",
            "latitude": 51.5,
            "longitude": -0.1,
        }))
        .unwrap();
        let row = DisplayRow::from_stored(&record);
        assert_eq!(row.row_id, RowId::Stored(42));
        assert_eq!(row.elevation, None);
    }
}
