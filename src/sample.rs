//! Sample data model: positions, fresh samples, and store records.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TrackError};

/// A validated geographic fix.
///
/// Latitude and longitude are atomically present; elevation is independently
/// optional and its absence is never coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Signed decimal degrees, -90 to 90.
    pub latitude: f64,
    /// Signed decimal degrees, -180 to 180.
    pub longitude: f64,
    /// Signed decimal meters above sea level, when the platform reports one.
    pub elevation: Option<f64>,
}

impl Position {
    /// Validate raw platform values into a `Position`.
    ///
    /// Non-finite or out-of-range latitude/longitude fail the whole reading.
    /// A non-finite elevation is dropped without failing the reading.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Acquisition`] when latitude or longitude is
    /// unusable.
    pub fn validated(latitude: f64, longitude: f64, elevation: Option<f64>) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(TrackError::Acquisition(format!(
                "latitude out of range: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TrackError::Acquisition(format!(
                "longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            elevation: elevation.filter(|e| e.is_finite()),
        })
    }
}

/// One geolocation observation captured by this session.
///
/// `captured_at` is the single canonical instant; the storage form (RFC 3339)
/// and the display form are both derived from it and cannot diverge.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Identifier of the acquiring session.
    pub session_id: Uuid,
    /// Instant of acquisition.
    pub captured_at: DateTime<Utc>,
    /// The fix, or `None` when acquisition was unavailable for this tick.
    pub position: Option<Position>,
}

impl Sample {
    /// A fully geolocated sample.
    pub fn geolocated(session_id: Uuid, captured_at: DateTime<Utc>, position: Position) -> Self {
        Self {
            session_id,
            captured_at,
            position: Some(position),
        }
    }

    /// A sample with no position for this tick.
    pub fn unavailable(session_id: Uuid, captured_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            captured_at,
            position: None,
        }
    }
}

/// Locale-formatted timestamp for display, derived from the canonical instant.
pub fn display_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A record loaded from the store.
///
/// Unlike acquisition-produced samples, a stored record may carry any subset
/// of the geo fields; each one is rendered independently.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredSample {
    /// Store-assigned record identifier.
    pub id: i64,
    /// Session that captured the record.
    pub session_id: Uuid,
    /// Capture instant.
    pub captured_at: DateTime<Utc>,
    /// Latitude, when stored.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude, when stored.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Elevation, when stored. Null and zero are distinct values.
    #[serde(default)]
    pub elevation: Option<f64>,
}

/// Insert payload for a geolocated sample.
///
/// Display-only samples never become a `NewSample`; an absent elevation
/// serializes as JSON null, never as a sentinel number or string.
#[derive(Debug, Clone, Serialize)]
pub struct NewSample {
    /// Session that captured the sample.
    pub session_id: Uuid,
    /// Capture instant, serialized as RFC 3339.
    pub captured_at: DateTime<Utc>,
    /// Latitude in signed decimal degrees.
    pub latitude: f64,
    /// Longitude in signed decimal degrees.
    pub longitude: f64,
    /// Elevation in meters, or null.
    pub elevation: Option<f64>,
}

impl NewSample {
    /// Build the insert payload for a sample, or `None` for a display-only
    /// sample.
    pub fn from_sample(sample: &Sample) -> Option<Self> {
        let position = sample.position?;
        Some(Self {
            session_id: sample.session_id,
            captured_at: sample.captured_at,
            latitude: position.latitude,
            longitude: position.longitude,
            elevation: position.elevation,
        })
    }
}

/// Identifier a display row carries: store-assigned, or session-local for
/// rows not yet persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowId {
    /// Store-assigned record identifier.
    Stored(i64),
    /// Session-local sequence number.
    Local(u64),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored(id) => write!(f, "{id}"),
            Self::Local(seq) => write!(f, "{seq}"),
        }
    }
}
