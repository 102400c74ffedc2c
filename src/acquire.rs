//! Geolocation acquisition.
//!
//! One reading per call with exactly two terminal outcomes: a validated
//! [`Position`] or an explicit [`Unavailable`] marker. There are no retries
//! here; recovery from a failed acquisition is the scheduler's next tick.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::config::SamplerConfig;
use crate::error::TrackError;
use crate::sample::Position;

/// Why no position is available for a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// The host offers no positioning capability. Permanent for the session:
    /// once reported, later calls short-circuit without re-probing.
    Unsupported,
    /// The platform reported a failure (permission denied, timeout, no fix).
    Error(String),
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "geolocation unsupported on this host"),
            Self::Error(reason) => write!(f, "{reason}"),
        }
    }
}

impl From<Unavailable> for TrackError {
    fn from(unavailable: Unavailable) -> Self {
        Self::Acquisition(unavailable.to_string())
    }
}

/// Accuracy preference passed through to the position source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    /// Prefer the best fix the platform can produce.
    High,
    /// Accept a coarser, cheaper fix.
    Balanced,
}

/// Raw reading as reported by the platform, before validation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawReading {
    /// Reported latitude in decimal degrees.
    pub latitude: f64,
    /// Reported longitude in decimal degrees.
    pub longitude: f64,
    /// Reported elevation in meters, when the platform has one.
    #[serde(default, alias = "altitude")]
    pub elevation: Option<f64>,
}

/// One-shot position reading source.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Request a single reading. Exactly one of the two outcomes occurs per
    /// call; the caller owns the timeout.
    async fn read_position(&self, accuracy: Accuracy) -> Result<RawReading, Unavailable>;
}

/// Source for hosts with no positioning capability.
pub struct UnsupportedSource;

#[async_trait]
impl PositionSource for UnsupportedSource {
    async fn read_position(&self, _accuracy: Accuracy) -> Result<RawReading, Unavailable> {
        Err(Unavailable::Unsupported)
    }
}

/// Source that runs an external locator command and parses one JSON reading
/// from its stdout.
///
/// Works with locators such as `CoreLocationCLI -json` or `termux-location`,
/// which print an object with `latitude`/`longitude` and an optional
/// `elevation` or `altitude` field. The accuracy preference is not forwarded;
/// locator commands choose their own.
pub struct CommandSource {
    command: String,
}

impl CommandSource {
    /// Wrap the given shell command line.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl PositionSource for CommandSource {
    async fn read_position(&self, _accuracy: Accuracy) -> Result<RawReading, Unavailable> {
        let output = tokio::process::Command::new("/bin/sh")
            .arg("-lc")
            .arg(&self.command)
            .output()
            .await
            .map_err(|e| Unavailable::Error(format!("cannot run locator command: {e}")))?;

        if !output.status.success() {
            return Err(Unavailable::Error(format!(
                "locator command failed with status {}",
                output
                    .status
                    .code()
                    .map_or_else(|| "unknown".to_owned(), |c| c.to_string())
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Unavailable::Error(format!("locator output is not a position: {e}")))
    }
}

/// Acquires validated positions from a [`PositionSource`] with a bounded
/// timeout.
pub struct Acquirer {
    source: Box<dyn PositionSource>,
    timeout: Duration,
    accuracy: Accuracy,
    /// Latched once the source reports `Unsupported`.
    unsupported: AtomicBool,
}

impl Acquirer {
    /// Wrap a source with the configured timeout and accuracy preference.
    pub fn new(source: Box<dyn PositionSource>, config: &SamplerConfig) -> Self {
        let accuracy = if config.high_accuracy {
            Accuracy::High
        } else {
            Accuracy::Balanced
        };
        Self {
            source,
            timeout: Duration::from_millis(config.timeout_ms),
            accuracy,
            unsupported: AtomicBool::new(false),
        }
    }

    /// Build an acquirer from config: a command source when a locator command
    /// is configured, otherwise an unsupported host.
    pub fn from_config(config: &SamplerConfig) -> Self {
        let source: Box<dyn PositionSource> = match &config.command {
            Some(command) => Box::new(CommandSource::new(command.clone())),
            None => Box::new(UnsupportedSource),
        };
        Self::new(source, config)
    }

    /// Request one validated reading.
    ///
    /// The timeout bounds the source call; an expired timeout is an
    /// acquisition error for this tick, not a fatal condition. An
    /// `Unsupported` outcome latches and short-circuits every later call.
    pub async fn acquire(&self) -> Result<Position, Unavailable> {
        if self.unsupported.load(Ordering::Relaxed) {
            return Err(Unavailable::Unsupported);
        }

        let reading = match tokio::time::timeout(
            self.timeout,
            self.source.read_position(self.accuracy),
        )
        .await
        {
            Err(_) => {
                return Err(Unavailable::Error(format!(
                    "no position within {} ms",
                    self.timeout.as_millis()
                )));
            }
            Ok(Err(Unavailable::Unsupported)) => {
                self.unsupported.store(true, Ordering::Relaxed);
                return Err(Unavailable::Unsupported);
            }
            Ok(Err(unavailable)) => return Err(unavailable),
            Ok(Ok(reading)) => reading,
        };

        debug!(
            latitude = reading.latitude,
            longitude = reading.longitude,
            "position reading received"
        );

        Position::validated(reading.latitude, reading.longitude, reading.elevation)
            .map_err(|e| Unavailable::Error(e.to_string()))
    }
}
