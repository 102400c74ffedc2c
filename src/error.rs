//! Error types for the waymark agent.

/// Top-level error type for the sampling and sync pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// Geolocation acquisition failure (unsupported host or platform error).
    #[error("acquisition error: {0}")]
    Acquisition(String),

    /// Store backend or transport failure on read or write.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Display sink error.
    #[error("display error: {0}")]
    Display(String),

    /// Offline asset cache error.
    #[error("asset cache error: {0}")]
    Cache(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TrackError>;
