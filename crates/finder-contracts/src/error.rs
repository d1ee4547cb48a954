//! Error types for the therapist finder.
//!
//! The filter engine and view-state controller are total and never fail.
//! Everything fallible lives at the edges: loading the directory and talking
//! to host capabilities (geolocation, clipboard).

use thiserror::Error;

use crate::location::LocationError;

/// The unified error type for the finder crates.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The directory document is missing, unreadable, or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A provider record violates a data-model invariant.
    #[error("invalid provider '{id}': {reason}")]
    InvalidProvider { id: String, reason: String },

    /// A lookup referenced a provider id that is not in the directory.
    #[error("unknown provider '{id}'")]
    UnknownProvider { id: String },

    /// The geolocation capability failed or is unavailable.
    #[error("location request failed: {0}")]
    Location(#[from] LocationError),

    /// The clipboard capability rejected a write.
    #[error("clipboard write failed: {reason}")]
    ClipboardFailed { reason: String },
}

/// Convenience alias used throughout the finder crates.
pub type FinderResult<T> = Result<T, FinderError>;
