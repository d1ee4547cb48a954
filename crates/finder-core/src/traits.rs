//! Host capabilities consumed by the finder.
//!
//! These three traits are the complete boundary to the outside world:
//!
//! - `LocationService`: asynchronous geolocation
//! - `Clipboard`: write-only text clipboard
//! - `Notifier`: transient toast messages
//!
//! None of them is allowed to call back into the session. Results of a
//! location request come back through `DirectorySession::resolve_location`,
//! driven by whatever event loop hosts the session.

use finder_contracts::{
    error::FinderResult,
    location::{LocationError, LocationTicket},
    notify::Toast,
};

/// Source of the user's current position.
pub trait LocationService: Send + Sync {
    /// Start a location request tagged with `ticket`. Must not block.
    ///
    /// Return `Err(LocationError::Unsupported)` immediately when the host has
    /// no geolocation at all. Otherwise return `Ok(())` and deliver the
    /// outcome later, together with `ticket`, to
    /// `DirectorySession::resolve_location`. There is no cancellation: a
    /// second request may be started before the first resolves.
    fn request_location(&self, ticket: LocationTicket) -> Result<(), LocationError>;
}

/// Text clipboard.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> FinderResult<()>;
}

/// Toast sink. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}
