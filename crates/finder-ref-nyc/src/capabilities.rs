//! In-process host capabilities.
//!
//! These stand in for a real device's geolocation, clipboard, and toast
//! surfaces. They are used by the CLI and the TUI, and by tests that need to
//! observe what the session asked the host to do.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info};

use finder_contracts::{
    error::{FinderError, FinderResult},
    location::{Coordinate, LocationError, LocationTicket},
    notify::Toast,
};
use finder_core::traits::{Clipboard, LocationService, Notifier};

// ── Geolocation ──────────────────────────────────────────────────────────────

/// How the simulated device answers location requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocatorMode {
    /// Every request eventually yields this coordinate.
    Fix(Coordinate),
    /// Every request eventually fails with this error.
    Fail(LocationError),
    /// The device has no geolocation; requests are refused on the spot.
    Unsupported,
}

/// A resolved location request, as delivered back to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub ticket: LocationTicket,
    pub outcome: Result<Coordinate, LocationError>,
}

/// A geolocation capability that answers on a background thread after a
/// fixed delay.
///
/// Answers arrive on the `Receiver` returned by `new`; the host drains it and
/// forwards each `LocationFix` to `DirectorySession::resolve_location`.
pub struct SimulatedLocator {
    mode: LocatorMode,
    delay: Duration,
    fixes: Sender<LocationFix>,
}

impl SimulatedLocator {
    pub fn new(mode: LocatorMode, delay: Duration) -> (Self, Receiver<LocationFix>) {
        let (fixes, rx) = unbounded();
        (Self { mode, delay, fixes }, rx)
    }
}

impl LocationService for SimulatedLocator {
    fn request_location(&self, ticket: LocationTicket) -> Result<(), LocationError> {
        let outcome = match self.mode {
            LocatorMode::Unsupported => return Err(LocationError::Unsupported),
            LocatorMode::Fix(coordinate) => Ok(coordinate),
            LocatorMode::Fail(error) => Err(error),
        };

        let fixes = self.fixes.clone();
        let delay = self.delay;
        debug!(ticket = %ticket, delay_ms = delay.as_millis() as u64, "simulated location request");

        thread::spawn(move || {
            thread::sleep(delay);
            // The receiver may be gone if the host shut down first.
            let _ = fixes.send(LocationFix { ticket, outcome });
        });
        Ok(())
    }
}

// ── Clipboard ────────────────────────────────────────────────────────────────

/// A clipboard that keeps the last written text in memory.
///
/// Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> FinderResult<()> {
        let mut contents = self.contents.lock().map_err(|e| FinderError::ClipboardFailed {
            reason: format!("clipboard lock poisoned: {}", e),
        })?;
        *contents = Some(text.to_string());
        debug!(bytes = text.len(), "clipboard written");
        Ok(())
    }
}

// ── Toasts ───────────────────────────────────────────────────────────────────

/// A toast sink that records every notification in order.
///
/// Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn latest(&self) -> Option<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        info!(level = ?toast.level, message = %toast.message, "toast");
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
