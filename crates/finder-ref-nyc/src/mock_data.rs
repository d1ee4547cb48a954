//! The bundled New York reference directory.
//!
//! All providers in `directories/nyc.toml` are fictional. The hotlines are
//! the real national US crisis lines.

use std::time::Duration;

use crossbeam_channel::Receiver;

use finder_contracts::error::FinderResult;
use finder_core::DirectorySession;
use finder_directory::Directory;

use crate::capabilities::{LocationFix, LocatorMode, MemoryClipboard, RecordingNotifier, SimulatedLocator};

/// The reference directory document, compiled into the binary.
pub const NYC_DIRECTORY: &str = include_str!("../directories/nyc.toml");

/// Parse and validate the bundled directory.
pub fn reference_directory() -> FinderResult<Directory> {
    Directory::from_toml_str(NYC_DIRECTORY)
}

/// Handles to the in-process capabilities wired into a reference session.
pub struct ReferenceHost {
    pub clipboard: MemoryClipboard,
    pub notifier: RecordingNotifier,
    pub location_fixes: Receiver<LocationFix>,
}

/// Build a session over `directory` backed by the simulated capabilities.
pub fn reference_session(
    directory: Directory,
    locator: LocatorMode,
    locator_delay: Duration,
) -> (DirectorySession, ReferenceHost) {
    let (locator, location_fixes) = SimulatedLocator::new(locator, locator_delay);
    let clipboard = MemoryClipboard::new();
    let notifier = RecordingNotifier::new();

    let (user_location, providers, hotlines) = directory.into_parts();
    let session = DirectorySession::new(
        providers,
        hotlines,
        Box::new(locator),
        Box::new(clipboard.clone()),
        Box::new(notifier.clone()),
    )
    .with_user_location(user_location);

    (
        session,
        ReferenceHost {
            clipboard,
            notifier,
            location_fixes,
        },
    )
}
