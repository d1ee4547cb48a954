//! Scenario 2: Overlapping Location Requests
//!
//! Issues two location requests back to back, then delivers the answers
//! newest-first. The newer answer is applied; the older one arrives late and
//! is dropped because its ticket has been superseded. A device without
//! geolocation is shown failing on the spot.

use std::time::Duration;

use finder_contracts::{
    error::{FinderError, FinderResult},
    location::{Coordinate, LocationError},
};
use finder_core::LocationUpdate;

use crate::{
    capabilities::{LocationFix, LocatorMode},
    mock_data::{reference_directory, reference_session},
};

/// How long to wait for each simulated answer before giving up.
const FIX_TIMEOUT: Duration = Duration::from_secs(2);

/// Run Scenario 2.
pub fn run_scenario() -> FinderResult<()> {
    println!("=== Scenario 2: Overlapping Location Requests ===");
    println!();

    let brooklyn = Coordinate::new(40.6782, -73.9442);
    let (mut session, host) = reference_session(
        reference_directory()?,
        LocatorMode::Fix(brooklyn),
        Duration::from_millis(50),
    );

    println!("  Starting location: {}", session.state().user_location);

    let first = session.request_location();
    let second = session.request_location();
    println!("  Issued tickets: {:?} and {:?}", first, second);

    // The session stays usable while both are outstanding.
    session.update_filters(|f| f.radius_km = 5.0);
    println!("  Narrowed radius to 5 km meanwhile: {} result(s)", session.results_count());

    let mut fixes: Vec<LocationFix> = Vec::with_capacity(2);
    for _ in 0..2 {
        let fix = host.location_fixes.recv_timeout(FIX_TIMEOUT).map_err(|_| {
            FinderError::Location(LocationError::Timeout)
        })?;
        fixes.push(fix);
    }
    // Deliver newest first so the older answer is the late one.
    fixes.sort_by(|a, b| b.ticket.cmp(&a.ticket));

    for fix in fixes {
        let ticket = fix.ticket;
        let update = session.resolve_location(ticket, fix.outcome);
        let label = match update {
            LocationUpdate::Applied(c) => format!("applied ({})", c),
            LocationUpdate::Failed(e) => format!("failed ({})", e),
            LocationUpdate::Stale => "stale, dropped".to_string(),
        };
        println!("  Answer for ticket {}: {}", ticket, label);
    }

    println!("  Final location: {}", session.state().user_location);
    if let Some(toast) = host.notifier.latest() {
        println!("  Last toast: {}", toast.message);
    }
    println!();

    // ── Host without geolocation ──────────────────────────────────────────────

    let (mut offline, offline_host) =
        reference_session(reference_directory()?, LocatorMode::Unsupported, Duration::ZERO);
    let ticket = offline.request_location();
    println!("  Device without geolocation: ticket = {:?}", ticket);
    if let Some(toast) = offline_host.notifier.latest() {
        println!("  Toast: {}", toast.message);
    }
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
