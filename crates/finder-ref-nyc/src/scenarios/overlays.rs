//! Scenario 1: Overlays, Escape, and Filters
//!
//! Walks one session through the interactions the view-state controller
//! arbitrates:
//!
//! - open a profile, then the hotlines panel on top of it
//! - Escape twice: hotlines close first, then the profile
//! - toggle a specialization on and off, then narrow and reset the filters

use std::time::Duration;

use finder_contracts::{error::FinderResult, provider::ProviderId, view::SortKey};
use finder_core::DirectorySession;

use crate::{
    capabilities::LocatorMode,
    mock_data::{reference_directory, reference_session},
};

fn print_state(session: &DirectorySession) {
    let state = session.state();
    println!(
        "    selected: {:<6} hotlines: {:<5} topmost: {:?}",
        state
            .selected_provider
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or("-"),
        state.hotlines_visible,
        session.topmost_overlay(),
    );
}

fn print_results(session: &DirectorySession) {
    let results = session.filtered_and_sorted();
    let names: Vec<&str> = results.iter().map(|p| p.name.as_str()).collect();
    println!("    {} result(s): {}", session.results_count(), names.join(", "));
}

/// Run Scenario 1.
pub fn run_scenario() -> FinderResult<()> {
    println!("=== Scenario 1: Overlays, Escape, and Filters ===");
    println!();

    let (mut session, host) = reference_session(
        reference_directory()?,
        LocatorMode::Unsupported,
        Duration::ZERO,
    );

    // ── Overlay stacking ──────────────────────────────────────────────────────

    println!("  Select provider 1, then open the hotlines panel:");
    session.select_existing(&ProviderId::new("1"))?;
    session.open_hotlines();
    print_state(&session);

    println!("  Escape:");
    println!("    -> {:?}", session.handle_escape());
    print_state(&session);

    println!("  Escape:");
    println!("    -> {:?}", session.handle_escape());
    print_state(&session);

    println!("  Escape:");
    println!("    -> {:?}", session.handle_escape());
    println!();

    // ── Filters ───────────────────────────────────────────────────────────────

    println!("  Default filters (25 km, both session types):");
    print_results(&session);

    println!("  Toggle \"Trauma\" on:");
    session.toggle_specialization("Trauma");
    print_results(&session);

    println!("  Toggle \"Trauma\" off again:");
    session.toggle_specialization("Trauma");
    print_results(&session);

    println!("  10 km, accepting new clients, in-person switched off, by rating:");
    session.update_filters(|f| {
        f.radius_km = 10.0;
        f.accepting_new = true;
        f.in_person = false;
    });
    session.set_sort_key(SortKey::Rating);
    print_results(&session);

    println!("  Reset filters:");
    session.reset_filters();
    print_results(&session);
    println!();

    // ── Copy contact ──────────────────────────────────────────────────────────

    session.select_existing(&ProviderId::new("2"))?;
    session.copy_contact()?;
    println!(
        "  Copied contact for provider 2: {:?}",
        host.clipboard.contents().unwrap_or_default()
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
