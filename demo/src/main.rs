//! Therapist Finder: Demo CLI
//!
//! Searches the bundled New York directory (or any directory TOML file) and
//! runs the reference walkthrough scenarios.
//!
//! Usage:
//!   cargo run -p demo -- search --radius 10 --specialization Anxiety
//!   cargo run -p demo -- search --sort rating --accepting-new --json
//!   cargo run -p demo -- profile 3
//!   cargo run -p demo -- hotlines
//!   cargo run -p demo -- walkthrough

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use finder_contracts::{
    error::{FinderError, FinderResult},
    filter::{PriceRange, PRICE_MAX, PRICE_MIN, SPECIALIZATIONS},
    provider::{Provider, ProviderId},
    view::SortKey,
};
use finder_core::DirectorySession;
use finder_directory::Directory;
use finder_ref_nyc::{
    capabilities::LocatorMode,
    mock_data::{reference_directory, reference_session},
    scenarios::{location, overlays},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Therapist finder demo.
///
/// Browse a provider directory from the command line: filter by radius,
/// session type, specialization and availability, sort by distance or
/// rating, and look up crisis hotlines.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Therapist finder reference directory demo",
    long_about = "Searches a therapist directory with the same filtering and sorting\n\
                  rules as the interactive finder, and runs the reference walkthroughs."
)]
struct Cli {
    /// Directory TOML file to load instead of the bundled New York directory.
    #[arg(long, global = true, value_name = "FILE")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List providers matching the given filters.
    Search(SearchArgs),
    /// Show one provider's full profile.
    Profile {
        /// Provider id, as shown by `search`.
        id: String,
    },
    /// List the crisis hotlines.
    Hotlines,
    /// Run both walkthrough scenarios in sequence.
    Walkthrough,
    /// Scenario 1: overlays, Escape, and filters.
    Overlays,
    /// Scenario 2: overlapping location requests.
    Location,
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Search radius in km (clamped to 1..=50).
    #[arg(
        long,
        allow_negative_numbers = true,
        default_value_t = finder_contracts::filter::DEFAULT_RADIUS_KM
    )]
    radius: f64,
    /// Lowest session fee in dollars (clamped to 0..=300). Stored with the
    /// search but not applied to results.
    #[arg(long, default_value_t = PRICE_MIN)]
    price_min: u32,
    /// Highest session fee in dollars (clamped to 0..=300). Stored with the
    /// search but not applied to results.
    #[arg(long, default_value_t = PRICE_MAX)]
    price_max: u32,
    /// Hide providers who only see clients in person.
    #[arg(long)]
    no_in_person: bool,
    /// Hide providers who only offer telehealth.
    #[arg(long)]
    no_telehealth: bool,
    /// Require a specialization. Repeat to require several.
    #[arg(long = "specialization", value_name = "TAG")]
    specializations: Vec<String>,
    /// Only providers accepting new clients.
    #[arg(long)]
    accepting_new: bool,
    /// Result ordering.
    #[arg(long, value_enum, default_value_t = SortArg::Distance)]
    sort: SortArg,
    /// Print the results as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Distance,
    Rating,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Distance => SortKey::Distance,
            SortArg::Rating => SortKey::Rating,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Search(args) => run_search(cli.directory, args),
        Command::Profile { id } => run_profile(cli.directory, &id),
        Command::Hotlines => run_hotlines(cli.directory),
        Command::Walkthrough => run_walkthrough(),
        Command::Overlays => overlays::run_scenario(),
        Command::Location => location::run_scenario(),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Session setup ─────────────────────────────────────────────────────────────

fn load_directory(path: Option<PathBuf>) -> FinderResult<Directory> {
    match path {
        Some(path) => Directory::from_file(&path),
        None => reference_directory(),
    }
}

/// A session with no geolocation: the CLI has no device to ask.
fn open_session(path: Option<PathBuf>) -> FinderResult<DirectorySession> {
    let (session, _host) =
        reference_session(load_directory(path)?, LocatorMode::Unsupported, Duration::ZERO);
    Ok(session)
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_search(path: Option<PathBuf>, args: SearchArgs) -> FinderResult<()> {
    let mut session = open_session(path)?;

    for tag in &args.specializations {
        if !SPECIALIZATIONS.contains(&tag.as_str()) {
            warn!(tag = %tag, "specialization is not in the filter catalog");
        }
    }

    apply_search_args(&mut session, &args);

    let results = session.filtered_and_sorted();

    if args.json {
        let rendered = serde_json::to_string_pretty(&results).map_err(|e| {
            FinderError::ConfigError {
                reason: format!("failed to render results as JSON: {}", e),
            }
        })?;
        println!("{}", rendered);
        return Ok(());
    }

    let state = session.state();
    println!(
        "{} therapist(s) within {} km, sorted by {} ({} active filter(s))",
        results.len(),
        state.filters.radius_km,
        state.sort_key,
        state.filters.active_count(),
    );
    println!();
    for (rank, provider) in results.iter().enumerate() {
        print_card(rank + 1, provider);
    }
    if results.is_empty() {
        println!("  No therapists match these filters. Try widening the radius.");
    }
    Ok(())
}

/// Install the search flags as the session's filters and sort key.
fn apply_search_args(session: &mut DirectorySession, args: &SearchArgs) {
    session.update_filters(|f| {
        f.radius_km = args.radius;
        f.in_person = !args.no_in_person;
        f.telehealth = !args.no_telehealth;
        f.specializations = args.specializations.iter().cloned().collect();
        f.accepting_new = args.accepting_new;
        f.price_range = PriceRange {
            min: args.price_min,
            max: args.price_max,
        };
    });
    session.set_sort_key(args.sort.into());
}

fn print_card(rank: usize, p: &Provider) {
    println!(
        "  {:>2}. [{}] {:<22} {:>5.1} km  {:.1} ({} reviews)",
        rank,
        p.id,
        p.name,
        p.distance_km,
        p.rating,
        p.review_count,
    );
    println!(
        "      {}  |  {}  |  {}",
        p.headline_specializations().join(", "),
        p.session_labels().join(" + "),
        if p.accepting_new {
            "Accepting new clients"
        } else {
            "Waitlist"
        },
    );
}

fn run_profile(path: Option<PathBuf>, id: &str) -> FinderResult<()> {
    let mut session = open_session(path)?;
    session.select_existing(&ProviderId::new(id))?;
    let Some(p) = session.selected_provider() else {
        return Err(FinderError::UnknownProvider { id: id.to_string() });
    };

    println!("{} ({})", p.name, p.initials());
    println!("  {}", p.credentials);
    println!(
        "  {:.1} ({} reviews){}",
        p.rating,
        p.review_count,
        if p.verified { "  Verified" } else { "" }
    );
    println!();
    println!("  Distance:     {:.1} km", p.distance_km);
    println!("  Sessions:     {}", p.session_labels().join(", "));
    println!(
        "  Accepting:    {}",
        if p.accepting_new { "yes" } else { "no" }
    );
    if let Some(next) = &p.next_available {
        println!("  Next opening: {}", next);
    }
    println!("  Experience:   {} years", p.years_experience);
    println!("  Fee:          {}", p.fee_range);
    println!();
    println!("  About");
    println!("    {}", p.bio);
    println!();
    println!("  Specializations: {}", p.specializations.join(", "));
    println!("  Approaches:      {}", p.modalities.join(", "));
    println!("  Languages:       {}", p.languages.join(", "));
    println!("  Insurance:       {}", p.insurance.join(", "));
    println!();
    println!("  Hours");
    for (day, hours) in p.weekly_schedule() {
        println!("    {:<10} {}", day, hours);
    }
    println!();
    println!("  Contact");
    println!("    Phone:   {}", p.phone);
    println!("    Email:   {}", p.email);
    if let Some(site) = &p.website {
        println!("    Website: {}", site);
    }
    println!("    Address: {}", p.address);
    Ok(())
}

fn run_hotlines(path: Option<PathBuf>) -> FinderResult<()> {
    let session = open_session(path)?;

    println!("If you are in immediate danger, call 911.");
    println!();
    for hotline in session.hotlines() {
        println!("  {}", hotline.name);
        println!("    {}", hotline.description);
        match hotline.dial_hint() {
            Some(hint) => println!("    {} ({}), {}", hotline.action_label(), hint, hotline.hours),
            None => println!("    {}, {}", hotline.action_label(), hotline.hours),
        }
        println!();
    }
    Ok(())
}

fn run_walkthrough() -> FinderResult<()> {
    overlays::run_scenario()?;
    location::run_scenario()?;
    println!("All walkthrough scenarios completed successfully.");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn search_args(argv: &[&str]) -> SearchArgs {
        let mut full = vec!["demo", "search"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Search(args) => args,
            _ => panic!("expected the search subcommand"),
        }
    }

    #[test]
    fn test_negative_radius_is_parsed_and_clamped() {
        let args = search_args(&["--radius", "-5"]);
        assert_eq!(args.radius, -5.0);

        let mut session = open_session(None).unwrap();
        apply_search_args(&mut session, &args);
        assert_eq!(session.state().filters.radius_km, 1.0);
        assert_eq!(session.results_count(), 1);
    }

    #[test]
    fn test_price_flags_are_clamped_and_ordered() {
        let args = search_args(&["--price-min", "400", "--price-max", "120"]);

        let mut session = open_session(None).unwrap();
        apply_search_args(&mut session, &args);
        assert_eq!(
            session.state().filters.price_range,
            PriceRange { min: 120, max: 300 }
        );
        // Price is stored but does not narrow the results.
        assert_eq!(session.results_count(), 9);
    }

    #[test]
    fn test_search_defaults_match_reset_state() {
        let args = search_args(&[]);

        let mut session = open_session(None).unwrap();
        apply_search_args(&mut session, &args);
        assert_eq!(session.state().filters.active_count(), 0);
        assert_eq!(session.state().sort_key, SortKey::Distance);
    }
}
