//! Directory document schema.
//!
//! A `DirectoryDocument` is deserialized from TOML and holds the static
//! provider and hotline collections for one deployment.
//!
//! Example:
//! ```toml
//! [user_location]
//! lat = 40.7580
//! lng = -73.9855
//!
//! [[providers]]
//! id = "1"
//! name = "Dr. Sarah Chen"
//! credentials = "PhD, Licensed Psychologist"
//! bio = "..."
//! rating = 4.9
//! review_count = 127
//! lat = 40.7614
//! lng = -73.9776
//! distance = 0.8
//! specializations = ["Anxiety", "Depression"]
//! in_person = true
//! telehealth = true
//! accepting_new = true
//! phone = "(212) 555-0123"
//! email = "dr.chen@example.com"
//! address = "123 Park Ave, New York, NY"
//!
//! [providers.schedule]
//! Monday = "9:00 AM - 5:00 PM"
//!
//! [[hotlines]]
//! id = "988"
//! name = "988 Suicide & Crisis Lifeline"
//! description = "..."
//! contact = "call"
//! number = "988"
//! hours = "24/7"
//! ```

use serde::{Deserialize, Serialize};

use finder_contracts::{hotline::HotlineEntry, location::Coordinate, provider::Provider};

/// The top-level structure deserialized from a directory file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryDocument {
    /// Starting user location. Falls back to the default when absent.
    #[serde(default)]
    pub user_location: Option<Coordinate>,

    #[serde(default)]
    pub providers: Vec<Provider>,

    #[serde(default)]
    pub hotlines: Vec<HotlineEntry>,
}
