//! Provider records: the therapists listed in the directory.
//!
//! Providers are read-only. They are supplied once at startup and the finder
//! never creates, mutates, or deletes one. Distance from the user is a
//! precomputed attribute; nothing in the workspace computes geodesics.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::Coordinate;

/// Opaque, stable identifier for a provider.
///
/// The view state holds one of these as a weak reference into the provider
/// collection; it never owns the record itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of specialization tags shown on a result card.
pub const HEADLINE_SPECIALIZATIONS: usize = 3;

/// Day names in display order for `Provider::weekly_schedule`.
const WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A therapist listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    /// Licence abbreviations, e.g. "PhD, LMFT".
    pub credentials: String,
    pub bio: String,
    /// Average review score in `[0, 5]`.
    pub rating: f64,
    pub review_count: u32,

    pub lat: f64,
    pub lng: f64,
    /// Precomputed distance from the user in kilometres. Never negative.
    #[serde(rename = "distance")]
    pub distance_km: f64,

    #[serde(default)]
    pub specializations: Vec<String>,
    /// Therapeutic approaches, e.g. "CBT", "EMDR".
    #[serde(default)]
    pub modalities: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub insurance: Vec<String>,

    pub in_person: bool,
    pub telehealth: bool,
    pub accepting_new: bool,
    #[serde(default)]
    pub verified: bool,

    /// Free-text label for the next open slot, e.g. "Tomorrow, 2:00 PM".
    #[serde(default)]
    pub next_available: Option<String>,
    #[serde(default)]
    pub years_experience: u32,
    /// Free-text fee band, e.g. "$120-180".
    #[serde(default)]
    pub fee_range: String,
    /// Day name → hours string.
    #[serde(default)]
    pub schedule: BTreeMap<String, String>,

    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    pub address: String,
}

impl Provider {
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Avatar initials: the first character of every name part.
    ///
    /// "Dr. Sarah Chen" → "DSC".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }

    /// The tags shown on a compact result card.
    pub fn headline_specializations(&self) -> &[String] {
        let n = self.specializations.len().min(HEADLINE_SPECIALIZATIONS);
        &self.specializations[..n]
    }

    pub fn has_specialization(&self, tag: &str) -> bool {
        self.specializations.iter().any(|s| s == tag)
    }

    /// Schedule entries Monday through Sunday, followed by any non-standard
    /// keys in their natural order.
    pub fn weekly_schedule(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = WEEK
            .iter()
            .filter_map(|day| {
                self.schedule
                    .get_key_value(*day)
                    .map(|(k, v)| (k.as_str(), v.as_str()))
            })
            .collect();

        entries.extend(
            self.schedule
                .iter()
                .filter(|(k, _)| !WEEK.contains(&k.as_str()))
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        entries
    }

    /// Session-type labels for the profile and cards.
    pub fn session_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::with_capacity(2);
        if self.in_person {
            labels.push("In-person");
        }
        if self.telehealth {
            labels.push("Telehealth");
        }
        labels
    }

    /// Text placed on the clipboard by "Copy Contact".
    pub fn contact_card(&self) -> String {
        format!("{}\n{}", self.phone, self.email)
    }
}
