//! Search criteria chosen in the filter panel.
//!
//! `FilterConfig` is replaced wholesale on every change. Range clamping
//! happens here, at the configuration boundary; the filter engine itself
//! accepts whatever it is given.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Radius slider lower bound, km.
pub const RADIUS_MIN_KM: f64 = 1.0;
/// Radius slider upper bound, km.
pub const RADIUS_MAX_KM: f64 = 50.0;
/// Radius restored by a reset, km.
pub const DEFAULT_RADIUS_KM: f64 = 25.0;
/// One-tap radius buttons, km.
pub const RADIUS_PRESETS_KM: [f64; 3] = [5.0, 10.0, 25.0];

/// Price slider lower bound, dollars per session.
pub const PRICE_MIN: u32 = 0;
/// Price slider upper bound, dollars per session.
pub const PRICE_MAX: u32 = 300;
/// Price slider granularity.
pub const PRICE_STEP: u32 = 10;

/// The specialization tags offered by the filter panel.
pub const SPECIALIZATIONS: [&str; 12] = [
    "Anxiety",
    "Depression",
    "Trauma",
    "PTSD",
    "Burnout",
    "Couples Therapy",
    "Family Therapy",
    "Adolescents",
    "LGBTQ+",
    "Grief",
    "Addiction",
    "Career Counseling",
];

/// Inclusive session price band in whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

impl PriceRange {
    pub const FULL: PriceRange = PriceRange {
        min: PRICE_MIN,
        max: PRICE_MAX,
    };

    /// Clamp both bounds into `[PRICE_MIN, PRICE_MAX]` and order them.
    pub fn clamped(self) -> Self {
        let a = self.min.clamp(PRICE_MIN, PRICE_MAX);
        let b = self.max.clamp(PRICE_MIN, PRICE_MAX);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// The user's active search criteria.
///
/// `insurance`, `languages`, `price_range` and `gender` are collected by the
/// filter panel but not consulted by the filter predicate. Whether they
/// should be is an open product question; see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Search radius in km. Providers exactly at the radius are included.
    pub radius_km: f64,
    /// When false, providers offering only in-person sessions are hidden.
    pub in_person: bool,
    /// When false, providers offering only telehealth sessions are hidden.
    pub telehealth: bool,
    /// Empty means no restriction.
    pub specializations: BTreeSet<String>,
    /// Empty means no restriction.
    pub insurance: String,
    /// Empty means no restriction.
    pub languages: BTreeSet<String>,
    pub price_range: PriceRange,
    /// True restricts results to providers accepting new clients.
    pub accepting_new: bool,
    pub gender: Option<String>,
}

impl Default for FilterConfig {
    /// The documented reset state.
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            in_person: true,
            telehealth: true,
            specializations: BTreeSet::new(),
            insurance: String::new(),
            languages: BTreeSet::new(),
            price_range: PriceRange::FULL,
            accepting_new: false,
            gender: None,
        }
    }
}

impl FilterConfig {
    /// Return a copy with the radius and price bounds forced into the
    /// slider ranges. A non-finite radius falls back to the default.
    pub fn clamped(mut self) -> Self {
        self.radius_km = if self.radius_km.is_nan() {
            DEFAULT_RADIUS_KM
        } else {
            self.radius_km.clamp(RADIUS_MIN_KM, RADIUS_MAX_KM)
        };
        self.price_range = self.price_range.clamped();
        self
    }

    /// Number of criteria that differ from the reset state.
    pub fn active_count(&self) -> usize {
        let defaults = FilterConfig::default();
        [
            self.radius_km != defaults.radius_km,
            self.in_person != defaults.in_person,
            self.telehealth != defaults.telehealth,
            !self.specializations.is_empty(),
            !self.insurance.is_empty(),
            !self.languages.is_empty(),
            self.price_range != defaults.price_range,
            self.accepting_new,
            self.gender.is_some(),
        ]
        .iter()
        .filter(|changed| **changed)
        .count()
    }
}
