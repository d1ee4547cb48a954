//! UI-local session state and the vocabulary of its transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{filter::FilterConfig, location::Coordinate, provider::ProviderId};

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Nearest first.
    #[default]
    Distance,
    /// Highest rated first.
    Rating,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Distance => "Distance",
            SortKey::Rating => "Rating",
        }
    }

    /// The other key; used by a single "cycle sort" binding.
    pub fn toggled(self) -> Self {
        match self {
            SortKey::Distance => SortKey::Rating,
            SortKey::Rating => SortKey::Distance,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A dismissible surface layered over the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Overlay {
    /// The selected provider's profile.
    Profile,
    /// The crisis hotlines panel.
    Hotlines,
}

/// What a single Escape press did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscapeOutcome {
    ClosedHotlines,
    ClearedSelection { provider: ProviderId },
    Ignored,
}

/// Everything the presentation layer may observe about the session.
///
/// Mutated only through `ViewStateController`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Weak reference into the provider collection.
    pub selected_provider: Option<ProviderId>,
    pub hotlines_visible: bool,
    pub sort_key: SortKey,
    pub filters: FilterConfig,
    pub user_location: Coordinate,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_provider: None,
            hotlines_visible: false,
            sort_key: SortKey::default(),
            filters: FilterConfig::default(),
            user_location: Coordinate::DEFAULT_USER_LOCATION,
        }
    }
}

impl ViewState {
    /// The surface Escape would dismiss. Hotlines always win over a profile.
    pub fn topmost_overlay(&self) -> Option<Overlay> {
        if self.hotlines_visible {
            Some(Overlay::Hotlines)
        } else if self.selected_provider.is_some() {
            Some(Overlay::Profile)
        } else {
            None
        }
    }
}
