//! The view-state controller: the single owner of UI-local state.
//!
//! Every change to filters, sort order, selection, overlays, or the user
//! location goes through a method on `ViewStateController`. Presentation code
//! reads `state()` and never mutates fields directly, which keeps the
//! overlay/escape invariants enforceable in one place:
//!
//!   Escape → close hotlines if open
//!          → else clear the selected provider if any
//!          → else nothing
//!
//! Location results are fenced by a generation counter. Each request takes a
//! fresh `LocationTicket`; only the answer carrying the latest ticket may
//! touch state.

use tracing::{debug, info, warn};

use finder_contracts::{
    filter::FilterConfig,
    location::{Coordinate, LocationError, LocationTicket},
    provider::ProviderId,
    view::{EscapeOutcome, SortKey, ViewState},
};

/// What `apply_location` did with a resolved request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    /// The latest request succeeded; the user location now holds this value.
    Applied(Coordinate),
    /// The latest request failed; the user location is unchanged.
    Failed(LocationError),
    /// A newer request has been issued since this one. Ignored.
    Stale,
}

/// Owner of `ViewState`. All operations are total and synchronous.
#[derive(Debug, Clone, Default)]
pub struct ViewStateController {
    state: ViewState,
    /// Number of location tickets issued so far. The latest ticket is
    /// `LocationTicket(location_generation)`; zero means none issued.
    location_generation: u64,
}

impl ViewStateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a non-default user location (e.g. one from the directory file).
    pub fn with_user_location(user_location: Coordinate) -> Self {
        Self {
            state: ViewState {
                user_location,
                ..ViewState::default()
            },
            location_generation: 0,
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    // ── Filters ──────────────────────────────────────────────────────────────

    /// Replace the filter configuration wholesale, clamping radius and price
    /// into their slider ranges first.
    pub fn set_filters(&mut self, config: FilterConfig) {
        let clamped = config.clamped();
        debug!(
            radius_km = clamped.radius_km,
            in_person = clamped.in_person,
            telehealth = clamped.telehealth,
            accepting_new = clamped.accepting_new,
            specializations = clamped.specializations.len(),
            "filters replaced"
        );
        self.state.filters = clamped;
    }

    /// Edit a copy of the current filters and install it with `set_filters`.
    ///
    /// The edit is atomic: nothing observes the half-edited copy.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterConfig)) {
        let mut next = self.state.filters.clone();
        edit(&mut next);
        self.set_filters(next);
    }

    /// Add `tag` to the specialization filter, or remove it if present.
    ///
    /// Returns true when the tag is active afterwards.
    pub fn toggle_specialization(&mut self, tag: &str) -> bool {
        let specs = &mut self.state.filters.specializations;
        let active = if specs.remove(tag) {
            false
        } else {
            specs.insert(tag.to_string());
            true
        };
        debug!(tag = %tag, active, "specialization toggled");
        active
    }

    /// Restore the documented default filters.
    pub fn reset_filters(&mut self) {
        debug!("filters reset to defaults");
        self.state.filters = FilterConfig::default();
    }

    // ── Sort ─────────────────────────────────────────────────────────────────

    pub fn set_sort_key(&mut self, key: SortKey) {
        debug!(sort_key = %key, "sort key set");
        self.state.sort_key = key;
    }

    // ── Selection & overlays ─────────────────────────────────────────────────

    /// Select a provider (or clear the selection with `None`).
    ///
    /// Allowed while the hotlines panel is open; hotlines stay topmost.
    pub fn select_provider(&mut self, id: Option<ProviderId>) {
        debug!(
            provider = id.as_ref().map(|p| p.as_str()).unwrap_or("<none>"),
            hotlines_visible = self.state.hotlines_visible,
            "provider selection changed"
        );
        self.state.selected_provider = id;
    }

    pub fn open_hotlines(&mut self) {
        debug!("hotlines opened");
        self.state.hotlines_visible = true;
    }

    pub fn close_hotlines(&mut self) {
        debug!("hotlines closed");
        self.state.hotlines_visible = false;
    }

    /// Dismiss the topmost overlay. Hotlines take precedence over the profile.
    pub fn handle_escape(&mut self) -> EscapeOutcome {
        let outcome = if self.state.hotlines_visible {
            self.state.hotlines_visible = false;
            EscapeOutcome::ClosedHotlines
        } else if let Some(provider) = self.state.selected_provider.take() {
            EscapeOutcome::ClearedSelection { provider }
        } else {
            EscapeOutcome::Ignored
        };
        debug!(outcome = ?outcome, "escape handled");
        outcome
    }

    // ── Location ─────────────────────────────────────────────────────────────

    /// Issue a ticket for a new location request. Supersedes all earlier ones.
    pub fn issue_location_ticket(&mut self) -> LocationTicket {
        self.location_generation += 1;
        let ticket = LocationTicket(self.location_generation);
        debug!(ticket = %ticket, "location ticket issued");
        ticket
    }

    /// The most recently issued ticket, if any.
    pub fn latest_location_ticket(&self) -> Option<LocationTicket> {
        (self.location_generation > 0).then_some(LocationTicket(self.location_generation))
    }

    /// Apply the outcome of the request tagged `ticket`.
    ///
    /// Outcomes for superseded tickets are dropped whether they succeeded or
    /// failed. A coordinate outside WGS84 ranges counts as an unavailable
    /// position.
    pub fn apply_location(
        &mut self,
        ticket: LocationTicket,
        outcome: Result<Coordinate, LocationError>,
    ) -> LocationUpdate {
        if self.latest_location_ticket() != Some(ticket) {
            warn!(
                ticket = %ticket,
                latest = self.location_generation,
                "dropping stale location result"
            );
            return LocationUpdate::Stale;
        }

        match outcome {
            Ok(coordinate) if coordinate.is_valid() => {
                info!(ticket = %ticket, location = %coordinate, "user location updated");
                self.state.user_location = coordinate;
                LocationUpdate::Applied(coordinate)
            }
            Ok(coordinate) => {
                warn!(ticket = %ticket, location = %coordinate, "location out of range");
                LocationUpdate::Failed(LocationError::PositionUnavailable)
            }
            Err(error) => {
                warn!(ticket = %ticket, error = %error, "location request failed");
                LocationUpdate::Failed(error)
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use finder_contracts::{
        filter::{FilterConfig, PriceRange},
        location::{Coordinate, LocationError, LocationTicket},
        provider::ProviderId,
        view::{EscapeOutcome, Overlay, SortKey},
    };

    use super::{LocationUpdate, ViewStateController};

    fn pid(id: &str) -> Option<ProviderId> {
        Some(ProviderId::new(id))
    }

    // ── Escape priority ──────────────────────────────────────────────────────

    #[test]
    fn escape_closes_hotlines_before_profile() {
        let mut c = ViewStateController::new();
        c.select_provider(pid("7"));
        c.open_hotlines();
        assert_eq!(c.state().topmost_overlay(), Some(Overlay::Hotlines));

        assert_eq!(c.handle_escape(), EscapeOutcome::ClosedHotlines);
        assert!(!c.state().hotlines_visible);
        assert_eq!(c.state().selected_provider, pid("7"));

        assert_eq!(
            c.handle_escape(),
            EscapeOutcome::ClearedSelection { provider: ProviderId::new("7") }
        );
        assert_eq!(c.state().selected_provider, None);

        assert_eq!(c.handle_escape(), EscapeOutcome::Ignored);
    }

    #[test]
    fn selecting_while_hotlines_open_keeps_hotlines_topmost() {
        let mut c = ViewStateController::new();
        c.open_hotlines();
        c.select_provider(pid("3"));
        assert!(c.state().hotlines_visible);
        assert_eq!(c.state().topmost_overlay(), Some(Overlay::Hotlines));
    }

    // ── Filters ──────────────────────────────────────────────────────────────

    #[test]
    fn toggle_specialization_twice_restores_set() {
        let mut c = ViewStateController::new();
        c.toggle_specialization("Grief");
        let before = c.state().filters.specializations.clone();

        assert!(c.toggle_specialization("Anxiety"));
        assert!(c.state().filters.specializations.contains("Anxiety"));
        assert!(!c.toggle_specialization("Anxiety"));

        assert_eq!(c.state().filters.specializations, before);
    }

    #[test]
    fn reset_restores_documented_defaults() {
        let mut c = ViewStateController::new();
        c.update_filters(|f| {
            f.radius_km = 5.0;
            f.in_person = false;
            f.telehealth = false;
            f.accepting_new = true;
            f.insurance = "Cigna".to_string();
            f.languages.insert("Spanish".to_string());
            f.price_range = PriceRange { min: 50, max: 120 };
            f.gender = Some("any".to_string());
        });
        c.toggle_specialization("PTSD");

        c.reset_filters();
        assert_eq!(c.state().filters, FilterConfig::default());
    }

    #[test]
    fn set_filters_clamps_out_of_range_values() {
        let mut c = ViewStateController::new();
        c.set_filters(FilterConfig {
            radius_km: 0.2,
            price_range: PriceRange { min: 0, max: 900 },
            ..FilterConfig::default()
        });
        assert_eq!(c.state().filters.radius_km, 1.0);
        assert_eq!(c.state().filters.price_range.max, 300);

        c.update_filters(|f| f.radius_km = 75.0);
        assert_eq!(c.state().filters.radius_km, 50.0);
    }

    #[test]
    fn sort_key_is_stored() {
        let mut c = ViewStateController::new();
        c.set_sort_key(SortKey::Rating);
        assert_eq!(c.state().sort_key, SortKey::Rating);
    }

    // ── Location fencing ─────────────────────────────────────────────────────

    #[test]
    fn only_latest_location_ticket_applies() {
        let mut c = ViewStateController::new();
        let first = c.issue_location_ticket();
        let second = c.issue_location_ticket();
        assert!(second > first);

        let brooklyn = Coordinate::new(40.6782, -73.9442);
        let queens = Coordinate::new(40.7282, -73.7949);

        assert_eq!(c.apply_location(second, Ok(brooklyn)), LocationUpdate::Applied(brooklyn));
        // The slower first answer arrives afterwards and must not win.
        assert_eq!(c.apply_location(first, Ok(queens)), LocationUpdate::Stale);
        assert_eq!(c.state().user_location, brooklyn);
    }

    #[test]
    fn stale_failure_is_ignored_and_latest_failure_reported() {
        let mut c = ViewStateController::new();
        let first = c.issue_location_ticket();
        let second = c.issue_location_ticket();

        assert_eq!(
            c.apply_location(first, Err(LocationError::Timeout)),
            LocationUpdate::Stale
        );
        assert_eq!(
            c.apply_location(second, Err(LocationError::PermissionDenied)),
            LocationUpdate::Failed(LocationError::PermissionDenied)
        );
        assert_eq!(c.state().user_location, Coordinate::DEFAULT_USER_LOCATION);
    }

    #[test]
    fn unknown_ticket_before_any_request_is_stale() {
        let mut c = ViewStateController::new();
        assert_eq!(c.latest_location_ticket(), None);
        assert_eq!(
            c.apply_location(LocationTicket(1), Ok(Coordinate::new(1.0, 1.0))),
            LocationUpdate::Stale
        );
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let mut c = ViewStateController::new();
        let t = c.issue_location_ticket();
        assert_eq!(
            c.apply_location(t, Ok(Coordinate::new(120.0, 0.0))),
            LocationUpdate::Failed(LocationError::PositionUnavailable)
        );
    }
}
