//! `DirectorySession`: what the presentation layer talks to.
//!
//! The session owns the immutable provider and hotline collections, the
//! `ViewStateController`, and the host capabilities. It derives the visible
//! result list on demand (filter, then sort) and turns capability outcomes
//! into toasts. There is no cache: every read re-derives from source state.

use tracing::{debug, info, warn};

use finder_contracts::{
    error::{FinderError, FinderResult},
    filter::FilterConfig,
    hotline::HotlineEntry,
    location::{Coordinate, LocationError, LocationTicket},
    notify::Toast,
    provider::{Provider, ProviderId},
    view::{EscapeOutcome, Overlay, SortKey, ViewState},
};

use crate::{
    controller::{LocationUpdate, ViewStateController},
    engine::{filter_providers, sort_providers},
    traits::{Clipboard, LocationService, Notifier},
};

/// Prefix for profile links placed on the clipboard by "Share".
pub const SHARE_LINK_PREFIX: &str = "therapist-finder://provider/";

/// A browsing session over a fixed directory.
pub struct DirectorySession {
    providers: Vec<Provider>,
    hotlines: Vec<HotlineEntry>,
    controller: ViewStateController,
    locator: Box<dyn LocationService>,
    clipboard: Box<dyn Clipboard>,
    notifier: Box<dyn Notifier>,
}

impl DirectorySession {
    /// Create a session with default view state.
    pub fn new(
        providers: Vec<Provider>,
        hotlines: Vec<HotlineEntry>,
        locator: Box<dyn LocationService>,
        clipboard: Box<dyn Clipboard>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        info!(
            providers = providers.len(),
            hotlines = hotlines.len(),
            "directory session started"
        );
        Self {
            providers,
            hotlines,
            controller: ViewStateController::new(),
            locator,
            clipboard,
            notifier,
        }
    }

    /// Override the starting user location.
    pub fn with_user_location(mut self, user_location: Coordinate) -> Self {
        self.controller = ViewStateController::with_user_location(user_location);
        self
    }

    // ── Observations ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn hotlines(&self) -> &[HotlineEntry] {
        &self.hotlines
    }

    /// The filtered result set, ordered by the active sort key.
    pub fn filtered_and_sorted(&self) -> Vec<&Provider> {
        let state = self.controller.state();
        let filtered = filter_providers(&self.providers, &state.filters);
        sort_providers(&filtered, state.sort_key)
    }

    /// Size of the filtered (pre-sort) result set.
    pub fn results_count(&self) -> usize {
        filter_providers(&self.providers, &self.controller.state().filters).len()
    }

    pub fn provider(&self, id: &ProviderId) -> Option<&Provider> {
        self.providers.iter().find(|p| &p.id == id)
    }

    /// Resolve the selected id against the collection. An id that is not in
    /// the collection resolves to `None`.
    pub fn selected_provider(&self) -> Option<&Provider> {
        self.controller
            .state()
            .selected_provider
            .as_ref()
            .and_then(|id| self.provider(id))
    }

    pub fn topmost_overlay(&self) -> Option<Overlay> {
        self.controller.state().topmost_overlay()
    }

    /// The emergency button is hidden while the hotlines panel is open.
    pub fn sos_visible(&self) -> bool {
        !self.controller.state().hotlines_visible
    }

    // ── Forwarded state transitions ──────────────────────────────────────────

    pub fn set_filters(&mut self, config: FilterConfig) {
        self.controller.set_filters(config);
    }

    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterConfig)) {
        self.controller.update_filters(edit);
    }

    pub fn toggle_specialization(&mut self, tag: &str) -> bool {
        self.controller.toggle_specialization(tag)
    }

    /// Restore the default filters and say so.
    pub fn reset_filters(&mut self) {
        self.controller.reset_filters();
        self.notifier.notify(Toast::info("Filters reset"));
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.controller.set_sort_key(key);
    }

    pub fn select_provider(&mut self, id: Option<ProviderId>) {
        self.controller.select_provider(id);
    }

    /// Select by id, refusing ids that are not in the directory.
    pub fn select_existing(&mut self, id: &ProviderId) -> FinderResult<()> {
        if self.provider(id).is_none() {
            return Err(FinderError::UnknownProvider { id: id.to_string() });
        }
        self.controller.select_provider(Some(id.clone()));
        Ok(())
    }

    pub fn open_hotlines(&mut self) {
        self.controller.open_hotlines();
    }

    pub fn close_hotlines(&mut self) {
        self.controller.close_hotlines();
    }

    pub fn handle_escape(&mut self) -> EscapeOutcome {
        self.controller.handle_escape()
    }

    // ── Location ─────────────────────────────────────────────────────────────

    /// Ask the host for the user's position.
    ///
    /// Returns the ticket of the outstanding request, or `None` when the host
    /// reported synchronously that it cannot locate at all. Does not block.
    pub fn request_location(&mut self) -> Option<LocationTicket> {
        let ticket = self.controller.issue_location_ticket();

        match self.locator.request_location(ticket) {
            Ok(()) => {
                debug!(ticket = %ticket, "location request outstanding");
                self.notifier.notify(Toast::loading("Getting your location..."));
                Some(ticket)
            }
            Err(error) => {
                warn!(ticket = %ticket, error = %error, "location request rejected by host");
                self.notifier.notify(Toast::error(error.user_message()));
                None
            }
        }
    }

    /// Deliver the outcome of an earlier `request_location`.
    ///
    /// Stale outcomes are dropped without a toast.
    pub fn resolve_location(
        &mut self,
        ticket: LocationTicket,
        outcome: Result<Coordinate, LocationError>,
    ) -> LocationUpdate {
        let update = self.controller.apply_location(ticket, outcome);
        match &update {
            LocationUpdate::Applied(_) => self.notifier.notify(Toast::success("Location updated!")),
            LocationUpdate::Failed(error) => self.notifier.notify(Toast::error(error.user_message())),
            LocationUpdate::Stale => {}
        }
        update
    }

    // ── Clipboard ────────────────────────────────────────────────────────────

    /// Copy the selected provider's phone and email. No-op without a selection.
    pub fn copy_contact(&self) -> FinderResult<()> {
        let Some(provider) = self.selected_provider() else {
            return Ok(());
        };
        self.write_clipboard(&provider.contact_card(), "Contact information copied!")
    }

    /// Copy a link to the selected provider's profile. No-op without a selection.
    pub fn share_profile(&self) -> FinderResult<()> {
        let Some(provider) = self.selected_provider() else {
            return Ok(());
        };
        let link = format!("{}{}", SHARE_LINK_PREFIX, provider.id);
        self.write_clipboard(&link, "Share link copied!")
    }

    fn write_clipboard(&self, text: &str, success: &str) -> FinderResult<()> {
        match self.clipboard.write_text(text) {
            Ok(()) => {
                self.notifier.notify(Toast::success(success));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.notifier.notify(Toast::error("Could not copy to clipboard"));
                Err(e)
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use finder_contracts::{
        error::{FinderError, FinderResult},
        filter::{FilterConfig, PriceRange},
        location::{Coordinate, LocationError, LocationTicket},
        notify::{Toast, ToastLevel},
        provider::{Provider, ProviderId},
        view::{EscapeOutcome, Overlay, SortKey},
    };

    use crate::{
        controller::LocationUpdate,
        traits::{Clipboard, LocationService, Notifier},
    };

    use super::{DirectorySession, SHARE_LINK_PREFIX};

    // ── Mock capabilities ────────────────────────────────────────────────────

    /// Records every ticket it is asked for; optionally refuses outright.
    struct MockLocator {
        supported: bool,
        requested: Arc<Mutex<Vec<LocationTicket>>>,
    }

    impl LocationService for MockLocator {
        fn request_location(&self, ticket: LocationTicket) -> Result<(), LocationError> {
            if !self.supported {
                return Err(LocationError::Unsupported);
            }
            self.requested.lock().unwrap().push(ticket);
            Ok(())
        }
    }

    struct MockClipboard {
        fail: bool,
        contents: Arc<Mutex<Option<String>>>,
    }

    impl Clipboard for MockClipboard {
        fn write_text(&self, text: &str) -> FinderResult<()> {
            if self.fail {
                return Err(FinderError::ClipboardFailed { reason: "denied".to_string() });
            }
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    struct MockNotifier {
        toasts: Arc<Mutex<Vec<Toast>>>,
    }

    impl Notifier for MockNotifier {
        fn notify(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }
    }

    struct Harness {
        session: DirectorySession,
        requested: Arc<Mutex<Vec<LocationTicket>>>,
        clipboard: Arc<Mutex<Option<String>>>,
        toasts: Arc<Mutex<Vec<Toast>>>,
    }

    impl Harness {
        fn last_toast(&self) -> Option<(ToastLevel, String)> {
            self.toasts
                .lock()
                .unwrap()
                .last()
                .map(|t| (t.level, t.message.clone()))
        }
    }

    fn provider(id: &str, distance_km: f64, rating: f64, accepting_new: bool) -> Provider {
        Provider {
            id: ProviderId::new(id),
            name: format!("Provider {}", id),
            credentials: "LMHC".to_string(),
            bio: String::new(),
            rating,
            review_count: 3,
            lat: 40.7,
            lng: -73.9,
            distance_km,
            specializations: vec!["Anxiety".to_string()],
            modalities: vec![],
            languages: vec![],
            insurance: vec![],
            in_person: true,
            telehealth: true,
            accepting_new,
            verified: true,
            next_available: None,
            years_experience: 4,
            fee_range: String::new(),
            schedule: BTreeMap::new(),
            phone: format!("555-010{}", id),
            email: format!("p{}@example.com", id),
            website: None,
            address: String::new(),
        }
    }

    fn harness(supported: bool, clipboard_fails: bool) -> Harness {
        let requested = Arc::new(Mutex::new(vec![]));
        let clipboard = Arc::new(Mutex::new(None));
        let toasts = Arc::new(Mutex::new(vec![]));

        let session = DirectorySession::new(
            vec![
                provider("1", 8.0, 4.2, true),
                provider("2", 2.0, 4.9, false),
                provider("3", 30.0, 5.0, true),
                provider("4", 2.0, 3.1, true),
            ],
            vec![],
            Box::new(MockLocator { supported, requested: requested.clone() }),
            Box::new(MockClipboard { fail: clipboard_fails, contents: clipboard.clone() }),
            Box::new(MockNotifier { toasts: toasts.clone() }),
        );

        Harness { session, requested, clipboard, toasts }
    }

    fn ids(providers: &[&Provider]) -> Vec<String> {
        providers.iter().map(|p| p.id.0.clone()).collect()
    }

    // ── Serialized state ─────────────────────────────────────────────────────

    #[test]
    fn view_state_serializes_for_snapshots() {
        let mut h = harness(true, false);
        h.session.set_sort_key(SortKey::Rating);
        h.session.toggle_specialization("Anxiety");
        h.session.select_provider(Some(ProviderId::new("2")));

        let json = serde_json::to_value(h.session.state()).unwrap();
        assert_eq!(json["sort_key"], "rating");
        assert_eq!(json["selected_provider"], "2");
        assert_eq!(json["hotlines_visible"], false);
        assert_eq!(json["filters"]["radius_km"], 25.0);
        assert_eq!(json["filters"]["specializations"][0], "Anxiety");
    }

    #[test]
    fn reset_filters_restores_defaults_with_info_toast() {
        let mut h = harness(true, false);
        h.session.update_filters(|f| {
            f.radius_km = 5.0;
            f.price_range = PriceRange { min: 40, max: 120 };
        });
        h.session.reset_filters();

        assert_eq!(h.session.state().filters, FilterConfig::default());
        assert_eq!(
            h.last_toast(),
            Some((ToastLevel::Info, "Filters reset".to_string()))
        );
    }

    // ── Derived view ─────────────────────────────────────────────────────────

    #[test]
    fn derived_view_tracks_filters_and_sort() {
        let mut h = harness(true, false);

        // Default radius 25 km drops provider 3.
        assert_eq!(ids(&h.session.filtered_and_sorted()), vec!["2", "4", "1"]);
        assert_eq!(h.session.results_count(), 3);

        h.session.set_sort_key(SortKey::Rating);
        assert_eq!(ids(&h.session.filtered_and_sorted()), vec!["2", "1", "4"]);

        h.session.update_filters(|f| f.accepting_new = true);
        assert_eq!(ids(&h.session.filtered_and_sorted()), vec!["1", "4"]);
        assert_eq!(h.session.results_count(), 2);

        h.session.update_filters(|f| f.radius_km = 50.0);
        assert_eq!(ids(&h.session.filtered_and_sorted()), vec!["3", "1", "4"]);
    }

    #[test]
    fn selection_resolves_weakly() {
        let mut h = harness(true, false);
        h.session.select_provider(Some(ProviderId::new("gone")));
        assert!(h.session.selected_provider().is_none());
        assert_eq!(h.session.topmost_overlay(), Some(Overlay::Profile));

        assert!(matches!(
            h.session.select_existing(&ProviderId::new("gone")),
            Err(FinderError::UnknownProvider { .. })
        ));

        h.session.select_existing(&ProviderId::new("2")).unwrap();
        assert_eq!(h.session.selected_provider().map(|p| p.id.as_str()), Some("2"));
    }

    #[test]
    fn sos_hidden_while_hotlines_open() {
        let mut h = harness(true, false);
        assert!(h.session.sos_visible());
        h.session.open_hotlines();
        assert!(!h.session.sos_visible());
        assert_eq!(h.session.handle_escape(), EscapeOutcome::ClosedHotlines);
        assert!(h.session.sos_visible());
    }

    // ── Location ─────────────────────────────────────────────────────────────

    #[test]
    fn unsupported_host_fails_immediately() {
        let mut h = harness(false, false);
        assert_eq!(h.session.request_location(), None);
        assert_eq!(
            h.last_toast(),
            Some((ToastLevel::Error, "Geolocation is not supported on this device".to_string()))
        );
    }

    #[test]
    fn location_flow_toasts_and_fences_stale_results() {
        let mut h = harness(true, false);

        let first = h.session.request_location().unwrap();
        assert_eq!(
            h.last_toast(),
            Some((ToastLevel::Loading, "Getting your location...".to_string()))
        );
        let second = h.session.request_location().unwrap();
        assert_eq!(*h.requested.lock().unwrap(), vec![first, second]);

        // Filters stay responsive while requests are outstanding.
        h.session.update_filters(|f| f.radius_km = 5.0);
        assert_eq!(h.session.results_count(), 2);

        let here = Coordinate::new(40.73, -73.99);
        assert_eq!(h.session.resolve_location(second, Ok(here)), LocationUpdate::Applied(here));
        assert_eq!(
            h.last_toast(),
            Some((ToastLevel::Success, "Location updated!".to_string()))
        );

        let toast_count = h.toasts.lock().unwrap().len();
        assert_eq!(
            h.session.resolve_location(first, Err(LocationError::Timeout)),
            LocationUpdate::Stale
        );
        assert_eq!(h.toasts.lock().unwrap().len(), toast_count, "stale results are silent");
        assert_eq!(h.session.state().user_location, here);
    }

    #[test]
    fn denied_location_reports_manual_entry_message() {
        let mut h = harness(true, false);
        let t = h.session.request_location().unwrap();
        h.session.resolve_location(t, Err(LocationError::PermissionDenied));
        assert_eq!(
            h.last_toast(),
            Some((ToastLevel::Error, "Unable to get location. Please enter manually.".to_string()))
        );
    }

    // ── Clipboard ────────────────────────────────────────────────────────────

    #[test]
    fn copy_contact_writes_phone_and_email() {
        let mut h = harness(true, false);

        // No selection: nothing happens.
        h.session.copy_contact().unwrap();
        assert!(h.clipboard.lock().unwrap().is_none());
        assert!(h.toasts.lock().unwrap().is_empty());

        h.session.select_existing(&ProviderId::new("1")).unwrap();
        h.session.copy_contact().unwrap();
        assert_eq!(
            h.clipboard.lock().unwrap().as_deref(),
            Some("555-0101\np1@example.com")
        );
        assert_eq!(
            h.last_toast(),
            Some((ToastLevel::Success, "Contact information copied!".to_string()))
        );
    }

    #[test]
    fn share_profile_copies_link() {
        let mut h = harness(true, false);
        h.session.select_existing(&ProviderId::new("4")).unwrap();
        h.session.share_profile().unwrap();
        assert_eq!(
            h.clipboard.lock().unwrap().clone(),
            Some(format!("{}4", SHARE_LINK_PREFIX))
        );
        assert_eq!(h.last_toast().map(|(_, m)| m), Some("Share link copied!".to_string()));
    }

    #[test]
    fn clipboard_failure_surfaces_error_toast() {
        let mut h = harness(true, true);
        h.session.select_existing(&ProviderId::new("1")).unwrap();
        let result = h.session.copy_contact();
        assert!(matches!(result, Err(FinderError::ClipboardFailed { .. })));
        assert_eq!(h.last_toast().map(|(l, _)| l), Some(ToastLevel::Error));
    }
}
