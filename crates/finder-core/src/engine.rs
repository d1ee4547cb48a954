//! The filter engine: pure predicate composition and ranking.
//!
//! Neither function owns or mutates provider data. Results borrow from the
//! input collection, so re-deriving the view on every change costs one pass
//! and one sort over references.
//!
//! A provider is kept when ALL of these hold:
//!
//!   1. distance ≤ radius (inclusive)
//!   2. the modality exclusion rule does not fire
//!   3. it shares at least one tag with a non-empty specialization filter
//!   4. it accepts new clients, if the user asked for that
//!
//! Insurance, languages, price range and gender are not consulted.

use tracing::debug;

use finder_contracts::{filter::FilterConfig, provider::Provider, view::SortKey};

/// Return the providers that satisfy every active criterion in `config`,
/// in their original relative order.
///
/// Total: never fails. A nonsensical config (negative radius, say) simply
/// yields whatever the comparisons produce.
pub fn filter_providers<'a>(providers: &'a [Provider], config: &FilterConfig) -> Vec<&'a Provider> {
    let kept: Vec<&Provider> = providers.iter().filter(|p| matches(p, config)).collect();

    debug!(
        total = providers.len(),
        kept = kept.len(),
        radius_km = config.radius_km,
        specializations = config.specializations.len(),
        "filtered providers"
    );

    kept
}

/// Return a new ordering of `providers` under `key`. The input slice is
/// left untouched; equal keys keep their input order.
pub fn sort_providers<'a>(providers: &[&'a Provider], key: SortKey) -> Vec<&'a Provider> {
    let mut sorted = providers.to_vec();
    // `sort_by` is stable.
    match key {
        SortKey::Distance => sorted.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km)),
        SortKey::Rating => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    sorted
}

/// True when `provider` passes every predicate.
pub fn matches(provider: &Provider, config: &FilterConfig) -> bool {
    within_radius(provider, config)
        && passes_modality(provider, config)
        && matches_specializations(provider, config)
        && passes_accepting_new(provider, config)
}

/// Inclusive upper bound: a provider exactly at the radius is kept.
pub fn within_radius(provider: &Provider, config: &FilterConfig) -> bool {
    provider.distance_km <= config.radius_km
}

/// Hide single-modality providers whose only modality the user switched off.
///
/// Providers offering both modalities, or neither, always pass.
pub fn passes_modality(provider: &Provider, config: &FilterConfig) -> bool {
    let in_person_only = provider.in_person && !provider.telehealth;
    let telehealth_only = provider.telehealth && !provider.in_person;

    !(!config.in_person && in_person_only) && !(!config.telehealth && telehealth_only)
}

/// Non-empty filter set: at least one tag in common. Empty set: everyone.
pub fn matches_specializations(provider: &Provider, config: &FilterConfig) -> bool {
    config.specializations.is_empty()
        || config
            .specializations
            .iter()
            .any(|tag| provider.has_specialization(tag))
}

/// `accepting_new = false` never excludes anyone.
pub fn passes_accepting_new(provider: &Provider, config: &FilterConfig) -> bool {
    !config.accepting_new || provider.accepting_new
}

// ── Tests ────────────────────────────────────────────────────────────────────
