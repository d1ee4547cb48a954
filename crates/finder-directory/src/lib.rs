//! # finder-directory
//!
//! TOML-driven loading of the static therapist directory.
//!
//! ## Overview
//!
//! This crate provides [`Directory`], a validated, immutable collection of
//! providers and crisis hotlines. Documents are parsed with `toml` into a
//! [`DirectoryDocument`] and checked against the data-model invariants before
//! anything downstream sees them.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use finder_directory::Directory;
//!
//! let directory = Directory::from_file(Path::new("directories/nyc.toml"))?;
//! let (user_location, providers, hotlines) = directory.into_parts();
//! ```

pub mod document;
pub mod loader;

pub use document::DirectoryDocument;
pub use loader::Directory;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use finder_contracts::{error::FinderError, hotline::ContactType, location::Coordinate};

    use crate::Directory;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// One provider block with the given overrides spliced in.
    fn provider_block(id: &str, extra: &str) -> String {
        let mut block = format!(
            r#"
            [[providers]]
            id = "{id}"
            name = "Dr. Test {id}"
            credentials = "PsyD"
            bio = "Test bio"
            review_count = 10
            lat = 40.75
            lng = -73.98
            in_person = true
            telehealth = false
            accepting_new = true
            phone = "(212) 555-0000"
            email = "test@example.com"
            address = "1 Test St"
            "#
        );
        if !extra.contains("rating") {
            block.push_str("rating = 4.5\n");
        }
        if !extra.contains("distance") {
            block.push_str("distance = 2.5\n");
        }
        block.push_str(extra);
        block.push('\n');
        block
    }

    fn expect_invalid_provider(toml: &str, fragment: &str) {
        match Directory::from_toml_str(toml) {
            Err(FinderError::InvalidProvider { reason, .. }) => {
                assert!(reason.contains(fragment), "expected '{fragment}' in reason, got: {reason}");
            }
            other => panic!("expected InvalidProvider, got {:?}", other),
        }
    }

    // ── 1. happy path ────────────────────────────────────────────────────────

    #[test]
    fn test_loads_providers_and_hotlines() {
        let mut toml = provider_block("1", "specializations = [\"Anxiety\"]\n[providers.schedule]\nMonday = \"9-5\"");
        toml.push_str(
            r#"
            [[hotlines]]
            id = "crisis-text"
            name = "Crisis Text Line"
            description = "Text with a counselor"
            contact = "text"
            number = "741741"
            text_code = "HOME"
            hours = "24/7"
            "#,
        );

        let directory = Directory::from_toml_str(&toml).unwrap();
        assert_eq!(directory.providers().len(), 1);
        assert_eq!(directory.providers()[0].distance_km, 2.5);
        assert_eq!(directory.providers()[0].schedule.get("Monday").map(String::as_str), Some("9-5"));
        assert_eq!(directory.hotlines()[0].contact, ContactType::Text);
        assert_eq!(directory.user_location(), Coordinate::DEFAULT_USER_LOCATION);
    }

    #[test]
    fn test_user_location_override() {
        let toml = r#"
            [user_location]
            lat = 34.05
            lng = -118.24
        "#;
        let directory = Directory::from_toml_str(toml).unwrap();
        assert_eq!(directory.user_location(), Coordinate::new(34.05, -118.24));
        assert!(directory.providers().is_empty());
    }

    // ── 2. provider invariants ───────────────────────────────────────────────

    #[test]
    fn test_rejects_negative_distance() {
        expect_invalid_provider(&provider_block("1", "distance = -0.5"), "non-negative");
    }

    #[test]
    fn test_rejects_rating_out_of_range() {
        expect_invalid_provider(&provider_block("1", "rating = 5.5"), "rating");
    }

    #[test]
    fn test_rejects_duplicate_provider_ids() {
        let toml = format!("{}{}", provider_block("7", ""), provider_block("7", ""));
        expect_invalid_provider(&toml, "duplicate");
    }

    #[test]
    fn test_negative_review_count_is_a_config_error() {
        let toml = provider_block("1", "").replace("review_count = 10", "review_count = -3");
        assert!(matches!(
            Directory::from_toml_str(&toml),
            Err(FinderError::ConfigError { .. })
        ));
    }

    // ── 3. hotline invariants ────────────────────────────────────────────────

    #[test]
    fn test_rejects_text_hotline_without_code() {
        let toml = r#"
            [[hotlines]]
            id = "t"
            name = "Text line"
            description = ""
            contact = "text"
            number = "741741"
            hours = "24/7"
        "#;
        match Directory::from_toml_str(toml) {
            Err(FinderError::ConfigError { reason }) => assert!(reason.contains("text_code")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 4. malformed input ───────────────────────────────────────────────────

    #[test]
    fn test_malformed_toml_is_config_error() {
        match Directory::from_toml_str("[[providers]\nid = ") {
            Err(FinderError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse directory TOML"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Directory::from_file(std::path::Path::new("/nonexistent/directory.toml"));
        assert!(matches!(result, Err(FinderError::ConfigError { .. })));
    }
}
