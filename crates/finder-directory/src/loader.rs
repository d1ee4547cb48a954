//! Loading and validating a directory document.
//!
//! Validation runs once, at load time. After that the collections are
//! immutable for the life of the process and the filter engine can assume
//! every record honours the data-model invariants:
//!
//! 1. distance is finite and ≥ 0
//! 2. rating is within [0, 5]
//! 3. coordinates are inside WGS84 ranges
//! 4. provider ids and hotline ids are unique
//! 5. text hotlines carry a text code

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use finder_contracts::{
    error::{FinderError, FinderResult},
    hotline::{ContactType, HotlineEntry},
    location::Coordinate,
    provider::Provider,
};

use crate::document::DirectoryDocument;

/// A validated, immutable directory.
///
/// ```rust,ignore
/// use finder_directory::Directory;
///
/// let directory = Directory::from_file(Path::new("directories/nyc.toml"))?;
/// ```
#[derive(Debug, Clone)]
pub struct Directory {
    user_location: Coordinate,
    providers: Vec<Provider>,
    hotlines: Vec<HotlineEntry>,
}

impl Directory {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `FinderError::ConfigError` if the TOML is malformed or does
    /// not match `DirectoryDocument`, and `FinderError::InvalidProvider` if a
    /// provider breaks an invariant.
    pub fn from_toml_str(s: &str) -> FinderResult<Self> {
        let document: DirectoryDocument = toml::from_str(s).map_err(|e| FinderError::ConfigError {
            reason: format!("failed to parse directory TOML: {}", e),
        })?;
        Self::from_document(document)
    }

    /// Read the file at `path` and parse it as a directory document.
    pub fn from_file(path: &Path) -> FinderResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FinderError::ConfigError {
            reason: format!("failed to read directory file '{}': {}", path.display(), e),
        })?;
        debug!(path = %path.display(), bytes = contents.len(), "directory file read");
        Self::from_toml_str(&contents)
    }

    /// Validate an already-deserialized document.
    pub fn from_document(document: DirectoryDocument) -> FinderResult<Self> {
        let user_location = match document.user_location {
            Some(location) if !location.is_valid() => {
                return Err(FinderError::ConfigError {
                    reason: format!("user_location ({}) is outside WGS84 ranges", location),
                });
            }
            Some(location) => location,
            None => Coordinate::DEFAULT_USER_LOCATION,
        };

        let mut seen = HashSet::new();
        for provider in &document.providers {
            validate_provider(provider)?;
            if !seen.insert(provider.id.as_str()) {
                warn!(provider = %provider.id, "duplicate provider id");
                return Err(FinderError::InvalidProvider {
                    id: provider.id.to_string(),
                    reason: "duplicate provider id".to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for hotline in &document.hotlines {
            validate_hotline(hotline)?;
            if !seen.insert(hotline.id.as_str()) {
                warn!(hotline = %hotline.id, "duplicate hotline id");
                return Err(FinderError::ConfigError {
                    reason: format!("duplicate hotline id '{}'", hotline.id),
                });
            }
        }

        info!(
            providers = document.providers.len(),
            hotlines = document.hotlines.len(),
            user_location = %user_location,
            "directory loaded"
        );

        Ok(Self {
            user_location,
            providers: document.providers,
            hotlines: document.hotlines,
        })
    }

    pub fn user_location(&self) -> Coordinate {
        self.user_location
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn hotlines(&self) -> &[HotlineEntry] {
        &self.hotlines
    }

    /// Split into owned collections, e.g. to hand to a `DirectorySession`.
    pub fn into_parts(self) -> (Coordinate, Vec<Provider>, Vec<HotlineEntry>) {
        (self.user_location, self.providers, self.hotlines)
    }
}

fn validate_provider(provider: &Provider) -> FinderResult<()> {
    let invalid = |reason: String| {
        warn!(provider = %provider.id, reason = %reason, "rejecting provider");
        Err(FinderError::InvalidProvider {
            id: provider.id.to_string(),
            reason,
        })
    };

    if provider.id.as_str().is_empty() {
        return invalid("empty provider id".to_string());
    }
    if !provider.distance_km.is_finite() || provider.distance_km < 0.0 {
        return invalid(format!("distance {} km must be finite and non-negative", provider.distance_km));
    }
    if !(0.0..=5.0).contains(&provider.rating) {
        return invalid(format!("rating {} outside [0, 5]", provider.rating));
    }
    if !provider.location().is_valid() {
        return invalid(format!("coordinates ({}) outside WGS84 ranges", provider.location()));
    }
    Ok(())
}

fn validate_hotline(hotline: &HotlineEntry) -> FinderResult<()> {
    if hotline.contact == ContactType::Text
        && hotline.text_code.as_deref().map_or(true, str::is_empty)
    {
        return Err(FinderError::ConfigError {
            reason: format!("text hotline '{}' has no text_code", hotline.id),
        });
    }
    if hotline.number.trim().is_empty() {
        return Err(FinderError::ConfigError {
            reason: format!("hotline '{}' has no number", hotline.id),
        });
    }
    Ok(())
}
