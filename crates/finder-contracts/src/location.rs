//! Geographic coordinates and the location-request vocabulary.
//!
//! Geolocation is an external capability. The finder only ever consumes its
//! result as a coordinate pair, and tags every request with a
//! `LocationTicket` so that late answers to superseded requests can be told
//! apart from the answer to the latest one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Midtown Manhattan; used until a location request succeeds.
    pub const DEFAULT_USER_LOCATION: Coordinate = Coordinate {
        lat: 40.7580,
        lng: -73.9855,
    };

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::DEFAULT_USER_LOCATION
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Identifier of one outstanding location request.
///
/// Tickets are issued from a monotonically increasing counter. Only the
/// most recently issued ticket may update the user location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationTicket(pub u64);

impl fmt::Display for LocationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a location request did not produce a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationError {
    /// The host has no geolocation capability at all. Reported synchronously.
    #[error("geolocation is not supported by this host")]
    Unsupported,

    /// The user refused the permission prompt.
    #[error("location permission denied")]
    PermissionDenied,

    /// The host could not determine a position.
    #[error("position unavailable")]
    PositionUnavailable,

    /// The host gave up waiting for a position fix.
    #[error("location request timed out")]
    Timeout,
}

impl LocationError {
    /// The message shown to the user for this failure.
    ///
    /// Only two messages exist: one for hosts without the capability, one
    /// for every failure of a capability that does exist.
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Unsupported => "Geolocation is not supported on this device",
            LocationError::PermissionDenied
            | LocationError::PositionUnavailable
            | LocationError::Timeout => "Unable to get location. Please enter manually.",
        }
    }
}
