//! # Core Domain Entities
//!
//! Coordinates, tracking numbers and the package itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InvalidLocation;

/// A point on the routing plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    /// Create a location without validation.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a location, rejecting NaN and infinite coordinates.
    pub fn checked(x: f64, y: f64) -> Result<Self, InvalidLocation> {
        if x.is_finite() && y.is_finite() {
            Ok(Self { x, y })
        } else {
            Err(InvalidLocation { x, y })
        }
    }

    /// Euclidean distance to another location.
    #[must_use]
    pub fn distance_to(&self, other: &Location) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Package identifier issued by the origin office.
///
/// Derived from a millisecond wall-clock read, so it is only unique per
/// issuing office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackingNumber(pub u64);

impl TrackingNumber {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A delivery request travelling through the office mesh.
///
/// Fields are private; once built, a package cannot change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    tracking_number: TrackingNumber,
    destination: Location,
    origin: String,
}

impl Package {
    pub fn new(
        tracking_number: TrackingNumber,
        destination: Location,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            tracking_number,
            destination,
            origin: origin.into(),
        }
    }

    pub fn tracking_number(&self) -> TrackingNumber {
        self.tracking_number
    }

    pub fn destination(&self) -> Location {
        self.destination
    }

    /// Name of the office that issued the tracking number.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}
