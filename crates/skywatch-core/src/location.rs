//! Position resolution with a fixed-coordinate fallback.
//!
//! The dashboard centers its map and weather lookups on the user's position
//! when a platform location source is available, and on a configured fallback
//! point otherwise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Location service errors
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Trait for position providers.
///
/// Platform integrations (browser geolocation, GeoClue, ...) implement this;
/// `FixedLocation` is the built-in implementation used when none is wired up.
///
/// Note: Implementations don't need to be Sync - callers resolve a position
/// once at startup or per refresh, not concurrently.
pub trait LocationSource: Send {
    /// Whether a position can be requested at all.
    fn is_available(&self) -> bool;

    /// Resolve the current position.
    ///
    /// # Errors
    /// Returns `LocationError::PermissionDenied` if the user refused access,
    /// `LocationError::ServiceUnavailable` if no positioning backend exists.
    fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// A location source that always reports the same point.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

impl LocationSource for FixedLocation {
    fn is_available(&self) -> bool {
        true
    }

    fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

/// Resolve a position, falling back to a fixed point on any failure.
///
/// Every failure mode (denied, unavailable, timeout) degrades to the fallback
/// so the dashboard always has a center to work with.
pub fn resolve_or_fallback(source: &dyn LocationSource, fallback: Coordinates) -> Coordinates {
    if !source.is_available() {
        tracing::debug!("Location source unavailable, using fallback position");
        return fallback;
    }

    match source.current_position() {
        Ok(position) => position,
        Err(e) => {
            tracing::warn!("Location resolution failed ({}), using fallback position", e);
            fallback
        }
    }
}
