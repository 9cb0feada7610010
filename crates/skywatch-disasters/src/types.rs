use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Normalized event categories; provider-defined strings collapse onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventCategory {
    Earthquake,
    Wildfire,
    Storm,
    Flood,
    Volcano,
    Other,
}

impl EventCategory {
    /// Stable uppercase tag used in serialized events and list display.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Earthquake => "EARTHQUAKE",
            Self::Wildfire => "WILDFIRE",
            Self::Storm => "STORM",
            Self::Flood => "FLOOD",
            Self::Volcano => "VOLCANO",
            Self::Other => "OTHER",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Earthquake => "Earthquake",
            Self::Wildfire => "Wildfire",
            Self::Storm => "Storm",
            Self::Flood => "Flood",
            Self::Volcano => "Volcano",
            Self::Other => "Other",
        }
    }

    /// Map a provider category string (EONET id or title) onto the fixed set.
    pub fn from_provider(label: &str) -> Self {
        match label {
            "wildfires" | "Wildfires" => Self::Wildfire,
            "severeStorms" | "Severe Storms" => Self::Storm,
            "floods" | "Floods" => Self::Flood,
            "volcanoes" | "Volcanoes" => Self::Volcano,
            _ => Self::Other,
        }
    }
}

/// Coarse severity buckets derived from provider fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    /// Bucket an earthquake magnitude. Boundary values resolve upward.
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 5.0 {
            Self::High
        } else if magnitude >= 3.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A rectangular geographic region with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Inclusive containment check on both axes.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        // Kazakhstan and surroundings
        Self::new(40.0, 56.0, 46.0, 88.0)
    }
}

/// A single normalized disaster event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterEvent {
    pub category: EventCategory,
    pub description: String,
    pub severity: Severity,
    pub updated_at: DateTime<Utc>,
    pub location: GeoPoint,
}

/// One cache slot: the merged event list plus its capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEvents {
    pub events: Vec<DisasterEvent>,
    pub captured_at: DateTime<Utc>,
}

impl CachedEvents {
    /// True while the capture is younger than `max_age`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.captured_at) < max_age
    }
}
