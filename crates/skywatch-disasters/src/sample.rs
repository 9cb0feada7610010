//! Built-in fallback events, shown when either live feed is unreachable.

use chrono::{DateTime, Duration, Utc};

use crate::types::{DisasterEvent, EventCategory, GeoPoint, Severity};

/// The fixed two-item sample list. Timestamps are relative to `now` so the
/// time filters behave sensibly against it.
pub fn sample_events(now: DateTime<Utc>) -> Vec<DisasterEvent> {
    vec![
        DisasterEvent {
            category: EventCategory::Earthquake,
            description: "Minor earthquake in Almaty".to_string(),
            severity: Severity::Moderate,
            updated_at: now,
            location: GeoPoint::new(43.2, 76.9),
        },
        DisasterEvent {
            category: EventCategory::Flood,
            description: "Flash flood in Astana".to_string(),
            severity: Severity::High,
            updated_at: now - Duration::hours(24),
            location: GeoPoint::new(51.1, 71.4),
        },
    ]
}
