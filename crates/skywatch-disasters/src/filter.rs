//! Pure filtering and derived statistics over event lists.
//!
//! No I/O, no hidden state: identical inputs (including `now`) give
//! identical output.

use chrono::{DateTime, Duration, Utc};

use crate::types::{DisasterEvent, EventCategory};

/// Category filter: everything, or one exact category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(EventCategory),
}

/// Recency filter, measured back from the caller's `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    All,
    Last24Hours,
    Last7Days,
}

impl TimeFilter {
    fn window(self) -> Option<Duration> {
        match self {
            Self::All => None,
            Self::Last24Hours => Some(Duration::hours(24)),
            Self::Last7Days => Some(Duration::days(7)),
        }
    }
}

/// Apply both filters (AND), preserving input order.
pub fn filter_events(
    events: &[DisasterEvent],
    type_filter: TypeFilter,
    time_filter: TimeFilter,
    now: DateTime<Utc>,
) -> Vec<DisasterEvent> {
    events
        .iter()
        .filter(|event| matches_type(event, type_filter) && matches_time(event, time_filter, now))
        .cloned()
        .collect()
}

fn matches_type(event: &DisasterEvent, filter: TypeFilter) -> bool {
    match filter {
        TypeFilter::All => true,
        TypeFilter::Only(category) => event.category == category,
    }
}

fn matches_time(event: &DisasterEvent, filter: TimeFilter, now: DateTime<Utc>) -> bool {
    match filter.window() {
        None => true,
        Some(window) => now.signed_duration_since(event.updated_at) < window,
    }
}

/// Coarse risk label over a filtered list, from count thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_count(count: usize) -> Self {
        if count > 10 {
            Self::High
        } else if count > 3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived statistics for display next to the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStats {
    pub total: usize,
    pub risk: RiskLevel,
}

impl EventStats {
    pub fn from_events(events: &[DisasterEvent]) -> Self {
        Self {
            total: events.len(),
            risk: RiskLevel::from_count(events.len()),
        }
    }
}
