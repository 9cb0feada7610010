//! Disaster feed aggregation for Skywatch.
//!
//! Fetches, normalizes, merges, caches, and filters disaster events from
//! the earthquake and EONET feeds.

pub mod aggregator;
pub mod cache;
pub mod eonet;
pub mod error;
pub mod filter;
pub mod phase;
pub mod quake;
pub mod refresher;
pub mod sample;
pub mod types;

pub use aggregator::{geofilter, merge_and_cap, AggregatorConfig, DisasterService};
pub use cache::EventCache;
pub use eonet::EonetClient;
pub use error::FeedError;
pub use filter::{filter_events, EventStats, RiskLevel, TimeFilter, TypeFilter};
pub use phase::LoadPhase;
pub use quake::QuakeClient;
pub use refresher::{spawn_refresher, RefresherHandle};
pub use sample::sample_events;
pub use types::{BoundingBox, CachedEvents, DisasterEvent, EventCategory, GeoPoint, Severity};
