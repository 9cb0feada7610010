//! Disaster feed aggregation: dual fetch, normalize, geofilter, merge, cache.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::cache::EventCache;
use crate::eonet::EonetClient;
use crate::error::FeedError;
use crate::phase::LoadPhase;
use crate::quake::QuakeClient;
use crate::sample::sample_events;
use crate::types::{BoundingBox, CachedEvents, DisasterEvent};

/// Aggregator settings, fixed at service construction.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub quake_feed_url: String,
    pub eonet_api_url: String,
    pub bounding_box: BoundingBox,
    /// Cache freshness window in minutes.
    pub cache_minutes: u32,
    /// Cap on the merged event list.
    pub max_events: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            quake_feed_url: "https://earthquake.usgs.gov".to_string(),
            eonet_api_url: "https://eonet.gsfc.nasa.gov".to_string(),
            bounding_box: BoundingBox::default(),
            cache_minutes: 30,
            max_events: 30,
        }
    }
}

/// Keep only events whose location falls inside the box (inclusive).
pub fn geofilter(events: Vec<DisasterEvent>, bbox: BoundingBox) -> Vec<DisasterEvent> {
    events
        .into_iter()
        .filter(|event| bbox.contains(event.location))
        .collect()
}

/// `[quakes..., others...]` truncated to `max`; earlier items win the cap.
pub fn merge_and_cap(
    quakes: Vec<DisasterEvent>,
    others: Vec<DisasterEvent>,
    max: usize,
) -> Vec<DisasterEvent> {
    let mut merged = quakes;
    merged.extend(others);
    merged.truncate(max);
    merged
}

/// Produces the merged, geofiltered, capped event list, serving from the
/// cache slot while it is fresh.
pub struct DisasterService {
    quake: QuakeClient,
    eonet: EonetClient,
    cache: EventCache,
    config: AggregatorConfig,
    phase: Mutex<LoadPhase>,
    /// Serializes loads; a queued caller then observes the fresh cache.
    load_gate: tokio::sync::Mutex<()>,
}

impl DisasterService {
    /// Build a service over the given cache.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn new(config: AggregatorConfig, cache: EventCache) -> Result<Self, FeedError> {
        Ok(Self {
            quake: QuakeClient::new(&config.quake_feed_url)?,
            eonet: EonetClient::new(&config.eonet_api_url)?,
            cache,
            config,
            phase: Mutex::new(LoadPhase::default()),
            load_gate: tokio::sync::Mutex::new(()),
        })
    }

    /// Current load-cycle phase.
    pub fn phase(&self) -> LoadPhase {
        *self.phase.lock()
    }

    /// Load the merged event list.
    ///
    /// Serves the cache while fresh; otherwise fetches both feeds,
    /// normalizes, geofilters, merges, caps, and rewrites the cache. If
    /// either fetch fails the built-in sample list is returned and the
    /// cache is left untouched so the next load retries.
    pub async fn load_events(&self, now: DateTime<Utc>) -> Vec<DisasterEvent> {
        let _gate = self.load_gate.lock().await;

        let max_age = Duration::minutes(i64::from(self.config.cache_minutes));
        if let Some(cached) = self.cache.load() {
            if cached.is_fresh(now, max_age) {
                tracing::debug!(count = cached.events.len(), "Serving disaster events from cache");
                self.advance_phase(LoadPhase::on_ready);
                return cached.events;
            }
            tracing::debug!("Cached disaster events are stale");
        }

        self.advance_phase(LoadPhase::on_load_started);

        let (quakes, eonet) = tokio::join!(
            self.quake.fetch_events(),
            self.eonet
                .fetch_events(self.config.bounding_box, self.config.max_events),
        );

        let (quakes, eonet) = match (quakes, eonet) {
            (Ok(quakes), Ok(eonet)) => (quakes, eonet),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Disaster feed fetch failed: {}", e);
                self.advance_phase(LoadPhase::on_fallback);
                return sample_events(now);
            }
        };

        // quakes come from a global feed and must be geofiltered; the EONET
        // query was box-scoped but is re-checked anyway
        let quakes = geofilter(quakes, self.config.bounding_box);
        let eonet = geofilter(eonet, self.config.bounding_box);
        let events = merge_and_cap(quakes, eonet, self.config.max_events);

        let capture = CachedEvents {
            events: events.clone(),
            captured_at: now,
        };
        if let Err(e) = self.cache.store(&capture) {
            tracing::warn!("Failed to cache disaster events: {}", e);
        }

        tracing::info!(count = events.len(), "Loaded disaster events");
        self.advance_phase(LoadPhase::on_ready);
        events
    }

    /// Drop the cache slot so the next load refetches.
    pub fn invalidate_cache(&self) -> anyhow::Result<()> {
        self.cache.clear()
    }

    fn advance_phase(&self, next: impl FnOnce(LoadPhase) -> LoadPhase) {
        let mut phase = self.phase.lock();
        *phase = next(*phase);
    }
}
