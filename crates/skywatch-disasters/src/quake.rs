//! Earthquake summary feed client (USGS GeoJSON).

use std::time::Duration;

use chrono::DateTime;
use serde::Deserialize;
use tracing::instrument;

use crate::error::FeedError;
use crate::types::{DisasterEvent, EventCategory, GeoPoint, Severity};

/// Summary feed for magnitude 2.5+ quakes over the past 7 days.
const FEED_PATH: &str = "/earthquakes/feed/v1.0/summary/2.5_week.geojson";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct QuakeClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct QuakeFeed {
    #[serde(default)]
    features: Vec<QuakeFeature>,
}

#[derive(Debug, Deserialize)]
struct QuakeFeature {
    properties: QuakeProperties,
    geometry: Option<QuakeGeometry>,
}

#[derive(Debug, Deserialize)]
struct QuakeProperties {
    mag: Option<f64>,
    title: Option<String>,
    /// Event time in epoch milliseconds.
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct QuakeGeometry {
    /// `[longitude, latitude, depth]`
    #[serde(default)]
    coordinates: Vec<f64>,
}

impl QuakeClient {
    /// Create a client against the given feed host.
    pub fn new(base_url: &str) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch recent earthquakes, normalized. Records missing a magnitude,
    /// time, or coordinates are dropped.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_events(&self) -> Result<Vec<DisasterEvent>, FeedError> {
        let url = format!("{}{}", self.base_url, FEED_PATH);
        let response = self.client.get(&url).send().await?;
        let feed: QuakeFeed = self.handle_response(response).await?;

        let events: Vec<DisasterEvent> =
            feed.features.into_iter().filter_map(normalize).collect();
        tracing::debug!(count = events.len(), "Fetched earthquake events");
        Ok(events)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FeedError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| FeedError::Parse(format!("JSON parse error: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(FeedError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn normalize(feature: QuakeFeature) -> Option<DisasterEvent> {
    let magnitude = feature.properties.mag?;
    let time_ms = feature.properties.time?;
    let updated_at = DateTime::from_timestamp_millis(time_ms)?;

    let geometry = feature.geometry?;
    let (longitude, latitude) = match geometry.coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => return None,
    };

    Some(DisasterEvent {
        category: EventCategory::Earthquake,
        description: feature
            .properties
            .title
            .unwrap_or_else(|| format!("M {:.1} earthquake", magnitude)),
        severity: Severity::from_magnitude(magnitude),
        updated_at,
        location: GeoPoint::new(latitude, longitude),
    })
}
