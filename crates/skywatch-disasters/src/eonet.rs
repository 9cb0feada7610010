//! EONET open-events feed client (NASA Earth Observatory).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::error::FeedError;
use crate::types::{BoundingBox, DisasterEvent, EventCategory, GeoPoint, Severity};

const EVENTS_PATH: &str = "/api/v3/events";

/// Fixed category scope for the dashboard.
const CATEGORIES: &str = "wildfires,severeStorms";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct EonetClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EonetResponse {
    #[serde(default)]
    events: Vec<EonetEvent>,
}

#[derive(Debug, Deserialize)]
struct EonetEvent {
    title: Option<String>,
    #[serde(default)]
    categories: Vec<EonetCategory>,
    #[serde(default)]
    geometry: Vec<EonetGeometry>,
}

#[derive(Debug, Deserialize)]
struct EonetCategory {
    id: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EonetGeometry {
    date: Option<String>,
    /// Point events carry `[lon, lat]`; polygon shapes are skipped.
    coordinates: Option<serde_json::Value>,
}

impl EonetClient {
    /// Create a client against the given API host.
    pub fn new(base_url: &str) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch open wildfire and storm events inside the box, normalized.
    /// Events without a usable geometry entry are dropped.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_events(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<DisasterEvent>, FeedError> {
        let url = format!(
            "{}{}?category={}&status=open&limit={}&bbox={},{},{},{}",
            self.base_url,
            EVENTS_PATH,
            CATEGORIES,
            limit,
            bbox.min_lon,
            bbox.min_lat,
            bbox.max_lon,
            bbox.max_lat,
        );

        let response = self.client.get(&url).send().await?;
        let resp: EonetResponse = self.handle_response(response).await?;

        let events: Vec<DisasterEvent> = resp.events.into_iter().filter_map(normalize).collect();
        tracing::debug!(count = events.len(), "Fetched EONET events");
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

fn normalize(event: EonetEvent) -> Option<DisasterEvent> {
    // the last geometry entry is the most recent position report
    let geometry = event.geometry.last()?;
    let date = geometry.date.as_deref()?;
    let updated_at = DateTime::parse_from_rfc3339(date)
        .ok()?
        .with_timezone(&Utc);
    let location = point_from(geometry.coordinates.as_ref()?)?;

    let category = event
        .categories
        .first()
        .map(category_of)
        .unwrap_or(EventCategory::Other);

    Some(DisasterEvent {
        category,
        description: event
            .title
            .unwrap_or_else(|| category.label().to_string()),
        // upstream has no severity field
        severity: Severity::Moderate,
        updated_at,
        location,
    })
}

fn category_of(category: &EonetCategory) -> EventCategory {
    let label = category
        .id
        .as_deref()
        .or(category.title.as_deref())
        .unwrap_or_default();
    EventCategory::from_provider(label)
}

/// Extract a flat `[lon, lat]` pair; anything else yields `None`.
fn point_from(value: &serde_json::Value) -> Option<GeoPoint> {
    let pair = value.as_array()?;
    let longitude = pair.first()?.as_f64()?;
    let latitude = pair.get(1)?.as_f64()?;
    Some(GeoPoint::new(latitude, longitude))
}
