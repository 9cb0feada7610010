use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skywatch_core::TemperatureUnit;

/// Weather condition groups mapped from the provider's `main` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionGroup {
    #[default]
    Clear,
    Clouds,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    Other,
}

impl ConditionGroup {
    /// Map a provider condition string to a group. Unrecognized values
    /// (Mist, Haze, Dust and friends) collapse into `Other`.
    pub fn from_provider(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Drizzle" => Self::Drizzle,
            "Rain" => Self::Rain,
            "Snow" => Self::Snow,
            "Thunderstorm" => Self::Thunderstorm,
            _ => Self::Other,
        }
    }

    /// Get a human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Other => "Other",
        }
    }

    /// Conditions severe enough to raise a notification.
    pub fn is_alertable(&self) -> bool {
        matches!(self, Self::Thunderstorm | Self::Rain | Self::Snow)
    }
}

/// Convert a provider temperature (kelvin) into the configured unit.
pub fn convert_kelvin(kelvin: f64, unit: TemperatureUnit) -> f64 {
    let celsius = kelvin - 273.15;
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Current conditions at a place, temperatures already unit-converted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub place: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    /// Sea-level pressure in hPa.
    pub pressure: u32,
    /// Visibility in meters, when the provider reports it.
    pub visibility: Option<u32>,
    pub wind_speed: f64,
    pub condition: ConditionGroup,
    pub description: String,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub observed_at: DateTime<Utc>,
}

/// One 3-hourly forecast entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub at: DateTime<Utc>,
    pub temperature: f64,
    pub condition: ConditionGroup,
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollutantLevels {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

/// Air quality snapshot. The provider index runs 1 (best) to 5 (worst).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQuality {
    pub index: u8,
    pub components: PollutantLevels,
}

impl AirQuality {
    /// Get a human-readable label for the index
    pub fn label(&self) -> &'static str {
        match self.index {
            1 => "Good",
            2 => "Fair",
            3 => "Moderate",
            4 => "Poor",
            5 => "Very Poor",
            _ => "Unknown",
        }
    }
}

/// Complete weather data bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherBundle {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
    pub air_quality: AirQuality,
    pub fetched_at: DateTime<Utc>,
}

/// A geocoding match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceMatch {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

/// Day-level view of a 3-hourly forecast: one entry per day, five days.
/// The provider spaces entries 3 hours apart, so every 8th is 24h apart.
pub fn daily_view(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    entries.iter().step_by(8).take(5).cloned().collect()
}

/// Near-term view: the next 8 entries (24 hours).
pub fn hourly_view(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    entries.iter().take(8).cloned().collect()
}

/// Weather lookup errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// User-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Weather service unreachable. Check your connection.".to_string(),
            Self::Api { status, .. } => format!("Weather service error (status {})", status),
            Self::CityNotFound(query) => format!("City not found: {}", query),
            Self::Parse(_) => "Weather service returned unexpected data.".to_string(),
        }
    }
}
