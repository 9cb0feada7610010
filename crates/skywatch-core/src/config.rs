use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Region of interest (bounding box and map center)
    #[serde(default)]
    pub region: RegionConfig,

    /// Disaster feed settings
    #[serde(default)]
    pub disasters: DisastersConfig,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// News provider settings
    #[serde(default)]
    pub news: NewsConfig,
}

/// Geographic region the dashboard is scoped to.
///
/// The bounding box drives disaster-feed queries and geofiltering; the
/// center is only the fallback map center when geolocation is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    /// Fallback map center latitude
    pub center_lat: f64,
    /// Fallback map center longitude
    pub center_lon: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        // Kazakhstan and surroundings, centered on Almaty
        Self {
            min_lat: 40.0,
            max_lat: 56.0,
            min_lon: 46.0,
            max_lon: 88.0,
            center_lat: 43.2,
            center_lon: 76.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisastersConfig {
    /// Base URL of the earthquake summary feed
    #[serde(default = "default_quake_feed_url")]
    pub quake_feed_url: String,

    /// Base URL of the EONET events API
    #[serde(default = "default_eonet_api_url")]
    pub eonet_api_url: String,

    /// Cache freshness window in minutes
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u32,

    /// Maximum number of merged events kept per load
    #[serde(default = "default_max_events")]
    pub max_events: usize,

    /// Background refresh interval in minutes (0 disables)
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,
}

fn default_quake_feed_url() -> String {
    "https://earthquake.usgs.gov".to_string()
}

fn default_eonet_api_url() -> String {
    "https://eonet.gsfc.nasa.gov".to_string()
}

fn default_cache_minutes() -> u32 {
    30
}

fn default_max_events() -> usize {
    30
}

fn default_refresh_minutes() -> u32 {
    15
}

impl Default for DisastersConfig {
    fn default() -> Self {
        Self {
            quake_feed_url: default_quake_feed_url(),
            eonet_api_url: default_eonet_api_url(),
            cache_minutes: default_cache_minutes(),
            max_events: default_max_events(),
            refresh_minutes: default_refresh_minutes(),
        }
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weather provider API key
    /// Create at: https://home.openweathermap.org/api_keys
    pub api_key: String,

    /// Base URL of the weather provider
    #[serde(default = "default_weather_api_url")]
    pub api_url: String,

    /// Temperature unit preference
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Deliver severe-weather notifications
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_weather_api_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_notifications() -> bool {
    true
}

impl WeatherConfig {
    /// Check if the API key is configured (not a placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: "YOUR_OPENWEATHER_KEY".to_string(),
            api_url: default_weather_api_url(),
            temperature_unit: TemperatureUnit::default(),
            notifications: default_notifications(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// News provider API key
    pub api_key: String,

    /// Base URL of the news provider
    #[serde(default = "default_news_api_url")]
    pub api_url: String,

    /// Search query for headlines
    #[serde(default = "default_news_query")]
    pub query: String,

    /// Article language code
    #[serde(default = "default_news_language")]
    pub language: String,

    /// Maximum number of articles kept per fetch
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
}

fn default_news_api_url() -> String {
    "https://newsapi.org".to_string()
}

fn default_news_query() -> String {
    "weather OR disaster".to_string()
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_max_articles() -> usize {
    20
}

impl NewsConfig {
    /// Check if the API key is configured (not a placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: "YOUR_NEWSAPI_KEY".to_string(),
            api_url: default_news_api_url(),
            query: default_news_query(),
            language: default_news_language(),
            max_articles: default_max_articles(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skywatch");

        Self {
            config_dir,
            region: RegionConfig::default(),
            disasters: DisastersConfig::default(),
            weather: WeatherConfig::default(),
            news: NewsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_region(&mut result);

        // Validate feed URLs
        self.validate_url(
            &self.disasters.quake_feed_url,
            "disasters.quake_feed_url",
            &mut result,
        );
        self.validate_url(
            &self.disasters.eonet_api_url,
            "disasters.eonet_api_url",
            &mut result,
        );
        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);
        self.validate_url(&self.news.api_url, "news.api_url", &mut result);

        // Validate disaster feed settings
        if self.disasters.cache_minutes == 0 {
            result.add_warning(
                "disasters.cache_minutes",
                "Event cache disabled (0 minutes); every load hits the network",
            );
        }
        if self.disasters.max_events == 0 {
            result.add_error(
                "disasters.max_events",
                "Event cap must be greater than 0",
            );
        }
        if self.disasters.refresh_minutes == 0 {
            result.add_warning(
                "disasters.refresh_minutes",
                "Background refresh disabled (0 minutes)",
            );
        }

        // Unconfigured API keys degrade those sections, they don't block startup
        if !self.weather.is_configured() {
            result.add_warning(
                "weather.api_key",
                "Weather API key not configured - weather section will be unavailable",
            );
        }
        if !self.news.is_configured() {
            result.add_warning(
                "news.api_key",
                "News API key not configured - news section will be unavailable",
            );
        }

        if self.news.max_articles == 0 {
            result.add_warning("news.max_articles", "News disabled (0 articles)");
        }

        result
    }

    fn validate_region(&self, result: &mut ValidationResult) {
        let r = &self.region;

        if !(-90.0..=90.0).contains(&r.min_lat) || !(-90.0..=90.0).contains(&r.max_lat) {
            result.add_error("region", "Latitudes must be within -90..=90");
        }
        if !(-180.0..=180.0).contains(&r.min_lon) || !(-180.0..=180.0).contains(&r.max_lon) {
            result.add_error("region", "Longitudes must be within -180..=180");
        }
        if r.min_lat >= r.max_lat {
            result.add_error("region", "min_lat must be less than max_lat");
        }
        if r.min_lon >= r.max_lon {
            result.add_error("region", "min_lon must be less than max_lon");
        }

        let center_inside = (r.min_lat..=r.max_lat).contains(&r.center_lat)
            && (r.min_lon..=r.max_lon).contains(&r.center_lon);
        if !center_inside {
            result.add_warning(
                "region",
                "Fallback center lies outside the bounding box",
            );
        }
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skywatch");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(
            result.is_valid(),
            "Default config should be valid: {:?}",
            result.errors
        );
    }

    #[test]
    fn test_default_keys_warn_not_error() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
        assert!(result.warnings.iter().any(|w| w.field == "news.api_key"));
    }

    #[test]
    fn test_invalid_feed_url() {
        let mut config = Config::default();
        config.disasters.quake_feed_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "disasters.quake_feed_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.news.api_url = "ftp://newsapi.org".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_inverted_bounding_box_is_error() {
        let mut config = Config::default();
        config.region.min_lat = 56.0;
        config.region.max_lat = 40.0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "region"));
    }

    #[test]
    fn test_out_of_range_latitude_is_error() {
        let mut config = Config::default();
        config.region.max_lat = 91.0;
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_center_outside_box_is_warning() {
        let mut config = Config::default();
        config.region.center_lat = 10.0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("outside the bounding box")));
    }

    #[test]
    fn test_zero_event_cap_is_error() {
        let mut config = Config::default();
        config.disasters.max_events = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "disasters.max_events"));
    }

    #[test]
    fn test_zero_refresh_is_warning() {
        let mut config = Config::default();
        config.disasters.refresh_minutes = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "disasters.refresh_minutes"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_config_roundtrip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.region.min_lat, config.region.min_lat);
        assert_eq!(parsed.disasters.max_events, config.disasters.max_events);
        assert_eq!(parsed.news.query, config.news.query);
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let text = r#"
            config_dir = "/tmp/skywatch"

            [disasters]
            cache_minutes = 5
        "#;
        let parsed: Config = toml::from_str(text).unwrap();
        assert_eq!(parsed.disasters.cache_minutes, 5);
        assert_eq!(parsed.disasters.max_events, 30);
        assert_eq!(parsed.region.center_lat, 43.2);
        assert_eq!(parsed.news.max_articles, 20);
    }
}
