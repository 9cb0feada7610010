//! OpenWeatherMap-style HTTP client: current conditions, 5-day forecast,
//! air pollution, and geocoding. All endpoints share one API key.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use skywatch_core::TemperatureUnit;
use tracing::instrument;

use crate::types::{
    convert_kelvin, AirQuality, ConditionGroup, CurrentConditions, ForecastEntry, PlaceMatch,
    PollutantLevels, WeatherBundle, WeatherError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    unit: TemperatureUnit,
}

#[derive(Debug, Deserialize)]
struct CurrentDto {
    #[serde(default)]
    name: String,
    main: ThermalDto,
    #[serde(default)]
    weather: Vec<ConditionDto>,
    wind: Option<WindDto>,
    /// Visibility in meters.
    visibility: Option<u32>,
    sys: Option<SysDto>,
    /// Observation time in epoch seconds.
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct ThermalDto {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
    pressure: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct SysDto {
    country: Option<String>,
    /// Epoch seconds.
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ConditionDto {
    main: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WindDto {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastDto {
    #[serde(default)]
    list: Vec<ForecastItemDto>,
}

#[derive(Debug, Deserialize)]
struct ForecastItemDto {
    dt: i64,
    main: ThermalDto,
    #[serde(default)]
    weather: Vec<ConditionDto>,
}

#[derive(Debug, Deserialize)]
struct AirDto {
    #[serde(default)]
    list: Vec<AirItemDto>,
}

#[derive(Debug, Deserialize)]
struct AirItemDto {
    main: AirIndexDto,
    #[serde(default)]
    components: ComponentsDto,
}

#[derive(Debug, Deserialize)]
struct AirIndexDto {
    aqi: u8,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentsDto {
    #[serde(default)]
    co: f64,
    #[serde(default)]
    no2: f64,
    #[serde(default)]
    o3: f64,
    #[serde(default)]
    so2: f64,
    #[serde(default)]
    pm2_5: f64,
    #[serde(default)]
    pm10: f64,
}

#[derive(Debug, Deserialize)]
struct GeoEntryDto {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
}

impl WeatherClient {
    /// Create a client against the given API host.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str, unit: TemperatureUnit) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            unit,
        })
    }

    /// Resolve a city name to coordinates (best match only).
    ///
    /// # Errors
    /// Returns `CityNotFound` when the provider has no match.
    #[instrument(skip(self), level = "info")]
    pub async fn geocode_city(&self, name: &str) -> Result<PlaceMatch, WeatherError> {
        let url = format!(
            "{}/geo/1.0/direct?q={}&limit=1&appid={}",
            self.base_url,
            urlencoding::encode(name),
            self.api_key
        );
        let response = self.client.get(&url).send().await?;
        let matches: Vec<GeoEntryDto> = self.handle_response(response).await?;

        matches
            .into_iter()
            .next()
            .map(place_match)
            .ok_or_else(|| WeatherError::CityNotFound(name.to_string()))
    }

    /// Resolve coordinates to the nearest known place.
    ///
    /// # Errors
    /// Returns `CityNotFound` when the provider has no match.
    #[instrument(skip(self), level = "info")]
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<PlaceMatch, WeatherError> {
        let url = format!(
            "{}/geo/1.0/reverse?lat={}&lon={}&limit=1&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        let response = self.client.get(&url).send().await?;
        let matches: Vec<GeoEntryDto> = self.handle_response(response).await?;

        matches
            .into_iter()
            .next()
            .map(place_match)
            .ok_or_else(|| WeatherError::CityNotFound(format!("{}, {}", lat, lon)))
    }

    /// Fetch current conditions, forecast, and air quality for a coordinate.
    /// The three requests run concurrently and all must succeed.
    ///
    /// # Errors
    /// Returns the first failing request's error.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_bundle(&self, lat: f64, lon: f64) -> Result<WeatherBundle, WeatherError> {
        let (current, forecast, air) = tokio::join!(
            self.fetch_current(lat, lon),
            self.fetch_forecast(lat, lon),
            self.fetch_air_quality(lat, lon),
        );

        let bundle = WeatherBundle {
            current: current?,
            forecast: forecast?,
            air_quality: air?,
            fetched_at: Utc::now(),
        };
        tracing::debug!(
            place = %bundle.current.place,
            entries = bundle.forecast.len(),
            "Fetched weather bundle"
        );
        Ok(bundle)
    }

    async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, WeatherError> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        let response = self.client.get(&url).send().await?;
        let dto: CurrentDto = self.handle_response(response).await?;

        let observed_at = DateTime::from_timestamp(dto.dt, 0)
            .ok_or_else(|| WeatherError::Parse(format!("bad observation time: {}", dto.dt)))?;
        let (condition, description) = condition_of(&dto.weather);
        let sys = dto.sys.unwrap_or_default();

        Ok(CurrentConditions {
            place: dto.name,
            country: sys.country,
            temperature: convert_kelvin(dto.main.temp, self.unit),
            feels_like: convert_kelvin(dto.main.feels_like.unwrap_or(dto.main.temp), self.unit),
            humidity: dto.main.humidity.unwrap_or_default(),
            pressure: dto.main.pressure.unwrap_or_default(),
            visibility: dto.visibility,
            wind_speed: dto.wind.and_then(|w| w.speed).unwrap_or_default(),
            condition,
            description,
            sunrise: sys.sunrise.and_then(|s| DateTime::from_timestamp(s, 0)),
            sunset: sys.sunset.and_then(|s| DateTime::from_timestamp(s, 0)),
            observed_at,
        })
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>, WeatherError> {
        let url = format!(
            "{}/data/2.5/forecast?lat={}&lon={}&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        let response = self.client.get(&url).send().await?;
        let dto: ForecastDto = self.handle_response(response).await?;

        let entries = dto
            .list
            .into_iter()
            .filter_map(|item| {
                let at = DateTime::from_timestamp(item.dt, 0)?;
                let (condition, _) = condition_of(&item.weather);
                Some(ForecastEntry {
                    at,
                    temperature: convert_kelvin(item.main.temp, self.unit),
                    condition,
                })
            })
            .collect();
        Ok(entries)
    }

    async fn fetch_air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality, WeatherError> {
        let url = format!(
            "{}/data/2.5/air_pollution?lat={}&lon={}&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        let response = self.client.get(&url).send().await?;
        let dto: AirDto = self.handle_response(response).await?;

        let item = dto
            .list
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("air quality response has no entries".to_string()))?;

        Ok(AirQuality {
            index: item.main.aqi,
            components: PollutantLevels {
                co: item.components.co,
                no2: item.components.no2,
                o3: item.components.o3,
                so2: item.components.so2,
                pm2_5: item.components.pm2_5,
                pm10: item.components.pm10,
            },
        })
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(WeatherError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn place_match(entry: GeoEntryDto) -> PlaceMatch {
    PlaceMatch {
        name: entry.name,
        latitude: entry.lat,
        longitude: entry.lon,
        country: entry.country,
    }
}

fn condition_of(conditions: &[ConditionDto]) -> (ConditionGroup, String) {
    conditions
        .first()
        .map(|c| {
            (
                ConditionGroup::from_provider(&c.main),
                c.description.clone().unwrap_or_default(),
            )
        })
        .unwrap_or((ConditionGroup::Other, String::new()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Almaty",
            "main": { "temp": 300.15, "feels_like": 299.15, "humidity": 41, "pressure": 1013 },
            "weather": [ { "main": "Rain", "description": "light rain" } ],
            "wind": { "speed": 3.6 },
            "visibility": 10_000,
            "sys": { "country": "KZ", "sunrise": 1_722_467_000i64, "sunset": 1_722_519_000i64 },
            "dt": 1_722_470_400i64
        })
    }

    fn forecast_body() -> serde_json::Value {
        let list: Vec<_> = (0..40)
            .map(|i| {
                serde_json::json!({
                    "dt": 1_722_470_400i64 + i * 10_800,
                    "main": { "temp": 295.15, "humidity": 50 },
                    "weather": [ { "main": "Clouds", "description": "few clouds" } ]
                })
            })
            .collect();
        serde_json::json!({ "list": list })
    }

    fn air_body() -> serde_json::Value {
        serde_json::json!({
            "list": [ {
                "main": { "aqi": 2 },
                "components": { "co": 230.3, "no2": 8.4, "o3": 70.1, "so2": 1.9, "pm2_5": 4.3, "pm10": 7.6 }
            } ]
        })
    }

    async fn mount_bundle(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(air_body()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_bundle() {
        let mock_server = MockServer::start().await;
        mount_bundle(&mock_server).await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let bundle = client.fetch_bundle(43.2, 76.9).await.unwrap();

        assert_eq!(bundle.current.place, "Almaty");
        assert_eq!(bundle.current.country.as_deref(), Some("KZ"));
        assert!((bundle.current.temperature - 27.0).abs() < 1e-9);
        assert!((bundle.current.feels_like - 26.0).abs() < 1e-9);
        assert_eq!(bundle.current.humidity, 41);
        assert_eq!(bundle.current.pressure, 1013);
        assert_eq!(bundle.current.visibility, Some(10_000));
        assert_eq!(
            bundle.current.sunrise.map(|t| t.timestamp()),
            Some(1_722_467_000)
        );
        assert_eq!(bundle.current.condition, ConditionGroup::Rain);
        assert_eq!(bundle.current.description, "light rain");
        assert_eq!(bundle.forecast.len(), 40);
        assert!((bundle.forecast[0].temperature - 22.0).abs() < 1e-9);
        assert_eq!(bundle.air_quality.index, 2);
        assert_eq!(bundle.air_quality.label(), "Fair");
        assert!((bundle.air_quality.components.pm2_5 - 4.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fetch_bundle_fahrenheit() {
        let mock_server = MockServer::start().await;
        mount_bundle(&mock_server).await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Fahrenheit)
                .unwrap();
        let bundle = client.fetch_bundle(43.2, 76.9).await.unwrap();

        assert!((bundle.current.temperature - 80.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fetch_bundle_tolerates_sparse_current_payload() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 280.15 },
                "dt": 1_722_470_400i64
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(air_body()))
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let bundle = client.fetch_bundle(43.2, 76.9).await.unwrap();

        assert!((bundle.current.temperature - 7.0).abs() < 1e-9);
        assert_eq!(bundle.current.country, None);
        assert_eq!(bundle.current.visibility, None);
        assert_eq!(bundle.current.sunrise, None);
        assert_eq!(bundle.current.condition, ConditionGroup::Other);
    }

    #[tokio::test]
    async fn test_fetch_bundle_fails_when_one_request_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let result = client.fetch_bundle(43.2, 76.9).await;

        assert!(matches!(result, Err(WeatherError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_geocode_city() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Almaty"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": "Almaty", "lat": 43.238, "lon": 76.945, "country": "KZ" }
            ])))
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let place = client.geocode_city("Almaty").await.unwrap();

        assert_eq!(place.name, "Almaty");
        assert_eq!(place.country.as_deref(), Some("KZ"));
        assert!((place.latitude - 43.238).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_geocode_city_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let result = client.geocode_city("Atlantis").await;

        assert!(matches!(result, Err(WeatherError::CityNotFound(ref q)) if q == "Atlantis"));
    }

    #[tokio::test]
    async fn test_geocode_city_encodes_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Ust-Kamenogorsk City"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": "Ust-Kamenogorsk", "lat": 49.97, "lon": 82.61, "country": "KZ" }
            ])))
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let place = client.geocode_city("Ust-Kamenogorsk City").await.unwrap();

        assert_eq!(place.name, "Ust-Kamenogorsk");
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .and(query_param("lat", "43.2"))
            .and(query_param("lon", "76.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": "Almaty", "lat": 43.238, "lon": 76.945, "country": "KZ" }
            ])))
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let place = client.reverse_geocode(43.2, 76.9).await.unwrap();

        assert_eq!(place.name, "Almaty");
    }

    #[tokio::test]
    async fn test_unauthorized_key() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "bad-key", TemperatureUnit::Celsius).unwrap();
        let result = client.geocode_city("Almaty").await;

        assert!(matches!(result, Err(WeatherError::Api { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_empty_air_quality_list_is_parse_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": [] })),
            )
            .mount(&mock_server)
            .await;

        let client =
            WeatherClient::new(&mock_server.uri(), "test-key", TemperatureUnit::Celsius).unwrap();
        let result = client.fetch_bundle(43.2, 76.9).await;

        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }
}
