//! Weather lookup for Skywatch
//!
//! Current conditions, 5-day/3-hour forecast, air quality, and geocoding
//! against an OpenWeatherMap-style API. Temperatures are converted from
//! the provider's kelvin into the configured unit at the edge.

pub mod alert;
pub mod client;
pub mod types;

pub use alert::weather_alert;
pub use client::WeatherClient;
pub use types::*;
