pub mod config;
pub mod location;
pub mod notify;

pub use config::{
    Config, DisastersConfig, NewsConfig, RegionConfig, TemperatureUnit, ValidationResult,
    WeatherConfig,
};
pub use location::{resolve_or_fallback, Coordinates, FixedLocation, LocationError, LocationSource};
pub use notify::{LogNotifier, MemoryNotifier, Notifier, NotifyError, NotifyPermission};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Skywatch core initialized");
    Ok(())
}
