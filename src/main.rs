use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use skywatch_core::{
    resolve_or_fallback, Config, Coordinates, FixedLocation, LogNotifier, Notifier,
    TemperatureUnit,
};
use skywatch_disasters::{
    filter_events, AggregatorConfig, BoundingBox, DisasterService, EventCache, EventStats,
    TimeFilter, TypeFilter,
};
use skywatch_news::NewsClient;
use skywatch_weather::{daily_view, hourly_view, weather_alert, WeatherClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skywatch_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::info!("Skywatch started");

    println!("Skywatch - Regional Weather & Hazard Dashboard");
    println!("Config directory: {}", config.config_dir.display());

    let now = Utc::now();

    // Geolocation only centers the weather lookup; feed queries stay on the
    // configured region box.
    let fallback = Coordinates::new(config.region.center_lat, config.region.center_lon);
    let center = resolve_or_fallback(&FixedLocation::new(fallback), fallback);

    show_disasters(&config, now).await?;
    show_weather(&config, center).await;
    show_news(&config, now).await;

    Ok(())
}

async fn show_disasters(config: &Config, now: DateTime<Utc>) -> Result<()> {
    println!("\n== Disasters ==");

    let cache_path = config.config_dir.join("events.db");
    let cache = EventCache::new(&cache_path)
        .with_context(|| format!("Failed to open event cache at {}", cache_path.display()))?;

    let service = DisasterService::new(
        AggregatorConfig {
            quake_feed_url: config.disasters.quake_feed_url.clone(),
            eonet_api_url: config.disasters.eonet_api_url.clone(),
            bounding_box: BoundingBox::new(
                config.region.min_lat,
                config.region.max_lat,
                config.region.min_lon,
                config.region.max_lon,
            ),
            cache_minutes: config.disasters.cache_minutes,
            max_events: config.disasters.max_events,
        },
        cache,
    )
    .context("Failed to build disaster service")?;

    let events = service.load_events(now).await;
    let stats = EventStats::from_events(&events);
    let recent = filter_events(&events, TypeFilter::All, TimeFilter::Last24Hours, now);
    println!(
        "{} events ({} in the last 24 hours), risk level: {}",
        stats.total,
        recent.len(),
        stats.risk
    );

    if events.is_empty() {
        println!("No disasters found.");
        return Ok(());
    }
    for event in &events {
        println!(
            "{}: {} (Severity: {}) at {}",
            event.category.tag(),
            event.description,
            event.severity,
            event.updated_at.format("%Y-%m-%d %H:%M UTC"),
        );
    }
    Ok(())
}

async fn show_weather(config: &Config, center: Coordinates) {
    println!("\n== Weather ==");
    if !config.weather.is_configured() {
        println!("Set weather.api_key in config.toml to enable this section.");
        return;
    }

    let client = match WeatherClient::new(
        &config.weather.api_url,
        &config.weather.api_key,
        config.weather.temperature_unit,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build weather client: {}", e);
            println!("{}", e.user_message());
            return;
        }
    };

    let bundle = match client.fetch_bundle(center.latitude, center.longitude).await {
        Ok(bundle) => bundle,
        Err(e) => {
            tracing::warn!("Weather fetch failed: {}", e);
            println!("{}", e.user_message());
            return;
        }
    };

    let place = if bundle.current.place.is_empty() {
        format!("{}, {}", center.latitude, center.longitude)
    } else {
        match &bundle.current.country {
            Some(country) => format!("{}, {}", bundle.current.place, country),
            None => bundle.current.place.clone(),
        }
    };
    let unit = unit_symbol(config.weather.temperature_unit);

    println!(
        "{}: {:.2}{} (feels like {:.2}{}), {}",
        place,
        bundle.current.temperature,
        unit,
        bundle.current.feels_like,
        unit,
        bundle.current.description,
    );
    println!(
        "Humidity {}%, pressure {} hPa, wind {} m/s, air quality: {}",
        bundle.current.humidity,
        bundle.current.pressure,
        bundle.current.wind_speed,
        bundle.air_quality.label(),
    );
    if let Some(visibility) = bundle.current.visibility {
        println!("Visibility {:.1} km", f64::from(visibility) / 1000.0);
    }
    if let (Some(sunrise), Some(sunset)) = (bundle.current.sunrise, bundle.current.sunset) {
        println!(
            "Sunrise {} / sunset {}",
            sunrise.format("%H:%M UTC"),
            sunset.format("%H:%M UTC"),
        );
    }

    println!("Next hours:");
    for entry in hourly_view(&bundle.forecast) {
        println!(
            "  {}  {:.2}{}  {}",
            entry.at.format("%H:%M"),
            entry.temperature,
            unit,
            entry.condition.label(),
        );
    }

    println!("Next days:");
    for entry in daily_view(&bundle.forecast) {
        println!(
            "  {}  {:.2}{}  {}",
            entry.at.format("%a %d %b"),
            entry.temperature,
            unit,
            entry.condition.label(),
        );
    }

    if config.weather.notifications {
        if let Some(alert) = weather_alert(&bundle.current) {
            println!("{}", alert);
            let notifier = LogNotifier::new();
            match notifier.notify_if_permitted("Severe weather", &alert) {
                Ok(true) => {}
                Ok(false) => tracing::debug!("Notifications not permitted"),
                Err(e) => tracing::warn!("Notification delivery failed: {}", e),
            }
        }
    }
}

async fn show_news(config: &Config, now: DateTime<Utc>) {
    println!("\n== News ==");
    if !config.news.is_configured() {
        println!("Set news.api_key in config.toml to enable this section.");
        return;
    }

    let client = match NewsClient::new(
        &config.news.api_url,
        &config.news.api_key,
        &config.news.query,
        &config.news.language,
        config.news.max_articles,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build news client: {}", e);
            println!("{}", e.user_message());
            return;
        }
    };

    let articles = client.load_headlines(now).await;
    if articles.is_empty() {
        println!("No news found.");
        return;
    }
    for article in &articles {
        println!(
            "- {} ({})",
            article.title,
            article.published_at.format("%Y-%m-%d %H:%M UTC"),
        );
        println!(
            "  {}",
            article
                .description
                .as_deref()
                .unwrap_or("No description available"),
        );
    }
}

fn unit_symbol(unit: TemperatureUnit) -> &'static str {
    match unit {
        TemperatureUnit::Celsius => "°C",
        TemperatureUnit::Fahrenheit => "°F",
    }
}
