//! get_weather — current conditions from the Open-Meteo public APIs.
//!
//! Two requests: geocode the city name, then fetch `current_weather` for
//! the first hit. A city the geocoder does not know yields the zeroed
//! sentinel report rather than an error.

use serde::Deserialize;
use std::time::Duration;

use parley_protocol::WeatherReport;

use crate::error::ToolResult;

/// Endpoints and timeout for the weather lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".into()
}
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingHit>>,
}

#[derive(Deserialize)]
struct GeocodingHit {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
}

pub struct GetWeather {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl GetWeather {
    pub fn new(config: WeatherConfig) -> ToolResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Look up current conditions for `city`.
    pub async fn lookup(&self, city: &str) -> ToolResult<WeatherReport> {
        let geo: GeocodingResponse = self
            .client
            .get(&self.config.geocoding_url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(hit) = geo.results.and_then(|r| r.into_iter().next()) else {
            tracing::debug!(city, "geocoder has no match");
            return Ok(WeatherReport::unresolved(city));
        };

        let forecast: ForecastResponse = self
            .client
            .get(&self.config.forecast_url)
            .query(&[
                ("latitude", hit.latitude.to_string()),
                ("longitude", hit.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(WeatherReport {
            city: city.to_string(),
            temperature_c: forecast.current_weather.temperature,
            wind_speed: forecast.current_weather.windspeed,
        })
    }
}
