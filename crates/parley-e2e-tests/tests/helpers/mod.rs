//! Shared test harness for E2E tests.
//!
//! Wires a `StdioSession` to an in-process provider over a duplex pipe,
//! with the weather endpoints pointed at a `wiremock` server.

#![allow(dead_code)]

use serde_json::json;
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parley_agent::Dispatcher;
use parley_provider::{ParleyProvider, ProviderConfig, serve};
use parley_tools::{MockHost, WeatherConfig};
use parley_transport::{SessionConfig, StdioSession};

/// Agent-side session plus the provider task and weather mock behind it.
pub struct TestHarness {
    pub session: StdioSession,
    pub weather_api: MockServer,
    provider: JoinHandle<()>,
}

impl TestHarness {
    /// Provider with the sample host report.
    pub async fn start() -> Self {
        Self::with_host(MockHost::default()).await
    }

    pub async fn with_host(host: MockHost) -> Self {
        let weather_api = MockServer::start().await;
        let config = ProviderConfig {
            weather: WeatherConfig {
                geocoding_url: format!("{}/v1/search", weather_api.uri()),
                forecast_url: format!("{}/v1/forecast", weather_api.uri()),
                timeout_secs: 2,
            },
            disk_path: "/".into(),
        };
        let provider = ParleyProvider::with_host(&config, Box::new(host)).unwrap();

        let (agent_io, provider_io) = tokio::io::duplex(64 * 1024);
        let (provider_read, provider_write) = tokio::io::split(provider_io);
        let provider = tokio::spawn(async move {
            serve(provider, provider_read, provider_write).await.unwrap();
        });

        let (agent_read, agent_write) = tokio::io::split(agent_io);
        let session = StdioSession::connect(agent_read, agent_write, &session_config())
            .await
            .unwrap();

        Self {
            session,
            weather_api,
            provider,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.session)
    }

    /// Make the geocoder know `city` and the forecast API report conditions
    /// for it.
    pub async fn mount_city(&self, city: &str, temperature: f64, windspeed: f64) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": city, "latitude": 12.5, "longitude": 77.25}]
            })))
            .mount(&self.weather_api)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "12.5"))
            .and(query_param("longitude", "77.25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current_weather": {"temperature": temperature, "windspeed": windspeed}
            })))
            .mount(&self.weather_api)
            .await;
    }

    /// Geocoder answers every other name with no results.
    pub async fn mount_unknown_cities(&self) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "generationtime_ms": 0.2
            })))
            .with_priority(10)
            .mount(&self.weather_api)
            .await;
    }

    /// Simulate a provider crash: its end of the pipe goes away.
    pub async fn kill_provider(&self) {
        self.provider.abort();
        while !self.provider.is_finished() {
            tokio::task::yield_now().await;
        }
    }

    /// Close the session and wait for the provider service to finish.
    pub async fn shutdown(self) {
        self.session.shutdown().await.unwrap();
        if let Err(e) = self.provider.await {
            assert!(e.is_cancelled(), "provider task panicked: {e}");
        }
    }
}

pub fn session_config() -> SessionConfig {
    SessionConfig {
        call_timeout_secs: 5,
        handshake_timeout_secs: 5,
        ..SessionConfig::default()
    }
}
