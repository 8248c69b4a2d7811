//! Provider configuration, read from the environment.

use parley_tools::WeatherConfig;

/// Settings for the tool provider process.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub weather: WeatherConfig,
    /// Disk usage is reported for the filesystem holding this path.
    pub disk_path: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            disk_path: "/".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Load config from `PARLEY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("PARLEY_GEOCODING_URL") {
            config.weather.geocoding_url = url;
        }
        if let Some(url) = lookup("PARLEY_FORECAST_URL") {
            config.weather.forecast_url = url;
        }
        if let Some(raw) = lookup("PARLEY_HTTP_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => config.weather.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid PARLEY_HTTP_TIMEOUT_SECS"),
            }
        }
        if let Some(path) = lookup("PARLEY_DISK_PATH") {
            config.disk_path = path;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ProviderConfig::from_lookup(|_| None);
        assert_eq!(config.disk_path, "/");
        assert_eq!(config.weather.timeout_secs, 10);
        assert!(config.weather.forecast_url.starts_with("https://api.open-meteo.com"));
    }

    #[test]
    fn env_overrides() {
        let config = ProviderConfig::from_lookup(lookup_from(&[
            ("PARLEY_GEOCODING_URL", "http://127.0.0.1:9000/geo"),
            ("PARLEY_FORECAST_URL", "http://127.0.0.1:9000/fc"),
            ("PARLEY_HTTP_TIMEOUT_SECS", "3"),
            ("PARLEY_DISK_PATH", "/data"),
        ]));
        assert_eq!(config.weather.geocoding_url, "http://127.0.0.1:9000/geo");
        assert_eq!(config.weather.forecast_url, "http://127.0.0.1:9000/fc");
        assert_eq!(config.weather.timeout_secs, 3);
        assert_eq!(config.disk_path, "/data");
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let config =
            ProviderConfig::from_lookup(lookup_from(&[("PARLEY_HTTP_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.weather.timeout_secs, 10);
    }
}
