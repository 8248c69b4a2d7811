//! The capabilities the provider exposes and their typed records.
//!
//! Names here are the contract with the provider; argument records are
//! always complete when a request is sent.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A named operation exposed by the tool provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    GetWeather,
    CountVowels,
    SystemDiagnostics,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::GetWeather,
        Capability::CountVowels,
        Capability::SystemDiagnostics,
    ];

    /// Wire name, as used in `tools/call`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetWeather => "get_weather",
            Self::CountVowels => "count_vowels",
            Self::SystemDiagnostics => "system_diagnostics",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability plus its complete argument record.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub capability: Capability,
    pub arguments: Value,
}

impl ToolRequest {
    pub fn weather(city: impl Into<String>) -> Self {
        Self {
            capability: Capability::GetWeather,
            arguments: json!({ "city": city.into() }),
        }
    }

    pub fn count_vowels(text: impl Into<String>) -> Self {
        Self {
            capability: Capability::CountVowels,
            arguments: json!({ "text": text.into() }),
        }
    }

    pub fn system_diagnostics(detail: impl Into<String>) -> Self {
        Self {
            capability: Capability::SystemDiagnostics,
            arguments: json!({ "detail": detail.into() }),
        }
    }
}

// ── Argument records ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WeatherArgs {
    #[schemars(description = "City name, e.g. Hyderabad")]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct VowelArgs {
    #[schemars(description = "Text to count vowels in")]
    pub text: String,
}

/// Free-text hint; the provider samples everything regardless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DiagnosticsArgs {
    #[schemars(description = "What the user asked about (cpu, memory, disk, ...)")]
    #[serde(default)]
    pub detail: String,
}

// ── Result records ────────────────────────────────────────────

/// Current conditions for a city.
///
/// The provider answers an unresolvable city with zeroed readings instead
/// of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: f64,
    pub wind_speed: f64,
}

impl WeatherReport {
    /// Sentinel reply for a city the provider could not geocode.
    pub fn unresolved(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            temperature_c: 0.0,
            wind_speed: 0.0,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.temperature_c == 0.0 && self.wind_speed == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VowelReport {
    pub vowel_count: u64,
    pub vowels: Vec<String>,
}

/// Full host sample returned by `system_diagnostics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemReport {
    pub hostname: String,
    pub ip_address: String,

    pub os: String,
    pub os_version: String,
    pub architecture: String,

    pub cpu_physical_cores: u32,
    pub cpu_logical_cores: u32,
    pub cpu_usage_percent: f64,
    pub cpu_frequency_mhz: f64,

    pub memory_total_gb: f64,
    pub memory_used_gb: f64,
    pub memory_free_gb: f64,
    pub memory_usage_percent: f64,

    pub disk_total_gb: f64,
    pub disk_used_gb: f64,
    pub disk_free_gb: f64,
    pub disk_usage_percent: f64,

    pub system_uptime_hours: f64,
    pub running_in_vm: bool,
}
