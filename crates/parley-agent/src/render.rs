//! Reply rendering.
//!
//! Tool replies are rendered by their decoded shape: a record that
//! deserializes into the capability's result type gets the friendly
//! sentence, a record that does not is shown as unexpected, raw text is
//! passed through, and an empty reply gets a fixed line.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use parley_protocol::{Capability, SystemReport, VowelReport, WeatherReport};
use parley_transport::TransportError;

use crate::decode::ToolReply;
use crate::extract::Focus;

pub const GREETING: &str = "Hi there! How can I help you?";
pub const UNKNOWN_NAME: &str = "I don't know your name yet.";
pub const MISSING_CITY: &str = "Please specify a city (e.g., weather in Hyderabad).";
pub const MISSING_WORD: &str = "Please give a word (e.g., vowels in likhita).";
pub const UNSUPPORTED: &str =
    "Sorry, I don't have access to that information with my current tools.";
const NO_LIVE_DATA: &str = "• Note: no live data was found for this city.";

/// Separator between per-clause replies in one turn.
pub const CLAUSE_SEPARATOR: &str = "\n\n";

pub fn name_set(name: &str) -> String {
    format!("Nice to meet you, {name}!")
}

pub fn name_query(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Your name is {name}."),
        None => UNKNOWN_NAME.to_string(),
    }
}

pub fn weather(city: &str, reply: &ToolReply) -> String {
    with_record(Capability::GetWeather, reply, |report: WeatherReport| {
        let mut out = format!(
            "Weather in {city}\n• Temperature: {} °C\n• Wind Speed: {} km/h",
            number(report.temperature_c),
            number(report.wind_speed)
        );
        if report.is_unresolved() {
            out.push('\n');
            out.push_str(NO_LIVE_DATA);
        }
        out
    })
}

pub fn vowels(word: &str, reply: &ToolReply) -> String {
    with_record(Capability::CountVowels, reply, |report: VowelReport| {
        let letters = if report.vowels.is_empty() {
            "none".to_string()
        } else {
            report.vowels.join(", ")
        };
        format!(
            "Vowels in '{word}': {}\n• Letters: {letters}",
            report.vowel_count
        )
    })
}

pub fn diagnostics(focus: Focus, reply: &ToolReply) -> String {
    with_record(Capability::SystemDiagnostics, reply, |r: SystemReport| {
        match focus {
            Focus::Cpu => format!(
                "System Info (CPU)\n\
                 • Physical Cores: {}\n\
                 • Logical Cores: {}\n\
                 • Usage: {}%\n\
                 • Frequency: {} MHz",
                r.cpu_physical_cores,
                r.cpu_logical_cores,
                number(r.cpu_usage_percent),
                number(r.cpu_frequency_mhz)
            ),
            Focus::Memory => format!(
                "System Info (Memory)\n\
                 • Total: {} GB\n\
                 • Used: {} GB\n\
                 • Free: {} GB\n\
                 • Usage: {}%",
                number(r.memory_total_gb),
                number(r.memory_used_gb),
                number(r.memory_free_gb),
                number(r.memory_usage_percent)
            ),
            Focus::Disk => format!(
                "System Info (Disk)\n\
                 • Total: {} GB\n\
                 • Used: {} GB\n\
                 • Free: {} GB\n\
                 • Usage: {}%",
                number(r.disk_total_gb),
                number(r.disk_used_gb),
                number(r.disk_free_gb),
                number(r.disk_usage_percent)
            ),
            Focus::General => format!(
                "System Info\n\
                 • Host: {} ({})\n\
                 • OS: {} {}\n\
                 • Architecture: {}\n\
                 • Uptime: {} hours\n\
                 • Virtual Machine: {}\n\
                 • Usage: CPU {}%, Memory {}%, Disk {}%",
                r.hostname,
                r.ip_address,
                r.os,
                r.os_version,
                r.architecture,
                number(r.system_uptime_hours),
                if r.running_in_vm { "yes" } else { "no" },
                number(r.cpu_usage_percent),
                number(r.memory_usage_percent),
                number(r.disk_usage_percent)
            ),
        }
    })
}

/// A non-fatal transport failure for one clause.
pub fn tool_failed(capability: Capability, error: &TransportError) -> String {
    format!("The {capability} tool failed: {error}")
}

/// Shared shape handling; `render` only sees records that deserialize.
fn with_record<T, F>(capability: Capability, reply: &ToolReply, render: F) -> String
where
    T: DeserializeOwned,
    F: FnOnce(T) -> String,
{
    match reply {
        ToolReply::Structured(map) => match serde_json::from_value(Value::Object(map.clone())) {
            Ok(record) => render(record),
            Err(e) => {
                tracing::warn!(tool = %capability, error = %e, "reply is missing expected fields");
                unexpected(capability, map)
            }
        },
        ToolReply::Raw(text) if !text.is_empty() => text.clone(),
        ToolReply::Raw(_) | ToolReply::Empty => format!("The {capability} tool returned no result."),
    }
}

fn unexpected(capability: Capability, map: &Map<String, Value>) -> String {
    let json = serde_json::to_string(map).unwrap_or_else(|_| format!("{map:?}"));
    format!("The {capability} tool returned an unexpected result: {json}")
}

/// Integral values keep one decimal place ("0.0", "40.0").
fn number(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}
