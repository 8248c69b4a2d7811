//! Intent classification.
//!
//! Clauses are matched against an ordered rule list and the first rule
//! that matches wins. Categories overlap by substring ("system" and
//! "my name" can share a clause), so the order in `RULES` is the
//! tie-break and must not be rearranged casually.

use crate::extract;

/// What a clause asks for. Exactly one per clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    SetName,
    QueryName,
    Weather,
    VowelCount,
    SystemDiagnostics,
    Unknown,
}

struct Rule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

/// Priority order, highest first. `Unknown` is the fallthrough.
const RULES: &[Rule] = &[
    Rule {
        intent: Intent::Greeting,
        matches: is_greeting,
    },
    Rule {
        intent: Intent::SetName,
        matches: is_set_name,
    },
    Rule {
        intent: Intent::QueryName,
        matches: is_query_name,
    },
    Rule {
        intent: Intent::Weather,
        matches: is_weather,
    },
    Rule {
        intent: Intent::VowelCount,
        matches: is_vowel_count,
    },
    Rule {
        intent: Intent::SystemDiagnostics,
        matches: is_system,
    },
];

const GREETINGS: &[&str] = &["hi", "hello", "hey"];
const WEATHER_KEYWORDS: &[&str] = &["weather", "climate", "temperature", "wind"];
const SYSTEM_KEYWORDS: &[&str] = &["cpu", "memory", "ram", "disk", "system", "os"];

/// Classify one clause.
pub fn classify(clause: &str) -> Intent {
    let lower = clause.trim().to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(lower.as_str()))
        .map_or(Intent::Unknown, |rule| rule.intent)
}

fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

/// Whole-clause match only, so "this" or "high" never greet.
fn is_greeting(lower: &str) -> bool {
    GREETINGS.contains(&lower)
}

fn is_set_name(lower: &str) -> bool {
    extract::name(lower).is_some()
}

fn is_query_name(lower: &str) -> bool {
    lower.contains("my name")
}

fn is_weather(lower: &str) -> bool {
    matches_any(lower, WEATHER_KEYWORDS)
}

fn is_vowel_count(lower: &str) -> bool {
    lower.contains("vowel")
}

fn is_system(lower: &str) -> bool {
    matches_any(lower, SYSTEM_KEYWORDS)
}
