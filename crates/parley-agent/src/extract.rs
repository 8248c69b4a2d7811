//! Argument extraction from clause text.
//!
//! Each extractor either yields a complete argument or `None`, in which
//! case the dispatcher answers with a help string instead of calling the
//! tool.

use regex::Regex;
use std::sync::LazyLock;

/// "my name is X" / "i am X" / "iam X", anchored at a word boundary.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:my name is|i am|iam)\s+(\w+)").unwrap());

/// "in <words>" / "at <words>"; the city runs to the first non-letter.
static CITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:in|at)\s+([a-z][a-z\s]*)").unwrap());

/// Exact-match spelling fixes applied after title-casing.
const CITY_FIXES: &[(&str, &str)] = &[
    ("Banglore", "Bangalore"),
    ("Hydrabad", "Hyderabad"),
    ("Chenai", "Chennai"),
];

/// Whole words removed from a vowel-count clause.
const VOWEL_STOPWORDS: &[&str] = &["vowel", "vowels", "count", "in"];

/// Which part of a diagnostics sample the user asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Cpu,
    Memory,
    Disk,
    General,
}

impl Focus {
    /// Checked in order: cpu, memory/ram, disk, otherwise general.
    pub fn from_clause(clause: &str) -> Self {
        let lower = clause.to_lowercase();
        if lower.contains("cpu") {
            Self::Cpu
        } else if lower.contains("memory") || lower.contains("ram") {
            Self::Memory
        } else if lower.contains("disk") {
            Self::Disk
        } else {
            Self::General
        }
    }
}

/// Name token following a name-set phrase, capitalized.
pub fn name(clause: &str) -> Option<String> {
    let caps = NAME_RE.captures(clause)?;
    Some(capitalize(&caps[1]))
}

/// City following "in" / "at", title-cased and spelling-corrected.
pub fn city(clause: &str) -> Option<String> {
    let caps = CITY_RE.captures(clause)?;
    let raw = caps[1].trim();
    if raw.is_empty() {
        return None;
    }
    let city = title_case(raw);
    let fixed = CITY_FIXES
        .iter()
        .find(|(wrong, _)| *wrong == city)
        .map(|(_, right)| (*right).to_string());
    Some(fixed.unwrap_or(city))
}

/// The word(s) to count vowels in: the clause lower-cased, with
/// punctuation and the keywords vowel(s)/count/in removed.
pub fn vowel_text(clause: &str) -> Option<String> {
    let lower = clause.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty() && !VOWEL_STOPWORDS.contains(w))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Hint forwarded with `system_diagnostics`.
pub fn diagnostics_detail(clause: &str) -> String {
    clause.to_lowercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Upper-case the first letter of every word, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
