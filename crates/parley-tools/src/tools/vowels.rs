//! count_vowels — count the vowels in a piece of text.

use parley_protocol::VowelReport;

const VOWELS: &str = "aeiou";

/// Vowels of `text` in order of appearance, lower-cased.
pub fn count_vowels(text: &str) -> VowelReport {
    let vowels: Vec<String> = text
        .to_lowercase()
        .chars()
        .filter(|c| VOWELS.contains(*c))
        .map(String::from)
        .collect();

    VowelReport {
        vowel_count: vowels.len() as u64,
        vowels,
    }
}
