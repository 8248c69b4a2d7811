//! Utterance segmentation.

/// Clause delimiter within one utterance.
pub const DELIMITER: char = ',';

/// Split an utterance into trimmed, non-empty clauses, in order.
pub fn segment(utterance: &str) -> Vec<&str> {
    utterance
        .split(DELIMITER)
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect()
}
