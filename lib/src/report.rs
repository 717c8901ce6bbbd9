//! Rendering helpers for CLI consumers.

use std::collections::BTreeMap;

/// Render a frequency mapping as indented JSON.
///
/// ## Errors
///
/// Propagates the serializer error, which cannot occur for a string-keyed
/// map in practice.
pub fn render_frequencies(frequencies: &BTreeMap<String, u64>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(frequencies)
}

/// Render a generated sequence as an arrow-separated chain.
pub fn render_sequence(sequence: &[String]) -> String {
    sequence.join(" -> ")
}
