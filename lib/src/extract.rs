//! Token extraction from diagram text.
//!
//! A token is a maximal run of word characters immediately preceding a
//! literal `:` - the identifier part of a node declaration like
//! `ec2:Amazon EC2`. Extraction is a pure function over the input: tokens
//! come back in order of appearance with duplicates preserved, and input
//! with no matches yields an empty iterator.

use std::sync::LazyLock;

use regex::Regex;

static SERVICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+):").expect("service token pattern compiles"));

/// Iterate over the service tokens in `text`.
///
/// Lazy and restartable: calling again over the same text yields the same
/// sequence. One item per occurrence; no deduplication.
pub fn service_tokens(text: &str) -> impl Iterator<Item = &str> {
    SERVICE_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}
