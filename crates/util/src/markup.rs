//! Helpers for the pre-rendered `*_search` fields of search results.
//!
//! The server wraps matched substrings in highlight markup meant for a
//! browser. Terminal output wants plain text.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Remove HTML tags and decode the handful of entities the server emits.
pub fn strip_markup(input: &str) -> String {
    let without_tags = TAG.replace_all(input, "");
    decode_entities(&without_tags)
}

fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
