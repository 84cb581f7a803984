// src/extract/text.rs
// Plain-text URL scanner: anything starting with http:// or https:// up to
// the next whitespace or one of < > " '.

use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).unwrap());

pub fn extract_text_links(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
