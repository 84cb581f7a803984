// src/extract/markdown.rs
// =============================================================================
// This module extracts links from Markdown text.
//
// We use the `pulldown-cmark` crate which parses Markdown into a stream of
// events (heading, paragraph, link, ...). Only the destinations of real
// links are collected, so URLs inside code blocks are ignored.
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};

// Extracts all HTTP/HTTPS links from Markdown text
//
// Example input:
//   "Check out [Rust](https://www.rust-lang.org)!"
//
// Example output:
//   vec!["https://www.rust-lang.org"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    let mut links = Vec::new();

    for event in Parser::new(markdown) {
        // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title).
        // Autolinks (<https://...>) arrive through the same tag.
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            let url = dest_url.to_string();
            if is_http_link(&url) {
                links.push(url);
            }
        }
    }

    links
}

// Skip mailto:, tel:, relative paths and the like
fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
