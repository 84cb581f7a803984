// src/extract/mod.rs
// =============================================================================
// This module turns a source document into the URL list the engine checks.
//
// Submodules:
// - html: links from <a href> in HTML pages
// - markdown: links from Markdown documents
// - text: any http(s) token in plain text
//
// Deduplication happens exactly once, here: case-sensitive, exact string,
// first occurrence wins. The engine never deduplicates again.
// =============================================================================

mod html;
mod markdown;
mod text;

pub use html::extract_html_links;
pub use markdown::extract_markdown_links;
pub use text::extract_text_links;

use clap::ValueEnum;
use std::collections::HashSet;
use std::path::Path;

/// How to read the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Pick from the file extension (.html/.htm, .md/.markdown, else text)
    Auto,
    Text,
    Html,
    Markdown,
}

impl InputFormat {
    /// Resolves `Auto` against the file name; other formats are returned as-is.
    pub fn resolve(self, path: &Path) -> InputFormat {
        if self != InputFormat::Auto {
            return self;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("html") | Some("htm") => InputFormat::Html,
            Some("md") | Some("markdown") => InputFormat::Markdown,
            _ => InputFormat::Text,
        }
    }
}

/// Extracts and deduplicates every checkable URL in `content`.
pub fn extract_urls(content: &str, format: InputFormat, base_url: Option<&str>) -> Vec<String> {
    let links = match format {
        InputFormat::Html => extract_html_links(content, base_url),
        InputFormat::Markdown => extract_markdown_links(content),
        InputFormat::Text | InputFormat::Auto => extract_text_links(content),
    };
    dedup_urls(links)
}

/// Removes exact duplicates, keeping the first occurrence's position.
pub fn dedup_urls(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let urls = vec![
            "http://x.test".to_string(),
            "http://y.test".to_string(),
            "http://x.test".to_string(),
        ];
        assert_eq!(dedup_urls(urls), vec!["http://x.test", "http://y.test"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let urls = vec!["http://X.test".to_string(), "http://x.test".to_string()];
        assert_eq!(dedup_urls(urls).len(), 2);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("top_vocational.HTML")),
            InputFormat::Html
        );
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("README.md")),
            InputFormat::Markdown
        );
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("input_data.txt")),
            InputFormat::Text
        );
        assert_eq!(
            InputFormat::Text.resolve(Path::new("page.html")),
            InputFormat::Text
        );
    }

    #[test]
    fn test_extract_urls_dedups() {
        let html = r#"<a href="http://a.test">A</a><a href="http://a.test">A again</a>"#;
        assert_eq!(
            extract_urls(html, InputFormat::Html, None),
            vec!["http://a.test"]
        );
    }
}
