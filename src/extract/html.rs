// src/extract/html.rs
// =============================================================================
// This module extracts links from HTML documents.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// Absolute links are returned exactly as written in the href attribute so
// the rewriter can find them again in the source. Relative links are only
// kept when a base URL is known to resolve them against.
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

// Extracts all HTTP/HTTPS links from HTML content, in document order
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the page's own URL, if relative links should be resolved
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='https://rust-lang.org'>Rust</a>"
//   base_url = Some("https://example.com")
//   result = ["https://example.com/docs", "https://rust-lang.org"]
pub fn extract_html_links(html: &str, base_url: Option<&str>) -> Vec<String> {
    let document = Html::parse_document(html);

    // The selector is a constant, so parsing can only fail on a typo here
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    let base = base_url.and_then(|raw| match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(base_url = raw, error = %e, "Invalid base URL, relative links skipped");
            None
        }
    });

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(base.as_ref(), href.trim()))
        .collect()
}

// Absolute http(s) hrefs pass through untouched; relative ones are joined
// with the base (when we have one).
fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    if is_checkable_link(href) {
        return Some(href.to_string());
    }
    if href.is_empty() || href.starts_with('#') || Url::parse(href).is_ok() {
        // Empty, fragment-only, or some other scheme (mailto:, tel:, javascript:)
        return None;
    }

    let joined = base?.join(href).ok()?.to_string();
    is_checkable_link(&joined).then_some(joined)
}

fn is_checkable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link_verbatim() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_html_links(html, None);
        assert_eq!(links, vec!["https://www.rust-lang.org"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_html_links(html, Some("https://example.com/page"));
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_relative_link_without_base_is_skipped() {
        let html = r#"<a href="/docs">Docs</a>"#;
        assert!(extract_html_links(html, None).is_empty());
    }

    #[test]
    fn test_skip_mailto_and_anchors() {
        let html = r##"
            <a href="mailto:test@example.com">Email</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">Nothing</a>
        "##;
        let links = extract_html_links(html, Some("https://example.com"));
        assert!(links.is_empty());
    }

    #[test]
    fn test_multiple_links_in_document_order() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract_html_links(html, Some("https://example.com/page/"));
        assert_eq!(
            links,
            vec![
                "https://rust-lang.org",
                "https://example.com/docs",
                "https://example.com/about"
            ]
        );
    }
}
