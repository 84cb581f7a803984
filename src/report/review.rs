// src/report/review.rs
// =============================================================================
// Interactive review page for the links that are still broken.
//
// One table row per ERROR result, with:
// - a "Test Link" button that opens the original URL
// - a "Search" button that searches the web for a name guessed from the
//   host ("www.sbp-poly.ac.in" -> "sbp poly")
//
// The page is a single self-contained HTML file rendered from
// templates/review.html.
// =============================================================================

use askama::Template;
use url::form_urlencoded::byte_serialize;
use url::Url;

use crate::verify::Report;

const SEARCH_ENDPOINT: &str = "https://www.google.com/search?q=";

// Host labels that say nothing about who the site belongs to
const NOISE_LABELS: [&str; 8] = ["www", "com", "ac", "in", "edu", "org", "net", "co"];

/// Renders `templates/review.html`. Every field is HTML-escaped by askama.
#[derive(Template)]
#[template(path = "review.html")]
struct ReviewPage {
    count: usize,
    rows: Vec<ReviewRow>,
}

struct ReviewRow {
    url: String,
    reason: String,
    search_url: String,
    terms: String,
}

/// Renders the review page for every ERROR entry in `report`.
pub fn render_review_page(report: &Report) -> Result<String, askama::Error> {
    let rows: Vec<ReviewRow> = report
        .summary()
        .error
        .into_iter()
        .map(|entry| {
            let terms = search_terms(&entry.url);
            let search_url = format!(
                "{SEARCH_ENDPOINT}{}",
                byte_serialize(terms.as_bytes()).collect::<String>()
            );
            ReviewRow {
                url: entry.url,
                reason: entry.reason,
                search_url,
                terms,
            }
        })
        .collect();

    ReviewPage {
        count: rows.len(),
        rows,
    }
    .render()
}

/// Guesses an organisation name from a URL's host.
///
/// Falls back to the raw URL when it does not parse.
pub fn search_terms(url: &str) -> String {
    let host = match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => return url.to_string(),
        },
        Err(_) => return url.to_string(),
    };

    let words: Vec<String> = host
        .split('.')
        .filter(|label| !label.is_empty() && !NOISE_LABELS.contains(label))
        .map(|label| label.replace('-', " "))
        .collect();

    if words.is_empty() {
        host
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{Aggregator, CheckResult, ResultKind};

    fn error_report(urls: &[&str]) -> Report {
        let mut agg = Aggregator::new();
        for url in urls {
            agg.push(CheckResult {
                original_url: url.to_string(),
                checked_url: url.to_string(),
                kind: ResultKind::Error,
                final_url: None,
                reason: Some("dns resolution failed".into()),
                attempts_made: 1,
            });
        }
        agg.finish()
    }

    #[test]
    fn test_search_terms_strip_noise() {
        assert_eq!(search_terms("http://www.sbp-poly.ac.in/"), "sbp poly");
        assert_eq!(search_terms("https://nmcollege.com/about"), "nmcollege");
        assert_eq!(search_terms("not a url"), "not a url");
    }

    #[test]
    fn test_page_has_one_row_per_error() {
        let page = render_review_page(&error_report(&["http://a.test", "http://b-c.org"])).unwrap();

        assert!(page.contains("<title>Link Error Review (2 Errors)</title>"));
        assert_eq!(page.matches("class=\"broken-link\"").count(), 2);
        assert!(page.contains("https://www.google.com/search?q=b+c"));
        assert!(page.contains("dns resolution failed"));
    }

    #[test]
    fn test_urls_are_escaped() {
        let page =
            render_review_page(&error_report(&["http://a.test/?q=<script>&x=\"1\""])).unwrap();
        assert!(!page.contains("<script>"));
        assert!(!page.contains("&x=\"1\""));
        assert!(page.contains("http://a.test/?q="));
    }
}
