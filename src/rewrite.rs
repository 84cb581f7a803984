// src/rewrite.rs
// =============================================================================
// Document rewriter: applies a finished report to the source document.
//
// For every substitution (a redirect, or a URL that only worked after a
// correction) every literal occurrence of the original URL is replaced.
//
// All originals are matched in one pass over the document, longest first at
// any position, so "http://a.test/page" wins over a shorter "http://a.test"
// and replaced text is never looked at again.
// =============================================================================

use regex::{Captures, Regex, RegexBuilder};
use std::collections::HashMap;

// Reports with thousands of originals build a large alternation
const PATTERN_SIZE_LIMIT: usize = 256 * 1024 * 1024;

/// What happened to one substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub to: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub document: String,
    pub replacements: Vec<Replacement>,
}

impl RewriteOutcome {
    pub fn total_replaced(&self) -> usize {
        self.replacements.iter().map(|r| r.occurrences).sum()
    }
}

pub fn rewrite_document(
    document: &str,
    substitutions: &[(String, String)],
) -> Result<RewriteOutcome, regex::Error> {
    let mut ordered: Vec<&(String, String)> = substitutions
        .iter()
        .filter(|(from, to)| !from.is_empty() && from != to)
        .collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    ordered.dedup_by(|a, b| a.0 == b.0);

    if ordered.is_empty() {
        return Ok(RewriteOutcome {
            document: document.to_string(),
            replacements: Vec::new(),
        });
    }

    let matcher = alternation(&ordered)?;
    let slots: HashMap<&str, usize> = ordered
        .iter()
        .enumerate()
        .map(|(i, (from, _))| (from.as_str(), i))
        .collect();
    let mut occurrences = vec![0usize; ordered.len()];

    let text = matcher
        .replace_all(document, |caps: &Captures| {
            let matched = &caps[0];
            match slots.get(matched) {
                Some(&i) => {
                    occurrences[i] += 1;
                    ordered[i].1.clone()
                }
                None => matched.to_string(),
            }
        })
        .into_owned();

    let replacements = ordered
        .iter()
        .zip(occurrences)
        .map(|((from, to), occurrences)| Replacement {
            from: from.clone(),
            to: to.clone(),
            occurrences,
        })
        .collect();

    Ok(RewriteOutcome {
        document: text,
        replacements,
    })
}

// Leftmost-first alternation: with the longest original listed first it is
// the one picked when several start at the same position
fn alternation(ordered: &[&(String, String)]) -> Result<Regex, regex::Error> {
    let pattern = ordered
        .iter()
        .map(|(from, _)| regex::escape(from))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
}

/// One URL per line, for manual follow-up.
pub fn dead_links_list(urls: &[&str]) -> String {
    let mut out = urls.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
