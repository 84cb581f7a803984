// src/verify/correction.rs
// =============================================================================
// Correction Resolver: swaps a known-dead or known-moved URL for a curated
// replacement before it is probed.
//
// The mapping is read-only once the run starts, so every concurrent
// verification can share it by reference.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A URL as requested by the document, paired with the URL we actually probe.
///
/// The original text is kept so the rewriter can still find it in the source
/// document even when a different URL was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub original_url: String,
    pub checked_url: String,
}

/// Lookup from requested URL to replacement URL.
///
/// Serializes as a plain JSON object: `{ "http://old": "https://new" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionMap {
    entries: HashMap<String, String>,
}

impl CorrectionMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Adds every entry of `other`, overriding entries with the same key.
    pub fn merge(&mut self, other: CorrectionMap) {
        self.entries.extend(other.entries);
    }

    /// Returns the URL to probe for `requested` (itself when unmapped).
    pub fn resolve(&self, requested: &str) -> Target {
        let checked_url = self
            .entries
            .get(requested)
            .cloned()
            .unwrap_or_else(|| requested.to_string());

        Target {
            original_url: requested.to_string(),
            checked_url,
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for CorrectionMap {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }
}
