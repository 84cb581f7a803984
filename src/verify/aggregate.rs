// src/verify/aggregate.rs
// =============================================================================
// Result Aggregator: folds the stream of CheckResults (batch by batch, in
// scheduler order) into OK / REDIRECT / ERROR buckets.
//
// First-seen order is preserved inside each bucket. Once `finish` is called
// the Report is read-only.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::classify::{CheckResult, ResultKind};

/// Per-bucket totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub ok: usize,
    pub redirected: usize,
    pub error: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.ok + self.redirected + self.error
    }
}

/// Collects results while a run is in progress.
#[derive(Debug, Default)]
pub struct Aggregator {
    ok: Vec<CheckResult>,
    redirected: Vec<CheckResult>,
    error: Vec<CheckResult>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: CheckResult) {
        match result.kind {
            ResultKind::Ok => self.ok.push(result),
            ResultKind::Redirect => self.redirected.push(result),
            ResultKind::Error => self.error.push(result),
        }
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = CheckResult>) {
        for result in results {
            self.push(result);
        }
    }

    pub fn finish(self) -> Report {
        let counts = Counts {
            ok: self.ok.len(),
            redirected: self.redirected.len(),
            error: self.error.len(),
        };
        Report {
            ok: self.ok,
            redirected: self.redirected,
            error: self.error,
            counts,
        }
    }
}

/// The finalized result set of one run.
///
/// This full form is what gets written as the JSON report; `summary()` gives
/// the compact view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub ok: Vec<CheckResult>,
    pub redirected: Vec<CheckResult>,
    pub error: Vec<CheckResult>,
    pub counts: Counts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectEntry {
    pub original: String,
    #[serde(rename = "final")]
    pub final_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub url: String,
    pub reason: String,
}

/// Compact view: `{ ok: [...], redirected: [{original, final}], error: [{url, reason}], counts }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub ok: Vec<String>,
    pub redirected: Vec<RedirectEntry>,
    pub error: Vec<ErrorEntry>,
    pub counts: Counts,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.counts.error > 0
    }

    /// All results in bucket order (OK, then REDIRECT, then ERROR).
    pub fn results(&self) -> impl Iterator<Item = &CheckResult> {
        self.ok.iter().chain(&self.redirected).chain(&self.error)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            ok: self.ok.iter().map(|r| r.original_url.clone()).collect(),
            redirected: self
                .redirected
                .iter()
                .map(|r| RedirectEntry {
                    original: r.original_url.clone(),
                    final_url: r.final_url.clone().unwrap_or_default(),
                })
                .collect(),
            error: self
                .error
                .iter()
                .map(|r| ErrorEntry {
                    url: r.original_url.clone(),
                    reason: r.reason.clone().unwrap_or_default(),
                })
                .collect(),
            counts: self.counts,
        }
    }

    /// `(original, replacement)` pairs for the document rewriter.
    ///
    /// Covers redirects and OK results that were only OK because a
    /// correction was applied.
    pub fn substitutions(&self) -> Vec<(String, String)> {
        self.results()
            .filter_map(|r| {
                r.replacement()
                    .map(|to| (r.original_url.clone(), to.to_string()))
            })
            .collect()
    }

    pub fn error_urls(&self) -> Vec<&str> {
        self.error.iter().map(|r| r.original_url.as_str()).collect()
    }
}
