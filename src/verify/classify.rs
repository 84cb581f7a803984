// src/verify/classify.rs
// =============================================================================
// Result Classifier: turns the verifier's raw outcome into the final record
// for one requested URL.
//
// Pure and synchronous. The "did it move?" policy is an exact string
// comparison between the checked URL and the final URL; the prober is
// responsible for returning the checked spelling when nothing moved.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::correction::Target;
use super::retry::{Outcome, Verification};

/// Which bucket a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultKind {
    /// Reachable and served at the checked URL
    Ok,
    /// Reachable, but served from a different URL
    Redirect,
    /// Unreachable
    Error,
}

/// The terminal record for one requested URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub original_url: String,
    pub checked_url: String,
    pub kind: ResultKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub final_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
    pub attempts_made: u32,
}

impl CheckResult {
    /// The URL this result says the document should link to, if it differs
    /// from what the document currently says.
    pub fn replacement(&self) -> Option<&str> {
        let target = match self.kind {
            ResultKind::Redirect => self.final_url.as_deref()?,
            ResultKind::Ok => self.checked_url.as_str(),
            ResultKind::Error => return None,
        };
        (target != self.original_url).then_some(target)
    }
}

/// Builds the [`CheckResult`] for `target` from its verification.
pub fn classify(target: &Target, verification: &Verification) -> CheckResult {
    let attempts_made = verification.attempts_made();

    let (kind, final_url, reason) = match &verification.outcome {
        Outcome::Success(final_url) if *final_url == target.checked_url => {
            (ResultKind::Ok, None, None)
        }
        Outcome::Success(final_url) => (ResultKind::Redirect, Some(final_url.clone()), None),
        Outcome::TransientFailure(failure) | Outcome::TerminalFailure(failure) => {
            let reason = failure.to_string();
            let reason = if reason.is_empty() {
                "unknown error".to_string()
            } else {
                reason
            };
            (ResultKind::Error, None, Some(reason))
        }
    };

    CheckResult {
        original_url: target.original_url.clone(),
        checked_url: target.checked_url.clone(),
        kind,
        final_url,
        reason,
        attempts_made,
    }
}
