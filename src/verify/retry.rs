// src/verify/retry.rs
// =============================================================================
// Retrying Verifier: resolves the reachability of one URL.
//
// How it works:
// 1. Probe the URL
// 2. Success -> stop, remember the final URL
// 3. Terminal failure -> stop immediately, no retry
// 4. Transient failure with attempts left -> sleep base * attempt, try again
// 5. Transient failure on the last attempt -> stop, report that failure
//
// Nothing escapes this function: every call ends in exactly one Outcome.
// =============================================================================

use std::time::Duration;
use tracing::{debug, warn};

use super::probe::{Failure, Prober};

/// Retry knobs for a single URL.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Backoff before retry n is `backoff_base * n`
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn backoff_for(&self, attempt_index: u32) -> Duration {
        self.backoff_base
            .checked_mul(attempt_index)
            .unwrap_or(Duration::MAX)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// One network probe and what came of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// 1-based ordinal
    pub index: u32,
    /// Final URL on success
    pub result: Result<String, Failure>,
}

/// Raw result of the attempt loop, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    /// Transient failure that survived every allowed attempt
    TransientFailure(Failure),
    TerminalFailure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub outcome: Outcome,
    pub attempts: Vec<Attempt>,
}

impl Verification {
    pub fn attempts_made(&self) -> u32 {
        self.attempts.len() as u32
    }

    /// "#1 timeout, #2 ok" style summary of every attempt, for logs.
    pub fn history(&self) -> String {
        self.attempts
            .iter()
            .map(|attempt| match &attempt.result {
                Ok(_) => format!("#{} ok", attempt.index),
                Err(failure) => format!("#{} {failure}", attempt.index),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Probes `url` until it succeeds, fails terminally, or runs out of retries.
pub async fn verify<P: Prober>(prober: &P, url: &str, policy: &RetryPolicy) -> Verification {
    let max_attempts = policy.max_attempts();
    let mut attempts = Vec::new();
    let mut index = 1;

    loop {
        let result = prober.probe(url).await;
        attempts.push(Attempt {
            index,
            result: result.clone(),
        });

        let outcome = match result {
            Ok(final_url) => {
                debug!(url, attempt = index, final_url = %final_url, "Probe succeeded");
                Outcome::Success(final_url)
            }
            Err(failure) if failure.is_transient() && index < max_attempts => {
                let wait = policy.backoff_for(index);
                warn!(
                    url,
                    attempt = index,
                    max_attempts,
                    reason = %failure,
                    backoff_ms = wait.as_millis() as u64,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(wait).await;
                index += 1;
                continue;
            }
            Err(failure) if failure.is_transient() => {
                warn!(url, attempts = index, reason = %failure, "Retries exhausted");
                Outcome::TransientFailure(failure)
            }
            Err(failure) => {
                debug!(url, attempt = index, reason = %failure, "Terminal failure");
                Outcome::TerminalFailure(failure)
            }
        };

        return Verification { outcome, attempts };
    }
}
