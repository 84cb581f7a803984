// src/config.rs
// =============================================================================
// Run configuration.
//
// One plain value handed to the engine entry point. It can be loaded from a
// JSON file (every field optional) and then overridden by CLI flags.
//
// Example file:
//   {
//     "batchSize": 10,
//     "interBatchDelayMs": 1000,
//     "timeoutPerAttemptMs": 15000,
//     "maxRetries": 2,
//     "maxRedirectHops": 5,
//     "correctionMapping": { "http://sbppoly.ac.in": "https://www.sbmp.ac.in/" }
//   }
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::CheckError;
use crate::verify::{BatchSettings, CorrectionMap, ProbeSettings, RetryPolicy};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckConfig {
    /// How many URLs are verified concurrently
    pub batch_size: usize,
    /// Pause between two batches
    pub inter_batch_delay_ms: u64,
    /// Deadline for one attempt (HEAD plus optional GET fallback)
    pub timeout_per_attempt_ms: u64,
    /// Extra attempts for transient failures
    pub max_retries: u32,
    /// Redirects followed before giving up
    pub max_redirect_hops: usize,
    /// Backoff before retry n is this times n
    pub retry_backoff_ms: u64,
    pub user_agent: String,
    pub correction_mapping: CorrectionMap,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            inter_batch_delay_ms: 1000,
            timeout_per_attempt_ms: 15_000,
            max_retries: 2,
            max_redirect_hops: 5,
            retry_backoff_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            correction_mapping: CorrectionMap::default(),
        }
    }
}

impl CheckConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Merges a JSON object of `{ "from": "to" }` corrections over the
    /// mapping already in the config.
    pub fn merge_corrections_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading corrections file {}", path.display()))?;
        let extra: CorrectionMap = serde_json::from_str(&raw)
            .with_context(|| format!("parsing corrections file {}", path.display()))?;
        self.correction_mapping.merge(extra);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CheckError> {
        if self.batch_size == 0 {
            return Err(CheckError::InvalidConfig(
                "batchSize must be greater than 0".to_string(),
            ));
        }
        if self.timeout_per_attempt_ms == 0 {
            return Err(CheckError::InvalidConfig(
                "timeoutPerAttemptMs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            batch_size: self.batch_size,
            inter_batch_delay: Duration::from_millis(self.inter_batch_delay_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_millis(self.timeout_per_attempt_ms),
            max_redirect_hops: self.max_redirect_hops,
            user_agent: self.user_agent.clone(),
        }
    }
}
