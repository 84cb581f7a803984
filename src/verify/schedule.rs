// src/verify/schedule.rs
// =============================================================================
// Batch Scheduler: bounds concurrency and paces load against remote hosts.
//
// How it works:
// 1. Split the targets into consecutive batches of `batch_size`
// 2. Run every verification in a batch concurrently (join_all)
// 3. Wait until the whole batch has settled, then hand its results to the
//    aggregator in input order
// 4. Sleep `inter_batch_delay` before the next batch, if there is one
//
// So at most `batch_size` probes are ever in flight, and there is a quiet
// gap of at least `inter_batch_delay` between bursts.
// =============================================================================

use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info};

use super::aggregate::Aggregator;
use super::classify::{classify, CheckResult, ResultKind};
use super::correction::Target;
use super::probe::Prober;
use super::retry::{verify, RetryPolicy};

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub batch_size: usize,
    pub inter_batch_delay: Duration,
}

/// Verifies every target, batch by batch, feeding results into `aggregator`.
///
/// `batch_size` must be non-zero; `CheckConfig::validate` guarantees that
/// for the CLI path.
pub async fn run_batches<P: Prober>(
    targets: &[Target],
    settings: &BatchSettings,
    policy: &RetryPolicy,
    prober: &P,
    aggregator: &mut Aggregator,
) {
    let batch_size = settings.batch_size.max(1);
    let total_batches = targets.len().div_ceil(batch_size);

    for (index, batch) in targets.chunks(batch_size).enumerate() {
        let batch_number = index + 1;
        info!(
            batch = batch_number,
            total_batches,
            size = batch.len(),
            "Processing batch"
        );

        // join_all keeps input order: slot i belongs to batch[i]
        let results: Vec<CheckResult> =
            join_all(batch.iter().map(|target| check_one(prober, target, policy))).await;

        let errors = results.iter().filter(|r| r.kind == ResultKind::Error).count();
        info!(
            batch = batch_number,
            total_batches,
            errors,
            "Batch settled"
        );
        aggregator.extend(results);

        if batch_number < total_batches && !settings.inter_batch_delay.is_zero() {
            tokio::time::sleep(settings.inter_batch_delay).await;
        }
    }
}

async fn check_one<P: Prober>(prober: &P, target: &Target, policy: &RetryPolicy) -> CheckResult {
    let verification = verify(prober, &target.checked_url, policy).await;
    if verification.attempts_made() > 1 {
        debug!(
            url = %target.checked_url,
            history = %verification.history(),
            "Needed more than one attempt"
        );
    }
    classify(target, &verification)
}
