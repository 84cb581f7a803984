// src/verify/mod.rs
// =============================================================================
// The link-verification engine.
//
// Submodules (leaves first):
// - correction: swaps requested URLs for curated replacements
// - probe:      one HTTP probe + failure classification
// - retry:      the per-URL attempt loop with backoff
// - classify:   raw outcome -> CheckResult (OK / REDIRECT / ERROR)
// - schedule:   fixed-size concurrent batches with a pause in between
// - aggregate:  buckets and counts for the finished run
//
// Data flow:
//   URLs -> correction -> schedule -> retry/probe -> classify -> aggregate
// =============================================================================

mod aggregate;
mod classify;
mod correction;
mod probe;
mod retry;
mod schedule;

#[cfg(test)]
pub(crate) mod testutil;

pub use aggregate::{Aggregator, Report};
pub use classify::{CheckResult, ResultKind};
pub use correction::CorrectionMap;
pub use probe::{HttpProber, ProbeSettings, Prober};
pub use retry::RetryPolicy;
pub use schedule::BatchSettings;

use correction::Target;
use schedule::run_batches;
use tracing::info;

use crate::config::CheckConfig;
use crate::error::CheckError;

/// Verifies a deduplicated URL list and returns the finished report.
///
/// Every URL in `urls` produces exactly one result. The list is taken as-is:
/// deduplication belongs to whoever extracted it.
pub async fn check_urls<P: Prober>(
    urls: &[String],
    config: &CheckConfig,
    prober: &P,
) -> Result<Report, CheckError> {
    if urls.is_empty() {
        return Err(CheckError::NoUrls);
    }
    config.validate()?;

    let targets: Vec<Target> = urls
        .iter()
        .map(|url| config.correction_mapping.resolve(url))
        .collect();

    let corrected = targets
        .iter()
        .filter(|t| t.checked_url != t.original_url)
        .count();
    info!(
        urls = targets.len(),
        corrected,
        corrections = config.correction_mapping.len(),
        batch_size = config.batch_size,
        "Starting verification run"
    );

    let mut aggregator = Aggregator::new();
    run_batches(
        &targets,
        &config.batch_settings(),
        &config.retry_policy(),
        prober,
        &mut aggregator,
    )
    .await;

    let report = aggregator.finish();
    info!(
        ok = report.counts.ok,
        redirected = report.counts.redirected,
        error = report.counts.error,
        "Verification run complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe::Failure;
    use testutil::ScriptedProber;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_scenario() {
        let input = crate::extract::dedup_urls(urls(&[
            "http://x.test",
            "http://y.test",
            "http://x.test",
        ]));
        assert_eq!(input, urls(&["http://x.test", "http://y.test"]));

        let prober = ScriptedProber::new().always("http://x.test", Err(Failure::Timeout));
        let config = CheckConfig {
            max_retries: 2,
            ..CheckConfig::default()
        };

        let report = check_urls(&input, &config, &prober).await.unwrap();

        assert_eq!(
            serde_json::to_value(report.summary()).unwrap(),
            serde_json::json!({
                "ok": ["http://y.test"],
                "redirected": [],
                "error": [{"url": "http://x.test", "reason": "timeout"}],
                "counts": {"ok": 1, "redirected": 0, "error": 1}
            })
        );
        assert_eq!(report.error[0].attempts_made, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_url_yields_one_result() {
        let input: Vec<String> = (0..23).map(|i| format!("http://h{i}.test")).collect();
        let prober = ScriptedProber::new()
            .always("http://h3.test", Err(Failure::Dns))
            .always("http://h7.test", Ok("https://h7.test/".to_string()))
            .always("http://h11.test", Err(Failure::ConnectionReset));
        let config = CheckConfig {
            batch_size: 5,
            ..CheckConfig::default()
        };

        let report = check_urls(&input, &config, &prober).await.unwrap();

        assert_eq!(report.counts.total(), 23);
        let mut seen: Vec<_> = report.results().map(|r| r.original_url.clone()).collect();
        seen.sort();
        let mut want = input.clone();
        want.sort();
        assert_eq!(seen, want);
        for r in report.results() {
            assert!(r.attempts_made >= 1 && r.attempts_made <= 1 + config.max_retries);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_correction_is_transparent() {
        let prober = ScriptedProber::new();
        let config = CheckConfig {
            correction_mapping: CorrectionMap::from([("http://a.example", "https://a.example")]),
            ..CheckConfig::default()
        };

        let report = check_urls(&urls(&["http://a.example"]), &config, &prober)
            .await
            .unwrap();

        let r = &report.ok[0];
        assert_eq!(r.original_url, "http://a.example");
        assert_eq!(r.checked_url, "https://a.example");
        assert_eq!(r.kind, ResultKind::Ok);
        assert_eq!(prober.calls("http://a.example"), 0);
        assert_eq!(prober.calls("https://a.example"), 1);
    }

    #[tokio::test]
    async fn test_empty_input_is_no_work() {
        let prober = ScriptedProber::new();
        let err = check_urls(&[], &CheckConfig::default(), &prober)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::NoUrls));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let prober = ScriptedProber::new();
        let config = CheckConfig {
            batch_size: 0,
            ..CheckConfig::default()
        };
        let err = check_urls(&urls(&["http://a.test"]), &config, &prober)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::InvalidConfig(_)));
        assert_eq!(prober.calls("http://a.test"), 0);
    }
}
