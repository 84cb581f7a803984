//! Test utilities: a scripted [`Prober`] for engine tests without a network.
//!
//! Every clone shares the same state through `Arc<Mutex<_>>`, so tests can
//! hand a reference to the engine and still inspect what happened.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use super::probe::{Failure, Prober};

type ProbeResult = Result<String, Failure>;

enum Script {
    Always(ProbeResult),
    /// Pops in order; the last entry repeats once the rest are used up.
    Sequence(VecDeque<ProbeResult>),
}

/// When a probe of `url` ran, measured on tokio's (pausable) clock.
#[derive(Debug, Clone)]
pub struct ProbeSpan {
    pub url: String,
    pub started: Instant,
    pub finished: Instant,
}

/// Prober whose answers are scripted per URL.
///
/// Unscripted URLs succeed with no redirect.
#[derive(Clone, Default)]
pub struct ScriptedProber {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<HashMap<String, u32>>>,
    spans: Arc<Mutex<Vec<ProbeSpan>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    latency: Duration,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always(self, url: &str, result: ProbeResult) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), Script::Always(result));
        self
    }

    pub fn script(self, url: &str, results: Vec<ProbeResult>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), Script::Sequence(results.into()));
        self
    }

    /// Every probe sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self, url: &str) -> u32 {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn spans(&self) -> Vec<ProbeSpan> {
        self.spans.lock().unwrap().clone()
    }

    pub fn span(&self, url: &str) -> ProbeSpan {
        self.spans()
            .into_iter()
            .find(|s| s.url == url)
            .unwrap_or_else(|| panic!("{url} was never probed"))
    }

    fn next_result(&self, url: &str) -> ProbeResult {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(url) {
            None => Ok(url.to_string()),
            Some(Script::Always(result)) => result.clone(),
            Some(Script::Sequence(queue)) if queue.len() > 1 => {
                queue.pop_front().unwrap_or_else(|| Ok(url.to_string()))
            }
            Some(Script::Sequence(queue)) => {
                queue.front().cloned().unwrap_or_else(|| Ok(url.to_string()))
            }
        }
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self, url: &str) -> Result<String, Failure> {
        let started = Instant::now();
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let result = self.next_result(url);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.spans.lock().unwrap().push(ProbeSpan {
            url: url.to_string(),
            started,
            finished: Instant::now(),
        });
        result
    }
}
