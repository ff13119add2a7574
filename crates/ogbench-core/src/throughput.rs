//! Closed-loop throughput measurement.
//!
//! Load is driven in fixed-size batches: spawn `BATCH_SIZE` concurrent
//! requests, join them all (one synchronization point per batch), fold the
//! batch outcome into the running totals, pause briefly, repeat until the
//! window has elapsed. Request tasks share nothing; each returns its own
//! outcome and the loop does all the counting.

use crate::config::TargetConfig;
use crate::error::Result;
use crate::report::{MetricOutcome, ThroughputStats};
use crate::request;
use crate::scenario::Scenario;
use futures::future::join_all;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Concurrent requests per batch
pub const BATCH_SIZE: usize = 10;

/// Pause between batches
pub const BATCH_PAUSE: Duration = Duration::from_millis(10);

/// Counts folded out of one batch of concurrent requests
#[derive(Debug, Default, Clone, Copy)]
struct BatchOutcome {
    successes: u64,
    failures: u64,
}

/// Measures sustained throughput over a wall-clock window
pub struct ThroughputMeasurer {
    client: Client,
}

impl ThroughputMeasurer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Drive closed-loop load against the target for `duration`.
    ///
    /// The rate is successful requests over the *actual* elapsed time at
    /// loop exit, which includes the final batch and the inter-batch
    /// pauses. A target that fails every request still produces stats with
    /// a zero rate; the comparison layer decides what that means.
    pub async fn measure(
        &self,
        target: &TargetConfig,
        scenario: &Scenario,
        duration: Duration,
    ) -> MetricOutcome<ThroughputStats> {
        tracing::info!(
            "measuring throughput for {}: {:?} window, batches of {}",
            target.label,
            duration,
            BATCH_SIZE
        );

        let started = Instant::now();
        let mut successes: u64 = 0;
        let mut failures: u64 = 0;

        while started.elapsed() < duration {
            let batch = match self.run_batch(target, scenario).await {
                Ok(batch) => batch,
                Err(e) => return MetricOutcome::failed(format!("invalid request URL: {e}")),
            };
            successes += batch.successes;
            failures += batch.failures;

            tokio::time::sleep(BATCH_PAUSE).await;
        }

        let elapsed = started.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            successes as f64 / elapsed
        } else {
            0.0
        };

        MetricOutcome::Ok(ThroughputStats {
            requests_per_second: rate,
            total_requests: successes,
            failed_requests: failures,
            duration_seconds: elapsed,
        })
    }

    /// One batch: spawn `BATCH_SIZE` request tasks and fold their outcomes
    async fn run_batch(&self, target: &TargetConfig, scenario: &Scenario) -> Result<BatchOutcome> {
        let mut tasks = Vec::with_capacity(BATCH_SIZE);
        for _ in 0..BATCH_SIZE {
            let url = request::request_url(target, scenario, true)?;
            let client = self.client.clone();
            tasks.push(tokio::spawn(async move {
                request::fetch(&client, url).await.is_success()
            }));
        }

        Ok(fold_batch(tasks).await)
    }
}

/// Join a batch of request tasks and count the outcomes. A panicked task
/// counts as a failure.
async fn fold_batch(tasks: Vec<JoinHandle<bool>>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for joined in join_all(tasks).await {
        match joined {
            Ok(true) => outcome.successes += 1,
            Ok(false) => outcome.failures += 1,
            Err(e) => {
                tracing::warn!("request task failed to join: {}", e);
                outcome.failures += 1;
            }
        }
    }
    outcome
}
