//! Sequential latency measurement.
//!
//! Requests are strictly sequential: the next GET is issued only after the
//! previous response body has been fully drained, so one request is in
//! flight at a time by construction. Every request is cache-busted.

use crate::config::TargetConfig;
use crate::report::{LatencyStats, MetricOutcome};
use crate::request::{self, FetchOutcome};
use crate::scenario::Scenario;
use reqwest::Client;

/// Measures per-request latency over a fixed number of sequential runs
pub struct LatencyMeasurer {
    client: Client,
}

impl LatencyMeasurer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Run `runs` sequential cache-busted GETs and summarize the samples.
    ///
    /// Failed requests (non-200 or transport errors) are counted and
    /// contribute no sample. When every request fails there is nothing to
    /// summarize and the outcome is a failure marker.
    pub async fn measure(
        &self,
        target: &TargetConfig,
        scenario: &Scenario,
        runs: u32,
    ) -> MetricOutcome<LatencyStats> {
        tracing::info!(
            "measuring latency for {}: {} sequential requests",
            target.label,
            runs
        );

        let mut samples: Vec<f64> = Vec::with_capacity(runs as usize);
        let mut failed = 0u32;

        for i in 0..runs {
            let url = match request::request_url(target, scenario, true) {
                Ok(url) => url,
                Err(e) => return MetricOutcome::failed(format!("invalid request URL: {e}")),
            };

            match request::fetch(&self.client, url).await {
                FetchOutcome::Success { elapsed, .. } => {
                    samples.push(elapsed.as_secs_f64() * 1000.0);
                }
                FetchOutcome::HttpError { .. } | FetchOutcome::TransportError { .. } => {
                    failed += 1;
                }
            }

            if (i + 1) % 100 == 0 {
                tracing::debug!("latency progress: {}/{}", i + 1, runs);
            }
        }

        if samples.is_empty() {
            return MetricOutcome::failed("all requests failed");
        }

        MetricOutcome::Ok(LatencyStats::from_samples(samples, failed))
    }
}

impl LatencyStats {
    /// Summarize raw per-request samples in milliseconds.
    ///
    /// Percentiles are nearest-rank on the ascending sort. The median is the
    /// element at index `n / 2` (the upper middle for even counts), kept as
    /// is so numbers stay comparable with earlier harness runs. With no
    /// samples every figure is zero.
    pub fn from_samples(mut samples: Vec<f64>, failed_requests: u32) -> Self {
        if samples.is_empty() {
            return Self {
                mean_ms: 0.0,
                median_ms: 0.0,
                p95_ms: 0.0,
                p99_ms: 0.0,
                min_ms: 0.0,
                max_ms: 0.0,
                successful_requests: 0,
                failed_requests,
            };
        }

        samples.sort_by(|a, b| a.total_cmp(b));
        let n = samples.len();

        Self {
            mean_ms: samples.iter().sum::<f64>() / n as f64,
            median_ms: samples[n / 2],
            p95_ms: samples[percentile_index(n, 0.95)],
            p99_ms: samples[percentile_index(n, 0.99)],
            min_ms: samples[0],
            max_ms: samples[n - 1],
            successful_requests: n as u32,
            failed_requests,
        }
    }
}

/// Nearest-rank index, clamped to the last element
fn percentile_index(n: usize, p: f64) -> usize {
    ((n as f64 * p) as usize).min(n - 1)
}
