// Report types
//
// Every measurement lands in a `MetricOutcome`: either the stats or an error
// marker. A failed measurement is report content, not a crate error, so one
// unreachable container or misbehaving service never aborts the run.

use crate::compare::Comparison;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A measurement that either produced stats or failed with a reason.
///
/// Serializes untagged: `Ok` flattens to the stats object, `Failed` becomes
/// `{"error": "..."}`, so consumers can distinguish the two by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricOutcome<T> {
    Ok(T),
    Failed { error: String },
}

impl<T> MetricOutcome<T> {
    /// Create a failure marker
    pub fn failed(msg: impl Into<String>) -> Self {
        MetricOutcome::Failed { error: msg.into() }
    }

    /// True when the measurement produced stats
    pub fn is_ok(&self) -> bool {
        matches!(self, MetricOutcome::Ok(_))
    }

    /// The stats, if the measurement succeeded
    pub fn as_ok(&self) -> Option<&T> {
        match self {
            MetricOutcome::Ok(value) => Some(value),
            MetricOutcome::Failed { .. } => None,
        }
    }

    /// The error message, if the measurement failed
    pub fn error(&self) -> Option<&str> {
        match self {
            MetricOutcome::Ok(_) => None,
            MetricOutcome::Failed { error } => Some(error),
        }
    }
}

/// Latency summary over sequential requests, all times in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub successful_requests: u32,
    pub failed_requests: u32,
}

/// Sustained throughput over the measurement window.
///
/// `total_requests` counts successes only; failures are tracked separately.
/// The rate is always `total_requests / duration_seconds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputStats {
    pub requests_per_second: f64,
    pub total_requests: u64,
    pub failed_requests: u64,
    pub duration_seconds: f64,
}

/// Container resource usage at one sampling point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStats {
    pub cpu_percent: f64,
    pub memory_usage_mb: f64,
    pub memory_percent: f64,
}

/// Size and shape of one representative response image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetrics {
    pub size_bytes: u64,
    pub size_kb: f64,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

/// All measurements for one target under one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetReport {
    pub label: String,
    pub latency: MetricOutcome<LatencyStats>,
    pub throughput: MetricOutcome<ThroughputStats>,
    pub resources: MetricOutcome<ResourceStats>,
    pub image: MetricOutcome<ImageMetrics>,
}

/// One scenario's full comparative result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub scenario: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub target_a: TargetReport,
    pub target_b: TargetReport,
    pub comparison: Comparison,
}

/// Round to two decimal places, the precision used for report values
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
