//! Cross-target comparison.
//!
//! Verdicts are only computed when both sides produced stats. A side that
//! carried a failure marker makes the corresponding fields disappear from
//! the comparison entirely; consumers never see sentinel values.

use crate::report::TargetReport;
use serde::{Deserialize, Serialize};

/// Relative improvement of the winning side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Improvement {
    /// Margin in percent
    Percent(f64),
    /// Not computable: one or both throughput rates were zero
    NotApplicable,
}

/// The same metric for both targets, no winner declared
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideBySide {
    pub target_a: f64,
    pub target_b: f64,
}

/// Cross-target verdicts for one scenario.
///
/// A `None` field means the verdict was unavailable because one side's
/// measurement failed; it is omitted from serialized output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comparison {
    /// Label of the target with the lower p95 latency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_winner: Option<String>,

    /// Latency margin as a percentage of the slower side's p95
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_improvement: Option<f64>,

    /// Label of the target with the higher request rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput_winner: Option<String>,

    /// Throughput margin as a percentage of the lower rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput_improvement: Option<Improvement>,

    /// CPU usage of both containers, side by side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<SideBySide>,

    /// Memory usage (MiB) of both containers, side by side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<SideBySide>,
}

/// Compute the cross-target verdicts from two target reports.
///
/// Exact ties go to target B on both latency and throughput.
pub fn compare(a: &TargetReport, b: &TargetReport) -> Comparison {
    let mut comparison = Comparison::default();

    if let (Some(a_lat), Some(b_lat)) = (a.latency.as_ok(), b.latency.as_ok()) {
        let winner = if a_lat.p95_ms < b_lat.p95_ms {
            &a.label
        } else {
            &b.label
        };
        comparison.latency_winner = Some(winner.clone());
        comparison.latency_improvement = Some(margin_of_max(a_lat.p95_ms, b_lat.p95_ms));
    }

    if let (Some(a_tp), Some(b_tp)) = (a.throughput.as_ok(), b.throughput.as_ok()) {
        let (a_rate, b_rate) = (a_tp.requests_per_second, b_tp.requests_per_second);
        let winner = if a_rate > b_rate { &a.label } else { &b.label };
        comparison.throughput_winner = Some(winner.clone());
        comparison.throughput_improvement = Some(if a_rate > 0.0 && b_rate > 0.0 {
            Improvement::Percent(margin_of_min(a_rate, b_rate))
        } else {
            Improvement::NotApplicable
        });
    }

    if let (Some(a_res), Some(b_res)) = (a.resources.as_ok(), b.resources.as_ok()) {
        comparison.cpu_usage = Some(SideBySide {
            target_a: a_res.cpu_percent,
            target_b: b_res.cpu_percent,
        });
        comparison.memory_usage = Some(SideBySide {
            target_a: a_res.memory_usage_mb,
            target_b: b_res.memory_usage_mb,
        });
    }

    comparison
}

/// |a - b| as a percentage of the larger value; 0.0 when both are zero
fn margin_of_max(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max <= 0.0 {
        return 0.0;
    }
    (a - b).abs() / max * 100.0
}

/// |a - b| as a percentage of the smaller value; callers guarantee both
/// values are positive
fn margin_of_min(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.min(b) * 100.0
}
