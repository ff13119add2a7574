//! Container resource sampling.
//!
//! Usage is derived from the runtime's cumulative counters: one snapshot
//! carries the current and previous sampling points together, and CPU load
//! is the ratio of the two deltas scaled by core count (Docker's own
//! formula). The source of the counters sits behind `ContainerStatsSource`
//! so tests and alternative runtimes can supply their own.

use crate::error::{BenchError, Result};
use crate::report::{round2, MetricOutcome, ResourceStats};
use crate::request::build_client;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// One cumulative counter snapshot, mirroring the Docker Engine API wire
/// format (`GET /containers/{name}/stats?stream=false`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerCounters {
    pub cpu_stats: CpuStats,
    pub precpu_stats: CpuStats,
    pub memory_stats: MemoryStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuStats {
    pub cpu_usage: CpuUsage,
    pub system_cpu_usage: u64,
    #[serde(default)]
    pub online_cpus: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuUsage {
    pub total_usage: u64,
    #[serde(default)]
    pub percpu_usage: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub usage: u64,
    pub limit: u64,
}

impl CpuStats {
    /// Core count: `online_cpus` whenever the runtime reports it, else the
    /// per-CPU vector length, else 1
    fn num_cpus(&self) -> u32 {
        match self.online_cpus {
            Some(n) => n,
            None => match &self.cpu_usage.percpu_usage {
                Some(v) if !v.is_empty() => v.len() as u32,
                _ => 1,
            },
        }
    }
}

/// Source of cumulative container counters.
///
/// One call returns one atomic snapshot; the delta math below assumes the
/// current and previous points were captured together by the source.
#[async_trait]
pub trait ContainerStatsSource: Send + Sync {
    async fn counters(&self, container: &str) -> Result<ContainerCounters>;
}

/// Counter source backed by the Docker Engine HTTP API.
///
/// Expects the daemon on a TCP socket (e.g. `http://localhost:2375`).
/// `stream=false` makes the daemon return a single two-point sample.
pub struct DockerStatsClient {
    client: Client,
    docker_host: String,
}

impl DockerStatsClient {
    pub fn new(docker_host: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            docker_host: docker_host.into(),
        })
    }
}

#[async_trait]
impl ContainerStatsSource for DockerStatsClient {
    async fn counters(&self, container: &str) -> Result<ContainerCounters> {
        let url = format!(
            "{}/containers/{}/stats?stream=false",
            self.docker_host.trim_end_matches('/'),
            container
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BenchError::telemetry(format!("stats request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BenchError::telemetry(format!(
                "stats request for {container} returned status {}",
                status.as_u16()
            )));
        }

        response
            .json::<ContainerCounters>()
            .await
            .map_err(|e| BenchError::telemetry(format!("malformed stats for {container}: {e}")))
    }
}

/// CPU usage percentage from the counter deltas.
///
/// Deltas saturate at zero so a counter reset can never produce a negative
/// percentage; a zero system delta yields 0.0 rather than a division error.
pub fn cpu_percent(counters: &ContainerCounters) -> f64 {
    let cpu_delta = counters
        .cpu_stats
        .cpu_usage
        .total_usage
        .saturating_sub(counters.precpu_stats.cpu_usage.total_usage);
    let system_delta = counters
        .cpu_stats
        .system_cpu_usage
        .saturating_sub(counters.precpu_stats.system_cpu_usage);

    if system_delta == 0 {
        return 0.0;
    }

    cpu_delta as f64 / system_delta as f64 * counters.cpu_stats.num_cpus() as f64 * 100.0
}

/// Memory usage in MiB
pub fn memory_usage_mb(counters: &ContainerCounters) -> f64 {
    counters.memory_stats.usage as f64 / 1024.0 / 1024.0
}

/// Memory usage as a percentage of the limit, 0.0 when no limit is set
pub fn memory_percent(counters: &ContainerCounters) -> f64 {
    let limit = counters.memory_stats.limit;
    if limit == 0 {
        return 0.0;
    }
    counters.memory_stats.usage as f64 / limit as f64 * 100.0
}

/// Take one resource sample for `container`.
///
/// Source failures become failure markers; resource sampling never aborts a
/// benchmark.
pub async fn sample(
    source: &dyn ContainerStatsSource,
    container: &str,
) -> MetricOutcome<ResourceStats> {
    let counters = match source.counters(container).await {
        Ok(counters) => counters,
        Err(e) => {
            tracing::warn!("resource sample for {} failed: {}", container, e);
            return MetricOutcome::failed(e.to_string());
        }
    };

    MetricOutcome::Ok(ResourceStats {
        cpu_percent: round2(cpu_percent(&counters)),
        memory_usage_mb: round2(memory_usage_mb(&counters)),
        memory_percent: round2(memory_percent(&counters)),
    })
}
