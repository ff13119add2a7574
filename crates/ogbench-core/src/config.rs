// Benchmark configuration
//
// TargetConfig describes one service under test; RunConfig carries the knobs
// shared by every scenario. Both are plain data built by the shell: nothing
// here talks to the network.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One service under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Human-readable label used in reports and winner fields
    pub label: String,

    /// Base URL of the service (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Path of the image endpoint relative to the base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Container name for resource sampling; when absent the resource
    /// measurement is reported as unavailable rather than attempted
    #[serde(default)]
    pub container: Option<String>,
}

fn default_endpoint() -> String {
    "/".to_string()
}

impl TargetConfig {
    /// Create a target with the default root endpoint and no container
    pub fn new(label: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            base_url: base_url.into(),
            endpoint: default_endpoint(),
            container: None,
        }
    }

    /// Set the image endpoint path
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the container name for resource sampling
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }
}

/// Per-run measurement knobs shared by all scenarios
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of sequential requests for the latency measurement
    #[serde(default = "default_runs")]
    pub runs: u32,

    /// Wall-clock window for the throughput measurement, in seconds
    #[serde(default = "default_throughput_duration_secs")]
    pub throughput_duration_secs: u64,
}

fn default_runs() -> u32 {
    1000
}

fn default_throughput_duration_secs() -> u64 {
    10
}

impl RunConfig {
    /// Set the latency run count
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    /// Set the throughput window in seconds
    pub fn with_throughput_duration_secs(mut self, secs: u64) -> Self {
        self.throughput_duration_secs = secs;
        self
    }

    /// Throughput window as a `Duration`
    pub fn throughput_duration(&self) -> Duration {
        Duration::from_secs(self.throughput_duration_secs)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            throughput_duration_secs: default_throughput_duration_secs(),
        }
    }
}
