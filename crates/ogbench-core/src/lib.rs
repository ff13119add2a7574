// Comparative Image-Service Benchmark Engine
//
// This crate measures two HTTP image-generation services against a common
// scenario set and produces a comparative report per scenario.
//
// Key design decisions:
// - Measurement failures are data: every metric lands in a MetricOutcome and
//   the run always completes; crate errors are reserved for shell problems
// - Latency is strictly sequential (one in-flight request), throughput is
//   closed-loop in fixed batches, both cache-busted per request
// - Container telemetry sits behind the ContainerStatsSource trait with a
//   Docker Engine API implementation; tests stub the trait
// - Comparison fields are omitted, never sentineled, when a side failed
// - Targets (labels, base URLs, endpoints, containers) are configuration

pub mod compare;
pub mod config;
pub mod error;
pub mod image;
pub mod latency;
pub mod report;
pub mod request;
pub mod resources;
pub mod runner;
pub mod scenario;
pub mod throughput;

// Re-exports for convenience
pub use compare::{compare, Comparison, Improvement, SideBySide};
pub use config::{RunConfig, TargetConfig};
pub use error::{BenchError, Result};
pub use image::ImageMetricsMeasurer;
pub use latency::LatencyMeasurer;
pub use report::{
    BenchmarkResult, ImageMetrics, LatencyStats, MetricOutcome, ResourceStats, TargetReport,
    ThroughputStats,
};
pub use resources::{ContainerStatsSource, DockerStatsClient};
pub use runner::BenchmarkRunner;
pub use scenario::{load_scenarios, Scenario, ScenarioFile};
pub use throughput::ThroughputMeasurer;

/// Common imports for harness consumers
pub mod prelude {
    pub use crate::compare::{Comparison, Improvement, SideBySide};
    pub use crate::config::{RunConfig, TargetConfig};
    pub use crate::error::{BenchError, Result};
    pub use crate::report::{
        BenchmarkResult, ImageMetrics, LatencyStats, MetricOutcome, ResourceStats, TargetReport,
        ThroughputStats,
    };
    pub use crate::resources::{ContainerStatsSource, DockerStatsClient};
    pub use crate::runner::BenchmarkRunner;
    pub use crate::scenario::{load_scenarios, Scenario};
}
