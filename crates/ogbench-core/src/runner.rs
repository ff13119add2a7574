//! Benchmark orchestration.
//!
//! One runner drives the whole suite: for each scenario it measures target
//! A's full sequence (latency, throughput, resources, image), then target
//! B's, then computes the comparison. Measurement failures are carried
//! inside the result; nothing a target does can abort a run.

use crate::compare;
use crate::config::{RunConfig, TargetConfig};
use crate::error::Result;
use crate::image::ImageMetricsMeasurer;
use crate::latency::LatencyMeasurer;
use crate::report::{BenchmarkResult, MetricOutcome, TargetReport};
use crate::request::build_client;
use crate::resources::{self, ContainerStatsSource};
use crate::scenario::Scenario;
use crate::throughput::ThroughputMeasurer;
use chrono::Utc;
use std::sync::Arc;

/// Drives the full measurement sequence, scenario after scenario
pub struct BenchmarkRunner {
    target_a: TargetConfig,
    target_b: TargetConfig,
    run_config: RunConfig,
    stats_source: Arc<dyn ContainerStatsSource>,
    latency: LatencyMeasurer,
    throughput: ThroughputMeasurer,
    image: ImageMetricsMeasurer,
}

impl BenchmarkRunner {
    /// Build a runner over two targets and a counter source
    pub fn new(
        target_a: TargetConfig,
        target_b: TargetConfig,
        run_config: RunConfig,
        stats_source: Arc<dyn ContainerStatsSource>,
    ) -> Result<Self> {
        let client = build_client()?;
        Ok(Self {
            target_a,
            target_b,
            run_config,
            stats_source,
            latency: LatencyMeasurer::new(client.clone()),
            throughput: ThroughputMeasurer::new(client.clone()),
            image: ImageMetricsMeasurer::new(client),
        })
    }

    /// Benchmark one scenario against both targets.
    ///
    /// Target A's sequence completes before target B's starts, so the two
    /// services never contend for client or container resources.
    pub async fn run_scenario(&self, scenario: &Scenario) -> BenchmarkResult {
        tracing::info!("scenario {}: benchmarking {}", scenario.name, self.target_a.label);
        let target_a = self.measure_target(&self.target_a, scenario).await;

        tracing::info!("scenario {}: benchmarking {}", scenario.name, self.target_b.label);
        let target_b = self.measure_target(&self.target_b, scenario).await;

        let comparison = compare::compare(&target_a, &target_b);

        BenchmarkResult {
            scenario: scenario.name.clone(),
            description: scenario.description.clone(),
            timestamp: Utc::now(),
            target_a,
            target_b,
            comparison,
        }
    }

    /// Benchmark every scenario, sequentially
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<BenchmarkResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run_scenario(scenario).await);
        }
        results
    }

    async fn measure_target(&self, target: &TargetConfig, scenario: &Scenario) -> TargetReport {
        let latency = self
            .latency
            .measure(target, scenario, self.run_config.runs)
            .await;

        let throughput = self
            .throughput
            .measure(target, scenario, self.run_config.throughput_duration())
            .await;

        let resources = match &target.container {
            Some(container) => resources::sample(self.stats_source.as_ref(), container).await,
            None => MetricOutcome::failed("no container configured"),
        };

        let image = self.image.measure(target, scenario).await;

        TargetReport {
            label: target.label.clone(),
            latency,
            throughput,
            resources,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ContainerCounters, CpuStats, CpuUsage, MemoryStats};
    use async_trait::async_trait;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StubSource;

    #[async_trait]
    impl ContainerStatsSource for StubSource {
        async fn counters(&self, _container: &str) -> Result<ContainerCounters> {
            Ok(ContainerCounters {
                cpu_stats: CpuStats {
                    cpu_usage: CpuUsage {
                        total_usage: 300,
                        percpu_usage: None,
                    },
                    system_cpu_usage: 2000,
                    online_cpus: Some(2),
                },
                precpu_stats: CpuStats {
                    cpu_usage: CpuUsage {
                        total_usage: 100,
                        percpu_usage: None,
                    },
                    system_cpu_usage: 1000,
                    online_cpus: Some(2),
                },
                memory_stats: MemoryStats {
                    usage: 64 * 1024 * 1024,
                    limit: 1024 * 1024 * 1024,
                },
            })
        }
    }

    async fn mock_image_service() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"stub body".to_vec()))
            .mount(&server)
            .await;
        server
    }

    fn quick_run_config() -> RunConfig {
        RunConfig::default()
            .with_runs(3)
            .with_throughput_duration_secs(0)
    }

    #[tokio::test]
    async fn test_run_scenario_produces_full_report() {
        let server_a = mock_image_service().await;
        let server_b = mock_image_service().await;

        let runner = BenchmarkRunner::new(
            TargetConfig::new("alpha", server_a.uri()).with_container("alpha-bench"),
            TargetConfig::new("beta", server_b.uri()).with_container("beta-bench"),
            quick_run_config(),
            Arc::new(StubSource),
        )
        .unwrap();

        let scenario = Scenario::new("simple").with_param("title", "t");
        let result = runner.run_scenario(&scenario).await;

        assert_eq!(result.scenario, "simple");
        assert_eq!(result.target_a.label, "alpha");
        assert_eq!(result.target_b.label, "beta");
        assert!(result.target_a.latency.is_ok());
        assert!(result.target_a.resources.is_ok());
        // stub body is not an image
        assert!(!result.target_a.image.is_ok());
        assert!(result.comparison.latency_winner.is_some());
    }

    #[tokio::test]
    async fn test_measurement_sequence_request_counts() {
        let server_a = mock_image_service().await;
        let server_b = mock_image_service().await;

        let runner = BenchmarkRunner::new(
            TargetConfig::new("alpha", server_a.uri()),
            TargetConfig::new("beta", server_b.uri()),
            quick_run_config(),
            Arc::new(StubSource),
        )
        .unwrap();

        runner.run_scenario(&Scenario::new("x")).await;

        // 3 latency runs + zero-window throughput + 1 image fetch per target
        for server in [&server_a, &server_b] {
            let received = server.received_requests().await.unwrap();
            assert_eq!(received.len(), 4);
        }
    }

    #[tokio::test]
    async fn test_run_all_keeps_scenario_order() {
        let server_a = mock_image_service().await;
        let server_b = mock_image_service().await;

        let runner = BenchmarkRunner::new(
            TargetConfig::new("alpha", server_a.uri()),
            TargetConfig::new("beta", server_b.uri()),
            RunConfig::default().with_runs(1).with_throughput_duration_secs(0),
            Arc::new(StubSource),
        )
        .unwrap();

        let scenarios = vec![Scenario::new("first"), Scenario::new("second")];
        let results = runner.run_all(&scenarios).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].scenario, "first");
        assert_eq!(results[1].scenario, "second");
    }

    #[tokio::test]
    async fn test_missing_container_yields_marker_not_attempt() {
        let server_a = mock_image_service().await;
        let server_b = mock_image_service().await;

        let runner = BenchmarkRunner::new(
            TargetConfig::new("alpha", server_a.uri()),
            TargetConfig::new("beta", server_b.uri()),
            quick_run_config(),
            Arc::new(StubSource),
        )
        .unwrap();

        let result = runner.run_scenario(&Scenario::new("x")).await;
        assert_eq!(
            result.target_a.resources.error(),
            Some("no container configured")
        );
        // both resource markers present, so the side-by-side is omitted
        assert!(result.comparison.cpu_usage.is_none());
    }
}
