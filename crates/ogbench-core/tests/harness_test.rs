// End-to-end harness tests
//
// These drive the full runner against two mock image services and a stubbed
// counter source, and check the assembled report and its JSON shape.

use async_trait::async_trait;
use ogbench_core::resources::{ContainerCounters, CpuStats, CpuUsage, MemoryStats};
use ogbench_core::{
    BenchmarkRunner, ContainerStatsSource, Improvement, MetricOutcome, Result, RunConfig, Scenario,
    TargetConfig,
};
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// 1x1 RGBA PNG
const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x64,
    0x60, 0xF8, 0x5F, 0x0F, 0x00, 0x02, 0x87, 0x01, 0x80, 0xEB, 0x47, 0xBA, 0x92, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

struct StubSource;

#[async_trait]
impl ContainerStatsSource for StubSource {
    async fn counters(&self, container: &str) -> Result<ContainerCounters> {
        // give the two containers distinguishable memory usage
        let usage = if container.starts_with("alpha") {
            256 * 1024 * 1024
        } else {
            128 * 1024 * 1024
        };
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
                usage,
                limit: 1024 * 1024 * 1024,
            },
        })
    }
}

async fn mock_image_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_1X1.to_vec()))
        .mount(&server)
        .await;
    server
}

fn scenario() -> Scenario {
    Scenario::new("simple_title")
        .with_description("Title only")
        .with_param("title", "Hello World")
}

// =============================================================================
// Healthy targets
// =============================================================================

#[tokio::test]
async fn test_two_healthy_targets_produce_a_full_comparison() {
    let server_a = mock_image_service().await;
    let server_b = mock_image_service().await;

    let runner = BenchmarkRunner::new(
        TargetConfig::new("alpha", server_a.uri()).with_container("alpha-bench"),
        TargetConfig::new("beta", server_b.uri()).with_container("beta-bench"),
        RunConfig::default()
            .with_runs(5)
            .with_throughput_duration_secs(1),
        Arc::new(StubSource),
    )
    .unwrap();

    let result = runner.run_scenario(&scenario()).await;

    // per-target stats
    for report in [&result.target_a, &result.target_b] {
        let latency = report.latency.as_ok().expect("latency stats");
        assert_eq!(latency.successful_requests, 5);
        assert!(latency.min_ms <= latency.median_ms);
        assert!(latency.median_ms <= latency.p95_ms);
        assert!(latency.p99_ms <= latency.max_ms);

        let throughput = report.throughput.as_ok().expect("throughput stats");
        assert!(throughput.total_requests > 0);
        assert!(throughput.requests_per_second > 0.0);
        assert!(throughput.duration_seconds >= 1.0);

        let image = report.image.as_ok().expect("image metrics");
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.format, "png");
        assert_eq!(image.size_bytes, 70);

        let resources = report.resources.as_ok().expect("resource stats");
        assert_eq!(resources.cpu_percent, 40.0);
    }
    assert_eq!(result.target_a.resources.as_ok().unwrap().memory_usage_mb, 256.0);
    assert_eq!(result.target_b.resources.as_ok().unwrap().memory_usage_mb, 128.0);

    // comparison fully populated
    let c = &result.comparison;
    let latency_winner = c.latency_winner.as_deref().expect("latency winner");
    assert!(latency_winner == "alpha" || latency_winner == "beta");
    assert!(c.latency_improvement.expect("latency margin") >= 0.0);
    assert!(c.throughput_winner.is_some());
    assert!(matches!(
        c.throughput_improvement,
        Some(Improvement::Percent(p)) if p >= 0.0
    ));
    let memory = c.memory_usage.expect("memory side-by-side");
    assert_eq!(memory.target_a, 256.0);
    assert_eq!(memory.target_b, 128.0);
}

// =============================================================================
// One target down
// =============================================================================

#[tokio::test]
async fn test_dead_target_never_aborts_the_run() {
    let server_a = mock_image_service().await;

    let runner = BenchmarkRunner::new(
        TargetConfig::new("alpha", server_a.uri()).with_container("alpha-bench"),
        // nothing listens on port 1
        TargetConfig::new("beta", "http://127.0.0.1:1").with_container("beta-bench"),
        RunConfig::default()
            .with_runs(3)
            .with_throughput_duration_secs(1),
        Arc::new(StubSource),
    )
    .unwrap();

    let result = runner.run_scenario(&scenario()).await;

    // the dead side carries markers and zero-rate stats
    assert_eq!(
        result.target_b.latency.error(),
        Some("all requests failed")
    );
    let b_throughput = result.target_b.throughput.as_ok().expect("stats");
    assert_eq!(b_throughput.total_requests, 0);
    assert_eq!(b_throughput.requests_per_second, 0.0);
    assert!(b_throughput.failed_requests > 0);
    assert!(!result.target_b.image.is_ok());

    // latency verdict unavailable, throughput verdict explicit
    let c = &result.comparison;
    assert!(c.latency_winner.is_none());
    assert!(c.latency_improvement.is_none());
    assert_eq!(c.throughput_winner.as_deref(), Some("alpha"));
    assert_eq!(c.throughput_improvement, Some(Improvement::NotApplicable));
    // resources came from the stub on both sides
    assert!(c.cpu_usage.is_some());
}

// =============================================================================
// Report JSON shape
// =============================================================================

#[tokio::test]
async fn test_report_serialization_shape() {
    let server_a = mock_image_service().await;
    let server_b = mock_image_service().await;

    let runner = BenchmarkRunner::new(
        TargetConfig::new("alpha", server_a.uri()),
        TargetConfig::new("beta", server_b.uri()),
        RunConfig::default()
            .with_runs(2)
            .with_throughput_duration_secs(0),
        Arc::new(StubSource),
    )
    .unwrap();

    let result = runner.run_scenario(&scenario()).await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["scenario"], "simple_title");
    assert_eq!(json["description"], "Title only");
    assert!(json["timestamp"].is_string());

    // stats flatten into the metric field
    assert!(json["target_a"]["latency"]["mean_ms"].is_number());
    assert!(json["target_a"]["image"]["size_kb"].is_number());

    // no container configured: the marker shape is {"error": ...}
    assert_eq!(
        json["target_a"]["resources"]["error"],
        "no container configured"
    );

    // resource verdicts omitted because both sides carried markers
    assert!(json["comparison"].get("cpu_usage").is_none());
    assert!(json["comparison"].get("memory_usage").is_none());
    assert!(json["comparison"].get("latency_winner").is_some());

    // report round-trips
    let back: ogbench_core::BenchmarkResult = serde_json::from_value(json).unwrap();
    assert!(matches!(back.target_a.resources, MetricOutcome::Failed { .. }));
}
