// ogbench CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing; every
// knob is also settable via an OGBENCH_* environment variable.
// Design Decision: Human-readable progress goes to stdout, diagnostics to
// tracing; the JSON report on disk is the machine-readable artifact.
// Design Decision: Fail fast on malformed target URLs and unreadable
// scenario files; everything after startup is recorded, never fatal.

mod output;

use clap::Parser;
use ogbench_core::{
    load_scenarios, BenchmarkRunner, DockerStatsClient, RunConfig, TargetConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ogbench")]
#[command(about = "Compare two HTTP image services: latency, throughput, resources, image metrics")]
#[command(version)]
pub struct Cli {
    /// Scenario file (JSON with a top-level `scenarios` array)
    #[arg(long, env = "OGBENCH_SCENARIOS", default_value = "scenarios.json")]
    pub scenarios: PathBuf,

    /// Base URL of target A
    #[arg(
        long,
        env = "OGBENCH_TARGET_A_URL",
        default_value = "http://localhost:3000"
    )]
    pub target_a_url: String,

    /// Image endpoint path on target A
    #[arg(long, default_value = "/")]
    pub target_a_endpoint: String,

    /// Label for target A in reports
    #[arg(long, default_value = "target-a")]
    pub target_a_label: String,

    /// Container name for target A resource sampling
    #[arg(long, env = "OGBENCH_TARGET_A_CONTAINER")]
    pub target_a_container: Option<String>,

    /// Base URL of target B
    #[arg(
        long,
        env = "OGBENCH_TARGET_B_URL",
        default_value = "http://localhost:3001"
    )]
    pub target_b_url: String,

    /// Image endpoint path on target B
    #[arg(long, default_value = "/api/og")]
    pub target_b_endpoint: String,

    /// Label for target B in reports
    #[arg(long, default_value = "target-b")]
    pub target_b_label: String,

    /// Container name for target B resource sampling
    #[arg(long, env = "OGBENCH_TARGET_B_CONTAINER")]
    pub target_b_container: Option<String>,

    /// Sequential requests for the latency measurement
    #[arg(long, default_value = "1000")]
    pub runs: u32,

    /// Throughput window in seconds
    #[arg(long, default_value = "10")]
    pub throughput_duration: u64,

    /// Directory for the JSON report
    #[arg(long, short, default_value = "results")]
    pub output: PathBuf,

    /// Docker Engine API address for container stats
    #[arg(
        long,
        env = "OGBENCH_DOCKER_HOST",
        default_value = "http://localhost:2375"
    )]
    pub docker_host: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ogbench_core=info,ogbench_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::debug!(docker_host = %cli.docker_host, "container stats via Docker Engine API");

    for (name, value) in [
        ("target A", &cli.target_a_url),
        ("target B", &cli.target_b_url),
    ] {
        url::Url::parse(value)
            .map_err(|e| anyhow::anyhow!("invalid {name} URL {value:?}: {e}"))?;
    }

    let scenarios = load_scenarios(&cli.scenarios)?;

    println!(
        "🚀 ogbench: {} scenarios, {} latency runs, {}s throughput window",
        scenarios.len(),
        cli.runs,
        cli.throughput_duration
    );
    println!("   A: {} at {}", cli.target_a_label, cli.target_a_url);
    println!("   B: {} at {}", cli.target_b_label, cli.target_b_url);

    let mut target_a =
        TargetConfig::new(&cli.target_a_label, &cli.target_a_url).with_endpoint(&cli.target_a_endpoint);
    if let Some(container) = &cli.target_a_container {
        target_a = target_a.with_container(container);
    }
    let mut target_b =
        TargetConfig::new(&cli.target_b_label, &cli.target_b_url).with_endpoint(&cli.target_b_endpoint);
    if let Some(container) = &cli.target_b_container {
        target_b = target_b.with_container(container);
    }

    let run_config = RunConfig::default()
        .with_runs(cli.runs)
        .with_throughput_duration_secs(cli.throughput_duration);
    let stats_source = DockerStatsClient::new(&cli.docker_host)?;
    let runner = BenchmarkRunner::new(target_a, target_b, run_config, Arc::new(stats_source))?;

    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        output::print_scenario_header(scenario);
        let result = runner.run_scenario(scenario).await;
        output::print_result(&result);
        results.push(result);
    }

    output::print_summary(&results);
    let path = output::save_results(&results, &cli.output)?;
    println!("\n💾 Full report: {}", path.display());

    Ok(())
}
