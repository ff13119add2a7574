// Console output and report persistence

use chrono::Utc;
use ogbench_core::{BenchmarkResult, Improvement, Scenario, TargetReport};
use std::fs;
use std::path::{Path, PathBuf};

/// Print the banner for one scenario
pub fn print_scenario_header(scenario: &Scenario) {
    println!("\n📋 Scenario: {}", scenario.name);
    if !scenario.description.is_empty() {
        println!("   {}", scenario.description);
    }
}

/// Print both target reports and the verdicts for one scenario
pub fn print_result(result: &BenchmarkResult) {
    print_target(&result.target_a);
    print_target(&result.target_b);

    let c = &result.comparison;
    match (&c.latency_winner, c.latency_improvement) {
        (Some(winner), Some(margin)) => {
            println!("   🏆 Latency:    {} by {:.1}%", winner, margin);
        }
        _ => println!("   🏆 Latency:    no verdict (a measurement failed)"),
    }
    match (&c.throughput_winner, &c.throughput_improvement) {
        (Some(winner), Some(Improvement::Percent(margin))) => {
            println!("   🏆 Throughput: {} by {:.1}%", winner, margin);
        }
        (Some(winner), Some(Improvement::NotApplicable)) => {
            println!("   🏆 Throughput: {} (margin n/a, a rate was zero)", winner);
        }
        _ => println!("   🏆 Throughput: no verdict (a measurement failed)"),
    }
}

fn print_target(report: &TargetReport) {
    println!("   {}:", report.label);

    match report.latency.as_ok() {
        Some(l) => println!(
            "     Latency:    mean {:.2}ms / median {:.2}ms / p95 {:.2}ms / p99 {:.2}ms ({} ok, {} failed)",
            l.mean_ms, l.median_ms, l.p95_ms, l.p99_ms, l.successful_requests, l.failed_requests
        ),
        None => print_unavailable("Latency", report.latency.error()),
    }

    match report.throughput.as_ok() {
        Some(t) => println!(
            "     Throughput: {:.2} req/s ({} ok, {} failed, {:.2}s)",
            t.requests_per_second, t.total_requests, t.failed_requests, t.duration_seconds
        ),
        None => print_unavailable("Throughput", report.throughput.error()),
    }

    match report.resources.as_ok() {
        Some(r) => println!(
            "     Resources:  cpu {:.2}% / mem {:.2} MB ({:.2}%)",
            r.cpu_percent, r.memory_usage_mb, r.memory_percent
        ),
        None => print_unavailable("Resources", report.resources.error()),
    }

    match report.image.as_ok() {
        Some(i) => println!(
            "     Image:      {}x{} {} ({:.2} KB)",
            i.width, i.height, i.format, i.size_kb
        ),
        None => print_unavailable("Image", report.image.error()),
    }
}

fn print_unavailable(metric: &str, reason: Option<&str>) {
    println!(
        "     {:<11} unavailable ({})",
        format!("{metric}:"),
        reason.unwrap_or("unknown")
    );
}

/// Print the per-scenario winners once every scenario has run
pub fn print_summary(results: &[BenchmarkResult]) {
    println!("\n📊 Summary:");
    for result in results {
        let latency = result.comparison.latency_winner.as_deref().unwrap_or("n/a");
        let throughput = result
            .comparison
            .throughput_winner
            .as_deref()
            .unwrap_or("n/a");
        println!(
            "   {:<24} latency: {:<12} throughput: {}",
            result.scenario, latency, throughput
        );
    }
}

/// Write all results as pretty JSON to `comparison_{YYYYmmdd_HHMMSS}.json`
/// under `output_dir`, creating the directory if needed
pub fn save_results(results: &[BenchmarkResult], output_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let filename = format!("comparison_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = output_dir.join(filename);
    fs::write(&path, serde_json::to_string_pretty(results)?)?;
    Ok(path)
}
