//! RPC Latency Sweeper - CLI entry point
//!
//! Sweeps JSON-RPC `eth_call` latency across every configured endpoint and
//! call rate, then writes CSV and HTML chart reports. No arguments; the run
//! is parameterized entirely through the environment (see README).

use chrono::Utc;
use colored::Colorize;
use rpc_latency_sweeper::{
    config::{self, Config},
    driver::{run_sweep, CallTemplate},
    error::Result,
    report::{ChartWriter, CsvWriter, ResultsTable, SweepKey},
    stats::Summary,
    AddressPool, Provider, PKG_NAME, VERSION,
};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    if let Err(e) = run().await {
        eprintln!("{} [{}] {}", "Error:".red().bold(), e.category(), e);
        process::exit(e.exit_code());
    }
}

async fn run() -> Result<()> {
    println!("{} v{}", PKG_NAME, VERSION);

    config::load_env_file()?;
    let config = Config::from_env()?;

    println!(
        "\n🔄 Setting up providers for the {} network...",
        config.network.bold()
    );
    let mut providers = Vec::with_capacity(config.endpoints.len());
    for endpoint in &config.endpoints {
        println!("  adding {} provider: {}", endpoint.name, endpoint.url);
        let provider = Provider::connect(&endpoint.name, &endpoint.url).await?;
        providers.push(Arc::new(provider));
    }
    println!("{}", "✅ Done.".green());

    if providers.is_empty() {
        println!(
            "{}",
            "No endpoint variables set; reports will contain headers only.".yellow()
        );
    }

    println!("\nGenerating {} random addresses...", config.address_pool_size);
    let pool = Arc::new(AddressPool::generate(config.address_pool_size));
    println!("{}", "✅ Done.".green());

    let template = CallTemplate::eth_call(&config.call_target, &config.call_selector);
    let mut table = ResultsTable::new();

    for &rate in &config.call_rates {
        for provider in &providers {
            println!(
                "\n🔄 Testing '{}' calls against '{}' ({} calls per second)...",
                template.method(),
                provider.name(),
                rate
            );

            let result = run_sweep(
                provider.clone(),
                pool.clone(),
                &template,
                rate,
                config.duration,
                config.grace_period,
            )
            .await?;

            if result.failed > 0 || result.lost > 0 {
                println!(
                    "  {} of {} calls completed ({} failed, {} lost past the grace period)",
                    result.samples.len(),
                    result.dispatched,
                    result.failed,
                    result.lost
                );
            }

            match Summary::from_samples(&result.samples) {
                Ok(summary) => {
                    println!("\tMin: {} ms", summary.min);
                    println!("\tMax: {} ms", summary.max);
                    println!("\tAvg: {} ms", summary.avg);
                    println!("\tMedian: {} ms", summary.median);
                    table.insert(SweepKey::new(provider.name(), rate), summary);
                }
                Err(e) => {
                    // sweep produced no samples; report it and keep going
                    println!("  {} {}", "skipped:".yellow(), e);
                }
            }
        }
    }

    println!("\n\n ========= SWEEP RESULTS ========= \n");
    println!("{}", table.render_console());

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let csv_path = CsvWriter::new(&config.output_dir).write(&config.network, &timestamp, &table)?;
    println!("CSV written to {}", csv_path.display());

    let chart_paths =
        ChartWriter::new(&config.output_dir).write(&config.network, &timestamp, &table)?;
    for path in chart_paths {
        println!("Chart written to {}", path.display());
    }

    Ok(())
}
