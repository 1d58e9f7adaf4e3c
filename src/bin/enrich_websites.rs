// src/bin/enrich_websites.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use enrichment_lib::enrichment::{run_enrichment, DuckDuckGoSearch, EnrichmentClient, HttpPageFetcher};
use enrichment_lib::utils::cli::EnrichArgs;
use enrichment_lib::utils::config::EnrichmentConfig;
use enrichment_lib::utils::env::load_env;
use enrichment_lib::utils::progress_bars::progress_callback::{
    progress_channel, spawn_progress_listener, ProgressReporter,
};
use enrichment_lib::utils::progress_bars::progress_config::{add_bar, ProgressConfig};

/// Enrich company names with likely official websites.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    enrich: EnrichArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    load_env();

    let mut config = EnrichmentConfig::from_env();
    args.enrich.apply_to(&mut config);
    config.log_config();

    let search = DuckDuckGoSearch::new(&config.fetch).context("Failed to set up search client")?;
    let fetcher = HttpPageFetcher::new(&config.fetch).context("Failed to set up page fetcher")?;
    let client = EnrichmentClient::new(search, fetcher, config);

    let multi_progress = ProgressConfig::from_env().create_multi_progress();
    let (callback, rx) = progress_channel(256);
    let listener = spawn_progress_listener(rx, add_bar(multi_progress.as_ref(), 0, "Enriching websites"));
    let reporter = ProgressReporter::new(Some(callback));

    let stats = run_enrichment(&client, &reporter).await?;
    drop(reporter);
    let _ = listener.await;

    info!("=== Enrichment summary ===");
    info!(
        "Batches: {}, representatives to enrich at start: {}",
        stats.total_batches, stats.total_tasks
    );
    info!(
        "Processed: {}, verified: {} ({:.1}%), fetch failures: {}",
        stats.processed,
        stats.verified,
        stats.verification_rate(),
        stats.fetch_failures
    );
    info!(
        "Skipped: {} already enriched, {} empty names",
        stats.skipped_checkpointed, stats.skipped_empty
    );
    if stats.search_failures > 0 {
        warn!(
            "{} searches failed; those names will be retried on the next run",
            stats.search_failures
        );
    }
    for batch in &stats.failed_batches {
        warn!("Batch failed: {}", batch);
    }
    Ok(())
}
