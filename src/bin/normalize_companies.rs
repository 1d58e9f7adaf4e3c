// src/bin/normalize_companies.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use enrichment_lib::normalization::run_normalization;
use enrichment_lib::utils::cli::NormalizeArgs;
use enrichment_lib::utils::config::NormalizationConfig;
use enrichment_lib::utils::env::load_env;
use enrichment_lib::utils::progress_bars::progress_config::ProgressConfig;

/// Normalize company names and create representative batches.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    normalize: NormalizeArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    load_env();

    let mut config = NormalizationConfig::from_env();
    args.normalize.apply_to(&mut config);
    config.log_config();

    let multi_progress = ProgressConfig::from_env().create_multi_progress();
    let stats = run_normalization(&config, multi_progress.as_ref())
        .await
        .context("Normalization failed")?;

    info!("=== Normalization summary ===");
    info!("Input rows: {} (column '{}')", stats.input_rows, stats.name_column);
    info!(
        "After cleaning & deduplication: {} rows ({} removed)",
        stats.normalized_rows, stats.removed_rows
    );
    info!(
        "Clusters: {} from {} heavy forms",
        stats.total_clusters, stats.unique_heavy_forms
    );
    info!(
        "Batches: {} x up to {} representatives ({} total)",
        stats.total_batches, stats.batch_size, stats.total_representatives
    );
    info!(
        "Timing: normalization {:.2}s, clustering {:.2}s, total {:.2}s",
        stats.normalization_time, stats.clustering_time, stats.total_processing_time
    );
    for failure in &stats.write_failures {
        warn!("Write failure: {}", failure);
    }
    info!("Normalization completed successfully!");
    Ok(())
}
