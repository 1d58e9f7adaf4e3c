use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use enrichment_lib::enrichment::{run_enrichment, DuckDuckGoSearch, EnrichmentClient, HttpPageFetcher};
use enrichment_lib::normalization::run_normalization;
use enrichment_lib::utils::cli::{EnrichArgs, NormalizeArgs};
use enrichment_lib::utils::config::{EnrichmentConfig, NormalizationConfig};
use enrichment_lib::utils::env::load_env;
use enrichment_lib::utils::get_memory_usage;
use enrichment_lib::utils::progress_bars::progress_callback::{
    progress_channel, spawn_progress_listener, ProgressReporter,
};
use enrichment_lib::utils::progress_bars::progress_config::{add_bar, ProgressConfig};
use log::info;
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Normalize company names, then look up and verify their websites.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct PipelineArgs {
    #[command(flatten)]
    normalize: NormalizeArgs,

    #[command(flatten)]
    enrich: EnrichArgs,

    /// Stop after the normalization stage
    #[arg(long)]
    skip_enrichment: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and environment
    env_logger::init();
    let args = PipelineArgs::parse();
    info!("Starting company name normalization and website enrichment pipeline");
    load_env();

    let mut normalization_config = NormalizationConfig::from_env();
    args.normalize.apply_to(&mut normalization_config);
    normalization_config.log_config();

    let mut enrichment_config = EnrichmentConfig::from_env();
    if std::env::var("BATCH_DIR").is_err() {
        enrichment_config.batch_dir = normalization_config.batch_dir();
    }
    args.enrich.apply_to(&mut enrichment_config);

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );
    let multi_progress = progress_config.create_multi_progress();

    let run_id = Uuid::new_v4().to_string();
    let run_timestamp = Utc::now();
    info!("Pipeline run {} started at {}", run_id, run_timestamp.to_rfc3339());
    let start_time = Instant::now();
    let mut phase_times = HashMap::new();

    // Phase 1: Normalization, clustering and batch files
    info!("Pipeline step: Normalization...");
    let phase1_start = Instant::now();
    let phase_progress = if progress_config.should_show_detailed() {
        multi_progress.as_ref()
    } else {
        None
    };
    let normalization_stats = run_normalization(&normalization_config, phase_progress)
        .await
        .context("Normalization stage failed")?;
    let phase1_duration = phase1_start.elapsed();
    phase_times.insert("normalization", phase1_duration.as_secs_f64());
    info!(
        "Normalized {} rows into {} representatives across {} batch file(s) in {:.2?}",
        normalization_stats.normalized_rows,
        normalization_stats.total_representatives,
        normalization_stats.total_batches,
        phase1_duration
    );

    if args.skip_enrichment || normalization_config.dry_run {
        info!("Skipping enrichment stage (dry run or --skip-enrichment)");
    } else {
        // Phase 2: Website enrichment
        info!("Pipeline step: Website enrichment...");
        enrichment_config.log_config();
        let phase2_start = Instant::now();

        let search = DuckDuckGoSearch::new(&enrichment_config.fetch)?;
        let fetcher = HttpPageFetcher::new(&enrichment_config.fetch)?;
        let client = EnrichmentClient::new(search, fetcher, enrichment_config);

        let (callback, rx) = progress_channel(256);
        let bar = add_bar(multi_progress.as_ref(), 0, "Enriching websites");
        let listener = spawn_progress_listener(rx, bar);
        let reporter = ProgressReporter::new(Some(callback));

        let enrichment_stats = run_enrichment(&client, &reporter)
            .await
            .context("Enrichment stage failed")?;
        drop(reporter);
        let _ = listener.await;

        let phase2_duration = phase2_start.elapsed();
        phase_times.insert("enrichment", phase2_duration.as_secs_f64());
        info!(
            "Enriched {} representatives ({} verified, {:.1}%) in {:.2?}",
            enrichment_stats.processed,
            enrichment_stats.verified,
            enrichment_stats.verification_rate(),
            phase2_duration
        );
        if !enrichment_stats.failed_batches.is_empty() {
            info!("Failed batches: {:?}", enrichment_stats.failed_batches);
        }
    }

    let total_duration = start_time.elapsed();
    info!("Pipeline run {} completed in {:.2?}", run_id, total_duration);
    for (phase, secs) in &phase_times {
        info!("  {}: {:.2}s", phase, secs);
    }
    if progress_config.should_show_memory() {
        info!("Memory usage at completion: {} MB", get_memory_usage().await);
    }
    Ok(())
}
