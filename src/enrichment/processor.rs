// src/enrichment/processor.rs - Resumable, sequential enrichment over all batch files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::enrichment::client::EnrichmentClient;
use crate::enrichment::fetch::PageFetcher;
use crate::enrichment::search::SearchProvider;
use crate::models::{BatchOutcome, EnrichmentStats};
use crate::utils::artifacts::{
    batch_name, list_csv_files, load_processed_names, read_batch_names, write_json_summary,
    EnrichedAppender,
};
use crate::utils::config::EnrichmentConfig;
use crate::utils::constants::{ENRICHMENT_SUMMARY_FILE_NAME, FETCH_STATUS_FAILED};
use crate::utils::progress_bars::logging::{Stage, StageLogger};
use crate::utils::progress_bars::progress_callback::ProgressReporter;

pub const COMPLETION_MESSAGE: &str = "Website enrichment completed successfully!";

/// Run-wide progress counter shared by consecutive batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunProgress {
    pub current: usize,
    pub total: usize,
}

fn is_pending(name: &str, processed: &std::collections::HashSet<String>) -> bool {
    !name.trim().is_empty() && !processed.contains(name)
}

/// Number of names across all batches that still need enriching.
/// Unreadable batches count as zero here; they fail again when processed.
pub fn compute_total_tasks(config: &EnrichmentConfig, batch_files: &[PathBuf]) -> usize {
    batch_files
        .iter()
        .filter_map(|batch_file| {
            let names = read_batch_names(batch_file).ok()?;
            let processed = load_processed_names(&config.output_file_for(batch_file));
            Some(names.iter().filter(|name| is_pending(name, &processed)).count())
        })
        .sum()
}

/// Enriches every pending name of one batch file, appending each record to
/// the batch's enriched artifact as soon as it is produced.
pub async fn process_batch<S, F>(
    client: &EnrichmentClient<S, F>,
    batch_file: &Path,
    reporter: &ProgressReporter,
    progress: &mut RunProgress,
    logger: &StageLogger,
) -> Result<BatchOutcome>
where
    S: SearchProvider,
    F: PageFetcher,
{
    let config = client.config();
    let name = batch_name(batch_file);
    let output_file = config.output_file_for(batch_file);
    let mut processed = load_processed_names(&output_file);

    let names = read_batch_names(batch_file)
        .with_context(|| format!("Error reading batch file {}", batch_file.display()))?;
    let remaining = names.iter().filter(|n| is_pending(n, &processed)).count();
    logger.log_batch_start(&name, remaining, processed.len());

    let mut outcome = BatchOutcome {
        batch_name: name.clone(),
        ..BatchOutcome::default()
    };
    let mut appender: Option<EnrichedAppender> = None;

    for (idx, representative) in names.iter().enumerate() {
        if representative.trim().is_empty() {
            outcome.skipped_empty += 1;
            continue;
        }
        if processed.contains(representative) {
            outcome.skipped_checkpointed += 1;
            continue;
        }

        logger.log_record(&name, idx + 1, names.len(), representative);
        let record = match client.enrich(representative).await {
            Ok(record) => record,
            Err(e) => {
                logger.log_warning(&format!("[{}] Search failed for '{}': {}", name, representative, e));
                outcome.search_failures += 1;
                continue;
            }
        };

        if appender.is_none() {
            appender = Some(EnrichedAppender::open(&output_file)?);
        }
        if let Some(writer) = appender.as_mut() {
            writer.append(&record)?;
        }
        processed.insert(representative.clone());

        outcome.processed += 1;
        if record.verified {
            outcome.verified += 1;
        }
        if record.fetch_status == FETCH_STATUS_FAILED {
            outcome.fetch_failures += 1;
        }

        if !config.sleep_between_queries.is_zero() {
            tokio::time::sleep(config.sleep_between_queries).await;
        }

        progress.current += 1;
        reporter.report(
            progress.current,
            progress.total,
            format!("[{}] {}/{} processed", name, progress.current, progress.total),
        );
    }

    Ok(outcome)
}

/// Processes every batch file in `config.batch_dir` in name order. A batch
/// that fails is recorded and the remaining batches still run.
pub async fn run_enrichment<S, F>(
    client: &EnrichmentClient<S, F>,
    reporter: &ProgressReporter,
) -> Result<EnrichmentStats>
where
    S: SearchProvider,
    F: PageFetcher,
{
    let config = client.config();
    let logger = StageLogger::new(Stage::Enrich);
    let mut stats = EnrichmentStats {
        run_id: Uuid::new_v4().to_string(),
        ..EnrichmentStats::default()
    };
    logger.log_start(&stats.run_id, false);

    if !config.batch_dir.is_dir() {
        let message = format!(
            "Error: Batch directory {} not found. Run normalization first.",
            config.batch_dir.display()
        );
        logger.log_error(&message);
        reporter.report(0, 0, message);
        return Ok(stats);
    }

    let batch_files = list_csv_files(&config.batch_dir)?;
    if batch_files.is_empty() {
        let message = "No batch files found. Run normalization first.";
        logger.log_warning(message);
        reporter.report(0, 0, message);
        return Ok(stats);
    }

    let mut progress = RunProgress {
        current: 0,
        total: compute_total_tasks(config, &batch_files),
    };
    stats.total_batches = batch_files.len();
    stats.total_tasks = progress.total;
    logger.log_phase(
        "Scanning batches",
        Some(&format!(
            "{} batch file(s), {} representatives to enrich",
            batch_files.len(),
            progress.total
        )),
    );

    for batch_file in &batch_files {
        match process_batch(client, batch_file, reporter, &mut progress, &logger).await {
            Ok(outcome) => {
                logger.log_phase(
                    "Batch finished",
                    Some(&format!(
                        "{}: {} processed, {} verified, {} already done",
                        outcome.batch_name, outcome.processed, outcome.verified, outcome.skipped_checkpointed
                    )),
                );
                stats.absorb(&outcome);
            }
            Err(e) => {
                let name = batch_name(batch_file);
                logger.log_error(&format!("Batch {} failed: {:#}", name, e));
                stats.failed_batches.push(name);
            }
        }
    }

    reporter.report(progress.current, progress.total, COMPLETION_MESSAGE);
    stats.total_processing_time = logger.elapsed_secs();

    let summary_path = config.output_dir.join(ENRICHMENT_SUMMARY_FILE_NAME);
    if let Err(e) = write_json_summary(&summary_path, &stats) {
        logger.log_warning(&format!("Could not write run summary: {:#}", e));
    }

    logger.log_completion(&format!(
        "{} processed, {} verified ({:.1}%), {} fetch failures, {} failed batch(es)",
        stats.processed,
        stats.verified,
        stats.verification_rate(),
        stats.fetch_failures,
        stats.failed_batches.len()
    ));
    Ok(stats)
}
