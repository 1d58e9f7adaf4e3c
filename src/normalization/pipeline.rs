// src/normalization/pipeline.rs - Normalization stage: input -> normalized artifact -> batches

use anyhow::{Context, Result};
use indicatif::MultiProgress;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::batching::{plan_batches, unique_representatives, write_batches};
use crate::clustering::cluster_heavy_forms;
use crate::models::NormalizationStats;
use crate::normalization::canonicalize::NameCanonicalizer;
use crate::normalization::dedup::deduplicate;
use crate::normalization::driver::normalize_parallel;
use crate::normalization::representatives::build_normalized_rows;
use crate::utils::artifacts::{read_input_names, write_csv, write_json_summary};
use crate::utils::config::NormalizationConfig;
use crate::utils::constants::{NORMALIZATION_SUMMARY_FILE_NAME, NORMALIZED_FILE_NAME};
use crate::utils::progress_bars::logging::{Stage, StageLogger};
use crate::utils::progress_bars::progress_config::add_bar;

const NORMALIZATION_PHASES: u64 = 6;

/// Runs the whole normalization stage. Only an unreadable input or a failed
/// worker aborts the run, and both happen before anything is written.
/// Artifact write errors are logged and collected in the returned stats.
pub async fn run_normalization(
    config: &NormalizationConfig,
    multi_progress: Option<&MultiProgress>,
) -> Result<NormalizationStats> {
    let logger = StageLogger::new(Stage::Normalize);
    let run_id = Uuid::new_v4().to_string();
    logger.log_start(&run_id, config.dry_run);

    let phase_pb = add_bar(multi_progress, NORMALIZATION_PHASES, "Reading input");

    // Phase 1: input
    let input = read_input_names(&config.input_path, config.name_column.as_deref())
        .with_context(|| format!("Failed to load input {}", config.input_path.display()))?;
    let mut records = input.records;
    if let Some(limit) = config.row_limit {
        records.truncate(limit);
    }
    let input_rows = records.len();
    logger.log_input_loaded(input_rows, &input.column, &config.input_path);
    if let Some(pb) = &phase_pb {
        pb.inc(1);
        pb.set_message("Canonicalizing names");
    }

    // Phase 2: canonicalization
    let normalization_start = Instant::now();
    logger.log_phase(
        "Canonicalizing names",
        Some(&format!("{} rows on {} workers", input_rows, config.workers)),
    );
    let canonicalizer = Arc::new(NameCanonicalizer::new(config.remove_prefixes.clone()));
    let normalized = normalize_parallel(records, canonicalizer, config.workers)
        .await
        .context("Parallel normalization failed")?;
    let normalization_time = normalization_start.elapsed().as_secs_f64();
    if let Some(pb) = &phase_pb {
        pb.inc(1);
        pb.set_message("Deduplicating");
    }

    // Phase 3: cleaning and dedup
    let before = normalized.len();
    let deduped = deduplicate(normalized);
    logger.log_dedup(before, deduped.len());
    if let Some(pb) = &phase_pb {
        pb.inc(1);
        pb.set_message("Fuzzy clustering");
    }

    // Phase 4: clustering and representatives
    let clustering_start = Instant::now();
    let clusters = cluster_heavy_forms(
        deduped.iter().map(|r| r.normalized_heavy.as_str()),
        config.fuzzy_threshold,
    );
    let unique_heavy_forms: usize = clusters.groups.iter().map(Vec::len).sum();
    logger.log_clusters(unique_heavy_forms, clusters.len(), config.fuzzy_threshold);
    let rows = build_normalized_rows(&deduped, &clusters);
    let clustering_time = clustering_start.elapsed().as_secs_f64();
    if let Some(pb) = &phase_pb {
        pb.inc(1);
        pb.set_message("Saving normalized data");
    }

    let mut write_failures = Vec::new();

    // Phase 5: normalized artifact
    let normalized_path = config.output_dir.join(NORMALIZED_FILE_NAME);
    if config.dry_run {
        logger.log_write(&normalized_path, rows.len(), true);
    } else {
        match write_csv(&normalized_path, &rows) {
            Ok(()) => logger.log_write(&normalized_path, rows.len(), false),
            Err(e) => {
                let message = format!("Error saving {}: {:#}", normalized_path.display(), e);
                logger.log_error(&message);
                write_failures.push(message);
            }
        }
    }
    if let Some(pb) = &phase_pb {
        pb.inc(1);
        pb.set_message("Creating batch files");
    }

    // Phase 6: batches
    let plan = plan_batches(unique_representatives(&rows), config.target_batch_size);
    logger.log_phase(
        "Creating batch files",
        Some(&format!(
            "{} representatives in {} batch(es) of up to {}",
            plan.total_representatives(),
            plan.batches.len(),
            plan.batch_size
        )),
    );
    write_failures.extend(write_batches(&plan, &config.batch_dir(), config.dry_run, &logger));
    if let Some(pb) = &phase_pb {
        pb.inc(1);
        pb.finish_with_message("Normalization complete");
    }

    let stats = NormalizationStats {
        run_id,
        input_path: config.input_path.display().to_string(),
        name_column: input.column,
        input_rows,
        normalized_rows: rows.len(),
        removed_rows: before.saturating_sub(rows.len()),
        unique_heavy_forms,
        total_clusters: clusters.len(),
        total_representatives: plan.total_representatives(),
        batch_size: plan.batch_size,
        total_batches: plan.batches.len(),
        workers: config.workers,
        dry_run: config.dry_run,
        write_failures,
        normalization_time,
        clustering_time,
        total_processing_time: logger.elapsed_secs(),
    };

    if !config.dry_run {
        let summary_path = config.output_dir.join(NORMALIZATION_SUMMARY_FILE_NAME);
        if let Err(e) = write_json_summary(&summary_path, &stats) {
            logger.log_warning(&format!("Could not write run summary: {:#}", e));
        }
    }

    logger.log_completion(&format!(
        "{} input rows → {} normalized → {} clusters → {} batch file(s){}",
        stats.input_rows,
        stats.normalized_rows,
        stats.total_clusters,
        stats.total_batches,
        if stats.write_failures.is_empty() {
            String::new()
        } else {
            format!(" ({} write failure(s))", stats.write_failures.len())
        }
    ));
    Ok(stats)
}
