// src/batching/partition.rs - Splits representatives into fixed-size batch artifacts

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{NormalizedRow, Representative};
use crate::utils::artifacts::{batch_file_name, write_csv};
use crate::utils::progress_bars::logging::StageLogger;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPlan {
    pub batch_size: usize,
    pub batches: Vec<Vec<Representative>>,
}

impl BatchPlan {
    pub fn total_representatives(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

/// First row per fuzzy key, in row order.
pub fn unique_representatives(rows: &[NormalizedRow]) -> Vec<Representative> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.fuzzy_heavy.as_str()))
        .map(NormalizedRow::representative)
        .collect()
}

/// `batch_size = min(target, total)`, contiguous slices of that size. Nothing to
/// split yields an empty plan.
pub fn plan_batches(representatives: Vec<Representative>, target_batch_size: usize) -> BatchPlan {
    let total = representatives.len();
    if total == 0 {
        return BatchPlan::default();
    }
    let batch_size = target_batch_size.max(1).min(total);
    let batches = representatives
        .chunks(batch_size)
        .map(|chunk| chunk.to_vec())
        .collect();
    BatchPlan {
        batch_size,
        batches,
    }
}

/// Writes `batch_001.csv`, `batch_002.csv`, ... into `batch_dir`. Each file is
/// attempted independently; returns a description of every failed write. In
/// dry-run mode only the intended writes are logged.
pub fn write_batches(
    plan: &BatchPlan,
    batch_dir: &Path,
    dry_run: bool,
    logger: &StageLogger,
) -> Vec<String> {
    let total = plan.batches.len();
    if !dry_run && total > 0 {
        if let Err(e) = fs::create_dir_all(batch_dir) {
            let message = format!("Error creating {}: {}", batch_dir.display(), e);
            logger.log_error(&message);
            return vec![message];
        }
    }

    let mut failures = Vec::new();
    for (idx, batch) in plan.batches.iter().enumerate() {
        let path: PathBuf = batch_dir.join(batch_file_name(idx + 1));
        if dry_run {
            logger.log_phase(
                "Batch files",
                Some(&format!(
                    "Would save batch {}/{} -> {} ({} reps)",
                    idx + 1,
                    total,
                    path.display(),
                    batch.len()
                )),
            );
            continue;
        }
        match write_csv(&path, batch) {
            Ok(()) => logger.log_phase(
                "Batch files",
                Some(&format!(
                    "Saved batch {}/{} -> {} ({} reps)",
                    idx + 1,
                    total,
                    path.display(),
                    batch.len()
                )),
            ),
            Err(e) => {
                let message = format!("Error saving {}: {:#}", path.display(), e);
                logger.log_error(&message);
                failures.push(message);
            }
        }
    }
    failures
}
