// src/models/stats_models.rs

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizationStats {
    pub run_id: String,
    pub input_path: String,
    pub name_column: String,
    pub input_rows: usize,
    pub normalized_rows: usize,
    pub removed_rows: usize,
    pub unique_heavy_forms: usize,
    pub total_clusters: usize,
    pub total_representatives: usize,
    pub batch_size: usize,
    pub total_batches: usize,
    pub workers: usize,
    pub dry_run: bool,
    /// Artifacts that could not be written; other artifacts are still attempted.
    pub write_failures: Vec<String>,
    pub normalization_time: f64,
    pub clustering_time: f64,
    pub total_processing_time: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentStats {
    pub run_id: String,
    pub total_batches: usize,
    pub total_tasks: usize,
    pub processed: usize,
    pub skipped_checkpointed: usize,
    pub skipped_empty: usize,
    pub verified: usize,
    pub fetch_failures: usize,
    pub search_failures: usize,
    pub failed_batches: Vec<String>,
    pub total_processing_time: f64,
}

impl EnrichmentStats {
    pub fn verification_rate(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.verified as f64 / self.processed as f64 * 100.0
        }
    }

    /// Folds one batch's counters into the run total.
    pub fn absorb(&mut self, batch: &BatchOutcome) {
        self.processed += batch.processed;
        self.skipped_checkpointed += batch.skipped_checkpointed;
        self.skipped_empty += batch.skipped_empty;
        self.verified += batch.verified;
        self.fetch_failures += batch.fetch_failures;
        self.search_failures += batch.search_failures;
    }
}

/// Counters for a single batch pass of the enrichment processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub batch_name: String,
    pub processed: usize,
    pub skipped_checkpointed: usize,
    pub skipped_empty: usize,
    pub verified: usize,
    pub fetch_failures: usize,
    /// Names whose search failed; they are not written and get retried on the next run.
    pub search_failures: usize,
}
