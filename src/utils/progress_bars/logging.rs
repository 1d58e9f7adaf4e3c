// src/utils/progress_bars/logging.rs - Logging helpers for the pipeline stages
use log::{debug, error, info, warn};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Enrich,
}

#[derive(Clone)]
pub struct StageLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl StageLogger {
    pub fn new(stage: Stage) -> Self {
        let (stage_name, stage_emoji) = match stage {
            Stage::Normalize => ("NORMALIZE", "🧹"),
            Stage::Enrich => ("ENRICH", "🌐"),
        };
        Self {
            stage_name,
            stage_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, dry_run: bool) {
        info!(
            "[{}] {} 🚀 Starting {} stage (run ID: {}){}",
            self.stage_name,
            self.stage_emoji,
            self.stage_name.to_lowercase(),
            run_id,
            if dry_run { " in DRY RUN mode" } else { "" }
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name,
                self.stage_emoji,
                phase,
                details,
                elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name,
                self.stage_emoji,
                phase,
                elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_input_loaded(&self, rows: usize, column: &str, path: &Path) {
        info!(
            "[{}] {} 📊 Loaded {} rows from {} using column '{}'",
            self.stage_name,
            self.stage_emoji,
            rows,
            path.display(),
            column
        );
    }

    pub fn log_dedup(&self, before: usize, after: usize) {
        info!(
            "[{}] {} ✅ Cleaning & deduplication: {} rows → {} rows ({} removed)",
            self.stage_name,
            self.stage_emoji,
            before,
            after,
            before.saturating_sub(after)
        );
    }

    pub fn log_clusters(&self, unique_heavy: usize, clusters: usize, threshold: f64) {
        let ratio = if unique_heavy > 0 {
            clusters as f64 / unique_heavy as f64 * 100.0
        } else {
            0.0
        };
        info!(
            "[{}] {} 🔗 Fuzzy clustering (threshold {}): {} heavy forms → {} clusters ({:.1}%)",
            self.stage_name, self.stage_emoji, threshold, unique_heavy, clusters, ratio
        );
    }

    pub fn log_write(&self, path: &Path, rows: usize, dry_run: bool) {
        if dry_run {
            info!(
                "[{}] {} 📝 Would save -> {} ({} rows)",
                self.stage_name,
                self.stage_emoji,
                path.display(),
                rows
            );
        } else {
            info!(
                "[{}] {} 💾 Saved -> {} ({} rows)",
                self.stage_name,
                self.stage_emoji,
                path.display(),
                rows
            );
        }
    }

    pub fn log_batch_start(&self, batch_name: &str, remaining: usize, checkpointed: usize) {
        info!(
            "[{}] {} 📦 Starting {}: {} to process, {} already in checkpoint",
            self.stage_name, self.stage_emoji, batch_name, remaining, checkpointed
        );
    }

    pub fn log_record(&self, batch_name: &str, position: usize, batch_len: usize, name: &str) {
        debug!(
            "[{}] {} [{}] Processing {}/{}: {}",
            self.stage_name, self.stage_emoji, batch_name, position, batch_len, name
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn log_error(&self, message: &str) {
        error!("[{}] {} ❌ {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn log_completion(&self, summary: &str) {
        info!(
            "[{}] {} 🏁 Completed in {:.2?}: {}",
            self.stage_name,
            self.stage_emoji,
            self.start_time.elapsed(),
            summary
        );
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}
