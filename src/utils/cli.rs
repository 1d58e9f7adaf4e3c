// src/utils/cli.rs - Command line overrides shared by the binaries

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::config::{EnrichmentConfig, NormalizationConfig};

#[derive(Args, Debug, Clone, Default)]
pub struct NormalizeArgs {
    /// Input CSV with company names
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Column holding the names (defaults to the first column)
    #[arg(long)]
    pub name_column: Option<String>,

    /// Directory for the normalized artifact and batch files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Target number of representatives per batch file
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Minimum similarity for two adjacent heavy forms to share a cluster
    #[arg(long)]
    pub fuzzy_threshold: Option<f64>,

    /// Number of normalization workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Only process the first N input rows
    #[arg(long)]
    pub row_limit: Option<usize>,

    /// Dry run mode (compute everything, write nothing)
    #[arg(long)]
    pub dry_run: bool,
}

impl NormalizeArgs {
    pub fn apply_to(&self, config: &mut NormalizationConfig) {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(column) = &self.name_column {
            config.name_column = Some(column.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(size) = self.batch_size {
            config.target_batch_size = size.max(1);
        }
        if let Some(threshold) = self.fuzzy_threshold {
            config.fuzzy_threshold = threshold;
        }
        if let Some(workers) = self.workers {
            config.workers = workers.max(1);
        }
        if self.row_limit.is_some() {
            config.row_limit = self.row_limit;
        }
        config.dry_run |= self.dry_run;
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct EnrichArgs {
    /// Directory containing batch_NNN.csv files
    #[arg(long)]
    pub batch_dir: Option<PathBuf>,

    /// Directory for the enriched artifacts
    #[arg(long)]
    pub enrichment_dir: Option<PathBuf>,

    /// Search results examined per company
    #[arg(long)]
    pub search_results: Option<usize>,

    /// Minimum score (0-100) for a website to count as verified
    #[arg(long)]
    pub confidence_threshold: Option<f64>,

    /// Delay between companies, in milliseconds
    #[arg(long)]
    pub sleep_ms: Option<u64>,
}

impl EnrichArgs {
    pub fn apply_to(&self, config: &mut EnrichmentConfig) {
        if let Some(dir) = &self.batch_dir {
            config.batch_dir = dir.clone();
        }
        if let Some(dir) = &self.enrichment_dir {
            config.output_dir = dir.clone();
        }
        if let Some(n) = self.search_results {
            config.search_results = n;
        }
        if let Some(threshold) = self.confidence_threshold {
            config.confidence_threshold = threshold;
        }
        if let Some(ms) = self.sleep_ms {
            config.sleep_between_queries = Duration::from_millis(ms);
        }
    }
}
