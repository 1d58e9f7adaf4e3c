//! Run configuration for both pipeline stages.
//! Values come from the environment (optionally a `.env` file); binaries
//! override individual fields from their command line flags.

use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::constants::{
    BATCH_SUBDIRECTORY, DEFAULT_BACKOFF_BASE, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_FUZZY_THRESHOLD,
    DEFAULT_REMOVE_PREFIXES, DEFAULT_SEARCH_RESULTS, DEFAULT_SKIP_DOMAINS,
    DEFAULT_TARGET_BATCH_SIZE,
};
use crate::utils::env::{env_list, env_opt, env_or};

#[derive(Debug, Clone)]
pub struct NormalizationConfig {
    pub input_path: PathBuf,
    /// Name column override; the first column is used when unset.
    pub name_column: Option<String>,
    pub output_dir: PathBuf,
    pub target_batch_size: usize,
    pub fuzzy_threshold: f64,
    pub remove_prefixes: Vec<String>,
    pub workers: usize,
    pub dry_run: bool,
    pub row_limit: Option<usize>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("./input/companies.csv"),
            name_column: None,
            output_dir: PathBuf::from("./enrichment_artifacts"),
            target_batch_size: DEFAULT_TARGET_BATCH_SIZE,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            remove_prefixes: DEFAULT_REMOVE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            workers: num_cpus::get(),
            dry_run: false,
            row_limit: None,
        }
    }
}

impl NormalizationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input_path: env_or("INPUT_PATH", defaults.input_path),
            name_column: env_opt("NAME_COLUMN"),
            output_dir: env_or("OUTPUT_DIR", defaults.output_dir),
            target_batch_size: env_or("TARGET_BATCH_SIZE", defaults.target_batch_size).max(1),
            fuzzy_threshold: env_or("FUZZY_THRESHOLD", defaults.fuzzy_threshold),
            remove_prefixes: env_list("REMOVE_PREFIXES", &DEFAULT_REMOVE_PREFIXES),
            workers: env_or("NORMALIZATION_WORKERS", defaults.workers).max(1),
            dry_run: env_or("DRY_RUN", false),
            row_limit: env_opt("ROW_LIMIT"),
        }
    }

    pub fn batch_dir(&self) -> PathBuf {
        self.output_dir.join(BATCH_SUBDIRECTORY)
    }

    pub fn log_config(&self) {
        info!("🧹 Normalization configuration:");
        info!("   Input: {}", self.input_path.display());
        info!(
            "   Name column: {}",
            self.name_column.as_deref().unwrap_or("<first column>")
        );
        info!("   Output directory: {}", self.output_dir.display());
        info!(
            "   Batch size: {}, fuzzy threshold: {}, workers: {}",
            self.target_batch_size, self.fuzzy_threshold, self.workers
        );
        info!("   Removed prefixes: {:?}", self.remove_prefixes);
        if let Some(limit) = self.row_limit {
            info!("   Row limit: {}", limit);
        }
        if self.dry_run {
            info!("   DRY RUN: no files will be written");
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub batch_dir: PathBuf,
    pub output_dir: PathBuf,
    pub search_results: usize,
    pub confidence_threshold: f64,
    pub skip_domains: Vec<String>,
    pub fetch: FetchConfig,
    pub sleep_between_queries: Duration,
}

/// Knobs for homepage retrieval.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total attempts for transient failures (not extra retries).
    pub max_attempts: u32,
    pub backoff_base: u32,
    /// Unit multiplied by `backoff_base^attempt`; one second in production.
    pub backoff_unit: Duration,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_FETCH_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_unit: Duration::from_secs(1),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            accept_invalid_certs: true,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    /// Delay slept after the failed attempt with zero-based index `attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(self.backoff_base.saturating_pow(attempt))
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            batch_dir: NormalizationConfig::default().batch_dir(),
            output_dir: PathBuf::from("./enrichment_results"),
            search_results: DEFAULT_SEARCH_RESULTS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            skip_domains: DEFAULT_SKIP_DOMAINS.iter().map(|s| s.to_string()).collect(),
            fetch: FetchConfig::default(),
            sleep_between_queries: Duration::ZERO,
        }
    }
}

impl EnrichmentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let batch_dir = env_opt::<PathBuf>("BATCH_DIR").unwrap_or_else(|| {
            env_opt::<PathBuf>("OUTPUT_DIR")
                .map(|dir| dir.join(BATCH_SUBDIRECTORY))
                .unwrap_or(defaults.batch_dir)
        });
        Self {
            batch_dir,
            output_dir: env_or("ENRICHMENT_OUTPUT_DIR", defaults.output_dir),
            search_results: env_or("SEARCH_RESULTS", defaults.search_results),
            confidence_threshold: env_or("CONFIDENCE_THRESHOLD", defaults.confidence_threshold),
            skip_domains: env_list("SKIP_DOMAINS", &DEFAULT_SKIP_DOMAINS),
            fetch: FetchConfig {
                max_attempts: env_or("FETCH_RETRIES", defaults.fetch.max_attempts).max(1),
                backoff_base: env_or("FETCH_BACKOFF_BASE", defaults.fetch.backoff_base),
                backoff_unit: defaults.fetch.backoff_unit,
                timeout: Duration::from_secs(env_or(
                    "FETCH_TIMEOUT_SECS",
                    DEFAULT_FETCH_TIMEOUT_SECS,
                )),
                accept_invalid_certs: env_or("FETCH_ACCEPT_INVALID_CERTS", true),
                user_agent: env_opt("FETCH_USER_AGENT"),
            },
            sleep_between_queries: Duration::from_millis(env_or("SLEEP_BETWEEN_QUERIES_MS", 0u64)),
        }
    }

    /// Path of the enriched artifact that pairs with `batch_file`.
    pub fn output_file_for(&self, batch_file: &Path) -> PathBuf {
        crate::utils::artifacts::enriched_path_for(&self.output_dir, batch_file)
    }

    pub fn log_config(&self) {
        info!("🌐 Enrichment configuration:");
        info!("   Batch directory: {}", self.batch_dir.display());
        info!("   Output directory: {}", self.output_dir.display());
        info!(
            "   Search results: {}, confidence threshold: {}",
            self.search_results, self.confidence_threshold
        );
        info!("   Skip domains: {:?}", self.skip_domains);
        info!(
            "   Fetch: {} attempts, backoff base {}, timeout {:?}",
            self.fetch.max_attempts, self.fetch.backoff_base, self.fetch.timeout
        );
        if !self.sleep_between_queries.is_zero() {
            info!("   Delay between queries: {:?}", self.sleep_between_queries);
        }
    }
}
