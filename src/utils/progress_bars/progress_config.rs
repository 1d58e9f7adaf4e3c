// src/utils/progress_bars/progress_config.rs

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::utils::env::env_or;

/// Terminal progress settings, read from `PROGRESS_*` variables.
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Master switch; the other flags only apply when set.
    pub enabled: bool,
    /// Whether to show the per-phase normalization bar
    pub detailed: bool,
    /// Log memory usage at the end of a run
    pub show_memory: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed: true,
            show_memory: true,
        }
    }
}

impl ProgressConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("PROGRESS_ENABLED", defaults.enabled),
            detailed: env_or("PROGRESS_DETAILED", defaults.detailed),
            show_memory: env_or("PROGRESS_SHOW_MEMORY", defaults.show_memory),
        }
    }

    pub fn create_multi_progress(&self) -> Option<MultiProgress> {
        if self.enabled {
            Some(MultiProgress::new())
        } else {
            None
        }
    }

    pub fn should_show_detailed(&self) -> bool {
        self.enabled && self.detailed
    }

    pub fn should_show_memory(&self) -> bool {
        self.enabled && self.show_memory
    }
}

/// Bar style shared by every pipeline progress bar.
pub fn pipeline_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Adds a styled bar to `multi_progress`, or returns None when progress is disabled.
pub fn add_bar(multi_progress: Option<&MultiProgress>, len: u64, message: &str) -> Option<ProgressBar> {
    multi_progress.map(|mp| {
        let pb = mp.add(ProgressBar::new(len));
        pb.set_style(pipeline_bar_style());
        pb.set_message(message.to_string());
        pb
    })
}
