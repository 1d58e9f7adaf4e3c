//! Snapshot of what is currently on disk for both stages: the normalized
//! artifact, the batch files and the enriched outputs.

use log::warn;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::artifacts::{count_csv_rows, list_csv_files};
use crate::utils::constants::{ENRICHED_FILE_SUFFIX, NORMALIZED_FILE_NAME};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
    pub normalized_file: Option<FileStats>,
    pub batch_count: usize,
    pub total_representatives: usize,
    pub enriched_files: Vec<FileStats>,
}

impl ArtifactStatus {
    pub fn total_enriched(&self) -> usize {
        self.enriched_files.iter().map(|f| f.rows).sum()
    }
}

fn file_stats(path: &Path) -> Option<FileStats> {
    let rows = match count_csv_rows(path) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Skipping unreadable artifact {}: {:#}", path.display(), e);
            return None;
        }
    };
    let size_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    Some(FileStats {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        rows,
        size_bytes,
    })
}

/// Collects artifact statistics. Missing directories simply report nothing.
pub fn collect_artifact_status(output_dir: &Path, batch_dir: &Path, enrichment_dir: &Path) -> ArtifactStatus {
    let mut status = ArtifactStatus::default();

    let normalized = output_dir.join(NORMALIZED_FILE_NAME);
    if normalized.exists() {
        status.normalized_file = file_stats(&normalized);
    }

    if batch_dir.is_dir() {
        if let Ok(batch_files) = list_csv_files(batch_dir) {
            let batch_files: Vec<PathBuf> = batch_files
                .into_iter()
                .filter(|p| {
                    p.file_name()
                        .map_or(false, |n| n.to_string_lossy().starts_with("batch_"))
                })
                .collect();
            status.batch_count = batch_files.len();
            status.total_representatives = batch_files
                .iter()
                .filter_map(|p| file_stats(p))
                .map(|s| s.rows)
                .sum();
        }
    }

    if enrichment_dir.is_dir() {
        if let Ok(files) = list_csv_files(enrichment_dir) {
            let suffix = format!("{}.csv", ENRICHED_FILE_SUFFIX);
            status.enriched_files = files
                .iter()
                .filter(|p| {
                    p.file_name()
                        .map_or(false, |n| n.to_string_lossy().ends_with(&suffix))
                })
                .filter_map(|p| file_stats(p))
                .collect();
        }
    }

    status
}
