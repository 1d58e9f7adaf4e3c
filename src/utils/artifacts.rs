// src/utils/artifacts.rs - CSV artifact helpers shared by both stages

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::models::{EnrichmentRecord, RawRecord};
use crate::utils::constants::ENRICHED_FILE_SUFFIX;

/// Raw names pulled out of the input artifact.
#[derive(Debug, Clone)]
pub struct InputNames {
    pub column: String,
    pub records: Vec<RawRecord>,
}

/// Reads the name column of the input CSV. Every value is kept as raw text;
/// files that are not valid UTF-8 are decoded as Latin-1.
pub fn read_input_names(path: &Path, name_column: Option<&str>) -> Result<InputNames> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "Input {} is not valid UTF-8, decoding as Latin-1",
                path.display()
            );
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to parse header row of {}", path.display()))?
        .clone();
    if headers.is_empty() {
        return Err(anyhow!("Input file {} has no columns", path.display()));
    }

    let column_index = match name_column {
        Some(wanted) => headers
            .iter()
            .position(|h| h.trim() == wanted)
            .ok_or_else(|| anyhow!("Column '{}' not found in {}", wanted, path.display()))?,
        None => 0,
    };
    let column = headers.get(column_index).unwrap_or_default().to_string();

    let mut records = Vec::new();
    for (row_number, row) in reader.records().enumerate() {
        let row = row.with_context(|| {
            format!("Malformed row {} in {}", row_number + 2, path.display())
        })?;
        records.push(RawRecord {
            raw_name: row.get(column_index).map(|value| value.to_string()),
        });
    }

    debug!(
        "Read {} rows from {} (column '{}')",
        records.len(),
        path.display(),
        column
    );
    Ok(InputNames { column, records })
}

/// Writes all rows to `path`, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

pub fn write_json_summary<T: Serialize>(path: &Path, summary: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// `batch_001.csv`, `batch_002.csv`, ... (index is one-based).
pub fn batch_file_name(index: usize) -> String {
    format!("batch_{:03}.csv", index)
}

pub fn batch_name(batch_file: &Path) -> String {
    batch_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn enriched_path_for(output_dir: &Path, batch_file: &Path) -> PathBuf {
    output_dir.join(format!("{}{}.csv", batch_name(batch_file), ENRICHED_FILE_SUFFIX))
}

/// Sorted list of `.csv` files in `dir`.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file() && path.extension().map_or(false, |ext| ext == "csv")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Names of representatives listed in a batch artifact, in file order.
/// Uses the `representative_name` column, or `representative` when absent.
pub fn read_batch_names(batch_file: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(batch_file)
        .with_context(|| format!("Failed to open batch file {}", batch_file.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", batch_file.display()))?
        .clone();
    let column_index = headers
        .iter()
        .position(|h| h == "representative_name")
        .or_else(|| headers.iter().position(|h| h == "representative"));

    let mut names = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("Malformed row in {}", batch_file.display()))?;
        let name = column_index
            .and_then(|idx| row.get(idx))
            .unwrap_or_default()
            .to_string();
        names.push(name);
    }
    Ok(names)
}

/// Representatives already recorded in an enriched artifact. A missing file is
/// an empty checkpoint; an unreadable one is logged and treated as empty.
pub fn load_processed_names(output_file: &Path) -> HashSet<String> {
    if !output_file.exists() {
        return HashSet::new();
    }
    match read_processed_names(output_file) {
        Ok(names) => names,
        Err(e) => {
            warn!(
                "Could not read checkpoint {}: {:#}. Starting batch from scratch.",
                output_file.display(),
                e
            );
            HashSet::new()
        }
    }
}

fn read_processed_names(output_file: &Path) -> Result<HashSet<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(output_file)
        .with_context(|| format!("Failed to open {}", output_file.display()))?;
    let headers = reader.headers()?.clone();
    let idx = headers
        .iter()
        .position(|h| h == "representative")
        .ok_or_else(|| anyhow!("missing 'representative' column"))?;
    let mut names = HashSet::new();
    for row in reader.records() {
        let row = row?;
        if let Some(name) = row.get(idx) {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

/// Append-only writer for an enriched artifact. The header is written only
/// when the file starts out empty; every record is flushed immediately.
pub struct EnrichedAppender {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl EnrichedAppender {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for appending", path.display()))?;
        let is_empty = file
            .metadata()
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len()
            == 0;
        let writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn append(&mut self, record: &EnrichmentRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }
}

/// Number of data rows in a CSV file.
pub fn count_csv_rows(path: &Path) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut count = 0;
    for row in reader.records() {
        row.with_context(|| format!("Malformed row in {}", path.display()))?;
        count += 1;
    }
    Ok(count)
}
