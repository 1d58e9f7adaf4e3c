// src/normalization/driver.rs - Chunked parallel canonicalization

use anyhow::{anyhow, Result};
use futures::future::join_all;
use log::{debug, error};
use std::sync::Arc;

use crate::models::{NormalizedRecord, RawRecord};
use crate::normalization::canonicalize::NameCanonicalizer;

/// Canonicalizes every record on `workers` blocking workers using the given canonicalizer.
pub async fn normalize_parallel(
    records: Vec<RawRecord>,
    canonicalizer: Arc<NameCanonicalizer>,
    workers: usize,
) -> Result<Vec<NormalizedRecord>> {
    parallel_map_chunks(records, workers, move |record| canonicalizer.canonicalize(record)).await
}

/// Splits `records` into contiguous chunks of `ceil(n / workers)` rows, maps each
/// chunk on its own blocking task and concatenates the outputs in chunk order.
/// Any chunk failure fails the whole call with one error listing every failed chunk.
pub async fn parallel_map_chunks<F>(
    records: Vec<RawRecord>,
    workers: usize,
    map: F,
) -> Result<Vec<NormalizedRecord>>
where
    F: Fn(&RawRecord) -> NormalizedRecord + Send + Sync + 'static,
{
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let workers = workers.max(1);
    let chunk_size = (records.len() + workers - 1) / workers;
    let map = Arc::new(map);

    let mut tasks = Vec::new();
    for (chunk_idx, chunk) in records.chunks(chunk_size).enumerate() {
        let chunk = chunk.to_vec();
        let map = Arc::clone(&map);
        debug!("Spawning normalization chunk {} ({} rows)", chunk_idx, chunk.len());
        tasks.push(tokio::task::spawn_blocking(move || {
            chunk.iter().map(|record| map(record)).collect::<Vec<_>>()
        }));
    }

    let results = join_all(tasks).await;

    let mut normalized = Vec::with_capacity(records.len());
    let mut failures = Vec::new();
    for (chunk_idx, result) in results.into_iter().enumerate() {
        match result {
            Ok(chunk_output) => normalized.extend(chunk_output),
            Err(e) => {
                error!("Normalization chunk {} failed: {}", chunk_idx, e);
                failures.push(format!("chunk {}: {}", chunk_idx, e));
            }
        }
    }

    if !failures.is_empty() {
        return Err(anyhow!(
            "{} normalization worker(s) failed: {}",
            failures.len(),
            failures.join("; ")
        ));
    }
    Ok(normalized)
}
