//! End-to-end runs of both stages on temporary directories. Enrichment uses
//! in-process search and fetch fakes, so no network access is needed.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use enrichment_lib::enrichment::fetch::{FetchError, PageResponse};
use enrichment_lib::enrichment::search::{SearchError, SearchHit};
use enrichment_lib::enrichment::{run_enrichment, EnrichmentClient, PageFetcher, SearchProvider};
use enrichment_lib::models::{EnrichmentRecord, NormalizedRow, Representative};
use enrichment_lib::normalization::run_normalization;
use enrichment_lib::utils::artifact_status::collect_artifact_status;
use enrichment_lib::utils::config::{EnrichmentConfig, NormalizationConfig};
use enrichment_lib::utils::progress_bars::progress_callback::ProgressReporter;
use tempfile::TempDir;

const INPUT: &str = "company_name,country\n\
Acme Corp.,US\n\
ACME Corporation,US\n\
Acme Co.,US\n\
Guangzhou Sunrise Trading Co. Ltd,CN\n\
Sunrise Trading Limited,CN\n\
Société Générale,FR\n\
Societe Generale,FR\n\
!!!,XX\n\
,XX\n\
Example Industries,US\n";

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
    csv::Reader::from_path(path)
        .unwrap()
        .deserialize()
        .map(|row| row.unwrap())
        .collect()
}

fn normalization_config(dir: &TempDir, batch_size: usize) -> NormalizationConfig {
    let input_path = dir.path().join("companies.csv");
    fs::write(&input_path, INPUT).unwrap();
    NormalizationConfig {
        input_path,
        output_dir: dir.path().join("artifacts"),
        target_batch_size: batch_size,
        workers: 3,
        ..NormalizationConfig::default()
    }
}

#[tokio::test]
async fn normalization_produces_artifacts_and_batches() {
    let dir = tempfile::tempdir().unwrap();
    let config = normalization_config(&dir, 2);

    let stats = run_normalization(&config, None).await.unwrap();
    assert_eq!(stats.input_rows, 10);
    assert_eq!(stats.name_column, "company_name");

    let rows: Vec<NormalizedRow> = read_rows(&config.output_dir.join("minimal_normalized.csv"));
    assert_eq!(rows.len(), stats.normalized_rows);

    // Unique, non-empty light forms.
    let lights: HashSet<&str> = rows.iter().map(|r| r.normalized_light.as_str()).collect();
    assert_eq!(lights.len(), rows.len());
    assert!(rows.iter().all(|r| !r.normalized_light.trim().is_empty()));

    // Accented and plain spellings collapse to one light form.
    assert_eq!(
        rows.iter().filter(|r| r.normalized_light == "societe generale").count(),
        1
    );

    // Acme Corp. and ACME Corporation share a heavy form and so a cluster.
    let acme: Vec<&NormalizedRow> = rows
        .iter()
        .filter(|r| r.normalized_light == "acme corp" || r.normalized_light == "acme corporation")
        .collect();
    assert_eq!(acme.len(), 2);
    assert_eq!(acme[0].fuzzy_heavy, acme[1].fuzzy_heavy);
    assert_eq!(acme[0].representative_name, "acme corp");
    assert_eq!(acme[1].representative_name, "acme corp");
    assert_eq!(acme[1].search_query_website, "acme corp official website");

    // Prefix stripping lines the two Sunrise spellings up.
    let sunrise = rows
        .iter()
        .find(|r| r.raw_name == "Guangzhou Sunrise Trading Co. Ltd")
        .unwrap();
    assert_eq!(sunrise.normalized_light, "sunrise trading company ltd");

    // Batches hold one row per cluster, two per file.
    let batch_dir = config.batch_dir();
    let mut batch_reps: Vec<Representative> = Vec::new();
    for idx in 1..=stats.total_batches {
        let path = batch_dir.join(format!("batch_{:03}.csv", idx));
        let reps: Vec<Representative> = read_rows(&path);
        assert!(reps.len() <= 2);
        batch_reps.extend(reps);
    }
    assert!(!batch_dir.join(format!("batch_{:03}.csv", stats.total_batches + 1)).exists());
    assert_eq!(batch_reps.len(), stats.total_representatives);
    assert_eq!(batch_reps.len(), stats.total_clusters);
    let keys: HashSet<&str> = batch_reps.iter().map(|r| r.fuzzy_key.as_str()).collect();
    assert_eq!(keys.len(), batch_reps.len());
}

#[tokio::test]
async fn normalization_is_deterministic_across_worker_counts() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let mut config_a = normalization_config(&dir_a, 2000);
    let mut config_b = normalization_config(&dir_b, 2000);
    config_a.workers = 1;
    config_b.workers = 8;

    run_normalization(&config_a, None).await.unwrap();
    run_normalization(&config_b, None).await.unwrap();

    let a: Vec<NormalizedRow> = read_rows(&config_a.output_dir.join("minimal_normalized.csv"));
    let b: Vec<NormalizedRow> = read_rows(&config_b.output_dir.join("minimal_normalized.csv"));
    assert_eq!(a, b);
}

/// Finds `https://<first-word>.com` for every company, titled with the name.
struct DirectorySearch;

impl SearchProvider for DirectorySearch {
    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let name = query.trim_end_matches(" official site");
        let first = name.split_whitespace().next().unwrap_or("unknown");
        Ok(vec![
            SearchHit::new(format!("https://www.linkedin.com/company/{}", first), name, ""),
            SearchHit::new(format!("https://{}.com", first), format!("{} - Home", name), ""),
        ])
    }
}

struct StaticFetcher;

impl PageFetcher for StaticFetcher {
    async fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
        if url.contains("sunrise") {
            return Ok(PageResponse {
                status: 500,
                body: String::new(),
            });
        }
        Ok(PageResponse {
            status: 200,
            body: "<html><head><title>Welcome</title></head></html>".to_string(),
        })
    }
}

#[tokio::test]
async fn enrichment_runs_over_batches_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let normalization = normalization_config(&dir, 2);
    let norm_stats = run_normalization(&normalization, None).await.unwrap();

    let mut config = EnrichmentConfig::default();
    config.batch_dir = normalization.batch_dir();
    config.output_dir = dir.path().join("results");
    config.fetch.backoff_unit = Duration::ZERO;
    let client = EnrichmentClient::new(DirectorySearch, StaticFetcher, config.clone());

    let stats = run_enrichment(&client, &ProgressReporter::disabled()).await.unwrap();
    assert_eq!(stats.total_batches, norm_stats.total_batches);
    assert_eq!(stats.processed, norm_stats.total_representatives);
    assert!(stats.failed_batches.is_empty());

    let first = config.output_dir.join("batch_001_enriched.csv");
    let records: Vec<EnrichmentRecord> = read_rows(&first);
    assert!(!records.is_empty());
    for record in &records {
        assert!((0.0..=100.0).contains(&record.confidence_score));
        assert_eq!(record.verified, record.confidence_score >= 70.0);
        assert!(!record.website.contains("linkedin.com"));
    }

    let status = collect_artifact_status(&normalization.output_dir, &config.batch_dir, &config.output_dir);
    assert_eq!(status.total_enriched(), stats.processed);
    assert_eq!(status.batch_count, norm_stats.total_batches);

    // Re-running appends nothing.
    let rerun = run_enrichment(&client, &ProgressReporter::disabled()).await.unwrap();
    assert_eq!(rerun.total_tasks, 0);
    assert_eq!(rerun.processed, 0);
    let status_after = collect_artifact_status(&normalization.output_dir, &config.batch_dir, &config.output_dir);
    assert_eq!(status_after.total_enriched(), stats.processed);
}
