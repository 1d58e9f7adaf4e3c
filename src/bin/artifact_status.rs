// src/bin/artifact_status.rs
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use enrichment_lib::utils::artifact_status::collect_artifact_status;
use enrichment_lib::utils::config::{EnrichmentConfig, NormalizationConfig};
use enrichment_lib::utils::env::load_env;

/// Report what the normalization and enrichment stages have produced so far.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the normalized artifact
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory holding the batch files
    #[arg(long)]
    batch_dir: Option<PathBuf>,

    /// Directory holding the enriched artifacts
    #[arg(long)]
    enrichment_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    load_env();

    let normalization = NormalizationConfig::from_env();
    let enrichment = EnrichmentConfig::from_env();
    let output_dir = args.output_dir.unwrap_or(normalization.output_dir);
    let batch_dir = args.batch_dir.unwrap_or(enrichment.batch_dir);
    let enrichment_dir = args.enrichment_dir.unwrap_or(enrichment.output_dir);

    let status = collect_artifact_status(&output_dir, &batch_dir, &enrichment_dir);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match &status.normalized_file {
        Some(file) => println!(
            "📄 Normalized: {} ({} rows, {} bytes)",
            file.path.display(),
            file.rows,
            file.size_bytes
        ),
        None => println!("📄 Normalized: not found in {}", output_dir.display()),
    }
    println!(
        "📦 Batches: {} file(s), {} representatives in {}",
        status.batch_count,
        status.total_representatives,
        batch_dir.display()
    );
    println!(
        "🌐 Enriched: {} file(s), {} rows in {}",
        status.enriched_files.len(),
        status.total_enriched(),
        enrichment_dir.display()
    );
    for file in &status.enriched_files {
        println!("   {} - {} rows, {} bytes", file.name, file.rows, file.size_bytes);
    }
    Ok(())
}
