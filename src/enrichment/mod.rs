pub mod client;
pub mod fetch;
pub mod http;
pub mod processor;
pub mod scoring;
pub mod search;

pub use client::EnrichmentClient;
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use processor::{run_enrichment, COMPLETION_MESSAGE};
pub use search::{DuckDuckGoSearch, SearchProvider};
