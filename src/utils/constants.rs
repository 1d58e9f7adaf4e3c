// src/utils/constants.rs

/// Tokens dropped when building the heavy (clustering) form of a name.
pub const STOPWORDS: [&str; 6] = ["ltd", "limited", "inc", "llc", "corp", "corporation"];

/// Abbreviations expanded as whole words in the light form. Keys are lowercase.
pub const ABBREVIATIONS: [(&str, &str); 6] = [
    ("co.", "company"),
    ("intl", "international"),
    ("int'l", "international"),
    ("ind.", "industry"),
    ("tech.", "technology"),
    ("elec.", "electronic"),
];

/// Leading words stripped from names (at most one per name).
pub const DEFAULT_REMOVE_PREFIXES: [&str; 1] = ["guangzhou"];

/// Result URLs containing any of these are never official company sites.
pub const DEFAULT_SKIP_DOMAINS: [&str; 6] = [
    "linkedin.com",
    "facebook.com",
    "crunchbase.com",
    "bloomberg.com",
    "wikipedia.org",
    "youtube.com",
];

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.9;
pub const DEFAULT_TARGET_BATCH_SIZE: usize = 2000;
pub const DEFAULT_SEARCH_RESULTS: usize = 5;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 70.0;
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 2;
pub const DEFAULT_BACKOFF_BASE: u32 = 2;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

pub const WEBSITE_QUERY_SUFFIX: &str = " official website";
pub const INDUSTRY_QUERY_SUFFIX: &str = " industry";
pub const SEARCH_QUERY_SUFFIX: &str = " official site";

pub const NORMALIZED_FILE_NAME: &str = "minimal_normalized.csv";
pub const BATCH_SUBDIRECTORY: &str = "batches";
pub const ENRICHED_FILE_SUFFIX: &str = "_enriched";
pub const NORMALIZATION_SUMMARY_FILE_NAME: &str = "normalization_summary.json";
pub const ENRICHMENT_SUMMARY_FILE_NAME: &str = "enrichment_summary.json";

pub const FETCH_STATUS_OK: &str = "ok";
pub const FETCH_STATUS_FAILED: &str = "failed";
pub const FETCH_STATUS_NOT_FETCHED: &str = "not_fetched";
