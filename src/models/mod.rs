pub mod records;
pub mod stats_models;

pub use records::{
    EnrichmentRecord, NormalizedRecord, NormalizedRow, RawRecord, Representative,
};
pub use stats_models::{BatchOutcome, EnrichmentStats, NormalizationStats};
