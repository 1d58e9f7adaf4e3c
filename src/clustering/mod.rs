pub mod fuzzy_clustering;

pub use fuzzy_clustering::{cluster_heavy_forms, quick_ratio, FuzzyClusters};
