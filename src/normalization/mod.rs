pub mod canonicalize;
pub mod dedup;
pub mod driver;
pub mod pipeline;
pub mod representatives;

pub use canonicalize::{heavy_form, NameCanonicalizer};
pub use pipeline::run_normalization;
