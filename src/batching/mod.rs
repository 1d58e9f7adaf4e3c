pub mod partition;

pub use partition::{plan_batches, unique_representatives, write_batches, BatchPlan};
