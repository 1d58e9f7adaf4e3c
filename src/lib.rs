pub mod batching;
pub mod clustering;
pub mod enrichment;
pub mod models;
pub mod normalization;
pub mod utils;
