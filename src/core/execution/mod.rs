pub mod batch;
pub mod config;

pub use batch::{validate_batch, BatchValidator};
pub use config::{ConcurrencyMode, ValidationConfig, DEFAULT_MIN_PARALLEL_BATCH};
