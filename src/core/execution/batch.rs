use log::debug;
use rayon::prelude::*;

use crate::core::errors::{PortError, ValidationError};
use crate::core::ports::PortNamespace;
use crate::core::values::ValueMap;

use super::config::{ConcurrencyMode, ValidationConfig};

/// Validates batches of independent value sets
///
/// The Rayon pool, if the configuration asks for one, is built once here
/// and reused by every call to [`validate`](Self::validate).
#[derive(Debug)]
pub struct BatchValidator {
    config: ValidationConfig,
    pool: Option<rayon::ThreadPool>,
}

impl BatchValidator {
    pub fn new(config: ValidationConfig) -> Result<Self, PortError> {
        config.check()?;
        let pool = match config.concurrency_mode {
            ConcurrencyMode::Sequential => None,
            ConcurrencyMode::Rayon => {
                let mut builder = rayon::ThreadPoolBuilder::new();
                if let Some(size) = config.thread_pool_size {
                    builder = builder.num_threads(size);
                }
                let pool = builder
                    .build()
                    .map_err(|e| PortError::ThreadPool(e.to_string()))?;
                debug!("built validation pool with {} threads", pool.current_num_threads());
                Some(pool)
            }
        };
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Number of pool threads, zero without a pool
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(0, |pool| pool.current_num_threads())
    }

    /// Validate every value set, keeping the order of `batch`
    pub fn validate(&self, namespace: &PortNamespace, batch: &[ValueMap]) -> Vec<Result<(), ValidationError>> {
        let mode = self.config.mode_for(batch.len());
        debug!(
            "validating {} value sets against '{}' ({:?})",
            batch.len(),
            namespace.name(),
            mode
        );

        match (mode, &self.pool) {
            (ConcurrencyMode::Rayon, Some(pool)) => pool.install(|| {
                batch
                    .par_iter()
                    .map(|values| namespace.validate(Some(values)))
                    .collect()
            }),
            _ => batch.iter().map(|values| namespace.validate(Some(values))).collect(),
        }
    }
}

/// Validate one batch with a validator built just for it
///
/// Prefer a [`BatchValidator`] when validating many batches, so the pool
/// is not rebuilt each time.
pub fn validate_batch(
    namespace: &PortNamespace,
    batch: &[ValueMap],
    config: &ValidationConfig,
) -> Result<Vec<Result<(), ValidationError>>, PortError> {
    Ok(BatchValidator::new(config.clone())?.validate(namespace, batch))
}
