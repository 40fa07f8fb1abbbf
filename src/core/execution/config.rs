use crate::core::errors::PortError;

/// Batches smaller than this are validated on the calling thread
pub const DEFAULT_MIN_PARALLEL_BATCH: usize = 16;

/// Where the value sets of a batch are validated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// In order, on the calling thread
    #[default]
    Sequential,
    /// In parallel, on a Rayon thread pool
    Rayon,
}

/// Settings for batch validation
///
/// In `Rayon` mode, batches below `min_parallel_batch` are still validated
/// sequentially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub concurrency_mode: ConcurrencyMode,
    /// Worker threads of the pool; Rayon's own default when `None`
    pub thread_pool_size: Option<usize>,
    pub min_parallel_batch: usize,
}

impl ValidationConfig {
    /// Sequential validation with the default parallel threshold
    pub fn new() -> Self {
        Self {
            concurrency_mode: ConcurrencyMode::Sequential,
            thread_pool_size: None,
            min_parallel_batch: DEFAULT_MIN_PARALLEL_BATCH,
        }
    }

    /// Parallel validation on a pool of `threads` workers
    pub fn parallel(threads: usize) -> Self {
        Self::new()
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(threads)
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Smallest batch that is spread over the pool
    pub fn with_min_parallel_batch(mut self, size: usize) -> Self {
        self.min_parallel_batch = size;
        self
    }

    /// Check the settings before a pool is built from them
    pub fn check(&self) -> Result<(), PortError> {
        if self.thread_pool_size == Some(0) {
            return Err(PortError::ThreadPool(
                "thread pool size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Mode actually used for a batch of `len` value sets
    pub fn mode_for(&self, len: usize) -> ConcurrencyMode {
        match self.concurrency_mode {
            ConcurrencyMode::Rayon if len >= self.min_parallel_batch.max(2) => ConcurrencyMode::Rayon,
            _ => ConcurrencyMode::Sequential,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_batches_stay_sequential() {
        let config = ValidationConfig::parallel(4).with_min_parallel_batch(10);
        assert_eq!(config.mode_for(0), ConcurrencyMode::Sequential);
        assert_eq!(config.mode_for(9), ConcurrencyMode::Sequential);
        assert_eq!(config.mode_for(10), ConcurrencyMode::Rayon);
    }

    #[test]
    fn test_single_item_never_goes_parallel() {
        let config = ValidationConfig::parallel(2).with_min_parallel_batch(0);
        assert_eq!(config.mode_for(1), ConcurrencyMode::Sequential);
        assert_eq!(config.mode_for(2), ConcurrencyMode::Rayon);
    }

    #[test]
    fn test_sequential_mode_ignores_batch_size() {
        let config = ValidationConfig::default();
        assert_eq!(config.mode_for(10_000), ConcurrencyMode::Sequential);
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        assert!(ValidationConfig::parallel(0).check().is_err());
        assert!(ValidationConfig::parallel(3).check().is_ok());
        assert!(ValidationConfig::new().check().is_ok());
    }
}
