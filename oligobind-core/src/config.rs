use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BENCHMARK_REPETITIONS, DEFAULT_OUTPUT_PATH, DEFAULT_OVERLAP_SKIP,
    DEFAULT_OVERLAP_THRESHOLD, DEFAULT_STRAND_LENGTH, MAX_STRAND_LENGTH,
};
use crate::types::OligoError;

/// Configuration for binding scans and relation enumeration.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use oligobind_core::config::BindingConfig;
///
/// let config = BindingConfig::default();
/// assert_eq!(config.overlap_threshold, 3);
/// assert_eq!(config.overlap_skip, 4);
/// ```
///
/// ## Enumerating 5-mers into a raw file
///
/// ```rust
/// use oligobind_core::config::BindingConfig;
///
/// let config = BindingConfig {
///     strand_length: 5,
///     output_path: "pentamers.bin".into(),
///     write_header: false,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConfig {
    /// Bases per strand for enumeration and benchmarking.
    ///
    /// Must lie in `1..=21`; the strand space holds `4^strand_length` strands
    /// and enumeration visits the square of that.
    ///
    /// **Default**: `6`
    pub strand_length: usize,

    /// Minimum aggregated counter for a pair to count as bound.
    ///
    /// **Default**: `3`
    pub overlap_threshold: i32,

    /// Shifted registers whose overlap is this many bases or fewer are not
    /// scored.
    ///
    /// **Default**: `4`
    pub overlap_skip: usize,

    /// Destination of the relation file. Truncated on every run.
    ///
    /// **Default**: `binding.bin`
    pub output_path: PathBuf,

    /// Number of full scans timed by the benchmark harness.
    ///
    /// **Default**: `100`
    pub benchmark_repetitions: usize,

    /// Prefix the relation file with a self-describing header.
    ///
    /// When `false` the file holds records only, and readers must know the
    /// strand length out of band.
    ///
    /// **Default**: `true`
    pub write_header: bool,

    /// Worker threads for scans.
    ///
    /// When set, a dedicated Rayon pool of this size runs the work; the
    /// global pool is left untouched.
    ///
    /// **Default**: `None` (use the current Rayon pool, all available cores)
    pub num_threads: Option<usize>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            strand_length: DEFAULT_STRAND_LENGTH,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            overlap_skip: DEFAULT_OVERLAP_SKIP,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            benchmark_repetitions: DEFAULT_BENCHMARK_REPETITIONS,
            write_header: true,
            num_threads: None,
        }
    }
}

impl BindingConfig {
    /// Check option ranges before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`OligoError::InvalidConfig`] for a strand length outside
    /// `1..=21`, zero benchmark repetitions or zero threads.
    pub fn validate(&self) -> Result<(), OligoError> {
        if !(1..=MAX_STRAND_LENGTH).contains(&self.strand_length) {
            return Err(OligoError::InvalidConfig(format!(
                "strand_length must be between 1 and {MAX_STRAND_LENGTH}, got {}",
                self.strand_length
            )));
        }
        if self.benchmark_repetitions == 0 {
            return Err(OligoError::InvalidConfig(
                "benchmark_repetitions must be at least 1".to_string(),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(OligoError::InvalidConfig(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builds a dedicated Rayon pool with `num_threads` workers.
pub(crate) fn build_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool, OligoError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| OligoError::InvalidConfig(format!("Failed to configure thread pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BindingConfig::default();
        assert_eq!(config.strand_length, 6);
        assert_eq!(config.overlap_threshold, 3);
        assert_eq!(config.overlap_skip, 4);
        assert_eq!(config.output_path, PathBuf::from("binding.bin"));
        assert_eq!(config.benchmark_repetitions, 100);
        assert!(config.write_header);
        assert!(config.num_threads.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_strand_length() {
        for length in [0, 22, 64] {
            let config = BindingConfig {
                strand_length: length,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(OligoError::InvalidConfig(_))
            ));
        }
        for length in [1, 21] {
            let config = BindingConfig {
                strand_length: length,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_repetitions_and_threads() {
        let config = BindingConfig {
            benchmark_repetitions: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BindingConfig {
            num_threads: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_thread_pool() {
        let pool = build_thread_pool(3).unwrap();
        assert_eq!(pool.current_num_threads(), 3);
        assert_eq!(pool.install(rayon::current_num_threads), 3);
    }

    #[test]
    fn test_config_cloning() {
        let config = BindingConfig {
            strand_length: 4,
            overlap_threshold: 5,
            ..Default::default()
        };
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
