use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a relation enumeration run.
///
/// # Examples
///
/// ```rust,no_run
/// use oligobind_core::engine::BindingEngine;
/// use oligobind_core::config::BindingConfig;
///
/// let engine = BindingEngine::new(BindingConfig::default())?;
/// let summary = engine.generate_relations()?;
///
/// println!("Length: {} bases", summary.strand_length);
/// println!("Bound: {} of {}", summary.bound_pairs, summary.comparisons);
/// println!("Written: {} bytes to {}", summary.bytes_written, summary.output_path.display());
/// # Ok::<(), oligobind_core::types::OligoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RelationSummary {
    /// Bases per strand
    pub strand_length: usize,

    /// Size of the strand space, `4^strand_length`
    pub strand_count: u64,

    /// Ordered pairs scanned, `strand_count^2`
    pub comparisons: u64,

    /// Pairs whose verdict was bound
    pub bound_pairs: u64,

    /// Rayon workers the scan ran on
    pub threads: usize,

    /// Total bytes in the relation file, header included
    pub bytes_written: u64,

    /// Where the relation file was written
    pub output_path: PathBuf,

    /// Wall-clock time for the whole run
    pub elapsed: Duration,
}

impl RelationSummary {
    /// Fraction of scanned pairs that bound
    #[must_use]
    pub fn bound_fraction(&self) -> f64 {
        if self.comparisons == 0 {
            return 0.0;
        }
        self.bound_pairs as f64 / self.comparisons as f64
    }
}

/// Timings from repeated full cross-product scans.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Bases per strand
    pub strand_length: usize,

    /// Pairs scanned in each run
    pub comparisons_per_run: u64,

    /// Bound pairs found in each run; identical across runs
    pub bound_pairs: u64,

    /// Wall-clock duration of each run, in order
    pub runs: Vec<Duration>,
}

impl BenchmarkReport {
    /// Mean run duration, zero when no runs were recorded
    #[must_use]
    pub fn mean(&self) -> Duration {
        if self.runs.is_empty() {
            return Duration::ZERO;
        }
        self.total() / self.runs.len() as u32
    }

    /// Sum of all run durations
    #[must_use]
    pub fn total(&self) -> Duration {
        self.runs.iter().sum()
    }
}

/// A bound ordered pair from a screened oligo panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenHit {
    /// Name of strand1
    pub first: String,
    /// Name of strand2
    pub second: String,
    /// Aggregated binding counter
    pub score: i32,
}
