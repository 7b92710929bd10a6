use std::path::Path;

use rayon::prelude::*;

use crate::alignment::BindingScanner;
use crate::benchmark::run_benchmark;
use crate::config::{BindingConfig, build_thread_pool};
use crate::relations;
use crate::results::{BenchmarkReport, RelationSummary, ScreenHit};
use crate::scoring::ScoreTable;
use crate::sequence::read_oligo_fasta;
use crate::types::{NamedStrand, OligoError, Strand};

/// Main entry point: a validated configuration plus the score table built
/// for it.
///
/// The table is constructed once in [`BindingEngine::new`] and shared by
/// reference with every scan the engine runs. When
/// [`BindingConfig::num_threads`] is set the engine owns a dedicated Rayon
/// pool and runs all parallel work inside it.
///
/// # Examples
///
/// ```rust
/// use oligobind_core::engine::BindingEngine;
/// use oligobind_core::config::BindingConfig;
/// use oligobind_core::types::Strand;
///
/// let engine = BindingEngine::new(BindingConfig::default())?;
///
/// let first: Strand = "AGCTTC".parse()?;
/// let second: Strand = "TCGTAG".parse()?;
/// assert!(engine.bind_strand(&first, &second)?);
/// assert_eq!(engine.binding_score(&first, &second)?, 4);
/// # Ok::<(), oligobind_core::types::OligoError>(())
/// ```
#[derive(Debug)]
pub struct BindingEngine {
    /// Configuration the engine was built with
    pub config: BindingConfig,
    table: ScoreTable,
    pool: Option<rayon::ThreadPool>,
}

impl BindingEngine {
    /// Creates an engine after validating `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Binding and enumeration options
    ///
    /// # Errors
    ///
    /// Returns [`OligoError::InvalidConfig`] if validation fails or the
    /// thread pool cannot be built.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use oligobind_core::engine::BindingEngine;
    /// use oligobind_core::config::BindingConfig;
    ///
    /// let config = BindingConfig {
    ///     strand_length: 4,
    ///     num_threads: Some(2),
    ///     ..Default::default()
    /// };
    ///
    /// let engine = BindingEngine::new(config)?;
    /// # Ok::<(), oligobind_core::types::OligoError>(())
    /// ```
    pub fn new(config: BindingConfig) -> Result<Self, OligoError> {
        config.validate()?;

        let pool = config.num_threads.map(build_thread_pool).transpose()?;

        Ok(Self {
            config,
            table: ScoreTable::new(),
            pool,
        })
    }

    /// Shared score table
    #[must_use]
    pub const fn score_table(&self) -> &ScoreTable {
        &self.table
    }

    /// Scanner using the configured skip and threshold
    #[must_use]
    pub const fn scanner(&self) -> BindingScanner<'_> {
        BindingScanner::new(
            &self.table,
            self.config.overlap_skip,
            self.config.overlap_threshold,
        )
    }

    /// Decides whether two strands bind under the configured thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`OligoError::LengthMismatch`] if the strands differ in length.
    pub fn bind_strand(&self, first: &Strand, second: &Strand) -> Result<bool, OligoError> {
        self.scanner().bind_strand(first, second)
    }

    /// Aggregated binding counter for two strands.
    ///
    /// # Errors
    ///
    /// Returns [`OligoError::LengthMismatch`] if the strands differ in length.
    pub fn binding_score(&self, first: &Strand, second: &Strand) -> Result<i32, OligoError> {
        self.scanner().binding_score(first, second)
    }

    /// Enumerates every ordered pair of the configured strand space into
    /// [`BindingConfig::output_path`].
    ///
    /// # Returns
    ///
    /// A [`RelationSummary`] with pair counts, bytes written and run time.
    ///
    /// # Errors
    ///
    /// Returns [`OligoError::Io`] if the output file cannot be created or
    /// written. The file is opened before any comparison runs.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use oligobind_core::engine::BindingEngine;
    /// use oligobind_core::config::BindingConfig;
    ///
    /// let engine = BindingEngine::new(BindingConfig {
    ///     strand_length: 5,
    ///     output_path: "pentamers.bin".into(),
    ///     ..Default::default()
    /// })?;
    ///
    /// let summary = engine.generate_relations()?;
    /// println!("{:.4}% of pairs bound", summary.bound_fraction() * 100.0);
    /// # Ok::<(), oligobind_core::types::OligoError>(())
    /// ```
    pub fn generate_relations(&self) -> Result<RelationSummary, OligoError> {
        self.in_pool(|| relations::generate_relations(&self.config, &self.table))
    }

    /// Times [`BindingConfig::benchmark_repetitions`] full scans of the
    /// configured strand space.
    ///
    /// # Errors
    ///
    /// Returns [`OligoError`] for invalid lengths or zero repetitions.
    pub fn benchmark(&self) -> Result<BenchmarkReport, OligoError> {
        self.in_pool(|| {
            run_benchmark(
                &self.table,
                self.config.strand_length,
                self.config.overlap_skip,
                self.config.overlap_threshold,
                self.config.benchmark_repetitions,
            )
        })
    }

    /// Checks every ordered pair of a named oligo panel, self-pairs included.
    ///
    /// # Returns
    ///
    /// The bound pairs in panel order (strand1-major).
    ///
    /// # Errors
    ///
    /// Returns [`OligoError::LengthMismatch`] if the panel mixes lengths.
    pub fn screen_panel(&self, panel: &[NamedStrand]) -> Result<Vec<ScreenHit>, OligoError> {
        if let Some(reference) = panel.first() {
            let length = reference.strand.length();
            if let Some(odd) = panel.iter().find(|n| n.strand.length() != length) {
                return Err(OligoError::LengthMismatch {
                    left: length,
                    right: odd.strand.length(),
                });
            }
        }

        let scanner = self.scanner();
        let threshold = scanner.overlap_threshold();
        let rows = self.in_pool(|| {
            panel
                .par_iter()
                .map(|first| -> Result<Vec<ScreenHit>, OligoError> {
                    let mut row = Vec::new();
                    for second in panel {
                        let score = scanner.binding_score(&first.strand, &second.strand)?;
                        if score >= threshold {
                            row.push(ScreenHit {
                                first: first.name.clone(),
                                second: second.name.clone(),
                                score,
                            });
                        }
                    }
                    Ok(row)
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        Ok(rows.into_iter().flatten().collect())
    }

    /// Loads a FASTA panel and screens it with [`Self::screen_panel`].
    ///
    /// # Errors
    ///
    /// Returns [`OligoError`] if the file cannot be read or parsed, or the
    /// panel mixes lengths.
    pub fn screen_fasta<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ScreenHit>, OligoError> {
        let panel = read_oligo_fasta(path)?;
        self.screen_panel(&panel)
    }

    fn in_pool<T, F>(&self, work: F) -> T
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }
}
