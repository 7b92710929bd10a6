//! Multi-register binding scan.
//!
//! Two strands of length `L` are compared in three regimes:
//!
//! - head-on, every position against the same position;
//! - right shifts: for `s` in `1 + skip .. L`, strand1 bases `[0, L - s)`
//!   against strand2 bases `[s, L)`;
//! - left shifts: the same range of `s`, strand1 bases `[s, L)` against
//!   strand2 bases `[0, L - s)`.
//!
//! Every register subtotal that comes out positive is added to a counter,
//! negative subtotals are dropped. The pair is bound when the counter reaches
//! the threshold. Overlaps of `skip` bases or fewer are never scored, so for
//! `L <= 1 + skip` only the head-on register contributes.
//!
//! Swapping the strands swaps the two shift families, so the verdict is
//! symmetric.

use crate::constants::{BITS_PER_BASE, DEFAULT_OVERLAP_SKIP, DEFAULT_OVERLAP_THRESHOLD};
use crate::scoring::ScoreTable;
use crate::types::{OligoError, Strand};

/// Binding scan over a shared score table.
///
/// # Examples
///
/// ```rust
/// use oligobind_core::alignment::BindingScanner;
/// use oligobind_core::scoring::ScoreTable;
/// use oligobind_core::types::Strand;
///
/// let table = ScoreTable::new();
/// let scanner = BindingScanner::with_defaults(&table);
///
/// let first: Strand = "AGCTTC".parse()?;
/// let second: Strand = "TCGTAG".parse()?;
/// assert!(scanner.bind_strand(&first, &second)?);
/// # Ok::<(), oligobind_core::types::OligoError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BindingScanner<'a> {
    table: &'a ScoreTable,
    overlap_skip: usize,
    overlap_threshold: i32,
}

impl<'a> BindingScanner<'a> {
    /// Scanner with explicit skip floor and threshold
    #[must_use]
    pub const fn new(table: &'a ScoreTable, overlap_skip: usize, overlap_threshold: i32) -> Self {
        Self {
            table,
            overlap_skip,
            overlap_threshold,
        }
    }

    /// Scanner with skip 4 and threshold 3
    #[must_use]
    pub const fn with_defaults(table: &'a ScoreTable) -> Self {
        Self::new(table, DEFAULT_OVERLAP_SKIP, DEFAULT_OVERLAP_THRESHOLD)
    }

    #[must_use]
    pub const fn overlap_skip(&self) -> usize {
        self.overlap_skip
    }

    #[must_use]
    pub const fn overlap_threshold(&self) -> i32 {
        self.overlap_threshold
    }

    /// Decides whether two strands bind.
    ///
    /// # Errors
    ///
    /// [`OligoError::LengthMismatch`] if the strands differ in length.
    pub fn bind_strand(&self, first: &Strand, second: &Strand) -> Result<bool, OligoError> {
        Ok(self.binding_score(first, second)? >= self.overlap_threshold)
    }

    /// Aggregated counter behind [`Self::bind_strand`].
    ///
    /// # Errors
    ///
    /// [`OligoError::LengthMismatch`] if the strands differ in length.
    pub fn binding_score(&self, first: &Strand, second: &Strand) -> Result<i32, OligoError> {
        if first.length() != second.length() {
            return Err(OligoError::LengthMismatch {
                left: first.length(),
                right: second.length(),
            });
        }
        Ok(self.score_registers(first.code(), second.code(), first.length()))
    }

    /// Verdict for two raw registers of `length` bases.
    #[inline]
    pub(crate) fn bind_registers(&self, first: u64, second: u64, length: usize) -> bool {
        self.score_registers(first, second, length) >= self.overlap_threshold
    }

    #[inline]
    fn score_registers(&self, first: u64, second: u64, length: usize) -> i32 {
        let mut counter = self.table.score_registers(first, second, length).max(0);

        for shift in self.overlap_skip.saturating_add(1)..length {
            let overlap = length - shift;
            let offset = shift * BITS_PER_BASE;

            // right shift: strand2 slides toward strand1's low end
            counter += self
                .table
                .score_registers(first, second >> offset, overlap)
                .max(0);
            // left shift
            counter += self
                .table
                .score_registers(first >> offset, second, overlap)
                .max(0);
        }

        counter
    }
}
