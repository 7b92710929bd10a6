//! Timing harness for the full cross-product scan.
//!
//! Runs the same scan as relation enumeration without writing anything, so
//! the numbers reflect scoring throughput alone.

use std::hint::black_box;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::alignment::BindingScanner;
use crate::results::BenchmarkReport;
use crate::scoring::ScoreTable;
use crate::sequence::StrandSpace;
use crate::types::OligoError;

/// Scans every ordered pair of the `length` strand space `repetitions` times.
///
/// # Errors
///
/// - [`OligoError::InvalidConfig`] for zero repetitions, or a space whose
///   pair count does not fit a `u64`
/// - length errors from [`StrandSpace::new`]
pub fn run_benchmark(
    table: &ScoreTable,
    length: usize,
    overlap_skip: usize,
    overlap_threshold: i32,
    repetitions: usize,
) -> Result<BenchmarkReport, OligoError> {
    if repetitions == 0 {
        return Err(OligoError::InvalidConfig(
            "benchmark needs at least one repetition".to_string(),
        ));
    }

    let space = StrandSpace::new(length)?;
    let comparisons_per_run = space.pair_count().ok_or_else(|| {
        OligoError::InvalidConfig(format!(
            "{length}-base strand space has too many pairs to benchmark"
        ))
    })?;
    let strands: Vec<u64> = space.iter().map(|strand| strand.code()).collect();
    let scanner = BindingScanner::new(table, overlap_skip, overlap_threshold);

    let mut runs = Vec::with_capacity(repetitions);
    let mut bound_pairs = 0;
    for run in 0..repetitions {
        let started = Instant::now();
        bound_pairs = strands
            .par_iter()
            .map(|&first| {
                strands
                    .iter()
                    .filter(|&&second| scanner.bind_registers(first, second, length))
                    .count() as u64
            })
            .sum();
        black_box(bound_pairs);
        let elapsed = started.elapsed();

        info!("{length}bp run {run}: {elapsed:.3?}");
        runs.push(elapsed);
    }

    let report = BenchmarkReport {
        strand_length: length,
        comparisons_per_run,
        bound_pairs,
        runs,
    };
    info!("{length}bp average: {:.3?}", report.mean());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_benchmark_records_every_run() {
        let table = ScoreTable::new();
        let report = run_benchmark(&table, 3, 4, 3, 3).unwrap();

        assert_eq!(report.runs.len(), 3);
        assert_eq!(report.comparisons_per_run, 4096);
        assert_eq!(report.bound_pairs, 64);
        assert!(report.mean() <= report.total());
    }

    #[test]
    fn test_run_benchmark_zero_repetitions() {
        let table = ScoreTable::new();
        assert!(matches!(
            run_benchmark(&table, 3, 4, 3, 0),
            Err(OligoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_benchmark_rejects_uncountable_space() {
        let table = ScoreTable::new();
        assert!(matches!(
            run_benchmark(&table, 16, 4, 3, 1),
            Err(OligoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_benchmark_length_overflow() {
        let table = ScoreTable::new();
        assert!(matches!(
            run_benchmark(&table, 22, 4, 3, 1),
            Err(OligoError::EncodingOverflow { .. })
        ));
    }
}
