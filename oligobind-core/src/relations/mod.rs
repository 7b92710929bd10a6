//! Enumeration and persistence of strand-pair relations.
//!
//! Every ordered pair of the strand space for one length is run through the
//! [`BindingScanner`] and written as a flagged triple:
//!
//! ```text
//! strand1 code | strand2 code | flag (1 = bound, 0 = unbound)
//! ```
//!
//! Records appear in strand1-major order following [`StrandSpace`] order,
//! with strand2 in the same order inside each group. Codes are written in
//! the native byte order of the producing machine, 4 bytes wide for strands
//! of up to 10 bases and 8 bytes above that.
//!
//! ## Header
//!
//! Unless disabled, the file starts with 8 bytes:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | magic `OLGB` |
//! | 4 | 1 | format version (1) |
//! | 5 | 1 | strand length |
//! | 6 | 1 | layout id (1 = flagged triple) |
//! | 7 | 1 | code width in bytes |
//!
//! A file left behind by an interrupted run is not valid, whatever its size.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use oligobind_core::config::BindingConfig;
//! use oligobind_core::relations::{generate_relations, read_relation_file};
//! use oligobind_core::scoring::ScoreTable;
//!
//! let config = BindingConfig {
//!     strand_length: 4,
//!     output_path: "tetramers.bin".into(),
//!     ..Default::default()
//! };
//! let summary = generate_relations(&config, &ScoreTable::new())?;
//! println!("{} of {} pairs bound", summary.bound_pairs, summary.comparisons);
//!
//! let relations = read_relation_file("tetramers.bin")?;
//! assert_eq!(relations.len() as u64, summary.comparisons);
//! # Ok::<(), oligobind_core::types::OligoError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::alignment::BindingScanner;
use crate::config::{BindingConfig, build_thread_pool};
use crate::constants::{
    LAYOUT_FLAGGED_TRIPLE, MAX_NARROW_STRAND_LENGTH, RELATION_FORMAT_VERSION,
    RELATION_HEADER_LEN, RELATION_MAGIC, STRANDS_PER_THREAD_BATCH,
};
use crate::results::RelationSummary;
use crate::scoring::ScoreTable;
use crate::sequence::StrandSpace;
use crate::types::{OligoError, Strand, check_length};

pub mod reader;

pub use reader::{RelationReader, read_relation_file};

/// Byte width of each strand code in a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWidth {
    /// 4-byte codes, strands of up to 10 bases
    Narrow,
    /// 8-byte codes
    Wide,
}

impl CodeWidth {
    /// Smallest width that holds strands of `length` bases
    #[must_use]
    pub const fn for_length(length: usize) -> Self {
        if length <= MAX_NARROW_STRAND_LENGTH {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    /// Width in bytes
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Narrow => 4,
            Self::Wide => 8,
        }
    }

    /// Size of one flagged-triple record
    #[must_use]
    pub const fn record_len(self) -> usize {
        2 * self.bytes() + 1
    }

    const fn from_bytes(bytes: u8) -> Option<Self> {
        match bytes {
            4 => Some(Self::Narrow),
            8 => Some(Self::Wide),
            _ => None,
        }
    }

    fn put(self, out: &mut Vec<u8>, code: u64) {
        match self {
            Self::Narrow => out.extend_from_slice(&(code as u32).to_ne_bytes()),
            Self::Wide => out.extend_from_slice(&code.to_ne_bytes()),
        }
    }

    fn get(self, bytes: &[u8]) -> u64 {
        match self {
            Self::Narrow => {
                let mut word = [0u8; 4];
                word.copy_from_slice(&bytes[..4]);
                u64::from(u32::from_ne_bytes(word))
            }
            Self::Wide => {
                let mut word = [0u8; 8];
                word.copy_from_slice(&bytes[..8]);
                u64::from_ne_bytes(word)
            }
        }
    }
}

/// Self-describing prefix of a relation file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationHeader {
    /// Bases per strand
    pub strand_length: usize,
    /// Width of each code in a record
    pub code_width: CodeWidth,
}

impl RelationHeader {
    /// Header for strands of `strand_length` bases at the narrowest width.
    ///
    /// # Errors
    ///
    /// Same length limits as strand encoding.
    pub fn new(strand_length: usize) -> Result<Self, OligoError> {
        check_length(strand_length)?;
        Ok(Self {
            strand_length,
            code_width: CodeWidth::for_length(strand_length),
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; RELATION_HEADER_LEN] {
        let mut bytes = [0u8; RELATION_HEADER_LEN];
        bytes[..4].copy_from_slice(&RELATION_MAGIC);
        bytes[4] = RELATION_FORMAT_VERSION;
        bytes[5] = self.strand_length as u8;
        bytes[6] = LAYOUT_FLAGGED_TRIPLE;
        bytes[7] = self.code_width.bytes() as u8;
        bytes
    }

    /// Decode and check a header.
    ///
    /// # Errors
    ///
    /// [`OligoError::InvalidRelationFile`] for a wrong magic, version, layout,
    /// strand length or code width.
    pub fn from_bytes(bytes: &[u8; RELATION_HEADER_LEN]) -> Result<Self, OligoError> {
        if bytes[..4] != RELATION_MAGIC {
            return Err(OligoError::InvalidRelationFile("bad magic".to_string()));
        }
        if bytes[4] != RELATION_FORMAT_VERSION {
            return Err(OligoError::InvalidRelationFile(format!(
                "unsupported version {}",
                bytes[4]
            )));
        }
        if bytes[6] != LAYOUT_FLAGGED_TRIPLE {
            return Err(OligoError::InvalidRelationFile(format!(
                "unknown layout {}",
                bytes[6]
            )));
        }

        let strand_length = usize::from(bytes[5]);
        check_length(strand_length).map_err(|e| OligoError::InvalidRelationFile(e.to_string()))?;

        let code_width = CodeWidth::from_bytes(bytes[7]).ok_or_else(|| {
            OligoError::InvalidRelationFile(format!("unsupported code width {}", bytes[7]))
        })?;
        if code_width == CodeWidth::Narrow && strand_length > MAX_NARROW_STRAND_LENGTH {
            return Err(OligoError::InvalidRelationFile(format!(
                "{strand_length}-base strands do not fit 4-byte codes"
            )));
        }

        Ok(Self {
            strand_length,
            code_width,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), OligoError> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, OligoError> {
        let mut bytes = [0u8; RELATION_HEADER_LEN];
        reader.read_exact(&mut bytes).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                OligoError::InvalidRelationFile("file shorter than header".to_string())
            } else {
                OligoError::Io(e)
            }
        })?;
        Self::from_bytes(&bytes)
    }
}

/// One ordered strand pair and its verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation {
    pub strand1: Strand,
    pub strand2: Strand,
    pub bound: bool,
}

/// Encoded records for every partner of one strand1
struct RelationUnit {
    bytes: Vec<u8>,
    bound: u64,
}

fn scan_unit(
    scanner: &BindingScanner<'_>,
    strand1: u64,
    partners: &[u64],
    length: usize,
    width: CodeWidth,
) -> RelationUnit {
    let mut bytes = Vec::with_capacity(partners.len() * width.record_len());
    let mut bound = 0u64;

    for &strand2 in partners {
        let verdict = scanner.bind_registers(strand1, strand2, length);
        width.put(&mut bytes, strand1);
        width.put(&mut bytes, strand2);
        bytes.push(u8::from(verdict));
        bound += u64::from(verdict);
    }

    RelationUnit { bytes, bound }
}

/// Streams flagged-triple records to any writer.
#[derive(Debug)]
pub struct RelationWriter<W: Write> {
    inner: W,
    header: RelationHeader,
    bytes_written: u64,
}

impl<W: Write> RelationWriter<W> {
    /// Wraps `inner`, writing the header first when `write_header` is set.
    pub fn new(mut inner: W, header: RelationHeader, write_header: bool) -> Result<Self, OligoError> {
        let mut bytes_written = 0;
        if write_header {
            header.write_to(&mut inner)?;
            bytes_written = RELATION_HEADER_LEN as u64;
        }
        Ok(Self {
            inner,
            header,
            bytes_written,
        })
    }

    /// Append one record.
    ///
    /// # Errors
    ///
    /// [`OligoError::LengthMismatch`] if either strand does not have the
    /// header's length, or any I/O error.
    pub fn write_relation(&mut self, relation: &Relation) -> Result<(), OligoError> {
        for strand in [&relation.strand1, &relation.strand2] {
            if strand.length() != self.header.strand_length {
                return Err(OligoError::LengthMismatch {
                    left: self.header.strand_length,
                    right: strand.length(),
                });
            }
        }

        let width = self.header.code_width;
        let mut record = Vec::with_capacity(width.record_len());
        width.put(&mut record, relation.strand1.code());
        width.put(&mut record, relation.strand2.code());
        record.push(u8::from(relation.bound));
        self.inner.write_all(&record)?;
        self.bytes_written += record.len() as u64;
        Ok(())
    }

    fn write_unit(&mut self, unit: &RelationUnit) -> Result<(), OligoError> {
        self.inner.write_all(&unit.bytes)?;
        self.bytes_written += unit.bytes.len() as u64;
        Ok(())
    }

    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and hand back the inner writer.
    pub fn finish(mut self) -> Result<W, OligoError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Scans every ordered pair of the configured strand space and writes the
/// relation file.
///
/// The output file is created before any comparison runs; if it cannot be
/// opened nothing is scanned. Strand1 values are scored in parallel batches
/// and each batch is written in order, so the file is identical for any
/// thread count.
///
/// The scan runs on the current Rayon pool unless
/// [`BindingConfig::num_threads`] asks for a different size, in which case a
/// pool of that size is built for this call.
///
/// # Errors
///
/// - [`OligoError::InvalidConfig`] if the configuration does not validate or
///   the strand space has more pairs than a `u64` counts
/// - [`OligoError::Io`] if the output cannot be created or written
pub fn generate_relations(
    config: &BindingConfig,
    table: &ScoreTable,
) -> Result<RelationSummary, OligoError> {
    config.validate()?;

    match config.num_threads {
        Some(threads) if threads != rayon::current_num_threads() => {
            build_thread_pool(threads)?.install(|| write_relations(config, table))
        }
        _ => write_relations(config, table),
    }
}

fn write_relations(
    config: &BindingConfig,
    table: &ScoreTable,
) -> Result<RelationSummary, OligoError> {
    let started = Instant::now();
    let length = config.strand_length;

    let space = StrandSpace::new(length)?;
    let comparisons = space.pair_count().ok_or_else(|| {
        OligoError::InvalidConfig(format!(
            "{length}-base strand space has too many pairs to enumerate"
        ))
    })?;
    let header = RelationHeader::new(length)?;
    let file = File::create(&config.output_path)?;
    let mut writer = RelationWriter::new(BufWriter::new(file), header, config.write_header)?;

    let scanner = BindingScanner::new(table, config.overlap_skip, config.overlap_threshold);
    let partners: Vec<u64> = space.iter().map(|strand| strand.code()).collect();
    let total = partners.len();
    let threads = rayon::current_num_threads();
    let batch = threads * STRANDS_PER_THREAD_BATCH;
    let progress_step = (total / 20).max(1);

    info!(
        "Scanning {} strands of length {} ({} comparisons, {} threads) into {}",
        total,
        length,
        comparisons,
        threads,
        config.output_path.display()
    );

    let mut bound_pairs = 0u64;
    let mut next_progress = progress_step;
    for (batch_index, chunk) in partners.chunks(batch).enumerate() {
        let units: Vec<RelationUnit> = chunk
            .par_iter()
            .map(|&strand1| scan_unit(&scanner, strand1, &partners, length, header.code_width))
            .collect();

        for unit in &units {
            writer.write_unit(unit)?;
            bound_pairs += unit.bound;
        }

        let done = batch_index * batch + chunk.len();
        if done >= next_progress {
            debug!(
                "Completed {} of {} strands ({:.0}%), {} bound pairs so far",
                done,
                total,
                done as f64 * 100.0 / total as f64,
                bound_pairs
            );
            next_progress = done + progress_step;
        }
    }

    let bytes_written = writer.bytes_written();
    writer.finish()?;

    let summary = RelationSummary {
        strand_length: length,
        strand_count: space.size(),
        comparisons,
        bound_pairs,
        threads,
        bytes_written,
        output_path: config.output_path.clone(),
        elapsed: started.elapsed(),
    };

    info!(
        "Wrote {} relations ({} bound) for length {} in {:.2?}",
        summary.comparisons, summary.bound_pairs, length, summary.elapsed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use super::*;
    use crate::sequence::generate_strands;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, length: usize) -> BindingConfig {
        BindingConfig {
            strand_length: length,
            output_path: dir.path().join("binding.bin"),
            ..Default::default()
        }
    }

    #[test]
    fn test_code_width_for_length() {
        assert_eq!(CodeWidth::for_length(1), CodeWidth::Narrow);
        assert_eq!(CodeWidth::for_length(10), CodeWidth::Narrow);
        assert_eq!(CodeWidth::for_length(11), CodeWidth::Wide);
        assert_eq!(CodeWidth::Narrow.record_len(), 9);
        assert_eq!(CodeWidth::Wide.record_len(), 17);
    }

    #[test]
    fn test_header_bytes() {
        let header = RelationHeader::new(6).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..4], b"OLGB");
        assert_eq!(bytes[4..], [1, 6, 1, 4]);
        assert_eq!(RelationHeader::from_bytes(&bytes).unwrap(), header);

        let wide = RelationHeader::new(12).unwrap();
        assert_eq!(wide.to_bytes()[7], 8);
    }

    #[test]
    fn test_header_rejects_bad_fields() {
        let good = RelationHeader::new(4).unwrap().to_bytes();

        let mut bad_magic = good;
        bad_magic[0] = b'X';
        assert!(RelationHeader::from_bytes(&bad_magic).is_err());

        let mut bad_version = good;
        bad_version[4] = 9;
        assert!(RelationHeader::from_bytes(&bad_version).is_err());

        let mut bad_length = good;
        bad_length[5] = 0;
        assert!(RelationHeader::from_bytes(&bad_length).is_err());

        let mut bad_width = good;
        bad_width[7] = 2;
        assert!(RelationHeader::from_bytes(&bad_width).is_err());

        let mut too_long_for_narrow = good;
        too_long_for_narrow[5] = 15;
        assert!(RelationHeader::from_bytes(&too_long_for_narrow).is_err());
    }

    #[test]
    fn test_generate_relations_length_two() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, 2);
        let summary = generate_relations(&config, &ScoreTable::new()).unwrap();

        assert_eq!(summary.strand_count, 16);
        assert_eq!(summary.comparisons, 256);
        // head-on alone can reach at most 2 at this length
        assert_eq!(summary.bound_pairs, 0);
        assert_eq!(summary.bytes_written, 8 + 256 * 9);
        assert_eq!(
            fs::metadata(&config.output_path).unwrap().len(),
            summary.bytes_written
        );
    }

    #[test]
    fn test_length_two_relations_are_symmetric() {
        let dir = TempDir::new().unwrap();
        let config = BindingConfig {
            overlap_skip: 0,
            ..config_in(&dir, 2)
        };
        let summary = generate_relations(&config, &ScoreTable::new()).unwrap();
        assert!(summary.bound_pairs > 0);

        let relations = read_relation_file(&config.output_path).unwrap();
        assert_eq!(relations.len(), 256);

        let bound: HashSet<(u64, u64)> = relations
            .iter()
            .filter(|r| r.bound)
            .map(|r| (r.strand1.code(), r.strand2.code()))
            .collect();
        for (first, second) in &bound {
            assert!(bound.contains(&(*second, *first)));
        }
    }

    #[test]
    fn test_generate_relations_order_and_verdicts() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, 3);
        let table = ScoreTable::new();
        let summary = generate_relations(&config, &table).unwrap();
        assert_eq!(summary.bound_pairs, 64);

        let strands = generate_strands(3).unwrap();
        let scanner = BindingScanner::with_defaults(&table);
        let relations = read_relation_file(&config.output_path).unwrap();

        let mut records = relations.iter();
        for first in &strands {
            for second in &strands {
                let relation = records.next().unwrap();
                assert_eq!(relation.strand1, *first);
                assert_eq!(relation.strand2, *second);
                assert_eq!(relation.bound, scanner.bind_strand(first, second).unwrap());
            }
        }
        assert!(records.next().is_none());
    }

    #[test]
    fn test_generate_relations_without_header() {
        let dir = TempDir::new().unwrap();
        let config = BindingConfig {
            write_header: false,
            ..config_in(&dir, 2)
        };
        let summary = generate_relations(&config, &ScoreTable::new()).unwrap();
        assert_eq!(summary.bytes_written, 256 * 9);

        let bytes = fs::read(&config.output_path).unwrap();
        assert_eq!(bytes.len(), 256 * 9);
        // first record is AA against AA, unbound
        let aa = u32::from(0b001_001u16).to_ne_bytes();
        assert_eq!(&bytes[..4], &aa);
        assert_eq!(&bytes[4..8], &aa);
        assert_eq!(bytes[8], 0);
    }

    #[test]
    fn test_generate_relations_same_bytes_for_any_thread_count() {
        let dir = TempDir::new().unwrap();
        let table = ScoreTable::new();
        let run = |threads: usize, name: &str| {
            let config = BindingConfig {
                output_path: dir.path().join(name),
                ..config_in(&dir, 4)
            };
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap();
            pool.install(|| generate_relations(&config, &table)).unwrap();
            fs::read(&config.output_path).unwrap()
        };

        assert_eq!(run(1, "single.bin"), run(4, "multi.bin"));
    }

    #[test]
    fn test_generate_relations_honors_thread_count() {
        let dir = TempDir::new().unwrap();
        let table = ScoreTable::new();
        let run = |threads: usize, name: &str| {
            let config = BindingConfig {
                output_path: dir.path().join(name),
                num_threads: Some(threads),
                ..config_in(&dir, 3)
            };
            let summary = generate_relations(&config, &table).unwrap();
            assert_eq!(summary.threads, threads);
            fs::read(&config.output_path).unwrap()
        };

        assert_eq!(run(1, "one.bin"), run(3, "three.bin"));
    }

    #[test]
    fn test_generate_relations_rejects_uncountable_space() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, 16);
        let result = generate_relations(&config, &ScoreTable::new());
        assert!(matches!(result, Err(OligoError::InvalidConfig(_))));
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_generate_relations_unopenable_output() {
        let config = BindingConfig {
            strand_length: 2,
            output_path: "/nonexistent-dir/binding.bin".into(),
            ..Default::default()
        };
        let result = generate_relations(&config, &ScoreTable::new());
        assert!(matches!(result, Err(OligoError::Io(_))));
    }

    #[test]
    fn test_generate_relations_invalid_config() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, 0);
        let result = generate_relations(&config, &ScoreTable::new());
        assert!(matches!(result, Err(OligoError::InvalidConfig(_))));
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_relation_writer_rejects_wrong_length() {
        let header = RelationHeader::new(3).unwrap();
        let mut writer = RelationWriter::new(Vec::new(), header, true).unwrap();
        let relation = Relation {
            strand1: "AT".parse().unwrap(),
            strand2: "AT".parse().unwrap(),
            bound: false,
        };
        assert!(matches!(
            writer.write_relation(&relation),
            Err(OligoError::LengthMismatch { left: 3, right: 2 })
        ));
        assert_eq!(writer.bytes_written(), 8);
    }
}
