// =============================================================================
// Base codes
// =============================================================================

/// 3-bit code for adenine
pub const CODE_A: u8 = 0b001;

/// 3-bit code for thymine
pub const CODE_T: u8 = 0b011;

/// 3-bit code for guanine
pub const CODE_G: u8 = 0b101;

/// 3-bit code for cytosine
pub const CODE_C: u8 = 0b111;

/// 3-bit code for the wildcard base, which pairs with anything
pub const CODE_X: u8 = 0b110;

/// 3-bit code for the universal base, which never contributes
pub const CODE_U: u8 = 0b000;

// =============================================================================
// Register layout
// =============================================================================

/// Bits used by a single base inside a strand register
pub const BITS_PER_BASE: usize = 3;

/// Mask selecting one base code
pub const BASE_MASK: u64 = 0b111;

/// Width of the strand register in bits
pub const REGISTER_BITS: usize = u64::BITS as usize;

/// Longest strand that fits in one register
pub const MAX_STRAND_LENGTH: usize = REGISTER_BITS / BITS_PER_BASE;

/// Longest strand whose codes fit in a 4-byte relation record
pub const MAX_NARROW_STRAND_LENGTH: usize = u32::BITS as usize / BITS_PER_BASE;

// =============================================================================
// Scoring
// =============================================================================

/// Score for a complementary pair or a wildcard
pub const MATCH: i8 = 1;

/// Score for an ordinary mismatch, including identical bases
pub const NORMAL_MISMATCH: i8 = -1;

/// Score for a purine/purine or pyrimidine/pyrimidine pairing
pub const BAD_MISMATCH: i8 = -2;

/// Score whenever the universal base is involved
pub const NEUTRAL: i8 = 0;

/// Scores for two canonical bases, indexed by `code_a ^ code_b`.
///
/// Index 0 is an identical base (mismatch), 2 is A/T or G/C, 4 is A/G or T/C,
/// 6 is A/C or G/T. Odd indices never occur between canonical codes.
pub const PAIR_TABLE: [i8; 8] = [
    NORMAL_MISMATCH,
    MATCH,
    MATCH,
    MATCH,
    BAD_MISMATCH,
    MATCH,
    NORMAL_MISMATCH,
    MATCH,
];

// =============================================================================
// Binding defaults
// =============================================================================

/// Minimum aggregated counter for a pair to count as bound
pub const DEFAULT_OVERLAP_THRESHOLD: i32 = 3;

/// Overlaps of this many bases or fewer are never scored in the shift families
pub const DEFAULT_OVERLAP_SKIP: usize = 4;

/// Strand length used when none is configured
pub const DEFAULT_STRAND_LENGTH: usize = 6;

/// Default destination of the relation file
pub const DEFAULT_OUTPUT_PATH: &str = "binding.bin";

/// Default number of timed passes for the benchmark harness
pub const DEFAULT_BENCHMARK_REPETITIONS: usize = 100;

// =============================================================================
// Relation file
// =============================================================================

/// Leading bytes of a relation file header
pub const RELATION_MAGIC: [u8; 4] = *b"OLGB";

/// Header format version
pub const RELATION_FORMAT_VERSION: u8 = 1;

/// Layout id for strand1 code, strand2 code, flag byte records
pub const LAYOUT_FLAGGED_TRIPLE: u8 = 1;

/// Size of the relation file header in bytes
pub const RELATION_HEADER_LEN: usize = 8;

/// Strand1 values handed to the worker pool per write batch, per thread
pub const STRANDS_PER_THREAD_BATCH: usize = 4;
