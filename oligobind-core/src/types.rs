use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    BAD_MISMATCH, CODE_A, CODE_C, CODE_G, CODE_T, CODE_U, CODE_X, MATCH, MAX_STRAND_LENGTH,
    NEUTRAL, NORMAL_MISMATCH,
};
use crate::register::{length_mask, read_code};

/// The six symbols a strand position can hold.
///
/// A, T, G and C are the canonical nucleotides. X is a wildcard that pairs
/// with every base, U is a universal placeholder that never contributes to a
/// binding score. Discriminants are the 3-bit register codes.
///
/// # Examples
///
/// ```rust
/// use oligobind_core::types::Base;
///
/// assert_eq!(Base::A.code(), 0b001);
/// assert_eq!(Base::from_code(0b111), Some(Base::C));
/// assert_eq!(Base::G.complement(), Base::C);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Base {
    /// Universal base, 000
    U = CODE_U,
    /// Adenine, 001
    A = CODE_A,
    /// Thymine, 011
    T = CODE_T,
    /// Guanine, 101
    G = CODE_G,
    /// Wildcard, 110
    X = CODE_X,
    /// Cytosine, 111
    C = CODE_C,
}

impl Base {
    /// Canonical bases in strand space digit order
    pub const CANONICAL: [Self; 4] = [Self::A, Self::T, Self::G, Self::C];

    /// Every symbol of the alphabet
    pub const ALL: [Self; 6] = [Self::A, Self::T, Self::G, Self::C, Self::X, Self::U];

    /// 3-bit register code of this base
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Base for a 3-bit code, `None` for the two codes outside the alphabet
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            CODE_A => Some(Self::A),
            CODE_T => Some(Self::T),
            CODE_G => Some(Self::G),
            CODE_C => Some(Self::C),
            CODE_X => Some(Self::X),
            CODE_U => Some(Self::U),
            _ => None,
        }
    }

    /// Base for an ASCII symbol (case-insensitive)
    #[must_use]
    pub const fn from_ascii(symbol: u8) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'T' => Some(Self::T),
            b'G' => Some(Self::G),
            b'C' => Some(Self::C),
            b'X' => Some(Self::X),
            b'U' => Some(Self::U),
            _ => None,
        }
    }

    /// Upper-case symbol for this base
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::A => 'A',
            Self::T => 'T',
            Self::G => 'G',
            Self::C => 'C',
            Self::X => 'X',
            Self::U => 'U',
        }
    }

    /// Watson-Crick partner; X and U map to themselves
    #[must_use]
    pub const fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::T => Self::A,
            Self::G => Self::C,
            Self::C => Self::G,
            Self::X => Self::X,
            Self::U => Self::U,
        }
    }

    /// True for A, T, G and C
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        matches!(self, Self::A | Self::T | Self::G | Self::C)
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Outcome class of scoring one base pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairScore {
    /// Complementary pair, or any pairing with the wildcard
    Match,
    /// Ordinary mismatch; identical canonical bases land here too
    NormalMismatch,
    /// Purine/purine or pyrimidine/pyrimidine pairing
    BadMismatch,
    /// Pairing with the universal base
    Neutral,
}

impl PairScore {
    /// Signed contribution of this outcome to a register subtotal
    #[must_use]
    pub const fn value(self) -> i8 {
        match self {
            Self::Match => MATCH,
            Self::NormalMismatch => NORMAL_MISMATCH,
            Self::BadMismatch => BAD_MISMATCH,
            Self::Neutral => NEUTRAL,
        }
    }

    /// Class of a raw score value, if it is one of the four defined values
    #[must_use]
    pub const fn from_value(value: i8) -> Option<Self> {
        match value {
            MATCH => Some(Self::Match),
            NORMAL_MISMATCH => Some(Self::NormalMismatch),
            BAD_MISMATCH => Some(Self::BadMismatch),
            NEUTRAL => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// A fixed-length oligo packed three bits per base into a `u64`.
///
/// Base 0 sits in the least-significant three bits. Bits above `3 * length`
/// are always zero and every group is a valid [`Base`] code, so scoring code
/// can read a strand's register without re-validating it.
///
/// # Examples
///
/// ```rust
/// use oligobind_core::types::{Base, Strand};
///
/// let strand: Strand = "AGCTTC".parse()?;
/// assert_eq!(strand.length(), 6);
/// assert_eq!(strand.base(1), Some(Base::G));
/// assert_eq!(strand.to_string(), "AGCTTC");
/// # Ok::<(), oligobind_core::types::OligoError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Strand {
    code: u64,
    length: u8,
}

impl Strand {
    /// Build a strand from a register already known to be well formed.
    #[inline]
    pub(crate) const fn from_parts(code: u64, length: usize) -> Self {
        Self {
            code,
            length: length as u8,
        }
    }

    /// Validate a raw register read from outside the crate.
    ///
    /// # Errors
    ///
    /// - [`OligoError::EmptyStrand`] for a zero length
    /// - [`OligoError::EncodingOverflow`] if `length` does not fit the register
    /// - [`OligoError::InvalidCode`] if any group is outside the alphabet or
    ///   bits above the strand are set
    pub fn from_code(code: u64, length: usize) -> Result<Self, OligoError> {
        check_length(length)?;

        for position in 0..length {
            let group = read_code(code, position);
            if Base::from_code(group).is_none() {
                return Err(OligoError::InvalidCode {
                    code: group,
                    position,
                });
            }
        }

        if code & !length_mask(length) != 0 {
            return Err(OligoError::InvalidCode {
                code: read_code(code, length),
                position: length,
            });
        }

        Ok(Self::from_parts(code, length))
    }

    /// Packed register value
    #[must_use]
    pub const fn code(&self) -> u64 {
        self.code
    }

    /// Number of bases
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length as usize
    }

    /// Base at `index`, or `None` past the end
    #[must_use]
    pub const fn base(&self, index: usize) -> Option<Base> {
        if index >= self.length() {
            return None;
        }
        Base::from_code(read_code(self.code, index))
    }

    /// Bases from position 0 upwards
    pub fn bases(&self) -> impl Iterator<Item = Base> + '_ {
        (0..self.length()).filter_map(|index| self.base(index))
    }

    /// True when the strand holds only A, T, G and C
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.bases().all(Base::is_canonical)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.bases() {
            write!(f, "{base}")?;
        }
        Ok(())
    }
}

impl FromStr for Strand {
    type Err = OligoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::sequence::parse_strand(s.as_bytes())
    }
}

/// A strand with the identifier it was loaded under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedStrand {
    /// Record identifier, e.g. the first word of a FASTA header
    pub name: String,
    /// The encoded oligo
    pub strand: Strand,
}

/// Reject lengths the register cannot represent.
pub(crate) fn check_length(length: usize) -> Result<(), OligoError> {
    if length == 0 {
        return Err(OligoError::EmptyStrand);
    }
    if length > MAX_STRAND_LENGTH {
        return Err(OligoError::EncodingOverflow {
            length,
            max: MAX_STRAND_LENGTH,
        });
    }
    Ok(())
}

/// Errors that can occur while encoding, scoring or persisting strands
#[derive(Debug, Error)]
pub enum OligoError {
    /// Packed width of the strand exceeds the register
    #[error("Strand length {length} exceeds the register limit of {max} bases")]
    EncodingOverflow { length: usize, max: usize },
    /// A strand must hold at least one base
    #[error("Strand length must be at least 1")]
    EmptyStrand,
    /// A code outside the alphabet reached the scoring table
    #[error("Cannot score base codes {first:#05b} and {second:#05b}")]
    ScoringError { first: u8, second: u8 },
    /// A raw register holds a group outside the alphabet
    #[error("Invalid base code {code:#05b} at position {position}")]
    InvalidCode { code: u8, position: usize },
    /// A text symbol outside ATGCXU
    #[error("Invalid base symbol: {0:?}")]
    InvalidBase(char),
    /// Position past the end of a strand
    #[error("Base index {index} out of range for strand of length {length}")]
    IndexOutOfRange { index: usize, length: usize },
    /// Strands compared by the scanner differ in length
    #[error("Strand lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Relation file header or record is malformed
    #[error("Invalid relation file: {0}")]
    InvalidRelationFile(String),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    Parse(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_codes_round_trip() {
        for base in Base::ALL {
            assert_eq!(Base::from_code(base.code()), Some(base));
        }
        assert_eq!(Base::from_code(0b010), None);
        assert_eq!(Base::from_code(0b100), None);
        assert_eq!(Base::from_code(0b1000), None);
    }

    #[test]
    fn test_canonical_codes_are_odd() {
        for base in Base::CANONICAL {
            assert_eq!(base.code() & 1, 1, "{base} should have an odd code");
        }
        assert_eq!(Base::X.code() & 1, 0);
        assert_eq!(Base::U.code() & 1, 0);
    }

    #[test]
    fn test_base_from_ascii() {
        assert_eq!(Base::from_ascii(b'A'), Some(Base::A));
        assert_eq!(Base::from_ascii(b'a'), Some(Base::A));
        assert_eq!(Base::from_ascii(b'x'), Some(Base::X));
        assert_eq!(Base::from_ascii(b'u'), Some(Base::U));
        assert_eq!(Base::from_ascii(b'N'), None);
        assert_eq!(Base::from_ascii(b'-'), None);
    }

    #[test]
    fn test_base_complement_is_involution() {
        for base in Base::ALL {
            assert_eq!(base.complement().complement(), base);
        }
        assert_eq!(Base::A.complement(), Base::T);
        assert_eq!(Base::C.complement(), Base::G);
        assert_eq!(Base::X.complement(), Base::X);
        assert_eq!(Base::U.complement(), Base::U);
    }

    #[test]
    fn test_pair_score_values() {
        assert_eq!(PairScore::Match.value(), 1);
        assert_eq!(PairScore::NormalMismatch.value(), -1);
        assert_eq!(PairScore::BadMismatch.value(), -2);
        assert_eq!(PairScore::Neutral.value(), 0);
        assert_eq!(PairScore::from_value(-2), Some(PairScore::BadMismatch));
        assert_eq!(PairScore::from_value(5), None);
    }

    #[test]
    fn test_strand_from_code_valid() {
        let strand = Strand::from_code(0b011_001, 2).unwrap();
        assert_eq!(strand.length(), 2);
        assert_eq!(strand.base(0), Some(Base::A));
        assert_eq!(strand.base(1), Some(Base::T));
        assert_eq!(strand.base(2), None);
        assert_eq!(strand.to_string(), "AT");
    }

    #[test]
    fn test_strand_from_code_rejects_bad_group() {
        let result = Strand::from_code(0b010_001, 2);
        assert!(matches!(
            result,
            Err(OligoError::InvalidCode {
                code: 0b010,
                position: 1
            })
        ));
    }

    #[test]
    fn test_strand_from_code_rejects_high_bits() {
        let result = Strand::from_code(0b001_011_001, 2);
        assert!(matches!(
            result,
            Err(OligoError::InvalidCode { position: 2, .. })
        ));
    }

    #[test]
    fn test_strand_from_code_length_limits() {
        assert!(matches!(
            Strand::from_code(0, 0),
            Err(OligoError::EmptyStrand)
        ));
        assert!(matches!(
            Strand::from_code(0, 22),
            Err(OligoError::EncodingOverflow { length: 22, max: 21 })
        ));
        // All-U strand of the maximum length is valid
        assert!(Strand::from_code(0, 21).is_ok());
    }

    #[test]
    fn test_strand_is_canonical() {
        let canonical: Strand = "ATGC".parse().unwrap();
        let wildcard: Strand = "ATXC".parse().unwrap();
        assert!(canonical.is_canonical());
        assert!(!wildcard.is_canonical());
    }

    #[test]
    fn test_error_display() {
        let err = OligoError::EncodingOverflow { length: 30, max: 21 };
        assert_eq!(
            err.to_string(),
            "Strand length 30 exceeds the register limit of 21 bases"
        );
        let err = OligoError::ScoringError {
            first: 0b010,
            second: 0b001,
        };
        assert_eq!(err.to_string(), "Cannot score base codes 0b010 and 0b001");
    }
}
