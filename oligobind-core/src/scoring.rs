//! Pairwise base scoring.
//!
//! Scores follow three rules, checked in order:
//!
//! 1. a pairing involving U scores 0, whatever the other base is;
//! 2. a pairing involving X scores +1;
//! 3. two canonical bases score [`PAIR_TABLE`]`[code_a ^ code_b]`.
//!
//! Identical canonical bases XOR to zero and score -1. They are never a
//! match: a base does not hybridize with itself.
//!
//! All of this is precomputed into a [`ScoreTable`] once. The table is an
//! ordinary immutable value; callers build it and hand out shared references.

use crate::constants::{MATCH, MAX_STRAND_LENGTH, NEUTRAL, PAIR_TABLE};
use crate::register::{read_code, read_pair_key};
use crate::types::{Base, OligoError, PairScore, Strand};

/// Marks table cells for codes outside the alphabet
const INVALID: i8 = i8::MIN;

/// Number of distinct 3-bit codes
const CODES: usize = 8;

/// Number of distinct 6-bit two-base keys
const PAIR_KEYS: usize = CODES * CODES;

/// Scores a pair of bases from the rules alone, without a table
#[must_use]
pub const fn score_bases(first: Base, second: Base) -> i8 {
    if matches!(first, Base::U) || matches!(second, Base::U) {
        return NEUTRAL;
    }
    if matches!(first, Base::X) || matches!(second, Base::X) {
        return MATCH;
    }
    PAIR_TABLE[(first.code() ^ second.code()) as usize]
}

/// Precomputed pair scores over 3-bit codes.
///
/// Besides the 8x8 single-base table, a 64x64 table keyed by two adjacent
/// codes of each strand stores the sum of both pair scores, so register sums
/// take one lookup per two positions.
///
/// # Examples
///
/// ```rust
/// use oligobind_core::scoring::ScoreTable;
/// use oligobind_core::types::Base;
///
/// let table = ScoreTable::new();
/// assert_eq!(table.score(Base::A, Base::T), 1);
/// assert_eq!(table.score(Base::G, Base::G), -1);
/// assert!(table.score_codes(0b010, 0b001).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ScoreTable {
    single: [[i8; CODES]; CODES],
    paired: Box<[i8; PAIR_KEYS * PAIR_KEYS]>,
}

impl ScoreTable {
    /// Builds both lookup tables.
    #[must_use]
    pub fn new() -> Self {
        let mut single = [[INVALID; CODES]; CODES];
        for first in Base::ALL {
            for second in Base::ALL {
                single[first.code() as usize][second.code() as usize] =
                    score_bases(first, second);
            }
        }

        let mut paired = Box::new([INVALID; PAIR_KEYS * PAIR_KEYS]);
        for key_a in 0..PAIR_KEYS {
            for key_b in 0..PAIR_KEYS {
                let low = single[key_a & 0b111][key_b & 0b111];
                let high = single[key_a >> 3][key_b >> 3];
                if low != INVALID && high != INVALID {
                    paired[(key_a << 6) | key_b] = low + high;
                }
            }
        }

        Self { single, paired }
    }

    /// Score of two bases.
    #[must_use]
    pub fn score(&self, first: Base, second: Base) -> i32 {
        i32::from(self.single[first.code() as usize][second.code() as usize])
    }

    /// Score of two raw 3-bit codes.
    ///
    /// # Errors
    ///
    /// [`OligoError::ScoringError`] if either code is outside the alphabet.
    pub fn score_codes(&self, first: u8, second: u8) -> Result<i32, OligoError> {
        let value = self
            .single
            .get(first as usize)
            .and_then(|row| row.get(second as usize))
            .copied()
            .unwrap_or(INVALID);

        if value == INVALID {
            return Err(OligoError::ScoringError { first, second });
        }
        Ok(i32::from(value))
    }

    /// Outcome class of two raw 3-bit codes.
    ///
    /// # Errors
    ///
    /// [`OligoError::ScoringError`] if either code is outside the alphabet.
    pub fn classify_codes(&self, first: u8, second: u8) -> Result<PairScore, OligoError> {
        let value = self.score_codes(first, second)?;
        PairScore::from_value(value as i8).ok_or(OligoError::ScoringError { first, second })
    }

    /// Head-on sum of pair scores for two strands of equal length.
    ///
    /// # Errors
    ///
    /// [`OligoError::LengthMismatch`] if the strands differ in length.
    pub fn score_strands(&self, first: &Strand, second: &Strand) -> Result<i32, OligoError> {
        if first.length() != second.length() {
            return Err(OligoError::LengthMismatch {
                left: first.length(),
                right: second.length(),
            });
        }
        Ok(self.score_registers(first.code(), second.code(), first.length()))
    }

    /// Sums the pair scores of the low `bases` positions of two registers.
    ///
    /// Both registers must hold only alphabet codes in those positions and
    /// `bases` must not exceed the register, which every [`Strand`] and the
    /// scanner's shifted overlaps guarantee.
    #[inline]
    pub(crate) fn score_registers(&self, first: u64, second: u64, bases: usize) -> i32 {
        debug_assert!(bases <= MAX_STRAND_LENGTH);
        let mut total = 0i32;
        let mut index = 0;

        while index + 1 < bases {
            let key = (read_pair_key(first, index) << 6) | read_pair_key(second, index);
            total += i32::from(self.paired[key]);
            index += 2;
        }

        if index < bases {
            let code_a = read_code(first, index) as usize;
            let code_b = read_code(second, index) as usize;
            total += i32::from(self.single[code_a][code_b]);
        }

        total
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new()
    }
}
