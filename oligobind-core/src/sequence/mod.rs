//! Strand encoding and manipulation utilities.
//!
//! Oligos are packed into a single `u64` register using a 3-bit code per base:
//!
//! | Base | Code  | Role |
//! |------|-------|------|
//! | U    | `000` | universal, never contributes |
//! | A    | `001` | canonical |
//! | T    | `011` | canonical |
//! | G    | `101` | canonical |
//! | X    | `110` | wildcard, always pairs |
//! | C    | `111` | canonical |
//!
//! Base 0 occupies the least-significant bits, so a register holds at most
//! [`MAX_STRAND_LENGTH`] bases. The canonical codes are all odd, and XOR-ing
//! two of them yields the scoring class of the pair (see [`crate::scoring`]).
//!
//! ## Modules
//!
//! - [`space`]: exhaustive strand space generation
//! - [`io`]: loading named oligo panels from FASTA
//!
//! ## Examples
//!
//! ```rust
//! use oligobind_core::sequence::{complement, decode, encode};
//! use oligobind_core::types::Base;
//!
//! let strand = encode(&[Base::A, Base::G, Base::C])?;
//! assert_eq!(decode(&strand, 1)?, Base::G);
//!
//! // Complement reverses orientation: GCT reads head-on against AGC.
//! assert_eq!(complement(&strand).to_string(), "GCT");
//! # Ok::<(), oligobind_core::types::OligoError>(())
//! ```

use crate::constants::MAX_STRAND_LENGTH;
use crate::register::{read_code, write_code};
use crate::types::{Base, OligoError, Strand, check_length};

pub mod io;
pub mod space;

pub use io::*;
pub use space::*;

/// Packs bases into a strand register, base `i` at bit offset `3 * i`.
///
/// # Errors
///
/// - [`OligoError::EncodingOverflow`] when more than [`MAX_STRAND_LENGTH`]
///   bases are given
/// - [`OligoError::EmptyStrand`] for an empty slice
pub fn encode(bases: &[Base]) -> Result<Strand, OligoError> {
    check_length(bases.len())?;

    let code = bases
        .iter()
        .enumerate()
        .fold(0u64, |register, (index, base)| {
            write_code(register, index, base.code())
        });

    Ok(Strand::from_parts(code, bases.len()))
}

/// Extracts the base stored at `index`.
///
/// # Errors
///
/// Returns [`OligoError::IndexOutOfRange`] if `index` is past the end of the strand.
pub fn decode(strand: &Strand, index: usize) -> Result<Base, OligoError> {
    strand.base(index).ok_or(OligoError::IndexOutOfRange {
        index,
        length: strand.length(),
    })
}

/// Returns the strand that would bind `strand` head-on.
///
/// Each base is replaced by its partner (A/T, G/C, X and U unchanged) and
/// moved from position `i` to `length - 1 - i`, modelling antiparallel
/// orientation.
#[must_use]
pub fn complement(strand: &Strand) -> Strand {
    let length = strand.length();
    let mut register = 0u64;

    for index in 0..length {
        let partner = match Base::from_code(read_code(strand.code(), index)) {
            Some(base) => base.complement().code(),
            None => continue,
        };
        register = write_code(register, length - 1 - index, partner);
    }

    Strand::from_parts(register, length)
}

/// Parses an ASCII oligo such as `b"AGCTTC"` (case-insensitive).
///
/// # Errors
///
/// - [`OligoError::InvalidBase`] for a symbol outside `ATGCXU`
/// - [`OligoError::EncodingOverflow`] / [`OligoError::EmptyStrand`] for a
///   length the register cannot hold
pub fn parse_strand(symbols: &[u8]) -> Result<Strand, OligoError> {
    let bases = symbols
        .iter()
        .map(|&symbol| Base::from_ascii(symbol).ok_or(OligoError::InvalidBase(symbol as char)))
        .collect::<Result<Vec<_>, _>>()?;
    encode(&bases)
}
