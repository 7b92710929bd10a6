//! The space of every canonical strand of a given length.
//!
//! [`generate_strands`] materializes the whole space by extending shorter
//! strands one base at a time. [`StrandSpace`] describes the same space
//! lazily: index `k` in `[0, 4^L)` is read as a base-4 numeral whose least
//! significant digit is the base at position `L - 1`, with digits mapping to
//! [`Base::CANONICAL`]. Both produce strands in the same order.

use std::iter::FusedIterator;

use crate::register::write_code;
use crate::types::{Base, OligoError, Strand, check_length};

/// Generates all `4^length` strands over A, T, G and C.
///
/// Length one yields the four single-base strands; every longer space is the
/// previous space with each canonical base written into the next register
/// position. No duplicates can arise and no X or U is ever produced.
///
/// # Errors
///
/// [`OligoError::EncodingOverflow`] above the register limit,
/// [`OligoError::EmptyStrand`] for zero.
///
/// # Examples
///
/// ```rust
/// use oligobind_core::sequence::generate_strands;
///
/// let strands = generate_strands(3)?;
/// assert_eq!(strands.len(), 64);
/// # Ok::<(), oligobind_core::types::OligoError>(())
/// ```
pub fn generate_strands(length: usize) -> Result<Vec<Strand>, OligoError> {
    check_length(length)?;

    if length == 1 {
        return Ok(Base::CANONICAL
            .iter()
            .map(|base| Strand::from_parts(u64::from(base.code()), 1))
            .collect());
    }

    let shorter = generate_strands(length - 1)?;
    let position = length - 1;
    let mut strands = Vec::with_capacity(shorter.len() * Base::CANONICAL.len());

    for strand in &shorter {
        for base in Base::CANONICAL {
            let code = write_code(strand.code(), position, base.code());
            strands.push(Strand::from_parts(code, length));
        }
    }

    Ok(strands)
}

/// Lazily indexed view of every canonical strand of one length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrandSpace {
    length: usize,
    size: u64,
}

impl StrandSpace {
    /// Space of all canonical strands with `length` bases.
    ///
    /// # Errors
    ///
    /// Same length limits as [`generate_strands`].
    pub fn new(length: usize) -> Result<Self, OligoError> {
        check_length(length)?;
        Ok(Self {
            length,
            size: 4u64.pow(length as u32),
        })
    }

    /// Bases per strand
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Number of strands, `4^length`
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Ordered pairs in the space, `size()^2`, or `None` past `u64`
    #[must_use]
    pub const fn pair_count(&self) -> Option<u64> {
        self.size.checked_mul(self.size)
    }

    /// Strand at `index`, or `None` when `index >= size()`
    #[must_use]
    pub fn get(&self, index: u64) -> Option<Strand> {
        if index >= self.size {
            return None;
        }

        let mut remaining = index;
        let mut register = 0u64;
        for position in (0..self.length).rev() {
            let digit = (remaining % 4) as usize;
            remaining /= 4;
            register = write_code(register, position, Base::CANONICAL[digit].code());
        }

        Some(Strand::from_parts(register, self.length))
    }

    /// Iterate the whole space in index order
    #[must_use]
    pub const fn iter(&self) -> StrandSpaceIter {
        StrandSpaceIter {
            space: *self,
            front: 0,
            back: self.size,
        }
    }
}

impl IntoIterator for &StrandSpace {
    type Item = Strand;
    type IntoIter = StrandSpaceIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`StrandSpace`]; restartable by calling [`StrandSpace::iter`] again.
#[derive(Debug, Clone)]
pub struct StrandSpaceIter {
    space: StrandSpace,
    front: u64,
    back: u64,
}

impl Iterator for StrandSpaceIter {
    type Item = Strand;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let strand = self.space.get(self.front);
        self.front += 1;
        strand
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.back - self.front) as usize;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for StrandSpaceIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.space.get(self.back)
    }
}

impl ExactSizeIterator for StrandSpaceIter {}

impl FusedIterator for StrandSpaceIter {}
