use crate::constants::{BASE_MASK, BITS_PER_BASE, REGISTER_BITS};

/// Mask selecting two adjacent base codes
const PAIR_MASK: u64 = 0b111_111;

#[inline]
const fn calculate_base_offset(base_index: usize) -> usize {
    base_index * BITS_PER_BASE
}

/// Read the 3-bit code stored at the given base index
#[inline]
pub const fn read_code(register: u64, base_index: usize) -> u8 {
    ((register >> calculate_base_offset(base_index)) & BASE_MASK) as u8
}

/// Read the 6-bit key formed by the codes at `base_index` and `base_index + 1`.
///
/// The lower base ends up in the low three bits of the key.
#[inline]
pub const fn read_pair_key(register: u64, base_index: usize) -> usize {
    ((register >> calculate_base_offset(base_index)) & PAIR_MASK) as usize
}

/// Store a 3-bit code at the given base index, replacing what was there
#[inline]
pub const fn write_code(register: u64, base_index: usize, code: u8) -> u64 {
    let offset = calculate_base_offset(base_index);
    (register & !(BASE_MASK << offset)) | (((code as u64) & BASE_MASK) << offset)
}

/// Mask covering the low `length` bases of a register
#[inline]
pub const fn length_mask(length: usize) -> u64 {
    let bits = calculate_base_offset(length);
    if bits >= REGISTER_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
