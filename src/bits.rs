// bits.rs - Integer bit utilities.
//
// Used by OwnedBuffer to size its capacity in powers of two.

use crate::error::{Error, Result};

/// Number of leading zero bits in `x`, counted from the most significant bit.
///
/// Returns 64 for `x == 0`.
#[inline]
pub fn count_leading_zeros(x: u64) -> u32 {
    x.leading_zeros()
}

/// `floor(log2(n))` for a non-zero `n`.
///
/// # Panics
///
/// Panics if `n == 0`. Use [`checked_log2_floor`] when the input is unchecked.
#[inline]
pub fn log2_floor_nonzero(n: u64) -> u32 {
    assert!(n != 0, "log2 of zero is undefined");
    63 - count_leading_zeros(n)
}

/// `floor(log2(n))`, or `None` when `n == 0`.
#[inline]
pub fn checked_log2_floor(n: u64) -> Option<u32> {
    if n == 0 {
        None
    } else {
        Some(63 - count_leading_zeros(n))
    }
}

/// `floor(log2(n))`, failing with [`Error::ZeroLog2`] when `n == 0`.
pub fn try_log2_floor(n: u64) -> Result<u32> {
    checked_log2_floor(n).ok_or(Error::ZeroLog2)
}

/// Smallest power of two that is `>= n`.
///
/// `next_power_of_two(0) == 0`, powers of two map to themselves, and any
/// value above `1 << 63` saturates to `1 << 63`.
#[inline]
pub fn next_power_of_two(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    let shift = 64 - count_leading_zeros(n - 1);
    if shift >= 64 {
        1 << 63
    } else {
        1 << shift
    }
}

/// [`next_power_of_two`] over `usize`, the width used for buffer capacities.
#[inline]
pub(crate) fn bit_ceil(n: usize) -> usize {
    next_power_of_two(n as u64).min(usize::MAX as u64 / 2 + 1) as usize
}
