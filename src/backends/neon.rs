// backends/neon.rs - Advanced SIMD backend for AArch64.
//
// Same filters as the AVX2 backend over 16-byte vectors. NEON has no
// movemask, so comparison results are narrowed to one nibble per byte
// and scanned as a u64.

use std::arch::aarch64::*;

use crate::backend::{Backend, Capability, HASH_BLOCK_LEN, HASH_LANES};
use crate::charset::CharacterSet;
use crate::levenshtein;

pub struct NeonBackend {
    _baseline: (),
}

pub(crate) static NEON: NeonBackend = NeonBackend { _baseline: () };

const LANES: usize = 16;

impl Backend for NeonBackend {
    fn name(&self) -> &'static str {
        "neon"
    }

    fn capability(&self) -> Capability {
        Capability::NEON
    }

    fn find(&self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        match needle.len() {
            0 => Some(0),
            1 => memchr::memchr(needle[0], haystack),
            len if len > haystack.len() => None,
            // SAFETY: NEON is part of the AArch64 baseline.
            _ => unsafe { find_neon(haystack, needle) },
        }
    }

    fn rfind(&self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        match needle.len() {
            0 => Some(haystack.len()),
            1 => memchr::memrchr(needle[0], haystack),
            len if len > haystack.len() => None,
            // SAFETY: as above.
            _ => unsafe { rfind_neon(haystack, needle) },
        }
    }

    fn find_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        // SAFETY: as above.
        unsafe { find_byteset_neon(haystack, set) }
    }

    fn rfind_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        // SAFETY: as above.
        unsafe { rfind_byteset_neon(haystack, set) }
    }

    fn edit_distance(&self, a: &[u8], b: &[u8], bound: usize) -> usize {
        // SAFETY: as above.
        unsafe { anti_diagonal_neon(a, b, bound) }
    }

    fn hash_block(
        &self,
        acc: &mut [u64; HASH_LANES],
        block: &[u8; HASH_BLOCK_LEN],
        key: &[u64; HASH_LANES],
    ) {
        // SAFETY: as above.
        unsafe { hash_block_neon(acc, block, key) }
    }
}

/// Four bits per byte lane: nibble `k` is 0xf when byte `k` of `eq` is 0xff.
#[target_feature(enable = "neon")]
#[inline]
unsafe fn nibble_mask(eq: uint8x16_t) -> u64 {
    let narrowed = vshrn_n_u16::<4>(vreinterpretq_u16_u8(eq));
    vget_lane_u64::<0>(vreinterpret_u64_u8(narrowed))
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn candidates_at(ptr: *const u8, i: usize, last: usize, first_v: uint8x16_t, last_v: uint8x16_t) -> u64 {
    let block_first = vld1q_u8(ptr.add(i));
    let block_last = vld1q_u8(ptr.add(i + last));
    nibble_mask(vandq_u8(vceqq_u8(block_first, first_v), vceqq_u8(block_last, last_v)))
}

/// Requires `2 <= needle.len() <= haystack.len()`.
#[target_feature(enable = "neon")]
unsafe fn find_neon(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let last = needle.len() - 1;
    let starts = haystack.len() - last;
    let first_v = vdupq_n_u8(needle[0]);
    let last_v = vdupq_n_u8(needle[last]);
    let ptr = haystack.as_ptr();

    let mut i = 0;
    while i + LANES <= starts {
        let mut mask = candidates_at(ptr, i, last, first_v, last_v);
        while mask != 0 {
            let lane = mask.trailing_zeros() / 4;
            let at = i + lane as usize;
            if haystack[at + 1..at + last] == needle[1..last] {
                return Some(at);
            }
            mask &= !(0xfu64 << (4 * lane));
        }
        i += LANES;
    }
    (i..starts).find(|&at| &haystack[at..at + needle.len()] == needle)
}

/// Requires `2 <= needle.len() <= haystack.len()`.
#[target_feature(enable = "neon")]
unsafe fn rfind_neon(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let last = needle.len() - 1;
    let first_v = vdupq_n_u8(needle[0]);
    let last_v = vdupq_n_u8(needle[last]);
    let ptr = haystack.as_ptr();

    let mut top = haystack.len() - last;
    while top >= LANES {
        let i = top - LANES;
        let mut mask = candidates_at(ptr, i, last, first_v, last_v);
        while mask != 0 {
            let lane = (63 - mask.leading_zeros()) / 4;
            let at = i + lane as usize;
            if haystack[at + 1..at + last] == needle[1..last] {
                return Some(at);
            }
            mask &= !(0xfu64 << (4 * lane));
        }
        top = i;
    }
    (0..top).rev().find(|&at| &haystack[at..at + needle.len()] == needle)
}

struct NibbleTables {
    low: uint8x16_t,
    high: uint8x16_t,
    bits: uint8x16_t,
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn nibble_tables(set: &CharacterSet) -> NibbleTables {
    const BITS: [u8; 16] = [1, 2, 4, 8, 16, 32, 64, 128, 1, 2, 4, 8, 16, 32, 64, 128];
    let (low, high) = set.nibble_tables();
    NibbleTables {
        low: vld1q_u8(low.as_ptr()),
        high: vld1q_u8(high.as_ptr()),
        bits: vld1q_u8(BITS.as_ptr()),
    }
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn members_at(ptr: *const u8, tables: &NibbleTables) -> u64 {
    let x = vld1q_u8(ptr);
    let lo_nibbles = vandq_u8(x, vdupq_n_u8(0x0f));
    let hi_nibbles = vshrq_n_u8::<4>(x);
    let row_lo = vqtbl1q_u8(tables.low, lo_nibbles);
    let row_hi = vqtbl1q_u8(tables.high, lo_nibbles);
    let upper = vcgeq_u8(hi_nibbles, vdupq_n_u8(8));
    let row = vbslq_u8(upper, row_hi, row_lo);
    let bit = vqtbl1q_u8(tables.bits, hi_nibbles);
    nibble_mask(vtstq_u8(row, bit))
}

#[target_feature(enable = "neon")]
unsafe fn find_byteset_neon(haystack: &[u8], set: &CharacterSet) -> Option<usize> {
    let tables = nibble_tables(set);
    let ptr = haystack.as_ptr();
    let mut i = 0;
    while i + LANES <= haystack.len() {
        let mask = members_at(ptr.add(i), &tables);
        if mask != 0 {
            return Some(i + (mask.trailing_zeros() / 4) as usize);
        }
        i += LANES;
    }
    haystack[i..]
        .iter()
        .position(|&b| set.contains(b))
        .map(|p| i + p)
}

#[target_feature(enable = "neon")]
unsafe fn rfind_byteset_neon(haystack: &[u8], set: &CharacterSet) -> Option<usize> {
    let tables = nibble_tables(set);
    let ptr = haystack.as_ptr();
    let mut top = haystack.len();
    while top >= LANES {
        let i = top - LANES;
        let mask = members_at(ptr.add(i), &tables);
        if mask != 0 {
            return Some(i + ((63 - mask.leading_zeros()) / 4) as usize);
        }
        top = i;
    }
    haystack[..top].iter().rposition(|&b| set.contains(b))
}

/// No hand-written lanes: `anti_diagonal` has no loop-carried dependency in
/// its inner loop and is inlined here so the compiler vectorizes it for NEON.
#[target_feature(enable = "neon")]
unsafe fn anti_diagonal_neon(a: &[u8], b: &[u8], bound: usize) -> usize {
    levenshtein::anti_diagonal(a, b, bound)
}

#[target_feature(enable = "neon")]
unsafe fn hash_block_neon(
    acc: &mut [u64; HASH_LANES],
    block: &[u8; HASH_BLOCK_LEN],
    key: &[u64; HASH_LANES],
) {
    for pair in 0..HASH_LANES / 2 {
        let sum = vld1q_u64(acc.as_ptr().add(2 * pair));
        let data = vreinterpretq_u64_u8(vld1q_u8(block.as_ptr().add(16 * pair)));
        let keys = vld1q_u64(key.as_ptr().add(2 * pair));
        let keyed = veorq_u64(data, keys);
        let product = vmull_u32(vmovn_u64(keyed), vshrn_n_u64::<32>(keyed));
        let swapped = vextq_u64::<1>(data, data);
        let sum = vaddq_u64(vaddq_u64(sum, swapped), product);
        vst1q_u64(acc.as_mut_ptr().add(2 * pair), sum);
    }
}
