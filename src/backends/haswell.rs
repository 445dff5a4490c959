// backends/haswell.rs - AVX2 backend for x86-64.
//
// Substring search filters candidate positions 32 at a time by comparing
// the first and last needle bytes, then verifies the middle. Byte-set
// search splits every byte into nibbles and resolves membership with two
// in-lane shuffles. All loads are unaligned, and every remainder shorter
// than one vector is finished with scalar code, so results never depend on
// the haystack's start address.

use std::arch::x86_64::*;

use crate::backend::{Backend, Capability, HASH_BLOCK_LEN, HASH_LANES};
use crate::charset::CharacterSet;
use crate::levenshtein;

/// Only reachable through `crate::backend` after `is_supported()` held.
pub struct HaswellBackend {
    _detected: (),
}

pub(crate) static HASWELL: HaswellBackend = HaswellBackend { _detected: () };

pub(crate) fn is_supported() -> bool {
    is_x86_feature_detected!("avx2")
}

const LANES: usize = 32;

impl Backend for HaswellBackend {
    fn name(&self) -> &'static str {
        "haswell"
    }

    fn capability(&self) -> Capability {
        Capability::HASWELL
    }

    fn find(&self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        match needle.len() {
            0 => Some(0),
            1 => memchr::memchr(needle[0], haystack),
            len if len > haystack.len() => None,
            // SAFETY: this backend is only handed out when AVX2 is present.
            _ => unsafe { find_avx2(haystack, needle) },
        }
    }

    fn rfind(&self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        match needle.len() {
            0 => Some(haystack.len()),
            1 => memchr::memrchr(needle[0], haystack),
            len if len > haystack.len() => None,
            // SAFETY: as above.
            _ => unsafe { rfind_avx2(haystack, needle) },
        }
    }

    fn find_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        if let Some(found) = find_few(haystack, set) {
            return found;
        }
        // SAFETY: as above.
        unsafe { find_byteset_avx2(haystack, set) }
    }

    fn rfind_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        if let Some(found) = rfind_few(haystack, set) {
            return found;
        }
        // SAFETY: as above.
        unsafe { rfind_byteset_avx2(haystack, set) }
    }

    fn edit_distance(&self, a: &[u8], b: &[u8], bound: usize) -> usize {
        // SAFETY: as above.
        unsafe { anti_diagonal_avx2(a, b, bound) }
    }

    fn hash_block(
        &self,
        acc: &mut [u64; HASH_LANES],
        block: &[u8; HASH_BLOCK_LEN],
        key: &[u64; HASH_LANES],
    ) {
        // SAFETY: as above.
        unsafe { hash_block_avx2(acc, block, key) }
    }
}

/// Sets of at most three bytes go to `memchr`. `None` means "not handled".
fn find_few(haystack: &[u8], set: &CharacterSet) -> Option<Option<usize>> {
    let mut members = set.iter();
    match set.len() {
        0 => Some(None),
        1 => Some(memchr::memchr(members.next()?, haystack)),
        2 => Some(memchr::memchr2(members.next()?, members.next()?, haystack)),
        3 => Some(memchr::memchr3(members.next()?, members.next()?, members.next()?, haystack)),
        _ => None,
    }
}

fn rfind_few(haystack: &[u8], set: &CharacterSet) -> Option<Option<usize>> {
    let mut members = set.iter();
    match set.len() {
        0 => Some(None),
        1 => Some(memchr::memrchr(members.next()?, haystack)),
        2 => Some(memchr::memrchr2(members.next()?, members.next()?, haystack)),
        3 => Some(memchr::memrchr3(members.next()?, members.next()?, members.next()?, haystack)),
        _ => None,
    }
}

/// Bitmask of positions `i..i + 32` where both the first and the last needle
/// byte line up. Requires `i + last + 32 <= haystack.len()`.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn candidates_at(ptr: *const u8, i: usize, last: usize, first_v: __m256i, last_v: __m256i) -> u32 {
    let block_first = _mm256_loadu_si256(ptr.add(i) as *const __m256i);
    let block_last = _mm256_loadu_si256(ptr.add(i + last) as *const __m256i);
    let eq = _mm256_and_si256(
        _mm256_cmpeq_epi8(block_first, first_v),
        _mm256_cmpeq_epi8(block_last, last_v),
    );
    _mm256_movemask_epi8(eq) as u32
}

/// Requires `2 <= needle.len() <= haystack.len()`.
#[target_feature(enable = "avx2")]
unsafe fn find_avx2(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let last = needle.len() - 1;
    let starts = haystack.len() - last;
    let first_v = _mm256_set1_epi8(needle[0] as i8);
    let last_v = _mm256_set1_epi8(needle[last] as i8);
    let ptr = haystack.as_ptr();

    let mut i = 0;
    while i + LANES <= starts {
        let mut mask = candidates_at(ptr, i, last, first_v, last_v);
        while mask != 0 {
            let at = i + mask.trailing_zeros() as usize;
            if haystack[at + 1..at + last] == needle[1..last] {
                return Some(at);
            }
            mask &= mask - 1;
        }
        i += LANES;
    }
    (i..starts).find(|&at| &haystack[at..at + needle.len()] == needle)
}

/// Requires `2 <= needle.len() <= haystack.len()`.
#[target_feature(enable = "avx2")]
unsafe fn rfind_avx2(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let last = needle.len() - 1;
    let first_v = _mm256_set1_epi8(needle[0] as i8);
    let last_v = _mm256_set1_epi8(needle[last] as i8);
    let ptr = haystack.as_ptr();

    let mut top = haystack.len() - last;
    while top >= LANES {
        let i = top - LANES;
        let mut mask = candidates_at(ptr, i, last, first_v, last_v);
        while mask != 0 {
            let bit = 31 - mask.leading_zeros();
            let at = i + bit as usize;
            if haystack[at + 1..at + last] == needle[1..last] {
                return Some(at);
            }
            mask &= !(1u32 << bit);
        }
        top = i;
    }
    (0..top).rev().find(|&at| &haystack[at..at + needle.len()] == needle)
}

struct NibbleTables {
    low: __m256i,
    high: __m256i,
    bits: __m256i,
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn nibble_tables(set: &CharacterSet) -> NibbleTables {
    const BITS: [u8; 16] = [1, 2, 4, 8, 16, 32, 64, 128, 1, 2, 4, 8, 16, 32, 64, 128];
    let (low, high) = set.nibble_tables();
    NibbleTables {
        low: _mm256_broadcastsi128_si256(_mm_loadu_si128(low.as_ptr() as *const __m128i)),
        high: _mm256_broadcastsi128_si256(_mm_loadu_si128(high.as_ptr() as *const __m128i)),
        bits: _mm256_broadcastsi128_si256(_mm_loadu_si128(BITS.as_ptr() as *const __m128i)),
    }
}

/// Bitmask of the member bytes among the 32 bytes at `ptr`.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn members_at(ptr: *const u8, tables: &NibbleTables) -> u32 {
    let x = _mm256_loadu_si256(ptr as *const __m256i);
    let nibble = _mm256_set1_epi8(0x0f);
    let lo_nibbles = _mm256_and_si256(x, nibble);
    let hi_nibbles = _mm256_and_si256(_mm256_srli_epi16::<4>(x), nibble);
    let row_lo = _mm256_shuffle_epi8(tables.low, lo_nibbles);
    let row_hi = _mm256_shuffle_epi8(tables.high, lo_nibbles);
    // The top bit of `x` is set exactly when its high nibble is >= 8.
    let row = _mm256_blendv_epi8(row_lo, row_hi, x);
    let bit = _mm256_shuffle_epi8(tables.bits, hi_nibbles);
    let hit = _mm256_cmpeq_epi8(_mm256_and_si256(row, bit), bit);
    _mm256_movemask_epi8(hit) as u32
}

#[target_feature(enable = "avx2")]
unsafe fn find_byteset_avx2(haystack: &[u8], set: &CharacterSet) -> Option<usize> {
    let tables = nibble_tables(set);
    let ptr = haystack.as_ptr();
    let mut i = 0;
    while i + LANES <= haystack.len() {
        let mask = members_at(ptr.add(i), &tables);
        if mask != 0 {
            return Some(i + mask.trailing_zeros() as usize);
        }
        i += LANES;
    }
    haystack[i..]
        .iter()
        .position(|&b| set.contains(b))
        .map(|p| i + p)
}

#[target_feature(enable = "avx2")]
unsafe fn rfind_byteset_avx2(haystack: &[u8], set: &CharacterSet) -> Option<usize> {
    let tables = nibble_tables(set);
    let ptr = haystack.as_ptr();
    let mut top = haystack.len();
    while top >= LANES {
        let i = top - LANES;
        let mask = members_at(ptr.add(i), &tables);
        if mask != 0 {
            return Some(i + 31 - mask.leading_zeros() as usize);
        }
        top = i;
    }
    haystack[..top].iter().rposition(|&b| set.contains(b))
}

/// No hand-written lanes: `anti_diagonal` has no loop-carried dependency in
/// its inner loop and is inlined here so the compiler vectorizes it for AVX2.
#[target_feature(enable = "avx2")]
unsafe fn anti_diagonal_avx2(a: &[u8], b: &[u8], bound: usize) -> usize {
    levenshtein::anti_diagonal(a, b, bound)
}

#[target_feature(enable = "avx2")]
unsafe fn hash_block_avx2(
    acc: &mut [u64; HASH_LANES],
    block: &[u8; HASH_BLOCK_LEN],
    key: &[u64; HASH_LANES],
) {
    for half in 0..2 {
        let acc_ptr = acc.as_mut_ptr().add(4 * half) as *mut __m256i;
        let sum = _mm256_loadu_si256(acc_ptr);
        let data = _mm256_loadu_si256(block.as_ptr().add(32 * half) as *const __m256i);
        let keys = _mm256_loadu_si256(key.as_ptr().add(4 * half) as *const __m256i);
        let keyed = _mm256_xor_si256(data, keys);
        // High dword of each lane moved down, so `mul_epu32` sees lo * hi.
        let keyed_hi = _mm256_shuffle_epi32::<0x31>(keyed);
        let product = _mm256_mul_epu32(keyed, keyed_hi);
        // Adjacent lanes swapped: lane i receives the data word of lane i ^ 1.
        let swapped = _mm256_shuffle_epi32::<0x4e>(data);
        let sum = _mm256_add_epi64(_mm256_add_epi64(sum, swapped), product);
        _mm256_storeu_si256(acc_ptr, sum);
    }
}
