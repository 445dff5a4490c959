// backends/serial.rs - Portable scalar backend.
//
// The reference every vector backend is tested against. Safe code only.

use crate::backend::{Backend, Capability, HASH_BLOCK_LEN, HASH_LANES};
use crate::charset::CharacterSet;
use crate::levenshtein;

pub struct SerialBackend;

pub static SERIAL: SerialBackend = SerialBackend;

impl Backend for SerialBackend {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn capability(&self) -> Capability {
        Capability::SERIAL
    }

    fn find(&self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        find(haystack, needle)
    }

    fn rfind(&self, haystack: &[u8], needle: &[u8]) -> Option<usize> {
        rfind(haystack, needle)
    }

    fn find_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        haystack.iter().position(|&b| set.contains(b))
    }

    fn rfind_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        haystack.iter().rposition(|&b| set.contains(b))
    }

    fn find_not_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        haystack.iter().position(|&b| !set.contains(b))
    }

    fn rfind_not_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        haystack.iter().rposition(|&b| !set.contains(b))
    }

    fn edit_distance(&self, a: &[u8], b: &[u8], bound: usize) -> usize {
        levenshtein::wagner_fischer(a, b, bound)
    }

    fn hash_block(
        &self,
        acc: &mut [u64; HASH_LANES],
        block: &[u8; HASH_BLOCK_LEN],
        key: &[u64; HASH_LANES],
    ) {
        hash_block(acc, block, key)
    }
}

/// Naive leftmost substring search.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Naive rightmost substring search.
pub(crate) fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Scalar block accumulation.
///
/// For each lane `i`, with `d` the little-endian word at `block[8 * i..]`
/// and `k = d ^ key[i]`: `acc[i ^ 1] += d` and
/// `acc[i] += (k & 0xffff_ffff) * (k >> 32)`, all wrapping.
pub(crate) fn hash_block(
    acc: &mut [u64; HASH_LANES],
    block: &[u8; HASH_BLOCK_LEN],
    key: &[u64; HASH_LANES],
) {
    for i in 0..HASH_LANES {
        let mut word = [0u8; 8];
        word.copy_from_slice(&block[8 * i..8 * i + 8]);
        let data = u64::from_le_bytes(word);
        let keyed = data ^ key[i];
        acc[i ^ 1] = acc[i ^ 1].wrapping_add(data);
        acc[i] = acc[i].wrapping_add((keyed & 0xffff_ffff).wrapping_mul(keyed >> 32));
    }
}
