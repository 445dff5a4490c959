// hash.rs - Seeded 64-bit hash and its streaming form.
//
// Input is consumed in 64-byte blocks. Each block is folded into eight
// 64-bit accumulators by the backend's `hash_block`, then scrambled. The
// tail shorter than a block is zero-padded and folded the same way at
// finalization, and the total length is mixed into the result, so
// `Hasher` and `hash` agree however the input was chunked.
//
// Not a cryptographic hash.

use std::fmt;

use crate::backend::{self, Backend, HASH_BLOCK_LEN, HASH_LANES};

/// Seed used by [`hash`] and [`Hasher::default`].
pub const DEFAULT_SEED: u64 = 0;

const PRIME32_1: u64 = 0x9e37_79b1;
const PRIME32_2: u64 = 0x85eb_ca77;
const PRIME32_3: u64 = 0xc2b2_ae3d;
const PRIME64_1: u64 = 0x9e37_79b1_85eb_ca87;
const PRIME64_2: u64 = 0xc2b2_ae3d_27d4_eb4f;
const PRIME64_3: u64 = 0x1656_67b1_9e37_79f9;
const PRIME64_4: u64 = 0x85eb_ca77_c2b2_ae63;
const PRIME64_5: u64 = 0x27d4_eb2f_1656_67c5;

const INIT_ACC: [u64; HASH_LANES] = [
    PRIME32_3, PRIME64_1, PRIME64_2, PRIME64_3, PRIME64_4, PRIME32_2, PRIME64_5, PRIME32_1,
];

// Fractional digits of pi.
const SECRET: [u64; HASH_LANES] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
    0x4528_21e6_38d0_1377,
    0xbe54_66cf_34e9_0c6c,
    0xc0ac_29b7_c97c_50dd,
    0x3f84_d5b5_b547_0917,
];

#[inline]
fn avalanche(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(PRIME64_2);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME64_3);
    h ^= h >> 32;
    h
}

fn derive_key(seed: u64) -> [u64; HASH_LANES] {
    let mut key = SECRET;
    for (i, lane) in key.iter_mut().enumerate() {
        *lane ^= avalanche(seed.wrapping_add((i as u64).wrapping_mul(PRIME64_5)));
    }
    key
}

#[inline]
fn scramble(acc: &mut [u64; HASH_LANES], key: &[u64; HASH_LANES]) {
    for (lane, &k) in acc.iter_mut().zip(key) {
        *lane = (*lane ^ (*lane >> 47) ^ k).wrapping_mul(PRIME32_1);
    }
}

#[inline]
fn fold_block(
    backend: &dyn Backend,
    acc: &mut [u64; HASH_LANES],
    block: &[u8; HASH_BLOCK_LEN],
    key: &[u64; HASH_LANES],
) {
    backend.hash_block(acc, block, key);
    scramble(acc, key);
}

fn finish(
    backend: &dyn Backend,
    mut acc: [u64; HASH_LANES],
    tail: &[u8],
    total_len: u64,
    key: &[u64; HASH_LANES],
    seed: u64,
) -> u64 {
    debug_assert!(tail.len() < HASH_BLOCK_LEN);
    if !tail.is_empty() {
        let mut padded = [0u8; HASH_BLOCK_LEN];
        padded[..tail.len()].copy_from_slice(tail);
        fold_block(backend, &mut acc, &padded, key);
    }
    let mut h = total_len.wrapping_mul(PRIME64_1) ^ seed;
    for lane in acc {
        h = (h ^ avalanche(lane))
            .rotate_left(27)
            .wrapping_mul(PRIME64_1)
            .wrapping_add(PRIME64_4);
    }
    avalanche(h)
}

/// Hash `data` under `seed` with the process-wide backend.
///
/// ```
/// use bytesift::hash::{hash, hash_with_seed, Hasher};
///
/// let whole = hash_with_seed(b"hello world", 7);
/// let mut hasher = Hasher::new(7);
/// hasher.update(b"hello").update(b" ").update(b"world");
/// assert_eq!(hasher.finalize(), whole);
/// assert_ne!(hash(b"hello world"), whole);
/// ```
pub fn hash_with_seed(data: &[u8], seed: u64) -> u64 {
    hash_with_backend(backend::active(), data, seed)
}

/// Hash `data` under [`DEFAULT_SEED`].
pub fn hash(data: &[u8]) -> u64 {
    hash_with_seed(data, DEFAULT_SEED)
}

/// Hash `data` under `seed` with an explicit backend.
pub fn hash_with_backend(backend: &dyn Backend, data: &[u8], seed: u64) -> u64 {
    let key = derive_key(seed);
    let mut acc = INIT_ACC;
    let mut rest = data;
    while let Some((block, tail)) = rest.split_first_chunk::<HASH_BLOCK_LEN>() {
        fold_block(backend, &mut acc, block, &key);
        rest = tail;
    }
    finish(backend, acc, rest, data.len() as u64, &key, seed)
}

/// Incremental form of [`hash_with_seed`].
///
/// Any sequence of `update` calls whose inputs concatenate to `S` finalizes
/// to `hash_with_seed(S, seed)`.
#[derive(Clone)]
pub struct Hasher {
    seed: u64,
    key: [u64; HASH_LANES],
    acc: [u64; HASH_LANES],
    block: [u8; HASH_BLOCK_LEN],
    block_len: usize,
    total_len: u64,
    backend: &'static dyn Backend,
}

impl Hasher {
    pub fn new(seed: u64) -> Self {
        Self::with_backend(seed, backend::active())
    }

    /// A hasher pinned to `backend` rather than the process-wide one.
    pub fn with_backend(seed: u64, backend: &'static dyn Backend) -> Self {
        Hasher {
            seed,
            key: derive_key(seed),
            acc: INIT_ACC,
            block: [0; HASH_BLOCK_LEN],
            block_len: 0,
            total_len: 0,
            backend,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Total number of bytes consumed since construction or the last reset.
    pub fn len(&self) -> u64 {
        self.total_len
    }

    pub fn is_empty(&self) -> bool {
        self.total_len == 0
    }

    /// Feed more bytes. Returns `self` for chaining.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.total_len = self.total_len.wrapping_add(data.len() as u64);
        let mut data = data;

        if self.block_len > 0 {
            let take = (HASH_BLOCK_LEN - self.block_len).min(data.len());
            self.block[self.block_len..self.block_len + take].copy_from_slice(&data[..take]);
            self.block_len += take;
            data = &data[take..];
            if self.block_len < HASH_BLOCK_LEN {
                return self;
            }
            let block = self.block;
            fold_block(self.backend, &mut self.acc, &block, &self.key);
            self.block_len = 0;
        }

        while let Some((block, tail)) = data.split_first_chunk::<HASH_BLOCK_LEN>() {
            fold_block(self.backend, &mut self.acc, block, &self.key);
            data = tail;
        }
        let rest = data;
        self.block[..rest.len()].copy_from_slice(rest);
        self.block_len = rest.len();
        self
    }

    /// The hash of everything fed so far. Does not consume or alter state.
    pub fn finalize(&self) -> u64 {
        finish(
            self.backend,
            self.acc,
            &self.block[..self.block_len],
            self.total_len,
            &self.key,
            self.seed,
        )
    }

    /// Discard all input and start over under `seed`.
    pub fn reset(&mut self, seed: u64) -> &mut Self {
        *self = Self::with_backend(seed, self.backend);
        self
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Hasher::new(DEFAULT_SEED)
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("seed", &self.seed)
            .field("len", &self.total_len)
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

impl std::hash::Hasher for Hasher {
    fn finish(&self) -> u64 {
        self.finalize()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }
}

/// [`std::hash::BuildHasher`] producing seeded [`Hasher`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSeededHasher {
    seed: u64,
}

impl BuildSeededHasher {
    pub fn new(seed: u64) -> Self {
        BuildSeededHasher { seed }
    }
}

impl std::hash::BuildHasher for BuildSeededHasher {
    type Hasher = Hasher;

    fn build_hasher(&self) -> Hasher {
        Hasher::new(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use std::collections::HashMap;

    const SEEDS: [u64; 4] = [1, 42, 0xdead_beef, u64::MAX];

    #[test]
    fn seed_changes_hash() {
        let inputs: [&[u8]; 5] = [b"", b"a", b"hello", &[0u8; 64], &[7u8; 200]];
        for data in inputs {
            let base = hash_with_seed(data, 0);
            for seed in SEEDS {
                assert_ne!(hash_with_seed(data, seed), base, "seed {seed} on {data:?}");
            }
        }
    }

    #[test]
    fn content_changes_hash() {
        assert_ne!(hash(b"hello"), hash(b"hellp"));
        assert_ne!(hash(b"a"), hash(b"a\0"));
        assert_ne!(hash(b""), hash(b"\0"));
        assert_ne!(hash(b"ab"), hash(b"ba"));
        let mut long = vec![b'x'; 130];
        let before = hash(&long);
        long[129] = b'y';
        assert_ne!(hash(&long), before);
        long[129] = b'x';
        long[0] = b'y';
        assert_ne!(hash(&long), before);
    }

    #[test]
    fn block_order_matters() {
        let mut forward = vec![b'a'; 64];
        forward.extend_from_slice(&[b'b'; 64]);
        let mut backward = vec![b'b'; 64];
        backward.extend_from_slice(&[b'a'; 64]);
        assert_ne!(hash(&forward), hash(&backward));
    }

    #[test]
    fn deterministic() {
        assert_eq!(hash(b"hello world"), hash(b"hello world"));
        assert_eq!(hash_with_seed(b"", 9), hash_with_seed(b"", 9));
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut hasher = Hasher::new(3);
        hasher.update(b"abc");
        let first = hasher.finalize();
        assert_eq!(hasher.finalize(), first);
        assert_eq!(first, hash_with_seed(b"abc", 3));
        assert_eq!(hasher.len(), 3);
    }

    #[test]
    fn empty_updates_are_neutral() {
        let mut hasher = Hasher::new(5);
        hasher.update(b"").update(b"xy").update(b"").update(b"").update(b"z");
        assert_eq!(hasher.finalize(), hash_with_seed(b"xyz", 5));
        assert_eq!(Hasher::new(5).finalize(), hash_with_seed(b"", 5));
    }

    #[test]
    fn reset_discards_input() {
        let mut hasher = Hasher::new(1);
        hasher.update(&[9u8; 100]);
        hasher.reset(2).update(b"fresh");
        assert_eq!(hasher.seed(), 2);
        assert_eq!(hasher.finalize(), hash_with_seed(b"fresh", 2));
        hasher.reset(0);
        assert!(hasher.is_empty());
        assert_eq!(hasher.finalize(), hash(b""));
    }

    #[test]
    fn every_backend_agrees() {
        let data: Vec<u8> = (0..777u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        for backend in backend::available() {
            for len in [0, 1, 63, 64, 65, 127, 128, 500, 777] {
                assert_eq!(
                    hash_with_backend(backend, &data[..len], 11),
                    hash_with_backend(&crate::backends::SERIAL, &data[..len], 11),
                    "{} on {} bytes",
                    backend.name(),
                    len
                );
            }
        }
    }

    #[test]
    fn build_hasher_keys_a_map() {
        let mut map: HashMap<&str, u32, BuildSeededHasher> = HashMap::with_hasher(BuildSeededHasher::new(17));
        map.insert("one", 1);
        map.insert("two", 2);
        assert_eq!(map["one"], 1);
        assert_eq!(map.get("three"), None);
    }

    #[quickcheck]
    fn chunk_invariance(data: Vec<u8>, cuts: Vec<usize>, seed: u64) -> bool {
        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c % (data.len() + 1)).collect();
        cuts.sort_unstable();
        let mut hasher = Hasher::new(seed);
        let mut start = 0;
        for cut in cuts {
            hasher.update(&data[start..cut]);
            start = cut;
        }
        hasher.update(&data[start..]);
        hasher.finalize() == hash_with_seed(&data, seed)
    }

    #[quickcheck]
    fn byte_at_a_time(data: Vec<u8>) -> bool {
        let mut hasher = Hasher::default();
        for b in &data {
            hasher.update(std::slice::from_ref(b));
        }
        hasher.finalize() == hash(&data)
    }
}
