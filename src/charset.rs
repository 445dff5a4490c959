// charset.rs - 256-bit byte membership table.

use std::fmt;

/// An immutable set of byte values, stored as a 256-bit table.
///
/// Membership is O(1) and defined for every byte, so the complement of a set
/// is always another set:
///
/// ```
/// use bytesift::charset::CharacterSet;
///
/// let vowels = CharacterSet::from_bytes(b"aeiou");
/// assert!(vowels.contains(b'e'));
/// assert!(!vowels.contains(b'x'));
/// assert!(vowels.inverted().contains(b'x'));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharacterSet {
    bits: [u64; 4],
}

impl CharacterSet {
    /// The empty set.
    pub const fn new() -> Self {
        CharacterSet { bits: [0; 4] }
    }

    /// The set of all 256 byte values.
    pub const fn full() -> Self {
        CharacterSet { bits: [u64::MAX; 4] }
    }

    /// Build a set from an explicit list of allowed bytes. Duplicates are fine.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::new();
        for &b in bytes {
            set.insert(b);
        }
        set
    }

    /// Build a set holding every byte in `lo..=hi`.
    pub fn from_range(lo: u8, hi: u8) -> Self {
        let mut set = Self::new();
        for b in lo..=hi {
            set.insert(b);
        }
        set
    }

    pub fn ascii_lowercase() -> Self {
        Self::from_range(b'a', b'z')
    }

    pub fn ascii_uppercase() -> Self {
        Self::from_range(b'A', b'Z')
    }

    pub fn ascii_digits() -> Self {
        Self::from_range(b'0', b'9')
    }

    /// Space, tab, newline, vertical tab, form feed and carriage return.
    pub fn ascii_whitespace() -> Self {
        Self::from_bytes(b" \t\n\x0b\x0c\r")
    }

    /// Printable ASCII, `0x20..=0x7e`.
    pub fn ascii_printables() -> Self {
        Self::from_range(0x20, 0x7e)
    }

    #[inline]
    pub fn insert(&mut self, b: u8) {
        self.bits[(b >> 6) as usize] |= 1 << (b & 63);
    }

    #[inline]
    pub fn remove(&mut self, b: u8) {
        self.bits[(b >> 6) as usize] &= !(1 << (b & 63));
    }

    /// Whether `b` is a member of the set.
    #[inline(always)]
    pub fn contains(&self, b: u8) -> bool {
        self.bits[(b >> 6) as usize] & (1 << (b & 63)) != 0
    }

    /// The logical complement: every byte not in `self`.
    #[inline]
    pub fn inverted(&self) -> Self {
        CharacterSet {
            bits: [!self.bits[0], !self.bits[1], !self.bits[2], !self.bits[3]],
        }
    }

    /// Alias of [`inverted`](Self::inverted).
    #[inline]
    pub fn negate(&self) -> Self {
        self.inverted()
    }

    pub fn union(&self, other: &CharacterSet) -> Self {
        let mut bits = self.bits;
        for (word, o) in bits.iter_mut().zip(other.bits) {
            *word |= o;
        }
        CharacterSet { bits }
    }

    /// Number of member bytes.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == [0; 4]
    }

    /// Member bytes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=255u8).filter(move |&b| self.contains(b))
    }

    /// The raw table, bit `b & 63` of word `b >> 6` for byte `b`.
    #[inline]
    pub fn as_words(&self) -> &[u64; 4] {
        &self.bits
    }

    /// Nibble tables for shuffle-based membership tests.
    ///
    /// For a byte `x` with low nibble `l` and high nibble `h`, bit `h & 7`
    /// of `low[l]` (for `h < 8`) or of `high[l]` (for `h >= 8`) is set
    /// exactly when `x` is a member.
    pub(crate) fn nibble_tables(&self) -> ([u8; 16], [u8; 16]) {
        let mut low = [0u8; 16];
        let mut high = [0u8; 16];
        for x in self.iter() {
            let l = (x & 0x0f) as usize;
            let h = x >> 4;
            if h < 8 {
                low[l] |= 1 << h;
            } else {
                high[l] |= 1 << (h - 8);
            }
        }
        (low, high)
    }
}

impl From<&[u8]> for CharacterSet {
    fn from(bytes: &[u8]) -> Self {
        CharacterSet::from_bytes(bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for CharacterSet {
    fn from(bytes: &[u8; N]) -> Self {
        CharacterSet::from_bytes(bytes)
    }
}

impl From<&str> for CharacterSet {
    fn from(bytes: &str) -> Self {
        CharacterSet::from_bytes(bytes.as_bytes())
    }
}

impl From<&CharacterSet> for CharacterSet {
    fn from(set: &CharacterSet) -> Self {
        *set
    }
}

impl FromIterator<u8> for CharacterSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for b in iter {
            set.insert(b);
        }
        set
    }
}

impl fmt::Debug for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_set();
        for b in self.iter() {
            list.entry(&std::ascii::escape_default(b).to_string());
        }
        list.finish()
    }
}
