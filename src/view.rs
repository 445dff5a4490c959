// view.rs - Borrowed byte views and the query surface shared by views and buffers.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;
use std::slice::SliceIndex;

use crate::backend;
use crate::charset::CharacterSet;
use crate::error::{check_range, Result};
use crate::hash;
use crate::levenshtein;
use crate::matcher::{MatchRange, Matcher, Partition, RMatchRange, RSplitRange, SplitRange};

/// A borrowed, immutable run of bytes.
///
/// The length is explicit: a NUL byte is an ordinary byte for equality and
/// ordering, so `"a"` sorts before `"a\0"` and the two are not equal.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteView<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        ByteView { bytes }
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// The `count` bytes starting at `offset`.
    ///
    /// Fails with [`Error::OutOfRange`](crate::error::Error::OutOfRange)
    /// when the range does not lie inside the view.
    pub fn slice(&self, offset: usize, count: usize) -> Result<ByteView<'a>> {
        check_range(offset, count, self.len())?;
        Ok(ByteView::new(&self.bytes[offset..offset + count]))
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'a, u8>> {
        self.bytes.iter().copied()
    }
}

impl fmt::Debug for ByteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b\"{}\"", self.bytes.escape_ascii())
    }
}

impl<'a> From<&'a [u8]> for ByteView<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteView::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ByteView<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        ByteView::new(bytes)
    }
}

impl<'a> From<&'a str> for ByteView<'a> {
    fn from(text: &'a str) -> Self {
        ByteView::new(text.as_bytes())
    }
}

impl<'a> From<&'a Vec<u8>> for ByteView<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        ByteView::new(bytes)
    }
}

impl AsRef<[u8]> for ByteView<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<I: SliceIndex<[u8]>> Index<I> for ByteView<'_> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        &self.bytes[index]
    }
}

impl<'a> IntoIterator for ByteView<'a> {
    type Item = u8;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq<[u8]> for ByteView<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for ByteView<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteView<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.bytes == &other[..]
    }
}

impl PartialEq<str> for ByteView<'_> {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteView<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<ByteView<'_>> for &str {
    fn eq(&self, other: &ByteView<'_>) -> bool {
        self.as_bytes() == other.bytes
    }
}

/// Search, split, compare and hash queries over borrowed bytes.
///
/// Implemented for [`ByteView<'a>`] and `&'a OwnedBuffer`. Every span,
/// segment and partition borrows the underlying bytes for `'a`, not the
/// value the method was called on, so results outlive a temporary view.
///
/// Needles for `partition`, `find_all`, `split` and their reverse forms are
/// anything convertible into a [`Matcher`]: a byte string or `&str` means an
/// exact substring, a [`CharacterSet`] means "any member byte".
///
/// ```
/// use bytesift::prelude::*;
///
/// fn first_field(line: ByteView<'_>) -> &[u8] {
///     line.split(",").next().unwrap_or(b"")
/// }
///
/// let text = ByteView::from("a.b,c.d");
/// assert_eq!(text.find("c"), Some(4));
/// assert_eq!(text.find_first_of(".,"), Some(1));
/// assert_eq!(text.split(CharacterSet::from(".,")).count(), 4);
/// assert_eq!(first_field(text), b"a.b");
/// ```
pub trait ByteSearch<'a>: Copy {
    fn as_bytes(self) -> &'a [u8];

    /// Offset of the first occurrence of `needle`. An empty needle is found at 0.
    fn find(self, needle: impl AsRef<[u8]>) -> Option<usize> {
        backend::active().find(self.as_bytes(), needle.as_ref())
    }

    /// Offset of the last occurrence of `needle`. An empty needle is found at
    /// the end.
    fn rfind(self, needle: impl AsRef<[u8]>) -> Option<usize> {
        backend::active().rfind(self.as_bytes(), needle.as_ref())
    }

    fn find_first_of(self, set: impl Into<CharacterSet>) -> Option<usize> {
        backend::active().find_byteset(self.as_bytes(), &set.into())
    }

    fn find_last_of(self, set: impl Into<CharacterSet>) -> Option<usize> {
        backend::active().rfind_byteset(self.as_bytes(), &set.into())
    }

    fn find_first_not_of(self, set: impl Into<CharacterSet>) -> Option<usize> {
        backend::active().find_not_byteset(self.as_bytes(), &set.into())
    }

    fn find_last_not_of(self, set: impl Into<CharacterSet>) -> Option<usize> {
        backend::active().rfind_not_byteset(self.as_bytes(), &set.into())
    }

    /// Split around the first hit: `(whole, empty, empty)` when there is none.
    fn partition<'n>(self, needle: impl Into<Matcher<'n>>) -> Partition<'a> {
        Partition::first(self.as_bytes(), needle.into())
    }

    /// Split around the last hit: `(empty, empty, whole)` when there is none.
    fn rpartition<'n>(self, needle: impl Into<Matcher<'n>>) -> Partition<'a> {
        Partition::last(self.as_bytes(), needle.into())
    }

    fn find_all<'n>(self, needle: impl Into<Matcher<'n>>, overlap: bool) -> MatchRange<'a, 'n> {
        MatchRange::new(self.as_bytes(), needle.into(), overlap)
    }

    fn rfind_all<'n>(self, needle: impl Into<Matcher<'n>>, overlap: bool) -> RMatchRange<'a, 'n> {
        RMatchRange::new(self.as_bytes(), needle.into(), overlap)
    }

    fn split<'n>(self, needle: impl Into<Matcher<'n>>) -> SplitRange<'a, 'n> {
        SplitRange::new(self.as_bytes(), needle.into())
    }

    fn rsplit<'n>(self, needle: impl Into<Matcher<'n>>) -> RSplitRange<'a, 'n> {
        RSplitRange::new(self.as_bytes(), needle.into())
    }

    /// Number of hits `find_all` yields.
    fn count<'n>(self, needle: impl Into<Matcher<'n>>, overlap: bool) -> usize {
        self.find_all(needle, overlap).count()
    }

    fn contains(self, needle: impl AsRef<[u8]>) -> bool {
        self.find(needle).is_some()
    }

    fn starts_with(self, prefix: impl AsRef<[u8]>) -> bool {
        self.as_bytes().starts_with(prefix.as_ref())
    }

    fn ends_with(self, suffix: impl AsRef<[u8]>) -> bool {
        self.as_bytes().ends_with(suffix.as_ref())
    }

    /// Lexicographic order on raw byte values; a proper prefix sorts first.
    fn compare(self, other: impl AsRef<[u8]>) -> Ordering {
        self.as_bytes().cmp(other.as_ref())
    }

    fn edit_distance(self, other: impl AsRef<[u8]>) -> usize {
        levenshtein::edit_distance(self.as_bytes(), other.as_ref())
    }

    fn hash_with_seed(self, seed: u64) -> u64 {
        hash::hash_with_seed(self.as_bytes(), seed)
    }

    fn hash64(self) -> u64 {
        hash::hash(self.as_bytes())
    }
}

impl<'a> ByteSearch<'a> for ByteView<'a> {
    fn as_bytes(self) -> &'a [u8] {
        self.bytes
    }
}
