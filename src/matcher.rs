// matcher.rs - Substring and byte-class matchers, lazy match and split ranges.
//
// A `Matcher` finds one hit in a haystack in either direction. The range
// types re-run it over the unsearched remainder, so they hold nothing but
// the haystack, the matcher and a cursor.

use std::ops::Range;

use crate::backend::{self, Backend};
use crate::charset::CharacterSet;

/// What to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher<'n> {
    /// An exact byte sequence.
    Substring(&'n [u8]),
    /// Any single byte in the set.
    AnyOf(CharacterSet),
    /// Any single byte outside the set.
    NoneOf(CharacterSet),
}

impl<'n> Matcher<'n> {
    /// Width in bytes of every hit: the needle length, or 1 for a class.
    pub fn width(&self) -> usize {
        match self {
            Matcher::Substring(needle) => needle.len(),
            Matcher::AnyOf(_) | Matcher::NoneOf(_) => 1,
        }
    }

    /// Whether this matcher can never produce a proper hit. Only the empty
    /// substring qualifies: it is found at a boundary by `find`/`rfind`
    /// but yields nothing from the ranges.
    pub fn is_empty(&self) -> bool {
        matches!(self, Matcher::Substring(needle) if needle.is_empty())
    }

    /// Offset of the leftmost hit.
    pub fn find_in(&self, backend: &dyn Backend, haystack: &[u8]) -> Option<usize> {
        match self {
            Matcher::Substring(needle) => backend.find(haystack, needle),
            Matcher::AnyOf(set) => backend.find_byteset(haystack, set),
            Matcher::NoneOf(set) => backend.find_not_byteset(haystack, set),
        }
    }

    /// Offset of the rightmost hit.
    pub fn rfind_in(&self, backend: &dyn Backend, haystack: &[u8]) -> Option<usize> {
        match self {
            Matcher::Substring(needle) => backend.rfind(haystack, needle),
            Matcher::AnyOf(set) => backend.rfind_byteset(haystack, set),
            Matcher::NoneOf(set) => backend.rfind_not_byteset(haystack, set),
        }
    }
}

impl<'n> From<&'n [u8]> for Matcher<'n> {
    fn from(needle: &'n [u8]) -> Self {
        Matcher::Substring(needle)
    }
}

impl<'n, const N: usize> From<&'n [u8; N]> for Matcher<'n> {
    fn from(needle: &'n [u8; N]) -> Self {
        Matcher::Substring(needle)
    }
}

impl<'n> From<&'n str> for Matcher<'n> {
    fn from(needle: &'n str) -> Self {
        Matcher::Substring(needle.as_bytes())
    }
}

impl<'n> From<&'n Vec<u8>> for Matcher<'n> {
    fn from(needle: &'n Vec<u8>) -> Self {
        Matcher::Substring(needle)
    }
}

impl From<CharacterSet> for Matcher<'_> {
    fn from(set: CharacterSet) -> Self {
        Matcher::AnyOf(set)
    }
}

impl From<&CharacterSet> for Matcher<'_> {
    fn from(set: &CharacterSet) -> Self {
        Matcher::AnyOf(*set)
    }
}

// === MatchSpan ===

/// One hit, referencing the haystack it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan<'h> {
    haystack: &'h [u8],
    offset: usize,
    len: usize,
}

impl<'h> MatchSpan<'h> {
    pub(crate) fn new(haystack: &'h [u8], offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= haystack.len());
        MatchSpan { haystack, offset, len }
    }

    /// Byte offset of the start of the hit.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte offset one past the end of the hit.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The matched bytes.
    pub fn as_bytes(&self) -> &'h [u8] {
        &self.haystack[self.range()]
    }
}

impl PartialEq<[u8]> for MatchSpan<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for MatchSpan<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<&str> for MatchSpan<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

// === MatchRange ===

/// Hits from left to right.
///
/// With `overlap`, the search resumes one byte after the start of each hit;
/// otherwise it resumes after its last byte, so no two hits share a byte.
///
/// ```
/// use bytesift::matcher::{Matcher, MatchRange};
///
/// let offsets: Vec<usize> = MatchRange::new(b"aaaa", Matcher::Substring(b"aa"), true)
///     .map(|m| m.offset())
///     .collect();
/// assert_eq!(offsets, vec![0, 1, 2]);
/// ```
#[derive(Clone)]
pub struct MatchRange<'h, 'n> {
    haystack: &'h [u8],
    matcher: Matcher<'n>,
    backend: &'static dyn Backend,
    position: usize,
    overlap: bool,
}

impl<'h, 'n> MatchRange<'h, 'n> {
    pub fn new(haystack: &'h [u8], matcher: Matcher<'n>, overlap: bool) -> Self {
        Self::with_backend(haystack, matcher, overlap, backend::active())
    }

    pub fn with_backend(
        haystack: &'h [u8],
        matcher: Matcher<'n>,
        overlap: bool,
        backend: &'static dyn Backend,
    ) -> Self {
        let position = if matcher.is_empty() { usize::MAX } else { 0 };
        MatchRange { haystack, matcher, backend, position, overlap }
    }
}

impl<'h> Iterator for MatchRange<'h, '_> {
    type Item = MatchSpan<'h>;

    fn next(&mut self) -> Option<MatchSpan<'h>> {
        if self.position >= self.haystack.len() {
            return None;
        }
        let rest = &self.haystack[self.position..];
        match self.matcher.find_in(self.backend, rest) {
            Some(found) => {
                let start = self.position + found;
                let width = self.matcher.width();
                self.position = start + if self.overlap { 1 } else { width };
                Some(MatchSpan::new(self.haystack, start, width))
            }
            None => {
                self.position = usize::MAX;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for MatchRange<'_, '_> {}

// === RMatchRange ===

/// Hits from right to left.
///
/// With `overlap`, the next hit only has to start before the current one;
/// otherwise it has to end at or before the current hit's start.
#[derive(Clone)]
pub struct RMatchRange<'h, 'n> {
    haystack: &'h [u8],
    matcher: Matcher<'n>,
    backend: &'static dyn Backend,
    end: usize,
    overlap: bool,
}

impl<'h, 'n> RMatchRange<'h, 'n> {
    pub fn new(haystack: &'h [u8], matcher: Matcher<'n>, overlap: bool) -> Self {
        Self::with_backend(haystack, matcher, overlap, backend::active())
    }

    pub fn with_backend(
        haystack: &'h [u8],
        matcher: Matcher<'n>,
        overlap: bool,
        backend: &'static dyn Backend,
    ) -> Self {
        let end = if matcher.is_empty() { 0 } else { haystack.len() };
        RMatchRange { haystack, matcher, backend, end, overlap }
    }
}

impl<'h> Iterator for RMatchRange<'h, '_> {
    type Item = MatchSpan<'h>;

    fn next(&mut self) -> Option<MatchSpan<'h>> {
        if self.end == 0 {
            return None;
        }
        let area = &self.haystack[..self.end];
        match self.matcher.rfind_in(self.backend, area) {
            Some(start) => {
                let width = self.matcher.width();
                self.end = if self.overlap { start + width - 1 } else { start };
                Some(MatchSpan::new(self.haystack, start, width))
            }
            None => {
                self.end = 0;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for RMatchRange<'_, '_> {}

// === SplitRange ===

/// Segments between non-overlapping hits, left to right.
///
/// Always yields one more segment than there are hits: an empty haystack
/// gives one empty segment, and adjacent or boundary hits give empty
/// segments rather than being collapsed.
///
/// ```
/// use bytesift::charset::CharacterSet;
/// use bytesift::matcher::SplitRange;
///
/// let parts: Vec<&[u8]> = SplitRange::new(b".a..c.", CharacterSet::from(".").into()).collect();
/// assert_eq!(parts, vec![&b""[..], b"a", b"", b"c", b""]);
/// ```
#[derive(Clone)]
pub struct SplitRange<'h, 'n> {
    haystack: &'h [u8],
    matcher: Matcher<'n>,
    backend: &'static dyn Backend,
    position: usize,
    finished: bool,
}

impl<'h, 'n> SplitRange<'h, 'n> {
    pub fn new(haystack: &'h [u8], matcher: Matcher<'n>) -> Self {
        Self::with_backend(haystack, matcher, backend::active())
    }

    pub fn with_backend(haystack: &'h [u8], matcher: Matcher<'n>, backend: &'static dyn Backend) -> Self {
        SplitRange { haystack, matcher, backend, position: 0, finished: false }
    }
}

impl<'h> Iterator for SplitRange<'h, '_> {
    type Item = &'h [u8];

    fn next(&mut self) -> Option<&'h [u8]> {
        if self.finished {
            return None;
        }
        let rest = &self.haystack[self.position..];
        let hit = if self.matcher.is_empty() {
            None
        } else {
            self.matcher.find_in(self.backend, rest)
        };
        match hit {
            Some(found) => {
                self.position += found + self.matcher.width();
                Some(&rest[..found])
            }
            None => {
                self.finished = true;
                Some(rest)
            }
        }
    }
}

impl std::iter::FusedIterator for SplitRange<'_, '_> {}

// === RSplitRange ===

/// Segments between non-overlapping hits, right to left.
#[derive(Clone)]
pub struct RSplitRange<'h, 'n> {
    haystack: &'h [u8],
    matcher: Matcher<'n>,
    backend: &'static dyn Backend,
    end: usize,
    finished: bool,
}

impl<'h, 'n> RSplitRange<'h, 'n> {
    pub fn new(haystack: &'h [u8], matcher: Matcher<'n>) -> Self {
        Self::with_backend(haystack, matcher, backend::active())
    }

    pub fn with_backend(haystack: &'h [u8], matcher: Matcher<'n>, backend: &'static dyn Backend) -> Self {
        RSplitRange { haystack, matcher, backend, end: haystack.len(), finished: false }
    }
}

impl<'h> Iterator for RSplitRange<'h, '_> {
    type Item = &'h [u8];

    fn next(&mut self) -> Option<&'h [u8]> {
        if self.finished {
            return None;
        }
        let area = &self.haystack[..self.end];
        let hit = if self.matcher.is_empty() {
            None
        } else {
            self.matcher.rfind_in(self.backend, area)
        };
        match hit {
            Some(start) => {
                self.end = start;
                Some(&area[start + self.matcher.width()..])
            }
            None => {
                self.finished = true;
                Some(area)
            }
        }
    }
}

impl std::iter::FusedIterator for RSplitRange<'_, '_> {}

// === Partition ===

/// Three-way split of a haystack around one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition<'h> {
    pub before: &'h [u8],
    pub matched: &'h [u8],
    pub after: &'h [u8],
}

impl<'h> Partition<'h> {
    fn around(haystack: &'h [u8], start: usize, width: usize) -> Self {
        let (before, rest) = haystack.split_at(start);
        let (matched, after) = rest.split_at(width);
        Partition { before, matched, after }
    }

    /// Split around the first hit. Without a hit, everything is `before`.
    pub fn first(haystack: &'h [u8], matcher: Matcher<'_>) -> Self {
        match matcher.find_in(backend::active(), haystack) {
            Some(start) => Self::around(haystack, start, matcher.width()),
            None => Self::around(haystack, haystack.len(), 0),
        }
    }

    /// Split around the last hit. Without a hit, everything is `after`.
    pub fn last(haystack: &'h [u8], matcher: Matcher<'_>) -> Self {
        match matcher.rfind_in(backend::active(), haystack) {
            Some(start) => Self::around(haystack, start, matcher.width()),
            None => Self::around(haystack, 0, 0),
        }
    }

    /// Whether the partition was made around an actual hit.
    pub fn is_found(&self) -> bool {
        !self.matched.is_empty()
    }
}
