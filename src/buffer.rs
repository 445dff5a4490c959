// buffer.rs - Owned, growable byte storage.
//
// Capacity only grows, and always to the bit-ceiling of the required size,
// so appends are amortized O(1). Erasing shifts the tail down in place.

use std::fmt;
use std::ops::Index;
use std::slice::SliceIndex;

use crate::bits::bit_ceil;
use crate::error::{check_range, Error, Result};
use crate::matcher::{MatchRange, Matcher};
use crate::view::{ByteSearch, ByteView};

/// An exclusively owned byte string.
///
/// Cloning copies the content; two buffers never share storage.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnedBuffer {
    bytes: Vec<u8>,
}

impl OwnedBuffer {
    pub fn new() -> Self {
        OwnedBuffer { bytes: Vec::new() }
    }

    /// An empty buffer able to hold at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        OwnedBuffer { bytes: Vec::with_capacity(bit_ceil(capacity)) }
    }

    pub fn from_view(view: ByteView<'_>) -> Self {
        let mut buffer = Self::with_capacity(view.len());
        buffer.bytes.extend_from_slice(view.as_bytes());
        buffer
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_view(&self) -> ByteView<'_> {
        ByteView::new(&self.bytes)
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Make room for `additional` more bytes, growing to a power of two.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len().saturating_add(additional);
        if required <= self.capacity() {
            return;
        }
        let target = bit_ceil(required).max(required);
        self.bytes.reserve_exact(target - self.len());
    }

    pub fn push_back(&mut self, byte: u8) {
        self.reserve(1);
        self.bytes.push(byte);
    }

    pub fn append(&mut self, bytes: impl AsRef<[u8]>) {
        let bytes = bytes.as_ref();
        self.reserve(bytes.len());
        self.bytes.extend_from_slice(bytes);
    }

    /// Replace the whole content, keeping the allocation when it fits.
    pub fn assign(&mut self, bytes: impl AsRef<[u8]>) {
        self.bytes.clear();
        self.append(bytes);
    }

    /// Insert `bytes` before position `offset`.
    ///
    /// Fails with [`Error::OutOfRange`] when `offset > len`.
    pub fn insert(&mut self, offset: usize, bytes: impl AsRef<[u8]>) -> Result<()> {
        let bytes = bytes.as_ref();
        if offset > self.len() {
            return Err(Error::OutOfRange { offset, count: 0, len: self.len() });
        }
        self.reserve(bytes.len());
        self.bytes.splice(offset..offset, bytes.iter().copied());
        Ok(())
    }

    /// Remove `count` bytes starting at `offset`. Capacity is kept.
    ///
    /// Fails with [`Error::OutOfRange`] when `offset + count > len`.
    pub fn erase(&mut self, offset: usize, count: usize) -> Result<()> {
        check_range(offset, count, self.len())?;
        self.bytes.drain(offset..offset + count);
        Ok(())
    }

    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Replace every non-overlapping occurrence of `needle`, scanning left to
    /// right, and return how many were replaced. An empty needle replaces
    /// nothing.
    pub fn replace_all(&mut self, needle: impl AsRef<[u8]>, replacement: impl AsRef<[u8]>) -> usize {
        let (needle, replacement) = (needle.as_ref(), replacement.as_ref());
        let mut out = Vec::new();
        let mut copied = 0;
        let mut replaced = 0;
        for hit in MatchRange::new(&self.bytes, Matcher::Substring(needle), false) {
            if replaced == 0 {
                out.reserve(bit_ceil(self.len()));
            }
            out.extend_from_slice(&self.bytes[copied..hit.offset()]);
            out.extend_from_slice(replacement);
            copied = hit.end();
            replaced += 1;
        }
        if replaced == 0 {
            return 0;
        }
        out.extend_from_slice(&self.bytes[copied..]);
        self.assign(out);
        replaced
    }
}

impl<'a> ByteSearch<'a> for &'a OwnedBuffer {
    fn as_bytes(self) -> &'a [u8] {
        &self.bytes
    }
}

impl fmt::Debug for OwnedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_view(), f)
    }
}

impl From<ByteView<'_>> for OwnedBuffer {
    fn from(view: ByteView<'_>) -> Self {
        OwnedBuffer::from_view(view)
    }
}

impl From<&[u8]> for OwnedBuffer {
    fn from(bytes: &[u8]) -> Self {
        OwnedBuffer::from_view(ByteView::new(bytes))
    }
}

impl From<&str> for OwnedBuffer {
    fn from(text: &str) -> Self {
        OwnedBuffer::from_view(ByteView::from(text))
    }
}

impl From<Vec<u8>> for OwnedBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        OwnedBuffer { bytes }
    }
}

impl From<OwnedBuffer> for Vec<u8> {
    fn from(buffer: OwnedBuffer) -> Self {
        buffer.bytes
    }
}

impl AsRef<[u8]> for OwnedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<I: SliceIndex<[u8]>> Index<I> for OwnedBuffer {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        &self.bytes[index]
    }
}

impl Extend<u8> for OwnedBuffer {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for byte in iter {
            self.push_back(byte);
        }
    }
}

impl FromIterator<u8> for OwnedBuffer {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut buffer = OwnedBuffer::new();
        buffer.extend(iter);
        buffer
    }
}

impl PartialEq<ByteView<'_>> for OwnedBuffer {
    fn eq(&self, other: &ByteView<'_>) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<OwnedBuffer> for ByteView<'_> {
    fn eq(&self, other: &OwnedBuffer) -> bool {
        self.as_bytes() == other.bytes
    }
}

impl PartialEq<[u8]> for OwnedBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for OwnedBuffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl PartialEq<&str> for OwnedBuffer {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}
