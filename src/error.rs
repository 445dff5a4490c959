// error.rs - Error types for bytesift.
//
// Only domain errors live here. A search that finds nothing returns `None`,
// and hashing accepts every input.

use std::fmt;

/// Error type for operations called outside their defined domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A byte range `offset..offset + count` does not fit in a sequence of
    /// length `len`.
    OutOfRange {
        offset: usize,
        count: usize,
        len: usize,
    },
    /// `log2` was asked for the logarithm of zero.
    ZeroLog2,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { offset, count, len } => write!(
                f,
                "range {}..{} out of bounds for length {}",
                offset,
                offset.saturating_add(*count),
                len
            ),
            Error::ZeroLog2 => write!(f, "log2 of zero is undefined"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that `offset..offset + count` lies inside `0..len`.
pub(crate) fn check_range(offset: usize, count: usize, len: usize) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfRange { offset, count, len }),
    }
}
