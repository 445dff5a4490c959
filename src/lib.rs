//! # bytesift
//!
//! Byte-string search, edit distance and hashing with runtime-selected SIMD
//! back ends.
//!
//! Every vectorized algorithm has a portable scalar twin. The best back end
//! the CPU supports is picked once per process, and all back ends return
//! identical results for identical input, whatever the alignment of the
//! haystack.
//!
//! ## Quick Start
//!
//! ```rust
//! use bytesift::prelude::*;
//!
//! let text = ByteView::from("key=value; other=thing");
//! assert_eq!(text.find("value"), Some(4));
//!
//! let p = text.partition("=");
//! assert_eq!(p.before, b"key");
//!
//! let fields: Vec<&[u8]> = text.split(CharacterSet::from("; ")).collect();
//! assert_eq!(fields.len(), 3);
//! ```
//!
//! Streaming hashes are chunk-invariant:
//!
//! ```rust
//! use bytesift::hash::{hash_with_seed, Hasher};
//!
//! let mut hasher = Hasher::new(7);
//! hasher.update(b"hello ").update(b"world");
//! assert_eq!(hasher.finalize(), hash_with_seed(b"hello world", 7));
//! ```
//!
//! ## Back Ends
//!
//! The selected back end is available as [`backend::active()`]; set
//! `BYTESIFT_CAPABILITIES=serial` to force the scalar code.
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`view`] | `ByteView` and the `ByteSearch` query trait |
//! | [`buffer`] | `OwnedBuffer`, growable owned bytes |
//! | [`charset`] | `CharacterSet`, 256-bit byte membership |
//! | [`matcher`] | Match spans, match and split ranges, partitions |
//! | [`levenshtein`] | Edit distance |
//! | [`hash`] | One-shot and streaming 64-bit hash |
//! | [`backend`] | `Backend` trait and capability dispatch |
//! | [`backends`] | Scalar, AVX2 and NEON implementations |
//! | [`bits`] | Bit utilities |
//! | [`error`] | Domain errors |

pub mod backend;
pub mod backends;
pub mod bits;
pub mod buffer;
pub mod charset;
pub mod error;
pub mod hash;
pub mod levenshtein;
pub mod matcher;
pub mod prelude;
pub mod view;
