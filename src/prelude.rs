// prelude.rs - Convenient re-exports for everyday use.
//
//! # Prelude
//!
//! ```
//! use bytesift::prelude::*;
//!
//! let mut buffer = OwnedBuffer::from("a.b");
//! buffer.append(".c");
//! assert_eq!(buffer.count(".", false), 2);
//! ```

pub use crate::buffer::OwnedBuffer;
pub use crate::charset::CharacterSet;
pub use crate::error::{Error, Result};
pub use crate::hash::{BuildSeededHasher, Hasher};
pub use crate::matcher::{MatchSpan, Matcher, Partition};
pub use crate::view::{ByteSearch, ByteView};
