// backends/mod.rs - Backend registry
// One module per capability class; see `crate::backend` for dispatch.

pub mod serial;

#[cfg(target_arch = "x86_64")]
pub(crate) mod haswell;

#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;

pub use serial::SERIAL;
