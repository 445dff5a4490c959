// backend.rs - Backend trait and one-time capability dispatch.
//
// Every algorithm with a vectorized variant is a method on `Backend`. Each
// backend in `backends/` is a unit struct with a private static instance;
// callers only ever see `&'static dyn Backend` values whose hardware
// requirements were verified at detection time.

use std::sync::OnceLock;

use bitflags::bitflags;
use log::debug;
use smallvec::SmallVec;

use crate::backends;
use crate::charset::CharacterSet;

/// Environment variable restricting which detected capabilities may be used.
pub const CAPABILITIES_ENV: &str = "BYTESIFT_CAPABILITIES";

/// Width in bytes of one hash block.
pub const HASH_BLOCK_LEN: usize = 64;

/// Number of 64-bit accumulator lanes in the hash state.
pub const HASH_LANES: usize = 8;

bitflags! {
    /// Hardware capability classes a backend can require.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capability: u32 {
        /// Portable scalar code, always present.
        const SERIAL = 1 << 0;
        /// x86-64 with AVX2.
        const HASWELL = 1 << 1;
        /// AArch64 Advanced SIMD.
        const NEON = 1 << 2;
    }
}

impl Capability {
    /// Name of a single capability flag, as accepted in [`CAPABILITIES_ENV`].
    pub fn name(self) -> &'static str {
        if self == Capability::SERIAL {
            "serial"
        } else if self == Capability::HASWELL {
            "haswell"
        } else if self == Capability::NEON {
            "neon"
        } else {
            "mixed"
        }
    }

    /// Parse a comma-separated capability list. Unknown names are skipped.
    /// `SERIAL` is always included.
    pub fn parse_list(list: &str) -> Capability {
        let mut caps = Capability::SERIAL;
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.to_ascii_lowercase().as_str() {
                "serial" => caps |= Capability::SERIAL,
                "haswell" | "avx2" => caps |= Capability::HASWELL,
                "neon" => caps |= Capability::NEON,
                other => debug!("ignoring unknown capability {:?} in {}", other, CAPABILITIES_ENV),
            }
        }
        caps
    }
}

/// One concrete implementation of every vectorizable algorithm.
///
/// All implementations must return identical results for identical inputs,
/// for every start alignment and length of the haystack.
pub trait Backend: Send + Sync {
    /// Backend name (e.g. "serial", "haswell").
    fn name(&self) -> &'static str;

    /// The single capability this backend requires.
    fn capability(&self) -> Capability;

    /// Offset of the leftmost occurrence of `needle`. An empty needle is
    /// found at 0.
    fn find(&self, haystack: &[u8], needle: &[u8]) -> Option<usize>;

    /// Offset of the rightmost occurrence of `needle`. An empty needle is
    /// found at `haystack.len()`.
    fn rfind(&self, haystack: &[u8], needle: &[u8]) -> Option<usize>;

    /// Offset of the first byte that is a member of `set`.
    fn find_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize>;

    /// Offset of the last byte that is a member of `set`.
    fn rfind_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize>;

    /// Offset of the first byte that is not a member of `set`.
    fn find_not_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        self.find_byteset(haystack, &set.inverted())
    }

    /// Offset of the last byte that is not a member of `set`.
    fn rfind_not_byteset(&self, haystack: &[u8], set: &CharacterSet) -> Option<usize> {
        self.rfind_byteset(haystack, &set.inverted())
    }

    /// Levenshtein distance with unit costs, capped at `bound` when
    /// `bound != 0`.
    fn edit_distance(&self, a: &[u8], b: &[u8], bound: usize) -> usize;

    /// Fold one 64-byte block into the hash accumulators.
    fn hash_block(
        &self,
        acc: &mut [u64; HASH_LANES],
        block: &[u8; HASH_BLOCK_LEN],
        key: &[u64; HASH_LANES],
    );
}

impl std::fmt::Debug for dyn Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("name", &self.name()).finish()
    }
}

/// Capabilities of the running CPU, ignoring [`CAPABILITIES_ENV`].
pub fn detected_capabilities() -> Capability {
    let mut caps = Capability::SERIAL;
    #[cfg(target_arch = "x86_64")]
    {
        if backends::haswell::is_supported() {
            caps |= Capability::HASWELL;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        caps |= Capability::NEON;
    }
    caps
}

/// Capabilities this process may use: the detected set, restricted by
/// [`CAPABILITIES_ENV`] when it is set. Computed once.
pub fn capabilities() -> Capability {
    static CAPS: OnceLock<Capability> = OnceLock::new();
    *CAPS.get_or_init(|| {
        let list = std::env::var(CAPABILITIES_ENV).ok();
        restrict(detected_capabilities(), list.as_deref())
    })
}

/// `detected` masked by a capability list; `None` leaves it unchanged.
fn restrict(detected: Capability, list: Option<&str>) -> Capability {
    let Some(list) = list else {
        return detected;
    };
    let caps = detected & Capability::parse_list(list);
    if caps != detected {
        debug!(
            "{}={:?} masks detected capabilities {:?} down to {:?}",
            CAPABILITIES_ENV, list, detected, caps
        );
    }
    caps
}

/// The backend requiring exactly `cap`, if this process may use it.
pub fn by_capability(cap: Capability) -> Option<&'static dyn Backend> {
    backend_within(cap, capabilities())
}

/// Never returns a backend the CPU lacks, whatever `allowed` says.
fn backend_within(cap: Capability, allowed: Capability) -> Option<&'static dyn Backend> {
    if !(allowed & detected_capabilities()).contains(cap) {
        return None;
    }
    if cap == Capability::SERIAL {
        return Some(&backends::serial::SERIAL);
    }
    #[cfg(target_arch = "x86_64")]
    {
        if cap == Capability::HASWELL {
            return Some(&backends::haswell::HASWELL);
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if cap == Capability::NEON {
            return Some(&backends::neon::NEON);
        }
    }
    None
}

fn available_within(allowed: Capability) -> SmallVec<[&'static dyn Backend; 4]> {
    [Capability::SERIAL, Capability::NEON, Capability::HASWELL]
        .into_iter()
        .filter_map(|cap| backend_within(cap, allowed))
        .collect()
}

fn preferred(allowed: Capability) -> &'static dyn Backend {
    available_within(allowed)
        .last()
        .copied()
        .unwrap_or(&backends::serial::SERIAL)
}

/// Every usable backend, the serial baseline first and the preferred one last.
pub fn available() -> SmallVec<[&'static dyn Backend; 4]> {
    available_within(capabilities())
}

/// The backend selected for this process: the most capable one available.
pub fn active() -> &'static dyn Backend {
    static ACTIVE: OnceLock<&'static dyn Backend> = OnceLock::new();
    *ACTIVE.get_or_init(|| {
        let chosen = preferred(capabilities());
        debug!(
            "selected {} backend (capabilities {:?})",
            chosen.name(),
            capabilities()
        );
        chosen
    })
}
