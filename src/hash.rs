//! Content hashing policy for [`Bcache`](crate::Bcache).
//!
//! The cache only ever asks two questions of a payload: what is its 32-bit
//! hash, and is it the same content as a stored entry. [`ContentHasher`]
//! answers both so specialised caches can hash and compare a subset of a
//! record (e.g. skipping padding or fields that are already interned).
//!
//! ## Hash layout
//!
//! ```text
//!   full hash (u32)
//!   ┌────────────────┬────────────────┐
//!   │  half hash     │  low 16 bits   │
//!   │  (bits 16..31) │                │
//!   └────────────────┴────────────────┘
//!          │                  │
//!          │                  └─► bucket = full % bucket_count
//!          └─► cached per entry, compared before the payload
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use bcache::hash::{ContentHasher, FxContentHasher, half_hash};
//!
//! let hasher = FxContentHasher::new();
//! let h = hasher.hash_bytes(b"main");
//! assert_eq!(h, hasher.hash_bytes(b"main"));
//! assert_eq!(half_hash(h), (h >> 16) as u16);
//! ```

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Hash and equality over stored payloads.
///
/// Implementations must be deterministic for the lifetime of a cache and
/// consistent: `bytes_equal(a, b)` implies `hash_bytes(a) == hash_bytes(b)`.
/// The cache checks payload length itself before calling `bytes_equal`.
pub trait ContentHasher {
    /// Returns the full 32-bit hash of `bytes`.
    fn hash_bytes(&self, bytes: &[u8]) -> u32;

    /// Returns `true` if `stored` and `candidate` are the same content.
    fn bytes_equal(&self, stored: &[u8], candidate: &[u8]) -> bool {
        stored == candidate
    }
}

impl<H: ContentHasher + ?Sized> ContentHasher for &H {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u32 {
        (**self).hash_bytes(bytes)
    }

    #[inline]
    fn bytes_equal(&self, stored: &[u8], candidate: &[u8]) -> bool {
        (**self).bytes_equal(stored, candidate)
    }
}

/// Default hasher: a seeded [`FxHasher`] over the raw bytes, folded to 32 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FxContentHasher {
    seed: u64,
}

impl FxContentHasher {
    /// Creates a hasher with seed 0.
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// Creates a hasher whose output depends on `seed`.
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the configured seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ContentHasher for FxContentHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u32 {
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.seed);
        hasher.write(bytes);
        fold(hasher.finish())
    }
}

/// Folds a 64-bit hash into 32 bits, keeping entropy from both halves.
#[inline]
pub fn fold(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}

/// Upper 16 bits of a full hash.
#[inline]
pub fn half_hash(full_hash: u32) -> u16 {
    (full_hash >> 16) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fx_hasher_is_deterministic() {
        let hasher = FxContentHasher::new();
        assert_eq!(hasher.hash_bytes(b"abc"), hasher.hash_bytes(b"abc"));
        assert_eq!(hasher.hash_bytes(b""), hasher.hash_bytes(b""));
    }

    #[test]
    fn fx_hasher_separates_nearby_inputs() {
        let hasher = FxContentHasher::new();
        assert_ne!(hasher.hash_bytes(b"abc"), hasher.hash_bytes(b"abd"));
        assert_ne!(hasher.hash_bytes(b"abc"), hasher.hash_bytes(b"ab"));
    }

    #[test]
    fn seed_changes_hash() {
        let a = FxContentHasher::with_seed(1);
        let b = FxContentHasher::with_seed(2);
        assert_eq!(a.seed(), 1);
        assert_ne!(a.hash_bytes(b"symbol"), b.hash_bytes(b"symbol"));
    }

    #[test]
    fn half_hash_takes_upper_bits() {
        assert_eq!(half_hash(0xDEAD_BEEF), 0xDEAD);
        assert_eq!(half_hash(0x0000_FFFF), 0);
    }

    #[test]
    fn fold_mixes_both_halves() {
        assert_eq!(fold(0x0000_0001_0000_0000), 1);
        assert_eq!(fold(0x0000_0000_0000_0002), 2);
        assert_eq!(fold(0x0000_0003_0000_0003), 0);
    }

    #[test]
    fn default_equality_is_bytewise() {
        let hasher = FxContentHasher::new();
        assert!(hasher.bytes_equal(b"x", b"x"));
        assert!(!hasher.bytes_equal(b"x", b"y"));
        assert!(hasher.bytes_equal(b"", b""));
    }
}
