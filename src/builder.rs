//! Builder for configured [`Bcache`] instances.
//!
//! Most callers want [`Bcache::new`]; the builder exists for tuning the
//! growth threshold, the arena chunk size, or plugging in a custom
//! [`ContentHasher`].
//!
//! ## Example
//!
//! ```rust
//! use bcache::builder::BcacheBuilder;
//! use bcache::hash::FxContentHasher;
//!
//! let mut cache = BcacheBuilder::new()
//!     .chain_length_threshold(3)
//!     .arena_chunk_size(16 * 1024)
//!     .hasher(FxContentHasher::with_seed(7))
//!     .build();
//! let id = cache.insert_bytes(b"printf").unwrap();
//! assert_eq!(cache.get(id), Some(&b"printf"[..]));
//! ```

use crate::bcache::{Bcache, DEFAULT_CHAIN_LENGTH_THRESHOLD};
use crate::ds::byte_arena::DEFAULT_CHUNK_SIZE;
use crate::error::ConfigError;
use crate::hash::{ContentHasher, FxContentHasher};

/// Configuration for a [`Bcache`].
#[derive(Debug, Clone)]
pub struct BcacheBuilder<H = FxContentHasher> {
    chain_length_threshold: usize,
    arena_chunk_size: usize,
    hasher: H,
}

impl BcacheBuilder<FxContentHasher> {
    /// Starts from the defaults: threshold 5, 4064-byte arena chunks,
    /// unseeded [`FxContentHasher`].
    pub fn new() -> Self {
        Self {
            chain_length_threshold: DEFAULT_CHAIN_LENGTH_THRESHOLD,
            arena_chunk_size: DEFAULT_CHUNK_SIZE,
            hasher: FxContentHasher::new(),
        }
    }
}

impl Default for BcacheBuilder<FxContentHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ContentHasher> BcacheBuilder<H> {
    /// Average chain length at which the bucket array grows.
    pub fn chain_length_threshold(mut self, threshold: usize) -> Self {
        self.chain_length_threshold = threshold;
        self
    }

    /// Bytes reserved per payload arena chunk.
    pub fn arena_chunk_size(mut self, bytes: usize) -> Self {
        self.arena_chunk_size = bytes;
        self
    }

    /// Replaces the content hasher.
    pub fn hasher<H2: ContentHasher>(self, hasher: H2) -> BcacheBuilder<H2> {
        BcacheBuilder {
            chain_length_threshold: self.chain_length_threshold,
            arena_chunk_size: self.arena_chunk_size,
            hasher,
        }
    }

    /// Validates the configuration and builds the cache.
    pub fn try_build(self) -> Result<Bcache<H>, ConfigError> {
        if self.chain_length_threshold == 0 {
            return Err(ConfigError::new("chain length threshold must be > 0"));
        }
        if self.arena_chunk_size == 0 {
            return Err(ConfigError::new("arena chunk size must be > 0"));
        }
        Ok(Bcache::from_parts(
            self.hasher,
            self.chain_length_threshold,
            self.arena_chunk_size,
        ))
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid; use [`try_build`](Self::try_build)
    /// for user-supplied parameters.
    pub fn build(self) -> Bcache<H> {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("invalid bcache configuration: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let cache = BcacheBuilder::new().build();
        assert_eq!(cache.chain_length_threshold(), DEFAULT_CHAIN_LENGTH_THRESHOLD);
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_threshold_rejected() {
        let err = BcacheBuilder::new()
            .chain_length_threshold(0)
            .try_build()
            .unwrap_err();
        assert!(err.message().contains("threshold"));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let err = BcacheBuilder::new()
            .arena_chunk_size(0)
            .try_build()
            .unwrap_err();
        assert!(err.message().contains("chunk"));
    }

    #[test]
    #[should_panic(expected = "invalid bcache configuration")]
    fn build_panics_on_invalid_config() {
        let _ = BcacheBuilder::new().chain_length_threshold(0).build();
    }

    #[test]
    fn huge_threshold_never_overflows_growth_check() {
        let mut cache = BcacheBuilder::new()
            .chain_length_threshold(usize::MAX)
            .build();
        for i in 0u32..3000 {
            cache.insert(&i.to_le_bytes()).unwrap();
        }
        assert_eq!(cache.bucket_count(), 1021);
        assert_eq!(cache.stats().expand_count, 1);
        assert_eq!(cache.len(), 3000);
    }

    #[test]
    fn threshold_whose_product_passes_u64_stays_at_first_size() {
        let threshold = usize::try_from(u64::MAX / 1021 + 1).unwrap_or(usize::MAX);
        let mut cache = BcacheBuilder::new()
            .chain_length_threshold(threshold)
            .try_build()
            .unwrap();
        cache.insert(b"first").unwrap();
        cache.insert(b"second").unwrap();
        assert_eq!(cache.bucket_count(), 1021);
        cache.debug_validate_invariants();
    }

    #[test]
    fn custom_threshold_is_applied() {
        let cache = BcacheBuilder::new().chain_length_threshold(2).build();
        assert_eq!(cache.chain_length_threshold(), 2);
    }
}
