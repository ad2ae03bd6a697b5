//! Error types for the bcache library.
//!
//! ## Key Components
//!
//! - [`BcacheError`]: Returned by insert operations when a payload cannot be
//!   stored (currently only payloads longer than [`MAX_PAYLOAD_LEN`]).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`Bcache::check_invariants`).
//! - [`ConfigError`]: Returned when builder parameters are invalid
//!   (e.g. a zero chain-length threshold).
//!
//! Allocation failure is not modelled: like any Rust collection, the cache
//! aborts when the global allocator fails.
//!
//! ## Example Usage
//!
//! ```
//! use bcache::Bcache;
//! use bcache::error::{BcacheError, MAX_PAYLOAD_LEN};
//!
//! let mut cache = Bcache::new();
//! let too_big = vec![0u8; MAX_PAYLOAD_LEN + 1];
//! assert_eq!(
//!     cache.insert(&too_big).unwrap_err(),
//!     BcacheError::PayloadTooLarge { len: MAX_PAYLOAD_LEN + 1, max: MAX_PAYLOAD_LEN },
//! );
//! ```

use std::fmt;

/// Longest payload a single entry can hold.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// BcacheError
// ---------------------------------------------------------------------------

/// Error returned when a payload cannot be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcacheError {
    /// The payload length does not fit the entry length field.
    PayloadTooLarge { len: usize, max: usize },
}

impl fmt::Display for BcacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BcacheError::PayloadTooLarge { len, max } => {
                write!(f, "payload of {} bytes exceeds the {} byte entry limit", len, max)
            },
        }
    }
}

impl std::error::Error for BcacheError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`Bcache::check_invariants`](crate::Bcache::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`BcacheBuilder::try_build`](crate::builder::BcacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use bcache::builder::BcacheBuilder;
///
/// let err = BcacheBuilder::new().chain_length_threshold(0).try_build().unwrap_err();
/// assert!(err.to_string().contains("threshold"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- BcacheError ------------------------------------------------------

    #[test]
    fn payload_too_large_display_names_sizes() {
        let err = BcacheError::PayloadTooLarge {
            len: 70000,
            max: MAX_PAYLOAD_LEN,
        };
        let msg = err.to_string();
        assert!(msg.contains("70000"));
        assert!(msg.contains("65535"));
    }

    #[test]
    fn bcache_error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<BcacheError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("chain population mismatch");
        assert_eq!(err.to_string(), "chain population mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("stale half hash");
        assert_eq!(err.message(), "stale half hash");
        assert_eq!(err.clone(), err);
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("arena chunk size must be > 0");
        assert_eq!(err.to_string(), "arena chunk size must be > 0");
    }

    #[test]
    fn config_debug_includes_message() {
        let err = ConfigError::new("bad threshold");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("bad threshold"));
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }
}
