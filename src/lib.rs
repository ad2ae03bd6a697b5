//! bcache: content-addressed byte-string cache with stable identity handles.
//!
//! See the [`bcache`] module docs for the table layout, growth policy and
//! invariants.

pub mod bcache;
pub mod builder;
pub mod ds;
pub mod error;
pub mod hash;
pub mod stats;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use bcache::{Bcache, BcacheId};
