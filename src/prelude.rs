pub use crate::bcache::{Bcache, BcacheId, DEFAULT_CHAIN_LENGTH_THRESHOLD};
pub use crate::builder::BcacheBuilder;
pub use crate::error::{BcacheError, ConfigError, InvariantError, MAX_PAYLOAD_LEN};
pub use crate::hash::{ContentHasher, FxContentHasher};
pub use crate::stats::BcacheStats;

#[cfg(feature = "metrics")]
pub use crate::metrics::{MetricsExporter, MetricsSnapshotProvider, PrometheusTextExporter};
