//! # Metrics Traits
//!
//! Separates *snapshotting* from *export* so that monitoring stays decoupled
//! from the cache itself.
//!
//! ```text
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │───►│ MetricsExporter<S>           │
//!   │ Bcache::snapshot()           │    │ PrometheusTextExporter       │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! The cache keeps its counters as plain fields (it is single-threaded), so
//! there is no recorder layer: a snapshot is simply [`Bcache::stats`].
//!
//! [`Bcache::stats`]: crate::Bcache::stats

/// Snapshot provider for bench/testing and exporters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
