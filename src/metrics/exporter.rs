use std::io::Write;
use std::sync::Mutex;

use crate::metrics::traits::MetricsExporter;
use crate::stats::BcacheStats;

/// Prometheus text exporter for cache statistics snapshots.
///
/// This exporter writes in the Prometheus text exposition format so it can be
/// scraped by Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", &self.metric_name(suffix), value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<BcacheStats> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &BcacheStats) {
        self.write_counter("insert_calls_total", snapshot.total_count);
        self.write_counter("insert_bytes_total", snapshot.total_size);
        self.write_counter("hash_computations_total", snapshot.hash_count());
        self.write_counter("half_hash_misses_total", snapshot.half_hash_miss_count);
        self.write_counter("table_expands_total", snapshot.expand_count);

        self.write_gauge("unique_entries", snapshot.unique_count);
        self.write_gauge("unique_bytes", snapshot.unique_size);
        self.write_gauge("structure_bytes", snapshot.structure_size);
        self.write_gauge("arena_bytes", snapshot.memory_used as u64);
        self.write_gauge("buckets", snapshot.bucket_count as u64);
        self.write_gauge("occupied_buckets", snapshot.occupied_buckets as u64);
        self.write_gauge("max_chain_length", snapshot.max_chain_length as u64);
        self.write_gauge("max_entry_bytes", snapshot.max_entry_size as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::traits::MetricsSnapshotProvider;
    use crate::Bcache;

    #[test]
    fn exports_prefixed_counters_and_gauges() {
        let mut cache = Bcache::new();
        cache.insert(b"abc").unwrap();
        cache.insert(b"abc").unwrap();

        let exporter = PrometheusTextExporter::new("symbols", Vec::new());
        exporter.export(&cache.snapshot());
        let text = String::from_utf8(exporter.into_inner()).unwrap();

        assert!(text.contains("# TYPE symbols_insert_calls_total counter\nsymbols_insert_calls_total 2\n"));
        assert!(text.contains("# TYPE symbols_unique_entries gauge\nsymbols_unique_entries 1\n"));
        assert!(text.contains("symbols_buckets 1021\n"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&BcacheStats::default());
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\ninsert_calls_total 0\n"));
        assert!(text.starts_with("# TYPE insert_calls_total counter\n"));
    }
}
