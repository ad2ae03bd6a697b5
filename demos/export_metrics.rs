use bcache::Bcache;
use bcache::metrics::{MetricsExporter, MetricsSnapshotProvider, PrometheusTextExporter};

fn main() {
    let mut cache = Bcache::new();
    for word in "the quick brown fox jumps over the lazy dog the end".split(' ') {
        cache.insert_str(word).unwrap();
    }

    let exporter = PrometheusTextExporter::new("bcache", std::io::stdout());
    exporter.export(&cache.snapshot());
}
