//! Symbol-table style workloads.
//!
//! Run with: `cargo bench --bench workloads`
//!
//! Generates mangled-looking names with a skewed reuse pattern (a few hot
//! names such as `int`/`char` and a long tail of one-off symbols) and measures
//! insert throughput. The statistics report for each workload is printed once
//! so dedup ratios can be compared alongside the timings.

use bcache::Bcache;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const OPS: usize = 200_000;
const SEED: u64 = 42;

const HOT_NAMES: &[&str] = &[
    "int",
    "char",
    "unsigned int",
    "long",
    "void",
    "size_t",
    "std::string",
    "bool",
];

fn symbol_stream(ops: usize, hot_prob: f64, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..ops)
        .map(|_| {
            if rng.gen_bool(hot_prob) {
                HOT_NAMES[rng.gen_range(0..HOT_NAMES.len())].to_string()
            } else {
                let ns: u32 = rng.gen_range(0..64);
                let id: u32 = rng.gen_range(0..(ops as u32 / 4));
                format!("_ZN2ns{}4func{}Ev", ns, id)
            }
        })
        .collect()
}

fn bench_symbol_workloads(c: &mut Criterion) {
    let mut group = c.benchmark_group("symbols");
    group.throughput(Throughput::Elements(OPS as u64));
    for &(name, hot_prob) in &[("hot_10", 0.1), ("hot_50", 0.5), ("hot_90", 0.9)] {
        let stream = symbol_stream(OPS, hot_prob, SEED);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut cache = Bcache::new();
                for symbol in &stream {
                    let _ = cache.insert_str(symbol);
                }
                cache
            })
        });

        let mut cache = Bcache::new();
        for symbol in &stream {
            let _ = cache.insert_str(symbol);
        }
        let mut report = Vec::new();
        let _ = cache.print_statistics(name, &mut report);
        println!("{}", String::from_utf8_lossy(&report));
    }
    group.finish();
}

criterion_group!(benches, bench_symbol_workloads);
criterion_main!(benches);
