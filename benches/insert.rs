use bcache::Bcache;
use bcache::builder::BcacheBuilder;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_insert_unique(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_unique");
    for &count in &[1_000u64, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut cache = Bcache::new();
                for i in 0..count {
                    let _ = cache.insert(&i.to_le_bytes());
                }
                cache
            })
        });
    }
    group.finish();
}

fn bench_insert_hits(c: &mut Criterion) {
    let mut cache = Bcache::new();
    for i in 0u64..10_000 {
        let _ = cache.insert(&i.to_le_bytes());
    }
    c.bench_function("insert_hit_10k", |b| {
        b.iter(|| {
            for i in 0u64..10_000 {
                let _ = cache.insert(&i.to_le_bytes());
            }
        })
    });
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_length_threshold");
    for &threshold in &[1usize, 5, 20] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                b.iter(|| {
                    let mut cache = BcacheBuilder::new()
                        .chain_length_threshold(threshold)
                        .build();
                    for i in 0u64..50_000 {
                        let _ = cache.insert(&i.to_le_bytes());
                    }
                    cache
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_insert_unique, bench_insert_hits, bench_threshold);
criterion_main!(benches);
