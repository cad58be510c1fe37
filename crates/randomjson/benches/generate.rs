//! Benchmark – document generation and mutation throughput
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use randomjson::{Document, GeneratorOptions};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.measurement_time(Duration::from_secs(5));

    for &size in &[64usize, 4_096, 1 << 20] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                let bytes = randomjson::generate(&GeneratorOptions::sized(size, seed)).unwrap();
                black_box(bytes);
            });
        });
    }
    group.finish();
}

fn bench_mutate(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutate");

    for &size in &[4_096usize, 1 << 20] {
        let mut doc = Document::new(GeneratorOptions::sized(size, 1).with_mutation_seed(2)).unwrap();
        group.bench_with_input(BenchmarkId::new("structure", size), &size, |b, _| {
            b.iter(|| black_box(doc.mutate_structure()));
        });
        group.bench_with_input(BenchmarkId::new("bytes", size), &size, |b, _| {
            b.iter(|| {
                black_box(doc.mutate_bytes(8));
                doc.revert_last_mutation()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_mutate);
criterion_main!(benches);
