//! Criterion benchmarks for whole-catalog generation and scanning.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tremor_bench::generate_catalog;
use tremor_catalog::CatalogStorage;
use tremor_scan::{Accumulator, CatalogScanner, MagBinAccumulator, SizeAccumulator};
use tremor_stats::RngSource;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);
    group.bench_function("m6_catalog_reused_storage", |b| {
        let mut store = CatalogStorage::new();
        let mut rng = RngSource::from_seed(7);
        b.iter(|| {
            generate_catalog(&mut store, &mut rng);
            black_box(store.size())
        })
    });
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut store = CatalogStorage::new();
    let mut rng = RngSource::from_seed(11);
    generate_catalog(&mut store, &mut rng);

    let mut group = c.benchmark_group("scan");
    group.bench_function("size_only", |b| {
        let acc = SizeAccumulator::new();
        acc.begin_accumulation(1);
        let mut scanner = CatalogScanner::new(vec![acc.make_consumer()]);
        scanner.open();
        b.iter(|| scanner.scan(black_box(&store), &mut rng));
        scanner.close();
        acc.end_accumulation();
    });
    group.bench_function("mag_bins_with_sterile_infill", |b| {
        let acc = MagBinAccumulator::new(2.0, 0.1, 70);
        acc.begin_accumulation(1);
        let mut scanner = CatalogScanner::new(vec![acc.make_consumer()]);
        scanner.open();
        b.iter(|| scanner.scan(black_box(&store), &mut rng));
        scanner.close();
        acc.end_accumulation();
    });
    group.finish();
}

criterion_group!(benches, bench_generate, bench_scan);
criterion_main!(benches);
