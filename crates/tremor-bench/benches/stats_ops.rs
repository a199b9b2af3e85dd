//! Criterion micro-benchmarks for the statistical engine hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tremor_bench::bench_params;
use tremor_stats::{
    calc_branch_ratio, calc_k_corr, gr_rescale, omext_double_integral, omori_rate,
    omori_rescale, RngSource,
};

fn bench_omori(c: &mut Criterion) {
    let mut group = c.benchmark_group("omori");
    group.bench_function("rate_regular", |b| {
        b.iter(|| omori_rate(black_box(1.1), 0.05, 1.0, 366.0))
    });
    group.bench_function("rate_singular_p", |b| {
        b.iter(|| omori_rate(black_box(1.0), 0.05, 1.0, 366.0))
    });
    group.bench_function("rescale", |b| {
        b.iter(|| omori_rescale(black_box(1.1), 0.05, 1.0, 366.0, 0.37))
    });
    group.finish();
}

fn bench_gr_and_prod(c: &mut Criterion) {
    let params = bench_params();
    let mut group = c.benchmark_group("gr_prod");
    group.bench_function("gr_rescale", |b| {
        b.iter(|| gr_rescale(black_box(1.0), 2.5, 9.0, 0.37))
    });
    group.bench_function("k_corr", |b| {
        b.iter(|| calc_k_corr(black_box(5.0), &params, 2.5, 9.0))
    });
    group.bench_function("branch_ratio", |b| {
        b.iter(|| calc_branch_ratio(black_box(&params)))
    });
    group.finish();
}

fn bench_omext(c: &mut Criterion) {
    let mut group = c.benchmark_group("omext");
    group.bench_function("double_regular", |b| {
        b.iter(|| omext_double_integral(black_box(1.4), 0.05, 0.0, 10.0, 20.0, 300.0))
    });
    group.bench_function("double_singular_p1", |b| {
        b.iter(|| omext_double_integral(black_box(1.0), 0.05, 0.0, 10.0, 20.0, 300.0))
    });
    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    group.bench_function("poisson_small_mean", |b| {
        let mut rng = RngSource::from_seed(1);
        b.iter(|| rng.poisson_sample_checked(black_box(4.0)))
    });
    group.bench_function("poisson_large_mean", |b| {
        let mut rng = RngSource::from_seed(2);
        b.iter(|| rng.poisson_sample_checked(black_box(300.0)))
    });
    group.bench_function("cumulative_sample_1k", |b| {
        let cum: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
        let mut rng = RngSource::from_seed(3);
        b.iter(|| rng.cumulative_sample(black_box(&cum), 1000))
    });
    group.finish();
}

criterion_group!(benches, bench_omori, bench_gr_and_prod, bench_omext, bench_sampling);
criterion_main!(benches);
