//! Shared helpers for the Tremor benchmark suite.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use tremor_catalog::CatalogStorage;
use tremor_core::CatalogParams;
use tremor_gen::{CatalogGenerator, FixedSeeder, SeedComm, Seeder};
use tremor_stats::{calc_inv_branch_ratio, RngSource};

/// The benchmark parameter set: one-year window, branch ratio 0.8.
pub fn bench_params() -> CatalogParams {
    let mut params = CatalogParams {
        p: 1.0,
        c: 0.05,
        b: 1.0,
        alpha: 1.0,
        tbegin: 1.0,
        tend: 366.0,
        gen_size_target: 300,
        gen_count_max: 100,
        ..CatalogParams::default()
    };
    params.a = calc_inv_branch_ratio(0.8, &params);
    params
}

/// Generate one complete catalog from an M6 mainshock into `store`.
pub fn generate_catalog(store: &mut CatalogStorage, rng: &mut RngSource) {
    let mut seeder = FixedSeeder::single(bench_params(), 0.0, 6.0);
    let mut generator = CatalogGenerator::new();
    seeder.open();
    seeder.seed_catalog(&mut SeedComm {
        builder: store,
        rng,
    });
    generator.calc_all_gen(store, rng);
    seeder.close();
}
