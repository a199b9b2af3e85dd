//! Generation-by-generation catalog growth.

use tremor_core::{CatalogBuilder, CatalogParams, GenerationInfo, Rupture};
use tremor_stats::{calc_k_corr, gr_inv_rate, gr_rate, RngSource};

use crate::offspring::OffspringSampler;

/// Total Omori rates below this end the catalog instead of feeding a
/// divide-by-zero into parent selection.
pub const TINY_OMORI_RATE: f64 = 1.0e-150;

/// Expected generation sizes below this end the catalog.
pub const SMALL_EXPECTED_COUNT: f64 = 0.001;

/// Grows a seeded catalog one generation at a time until a stop
/// condition fires.
///
/// One generator per worker, reused across catalogs: the scratch
/// buffers inside survive between runs. The driving loop is
///
/// ```text
/// seeder fills generation 0
/// while calc_next_gen(..) > 0 {}
/// builder.end_catalog()
/// ```
///
/// or just [`calc_all_gen`](Self::calc_all_gen), which does all three.
#[derive(Debug, Default)]
pub struct CatalogGenerator {
    sampler: OffspringSampler,
}

impl CatalogGenerator {
    /// A fresh generator with empty scratch buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to grow one more generation onto an open catalog whose
    /// last generation is complete. Returns the new generation's size;
    /// 0 means a stop condition fired, no generation was added, and the
    /// caller should end the catalog.
    ///
    /// Stop conditions: the generation cap is reached, the last
    /// generation is empty, the total offspring rate is negligible
    /// ([`TINY_OMORI_RATE`]), the expected size is negligible
    /// ([`SMALL_EXPECTED_COUNT`]), or the Poisson draw comes up 0.
    ///
    /// # Panics
    ///
    /// Panics if the storage has no completed generation (the seeder
    /// must run first).
    pub fn calc_next_gen<B: CatalogBuilder + ?Sized>(
        &mut self,
        store: &mut B,
        rng: &mut RngSource,
    ) -> usize {
        let params = store.params();
        let gen_count = store.gen_count();
        assert!(gen_count > 0, "calc_next_gen: catalog has no seed generation");
        if gen_count >= params.gen_count_max {
            return 0;
        }
        let i_cur = gen_count - 1;
        if store.gen_size(i_cur) == 0 {
            return 0;
        }

        let total = self.sampler.accumulate_rates(store, i_cur, &params);
        if total < TINY_OMORI_RATE {
            return 0;
        }

        let (mag_min, expected) = solve_gen_mag_min(total, &params);
        if expected < SMALL_EXPECTED_COUNT {
            return 0;
        }

        let size = self.sampler.assign_parents(expected, rng);
        if size == 0 {
            return 0;
        }

        let mag_max = params.mag_max_sim;
        store.begin_generation(&GenerationInfo::new(size, mag_min, mag_max));
        let mut parent = Rupture::default();
        for j in 0..store.gen_size(i_cur) {
            let n_children = self.sampler.child_counts()[j];
            if n_children == 0 {
                continue;
            }
            store.rupture(i_cur, j, &mut parent);
            for _ in 0..n_children {
                let t_day = rng.omori_sample_shifted(
                    params.p,
                    params.c,
                    parent.t_day,
                    params.tbegin,
                    params.tend,
                );
                let rup_mag = rng.gr_sample(params.b, mag_min, mag_max);
                store.add_rup(&Rupture {
                    t_day,
                    rup_mag,
                    k_prod: calc_k_corr(rup_mag, &params, mag_min, mag_max),
                    rup_parent: j as i32,
                    x_km: parent.x_km,
                    y_km: parent.y_km,
                });
            }
        }
        store.end_generation();
        size
    }

    /// Grow generations until a stop condition fires, then end the
    /// catalog. Returns the total rupture count, seeds included.
    pub fn calc_all_gen<B: CatalogBuilder + ?Sized>(
        &mut self,
        store: &mut B,
        rng: &mut RngSource,
    ) -> usize {
        while self.calc_next_gen(store, rng) > 0 {}
        store.end_catalog();
        store.size()
    }
}

/// Choose the next generation's minimum magnitude: the value at which
/// the expected size equals `gen_size_target`, clamped into
/// `[mag_min_lo, mag_min_hi]`. Returns the magnitude and the expected
/// size at it, which diverges from the target whenever the clamp binds.
fn solve_gen_mag_min(total_rate: f64, params: &CatalogParams) -> (f64, f64) {
    let target_rate = params.gen_size_target as f64 / total_rate;
    let mag_min = gr_inv_rate(params.b, params.mref, params.mag_max_sim, target_rate)
        .clamp(params.mag_min_lo, params.mag_min_hi);
    let expected = total_rate * gr_rate(params.b, params.mref, mag_min, params.mag_max_sim);
    (mag_min, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_catalog::CatalogStorage;
    use tremor_core::CatalogView;
    use tremor_stats::calc_k_uncorr;

    fn seeded(params: &CatalogParams, mag: f64) -> CatalogStorage {
        let mut store = CatalogStorage::new();
        store.begin_catalog(params);
        store.begin_generation(&GenerationInfo::new(1, mag, mag));
        store.add_rup(&Rupture::seed(
            0.0,
            mag,
            calc_k_uncorr(mag, params.a, params.alpha, params.mref),
            10.0,
            -4.0,
        ));
        store.end_generation();
        store
    }

    #[test]
    fn mag_min_solve_hits_target_when_unclamped() {
        let params = CatalogParams::default();
        // A total rate large enough that the solved magnitude lands
        // strictly inside [mag_min_lo, mag_min_hi].
        let total = 2.0;
        let (mag_min, expected) = solve_gen_mag_min(total, &params);
        assert!(mag_min > params.mag_min_lo && mag_min < params.mag_min_hi);
        let rel = (expected - params.gen_size_target as f64).abs() / params.gen_size_target as f64;
        assert!(rel < 1.0e-12, "expected {expected}");
    }

    #[test]
    fn mag_min_solve_clamps_and_diverges() {
        let params = CatalogParams::default();
        // A tiny total rate pushes the solved magnitude below the lower
        // bound; the clamp binds and the expected size falls short.
        let (mag_min, expected) = solve_gen_mag_min(1.0e-6, &params);
        assert_eq!(mag_min, params.mag_min_lo);
        assert!(expected < params.gen_size_target as f64);
    }

    #[test]
    fn children_link_to_valid_parents() {
        let params = CatalogParams::default();
        let mut store = seeded(&params, 7.0);
        let mut gen = CatalogGenerator::new();
        let mut rng = RngSource::from_seed(8);
        let size = gen.calc_next_gen(&mut store, &mut rng);
        assert!(size > 0, "an M7 seed must spawn offspring");
        store.end_catalog();

        let parents = store.gen_size(0);
        let mut rup = Rupture::default();
        for j in 0..store.gen_size(1) {
            store.rupture(1, j, &mut rup);
            assert!((rup.rup_parent as usize) < parents);
            assert!((params.tbegin..=params.tend).contains(&rup.t_day));
            assert!(rup.rup_mag <= params.mag_max_sim);
            assert!(rup.k_prod > 0.0);
            // Temporal-only variant: location is inherited verbatim.
            assert_eq!(rup.x_km, 10.0);
            assert_eq!(rup.y_km, -4.0);
        }
    }

    #[test]
    fn generation_cap_stops_growth() {
        let params = CatalogParams {
            gen_count_max: 3,
            ..CatalogParams::default()
        };
        let mut store = seeded(&params, 8.0);
        let mut gen = CatalogGenerator::new();
        let mut rng = RngSource::from_seed(12);
        gen.calc_all_gen(&mut store, &mut rng);
        assert!(store.gen_count() <= 3);
    }

    #[test]
    fn negligible_seed_ends_immediately() {
        let params = CatalogParams::default();
        let mut store = CatalogStorage::new();
        store.begin_catalog(&params);
        store.begin_generation(&GenerationInfo::new(1, 1.0, 1.0));
        // A productivity of 0 contributes no rate at all.
        store.add_rup(&Rupture::seed(0.0, 1.0, 0.0, 0.0, 0.0));
        store.end_generation();

        let mut gen = CatalogGenerator::new();
        let mut rng = RngSource::from_seed(5);
        assert_eq!(gen.calc_next_gen(&mut store, &mut rng), 0);
        store.end_catalog();
        assert_eq!(store.gen_count(), 1);
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let params = CatalogParams::default();
        let sizes = |seed: u64| {
            let mut store = seeded(&params, 6.5);
            let mut gen = CatalogGenerator::new();
            let mut rng = RngSource::from_seed(seed);
            gen.calc_all_gen(&mut store, &mut rng);
            (0..store.gen_count())
                .map(|i| store.gen_size(i))
                .collect::<Vec<_>>()
        };
        assert_eq!(sizes(777), sizes(777));
        // and not merely constant:
        assert!(sizes(777).len() > 1 || sizes(778).len() > 1);
    }
}
