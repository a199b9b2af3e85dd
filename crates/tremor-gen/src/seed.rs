//! Seeding contract: how generation 0 gets into a catalog.

use smallvec::SmallVec;

use tremor_core::{CatalogBuilder, CatalogParams, GenerationInfo, Rupture};
use tremor_stats::{calc_k_uncorr, RngSource};

/// Everything a [`Seeder`] needs to plant generation 0: the target
/// builder and the worker's random source.
pub struct SeedComm<'a> {
    /// The catalog under construction.
    pub builder: &'a mut dyn CatalogBuilder,
    /// The owning worker's random source.
    pub rng: &'a mut RngSource,
}

/// Produces the seed generation of each catalog.
///
/// `seed_catalog` must drive the builder through
/// `begin_catalog` → `begin_generation` → `add_rup` (at least once) →
/// `end_generation`, leaving the catalog open for the generator. A
/// seeder may be opened and closed repeatedly over its lifetime; one
/// seeder belongs to exactly one worker.
pub trait Seeder: Send {
    /// Prepare for a run of catalogs.
    fn open(&mut self);

    /// Plant generation 0 of one catalog.
    fn seed_catalog(&mut self, comm: &mut SeedComm<'_>);

    /// Finish a run of catalogs.
    fn close(&mut self);
}

/// A seeder that plants the same fixed mainshock list into every
/// catalog.
///
/// Productivity is the uncorrected value for each seed's magnitude:
/// seed magnitudes are observations, not draws from a simulation
/// window, so no window correction applies.
#[derive(Clone, Debug)]
pub struct FixedSeeder {
    params: CatalogParams,
    seeds: SmallVec<[Rupture; 4]>,
}

impl FixedSeeder {
    /// A seeder over `(t_day, mag, x_km, y_km)` mainshocks.
    ///
    /// # Panics
    ///
    /// Panics if `mainshocks` is empty; a catalog needs at least one
    /// seed rupture.
    pub fn new(params: CatalogParams, mainshocks: &[(f64, f64, f64, f64)]) -> Self {
        assert!(!mainshocks.is_empty(), "FixedSeeder: no mainshocks given");
        let seeds = mainshocks
            .iter()
            .map(|&(t_day, mag, x_km, y_km)| {
                Rupture::seed(
                    t_day,
                    mag,
                    calc_k_uncorr(mag, params.a, params.alpha, params.mref),
                    x_km,
                    y_km,
                )
            })
            .collect();
        Self { params, seeds }
    }

    /// A seeder over a single mainshock at the catalog origin.
    pub fn single(params: CatalogParams, t_day: f64, mag: f64) -> Self {
        Self::new(params, &[(t_day, mag, 0.0, 0.0)])
    }

    /// The catalog parameters every seeded catalog runs under.
    pub fn params(&self) -> &CatalogParams {
        &self.params
    }
}

impl Seeder for FixedSeeder {
    fn open(&mut self) {}

    fn seed_catalog(&mut self, comm: &mut SeedComm<'_>) {
        let mut mag_min = f64::INFINITY;
        let mut mag_max = f64::NEG_INFINITY;
        for seed in &self.seeds {
            mag_min = mag_min.min(seed.rup_mag);
            mag_max = mag_max.max(seed.rup_mag);
        }
        comm.builder.begin_catalog(&self.params);
        comm.builder
            .begin_generation(&GenerationInfo::new(self.seeds.len(), mag_min, mag_max));
        for seed in &self.seeds {
            comm.builder.add_rup(seed);
        }
        comm.builder.end_generation();
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_catalog::CatalogStorage;
    use tremor_core::CatalogView;

    #[test]
    fn plants_seed_generation_and_leaves_catalog_open() {
        let params = CatalogParams::default();
        let mut seeder = FixedSeeder::new(params, &[(0.0, 6.0, 1.0, 2.0), (0.5, 5.0, -1.0, 0.0)]);
        let mut store = CatalogStorage::new();
        let mut rng = RngSource::from_seed(1);

        seeder.open();
        seeder.seed_catalog(&mut SeedComm {
            builder: &mut store,
            rng: &mut rng,
        });
        seeder.close();

        assert_eq!(store.gen_count(), 1);
        assert_eq!(store.gen_size(0), 2);
        let mut info = GenerationInfo::default();
        store.gen_info(0, &mut info);
        assert_eq!(info.gen_mag_min, 5.0);
        assert_eq!(info.gen_mag_max, 6.0);

        let mut rup = Rupture::default();
        store.rupture(0, 0, &mut rup);
        assert!(rup.is_seed());
        let k = calc_k_uncorr(6.0, params.a, params.alpha, params.mref);
        assert_eq!(rup.k_prod, k);

        // Still open: the generator appends the next generation.
        store.begin_generation(&GenerationInfo::new(0, 2.0, 9.0));
        store.end_generation();
        store.end_catalog();
    }

    #[test]
    fn reseeding_resets_the_catalog() {
        let params = CatalogParams::default();
        let mut seeder = FixedSeeder::single(params, 0.0, 6.0);
        let mut store = CatalogStorage::new();
        let mut rng = RngSource::from_seed(2);
        for _ in 0..3 {
            seeder.seed_catalog(&mut SeedComm {
                builder: &mut store,
                rng: &mut rng,
            });
            store.end_catalog();
            assert_eq!(store.gen_count(), 1);
            assert_eq!(store.size(), 1);
        }
    }

    #[test]
    #[should_panic(expected = "no mainshocks")]
    fn empty_mainshock_list_aborts() {
        FixedSeeder::new(CatalogParams::default(), &[]);
    }
}
