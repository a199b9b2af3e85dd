//! The catalog walker and its sterile-rupture infill.

use tremor_core::{CatalogView, GenerationInfo, Rupture};
use tremor_gen::{OffspringSampler, SMALL_EXPECTED_COUNT, TINY_OMORI_RATE};
use tremor_stats::{gr_rate, RngSource};

use crate::consumer::{CatalogConsumer, ScanComm};

/// Walks finished catalogs and streams them to a fixed set of
/// consumers.
///
/// One scanner per worker thread; it owns the worker's private
/// consumers (one per registered accumulator) and the scratch sampler
/// used for sterile infill, both reused across catalogs.
pub struct CatalogScanner {
    consumers: Vec<Box<dyn CatalogConsumer>>,
    sampler: OffspringSampler,
}

impl CatalogScanner {
    /// A scanner over the given consumers. Event delivery follows the
    /// order of this list.
    pub fn new(consumers: Vec<Box<dyn CatalogConsumer>>) -> Self {
        Self {
            consumers,
            sampler: OffspringSampler::new(),
        }
    }

    /// Open every consumer. Call once before the first catalog.
    pub fn open(&mut self) {
        for c in &mut self.consumers {
            c.open();
        }
    }

    /// Close every consumer. Call once after the last catalog; this is
    /// where consumers merge partial results into their accumulators.
    pub fn close(&mut self) {
        for c in &mut self.consumers {
            c.close();
        }
    }

    /// Stream one finished catalog through the full callback sequence.
    ///
    /// `rng` drives the sterile infill draws; a scan that requests no
    /// sterile ruptures never touches it.
    ///
    /// # Panics
    ///
    /// Panics if the catalog has no generations.
    pub fn scan(&mut self, view: &dyn CatalogView, rng: &mut RngSource) {
        assert!(view.gen_count() > 0, "scan: catalog has no generations");
        let params = view.params();
        let consumers = &mut self.consumers;

        for c in consumers.iter_mut() {
            c.begin_catalog(view);
        }

        let mut info = GenerationInfo::default();
        let mut rup = Rupture::default();

        view.gen_info(0, &mut info);
        for c in consumers.iter_mut() {
            c.begin_seed_generation(view, &info);
        }
        for j in 0..view.gen_size(0) {
            view.rupture(0, j, &mut rup);
            for c in consumers.iter_mut() {
                c.next_seed_rup(j, &rup);
            }
        }
        for c in consumers.iter_mut() {
            c.end_seed_generation(view);
        }

        for i_gen in 1..view.gen_count() {
            view.gen_info(i_gen, &mut info);
            let mut comm = ScanComm::new(view, params, i_gen, info);
            for c in consumers.iter_mut() {
                c.begin_generation(&mut comm);
            }
            for j in 0..view.gen_size(i_gen) {
                view.rupture(i_gen, j, &mut rup);
                for c in consumers.iter_mut() {
                    c.next_rup(&comm, j, &rup);
                }
            }
            infill_sterile(&mut self.sampler, consumers, &comm, rng);
            for c in consumers.iter_mut() {
                c.end_generation(&comm);
            }
        }

        for c in consumers.iter_mut() {
            c.end_catalog(view);
        }
    }
}

impl std::fmt::Debug for CatalogScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogScanner")
            .field("consumers", &self.consumers.len())
            .finish_non_exhaustive()
    }
}

/// Synthesize the requested sub-threshold ruptures for the generation
/// under scan and stream them to every consumer.
///
/// Re-runs the generator's offspring sampling against the *previous*
/// generation, restricted to the band `[sterile_mag, gen_mag_min)`.
/// The synthetic ruptures carry `k_prod = 0` so they can never act as
/// parents, and their indices continue after the stored ruptures'.
fn infill_sterile(
    sampler: &mut OffspringSampler,
    consumers: &mut [Box<dyn CatalogConsumer>],
    comm: &ScanComm<'_>,
    rng: &mut RngSource,
) {
    let Some(sterile_mag) = comm.sterile_mag() else {
        return;
    };
    let view = comm.view();
    let params = *comm.params();
    let i_prev = comm.i_gen() - 1;
    let mag_hi = comm.gen_info().gen_mag_min;

    let total = sampler.accumulate_rates(view, i_prev, &params);
    if total < TINY_OMORI_RATE {
        return;
    }
    let expected = total * gr_rate(params.b, params.mref, sterile_mag, mag_hi);
    if expected < SMALL_EXPECTED_COUNT {
        return;
    }
    if sampler.assign_parents(expected, rng) == 0 {
        return;
    }

    let mut j_rup = view.gen_size(comm.i_gen());
    let mut parent = Rupture::default();
    for j_parent in 0..view.gen_size(i_prev) {
        let n_children = sampler.child_counts()[j_parent];
        if n_children == 0 {
            continue;
        }
        view.rupture(i_prev, j_parent, &mut parent);
        for _ in 0..n_children {
            let t_day = rng.omori_sample_shifted(
                params.p,
                params.c,
                parent.t_day,
                params.tbegin,
                params.tend,
            );
            let rup = Rupture {
                t_day,
                rup_mag: rng.gr_sample(params.b, sterile_mag, mag_hi),
                k_prod: 0.0,
                rup_parent: j_parent as i32,
                x_km: parent.x_km,
                y_km: parent.y_km,
            };
            for c in consumers.iter_mut() {
                c.next_sterile_rup(comm, j_rup, &rup);
            }
            j_rup += 1;
        }
    }
}
