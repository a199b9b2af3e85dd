//! Reusable offspring-sampling workspace.

use tremor_core::{CatalogParams, CatalogView, Rupture};
use tremor_stats::{omori_rate_shifted, RngSource};

/// Scratch workspace for sampling one generation's offspring from a
/// finished parent generation.
///
/// Holds the per-parent cumulative Omori rates and assigned child
/// counts. Buffers grow by doubling and are retained across calls, so
/// one sampler per worker serves every generation of every catalog
/// without reallocation once warm.
#[derive(Debug, Default)]
pub struct OffspringSampler {
    cum_rate: Vec<f64>,
    child_count: Vec<u32>,
    len: usize,
    total_rate: f64,
}

impl OffspringSampler {
    /// An empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate the Omori rate contribution of every rupture in
    /// generation `i_gen` onto the forecast window, scaled by each
    /// rupture's productivity.
    ///
    /// Fills the cumulative-rate buffer, zeroes the child counters, and
    /// returns the total rate. Sterile ruptures (`k_prod == 0`)
    /// contribute nothing and are never chosen as parents.
    pub fn accumulate_rates<V: CatalogView + ?Sized>(
        &mut self,
        view: &V,
        i_gen: usize,
        params: &CatalogParams,
    ) -> f64 {
        let len = view.gen_size(i_gen);
        self.reserve(len);
        self.len = len;

        let mut rup = Rupture::default();
        let mut total = 0.0;
        for j in 0..len {
            view.rupture(i_gen, j, &mut rup);
            total += rup.k_prod
                * omori_rate_shifted(
                    params.p,
                    params.c,
                    rup.t_day,
                    params.teps,
                    params.tbegin,
                    params.tend,
                );
            self.cum_rate[j] = total;
            self.child_count[j] = 0;
        }
        self.total_rate = total;
        total
    }

    /// Total rate from the last [`accumulate_rates`](Self::accumulate_rates) call.
    pub fn total_rate(&self) -> f64 {
        self.total_rate
    }

    /// Draw the actual offspring count for the given expected count and
    /// assign each child to a parent with probability proportional to
    /// the parent's rate contribution. Returns the drawn count.
    ///
    /// # Panics
    ///
    /// Panics if called before [`accumulate_rates`](Self::accumulate_rates)
    /// or if the accumulated total rate is 0 but a nonzero count is drawn.
    pub fn assign_parents(&mut self, expected: f64, rng: &mut RngSource) -> usize {
        let size = rng.poisson_sample_checked(expected) as usize;
        for _ in 0..size {
            let parent = rng.cumulative_sample(&self.cum_rate, self.len);
            self.child_count[parent] += 1;
        }
        size
    }

    /// Child counts per parent from the last
    /// [`assign_parents`](Self::assign_parents) call.
    pub fn child_counts(&self) -> &[u32] {
        &self.child_count[..self.len]
    }

    fn reserve(&mut self, len: usize) {
        if len > self.cum_rate.len() {
            let cap = len.max(self.cum_rate.len() * 2);
            self.cum_rate.resize(cap, 0.0);
            self.child_count.resize(cap, 0);
        }
    }
}
