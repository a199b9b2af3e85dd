//! Per-worker random-sampling source.
//!
//! Each worker thread owns exactly one [`RngSource`]; there is no
//! global mutable RNG state. Fresh sources are seeded from a
//! monotonically incremented process-wide counter mixed over a
//! wall-clock base (the clock is the fallback entropy; the counter
//! guarantees distinct seeds for sources created in the same tick).
//! Tests construct sources from explicit seeds for determinism.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::gr::gr_rescale;
use crate::omori::omori_rescale;

/// Floor applied to the uniform draw in [`cumulative_pick`], so a draw
/// of exactly 0 cannot select an index whose weight is 0.
const CUM_PICK_FLOOR: f64 = 1.0e-16;

/// Means below this use Knuth's multiplicative Poisson sampler; larger
/// means use Atkinson's logistic-envelope rejection sampler.
const POISSON_SPLIT_MEAN: f64 = 30.0;

fn next_seed() -> u64 {
    static BASE: OnceLock<u64> = OnceLock::new();
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let base = *BASE.get_or_init(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15)
    });
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    base.wrapping_add(n.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Choose an index from a non-decreasing cumulative-weight array, such
/// that index `v` is picked with probability proportional to
/// `weight(v) = cum_weights[v] - cum_weights[v - 1]`.
///
/// `u` is a uniform draw in `[0, 1)`; it is floored at `1e-16` so that
/// `u == 0` cannot land on a leading zero-weight entry. Only the first
/// `len` entries participate.
///
/// # Panics
///
/// Panics if `len == 0` or `len > cum_weights.len()`.
pub fn cumulative_pick(cum_weights: &[f64], len: usize, u: f64) -> usize {
    assert!(
        len > 0 && len <= cum_weights.len(),
        "cumulative_pick: bad length {len} for array of {}",
        cum_weights.len()
    );
    let total = cum_weights[len - 1];
    let target = u.max(CUM_PICK_FLOOR) * total;
    let idx = cum_weights[..len].partition_point(|&w| w < target);
    idx.min(len - 1)
}

/// A worker-owned random source over all the sampling distributions the
/// simulation needs.
pub struct RngSource {
    rng: ChaCha8Rng,
}

impl RngSource {
    /// A fresh source with a process-unique seed.
    pub fn new() -> Self {
        Self::from_seed(next_seed())
    }

    /// A source with an explicit seed, for deterministic runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform draw in `[lo, hi]`, clamped even under floating rounding.
    ///
    /// # Panics
    ///
    /// Panics if `hi < lo`.
    pub fn uniform_sample(&mut self, lo: f64, hi: f64) -> f64 {
        assert!(hi >= lo, "uniform_sample: inverted range [{lo}, {hi}]");
        (lo + self.uniform() * (hi - lo)).clamp(lo, hi)
    }

    /// Uniform integer draw in `[lo, hi]`, inclusive of both ends.
    ///
    /// # Panics
    ///
    /// Panics if `hi < lo`.
    pub fn uniform_int_sample(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(hi >= lo, "uniform_int_sample: inverted range [{lo}, {hi}]");
        self.rng.random_range(lo..=hi)
    }

    /// Poisson draw with the given mean.
    ///
    /// # Panics
    ///
    /// Panics if `mean` is negative or non-finite.
    pub fn poisson_sample(&mut self, mean: f64) -> u64 {
        assert!(
            mean >= 0.0 && mean.is_finite(),
            "poisson_sample: bad mean {mean}"
        );
        if mean == 0.0 {
            0
        } else if mean < POISSON_SPLIT_MEAN {
            self.poisson_knuth(mean)
        } else {
            self.poisson_atkinson(mean)
        }
    }

    /// Poisson draw capped at `round(mean + 10 * sqrt(mean + 1))`.
    ///
    /// The cap guards downstream array allocations against pathological
    /// tail draws; at 10 standard deviations it is effectively never hit
    /// by legitimate samples.
    pub fn poisson_sample_checked(&mut self, mean: f64) -> u64 {
        let cap = (mean + 10.0 * (mean + 1.0).sqrt()).round() as u64;
        self.poisson_sample(mean).min(cap)
    }

    /// Knuth's multiplicative method, O(mean) per draw.
    fn poisson_knuth(&mut self, mean: f64) -> u64 {
        let limit = (-mean).exp();
        let mut k = 0u64;
        let mut prod = self.uniform();
        while prod > limit {
            k += 1;
            prod *= self.uniform();
        }
        k
    }

    /// Atkinson's PA rejection method for large means.
    fn poisson_atkinson(&mut self, mean: f64) -> u64 {
        let c = 0.767 - 3.36 / mean;
        let beta = std::f64::consts::PI / (3.0 * mean).sqrt();
        let alpha = beta * mean;
        let k = c.ln() - mean - beta.ln();
        let log_mean = mean.ln();
        loop {
            let u = self.uniform();
            if u == 0.0 {
                continue;
            }
            let x = (alpha - ((1.0 - u) / u).ln()) / beta;
            let n = (x + 0.5).floor();
            if n < 0.0 {
                continue;
            }
            let v = self.uniform();
            if v == 0.0 {
                continue;
            }
            let y = alpha - beta * x;
            let t = 1.0 + y.exp();
            let lhs = y + (v / (t * t)).ln();
            let rhs = k + n * log_mean - ln_factorial(n as u64);
            if lhs <= rhs {
                return n as u64;
            }
        }
    }

    /// Choose an index with probability proportional to its weight in a
    /// cumulative-weight array. See [`cumulative_pick`].
    pub fn cumulative_sample(&mut self, cum_weights: &[f64], len: usize) -> usize {
        let u = self.uniform();
        cumulative_pick(cum_weights, len, u)
    }

    /// Draw an Omori-distributed time in `[t1, t2]`.
    pub fn omori_sample(&mut self, p: f64, c: f64, t1: f64, t2: f64) -> f64 {
        let u = self.uniform();
        omori_rescale(p, c, t1, t2, u)
    }

    /// Draw an Omori-distributed time for a source at `t0` onto the
    /// window `[t1, t2]`. The result lies in `[max(t0, t1), t2]`.
    pub fn omori_sample_shifted(&mut self, p: f64, c: f64, t0: f64, t1: f64, t2: f64) -> f64 {
        let lo = t1.max(t0);
        let u = self.uniform();
        (t0 + omori_rescale(p, c, lo - t0, t2 - t0, u)).clamp(lo, t2)
    }

    /// Draw a Gutenberg-Richter-distributed magnitude in `[m1, m2]`.
    pub fn gr_sample(&mut self, b: f64, m1: f64, m2: f64) -> f64 {
        let u = self.uniform();
        gr_rescale(b, m1, m2, u)
    }
}

impl Default for RngSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RngSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RngSource").finish_non_exhaustive()
    }
}

/// `ln(n!)`: exact summation for small `n`, Stirling's series beyond.
fn ln_factorial(n: u64) -> f64 {
    if n < 16 {
        (2..=n).map(|k| (k as f64).ln()).sum()
    } else {
        let x = (n + 1) as f64;
        let x2 = x * x;
        let ln_sqrt_two_pi = 0.918_938_533_204_672_7;
        (x - 0.5) * x.ln() - x + ln_sqrt_two_pi + 1.0 / (12.0 * x)
            - 1.0 / (360.0 * x2 * x)
            + 1.0 / (1260.0 * x2 * x2 * x)
    }
}
