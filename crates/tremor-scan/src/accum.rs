//! Accumulators: cross-catalog, cross-thread result aggregation.

use std::sync::{Arc, Mutex};

use tremor_core::{CatalogView, Rupture};

use crate::consumer::{CatalogConsumer, ScanComm};

/// The shared side of a family of consumers.
///
/// An ensemble run calls `begin_accumulation` once up front, then each
/// worker takes one private consumer via `make_consumer`; the consumer
/// folds results locally and merges into the accumulator when it
/// closes. `end_accumulation` runs after every worker has closed and
/// finalizes the aggregate. Accumulators are the only scan-side
/// objects shared across threads, so merging is the only place that
/// may lock.
pub trait Accumulator: Send + Sync {
    /// An ensemble of `num_catalogs` catalogs is about to run.
    fn begin_accumulation(&self, num_catalogs: usize);

    /// A private consumer for one worker thread.
    fn make_consumer(&self) -> Box<dyn CatalogConsumer>;

    /// Every worker has closed its consumer; finalize.
    fn end_accumulation(&self);
}

// ── Catalog size statistics ──────────────────────────────────────────

/// Aggregate size statistics over an ensemble.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeTotals {
    /// Catalogs scanned.
    pub catalog_count: usize,
    /// Stored ruptures over all catalogs, seeds included.
    pub rupture_count: u64,
    /// Synthetic sterile ruptures streamed over all catalogs.
    pub sterile_count: u64,
    /// Largest generation count seen in any single catalog.
    pub max_gen_count: usize,
}

impl SizeTotals {
    fn merge(&mut self, other: &SizeTotals) {
        self.catalog_count += other.catalog_count;
        self.rupture_count += other.rupture_count;
        self.sterile_count += other.sterile_count;
        self.max_gen_count = self.max_gen_count.max(other.max_gen_count);
    }
}

/// Counts catalogs, ruptures, and sterile ruptures across an ensemble.
#[derive(Debug, Default)]
pub struct SizeAccumulator {
    totals: Arc<Mutex<SizeTotals>>,
}

impl SizeAccumulator {
    /// A fresh accumulator with zeroed totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// The aggregated totals. Meaningful after `end_accumulation`.
    pub fn totals(&self) -> SizeTotals {
        *self.totals.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Accumulator for SizeAccumulator {
    fn begin_accumulation(&self, _num_catalogs: usize) {
        *self.totals.lock().unwrap_or_else(|e| e.into_inner()) = SizeTotals::default();
    }

    fn make_consumer(&self) -> Box<dyn CatalogConsumer> {
        Box::new(SizeConsumer {
            totals: Arc::clone(&self.totals),
            local: SizeTotals::default(),
        })
    }

    fn end_accumulation(&self) {}
}

struct SizeConsumer {
    totals: Arc<Mutex<SizeTotals>>,
    local: SizeTotals,
}

impl CatalogConsumer for SizeConsumer {
    fn close(&mut self) {
        self.totals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .merge(&self.local);
        self.local = SizeTotals::default();
    }

    fn end_catalog(&mut self, view: &dyn CatalogView) {
        self.local.catalog_count += 1;
        self.local.rupture_count += view.size() as u64;
        self.local.max_gen_count = self.local.max_gen_count.max(view.gen_count());
    }

    fn next_sterile_rup(&mut self, _comm: &ScanComm<'_>, _j_rup: usize, _rup: &Rupture) {
        self.local.sterile_count += 1;
    }
}

// ── Magnitude histogram ──────────────────────────────────────────────

/// Histogram of rupture magnitudes in fixed-width bins, with sterile
/// infill down to the histogram floor.
///
/// Each consumer asks every generation for sterile ruptures down to
/// `mag_lo`, so the histogram covers magnitudes the simulation itself
/// truncated away. Magnitudes outside `[mag_lo, mag_lo + bins * width)`
/// are dropped.
#[derive(Debug)]
pub struct MagBinAccumulator {
    mag_lo: f64,
    bin_width: f64,
    counts: Arc<Mutex<Vec<u64>>>,
}

impl MagBinAccumulator {
    /// A histogram of `bins` bins of `bin_width` magnitude units
    /// starting at `mag_lo`.
    ///
    /// # Panics
    ///
    /// Panics if `bins == 0` or `bin_width <= 0`.
    pub fn new(mag_lo: f64, bin_width: f64, bins: usize) -> Self {
        assert!(
            bins > 0 && bin_width > 0.0,
            "MagBinAccumulator: bad layout ({bins} bins of width {bin_width})"
        );
        Self {
            mag_lo,
            bin_width,
            counts: Arc::new(Mutex::new(vec![0; bins])),
        }
    }

    /// The aggregated per-bin counts. Meaningful after
    /// `end_accumulation`.
    pub fn bin_counts(&self) -> Vec<u64> {
        self.counts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Accumulator for MagBinAccumulator {
    fn begin_accumulation(&self, _num_catalogs: usize) {
        self.counts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fill(0);
    }

    fn make_consumer(&self) -> Box<dyn CatalogConsumer> {
        let bins = self.counts.lock().unwrap_or_else(|e| e.into_inner()).len();
        Box::new(MagBinConsumer {
            mag_lo: self.mag_lo,
            bin_width: self.bin_width,
            shared: Arc::clone(&self.counts),
            local: vec![0; bins],
        })
    }

    fn end_accumulation(&self) {}
}

struct MagBinConsumer {
    mag_lo: f64,
    bin_width: f64,
    shared: Arc<Mutex<Vec<u64>>>,
    local: Vec<u64>,
}

impl MagBinConsumer {
    fn record(&mut self, mag: f64) {
        let offset = (mag - self.mag_lo) / self.bin_width;
        if offset >= 0.0 && (offset as usize) < self.local.len() {
            self.local[offset as usize] += 1;
        }
    }
}

impl CatalogConsumer for MagBinConsumer {
    fn close(&mut self) {
        let mut shared = self.shared.lock().unwrap_or_else(|e| e.into_inner());
        for (total, local) in shared.iter_mut().zip(&mut self.local) {
            *total += *local;
            *local = 0;
        }
    }

    fn next_seed_rup(&mut self, _j_rup: usize, rup: &Rupture) {
        self.record(rup.rup_mag);
    }

    fn begin_generation(&mut self, comm: &mut ScanComm<'_>) {
        comm.request_sterile_mag(self.mag_lo);
    }

    fn next_rup(&mut self, _comm: &ScanComm<'_>, _j_rup: usize, rup: &Rupture) {
        self.record(rup.rup_mag);
    }

    fn next_sterile_rup(&mut self, _comm: &ScanComm<'_>, _j_rup: usize, rup: &Rupture) {
        self.record(rup.rup_mag);
    }
}
