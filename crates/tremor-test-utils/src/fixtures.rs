//! Instrumented accumulators and standard test parameters.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tremor_core::{CatalogParams, CatalogView};
use tremor_scan::{Accumulator, CatalogConsumer};
use tremor_stats::calc_inv_branch_ratio;

/// The standard test parameter set: a one-year forecast window with
/// the productivity `a` solved so the branch ratio equals `n`.
///
/// Subcritical choices (`n < 1`) keep catalogs finite in expectation.
pub fn subcritical_params(n: f64) -> CatalogParams {
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
    params.a = calc_inv_branch_ratio(n, &params);
    params
}

/// Counts matched `begin_catalog`/`end_catalog` pairs across every
/// consumer it hands out, and verifies bracketing: a consumer must
/// never see a second `begin_catalog` before `end_catalog`, nor an
/// `end_catalog` outside a catalog, nor events after `close`.
#[derive(Debug, Default)]
pub struct PairCountAccumulator {
    pairs: Arc<AtomicUsize>,
    consumers_made: AtomicUsize,
    consumers_closed: Arc<AtomicUsize>,
    began: AtomicBool,
    ended: AtomicBool,
}

impl PairCountAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matched catalog pairs seen over the whole run.
    pub fn pairs(&self) -> usize {
        self.pairs.load(Ordering::Acquire)
    }

    /// Consumers handed out and consumers closed.
    pub fn consumer_counts(&self) -> (usize, usize) {
        (
            self.consumers_made.load(Ordering::Acquire),
            self.consumers_closed.load(Ordering::Acquire),
        )
    }

    pub fn lifecycle_ran(&self) -> bool {
        self.began.load(Ordering::Acquire) && self.ended.load(Ordering::Acquire)
    }
}

impl Accumulator for PairCountAccumulator {
    fn begin_accumulation(&self, num_catalogs: usize) {
        assert!(num_catalogs > 0, "begin_accumulation with no catalogs");
        self.pairs.store(0, Ordering::Release);
        self.began.store(true, Ordering::Release);
    }

    fn make_consumer(&self) -> Box<dyn CatalogConsumer> {
        self.consumers_made.fetch_add(1, Ordering::AcqRel);
        Box::new(PairCountConsumer {
            pairs: Arc::clone(&self.pairs),
            closed_counter: Arc::clone(&self.consumers_closed),
            local_pairs: 0,
            in_catalog: false,
            closed: false,
        })
    }

    fn end_accumulation(&self) {
        self.ended.store(true, Ordering::Release);
    }
}

struct PairCountConsumer {
    pairs: Arc<AtomicUsize>,
    closed_counter: Arc<AtomicUsize>,
    local_pairs: usize,
    in_catalog: bool,
    closed: bool,
}

impl CatalogConsumer for PairCountConsumer {
    fn close(&mut self) {
        assert!(!self.in_catalog, "closed mid-catalog");
        assert!(!self.closed, "closed twice");
        self.closed = true;
        self.pairs.fetch_add(self.local_pairs, Ordering::AcqRel);
        self.closed_counter.fetch_add(1, Ordering::AcqRel);
    }

    fn begin_catalog(&mut self, _view: &dyn CatalogView) {
        assert!(!self.closed, "begin_catalog after close");
        assert!(!self.in_catalog, "begin_catalog while a catalog is open");
        self.in_catalog = true;
    }

    fn end_catalog(&mut self, _view: &dyn CatalogView) {
        assert!(self.in_catalog, "end_catalog without begin_catalog");
        self.in_catalog = false;
        self.local_pairs += 1;
    }
}

/// Injects a failure: the `fire_at`-th catalog scanned (counted across
/// all of this accumulator's consumers) panics in `begin_catalog`.
#[derive(Debug)]
pub struct PanicAccumulator {
    fire_at: usize,
    seen: Arc<AtomicUsize>,
}

impl PanicAccumulator {
    pub fn new(fire_at: usize) -> Self {
        assert!(fire_at > 0, "fire_at is 1-based");
        Self {
            fire_at,
            seen: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Accumulator for PanicAccumulator {
    fn begin_accumulation(&self, _num_catalogs: usize) {
        self.seen.store(0, Ordering::Release);
    }

    fn make_consumer(&self) -> Box<dyn CatalogConsumer> {
        Box::new(PanicConsumer {
            fire_at: self.fire_at,
            seen: Arc::clone(&self.seen),
        })
    }

    fn end_accumulation(&self) {}
}

struct PanicConsumer {
    fire_at: usize,
    seen: Arc<AtomicUsize>,
}

impl CatalogConsumer for PanicConsumer {
    fn begin_catalog(&mut self, _view: &dyn CatalogView) {
        if self.seen.fetch_add(1, Ordering::AcqRel) + 1 == self.fire_at {
            panic!("injected consumer failure");
        }
    }
}
