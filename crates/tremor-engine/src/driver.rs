//! The ensemble driver and its worker loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use tremor_catalog::CatalogStorage;
use tremor_gen::{CatalogGenerator, SeedComm};
use tremor_scan::{Accumulator, CatalogScanner};
use tremor_stats::RngSource;

use crate::init::EnsembleInitializer;

/// Everything an ensemble run needs: who seeds the catalogs, who
/// consumes them, and how many to run. Read-only once the driver
/// launches.
pub struct EnsembleParams {
    /// Produces one seeder per worker.
    pub initializer: Arc<dyn EnsembleInitializer>,
    /// Result sinks; each provides one consumer per worker, invoked in
    /// this order during scans.
    pub accumulators: Vec<Arc<dyn Accumulator>>,
    /// Independent catalog realizations to run.
    pub num_catalogs: usize,
}

/// How an ensemble run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every requested catalog ran.
    Completed,
    /// The wall-clock deadline passed; workers stopped claiming new
    /// catalogs after finishing the ones in hand.
    DeadlineExpired,
    /// A worker failed; the message is from the first failure observed.
    /// Catalogs completed before the failure remain counted.
    Aborted(String),
}

/// A progress report, sent after each completed catalog.
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    /// Catalogs completed so far.
    pub catalogs_done: usize,
    /// Total catalogs requested.
    pub num_catalogs: usize,
}

/// Rejected ensemble configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnsembleError {
    /// `num_catalogs` was 0.
    NoCatalogs,
    /// The worker count was 0.
    NoWorkers,
}

impl std::fmt::Display for EnsembleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCatalogs => write!(f, "ensemble requires at least one catalog"),
            Self::NoWorkers => write!(f, "ensemble requires at least one worker thread"),
        }
    }
}

impl std::error::Error for EnsembleError {}

/// Runs an ensemble across a fixed-size worker pool.
///
/// Workers pull catalog indices from one shared counter; each catalog's
/// seed → generate → scan pipeline runs to completion on one thread.
/// Deadline and termination checks happen between catalogs, never
/// inside one.
pub struct EnsembleDriver {
    params: EnsembleParams,
    num_threads: usize,
    deadline: Option<Duration>,
    progress: Option<Box<dyn Fn(Progress) + Send + Sync>>,
    progress_interval: usize,
    claimed: AtomicUsize,
    completed: AtomicUsize,
    terminate: AtomicBool,
}

impl EnsembleDriver {
    /// A driver with one worker per available CPU, no deadline, and no
    /// progress callback.
    pub fn new(params: EnsembleParams) -> Self {
        let num_threads = thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            params,
            num_threads,
            deadline: None,
            progress: None,
            progress_interval: 1,
            claimed: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            terminate: AtomicBool::new(false),
        }
    }

    /// Set the worker-pool size.
    pub fn set_num_threads(&mut self, num_threads: usize) -> &mut Self {
        self.num_threads = num_threads;
        self
    }

    /// Set a cooperative wall-clock budget, measured from [`run`](Self::run).
    pub fn set_deadline(&mut self, deadline: Duration) -> &mut Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a progress callback, invoked from a monitor thread each time
    /// the completed-catalog count crosses a multiple of the report
    /// interval (every catalog by default; see
    /// [`set_progress_interval`](Self::set_progress_interval)). The
    /// callback survives the run, so a reused driver keeps reporting.
    pub fn set_progress(&mut self, callback: Box<dyn Fn(Progress) + Send + Sync>) -> &mut Self {
        self.progress = Some(callback);
        self
    }

    /// Report progress every `interval` completed catalogs. The final
    /// catalog is always reported regardless of the interval.
    ///
    /// # Panics
    ///
    /// Panics if `interval == 0`.
    pub fn set_progress_interval(&mut self, interval: usize) -> &mut Self {
        assert!(interval > 0, "progress interval must be at least 1");
        self.progress_interval = interval;
        self
    }

    /// Catalogs completed so far (final count once [`run`](Self::run)
    /// returns).
    pub fn catalog_count(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Ask workers to stop after their current catalog. Safe to call
    /// from a progress callback or another thread.
    pub fn request_terminate(&self) {
        self.terminate.store(true, Ordering::Release);
    }

    /// Run the ensemble to an [`Outcome`].
    ///
    /// Validates the configuration, opens the initializer and the
    /// accumulators, drives the worker pool to exhaustion (or deadline,
    /// or abort), then closes everything down in reverse order.
    pub fn run(&mut self) -> Result<Outcome, EnsembleError> {
        self.pre_launch()?;

        let deadline_at = self.deadline.map(|d| Instant::now() + d);
        let abort: Mutex<Option<String>> = Mutex::new(None);
        let deadline_hit = AtomicBool::new(false);
        let this = &*self;

        thread::scope(|scope| {
            let (tx, rx) = crossbeam_channel::unbounded::<Progress>();
            if let Some(callback) = this.progress.as_deref() {
                let interval = this.progress_interval;
                scope.spawn(move || {
                    for report in rx {
                        if report.catalogs_done % interval == 0
                            || report.catalogs_done == report.num_catalogs
                        {
                            callback(report);
                        }
                    }
                });
            } else {
                drop(rx);
            }
            for _ in 0..this.num_threads {
                let tx = tx.clone();
                let abort = &abort;
                let deadline_hit = &deadline_hit;
                scope.spawn(move || this.worker(tx, abort, deadline_hit, deadline_at));
            }
        });

        self.post_termination();

        let aborted = abort.lock().unwrap_or_else(|e| e.into_inner()).take();
        Ok(match aborted {
            Some(message) => Outcome::Aborted(message),
            None if deadline_hit.load(Ordering::Acquire) => Outcome::DeadlineExpired,
            None => Outcome::Completed,
        })
    }

    fn pre_launch(&mut self) -> Result<(), EnsembleError> {
        if self.params.num_catalogs == 0 {
            return Err(EnsembleError::NoCatalogs);
        }
        if self.num_threads == 0 {
            return Err(EnsembleError::NoWorkers);
        }
        self.claimed.store(0, Ordering::Release);
        self.completed.store(0, Ordering::Release);
        self.terminate.store(false, Ordering::Release);
        self.params.initializer.begin_initialization();
        for acc in &self.params.accumulators {
            acc.begin_accumulation(self.params.num_catalogs);
        }
        Ok(())
    }

    fn post_termination(&self) {
        self.params.initializer.end_initialization();
        for acc in &self.params.accumulators {
            acc.end_accumulation();
        }
    }

    /// One worker's whole life: own a pipeline, claim catalogs until
    /// none remain (or the run is cut short), then close down so the
    /// consumers merge their partial results.
    fn worker(
        &self,
        tx: Sender<Progress>,
        abort: &Mutex<Option<String>>,
        deadline_hit: &AtomicBool,
        deadline_at: Option<Instant>,
    ) {
        let mut rng = RngSource::new();
        let mut seeder = self.params.initializer.make_seeder();
        let mut store = CatalogStorage::new();
        let mut generator = CatalogGenerator::new();
        let consumers = self
            .params
            .accumulators
            .iter()
            .map(|acc| acc.make_consumer())
            .collect();
        let mut scanner = CatalogScanner::new(consumers);
        seeder.open();
        scanner.open();

        loop {
            if self.terminate.load(Ordering::Acquire) {
                break;
            }
            if let Some(at) = deadline_at {
                if Instant::now() >= at {
                    deadline_hit.store(true, Ordering::Release);
                    break;
                }
            }
            if self.claimed.fetch_add(1, Ordering::AcqRel) >= self.params.num_catalogs {
                break;
            }

            let result = catch_unwind(AssertUnwindSafe(|| {
                seeder.seed_catalog(&mut SeedComm {
                    builder: &mut store,
                    rng: &mut rng,
                });
                generator.calc_all_gen(&mut store, &mut rng);
                scanner.scan(&store, &mut rng);
            }));
            match result {
                Ok(()) => {
                    let done = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
                    let _ = tx.send(Progress {
                        catalogs_done: done,
                        num_catalogs: self.params.num_catalogs,
                    });
                }
                Err(payload) => {
                    let mut slot = abort.lock().unwrap_or_else(|e| e.into_inner());
                    if slot.is_none() {
                        *slot = Some(panic_message(payload));
                    }
                    drop(slot);
                    self.terminate.store(true, Ordering::Release);
                    break;
                }
            }
        }

        seeder.close();
        scanner.close();
    }
}

impl std::fmt::Debug for EnsembleDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsembleDriver")
            .field("num_catalogs", &self.params.num_catalogs)
            .field("num_threads", &self.num_threads)
            .field("deadline", &self.deadline)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked with a non-string payload".to_owned()
    }
}
