//! Ensemble runs: completion, abort, deadline, and progress behavior.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tremor_engine::{
    EnsembleDriver, EnsembleError, EnsembleParams, FixedInitializer, Outcome,
};
use tremor_gen::FixedSeeder;
use tremor_scan::{Accumulator, SizeAccumulator};
use tremor_test_utils::{subcritical_params, PairCountAccumulator, PanicAccumulator};

/// 100 catalogs from an M5 mainshock under mildly subcritical
/// parameters: small, fast catalogs.
fn ensemble(accumulators: Vec<Arc<dyn Accumulator>>, num_catalogs: usize) -> EnsembleParams {
    let seeder = FixedSeeder::single(subcritical_params(0.5), 0.0, 5.0);
    EnsembleParams {
        initializer: Arc::new(FixedInitializer::new(seeder)),
        accumulators,
        num_catalogs,
    }
}

#[test]
fn hundred_catalogs_across_four_workers() {
    let sizes = Arc::new(SizeAccumulator::new());
    let pairs = Arc::new(PairCountAccumulator::new());
    let mut driver = EnsembleDriver::new(ensemble(
        vec![Arc::clone(&sizes) as Arc<dyn Accumulator>, Arc::clone(&pairs) as _],
        100,
    ));
    driver.set_num_threads(4);

    let outcome = driver.run().expect("valid configuration");
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(driver.catalog_count(), 100);

    let totals = sizes.totals();
    assert_eq!(totals.catalog_count, 100);
    // Every catalog carries at least its seed rupture.
    assert!(totals.rupture_count >= 100);
    assert!(totals.max_gen_count >= 1);

    assert_eq!(pairs.pairs(), 100);
    assert!(pairs.lifecycle_ran());
    let (made, closed) = pairs.consumer_counts();
    assert_eq!(made, 4);
    assert_eq!(closed, 4);
}

#[test]
fn consumer_panic_aborts_and_keeps_completed_results() {
    let sizes = Arc::new(SizeAccumulator::new());
    let panicker = Arc::new(PanicAccumulator::new(5));
    let mut driver = EnsembleDriver::new(ensemble(
        vec![Arc::clone(&sizes) as Arc<dyn Accumulator>, panicker as _],
        100,
    ));
    driver.set_num_threads(4);

    let outcome = driver.run().expect("valid configuration");
    assert_eq!(outcome, Outcome::Aborted("injected consumer failure".into()));

    // The run was cut short, and what completed stayed counted: the
    // size accumulator agrees with the driver.
    assert!(driver.catalog_count() < 100);
    assert_eq!(sizes.totals().catalog_count, driver.catalog_count());
}

#[test]
fn elapsed_deadline_stops_before_any_catalog() {
    let pairs = Arc::new(PairCountAccumulator::new());
    let mut driver = EnsembleDriver::new(ensemble(vec![Arc::clone(&pairs) as Arc<dyn Accumulator>], 100));
    driver.set_num_threads(2).set_deadline(Duration::ZERO);

    let outcome = driver.run().expect("valid configuration");
    assert_eq!(outcome, Outcome::DeadlineExpired);
    assert_eq!(driver.catalog_count(), 0);
    assert_eq!(pairs.pairs(), 0);
    // Close-down still runs in full.
    assert!(pairs.lifecycle_ran());
}

#[test]
fn zero_catalogs_is_rejected() {
    let mut driver = EnsembleDriver::new(ensemble(vec![], 0));
    assert_eq!(driver.run(), Err(EnsembleError::NoCatalogs));
}

#[test]
fn zero_workers_is_rejected() {
    let mut driver = EnsembleDriver::new(ensemble(vec![], 10));
    driver.set_num_threads(0);
    assert_eq!(driver.run(), Err(EnsembleError::NoWorkers));
}

#[test]
fn driver_is_shareable_with_its_workers() {
    // Workers hold `&EnsembleDriver` across threads, so the driver
    // (progress callback included) must be Sync.
    fn assert_sync<T: Sync>() {}
    assert_sync::<EnsembleDriver>();
}

#[test]
fn progress_reports_cover_every_catalog() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let mut driver = EnsembleDriver::new(ensemble(vec![], 25));
    driver
        .set_num_threads(3)
        .set_progress(Box::new(move |p| sink.lock().unwrap().push(p)));

    let outcome = driver.run().expect("valid configuration");
    assert_eq!(outcome, Outcome::Completed);

    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 25);
    // Workers race, so reports may arrive out of order; the set of
    // completion counts is still exactly 1..=25.
    let mut done: Vec<usize> = reports.iter().map(|p| p.catalogs_done).collect();
    done.sort_unstable();
    assert_eq!(done, (1..=25).collect::<Vec<_>>());
    assert!(reports.iter().all(|p| p.num_catalogs == 25));
}

#[test]
fn progress_interval_thins_reports() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let mut driver = EnsembleDriver::new(ensemble(vec![], 10));
    driver
        .set_num_threads(2)
        .set_progress_interval(4)
        .set_progress(Box::new(move |p| sink.lock().unwrap().push(p.catalogs_done)));

    let outcome = driver.run().expect("valid configuration");
    assert_eq!(outcome, Outcome::Completed);

    // Multiples of the interval, plus the final catalog.
    let mut done = reports.lock().unwrap().clone();
    done.sort_unstable();
    assert_eq!(done, vec![4, 8, 10]);
}

#[test]
fn reused_driver_keeps_reporting_progress() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let mut driver = EnsembleDriver::new(ensemble(vec![], 10));
    driver
        .set_num_threads(2)
        .set_progress(Box::new(move |p| sink.lock().unwrap().push(p.catalogs_done)));

    assert_eq!(driver.run().expect("valid configuration"), Outcome::Completed);
    assert_eq!(driver.run().expect("valid configuration"), Outcome::Completed);
    assert_eq!(driver.catalog_count(), 10);

    // Both runs reported: every completion count appears twice.
    let mut done = reports.lock().unwrap().clone();
    done.sort_unstable();
    let expected: Vec<usize> = (1..=10).flat_map(|n| [n, n]).collect();
    assert_eq!(done, expected);
}
