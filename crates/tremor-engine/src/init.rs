//! Initializers: where each worker's seeder comes from.

use tremor_gen::{FixedSeeder, Seeder};

/// Produces one [`Seeder`] per worker thread.
///
/// `begin_initialization` runs once before any worker starts and
/// `end_initialization` once after every worker has finished; between
/// them, `make_seeder` may be called concurrently from the launching
/// thread for each worker.
pub trait EnsembleInitializer: Send + Sync {
    /// An ensemble run is starting.
    fn begin_initialization(&self);

    /// A seeder for one worker's exclusive use.
    fn make_seeder(&self) -> Box<dyn Seeder>;

    /// The ensemble run is over.
    fn end_initialization(&self);
}

/// Hands every worker a clone of the same [`FixedSeeder`], so all
/// catalogs in the ensemble start from the same mainshock list.
#[derive(Clone, Debug)]
pub struct FixedInitializer {
    seeder: FixedSeeder,
}

impl FixedInitializer {
    /// An initializer around the given seeder.
    pub fn new(seeder: FixedSeeder) -> Self {
        Self { seeder }
    }
}

impl EnsembleInitializer for FixedInitializer {
    fn begin_initialization(&self) {}

    fn make_seeder(&self) -> Box<dyn Seeder> {
        Box::new(self.seeder.clone())
    }

    fn end_initialization(&self) {}
}
