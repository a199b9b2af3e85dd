//! Tremor: an ETAS (Epidemic-Type Aftershock Sequence) earthquake
//! catalog simulation engine.
//!
//! A mainshock spawns a random number of child ruptures under
//! Omori-Utsu time decay and Gutenberg-Richter magnitudes; children
//! spawn further generations, forming a stochastic branching catalog.
//! Tremor generates many independent catalogs in parallel and streams
//! them through pluggable consumers to build aggregate statistics.
//!
//! This is the top-level facade crate re-exporting the public API from
//! all Tremor sub-crates. For most users, adding `tremor` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tremor::prelude::*;
//!
//! // One M6.0 mainshock at t = 0 under the default parameter set.
//! let params = CatalogParams::default();
//! let mut seeder = FixedSeeder::single(params, 0.0, 6.0);
//!
//! let mut store = CatalogStorage::new();
//! let mut generator = CatalogGenerator::new();
//! let mut rng = RngSource::from_seed(42);
//!
//! seeder.open();
//! seeder.seed_catalog(&mut SeedComm {
//!     builder: &mut store,
//!     rng: &mut rng,
//! });
//! generator.calc_all_gen(&mut store, &mut rng);
//! seeder.close();
//!
//! assert_eq!(store.gen_size(0), 1);
//! assert!(store.gen_count() >= 1);
//! ```
//!
//! For many catalogs across a thread pool, hand an
//! [`prelude::EnsembleDriver`] an initializer and a set of
//! accumulators instead of driving the pipeline by hand.
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for items not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tremor-core` | Ruptures, parameters, storage traits, marshaling |
//! | [`stats`] | `tremor-stats` | Rate integrals, inverse-CDF sampling, the random source |
//! | [`catalog`] | `tremor-catalog` | Reusable arena catalog storage |
//! | [`generator`] | `tremor-gen` | The branching-process generator and seeders |
//! | [`scan`] | `tremor-scan` | Catalog scanning, consumers, accumulators |
//! | [`engine`] | `tremor-engine` | The multi-threaded ensemble driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types, storage traits, and marshaling (`tremor-core`).
pub use tremor_core as types;

/// Statistical engine: rate integrals and sampling (`tremor-stats`).
pub use tremor_stats as stats;

/// Reusable arena catalog storage (`tremor-catalog`).
pub use tremor_catalog as catalog;

/// Catalog generation and seeding (`tremor-gen`).
pub use tremor_gen as generator;

/// Scanning, consumers, and accumulators (`tremor-scan`).
pub use tremor_scan as scan;

/// Ensemble orchestration (`tremor-engine`).
pub use tremor_engine as engine;

/// The most commonly used types, in one import.
pub mod prelude {
    pub use tremor_catalog::CatalogStorage;
    pub use tremor_core::{
        CatalogBuilder, CatalogParams, CatalogView, GenerationInfo, Rupture,
    };
    pub use tremor_engine::{
        EnsembleDriver, EnsembleInitializer, EnsembleParams, FixedInitializer, Outcome,
    };
    pub use tremor_gen::{CatalogGenerator, FixedSeeder, SeedComm, Seeder};
    pub use tremor_scan::{
        Accumulator, CatalogConsumer, CatalogScanner, MagBinAccumulator, ScanComm,
        SizeAccumulator,
    };
    pub use tremor_stats::RngSource;
}
