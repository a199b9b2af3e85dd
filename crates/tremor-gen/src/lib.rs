//! Branching-process catalog generator.
//!
//! A catalog grows generation by generation: each rupture in the
//! current generation contributes an Omori-decaying rate of direct
//! offspring over the forecast window, offspring counts are Poisson,
//! parents are chosen in proportion to their rate contributions, and
//! child magnitudes follow a truncated Gutenberg-Richter law. The
//! [`CatalogGenerator`] drives that loop against any
//! [`CatalogBuilder`](tremor_core::CatalogBuilder); the
//! [`OffspringSampler`] it is built on is also reusable on its own for
//! sampling offspring of an already-finished generation.
//!
//! Generation 0 comes from a [`Seeder`], the pluggable contract for
//! placing mainshocks (or any other seed ruptures) into a new catalog.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod generator;
mod offspring;
mod seed;

pub use generator::{CatalogGenerator, SMALL_EXPECTED_COUNT, TINY_OMORI_RATE};
pub use offspring::OffspringSampler;
pub use seed::{FixedSeeder, SeedComm, Seeder};
