//! Ensemble orchestration: many independent catalogs across a worker
//! thread pool.
//!
//! An [`EnsembleDriver`] runs the seed → generate → scan pipeline once
//! per catalog, pulling catalog indices from a shared atomic counter.
//! Each worker owns its random source, seeder, storage, generator, and
//! scanner outright; the accumulators handed in through
//! [`EnsembleParams`] are the only shared state and synchronize
//! internally. The driver supports a cooperative wall-clock deadline,
//! external termination requests, and progress callbacks, and it
//! classifies worker panics as aborts distinct from normal or timed-out
//! completion.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod driver;
mod init;

pub use driver::{EnsembleDriver, EnsembleError, EnsembleParams, Outcome, Progress};
pub use init::{EnsembleInitializer, FixedInitializer};
