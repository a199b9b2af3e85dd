//! Test fixtures and instrumented consumers for Tremor development.
//!
//! Provides accumulators that verify the scanner/ensemble contracts
//! from the outside: [`PairCountAccumulator`] checks catalog bracketing
//! per consumer, [`PanicAccumulator`] injects a worker failure on cue,
//! and [`subcritical_params`] builds the standard test parameter set.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{subcritical_params, PairCountAccumulator, PanicAccumulator};
