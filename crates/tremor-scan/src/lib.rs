//! Catalog scanning: streaming finished catalogs to pluggable
//! consumers.
//!
//! A [`CatalogScanner`] walks a finished catalog in storage order and
//! drives each registered [`CatalogConsumer`] through a fixed callback
//! sequence. During `begin_generation` a consumer may ask for
//! synthetic sub-threshold ruptures; the scanner then re-runs the
//! offspring sampler over the requested magnitude band and streams the
//! extra ruptures as sterile (non-reproducing) events before the
//! generation ends.
//!
//! An [`Accumulator`] is the cross-catalog, cross-thread side of a
//! consumer: it hands out one private consumer per worker and merges
//! their partial results when they close.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod accum;
mod consumer;
mod scanner;

pub use accum::{Accumulator, MagBinAccumulator, SizeAccumulator, SizeTotals};
pub use consumer::{CatalogConsumer, ScanComm};
pub use scanner::CatalogScanner;
