//! Reusable arena storage for aftershock catalogs.
//!
//! [`CatalogStorage`] implements both halves of the storage contract:
//! the single-writer build sequence and the multi-reader view. One
//! instance is owned by one worker thread and reused across many
//! catalogs — `begin_catalog` clears contents but keeps allocations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod storage;

pub use storage::CatalogStorage;
