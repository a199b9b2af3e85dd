//! Core value types and traits for the Tremor aftershock simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data model of an ETAS branching simulation — ruptures, generation
//! metadata, per-catalog parameters — plus the catalog view/builder
//! traits and the field-keyed marshaling contract shared by the rest
//! of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod marshal;
pub mod params;
pub mod rupture;

pub use catalog::{CatalogBuilder, CatalogView};
pub use marshal::{MarshalError, MarshalReader, MarshalStore, MarshalWriter, Marshalable};
pub use params::{CatalogParams, ParamsError};
pub use rupture::{GenerationInfo, Rupture, RUP_PARENT_SEED};
