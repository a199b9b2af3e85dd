//! Read and write contracts over catalog storage.
//!
//! A catalog has exactly one writer thread during construction and any
//! number of reader threads afterward, never both at once. The write
//! contract is a strict call sequence; calls out of order are a
//! programmer error and abort the process (panic), not a recoverable
//! error.

use crate::params::CatalogParams;
use crate::rupture::{GenerationInfo, Rupture};

/// Read-only access to a catalog of generations.
///
/// Hot-loop accessors fill caller-supplied output structures instead of
/// allocating. Indices out of range, or reads of a generation that has
/// not ended yet, are precondition violations and panic.
pub trait CatalogView {
    /// Total number of ruptures across all completed generations.
    fn size(&self) -> usize;

    /// Number of completed generations (index 0 is the seed generation).
    fn gen_count(&self) -> usize;

    /// Number of ruptures in completed generation `i_gen`.
    fn gen_size(&self, i_gen: usize) -> usize;

    /// Fill `out` with the metadata of completed generation `i_gen`.
    fn gen_info(&self, i_gen: usize, out: &mut GenerationInfo);

    /// Fill `out` with rupture `j_rup` of completed generation `i_gen`.
    fn rupture(&self, i_gen: usize, j_rup: usize, out: &mut Rupture);

    /// The parameters this catalog was built with.
    fn params(&self) -> CatalogParams;
}

/// Write access to catalog storage.
///
/// # Contract
///
/// The single writer must call, in order:
/// `begin_catalog` → (`begin_generation` → `add_rup`* → `end_generation`)*
/// → `end_catalog`. Reading completed generations through the
/// [`CatalogView`] supertrait is permitted between `end_generation` and
/// the next `begin_generation` — the generator reads generation *i* − 1
/// while writing generation *i*.
pub trait CatalogBuilder: CatalogView {
    /// Start a new catalog, discarding any previous contents.
    ///
    /// A reusable implementation retains its allocations across
    /// catalogs (clear-and-reuse, not reallocate).
    fn begin_catalog(&mut self, params: &CatalogParams);

    /// Start a new generation with the given metadata.
    fn begin_generation(&mut self, info: &GenerationInfo);

    /// Append one rupture to the open generation.
    fn add_rup(&mut self, rup: &Rupture);

    /// End the open generation, making it visible to readers.
    fn end_generation(&mut self);

    /// End the catalog. No further writes until `begin_catalog`.
    fn end_catalog(&mut self);
}
