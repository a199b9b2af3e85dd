//! The arena-of-generations storage implementation.

use tremor_core::{CatalogBuilder, CatalogParams, CatalogView, GenerationInfo, Rupture};

/// Build-sequence state. Transitions out of order are precondition
/// violations and abort (panic), never recoverable errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuildState {
    /// No catalog yet, or the previous one was ended.
    Idle,
    /// Inside `begin_catalog` .. `end_catalog`, between generations.
    InCatalog,
    /// Inside `begin_generation` .. `end_generation`.
    InGeneration,
}

/// One completed generation: a half-open rupture range plus metadata.
#[derive(Clone, Copy, Debug)]
struct GenSpan {
    begin: usize,
    end: usize,
    info: GenerationInfo,
}

/// Arena storage for one catalog at a time, reusable across catalogs.
///
/// Ruptures live in one flat vector; generations are index spans over
/// it. Completed generations are readable through [`CatalogView`] while
/// later generations are still being written (the generator reads
/// generation *i* − 1 while building generation *i*); the open
/// generation itself is not. Clearing for the next catalog retains all
/// allocations.
#[derive(Debug)]
pub struct CatalogStorage {
    params: CatalogParams,
    ruptures: Vec<Rupture>,
    gens: Vec<GenSpan>,
    open_begin: usize,
    open_info: GenerationInfo,
    state: BuildState,
}

impl CatalogStorage {
    /// An empty storage arena.
    pub fn new() -> Self {
        Self {
            params: CatalogParams::default(),
            ruptures: Vec::new(),
            gens: Vec::new(),
            open_begin: 0,
            open_info: GenerationInfo::default(),
            state: BuildState::Idle,
        }
    }

    /// Retained capacity of the rupture arena, for reuse diagnostics.
    pub fn rup_capacity(&self) -> usize {
        self.ruptures.capacity()
    }

    /// Whether a full `begin_catalog` .. `end_catalog` cycle completed.
    pub fn is_complete(&self) -> bool {
        self.state == BuildState::Idle && !self.gens.is_empty()
    }

    fn gen_span(&self, i_gen: usize) -> &GenSpan {
        assert!(
            i_gen < self.gens.len(),
            "catalog read: generation {i_gen} out of range ({} completed)",
            self.gens.len()
        );
        &self.gens[i_gen]
    }
}

impl Default for CatalogStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView for CatalogStorage {
    fn size(&self) -> usize {
        self.gens.last().map_or(0, |g| g.end)
    }

    fn gen_count(&self) -> usize {
        self.gens.len()
    }

    fn gen_size(&self, i_gen: usize) -> usize {
        let span = self.gen_span(i_gen);
        span.end - span.begin
    }

    fn gen_info(&self, i_gen: usize, out: &mut GenerationInfo) {
        *out = self.gen_span(i_gen).info;
    }

    fn rupture(&self, i_gen: usize, j_rup: usize, out: &mut Rupture) {
        let span = self.gen_span(i_gen);
        let size = span.end - span.begin;
        assert!(
            j_rup < size,
            "catalog read: rupture {j_rup} out of range in generation {i_gen} (size {size})"
        );
        *out = self.ruptures[span.begin + j_rup];
    }

    fn params(&self) -> CatalogParams {
        self.params
    }
}

impl CatalogBuilder for CatalogStorage {
    fn begin_catalog(&mut self, params: &CatalogParams) {
        assert!(
            self.state == BuildState::Idle,
            "begin_catalog called while a catalog is open"
        );
        self.params = *params;
        self.ruptures.clear();
        self.gens.clear();
        self.state = BuildState::InCatalog;
    }

    fn begin_generation(&mut self, info: &GenerationInfo) {
        assert!(
            self.state == BuildState::InCatalog,
            "begin_generation called outside an open catalog"
        );
        self.open_begin = self.ruptures.len();
        self.open_info = *info;
        self.state = BuildState::InGeneration;
    }

    fn add_rup(&mut self, rup: &Rupture) {
        assert!(
            self.state == BuildState::InGeneration,
            "add_rup called outside an open generation"
        );
        self.ruptures.push(*rup);
    }

    fn end_generation(&mut self) {
        assert!(
            self.state == BuildState::InGeneration,
            "end_generation called without begin_generation"
        );
        let end = self.ruptures.len();
        let mut info = self.open_info;
        // Metadata reports what was actually stored.
        info.gen_size = end - self.open_begin;
        self.gens.push(GenSpan {
            begin: self.open_begin,
            end,
            info,
        });
        self.state = BuildState::InCatalog;
    }

    fn end_catalog(&mut self) {
        assert!(
            self.state == BuildState::InCatalog,
            "end_catalog called with a generation still open or no catalog begun"
        );
        self.state = BuildState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rup(t_day: f64, parent: i32) -> Rupture {
        Rupture {
            t_day,
            rup_mag: 4.0,
            k_prod: 0.01,
            rup_parent: parent,
            x_km: 0.0,
            y_km: 0.0,
        }
    }

    fn build_two_gen_catalog(store: &mut CatalogStorage) {
        store.begin_catalog(&CatalogParams::default());
        store.begin_generation(&GenerationInfo::new(2, 6.0, 6.0));
        store.add_rup(&rup(0.0, -1));
        store.add_rup(&rup(0.5, -1));
        store.end_generation();
        store.begin_generation(&GenerationInfo::new(3, 2.5, 9.0));
        store.add_rup(&rup(1.0, 0));
        store.add_rup(&rup(2.0, 0));
        store.add_rup(&rup(3.0, 1));
        store.end_generation();
        store.end_catalog();
    }

    #[test]
    fn build_and_read_back() {
        let mut store = CatalogStorage::new();
        build_two_gen_catalog(&mut store);

        assert!(store.is_complete());
        assert_eq!(store.gen_count(), 2);
        assert_eq!(store.gen_size(0), 2);
        assert_eq!(store.gen_size(1), 3);
        assert_eq!(store.size(), 5);

        let mut info = GenerationInfo::default();
        store.gen_info(1, &mut info);
        assert_eq!(info.gen_size, 3);
        assert_eq!(info.gen_mag_min, 2.5);

        let mut out = Rupture::default();
        store.rupture(1, 2, &mut out);
        assert_eq!(out.t_day, 3.0);
        assert_eq!(out.rup_parent, 1);
    }

    #[test]
    fn completed_generations_readable_while_building() {
        let mut store = CatalogStorage::new();
        store.begin_catalog(&CatalogParams::default());
        store.begin_generation(&GenerationInfo::new(1, 6.0, 6.0));
        store.add_rup(&rup(0.0, -1));
        store.end_generation();

        // Generation 0 is complete; the writer can read it while
        // populating generation 1.
        store.begin_generation(&GenerationInfo::new(1, 2.5, 9.0));
        let mut parent = Rupture::default();
        store.rupture(0, 0, &mut parent);
        assert_eq!(parent.t_day, 0.0);
        assert_eq!(store.gen_count(), 1);
        store.add_rup(&rup(parent.t_day + 1.0, 0));
        store.end_generation();
        store.end_catalog();
        assert_eq!(store.gen_count(), 2);
    }

    #[test]
    fn reuse_retains_capacity() {
        let mut store = CatalogStorage::new();
        build_two_gen_catalog(&mut store);
        let cap = store.rup_capacity();
        assert!(cap >= 5);

        build_two_gen_catalog(&mut store);
        assert_eq!(store.rup_capacity(), cap, "reuse must not reallocate");
        assert_eq!(store.size(), 5);
    }

    #[test]
    fn gen_size_reports_actual_count() {
        // The declared size is advisory; the stored metadata reflects
        // what was actually appended.
        let mut store = CatalogStorage::new();
        store.begin_catalog(&CatalogParams::default());
        store.begin_generation(&GenerationInfo::new(10, 6.0, 6.0));
        store.add_rup(&rup(0.0, -1));
        store.end_generation();
        store.end_catalog();

        let mut info = GenerationInfo::default();
        store.gen_info(0, &mut info);
        assert_eq!(info.gen_size, 1);
        assert_eq!(store.gen_size(0), 1);
    }

    #[test]
    fn empty_generation_is_valid() {
        let mut store = CatalogStorage::new();
        store.begin_catalog(&CatalogParams::default());
        store.begin_generation(&GenerationInfo::new(1, 6.0, 6.0));
        store.add_rup(&rup(0.0, -1));
        store.end_generation();
        store.begin_generation(&GenerationInfo::new(0, 2.5, 9.0));
        store.end_generation();
        store.end_catalog();
        assert_eq!(store.gen_count(), 2);
        assert_eq!(store.gen_size(1), 0);
    }

    // ── Sequence violations abort ────────────────────────────────

    #[test]
    #[should_panic(expected = "begin_generation called outside an open catalog")]
    fn begin_generation_without_catalog_aborts() {
        let mut store = CatalogStorage::new();
        store.begin_generation(&GenerationInfo::default());
    }

    #[test]
    #[should_panic(expected = "add_rup called outside an open generation")]
    fn add_rup_without_generation_aborts() {
        let mut store = CatalogStorage::new();
        store.begin_catalog(&CatalogParams::default());
        store.add_rup(&Rupture::default());
    }

    #[test]
    #[should_panic(expected = "end_catalog called with a generation still open")]
    fn end_catalog_with_open_generation_aborts() {
        let mut store = CatalogStorage::new();
        store.begin_catalog(&CatalogParams::default());
        store.begin_generation(&GenerationInfo::default());
        store.end_catalog();
    }

    #[test]
    #[should_panic(expected = "begin_catalog called while a catalog is open")]
    fn nested_begin_catalog_aborts() {
        let mut store = CatalogStorage::new();
        store.begin_catalog(&CatalogParams::default());
        store.begin_catalog(&CatalogParams::default());
    }

    #[test]
    #[should_panic(expected = "generation 2 out of range")]
    fn out_of_range_generation_read_aborts() {
        let mut store = CatalogStorage::new();
        build_two_gen_catalog(&mut store);
        let mut info = GenerationInfo::default();
        store.gen_info(2, &mut info);
    }

    #[test]
    #[should_panic(expected = "rupture 3 out of range")]
    fn out_of_range_rupture_read_aborts() {
        let mut store = CatalogStorage::new();
        build_two_gen_catalog(&mut store);
        let mut out = Rupture::default();
        store.rupture(1, 3, &mut out);
    }
}
