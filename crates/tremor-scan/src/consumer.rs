//! The per-generation scan context and the consumer callback contract.

use tremor_core::{CatalogParams, CatalogView, GenerationInfo, Rupture};

/// Context handed to consumers while one generation is being scanned.
///
/// Exposes the catalog view and the generation under scan, and carries
/// the aggregated sterile-magnitude request: the minimum over all
/// consumers' [`request_sterile_mag`](Self::request_sterile_mag) calls
/// made during `begin_generation`.
pub struct ScanComm<'a> {
    view: &'a dyn CatalogView,
    params: CatalogParams,
    i_gen: usize,
    gen_info: GenerationInfo,
    sterile_mag: f64,
}

impl<'a> ScanComm<'a> {
    pub(crate) fn new(
        view: &'a dyn CatalogView,
        params: CatalogParams,
        i_gen: usize,
        gen_info: GenerationInfo,
    ) -> Self {
        Self {
            view,
            params,
            i_gen,
            gen_info,
            sterile_mag: f64::INFINITY,
        }
    }

    /// The catalog being scanned.
    pub fn view(&self) -> &'a dyn CatalogView {
        self.view
    }

    /// The catalog's parameters.
    pub fn params(&self) -> &CatalogParams {
        &self.params
    }

    /// Index of the generation under scan (never 0; the seed
    /// generation has its own callbacks).
    pub fn i_gen(&self) -> usize {
        self.i_gen
    }

    /// Metadata of the generation under scan.
    pub fn gen_info(&self) -> &GenerationInfo {
        &self.gen_info
    }

    /// Ask for sterile ruptures down to `mag`.
    ///
    /// Only meaningful during `begin_generation`. Requests at or above
    /// the generation's simulated minimum are redundant and ignored;
    /// otherwise the lowest magnitude requested by any consumer wins.
    pub fn request_sterile_mag(&mut self, mag: f64) {
        if mag < self.gen_info.gen_mag_min {
            self.sterile_mag = self.sterile_mag.min(mag);
        }
    }

    /// The winning sterile request, if any consumer made one.
    pub(crate) fn sterile_mag(&self) -> Option<f64> {
        self.sterile_mag.is_finite().then_some(self.sterile_mag)
    }
}

/// Receives one catalog at a time from a [`CatalogScanner`](crate::CatalogScanner).
///
/// Callback sequence per catalog:
///
/// ```text
/// begin_catalog
///   begin_seed_generation, next_seed_rup × N, end_seed_generation
///   per later generation:
///     begin_generation            (sterile requests happen here)
///     next_rup × N
///     next_sterile_rup × M        (only if something was requested)
///     end_generation
/// end_catalog
/// ```
///
/// bracketed by one `open` before the first catalog and one `close`
/// after the last. Every method has a no-op default, so a consumer
/// only implements the events it cares about. Within a generation,
/// rupture order is storage index order; across consumers, each event
/// is delivered in registration order.
///
/// Consumers are owned by exactly one worker thread; `close` is where a
/// consumer merges its partial results into any shared aggregate.
#[allow(unused_variables)]
pub trait CatalogConsumer: Send {
    /// Called once before the first catalog.
    fn open(&mut self) {}

    /// Called once after the last catalog.
    fn close(&mut self) {}

    /// A catalog scan is starting.
    fn begin_catalog(&mut self, view: &dyn CatalogView) {}

    /// The catalog scan is complete.
    fn end_catalog(&mut self, view: &dyn CatalogView) {}

    /// The seed generation (index 0) is starting.
    fn begin_seed_generation(&mut self, view: &dyn CatalogView, gen_info: &GenerationInfo) {}

    /// One seed rupture, in storage order.
    fn next_seed_rup(&mut self, j_rup: usize, rup: &Rupture) {}

    /// The seed generation is complete.
    fn end_seed_generation(&mut self, view: &dyn CatalogView) {}

    /// A later generation is starting; sterile requests go through
    /// `comm`.
    fn begin_generation(&mut self, comm: &mut ScanComm<'_>) {}

    /// One stored rupture of the current generation, in storage order.
    fn next_rup(&mut self, comm: &ScanComm<'_>, j_rup: usize, rup: &Rupture) {}

    /// One synthesized sterile rupture; `j_rup` continues directly
    /// after the stored ruptures' indices.
    fn next_sterile_rup(&mut self, comm: &ScanComm<'_>, j_rup: usize, rup: &Rupture) {}

    /// The current generation is complete, sterile infill included.
    fn end_generation(&mut self, comm: &ScanComm<'_>) {}
}
