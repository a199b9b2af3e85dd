//! Statistical engine for the Tremor aftershock simulator.
//!
//! Pure, stateless rate integrals and inverse-CDF transforms for the
//! Omori-Utsu and Gutenberg-Richter laws, productivity and branch-ratio
//! calculations, extended-source integrals, and the per-worker random
//! source built atop them.
//!
//! Every formula here is written to stay accurate near its singular
//! parameter values: `expm1`/`log1p` where naive differences would
//! cancel, and short Taylor expansions where closed forms degenerate
//! to 0/0 (Omori `p = 1`, extended-source `p = 2`, `alpha = b`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod gr;
pub mod omext;
pub mod omori;
pub mod prod;
pub mod rng;

pub use gr::{gr_inv_rate, gr_rate, gr_ratio_rate, gr_rescale};
pub use omext::{
    omext_double_density_integral, omext_double_integral, omext_single_density_integral,
    omext_single_integral,
};
pub use omori::{omori_rate, omori_rate_shifted, omori_rescale};
pub use prod::{calc_branch_ratio, calc_inv_branch_ratio, calc_k_corr, calc_k_uncorr};
pub use rng::{cumulative_pick, RngSource};
