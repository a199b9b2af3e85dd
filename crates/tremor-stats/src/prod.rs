//! Productivity correction and branch-ratio calculations.
//!
//! The productivity parameter `a` is calibrated against magnitudes drawn
//! from the reference range `[mref, msup]`. When a simulation draws
//! magnitudes from a different window, the per-rupture coefficient must
//! be rescaled to preserve the expected branching intensity. All the
//! formulas here reduce to the function `W(x) = (e^x - 1) / x`, which is
//! evaluated through `expm1` and is exactly 1 in the `alpha == b` limit.

use std::f64::consts::LN_10;

use tremor_core::CatalogParams;

use crate::omori::omori_rate;

/// Arguments below this magnitude are treated as exactly 0 in
/// [`w_expm1`], which makes the `alpha == b` case exact.
const W_TINY: f64 = 1.0e-16;

/// `W(x) = (e^x - 1) / x`, extended by continuity to `W(0) = 1`.
fn w_expm1(x: f64) -> f64 {
    if x.abs() < W_TINY {
        1.0
    } else {
        x.exp_m1() / x
    }
}

/// Uncorrected productivity: `10^(a + alpha * (m0 - mref))`.
///
/// The rate of direct children per unit time per unit magnitude for a
/// rupture of magnitude `m0`, at the reference conditions `a` was
/// calibrated against.
pub fn calc_k_uncorr(m0: f64, a: f64, alpha: f64, mref: f64) -> f64 {
    10.0_f64.powf(a + alpha * (m0 - mref))
}

/// Corrected productivity for magnitudes drawn from `[mag_min, mag_max]`.
///
/// Rescales [`calc_k_uncorr`] by the factor `Q` that preserves the
/// expected branching intensity when child magnitudes come from
/// `[mag_min, mag_max]` instead of the calibration range
/// `[mref, msup]`:
///
/// ```text
/// Q = exp(v * (mref - mag_min)) * W(v * (msup - mref)) / W(v * (mag_max - mag_min))
/// ```
///
/// with `v = ln(10) * (alpha - b)`. When both `W` arguments are below
/// `1e-16` in magnitude, `W = 1` is used directly, which handles
/// `alpha == b` exactly.
pub fn calc_k_corr(m0: f64, params: &CatalogParams, mag_min: f64, mag_max: f64) -> f64 {
    let v = LN_10 * (params.alpha - params.b);
    let q = (v * (params.mref - mag_min)).exp() * w_expm1(v * (params.msup - params.mref))
        / w_expm1(v * (mag_max - mag_min));
    calc_k_uncorr(m0, params.a, params.alpha, params.mref) * q
}

/// Expected number of direct offspring per earthquake (the branch
/// ratio) over the forecast window, for magnitudes on the calibration
/// range `[mref, msup]`.
///
/// `n = 10^a * b * ln(10) * (msup - mref) * W(v * (msup - mref)) * I`
/// where `I` is the Omori rate integral over the window duration and
/// `v = ln(10) * (alpha - b)`.
pub fn calc_branch_ratio(params: &CatalogParams) -> f64 {
    10.0_f64.powf(params.a) * gr_intensity_factor(params) * omori_window_integral(params)
}

/// Inverse of [`calc_branch_ratio`] in the productivity parameter:
/// the `a` that produces branch ratio `n` under the other parameters.
///
/// # Panics
///
/// Panics if `n <= 0`.
pub fn calc_inv_branch_ratio(n: f64, params: &CatalogParams) -> f64 {
    assert!(n > 0.0, "calc_inv_branch_ratio: n must be positive, got {n}");
    (n / (gr_intensity_factor(params) * omori_window_integral(params))).log10()
}

/// `b * ln(10) * (msup - mref) * W(v * (msup - mref))`: the expected
/// branching intensity per unit `10^a` contributed by the magnitude
/// distribution over the calibration range.
fn gr_intensity_factor(params: &CatalogParams) -> f64 {
    let beta = params.b * LN_10;
    let v = LN_10 * (params.alpha - params.b);
    let dm = params.msup - params.mref;
    beta * dm * w_expm1(v * dm)
}

fn omori_window_integral(params: &CatalogParams) -> f64 {
    omori_rate(params.p, params.c, 0.0, params.tend - params.tbegin)
}
