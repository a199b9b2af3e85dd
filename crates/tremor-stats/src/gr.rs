//! Gutenberg-Richter rate integrals and inverse-CDF magnitude sampling.
//!
//! The truncated-exponential magnitude distribution has rate density
//! `b * ln(10) * 10^(-b * (m - mref))`. All formulas use `expm1`/`log1p`
//! so they stay stable as the magnitude window collapses (`m1 -> m2`).

use std::f64::consts::LN_10;

/// Gutenberg-Richter rate integral over the magnitude window `[m1, m2]`,
/// normalized so the window `[mref, +inf)` has rate 1.
///
/// # Panics
///
/// Panics if `b <= 0` or `m2 < m1`.
pub fn gr_rate(b: f64, mref: f64, m1: f64, m2: f64) -> f64 {
    assert!(b > 0.0, "gr_rate: b must be positive, got {b}");
    assert!(m2 >= m1, "gr_rate: inverted magnitude window [{m1}, {m2}]");
    let beta = b * LN_10;
    // 10^(-b*(m1-mref)) - 10^(-b*(m2-mref)), without cancellation.
    (beta * (mref - m1)).exp() * (-(-beta * (m2 - m1)).exp_m1())
}

/// Ratio of the Gutenberg-Richter rates of two magnitude windows,
/// `rate([m3, m4]) / rate([m1, m2])`. Independent of the reference
/// magnitude, hence no `mref` argument.
///
/// # Panics
///
/// Panics if `b <= 0`, either window is inverted, or `[m1, m2]` is empty.
pub fn gr_ratio_rate(b: f64, m1: f64, m2: f64, m3: f64, m4: f64) -> f64 {
    assert!(b > 0.0, "gr_ratio_rate: b must be positive, got {b}");
    assert!(
        m2 > m1 && m4 >= m3,
        "gr_ratio_rate: bad magnitude windows [{m1}, {m2}], [{m3}, {m4}]"
    );
    let beta = b * LN_10;
    (beta * (m1 - m3)).exp() * (-beta * (m4 - m3)).exp_m1() / (-beta * (m2 - m1)).exp_m1()
}

/// Inverse of [`gr_rate`] in its lower endpoint: the `m1` for which the
/// window `[m1, m2]` has the given rate.
///
/// The result never exceeds `m2`; it has no lower bound (small rates
/// push it far below `mref`), so callers clamp it to their adaptive
/// magnitude bounds.
///
/// # Panics
///
/// Panics if `b <= 0` or `rate <= 0`.
pub fn gr_inv_rate(b: f64, mref: f64, m2: f64, rate: f64) -> f64 {
    assert!(b > 0.0, "gr_inv_rate: b must be positive, got {b}");
    assert!(rate > 0.0, "gr_inv_rate: rate must be positive, got {rate}");
    let beta = b * LN_10;
    mref - (rate + (beta * (mref - m2)).exp()).ln() / beta
}

/// Inverse CDF of the truncated Gutenberg-Richter distribution on
/// `[m1, m2]`.
///
/// Exactly `m1` at `u = 0` and exactly `m2` at `u = 1`; monotone
/// non-decreasing in `u`; clamped into `[m1, m2]` under rounding.
///
/// # Panics
///
/// Panics if `b <= 0` or `m2 < m1`.
pub fn gr_rescale(b: f64, m1: f64, m2: f64, u: f64) -> f64 {
    assert!(b > 0.0, "gr_rescale: b must be positive, got {b}");
    assert!(m2 >= m1, "gr_rescale: inverted magnitude window [{m1}, {m2}]");
    if u <= 0.0 {
        return m1;
    }
    if u >= 1.0 {
        return m2;
    }
    let beta = b * LN_10;
    let m = m1 - (u * (-beta * (m2 - m1)).exp_m1()).ln_1p() / beta;
    m.clamp(m1, m2)
}
