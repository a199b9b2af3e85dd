//! Omori-Utsu rate integrals and inverse-CDF time sampling.
//!
//! The Omori-Utsu law gives an aftershock rate proportional to
//! `(t + c)^(-p)` at time `t` after the triggering event. The closed
//! forms below are singular at `p = 1` and suffer cancellation when the
//! integration window is narrow; both cases are handled with
//! `expm1`/`log1p` and short Taylor expansions.

/// Below this `|1 - p|`, the rate integral switches to its Taylor
/// expansion around the `p = 1` logarithmic limit.
const Q_SINGULAR: f64 = 1.0e-9;

/// Below this `|q * ln r|`, the inverse CDF switches to a 4-term Taylor
/// series (accurate to roughly the RNG's own resolution).
const X_TAYLOR: f64 = 1.0e-4;

/// Omori rate integral: the integral of `(t + c)^(-p)` over `[t1, t2]`.
///
/// Closed form `(t1 + c)^q * (r^q - 1) / q` with `q = 1 - p` and
/// `r = (t2 + c) / (t1 + c)`, evaluated via `expm1`/`log1p` so the
/// result stays accurate when `t1` is close to `t2`, and via a 2-term
/// Taylor expansion in `q` when `p` is within [`Q_SINGULAR`] of 1.
///
/// # Panics
///
/// Panics if `c <= 0`, `t1 + c <= 0`, or `t2 < t1`.
pub fn omori_rate(p: f64, c: f64, t1: f64, t2: f64) -> f64 {
    assert!(c > 0.0, "omori_rate: c must be positive, got {c}");
    assert!(
        t2 >= t1 && t1 + c > 0.0,
        "omori_rate: bad window [{t1}, {t2}] with c = {c}"
    );
    let q = 1.0 - p;
    let u1 = t1 + c;
    // ln((t2 + c) / (t1 + c)), stable when t1 ≈ t2.
    let lr = ((t2 - t1) / u1).ln_1p();
    if q.abs() <= Q_SINGULAR {
        // (r^q - 1)/q = lr * (1 + q*lr/2 + O((q*lr)^2))
        u1.powf(q) * lr * (1.0 + 0.5 * q * lr)
    } else {
        u1.powf(q) * (q * lr).exp_m1() / q
    }
}

/// Rate contributed by a source at `t0` onto the target window `[t1, t2]`.
///
/// The effective window starts at `max(t0, t1)`; if what remains is not
/// wider than `teps` the contribution is degenerate and the rate is 0.
/// Degenerate windows are valid termination signals, not errors.
pub fn omori_rate_shifted(p: f64, c: f64, t0: f64, teps: f64, t1: f64, t2: f64) -> f64 {
    let lo = t1.max(t0);
    if t2 - lo <= teps {
        return 0.0;
    }
    omori_rate(p, c, lo - t0, t2 - t0)
}

/// Inverse CDF of the truncated Omori distribution on `[t1, t2]`.
///
/// Maps `u` in `[0, 1]` to a time such that the rate integral from `t1`
/// is the fraction `u` of the total over `[t1, t2]`. For small
/// `q * ln r` the 4-term Taylor series is used (accurate to ~10 digits,
/// matching the RNG's resolution); otherwise
/// `log1p(u * expm1(q * ln r)) / q`. The result is always clamped into
/// `[t1, t2]` even under floating rounding.
pub fn omori_rescale(p: f64, c: f64, t1: f64, t2: f64, u: f64) -> f64 {
    assert!(c > 0.0, "omori_rescale: c must be positive, got {c}");
    assert!(
        t2 >= t1 && t1 + c > 0.0,
        "omori_rescale: bad window [{t1}, {t2}] with c = {c}"
    );
    if u <= 0.0 {
        return t1;
    }
    if u >= 1.0 {
        return t2;
    }
    let q = 1.0 - p;
    let u1 = t1 + c;
    let lr = ((t2 - t1) / u1).ln_1p();
    let x = q * lr;
    // g = log1p(u * expm1(x)) / x, extended by continuity at x = 0.
    let g = if x.abs() <= X_TAYLOR {
        let u2 = u * u;
        let u3 = u2 * u;
        let u4 = u3 * u;
        u + x * ((u - u2) / 2.0
            + x * ((u / 6.0 - u2 / 2.0 + u3 / 3.0)
                + x * (u / 24.0 - 7.0 * u2 / 24.0 + u3 / 2.0 - u4 / 4.0)))
    } else {
        (u * x.exp_m1()).ln_1p() / x
    };
    let t = u1 * (lr * g).exp() - c;
    t.clamp(t1, t2)
}
