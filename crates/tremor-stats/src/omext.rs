//! Extended-source Omori integrals.
//!
//! When a source and/or target is a time interval rather than a point,
//! the `(w + t)^(-p)` kernel must be integrated once or twice over the
//! interval(s). The closed forms are singular at `p = 1` (single
//! integral) and `p = 2` (double integral), and the four-corner
//! difference of the double integral cancels catastrophically when the
//! intervals are narrow relative to the offset `w`. Each routine
//! therefore falls back to a midpoint-rule approximation when the
//! midpoint error bound (proportional to `p * (1 + p)` times the
//! squared relative interval width) is below working precision, and
//! otherwise uses `expm1`/`log1p` expansions chosen for the nearby
//! singularity.

/// Midpoint-rule guard: use the midpoint approximation when
/// `p * (1 + p) * h^2` is below this, where `h` is the interval width
/// relative to the offset. The midpoint error is `p * (1 + p) * h^2 / 24`
/// of the result, so this keeps the approximation within ~1e-14.
const MIDPOINT_TOL2: f64 = 2.4e-13;

/// Below this `|1 - p|` (or `|2 - p|` for the double integral), the
/// closed form switches to its Taylor expansion around the singularity.
const Q_SINGULAR: f64 = 1.0e-7;

/// `(x + d)^e - x^e`, computed without cancellation for small `d / x`.
fn pow_diff(x: f64, d: f64, e: f64) -> f64 {
    x.powf(e) * (e * (d / x).ln_1p()).exp_m1()
}

/// Single extended integral: `∫_{t1}^{t2} (w + t)^(-p) dt`.
///
/// The offset `w` places the interval relative to the kernel origin;
/// `w + t1` must be positive. Accurate across `p = 1` and for narrow
/// intervals.
///
/// # Panics
///
/// Panics if `p <= 0`, `t2 < t1`, or `w + t1 <= 0`.
pub fn omext_single_integral(p: f64, w: f64, t1: f64, t2: f64) -> f64 {
    let dt = t2 - t1;
    if dt == 0.0 {
        return 0.0;
    }
    dt * omext_single_density_integral(p, w, t1, t2)
}

/// Average kernel density over the target interval:
/// [`omext_single_integral`] divided by `t2 - t1`, defined by
/// continuity as `(w + t1)^(-p)` for an empty interval.
///
/// # Panics
///
/// Panics if `p <= 0`, `t2 < t1`, or `w + t1 <= 0`.
pub fn omext_single_density_integral(p: f64, w: f64, t1: f64, t2: f64) -> f64 {
    assert!(p > 0.0, "omext: p must be positive, got {p}");
    let a = w + t1;
    let dt = t2 - t1;
    assert!(
        dt >= 0.0 && a > 0.0,
        "omext: bad target interval [{t1}, {t2}] with offset {w}"
    );
    if dt == 0.0 {
        return a.powf(-p);
    }
    let xm = w + 0.5 * (t1 + t2);
    let h = dt / xm;
    if p * (1.0 + p) * h * h <= MIDPOINT_TOL2 {
        return xm.powf(-p);
    }
    let q1 = 1.0 - p;
    let l = (dt / a).ln_1p();
    let integral = if q1.abs() <= Q_SINGULAR {
        // (A^q1 * expm1(q1*l)) / q1 -> l * (1 + q1*(ln A + l/2)) as q1 -> 0.
        l * (1.0 + q1 * (a.ln() + 0.5 * l))
    } else {
        pow_diff(a, dt, q1) / q1
    };
    integral / dt
}

/// Double extended integral:
/// `∫_{s1}^{s2} ∫_{t1}^{t2} (w + t - s)^(-p) dt ds`.
///
/// The source occupies `[s1, s2]` and the target `[t1, t2]`; the
/// nearest approach `w + t1 - s2` must be positive. Accurate across
/// both the `p = 1` and `p = 2` singularities and for narrow intervals.
///
/// # Panics
///
/// Panics if `p <= 0`, either interval is inverted, or
/// `w + t1 - s2 <= 0`.
pub fn omext_double_integral(p: f64, w: f64, s1: f64, s2: f64, t1: f64, t2: f64) -> f64 {
    let dt = t2 - t1;
    let ds = s2 - s1;
    if dt == 0.0 || ds == 0.0 {
        return 0.0;
    }
    dt * ds * omext_double_density_integral(p, w, s1, s2, t1, t2)
}

/// Average kernel density over the source-target rectangle:
/// [`omext_double_integral`] divided by `(t2 - t1) * (s2 - s1)`, with
/// degenerate intervals reduced to the single-integral density and the
/// point kernel.
///
/// # Panics
///
/// Panics if `p <= 0`, either interval is inverted, or
/// `w + t1 - s2 <= 0`.
pub fn omext_double_density_integral(p: f64, w: f64, s1: f64, s2: f64, t1: f64, t2: f64) -> f64 {
    assert!(p > 0.0, "omext: p must be positive, got {p}");
    let dt = t2 - t1;
    let ds = s2 - s1;
    let c = w + t1 - s2;
    assert!(
        dt >= 0.0 && ds >= 0.0 && c > 0.0,
        "omext: bad source [{s1}, {s2}] / target [{t1}, {t2}] with offset {w}"
    );
    // Degenerate rectangles reduce to lower-order densities.
    if ds == 0.0 {
        return omext_single_density_integral(p, w - s1, t1, t2);
    }
    if dt == 0.0 {
        // Integrate over the source instead: substitute u = -s.
        return omext_single_density_integral(p, w + t1, -s2, -s1);
    }
    let xm = w + 0.5 * (t1 + t2) - 0.5 * (s1 + s2);
    let ht = dt / xm;
    let hs = ds / xm;
    if p * (1.0 + p) * (ht * ht + hs * hs) <= MIDPOINT_TOL2 {
        return xm.powf(-p);
    }
    let q1 = 1.0 - p;
    let q2 = 2.0 - p;
    let a = w + t1 - s1; // nearest target start to source start
    let l_a = (dt / a).ln_1p();
    let l_c = (dt / c).ln_1p();
    let integral = if q1.abs() <= Q_SINGULAR {
        // p near 1: second difference of y*ln(y) plus the q1 correction
        // from y*ln(y)^2; the 1/q1 singularity cancels exactly.
        let d2 = |g: fn(f64) -> f64| g(a + dt) - g(a) - g(c + dt) + g(c);
        let g1 = |y: f64| y * y.ln();
        let g2 = |y: f64| y * y.ln() * y.ln();
        (d2(g1) + 0.5 * q1 * d2(g2)) / q2
    } else if q2.abs() <= Q_SINGULAR {
        // p near 2: expm1(q2 * log1p) collapses to the log1p difference
        // plus a first-order q2 correction.
        let m_a = l_a * (a.ln() + 0.5 * l_a);
        let m_c = l_c * (c.ln() + 0.5 * l_c);
        ((l_a - l_c) + q2 * (m_a - m_c)) / q1
    } else {
        (pow_diff(a, dt, q2) - pow_diff(c, dt, q2)) / (q1 * q2)
    };
    integral / (dt * ds)
}
