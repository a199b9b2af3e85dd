//! Per-catalog simulation parameters and their validation.

use std::error::Error;
use std::fmt;

use crate::marshal::{MarshalError, MarshalReader, MarshalWriter, Marshalable};

/// ETAS parameters governing one catalog realization.
///
/// Immutable for the duration of a catalog run. Constructed by the
/// caller (or an initializer) and validated once via
/// [`validate()`](CatalogParams::validate) before use; the statistical
/// engine treats violated preconditions as programmer errors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogParams {
    /// Productivity parameter `a` (log10 of direct-offspring rate at
    /// reference conditions, over the calibration magnitude range).
    pub a: f64,
    /// Omori exponent `p`.
    pub p: f64,
    /// Omori offset `c`, in days. Must be positive.
    pub c: f64,
    /// Gutenberg-Richter slope `b`.
    pub b: f64,
    /// ETAS intensity exponent `alpha`.
    pub alpha: f64,
    /// Reference magnitude the productivity `a` was calibrated against.
    pub mref: f64,
    /// Supremum magnitude of the calibration range.
    pub msup: f64,
    /// Beginning of the forecast window, in days.
    pub tbegin: f64,
    /// End of the forecast window, in days. Must exceed `tbegin`.
    pub tend: f64,
    /// Minimum time separation between a source and the window it can
    /// populate; effective windows narrower than this are degenerate.
    pub teps: f64,
    /// Minimum magnitude of simulated ruptures.
    pub mag_min_sim: f64,
    /// Maximum magnitude of simulated ruptures.
    pub mag_max_sim: f64,
    /// Lower bound for the adaptive minimum magnitude.
    pub mag_min_lo: f64,
    /// Upper bound for the adaptive minimum magnitude.
    pub mag_min_hi: f64,
    /// Lower bound for the adaptive maximum magnitude (not presently varied).
    pub mag_max_lo: f64,
    /// Upper bound for the adaptive maximum magnitude (not presently varied).
    pub mag_max_hi: f64,
    /// Target expected size for each generation after the seeds.
    pub gen_size_target: usize,
    /// Hard cap on the number of generations, seeds included.
    pub gen_count_max: usize,
}

impl CatalogParams {
    /// Marshal schema version for [`CatalogParams`].
    pub const MARSHAL_VERSION: i32 = 1;

    /// Check every structural invariant, returning the first violation.
    ///
    /// Numeric degeneracies during simulation (zero rates, empty
    /// generations) are not covered here — those are valid stop signals,
    /// not parameter errors.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.c > 0.0) {
            return Err(ParamsError::NonPositiveOmoriC { c: self.c });
        }
        if !(self.tend > self.tbegin) {
            return Err(ParamsError::EmptyTimeWindow {
                tbegin: self.tbegin,
                tend: self.tend,
            });
        }
        if !(self.teps >= 0.0) {
            return Err(ParamsError::NegativeTeps { teps: self.teps });
        }
        if !(self.mref <= self.msup) {
            return Err(ParamsError::BadMagRange {
                which: "calibration",
                lo: self.mref,
                hi: self.msup,
            });
        }
        if !(self.mag_min_sim <= self.mag_max_sim) {
            return Err(ParamsError::BadMagRange {
                which: "simulation",
                lo: self.mag_min_sim,
                hi: self.mag_max_sim,
            });
        }
        if !(self.mag_min_lo <= self.mag_min_sim && self.mag_min_sim <= self.mag_min_hi) {
            return Err(ParamsError::MagMinOutOfBounds {
                lo: self.mag_min_lo,
                sim: self.mag_min_sim,
                hi: self.mag_min_hi,
            });
        }
        if !(self.mag_max_lo <= self.mag_max_sim && self.mag_max_sim <= self.mag_max_hi) {
            return Err(ParamsError::MagMaxOutOfBounds {
                lo: self.mag_max_lo,
                sim: self.mag_max_sim,
                hi: self.mag_max_hi,
            });
        }
        if self.gen_size_target == 0 {
            return Err(ParamsError::ZeroGenSizeTarget);
        }
        if self.gen_count_max == 0 {
            return Err(ParamsError::ZeroGenCountMax);
        }
        Ok(())
    }
}

impl Default for CatalogParams {
    /// Typical operational-forecast parameters: a one-year window,
    /// near-critical productivity, and a [2.0, 9.0] simulated range.
    fn default() -> Self {
        Self {
            a: -2.5,
            p: 1.0,
            c: 0.05,
            b: 1.0,
            alpha: 1.0,
            mref: 3.0,
            msup: 9.5,
            tbegin: 0.0,
            tend: 365.0,
            teps: 1.0e-6,
            mag_min_sim: 2.0,
            mag_max_sim: 9.0,
            mag_min_lo: 1.0,
            mag_min_hi: 6.0,
            mag_max_lo: 9.0,
            mag_max_hi: 9.0,
            gen_size_target: 100,
            gen_count_max: 100,
        }
    }
}

impl Marshalable for CatalogParams {
    const TYPE_NAME: &'static str = "CatalogParams";

    fn marshal(&self, w: &mut dyn MarshalWriter) {
        w.begin(Self::TYPE_NAME, Self::MARSHAL_VERSION);
        w.write_f64("a", self.a);
        w.write_f64("p", self.p);
        w.write_f64("c", self.c);
        w.write_f64("b", self.b);
        w.write_f64("alpha", self.alpha);
        w.write_f64("mref", self.mref);
        w.write_f64("msup", self.msup);
        w.write_f64("tbegin", self.tbegin);
        w.write_f64("tend", self.tend);
        w.write_f64("teps", self.teps);
        w.write_f64("mag_min_sim", self.mag_min_sim);
        w.write_f64("mag_max_sim", self.mag_max_sim);
        w.write_f64("mag_min_lo", self.mag_min_lo);
        w.write_f64("mag_min_hi", self.mag_min_hi);
        w.write_f64("mag_max_lo", self.mag_max_lo);
        w.write_f64("mag_max_hi", self.mag_max_hi);
        w.write_usize("gen_size_target", self.gen_size_target);
        w.write_usize("gen_count_max", self.gen_count_max);
        w.end(Self::TYPE_NAME);
    }

    fn unmarshal(r: &mut dyn MarshalReader) -> Result<Self, MarshalError> {
        r.begin(Self::TYPE_NAME, Self::MARSHAL_VERSION, Self::MARSHAL_VERSION)?;
        let out = Self {
            a: r.read_f64("a")?,
            p: r.read_f64("p")?,
            c: r.read_f64("c")?,
            b: r.read_f64("b")?,
            alpha: r.read_f64("alpha")?,
            mref: r.read_f64("mref")?,
            msup: r.read_f64("msup")?,
            tbegin: r.read_f64("tbegin")?,
            tend: r.read_f64("tend")?,
            teps: r.read_f64("teps")?,
            mag_min_sim: r.read_f64("mag_min_sim")?,
            mag_max_sim: r.read_f64("mag_max_sim")?,
            mag_min_lo: r.read_f64("mag_min_lo")?,
            mag_min_hi: r.read_f64("mag_min_hi")?,
            mag_max_lo: r.read_f64("mag_max_lo")?,
            mag_max_hi: r.read_f64("mag_max_hi")?,
            gen_size_target: r.read_usize("gen_size_target")?,
            gen_count_max: r.read_usize("gen_count_max")?,
        };
        r.end(Self::TYPE_NAME)?;
        Ok(out)
    }
}

/// Structural parameter violations found by [`CatalogParams::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParamsError {
    /// Omori `c` must be strictly positive.
    NonPositiveOmoriC {
        /// The offending value.
        c: f64,
    },
    /// The forecast window must have positive length.
    EmptyTimeWindow {
        /// Window start.
        tbegin: f64,
        /// Window end.
        tend: f64,
    },
    /// `teps` must be non-negative.
    NegativeTeps {
        /// The offending value.
        teps: f64,
    },
    /// A magnitude range has its endpoints out of order.
    BadMagRange {
        /// Which range ("calibration" or "simulation").
        which: &'static str,
        /// Lower endpoint.
        lo: f64,
        /// Upper endpoint.
        hi: f64,
    },
    /// `mag_min_lo <= mag_min_sim <= mag_min_hi` violated.
    MagMinOutOfBounds {
        /// Adaptive lower bound.
        lo: f64,
        /// Simulated minimum magnitude.
        sim: f64,
        /// Adaptive upper bound.
        hi: f64,
    },
    /// `mag_max_lo <= mag_max_sim <= mag_max_hi` violated.
    MagMaxOutOfBounds {
        /// Adaptive lower bound.
        lo: f64,
        /// Simulated maximum magnitude.
        sim: f64,
        /// Adaptive upper bound.
        hi: f64,
    },
    /// `gen_size_target` must be at least 1.
    ZeroGenSizeTarget,
    /// `gen_count_max` must be at least 1.
    ZeroGenCountMax,
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveOmoriC { c } => {
                write!(f, "omori c must be positive, got {c}")
            }
            Self::EmptyTimeWindow { tbegin, tend } => {
                write!(f, "forecast window [{tbegin}, {tend}] is empty")
            }
            Self::NegativeTeps { teps } => {
                write!(f, "teps must be non-negative, got {teps}")
            }
            Self::BadMagRange { which, lo, hi } => {
                write!(f, "{which} magnitude range [{lo}, {hi}] is inverted")
            }
            Self::MagMinOutOfBounds { lo, sim, hi } => {
                write!(
                    f,
                    "mag_min_sim {sim} outside adaptive bounds [{lo}, {hi}]"
                )
            }
            Self::MagMaxOutOfBounds { lo, sim, hi } => {
                write!(
                    f,
                    "mag_max_sim {sim} outside adaptive bounds [{lo}, {hi}]"
                )
            }
            Self::ZeroGenSizeTarget => write!(f, "gen_size_target must be at least 1"),
            Self::ZeroGenCountMax => write!(f, "gen_count_max must be at least 1"),
        }
    }
}

impl Error for ParamsError {}
