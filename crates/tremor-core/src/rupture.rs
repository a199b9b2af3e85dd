//! The [`Rupture`] value type and per-generation metadata.
//!
//! A catalog is an ordered sequence of generations, each an ordered
//! sequence of ruptures. Parent/child links are plain generation-relative
//! indices, never pointers: a rupture in generation *i* (*i* > 0) names
//! its parent by index into generation *i* − 1.

use crate::marshal::{MarshalError, MarshalReader, MarshalWriter, Marshalable};

/// Sentinel parent index marking a seed rupture (generation 0).
pub const RUP_PARENT_SEED: i32 = -1;

/// One earthquake rupture inside a simulated catalog.
///
/// Immutable once appended to a generation. Created by a seeder
/// (generation 0) or by the generator/scanner (later generations).
/// Times are in days since an unspecified catalog-local origin;
/// locations are planar kilometres in the same local frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rupture {
    /// Time of the rupture, in days since the catalog origin.
    pub t_day: f64,
    /// Magnitude of the rupture.
    pub rup_mag: f64,
    /// Productivity coefficient: rate of direct children per unit time
    /// per unit magnitude at reference conditions. Zero for sterile
    /// ruptures, which never reproduce.
    pub k_prod: f64,
    /// Index of the parent in the previous generation, or
    /// [`RUP_PARENT_SEED`] for seeds.
    pub rup_parent: i32,
    /// Planar x coordinate in kilometres.
    ///
    /// The temporal-only algorithm copies this unchanged from the parent.
    pub x_km: f64,
    /// Planar y coordinate in kilometres.
    pub y_km: f64,
}

impl Rupture {
    /// Marshal schema version for [`Rupture`].
    pub const MARSHAL_VERSION: i32 = 1;

    /// Build a seed rupture (parent index [`RUP_PARENT_SEED`]).
    pub fn seed(t_day: f64, rup_mag: f64, k_prod: f64, x_km: f64, y_km: f64) -> Self {
        Self {
            t_day,
            rup_mag,
            k_prod,
            rup_parent: RUP_PARENT_SEED,
            x_km,
            y_km,
        }
    }

    /// Whether this rupture is a seed (generation 0).
    pub fn is_seed(&self) -> bool {
        self.rup_parent == RUP_PARENT_SEED
    }

    /// Whether this rupture is sterile (never reproduces).
    pub fn is_sterile(&self) -> bool {
        self.k_prod == 0.0
    }
}

impl Marshalable for Rupture {
    const TYPE_NAME: &'static str = "Rupture";

    fn marshal(&self, w: &mut dyn MarshalWriter) {
        w.begin(Self::TYPE_NAME, Self::MARSHAL_VERSION);
        w.write_f64("t_day", self.t_day);
        w.write_f64("rup_mag", self.rup_mag);
        w.write_f64("k_prod", self.k_prod);
        w.write_i32("rup_parent", self.rup_parent);
        w.write_f64("x_km", self.x_km);
        w.write_f64("y_km", self.y_km);
        w.end(Self::TYPE_NAME);
    }

    fn unmarshal(r: &mut dyn MarshalReader) -> Result<Self, MarshalError> {
        r.begin(Self::TYPE_NAME, Self::MARSHAL_VERSION, Self::MARSHAL_VERSION)?;
        let out = Self {
            t_day: r.read_f64("t_day")?,
            rup_mag: r.read_f64("rup_mag")?,
            k_prod: r.read_f64("k_prod")?,
            rup_parent: r.read_i32("rup_parent")?,
            x_km: r.read_f64("x_km")?,
            y_km: r.read_f64("y_km")?,
        };
        r.end(Self::TYPE_NAME)?;
        Ok(out)
    }
}

/// Metadata describing one generation of a catalog.
///
/// Set once when the generation begins; read-only afterward. The
/// magnitude window `[gen_mag_min, gen_mag_max]` is the range every
/// rupture magnitude in the generation was drawn from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationInfo {
    /// Number of ruptures in the generation.
    pub gen_size: usize,
    /// Minimum magnitude used to draw ruptures in this generation.
    pub gen_mag_min: f64,
    /// Maximum magnitude used to draw ruptures in this generation.
    pub gen_mag_max: f64,
}

impl GenerationInfo {
    /// Marshal schema version for [`GenerationInfo`].
    pub const MARSHAL_VERSION: i32 = 1;

    /// Build generation metadata from a size and magnitude window.
    pub fn new(gen_size: usize, gen_mag_min: f64, gen_mag_max: f64) -> Self {
        Self {
            gen_size,
            gen_mag_min,
            gen_mag_max,
        }
    }
}

impl Marshalable for GenerationInfo {
    const TYPE_NAME: &'static str = "GenerationInfo";

    fn marshal(&self, w: &mut dyn MarshalWriter) {
        w.begin(Self::TYPE_NAME, Self::MARSHAL_VERSION);
        w.write_usize("gen_size", self.gen_size);
        w.write_f64("gen_mag_min", self.gen_mag_min);
        w.write_f64("gen_mag_max", self.gen_mag_max);
        w.end(Self::TYPE_NAME);
    }

    fn unmarshal(r: &mut dyn MarshalReader) -> Result<Self, MarshalError> {
        r.begin(Self::TYPE_NAME, Self::MARSHAL_VERSION, Self::MARSHAL_VERSION)?;
        let out = Self {
            gen_size: r.read_usize("gen_size")?,
            gen_mag_min: r.read_f64("gen_mag_min")?,
            gen_mag_max: r.read_f64("gen_mag_max")?,
        };
        r.end(Self::TYPE_NAME)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_sentinel_parent() {
        let rup = Rupture::seed(0.0, 6.0, 0.01, 1.0, -2.0);
        assert_eq!(rup.rup_parent, RUP_PARENT_SEED);
        assert!(rup.is_seed());
        assert!(!rup.is_sterile());
    }

    #[test]
    fn sterile_is_k_prod_zero() {
        let rup = Rupture {
            k_prod: 0.0,
            rup_parent: 3,
            ..Rupture::default()
        };
        assert!(rup.is_sterile());
        assert!(!rup.is_seed());
    }

    #[test]
    fn default_rupture_is_zeroed() {
        let rup = Rupture::default();
        assert_eq!(rup.t_day, 0.0);
        assert_eq!(rup.rup_parent, 0);
    }
}
