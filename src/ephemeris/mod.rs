//! # Low-precision ephemerides
//!
//! Analytic series for the Sun, the Moon and the nine major planets, accurate to roughly an
//! arcminute for the Sun and planets and a few arcseconds in the Moon's longitude over the
//! twentieth and twenty-first centuries. No external ephemeris file is needed.
//!
//! | Module | Content |
//! |--------|---------|
//! | [`sun`] | geocentric Sun position and velocity, equinox of date |
//! | [`moon`] | lunar longitude/latitude/parallax series, phases and lunations |
//! | [`planets`] | mean orbital elements with the largest perturbations, heliocentric and geocentric positions |
//! | [`barycentric`] | barycentric and heliocentric light-time and velocity corrections |
//!
//! Time arguments are UT Julian Dates unless a function name ends in `_tt`; the ΔT correction
//! of [`crate::time::etcorr`] is applied internally where the series are expressed in
//! dynamical time.

pub mod barycentric;
pub mod moon;
pub mod planets;
pub mod sun;

use nalgebra::Vector3;

use crate::celest::Celest;
use crate::constants::{Degree, Hour, JulianDate};
use crate::ref_system::xyz_cel;
use crate::time::julian_epoch;

/// Geocentric position of a body in the equatorial frame of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    /// Right ascension in hours.
    pub ra: Hour,
    /// Declination in degrees.
    pub dec: Degree,
    /// Distance in AU.
    pub distance: f64,
    /// Rectangular coordinates in AU.
    pub xyz: Vector3<f64>,
}

impl BodyPosition {
    pub(crate) fn from_xyz(xyz: Vector3<f64>) -> Self {
        let (ra, dec, distance) = xyz_cel(&xyz);
        BodyPosition {
            ra,
            dec,
            distance,
            xyz,
        }
    }

    /// The position as a [`Celest`] referred to the equinox of `jd`.
    pub fn to_celest(&self, jd: JulianDate) -> Celest {
        Celest::new(self.ra, self.dec, julian_epoch(jd)).with_distance(self.distance)
    }
}
