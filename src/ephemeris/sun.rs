//! Geocentric Sun.
//!
//! Meeus, *Astronomical Formulae for Calculators*, ch. 18: mean longitude and anomaly counted
//! from 1900 January 0.5, an equation of centre to third order in the anomaly, and five
//! periodic terms for Venus, Jupiter, the Earth–Moon barycentre and the long-period inequality.
//! Positions are referred to the mean equinox of date.

use nalgebra::Vector3;

use super::BodyPosition;
use crate::constants::{JulianDate, DEG_IN_RADIAN, J1900, SECONDS_PER_DAY};
use crate::ref_system::ecliptic_to_equatorial;
use crate::time::etcorr;

/// Step of the central difference used for the velocity, in days.
const VELOCITY_STEP: f64 = 0.05;

/// Geocentric Sun at dynamical time `jd_tt`.
pub fn sun_position_tt(jd_tt: JulianDate) -> BodyPosition {
    let t = (jd_tt - J1900) / 36525.0;
    let tsq = t * t;
    let tcb = tsq * t;

    let l = 279.69668 + 36000.76892 * t + 0.0003025 * tsq;
    let m = 358.47583 + 35999.04975 * t - 0.000150 * tsq - 0.0000033 * tcb;
    let e = 0.01675104 - 0.0000418 * t - 0.000000126 * tsq;

    // A, B: Venus; C, H: Jupiter; D: Earth-Moon barycentre; E: long-period inequality
    let a = (153.23 + 22518.7541 * t) / DEG_IN_RADIAN;
    let b = (216.57 + 45037.5082 * t) / DEG_IN_RADIAN;
    let c = (312.69 + 32964.3577 * t) / DEG_IN_RADIAN;
    let d = (350.74 + 445267.1142 * t - 0.00144 * tsq) / DEG_IN_RADIAN;
    let ee = (231.19 + 20.20 * t) / DEG_IN_RADIAN;
    let h = (353.40 + 65928.7155 * t) / DEG_IN_RADIAN;

    let l = l
        + 0.00134 * a.cos()
        + 0.00154 * b.cos()
        + 0.00200 * c.cos()
        + 0.00179 * d.sin()
        + 0.00178 * ee.sin();

    let mrad = m / DEG_IN_RADIAN;
    let cent = (1.919460 - 0.004789 * t - 0.000014 * tsq) * mrad.sin()
        + (0.020094 - 0.000100 * t) * (2.0 * mrad).sin()
        + 0.000293 * (3.0 * mrad).sin();

    let sunlong = (l + cent) / DEG_IN_RADIAN;
    let nu = (m + cent) / DEG_IN_RADIAN;

    let r = 1.0000002 * (1.0 - e * e) / (1.0 + e * nu.cos())
        + 0.00000543 * a.sin()
        + 0.00001575 * b.sin()
        + 0.00001627 * c.sin()
        + 0.00003076 * d.cos()
        + 0.00000927 * h.sin();

    let ecliptic = Vector3::new(sunlong.cos(), sunlong.sin(), 0.0);
    BodyPosition::from_xyz(ecliptic_to_equatorial(jd_tt, &ecliptic) * r)
}

/// Geocentric Sun at UT Julian Date `jd`.
///
/// # Example
/// ```
/// use skycalc::ephemeris::sun::sun_position;
///
/// let sun = sun_position(2_451_545.0);
/// assert!((sun.ra - 18.7526).abs() < 0.001);
/// assert!((sun.dec + 23.033).abs() < 0.01);
/// ```
pub fn sun_position(jd: JulianDate) -> BodyPosition {
    sun_position_tt(jd + etcorr(jd) / SECONDS_PER_DAY)
}

/// Geocentric velocity of the Sun at UT `jd`, in AU/day, equatorial frame of date.
///
/// Central difference of [`sun_position`] over 0.05 day, good to about eight digits.
pub fn sun_velocity(jd: JulianDate) -> Vector3<f64> {
    let before = sun_position(jd - VELOCITY_STEP / 2.0).xyz;
    let after = sun_position(jd + VELOCITY_STEP / 2.0).xyz;
    (after - before) / VELOCITY_STEP
}
