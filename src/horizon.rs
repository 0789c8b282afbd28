//! # Horizon geometry
//!
//! Spherical-trigonometry helpers tying an equatorial position to the local horizon of an
//! observer: altitude, azimuth and parallactic angle, extreme altitudes, the hour angle at which
//! a given altitude is reached, true airmass, and the observer's geocentric position used for
//! parallax corrections.
//!
//! Outcomes that are physically meaningful rather than erroneous (an object that never reaches
//! an altitude, an object below the horizon) are reported through
//! [`HourAngleAtAltitude`] and `Option` instead of magic numbers.

use nalgebra::Vector3;

use crate::constants::{
    Degree, Hour, Meter, DEG_IN_RADIAN, EARTHRAD_IN_AU, EQUAT_RAD, FLATTEN, HRS_IN_RADIAN,
    PI_OVER_2,
};
use crate::ref_system::{cel_unit_xyz, xyz_cel};

/// Local horizon coordinates of a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltAz {
    /// Altitude above the astronomical horizon, degrees.
    pub altitude: Degree,
    /// Azimuth, degrees east of north, in `[0, 360)`.
    pub azimuth: Degree,
    /// Parallactic angle, degrees.
    pub parallactic: Degree,
}

/// Altitude, azimuth and parallactic angle.
///
/// Arguments
/// ---------
/// * `dec`: declination in degrees.
/// * `ha`: hour angle in hours.
/// * `lat`: observer latitude in degrees.
///
/// Returns
/// --------
/// * The [`AltAz`] triple. At the celestial pole (`cos dec` below `1e-12`) the parallactic angle is
///   undefined and is set to 180° for northern sites and 0° for southern ones.
pub fn altit(dec: Degree, ha: Hour, lat: Degree) -> AltAz {
    let dec = dec / DEG_IN_RADIAN;
    let ha = ha / HRS_IN_RADIAN;
    let latr = lat / DEG_IN_RADIAN;

    let (sd, cd) = dec.sin_cos();
    let (sh, ch) = ha.sin_cos();
    let (sl, cl) = latr.sin_cos();

    let altitude = (cd * ch * cl + sd * sl).asin();
    let y = sd * cl - cd * ch * sl;
    let z = -cd * sh;
    let mut az = z.atan2(y);
    if az < 0.0 {
        az += 2.0 * std::f64::consts::PI;
    }

    let parallactic = if cd.abs() > 1.0e-12 {
        let sinp = -az.sin() * cl / cd;
        let cosp = -az.cos() * ch - az.sin() * sh * sl;
        sinp.atan2(cosp) * DEG_IN_RADIAN
    } else if lat >= 0.0 {
        180.0
    } else {
        0.0
    };

    AltAz {
        altitude: altitude * DEG_IN_RADIAN,
        azimuth: az * DEG_IN_RADIAN,
        parallactic,
    }
}

/// Lowest and highest altitude reached by an object at declination `dec` seen from latitude
/// `lat`, in degrees: `(min, max)`.
///
/// An out-of-range inverse-sine argument can only come from rounding; it is logged and clamped.
pub fn min_max_alt(lat: Degree, dec: Degree) -> (Degree, Degree) {
    let lat = lat / DEG_IN_RADIAN;
    let dec = dec / DEG_IN_RADIAN;

    let checked_asin = |x: f64, which: &str| {
        if x.abs() > 1.0 {
            log::warn!("min_max_alt: {which} altitude has arcsin argument {x}, clamped");
        }
        x.clamp(-1.0, 1.0).asin() * DEG_IN_RADIAN
    };

    let max = checked_asin(dec.cos() * lat.cos() + dec.sin() * lat.sin(), "maximum");
    let min = checked_asin(dec.sin() * lat.sin() - dec.cos() * lat.cos(), "minimum");
    (min, max)
}

/// Outcome of [`ha_alt`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HourAngleAtAltitude {
    /// The altitude is reached at `±ha` hours.
    Crossing(Hour),
    /// The object never goes below the altitude.
    AlwaysAbove,
    /// The object never climbs to the altitude.
    AlwaysBelow,
}

/// Unsigned hour angle at which an object at `dec` passes altitude `alt` seen from `lat`.
///
/// Remarks
/// -------
/// The extreme altitudes are checked first, so that circumpolar and never-rising objects are
/// detected without calling `acos`.
pub fn ha_alt(dec: Degree, lat: Degree, alt: Degree) -> HourAngleAtAltitude {
    let (min, max) = min_max_alt(lat, dec);
    if alt < min {
        return HourAngleAtAltitude::AlwaysAbove;
    }
    if alt > max {
        return HourAngleAtAltitude::AlwaysBelow;
    }

    let codec = PI_OVER_2 - dec / DEG_IN_RADIAN;
    let colat = PI_OVER_2 - lat / DEG_IN_RADIAN;
    let coalt = PI_OVER_2 - alt / DEG_IN_RADIAN;
    let x = (coalt.cos() - codec.cos() * colat.cos()) / (codec.sin() * colat.sin());

    if x.abs() <= 1.0 {
        HourAngleAtAltitude::Crossing(x.acos() * HRS_IN_RADIAN)
    } else {
        log::warn!("ha_alt: arccos argument {x} out of range for dec {dec}, lat {lat}");
        HourAngleAtAltitude::AlwaysAbove
    }
}

/// True airmass at altitude `alt` (degrees).
///
/// A cubic fit in `sec z - 1` to the refraction-integrated airmass tables of Snell and Heiser
/// is subtracted from `sec z`. Beyond `sec z = 12` the fit is replaced by `sec z - 1.5`.
///
/// Returns
/// --------
/// * `None` when the object is on or below the horizon.
pub fn true_airmass(alt: Degree) -> Option<f64> {
    const COEF: [f64; 4] = [2.879465e-3, 3.033104e-3, 1.351167e-3, -4.716679e-5];

    if alt <= 0.0 {
        return None;
    }

    let secz = 1.0 / (alt / DEG_IN_RADIAN).sin();
    if secz > 12.0 {
        return Some(secz - 1.5);
    }

    let seczmin1 = secz - 1.0;
    let correction = COEF
        .iter()
        .rev()
        .fold(0.0, |acc, c| (acc + c) * seczmin1);
    Some(secz - correction)
}

/// Altitude at which [`true_airmass`] equals `airmass`, by bisection.
///
/// Returns `None` for `airmass < 1` or NaN.
pub fn altitude_at_airmass(airmass: f64) -> Option<Degree> {
    if airmass.is_nan() || airmass < 1.0 {
        return None;
    }
    let (mut low, mut high) = (1.0e-6, 90.0);
    for _ in 0..60 {
        let mid = 0.5 * (low + high);
        match true_airmass(mid) {
            Some(x) if x > airmass => low = mid,
            _ => high = mid,
        }
    }
    Some(0.5 * (low + high))
}

/// Geocentric rectangular position of an observer, in Earth equatorial radii.
///
/// Arguments
/// ---------
/// * `longitude`: longitude of the x axis crossing, in hours. Pass the local sidereal time to
///   get coordinates in the equatorial frame of date.
/// * `lat`: geodetic latitude in degrees.
/// * `height`: height above the ellipsoid, in meters.
///
/// # References
/// * Astronomical Almanac 1992, p. K11.
pub fn geocent(longitude: Hour, lat: Degree, height: Meter) -> Vector3<f64> {
    let (sinlat, coslat) = (lat / DEG_IN_RADIAN).sin_cos();
    let (sinlong, coslong) = (longitude / HRS_IN_RADIAN).sin_cos();

    let flat = (1.0 - FLATTEN) * sinlat;
    let c_geo = 1.0 / (coslat * coslat + flat * flat).sqrt();
    let s_geo = (1.0 - FLATTEN) * (1.0 - FLATTEN) * c_geo;

    let c_geo = c_geo + height / EQUAT_RAD;
    let s_geo = s_geo + height / EQUAT_RAD;

    Vector3::new(
        c_geo * coslat * coslong,
        c_geo * coslat * sinlong,
        s_geo * sinlat,
    )
}

/// Topocentric position of a nearby body.
///
/// Arguments
/// ---------
/// * `ra`, `dec`: geocentric position, hours and degrees (equinox of date).
/// * `distance`: geocentric distance in AU.
/// * `lat`, `height`: observer latitude (degrees) and elevation (meters).
/// * `sidereal`: local sidereal time in hours.
///
/// Returns
/// --------
/// * `(ra, dec, distance)` seen from the observer.
pub fn topocorr(
    ra: Hour,
    dec: Degree,
    distance: f64,
    lat: Degree,
    height: Meter,
    sidereal: Hour,
) -> (Hour, Degree, f64) {
    let body = cel_unit_xyz(ra, dec) * distance;
    let observer = geocent(sidereal, lat, height) / EARTHRAD_IN_AU;
    xyz_cel(&(body - observer))
}
