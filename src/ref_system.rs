//! # Reference frames
//!
//! Rotation matrices between the equatorial frames of different equinoxes, the ecliptic of date
//! and the B1950 galactic frame, plus the unit-vector conversions every other module builds on.
//!
//! All matrices act on column vectors (`x' = R · x`) and are built from [`rotmt`], an active
//! rotation about one principal axis.
//!
//! ```text
//! equatorial (equinox A) --precession_matrix(A, B)--> equatorial (equinox B)
//! ecliptic of date       --ecliptic_to_equatorial--->  equatorial of date
//! equatorial B1950       --galactic_matrix---------->  galactic (l, b)
//! ```

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{
    Degree, Hour, JulianDate, Radian, ARCSEC_IN_RADIAN, DEG_IN_RADIAN, HRS_IN_RADIAN, J2000,
    PI_OVER_2,
};

/// Principal axis of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Active right-handed rotation by `alpha` radians about `axis`.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians (counter-clockwise seen from the tip of the axis).
/// * `axis`: the rotation axis.
///
/// Returns
/// --------
/// * The orthonormal matrix `R` such that the rotated vector is `R · x`.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rigorous precession matrix between two equinoxes (IAU 1976 angles).
///
/// Arguments
/// ---------
/// * `orig_equinox`: equinox of the input coordinates, in decimal years.
/// * `final_equinox`: equinox of the output coordinates, in decimal years.
///
/// Returns
/// --------
/// * The matrix `P` with `x_final = P · x_orig`.
///
/// Remarks
/// -------
/// The angles ζ, z and θ are polynomials in `ti`, the centuries from J2000 to the initial
/// equinox, and `tf`, the centuries from the initial to the final equinox (Lieske et al. 1977).
/// The matrix is the product `Rz(z) · Ry(−θ) · Rz(ζ)` and is applied in full, never in a
/// small-angle approximation.
pub fn precession_matrix(orig_equinox: f64, final_equinox: f64) -> Matrix3<f64> {
    let ti = (orig_equinox - 2000.0) / 100.0;
    let tf = (final_equinox - 2000.0 - 100.0 * ti) / 100.0;

    let zeta = (2306.2181 + 1.39656 * ti - 0.000139 * ti * ti) * tf
        + (0.30188 - 0.000344 * ti) * tf * tf
        + 0.017998 * tf * tf * tf;
    let z = zeta + (0.79280 + 0.000410 * ti) * tf * tf + 0.000205 * tf * tf * tf;
    let theta = (2004.3109 - 0.8533 * ti - 0.000217 * ti * ti) * tf
        - (0.42665 + 0.000217 * ti) * tf * tf
        - 0.041833 * tf * tf * tf;

    let zeta = zeta / ARCSEC_IN_RADIAN;
    let z = z / ARCSEC_IN_RADIAN;
    let theta = theta / ARCSEC_IN_RADIAN;

    rotmt(z, Axis::Z) * rotmt(-theta, Axis::Y) * rotmt(zeta, Axis::Z)
}

/// Mean obliquity of the ecliptic at `jd` (Astronomical Almanac 1992, cubic term dropped).
pub fn mean_obliquity(jd: JulianDate) -> Radian {
    let t = (jd - J2000) / 36525.0;
    (23.439291 + t * (-0.0130042 - 0.00000016 * t)) / DEG_IN_RADIAN
}

/// Rotate ecliptic-of-date rectangular coordinates into the equatorial frame of date.
pub fn ecliptic_to_equatorial(jd: JulianDate, ecliptic: &Vector3<f64>) -> Vector3<f64> {
    rotmt(mean_obliquity(jd), Axis::X) * ecliptic
}

/// Inverse of [`ecliptic_to_equatorial`].
pub fn equatorial_to_ecliptic(jd: JulianDate, equatorial: &Vector3<f64>) -> Vector3<f64> {
    rotmt(-mean_obliquity(jd), Axis::X) * equatorial
}

/// Rotation from B1950 equatorial to galactic rectangular coordinates.
///
/// The inverse is the transpose.
pub fn galactic_matrix() -> Matrix3<f64> {
    Matrix3::new(
        -0.066988739415,
        -0.872755765852,
        -0.483538914632,
        0.492728466075,
        -0.450346958020,
        0.744584633283,
        -0.867600811151,
        -0.188374601723,
        0.460199784784,
    )
}

/// Unit vector toward `(ra, dec)`.
pub fn cel_unit_xyz(ra: Hour, dec: Degree) -> Vector3<f64> {
    let ra = ra / HRS_IN_RADIAN;
    let dec = dec / DEG_IN_RADIAN;
    Vector3::new(ra.cos() * dec.cos(), ra.sin() * dec.cos(), dec.sin())
}

/// Spherical coordinates of a rectangular vector.
///
/// Returns
/// --------
/// * `(ra, dec, modulus)` with `ra` in hours in `[0, 24)` and `dec` in degrees.
///
/// Remarks
/// -------
/// * The zero vector maps to `(0, 0, 0)`.
/// * Within `1e-11` of a pole (after normalization) the RA is degenerate and is set to 0, with the
///   declination ±90 by the sign of `z`.
pub fn xyz_cel(v: &Vector3<f64>) -> (Hour, Degree, f64) {
    let modulus = v.norm();
    if modulus <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let u = v / modulus;

    let xy = u.x.hypot(u.y);
    if xy < 1.0e-11 {
        let dec = if u.z < 0.0 { -PI_OVER_2 } else { PI_OVER_2 };
        return (0.0, dec * DEG_IN_RADIAN, modulus);
    }

    let mut ra = u.y.atan2(u.x) * HRS_IN_RADIAN;
    if ra < 0.0 {
        ra += 24.0;
    }
    (ra, u.z.asin() * DEG_IN_RADIAN, modulus)
}
