//! # Night-sky brightness
//!
//! Two empirical models of the sky surface brightness seen by an observer:
//!
//! * [`lunar_sky_brightness`]: the Krisciunas & Schaefer (1991) model of the V-band sky brightness
//!   contributed by scattered moonlight,
//! * [`twilight_brightening`]: a polynomial fit of the zenith brightening in blue light during
//!   twilight, as a function of the Sun's altitude.
//!
//! # References
//!
//! * Krisciunas, K. & Schaefer, B. E. 1991, *A model of the brightness of moonlight*,
//!   PASP 103, 1033.

use crate::constants::{Degree, EarthRadii, DEG_IN_RADIAN, MEAN_MOON_DIST};

/// Airmass returned by the Krisciunas & Schaefer airmass formula when it diverges.
const DIVERGED_AIRMASS: f64 = 10000.0;

/// Moon brightness below this (nanoLamberts) is treated as no contribution.
const FAINTEST_MOON_NL: f64 = 0.001;

/// Inputs of the lunar sky-brightness model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonlightGeometry {
    /// Moon–Sun elongation in degrees (180 at full moon).
    pub elongation: Degree,
    /// Angular distance between the moon and the sky position, in degrees.
    pub separation: Degree,
    /// V-band zenith extinction in magnitudes per airmass.
    pub extinction: f64,
    /// Altitude of the moon in degrees.
    pub moon_altitude: Degree,
    /// Altitude of the sky position in degrees.
    pub altitude: Degree,
    /// Topocentric distance of the moon in Earth radii.
    pub moon_distance: EarthRadii,
}

/// Airmass of the Krisciunas & Schaefer model for zenith distance `z` (radians).
fn ks_airmass(z: f64) -> f64 {
    let t = 1.0 - 0.96 * z.sin().powi(2);
    if t <= 0.0 {
        DIVERGED_AIRMASS
    } else {
        1.0 / t.sqrt()
    }
}

/// Sky brightness due to moonlight, in V magnitudes per square arcsecond.
///
/// Returns `None` when either the moon or the sky position is below the horizon, or when the
/// scattered moonlight is negligible (under 0.001 nanoLambert).
///
/// Remarks
/// -------
/// The model only describes the moonlight term; the dark-sky and twilight contributions are not
/// included. Callers usually restrict it to a Sun below −12°.
///
/// # Example
/// ```
/// use skycalc::sky_brightness::{lunar_sky_brightness, MoonlightGeometry};
///
/// let full_moon = MoonlightGeometry {
///     elongation: 180.0,
///     separation: 45.0,
///     extinction: 0.172,
///     moon_altitude: 60.0,
///     altitude: 60.0,
///     moon_distance: 60.27,
/// };
/// let v = lunar_sky_brightness(&full_moon).unwrap();
/// assert!((v - 17.83).abs() < 0.01);
/// ```
pub fn lunar_sky_brightness(geometry: &MoonlightGeometry) -> Option<f64> {
    if geometry.moon_altitude < 0.0 || geometry.altitude < 0.0 {
        return None;
    }

    // phase angle, 0 at full moon
    let alpha = (180.0 - geometry.elongation).abs();
    let moon_zenith = (90.0 - geometry.moon_altitude) / DEG_IN_RADIAN;
    let zenith = (90.0 - geometry.altitude) / DEG_IN_RADIAN;
    let distance = geometry.moon_distance / MEAN_MOON_DIST;

    let mut istar = 10f64.powf(-0.4 * (3.84 + 0.026 * alpha + 4.0e-9 * alpha.powi(4)))
        / (distance * distance);
    // opposition effect
    if alpha < 7.0 {
        istar *= 1.35 - 0.05 * alpha;
    }

    let rho = geometry.separation;
    let scattering = (1.06 + (rho / DEG_IN_RADIAN).cos().powi(2)) * 10f64.powf(5.36)
        + 10f64.powf(6.15 - rho / 40.0);

    let k = geometry.extinction;
    let nanolamberts = scattering
        * istar
        * 10f64.powf(-0.4 * k * ks_airmass(moon_zenith))
        * (1.0 - 10f64.powf(-0.4 * k * ks_airmass(zenith)));

    (nanolamberts > FAINTEST_MOON_NL).then(|| 22.50 - 1.08574 * (nanolamberts / 34.08).ln())
}

/// Zenith sky brightening due to twilight, in blue magnitudes, for a Sun at `sun_altitude`.
///
/// Returns
/// --------
/// * `None` in daylight (Sun above the horizon),
/// * `Some(0.0)` once the Sun is more than 18° below the horizon,
/// * otherwise the brightening, from about 14.7 mag at sunset down to 0 at the end of
///   astronomical twilight.
pub fn twilight_brightening(sun_altitude: Degree) -> Option<f64> {
    if sun_altitude > 0.0 {
        return None;
    }
    if sun_altitude < -18.0 {
        return Some(0.0);
    }
    let y = (-sun_altitude - 9.0) / 9.0;
    Some(((2.0635175 * y + 1.246602) * y - 9.4084495) * y + 6.132725)
}

#[cfg(test)]
mod sky_brightness_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn geometry(elongation: f64, separation: f64, moon_alt: f64, alt: f64) -> MoonlightGeometry {
        MoonlightGeometry {
            elongation,
            separation,
            extinction: 0.172,
            moon_altitude: moon_alt,
            altitude: alt,
            moon_distance: 60.27,
        }
    }

    #[test]
    fn test_full_moon_values() {
        let v = lunar_sky_brightness(&geometry(180.0, 45.0, 60.0, 60.0)).unwrap();
        assert_abs_diff_eq!(v, 17.8267, epsilon = 1e-3);

        // brighter near the moon, fainter far away
        let near = lunar_sky_brightness(&geometry(180.0, 10.0, 60.0, 60.0)).unwrap();
        let far = lunar_sky_brightness(&geometry(180.0, 90.0, 60.0, 60.0)).unwrap();
        assert_abs_diff_eq!(near, 16.7410, epsilon = 1e-3);
        assert_abs_diff_eq!(far, 18.4931, epsilon = 1e-3);
    }

    #[test]
    fn test_quarter_and_crescent() {
        let quarter = lunar_sky_brightness(&geometry(90.0, 45.0, 45.0, 45.0)).unwrap();
        assert_abs_diff_eq!(quarter, 20.6101, epsilon = 1e-3);
        let crescent = lunar_sky_brightness(&geometry(30.0, 60.0, 10.0, 30.0)).unwrap();
        assert_abs_diff_eq!(crescent, 24.3754, epsilon = 1e-3);
    }

    #[test]
    fn test_below_horizon() {
        assert!(lunar_sky_brightness(&geometry(180.0, 45.0, -1.0, 60.0)).is_none());
        assert!(lunar_sky_brightness(&geometry(180.0, 45.0, 60.0, -1.0)).is_none());
    }

    #[test]
    fn test_closer_moon_is_brighter() {
        let mut g = geometry(150.0, 30.0, 40.0, 50.0);
        let mean = lunar_sky_brightness(&g).unwrap();
        g.moon_distance = 56.0;
        let perigee = lunar_sky_brightness(&g).unwrap();
        assert!(perigee < mean);
    }

    #[test]
    fn test_twilight() {
        assert!(twilight_brightening(1.0).is_none());
        assert_abs_diff_eq!(twilight_brightening(0.0).unwrap(), 14.724259, epsilon = 1e-6);
        assert_abs_diff_eq!(twilight_brightening(-12.0).unwrap(), 3.211513, epsilon = 1e-6);
        assert_abs_diff_eq!(twilight_brightening(-18.0).unwrap(), 0.034395, epsilon = 1e-6);
        assert_eq!(twilight_brightening(-25.0), Some(0.0));

        let mut previous = f64::INFINITY;
        for i in 0..=18 {
            let value = twilight_brightening(-(i as f64)).unwrap();
            assert!(value < previous);
            previous = value;
        }
    }
}
