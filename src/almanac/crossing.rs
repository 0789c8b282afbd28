//! Altitude crossings of the Sun and the Moon.
//!
//! A Newton–Raphson search on the altitude as a function of time. The derivative is a secant over
//! [`SECANT_STEP`] days taken once at the starting guess; the iteration stops when the altitude is
//! within [`ALTITUDE_TOLERANCE`] of the target or after [`MAX_ITERATIONS`] steps.

use std::fmt;

use crate::calendar::DateStyle;
use crate::constants::{Degree, JulianDate};
use crate::ephemeris::moon::moon_topocentric;
use crate::ephemeris::sun::sun_position;
use crate::horizon::altit;
use crate::instant::Instant;
use crate::site::Site;
use crate::skycalc_errors::SkycalcError;
use crate::time::lst;

/// Secant step for the altitude derivative, days.
pub const SECANT_STEP: f64 = 0.002;

/// Convergence tolerance on the altitude, degrees.
pub const ALTITUDE_TOLERANCE: Degree = 0.02;

pub const MAX_ITERATIONS: usize = 10;

/// When a body passes a given altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// Passes the altitude at this UT Julian Date.
    At(JulianDate),
    /// Stays above the altitude all night.
    AlwaysAbove,
    /// Never reaches the altitude.
    NeverAbove,
    /// The search did not converge.
    NoConvergence,
}

impl Crossing {
    /// Wrap a solver result, logging a failure.
    pub(crate) fn from_solution(solution: Result<JulianDate, SkycalcError>, what: &str) -> Self {
        match solution {
            Ok(jd) => Crossing::At(jd),
            Err(e) => {
                log::warn!("{what}: {e}");
                Crossing::NoConvergence
            }
        }
    }

    pub fn jd(&self) -> Option<JulianDate> {
        match self {
            Crossing::At(jd) => Some(*jd),
            _ => None,
        }
    }

    /// Local clock time of the crossing (`HH:MM`) in the zone of `reference`, or a short label.
    pub fn local_time(&self, reference: &Instant) -> String {
        match self {
            Crossing::At(jd) => reference
                .with_jd(*jd)
                .local_date()
                .format(DateStyle::TimeOnlyMinutes, 0),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Crossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crossing::At(jd) => write!(f, "JD {jd:.5}"),
            Crossing::AlwaysAbove => write!(f, "always above"),
            Crossing::NeverAbove => write!(f, "never above"),
            Crossing::NoConvergence => write!(f, "no convergence"),
        }
    }
}

/// Time near `guess` at which `altitude(jd)` equals `target`.
///
/// Arguments
/// ---------
/// * `altitude`: altitude of the body at a UT Julian Date, degrees.
/// * `target`: altitude sought, degrees.
/// * `guess`: starting Julian Date, normally within an hour or two of the answer.
///
/// Returns
/// --------
/// * The Julian Date, or [`SkycalcError::ConvergenceFailure`] after [`MAX_ITERATIONS`] steps.
pub fn solve_altitude<F>(altitude: F, target: Degree, guess: JulianDate) -> Result<JulianDate, SkycalcError>
where
    F: Fn(JulianDate) -> Degree,
{
    let alt2 = altitude(guess);
    let mut jd = guess + SECANT_STEP;
    let alt3 = altitude(jd);
    let deriv = (alt3 - alt2) / SECANT_STEP;
    let mut err = alt3 - target;

    let mut iterations = 0;
    while err.abs() > ALTITUDE_TOLERANCE {
        if iterations == MAX_ITERATIONS || deriv == 0.0 {
            return Err(SkycalcError::ConvergenceFailure {
                iterations,
                near_jd: guess,
            });
        }
        jd -= err / deriv;
        err = altitude(jd) - target;
        iterations += 1;
    }
    Ok(jd)
}

/// Altitude of the geocentric Sun seen from `site`.
pub fn sun_altitude(jd: JulianDate, site: &Site) -> Degree {
    let sun = sun_position(jd);
    let ha = lst(jd, site.longitude()) - sun.ra;
    altit(sun.dec, ha, site.latitude()).altitude
}

/// Altitude of the topocentric Moon seen from `site`.
pub fn moon_altitude(jd: JulianDate, site: &Site) -> Degree {
    let sidereal = lst(jd, site.longitude());
    let moon = moon_topocentric(jd, site.latitude(), site.elevation_sea(), sidereal);
    altit(moon.dec, sidereal - moon.ra, site.latitude()).altitude
}

/// When the Sun passes altitude `alt` near `guess`.
pub fn jd_sun_alt(alt: Degree, guess: JulianDate, site: &Site) -> Result<JulianDate, SkycalcError> {
    solve_altitude(|jd| sun_altitude(jd, site), alt, guess)
}

/// When the Moon passes altitude `alt` near `guess`.
pub fn jd_moon_alt(alt: Degree, guess: JulianDate, site: &Site) -> Result<JulianDate, SkycalcError> {
    solve_altitude(|jd| moon_altitude(jd, site), alt, guess)
}

#[cfg(test)]
mod crossing_test {
    use super::*;
    use crate::site::dst::{DstRule, ZoneRule};
    use approx::assert_abs_diff_eq;

    fn greenwich() -> Site {
        let zone = ZoneRule {
            std_offset: 0.0,
            dst: DstRule::None,
        };
        Site::new("Greenwich", 0.0, 51.4769, zone).unwrap()
    }

    #[test]
    fn test_solve_linear() {
        let jd = solve_altitude(|jd| 10.0 * (jd - 100.0), 5.0, 100.2).unwrap();
        assert_abs_diff_eq!(jd, 100.5, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_gives_up() {
        // no root
        let err = solve_altitude(|jd| 5.0 + (jd * 40.0).sin(), -10.0, 0.0).unwrap_err();
        assert!(matches!(err, SkycalcError::ConvergenceFailure { .. }));

        let flat = solve_altitude(|_| 3.0, 0.0, 10.0);
        assert!(flat.is_err());
        assert_eq!(
            Crossing::from_solution(flat, "flat"),
            Crossing::NoConvergence
        );
    }

    #[test]
    fn test_sunset_greenwich() {
        // 2020-06-21 sunset at Greenwich is near 20:21 UT
        let site = greenwich();
        let guess = 2_459_021.5 + 20.0 / 24.0;
        let jd = jd_sun_alt(-0.83, guess, &site).unwrap();
        assert!((sun_altitude(jd, &site) + 0.83).abs() <= ALTITUDE_TOLERANCE);
        let hours = (jd - 2_459_021.5) * 24.0;
        assert!(hours > 20.2 && hours < 20.5, "sunset at {hours} h UT");
    }

    #[test]
    fn test_moonset() {
        let site = greenwich();
        let jd0 = 2_459_000.5;
        let hour = |h: usize| jd0 + h as f64 / 24.0;
        // the Moon sets at least once in any 30 hours at this latitude
        let h = (0..30)
            .find(|&h| moon_altitude(hour(h), &site) > 0.0 && moon_altitude(hour(h + 1), &site) <= 0.0)
            .unwrap();
        let jd = jd_moon_alt(0.0, hour(h), &site).unwrap();
        assert!(moon_altitude(jd, &site).abs() <= ALTITUDE_TOLERANCE);
        assert!(jd > hour(h) - 0.01 && jd < hour(h + 1) + 0.01);
    }

    #[test]
    fn test_crossing_accessors() {
        assert_eq!(Crossing::At(2.5).jd(), Some(2.5));
        assert_eq!(Crossing::AlwaysAbove.jd(), None);
        assert_eq!(Crossing::NeverAbove.to_string(), "never above");
    }
}
