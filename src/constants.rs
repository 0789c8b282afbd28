//! # Constants and type definitions for skycalc
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** shared by the calendar, ephemeris and almanac engines.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants (Earth figure, light time, mass ratios)
//! - Unit conversions (degrees ↔ radians, hours ↔ radians, AU/day ↔ km/s)
//! - Core type aliases used across the crate
//! - Identifiers for the nine major bodies handled by the low-precision planet series
//!
//! The values follow the conventions of the low-precision almanac formulae: lengths are in AU or
//! Earth radii, time is in days, right ascension and hour angle are in **hours**.

use std::fmt;
use std::str::FromStr;

use crate::skycalc_errors::SkycalcError;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// π/2
pub const PI_OVER_2: f64 = std::f64::consts::FRAC_PI_2;

/// Julian Date of J2000.0 (2000-01-01 12:00:00)
pub const J2000: f64 = 2_451_545.0;

/// Julian Date of the 1900 January 0.5 epoch used by the Newcomb-era series
pub const J1900: f64 = 2_415_020.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Degrees in one radian
pub const DEG_IN_RADIAN: f64 = 57.2957795130823;

/// Hours in one radian
pub const HRS_IN_RADIAN: f64 = 3.81971863420549;

/// Arcseconds in one radian
pub const ARCSEC_IN_RADIAN: f64 = 206_264.806247096;

/// Earth radii in one astronomical unit
pub const EARTHRAD_IN_AU: f64 = 23_454.7910556298;

/// Earth equatorial radius in kilometers
pub const EARTHRAD_IN_KM: f64 = 6378.1366;

/// One AU/day expressed in km/s
pub const KMS_AUDAY: f64 = 1731.45683633;

/// Speed of light in km/s
pub const SPEED_OF_LIGHT: f64 = 299_792.458;

/// Total solar-system mass in units of the solar mass
pub const SS_MASS: f64 = 1.00134198;

/// Astronomical unit in meters
pub const ASTRO_UNIT: f64 = 1.4959787066e11;

/// Light travel time across one AU, in seconds
pub const LIGHTSEC_IN_AU: f64 = 499.0047863852;

/// Earth rotation rate in rad/s
pub const OMEGA_EARTH: f64 = 7.292116e-5;

/// Ratio of the sidereal to the solar rate
pub const SID_RATE: f64 = 1.0027379093;

/// Earth flattening (1/298.257)
pub const FLATTEN: f64 = 0.003352813;

/// Earth equatorial radius in meters
pub const EQUAT_RAD: f64 = 6_378_137.0;

/// Mean Earth–Moon distance in Earth radii
pub const MEAN_MOON_DIST: f64 = 60.27;

/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530589;

/// Planet-to-Sun mass ratios (IAU 1976), Mercury through Pluto
pub const PLANET_MASS: [f64; 9] = [
    1.660137e-7,
    2.447840e-6,
    3.040433e-6,
    3.227149e-7,
    9.547907e-4,
    2.858776e-4,
    4.355401e-5,
    5.177591e-5,
    7.69e-9,
];

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in hours (1h = 15°)
pub type Hour = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in Earth radii
pub type EarthRadii = f64;
/// Distance in meters
pub type Meter = f64;
/// Julian Date (days, UT unless stated otherwise)
pub type JulianDate = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------------------------------------

/// One of the nine major bodies of the low-precision planet series.
///
/// The discriminant is the index into the element and mass tables
/// (`Mercury = 0` … `Pluto = 8`). Earth is part of the table because its elements are
/// needed to form geocentric planet positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Planet {
    Mercury = 0,
    Venus = 1,
    Earth = 2,
    Mars = 3,
    Jupiter = 4,
    Saturn = 5,
    Uranus = 6,
    Neptune = 7,
    Pluto = 8,
}

impl Planet {
    /// All bodies in table order.
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    /// Table index of the body.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    /// Mass ratio to the Sun.
    pub fn mass(self) -> f64 {
        PLANET_MASS[self.index()]
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<usize> for Planet {
    type Error = SkycalcError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        Planet::ALL
            .get(idx)
            .copied()
            .ok_or(SkycalcError::UnknownPlanet(idx.to_string()))
    }
}

impl FromStr for Planet {
    type Err = SkycalcError;

    /// Case-insensitive match on the English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Planet::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SkycalcError::UnknownPlanet(s.to_string()))
    }
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_planet_lookup() {
        assert_eq!(Planet::try_from(4).unwrap(), Planet::Jupiter);
        assert!(Planet::try_from(9).is_err());
        assert_eq!("saturn".parse::<Planet>().unwrap(), Planet::Saturn);
        assert!("Vulcan".parse::<Planet>().is_err());
        assert_eq!(Planet::Pluto.to_string(), "Pluto");
    }

    #[test]
    fn test_unit_consistency() {
        assert!((DEG_IN_RADIAN / 15.0 - HRS_IN_RADIAN).abs() < 1e-12);
        assert!((ARCSEC_IN_RADIAN / 3600.0 - DEG_IN_RADIAN).abs() < 1e-9);
        assert!((ASTRO_UNIT / 1000.0 / EARTHRAD_IN_KM - EARTHRAD_IN_AU).abs() < 1e-2);
    }
}
