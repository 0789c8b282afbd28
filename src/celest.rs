//! # Celestial positions
//!
//! A [`Celest`] is an equatorial position (RA in hours, Dec in degrees) **with its equinox**, and
//! optionally a distance in AU. Two positions are only comparable once they refer to the same
//! equinox; [`Celest::subtend`] precesses its argument before measuring the angle.
//!
//! Conversions provided here:
//!
//! - [`Celest::precessed`] – rigorous precession to another equinox,
//! - [`Celest::galactic`] / [`Celest::from_galactic`] – B1950 galactic frame,
//! - [`Celest::ecliptic`] – ecliptic longitude and latitude of date,
//! - [`Celest::parse_pair`] – one line of text holding both coordinates.

use std::fmt;

use nalgebra::Vector3;
use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{one_of, space0},
    combinator::{all_consuming, map_res, opt},
    multi::many1,
    sequence::{preceded, terminated},
    IResult, Parser,
};

use crate::angles::{BoundedAngle, WrapPolicy};
use crate::constants::{
    Degree, Hour, JulianDate, Radian, DEG_IN_RADIAN, DPI, HRS_IN_RADIAN, PI_OVER_2,
};
use crate::ref_system::{
    cel_unit_xyz, equatorial_to_ecliptic, galactic_matrix, precession_matrix, xyz_cel,
};
use crate::skycalc_errors::SkycalcError;
use crate::time::julian_epoch;

/// Separations below this use the flat-sky formula.
const SMALL_ANGLE: Radian = 1.0e-5;
/// Points closer than this to a pole always use the law of cosines.
const POLE_GUARD: Radian = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celest {
    ra: BoundedAngle,
    dec: BoundedAngle,
    equinox: f64,
    distance: Option<f64>,
}

impl Celest {
    /// Position at `ra` hours, `dec` degrees, referred to `equinox` (decimal year).
    pub fn new(ra: Hour, dec: Degree, equinox: f64) -> Self {
        Celest {
            ra: BoundedAngle::ra(ra),
            dec: BoundedAngle::declination(dec),
            equinox,
            distance: None,
        }
    }

    /// Same position with a distance in AU.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Parse separate RA (hours) and Dec (degrees) strings, sexagesimal or decimal.
    pub fn parse(ra: &str, dec: &str, equinox: f64) -> Result<Self, SkycalcError> {
        let ra_value = BoundedAngle::parse(ra, WrapPolicy::Hours24)
            .map_err(|_| SkycalcError::CoordinateParseError(ra.to_string()))?;
        let dec_value = BoundedAngle::parse(dec, WrapPolicy::Unbounded)
            .map_err(|_| SkycalcError::CoordinateParseError(dec.to_string()))?;
        if dec_value.value().abs() > 90.0 {
            return Err(SkycalcError::CoordinateParseError(dec.to_string()));
        }
        Ok(Celest::new(ra_value.value(), dec_value.value(), equinox))
    }

    /// Parse RA and Dec from a single string.
    ///
    /// The text is cut into signed numeric tokens; any other characters separate them. The first
    /// token starts the RA and is followed by at most two **unsigned** tokens taken as minutes and
    /// seconds. The next token starts the declination, again with up to two more fields.
    ///
    /// ```
    /// use skycalc::celest::Celest;
    ///
    /// let crab = Celest::parse_pair("05:34:31.94 +22:00:52.2", 2000.0).unwrap();
    /// assert!((crab.ra().value() - 5.5755).abs() < 1e-4);
    /// let decimal = Celest::parse_pair("83.63 -5.39", 2000.0);
    /// // "83.63" and "-5.39" are two signed tokens; 83.63 h is wrapped into [0, 24)
    /// assert!(decimal.is_ok());
    /// ```
    pub fn parse_pair(text: &str, equinox: f64) -> Result<Self, SkycalcError> {
        let err = || SkycalcError::CoordinateParseError(text.to_string());

        let (_, tokens) = pair_tokens(text).map_err(|_| err())?;
        let (ra, used) = assemble(&tokens);
        if used >= tokens.len() {
            return Err(err());
        }
        let (dec, dec_used) = assemble(&tokens[used..]);
        if used + dec_used != tokens.len() || dec.abs() > 90.0 {
            return Err(err());
        }
        Ok(Celest::new(ra, dec, equinox))
    }

    pub fn ra(&self) -> &BoundedAngle {
        &self.ra
    }

    pub fn dec(&self) -> &BoundedAngle {
        &self.dec
    }

    pub fn equinox(&self) -> f64 {
        self.equinox
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn unit_vector(&self) -> Vector3<f64> {
        cel_unit_xyz(self.ra.value(), self.dec.value())
    }

    /// The same position referred to `equinox`.
    pub fn precessed(&self, equinox: f64) -> Self {
        if equinox == self.equinox {
            return *self;
        }
        let v = precession_matrix(self.equinox, equinox) * self.unit_vector();
        let (ra, dec, _) = xyz_cel(&v);
        Celest {
            ra: BoundedAngle::ra(ra),
            dec: BoundedAngle::declination(dec),
            equinox,
            distance: self.distance,
        }
    }

    /// Angular separation in radians, after precessing `other` to this equinox.
    ///
    /// Uses the law of cosines, except for separations under `1e-5` rad between points more than
    /// `0.001` rad from either pole, where the flat-sky approximation
    /// `sqrt((Δα cos δ̄)² + Δδ²)` is used instead.
    pub fn subtend(&self, other: &Celest) -> Radian {
        let other = other.precessed(self.equinox);
        let a = self.unit_vector();
        let b = other.unit_vector();

        let angle = a.dot(&b).clamp(-1.0, 1.0).acos();

        let dec_a = self.dec.value() / DEG_IN_RADIAN;
        let dec_b = other.dec.value() / DEG_IN_RADIAN;
        let away_from_poles =
            dec_a.abs() < PI_OVER_2 - POLE_GUARD && dec_b.abs() < PI_OVER_2 - POLE_GUARD;

        if angle < SMALL_ANGLE && away_from_poles {
            let mut dra = (other.ra.value() - self.ra.value()) / HRS_IN_RADIAN;
            if dra > std::f64::consts::PI {
                dra -= DPI;
            } else if dra < -std::f64::consts::PI {
                dra += DPI;
            }
            let mean_dec = 0.5 * (dec_a + dec_b);
            let ddec = dec_b - dec_a;
            ((dra * mean_dec.cos()).powi(2) + ddec * ddec).sqrt()
        } else {
            angle
        }
    }

    /// Galactic longitude and latitude in degrees (B1950 frame).
    pub fn galactic(&self) -> (Degree, Degree) {
        let v = galactic_matrix() * self.precessed(1950.0).unit_vector();
        let (l, b, _) = xyz_cel(&v);
        (l * 15.0, b)
    }

    /// Position at equinox 1950 for galactic `(l, b)` in degrees.
    pub fn from_galactic(l: Degree, b: Degree) -> Self {
        let v = galactic_matrix().transpose() * cel_unit_xyz(l / 15.0, b);
        let (ra, dec, _) = xyz_cel(&v);
        Celest::new(ra, dec, 1950.0)
    }

    /// Ecliptic longitude and latitude of date, in degrees.
    pub fn ecliptic(&self, jd: JulianDate) -> (Degree, Degree) {
        let of_date = self.precessed(julian_epoch(jd));
        let (lambda, beta, _) = xyz_cel(&equatorial_to_ecliptic(jd, &of_date.unit_vector()));
        (lambda * 15.0, beta)
    }

    /// RA rounded to `ndigits` second digits, `:`-separated.
    pub fn ra_string(&self, ndigits: i32) -> String {
        self.ra.rounded_string(ndigits, ":")
    }

    /// Dec rounded to `ndigits` arcsecond digits, `:`-separated, signed.
    pub fn dec_string(&self, ndigits: i32) -> String {
        self.dec.rounded_string(ndigits, ":")
    }
}

impl fmt::Display for Celest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  ({:.1})",
            self.ra.rounded_string(2, " "),
            self.dec.rounded_string(1, " "),
            self.equinox
        )
    }
}

/// A numeric token and whether it carried an explicit sign.
#[derive(Debug, Clone, Copy)]
struct PairToken {
    signed: bool,
    negative: bool,
    magnitude: f64,
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn pair_separator(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| !is_number_char(c) && c != '+' && c != '-').parse(input)
}

fn pair_token(input: &str) -> IResult<&str, PairToken> {
    let (input, sign) = opt(terminated(one_of("+-"), space0)).parse(input)?;
    let (input, magnitude) = map_res(take_while1(is_number_char), str::parse::<f64>).parse(input)?;
    Ok((
        input,
        PairToken {
            signed: sign.is_some(),
            negative: sign == Some('-'),
            magnitude,
        },
    ))
}

fn pair_tokens(input: &str) -> IResult<&str, Vec<PairToken>> {
    all_consuming(terminated(
        many1(preceded(pair_separator, pair_token)),
        pair_separator,
    ))
    .parse(input)
}

/// Combine a leading token with up to two unsigned continuation tokens.
fn assemble(tokens: &[PairToken]) -> (f64, usize) {
    let Some(first) = tokens.first() else {
        return (0.0, 0);
    };
    let mut value = first.magnitude;
    let mut used = 1;
    for (scale, token) in [60.0, 3600.0].iter().zip(tokens[1..].iter()) {
        if token.signed {
            break;
        }
        value += token.magnitude / scale;
        used += 1;
    }
    (if first.negative { -value } else { value }, used)
}

#[cfg(test)]
mod celest_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn crab() -> Celest {
        Celest::new(5.0 + 34.0 / 60.0 + 31.94 / 3600.0, 22.0 + 52.2 / 3600.0, 2000.0)
    }

    #[test]
    fn test_precession_round_trip() {
        let c = crab();
        assert_eq!(c.precessed(2000.0), c);

        let back = c.precessed(1875.0).precessed(2000.0);
        assert_abs_diff_eq!(back.ra().value(), c.ra().value(), epsilon = 1e-6 / 15.0);
        assert_abs_diff_eq!(back.dec().value(), c.dec().value(), epsilon = 1e-6);
        assert_eq!(back.equinox(), 2000.0);
    }

    #[test]
    fn test_galactic() {
        let (l, b) = crab().galactic();
        assert_abs_diff_eq!(l, 184.5575, epsilon = 1e-3);
        assert_abs_diff_eq!(b, -5.7842, epsilon = 1e-3);

        let center = Celest::from_galactic(0.0, 0.0);
        assert_eq!(center.equinox(), 1950.0);
        assert_abs_diff_eq!(center.ra().value(), 17.707390, epsilon = 1e-5);
        assert_abs_diff_eq!(center.dec().value(), -28.916790, epsilon = 1e-5);

        let (l, b) = Celest::from_galactic(123.4, -45.6).galactic();
        assert_abs_diff_eq!(l, 123.4, epsilon = 1e-7);
        assert_abs_diff_eq!(b, -45.6, epsilon = 1e-7);
    }

    #[test]
    fn test_subtend_branches() {
        let a = Celest::new(0.0, 0.0, 2000.0);
        let b = Celest::new(1.0, 0.0, 2000.0);
        assert_abs_diff_eq!(a.subtend(&b) * DEG_IN_RADIAN, 15.0, epsilon = 1e-10);

        // flat-sky branch
        let a = Celest::new(10.0, 20.0, 2000.0);
        let b = Celest::new(10.0 + 1e-6, 20.0 + 1e-6, 2000.0);
        assert_abs_diff_eq!(a.subtend(&b), 2.4662928823687545e-07, epsilon = 1e-15);
        assert_eq!(a.subtend(&a), 0.0);

        // across RA = 0
        let a = Celest::new(23.9999999, 0.0, 2000.0);
        let b = Celest::new(0.0000001, 0.0, 2000.0);
        assert_abs_diff_eq!(a.subtend(&b), 2e-7 / HRS_IN_RADIAN, epsilon = 1e-12);

        // near the pole the law of cosines is kept
        let a = Celest::new(0.0, 89.99, 2000.0);
        let b = Celest::new(12.0, 89.99, 2000.0);
        assert_abs_diff_eq!(a.subtend(&b) * DEG_IN_RADIAN, 0.02, epsilon = 1e-5);
    }

    #[test]
    fn test_subtend_precesses_argument() {
        let c = crab();
        assert!(c.subtend(&c.precessed(1950.0)) < 1e-9);
    }

    #[test]
    fn test_ecliptic() {
        let summer_solstice = Celest::new(6.0, 23.439291, 2000.0);
        let (lambda, beta) = summer_solstice.ecliptic(crate::constants::J2000);
        assert_abs_diff_eq!(lambda, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(beta, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_pair() {
        let c = Celest::parse_pair("05 34 31.94 +22 00 52.2", 2000.0).unwrap();
        assert_abs_diff_eq!(c.ra().value(), crab().ra().value(), epsilon = 1e-12);
        assert_abs_diff_eq!(c.dec().value(), crab().dec().value(), epsilon = 1e-12);

        let c = Celest::parse_pair("12:00:00, -00:30:00", 2000.0).unwrap();
        assert_abs_diff_eq!(c.dec().value(), -0.5);

        let c = Celest::parse_pair("18.5 -23.2", 2000.0).unwrap();
        assert_abs_diff_eq!(c.ra().value(), 18.5);
        assert_abs_diff_eq!(c.dec().value(), -23.2);

        // a second unsigned token is minutes of RA, leaving no declination
        assert!(Celest::parse_pair("18.5 23.2", 2000.0).is_err());
        assert!(Celest::parse_pair("", 2000.0).is_err());
        assert!(Celest::parse_pair("5 34 31 +95 0 0", 2000.0).is_err());
    }

    #[test]
    fn test_parse_and_format() {
        let c = Celest::parse("5 34 31.94", "+22 00 52.2", 2000.0).unwrap();
        assert_eq!(c.ra_string(2), "05:34:31.94");
        assert_eq!(c.dec_string(1), "+22:00:52.2");
        assert!(Celest::parse("5 34 31.94", "abc", 2000.0).is_err());
    }
}
