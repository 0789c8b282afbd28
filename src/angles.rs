//! # Bounded angles
//!
//! Right ascension, hour angle, declination, latitude and longitude share one representation:
//! a decimal value plus its [`Sexagesimal`] mirror, wrapped according to a [`WrapPolicy`].
//!
//! | quantity      | unit  | policy                   | range       |
//! |---------------|-------|--------------------------|-------------|
//! | RA            | hours | [`WrapPolicy::Hours24`]  | `[0, 24)`   |
//! | HA            | hours | [`WrapPolicy::Hours12`]  | `(-12, 12]` |
//! | Longitude     | hours west | [`WrapPolicy::Hours12`] | `(-12, 12]` |
//! | Dec, Latitude | degrees | [`WrapPolicy::Unbounded`] | unclamped |
//!
//! Values are immutable: every operation returns a new [`BoundedAngle`] whose mirror is rebuilt
//! from the wrapped value, so the two can never disagree.

use std::fmt;

use crate::constants::Hour;
use crate::sexagesimal::Sexagesimal;
use crate::skycalc_errors::SkycalcError;

/// Wraparound rule applied to a [`BoundedAngle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapPolicy {
    /// No wrapping (declination, latitude).
    Unbounded,
    /// `[0, 24)` hours (right ascension).
    Hours24,
    /// `(-12, 12]` hours (hour angle, longitude).
    Hours12,
}

impl WrapPolicy {
    /// Bring `x` into the range of the policy.
    pub fn wrap(self, x: f64) -> f64 {
        match self {
            WrapPolicy::Unbounded => x,
            WrapPolicy::Hours24 => {
                let r = x.rem_euclid(24.0);
                // rem_euclid of a tiny negative number rounds up to 24.0
                if r >= 24.0 {
                    0.0
                } else {
                    r
                }
            }
            WrapPolicy::Hours12 => {
                let r = WrapPolicy::Hours24.wrap(x);
                if r > 12.0 {
                    r - 24.0
                } else {
                    r
                }
            }
        }
    }

    fn contains(self, x: f64) -> bool {
        match self {
            WrapPolicy::Unbounded => true,
            WrapPolicy::Hours24 => (0.0..24.0).contains(&x),
            WrapPolicy::Hours12 => x > -12.0 && x <= 12.0,
        }
    }
}

/// Bring an hour quantity into `(-12, 12]`.
pub fn adj_time(x: Hour) -> Hour {
    WrapPolicy::Hours12.wrap(x)
}

/// A rounded angle string and whether rounding overflowed the policy range
/// (e.g. an RA of 23:59:59.99 rounded to whole seconds becomes 00:00:00).
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedAngle {
    pub text: String,
    pub overflow: bool,
}

/// Decimal angle with a synchronized sexagesimal mirror.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedAngle {
    value: f64,
    policy: WrapPolicy,
    sex: Sexagesimal,
}

impl BoundedAngle {
    pub fn new(value: f64, policy: WrapPolicy) -> Self {
        let value = policy.wrap(value);
        BoundedAngle {
            value,
            policy,
            sex: Sexagesimal::from_value(value),
        }
    }

    /// Right ascension in hours, `[0, 24)`.
    pub fn ra(hours: Hour) -> Self {
        BoundedAngle::new(hours, WrapPolicy::Hours24)
    }

    /// Hour angle in hours, `(-12, 12]`.
    pub fn hour_angle(hours: Hour) -> Self {
        BoundedAngle::new(hours, WrapPolicy::Hours12)
    }

    /// Declination in degrees, unclamped.
    pub fn declination(degrees: f64) -> Self {
        BoundedAngle::new(degrees, WrapPolicy::Unbounded)
    }

    /// Latitude in degrees, unclamped.
    pub fn latitude(degrees: f64) -> Self {
        BoundedAngle::new(degrees, WrapPolicy::Unbounded)
    }

    /// Longitude in hours west, `(-12, 12]`.
    pub fn longitude(hours_west: Hour) -> Self {
        BoundedAngle::new(hours_west, WrapPolicy::Hours12)
    }

    /// Parse sexagesimal or decimal text under the given policy.
    pub fn parse(text: &str, policy: WrapPolicy) -> Result<Self, SkycalcError> {
        let sex = Sexagesimal::parse(text)?;
        Ok(BoundedAngle::new(sex.value(), policy))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn policy(&self) -> WrapPolicy {
        self.policy
    }

    pub fn sexagesimal(&self) -> &Sexagesimal {
        &self.sex
    }

    /// A new angle with the same policy.
    pub fn with_value(&self, value: f64) -> Self {
        BoundedAngle::new(value, self.policy)
    }

    /// A new angle shifted by `delta` (same unit, same policy).
    pub fn shifted(&self, delta: f64) -> Self {
        self.with_value(self.value + delta)
    }

    /// Value in radians, treating hour-based policies as hours and the unbounded policy as degrees.
    pub fn radians(&self) -> f64 {
        match self.policy {
            WrapPolicy::Unbounded => self.value.to_radians(),
            _ => (self.value * 15.0).to_radians(),
        }
    }

    /// Rounded sexagesimal text.
    ///
    /// When the rounded value leaves the policy range (RA reaching 24h, HA reaching −12h) the
    /// rounded value is rewrapped and the overflow is reported so callers carrying a date can
    /// react.
    pub fn rounded(&self, ndigits: i32, separator: &str) -> RoundedAngle {
        let force_sign = self.policy == WrapPolicy::Unbounded;
        let rounded = self.sex.round(ndigits);
        let rvalue = rounded.value();

        if self.policy.contains(rvalue) {
            RoundedAngle {
                text: rounded.format(separator, force_sign),
                overflow: false,
            }
        } else {
            let wrapped = Sexagesimal::from_value(self.policy.wrap(rvalue)).round(ndigits);
            RoundedAngle {
                text: wrapped.format(separator, force_sign),
                overflow: true,
            }
        }
    }

    /// Shorthand for [`BoundedAngle::rounded`] keeping only the text.
    pub fn rounded_string(&self, ndigits: i32, separator: &str) -> String {
        self.rounded(ndigits, separator).text
    }
}

impl fmt::Display for BoundedAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded_string(2, " "))
    }
}

/// Parse a longitude in any of the common conventions and normalize it to hours west.
///
/// The numeric part is sexagesimal or decimal; optional trailing letters select the convention:
/// `h` (hours, default) or `d` (degrees), and `w` (west positive, default) or `e` (east positive).
///
/// ```
/// use skycalc::angles::parse_longitude;
///
/// let kpno = parse_longitude("111 36 0 d w").unwrap();
/// assert!((kpno.value() - 7.44).abs() < 1e-9);
/// let east = parse_longitude("-7.44 h e").unwrap();
/// assert!((east.value() - 7.44).abs() < 1e-9);
/// ```
pub fn parse_longitude(text: &str) -> Result<BoundedAngle, SkycalcError> {
    let lower = text.trim().to_ascii_lowercase();
    let split = lower
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(lower.len());
    let (numeric, suffix) = lower.split_at(split);

    let mut in_degrees = false;
    let mut east = false;
    for c in suffix.chars().filter(|c| !c.is_whitespace()) {
        match c {
            'h' => in_degrees = false,
            'd' => in_degrees = true,
            'w' => east = false,
            'e' => east = true,
            _ => return Err(SkycalcError::AngleParseError(text.to_string())),
        }
    }

    let mut hours = Sexagesimal::parse(numeric)
        .map_err(|_| SkycalcError::AngleParseError(text.to_string()))?
        .value();
    if in_degrees {
        hours /= 15.0;
    }
    if east {
        hours = -hours;
    }
    Ok(BoundedAngle::longitude(hours))
}

#[cfg(test)]
mod angles_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_ranges() {
        assert_relative_eq!(WrapPolicy::Hours24.wrap(25.5), 1.5);
        assert_relative_eq!(WrapPolicy::Hours24.wrap(-1.0), 23.0);
        assert_eq!(WrapPolicy::Hours24.wrap(-1e-17), 0.0);
        assert_eq!(WrapPolicy::Hours24.wrap(24.0), 0.0);

        assert_relative_eq!(WrapPolicy::Hours12.wrap(12.0), 12.0);
        assert_relative_eq!(WrapPolicy::Hours12.wrap(-12.0), 12.0);
        assert_relative_eq!(WrapPolicy::Hours12.wrap(13.0), -11.0);
        assert_relative_eq!(WrapPolicy::Hours12.wrap(-36.5), -12.5 + 24.0);

        assert_relative_eq!(WrapPolicy::Unbounded.wrap(-95.0), -95.0);
    }

    #[test]
    fn test_mirror_follows_value() {
        let ra = BoundedAngle::ra(-0.5);
        assert_relative_eq!(ra.value(), 23.5);
        assert_eq!(ra.sexagesimal().hour(), 23);
        assert_eq!(ra.sexagesimal().minute(), 30);

        let shifted = ra.shifted(1.0);
        assert_relative_eq!(shifted.value(), 0.5);
        assert_relative_eq!(ra.value(), 23.5);
    }

    #[test]
    fn test_rounded_overflow() {
        let ra = BoundedAngle::ra(23.0 + 59.0 / 60.0 + 59.996 / 3600.0);
        let r = ra.rounded(2, ":");
        assert!(r.overflow);
        assert_eq!(r.text, "00:00:00.00");

        let ha = BoundedAngle::hour_angle(-(11.0 + 59.0 / 60.0 + 59.8 / 3600.0));
        let r = ha.rounded(0, " ");
        assert!(r.overflow);
        assert_eq!(r.text, "12 00 00");

        let dec = BoundedAngle::declination(22.0145);
        let r = dec.rounded(1, " ");
        assert!(!r.overflow);
        assert_eq!(r.text, "+22 00 52.2");
    }

    #[test]
    fn test_parse_longitude_conventions() {
        assert_relative_eq!(parse_longitude("7 26 28").unwrap().value(), 7.0 + 26.0 / 60.0 + 28.0 / 3600.0, epsilon = 1e-12);
        assert_relative_eq!(parse_longitude("-111.6d").unwrap().value(), -7.44, epsilon = 1e-12);
        assert_relative_eq!(parse_longitude("111.6 d e").unwrap().value(), -7.44, epsilon = 1e-12);
        assert_relative_eq!(parse_longitude("111:36 D W").unwrap().value(), 7.44, epsilon = 1e-12);
        assert_relative_eq!(parse_longitude("13 h").unwrap().value(), -11.0);
        assert!(parse_longitude("7 26 x").is_err());
        assert!(parse_longitude("west").is_err());
    }
}
