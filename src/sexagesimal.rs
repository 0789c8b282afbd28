//! # Sexagesimal numbers
//!
//! A [`Sexagesimal`] stores a signed quantity as `{sign, hour, minute, second}` and is the common
//! text representation of right ascension, hour angle, declination, latitude, longitude and time
//! of day.
//!
//! ## Parsing
//!
//! [`Sexagesimal::parse`] accepts
//! - colon-delimited triplets: `"12:30:00"`, `"-00:30:00"`
//! - whitespace-delimited triplets: `"5 34 31.94"`, `"+22 00 52"`
//! - partial triplets (degree + minute only): `"12 30.5"`
//! - a bare decimal: `"12.5"`, `"-0.5"`
//!
//! The sign is read from the text itself, so `"-00 30 00"` yields −0.5 (the "minus zero" case).
//!
//! ## Rounding
//!
//! [`Sexagesimal::round`] returns a [`RoundedSex`]. Rounding that pushes the seconds to 60 carries
//! into the minutes and a minute count of 60 carries into the hours. The leading field is never
//! wrapped here: a time of day of `23:59:59.97` rounded to one digit becomes `24:00:00.0` and the
//! owner (a date or a bounded angle) is responsible for the overflow.

use std::fmt;

use itertools::Itertools;
use nom::{
    branch::alt,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use crate::skycalc_errors::SkycalcError;

/// Signed sexagesimal value.
///
/// `minute` and `second` are always in `[0, 60)`. The decimal value is
/// `sign * (hour + minute/60 + second/3600)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sexagesimal {
    negative: bool,
    hour: u32,
    minute: u32,
    second: f64,
}

/// Result of [`Sexagesimal::round`].
///
/// `hour` may reach the modulus of the owning quantity (e.g. 24 for a time of day); callers check
/// it and carry into the enclosing value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedSex {
    pub negative: bool,
    pub hour: u32,
    pub minute: u32,
    /// Seconds for `ndigits >= 0`, decimal minutes for `ndigits == -1`, unused for `-2`.
    pub second: f64,
    pub ndigits: i32,
}

fn parse_sign(input: &str) -> IResult<&str, Option<char>> {
    preceded(space0, opt(alt((char('+'), char('-'))))).parse(input)
}

fn field_separator(input: &str) -> IResult<&str, ()> {
    alt((
        map(delimited(space0, char(':'), space0), |_| ()),
        map(space1, |_| ()),
    ))
    .parse(input)
}

fn parse_fields(input: &str) -> IResult<&str, (Option<char>, Vec<f64>)> {
    all_consuming(delimited(
        space0,
        (
            parse_sign,
            preceded(space0, separated_list1(field_separator, double)),
        ),
        space0,
    ))
    .parse(input)
}

impl Sexagesimal {
    /// Build from a signed decimal value.
    pub fn from_value(value: f64) -> Self {
        let negative = value.is_sign_negative() && value != 0.0;
        let abs = value.abs();
        let hour = abs.floor();
        let minutes = (abs - hour) * 60.0;
        let minute = minutes.floor();
        let second = ((minutes - minute) * 60.0).max(0.0);

        Sexagesimal {
            negative,
            hour: hour as u32,
            minute: minute as u32,
            second,
        }
    }

    /// Build from explicit fields. `minute`/`second` outside `[0, 60)` are normalized through
    /// the decimal value.
    pub fn from_fields(negative: bool, hour: u32, minute: u32, second: f64) -> Self {
        if minute < 60 && (0.0..60.0).contains(&second) {
            Sexagesimal {
                negative,
                hour,
                minute,
                second,
            }
        } else {
            let mut s =
                Sexagesimal::from_value(hour as f64 + minute as f64 / 60.0 + second / 3600.0);
            s.negative = negative;
            s
        }
    }

    /// Parse a colon/whitespace-delimited triplet, a partial triplet or a bare decimal.
    ///
    /// Arguments
    /// -----------------
    /// * `text`: the string to parse, e.g. `"-00:30:00"`, `"5 34 31.9"`, `"12.5"`.
    ///
    /// Return
    /// ----------
    /// * The parsed value, or [`SkycalcError::AngleParseError`] when the text is not numeric,
    ///   has more than three fields, or contains a signed/non-finite field after the sign.
    pub fn parse(text: &str) -> Result<Self, SkycalcError> {
        let err = || SkycalcError::AngleParseError(text.to_string());

        let (_, (sign, fields)) = parse_fields(text).map_err(|_| err())?;
        if fields.len() > 3 || fields.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(err());
        }
        // only the leading sign counts: "12 +30" is rejected like "12 -30"
        let body = text.trim_start().trim_start_matches(['+', '-']);
        if body.contains(['+', '-']) && !body.contains(['e', 'E']) {
            return Err(err());
        }

        let negative = sign == Some('-');
        let value = match fields.as_slice() {
            [h] => *h,
            [h, m] => h + m / 60.0,
            [h, m, s] => h + m / 60.0 + s / 3600.0,
            _ => return Err(err()),
        };

        let mut sex = match fields.as_slice() {
            [h, m, s] if h.fract() == 0.0 && m.fract() == 0.0 && *m < 60.0 && *s < 60.0 => {
                Sexagesimal {
                    negative: false,
                    hour: *h as u32,
                    minute: *m as u32,
                    second: *s,
                }
            }
            _ => Sexagesimal::from_value(value),
        };
        sex.negative = negative;
        Ok(sex)
    }

    pub fn value(&self) -> f64 {
        let v = self.hour as f64 + self.minute as f64 / 60.0 + self.second / 3600.0;
        if self.negative {
            -v
        } else {
            v
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> f64 {
        self.second
    }

    /// Round for display.
    ///
    /// * `ndigits >= 0`: seconds rounded to `ndigits` decimals.
    /// * `ndigits == -1`: seconds dropped, minutes rounded to tenths.
    /// * `ndigits <= -2`: seconds dropped, minutes rounded to whole minutes.
    ///
    /// Seconds reaching 60 carry into the minutes and minutes reaching 60 carry into the hours.
    pub fn round(&self, ndigits: i32) -> RoundedSex {
        let mut hour = self.hour;
        let mut minute = self.minute;

        if ndigits >= 0 {
            let scale = 10f64.powi(ndigits);
            let mut second = (self.second * scale).round() / scale;
            if second >= 60.0 {
                second -= 60.0;
                minute += 1;
            }
            if minute >= 60 {
                minute -= 60;
                hour += 1;
            }
            RoundedSex {
                negative: self.negative,
                hour,
                minute,
                second,
                ndigits,
            }
        } else if ndigits == -1 {
            let mut decimal_minute =
                ((minute as f64 + self.second / 60.0) * 10.0).round() / 10.0;
            if decimal_minute >= 60.0 {
                decimal_minute -= 60.0;
                hour += 1;
            }
            RoundedSex {
                negative: self.negative,
                hour,
                minute: decimal_minute.floor() as u32,
                second: decimal_minute,
                ndigits,
            }
        } else {
            let mut whole = (minute as f64 + self.second / 60.0).round() as u32;
            if whole >= 60 {
                whole -= 60;
                hour += 1;
            }
            RoundedSex {
                negative: self.negative,
                hour,
                minute: whole,
                second: 0.0,
                ndigits: -2,
            }
        }
    }

    /// Rounded text with the given field separator, e.g. `to_string_with(1, ":")`.
    pub fn to_string_with(&self, ndigits: i32, separator: &str) -> String {
        self.round(ndigits).format(separator, false)
    }
}

impl RoundedSex {
    /// Decimal value of the rounded fields.
    pub fn value(&self) -> f64 {
        let v = match self.ndigits {
            n if n >= 0 => self.hour as f64 + self.minute as f64 / 60.0 + self.second / 3600.0,
            -1 => self.hour as f64 + self.second / 60.0,
            _ => self.hour as f64 + self.minute as f64 / 60.0,
        };
        if self.negative {
            -v
        } else {
            v
        }
    }

    /// Render the fields. `force_sign` prefixes positive values with `+` (declinations).
    pub fn format(&self, separator: &str, force_sign: bool) -> String {
        let sign = if self.negative {
            "-"
        } else if force_sign {
            "+"
        } else {
            ""
        };

        let mut fields = vec![format!("{:02}", self.hour)];
        match self.ndigits {
            n if n > 0 => {
                fields.push(format!("{:02}", self.minute));
                let width = 3 + n as usize;
                fields.push(format!("{:0width$.prec$}", self.second, prec = n as usize));
            }
            0 => {
                fields.push(format!("{:02}", self.minute));
                fields.push(format!("{:02.0}", self.second));
            }
            -1 => fields.push(format!("{:04.1}", self.second)),
            _ => fields.push(format!("{:02}", self.minute)),
        }

        format!("{sign}{}", fields.iter().join(separator))
    }
}

impl fmt::Display for Sexagesimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with(2, " "))
    }
}

#[cfg(test)]
mod sexagesimal_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_triplets() {
        assert_relative_eq!(Sexagesimal::parse("12:30:00").unwrap().value(), 12.5);
        assert_relative_eq!(Sexagesimal::parse("12 30 00").unwrap().value(), 12.5);
        assert_relative_eq!(
            Sexagesimal::parse("  5 34 31.94 ").unwrap().value(),
            5.0 + 34.0 / 60.0 + 31.94 / 3600.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(Sexagesimal::parse("+22 00 52").unwrap().value(), 22.0 + 52.0 / 3600.0, epsilon = 1e-12);
    }

    #[test]
    fn test_minus_zero() {
        let s = Sexagesimal::parse("-00:30:00").unwrap();
        assert!(s.is_negative());
        assert_eq!(s.hour(), 0);
        assert_eq!(s.minute(), 30);
        assert_relative_eq!(s.value(), -0.5);

        assert_relative_eq!(Sexagesimal::parse("-0 0 36").unwrap().value(), -0.01);
    }

    #[test]
    fn test_partial_and_decimal() {
        assert_relative_eq!(Sexagesimal::parse("12 30.5").unwrap().value(), 12.0 + 30.5 / 60.0);
        assert_relative_eq!(Sexagesimal::parse("12.5").unwrap().value(), 12.5);
        assert_relative_eq!(Sexagesimal::parse("-0.25").unwrap().value(), -0.25);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "abc", "12:30:xx", "1 2 3 4", "12 -30", "12::30", "nan"] {
            let err = Sexagesimal::parse(bad).unwrap_err();
            assert!(err.is_parse_error(), "{bad:?} should fail to parse");
        }
    }

    #[test]
    fn test_round_carry() {
        let s = Sexagesimal::from_value(23.0 + 59.0 / 60.0 + 59.97 / 3600.0);
        let r = s.round(1);
        assert_eq!((r.hour, r.minute), (24, 0));
        assert_relative_eq!(r.second, 0.0);
        assert_eq!(r.format(":", false), "24:00:00.0");

        let s = Sexagesimal::from_value(5.0 + 59.0 / 60.0 + 59.6 / 3600.0);
        assert_eq!(s.to_string_with(0, " "), "06 00 00");
        assert_eq!(s.to_string_with(-2, ":"), "06:00");
        assert_eq!(s.to_string_with(-1, ":"), "06:00.0");
    }

    #[test]
    fn test_round_minutes() {
        let s = Sexagesimal::from_value(-(10.0 + 20.0 / 60.0 + 39.0 / 3600.0));
        assert_eq!(s.to_string_with(-1, " "), "-10 20.7");
        assert_eq!(s.to_string_with(-2, " "), "-10 21");
        assert_eq!(s.to_string_with(2, ":"), "-10:20:39.00");
        assert_eq!(s.round(-2).format(" ", true), "-10 21");
        assert_eq!(Sexagesimal::from_value(1.5).round(0).format(" ", true), "+01 30 00");
    }

    #[test]
    fn test_format_parse_roundtrip() {
        for &x in &[0.0, 12.5, -0.5, 23.999_999_9, 11.999_99, -89.999_99, 47.123_456_7] {
            for n in 0..4 {
                let text = Sexagesimal::from_value(x).to_string_with(n, ":");
                let back = Sexagesimal::parse(&text).unwrap().value();
                assert!((back - x).abs() * 3600.0 <= 10f64.powi(-n), "{x} {n} {text}");
            }
        }
    }
}
