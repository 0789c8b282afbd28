//! # Calendar engine
//!
//! Conversion between calendar dates and Julian Dates (Meeus, *Astronomical Algorithms*, ch. 7),
//! day-of-week, and rounding-aware date/time formatting.
//!
//! ## Conventions
//!
//! - Dates after 1582 are Gregorian; the century correction is skipped for earlier years, which
//!   therefore follow the Julian calendar.
//! - The time of day is a [`Sexagesimal`] in hours.
//! - Every formatted string is produced from a single rounding step
//!   ([`CalendarDate::round`]): when the rounded time reaches 24:00 the date is re-derived from the
//!   Julian Date of the next midnight, so a displayed date never disagrees with its displayed time.
//!
//! ## Example
//!
//! ```
//! use skycalc::calendar::{CalendarDate, DateStyle};
//!
//! let d = CalendarDate::from_julian(2451545.0);
//! assert_eq!((d.year(), d.month(), d.day()), (2000, 1, 1));
//! assert_eq!(d.format(DateStyle::DayOfWeekMonthName, 0), "Sat 2000 Jan 01 12:00:00");
//! ```

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    character::complete::{alpha1, char, digit1, one_of, space0, space1},
    combinator::{all_consuming, map, map_opt, map_res, opt, recognize, rest},
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};

use crate::constants::JulianDate;
use crate::sexagesimal::{RoundedSex, Sexagesimal};
use crate::skycalc_errors::SkycalcError;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// First Gregorian day number (1582 October 15) for the inverse conversion.
const GREGORIAN_START_DAY: f64 = 2_299_161.0;

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn abbrev(self) -> &'static str {
        ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][self as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

/// Day of the week of a Julian Date: `floor(jd + 0.5) mod 7`, Monday = 0.
pub fn day_of_week(jd: JulianDate) -> Weekday {
    let idx = ((jd + 0.5).floor() as i64).rem_euclid(7) as usize;
    Weekday::ALL[idx]
}

fn is_leap_year(year: i32) -> bool {
    if year > 1582 {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    } else {
        year.rem_euclid(4) == 0
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Julian Date of a calendar date (Meeus, ch. 7).
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: calendar date; the Gregorian correction applies for `year > 1582`.
/// * `hours`: time of day in decimal hours.
///
/// Returns
/// --------
/// * The Julian Date.
pub fn date_to_julian(year: i32, month: u32, day: u32, hours: f64) -> JulianDate {
    let (mut y, mut m) = (year, month as i32);
    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let b = if year > 1582 {
        let a = (y as f64 / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day as f64 + b
        - 1524.5
        + hours / 24.0
}

/// Inverse of [`date_to_julian`] without the 24h guard.
fn julian_to_fields(jd: JulianDate) -> (i32, u32, u32, f64) {
    let jd5 = jd + 0.5;
    let z = jd5.floor();
    let f = jd5 - z;

    let a = if z < GREGORIAN_START_DAY {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = (b - d - (30.6001 * e).floor()) as u32;
    let month = (if e < 14.0 { e - 1.0 } else { e - 13.0 }) as u32;
    let year = (if month > 2 { c - 4716.0 } else { c - 4715.0 }) as i32;

    (year, month, day, f * 24.0)
}

/// Calendar date with a sexagesimal time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
    time: Sexagesimal,
}

/// Calendar fields after rounding the time of day, with any 24:00 carry already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
    pub time: RoundedSex,
}

/// Output layouts for [`CalendarDate::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateStyle {
    /// `2000 01 01 12 00 00`
    Numeric,
    /// `2000-01-01 12:00:00`
    Iso,
    /// `2000 Jan 01 12:00:00`
    MonthName,
    /// `Sat 2000 01 01 12 00 00`
    DayOfWeekNumeric,
    /// `Sat 2000 Jan 01 12:00:00`
    DayOfWeekMonthName,
    /// `2000 01 01`
    DateOnly,
    /// `2000 Jan 01`
    DateOnlyMonthName,
    /// `Sat 2000 Jan 01`
    DayOfWeekDateOnly,
    /// `12:00:00`
    TimeOnly,
    /// `12:00`
    TimeOnlyMinutes,
    /// `12:00.0`
    TimeOnlyTenths,
    /// `20000101T120000`
    Compact,
}

impl CalendarDate {
    /// Validated constructor.
    pub fn new(year: i32, month: u32, day: u32, hours: f64) -> Result<Self, SkycalcError> {
        let invalid = || {
            SkycalcError::DateParseError(format!("{year}-{month:02}-{day:02} {hours}h out of range"))
        };
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(invalid());
        }
        if !(0.0..=24.0).contains(&hours) {
            return Err(invalid());
        }
        Ok(CalendarDate {
            year,
            month,
            day,
            time: Sexagesimal::from_value(hours),
        })
    }

    /// Calendar date of a Julian Date.
    ///
    /// If the reconstructed time of day comes out as 24h the input is nudged forward by 1e-7
    /// day and the conversion redone; two attempts at most.
    pub fn from_julian(jd: JulianDate) -> Self {
        let mut jd_try = jd;
        let mut fields = julian_to_fields(jd_try);
        for _ in 0..2 {
            if Sexagesimal::from_value(fields.3).hour() < 24 {
                break;
            }
            jd_try += 1.0e-7;
            fields = julian_to_fields(jd_try);
        }

        let (year, month, day, hours) = fields;
        CalendarDate {
            year,
            month,
            day,
            time: Sexagesimal::from_value(hours),
        }
    }

    pub fn to_julian(&self) -> JulianDate {
        date_to_julian(self.year, self.month, self.day, self.time.value())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn time(&self) -> &Sexagesimal {
        &self.time
    }

    /// Time of day in decimal hours.
    pub fn hours(&self) -> f64 {
        self.time.value()
    }

    pub fn weekday(&self) -> Weekday {
        day_of_week(self.to_julian())
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Round the time of day and carry a 24:00 result into the date.
    pub fn round(&self, ndigits: i32) -> RoundedDate {
        let mut time = self.time.round(ndigits);
        let (mut year, mut month, mut day) = (self.year, self.month, self.day);

        if time.hour >= 24 {
            let next = date_to_julian(self.year, self.month, self.day, 0.0) + 1.0;
            let (y, m, d, _) = julian_to_fields(next);
            year = y;
            month = m;
            day = d;
            time.hour -= 24;
        }

        RoundedDate {
            year,
            month,
            day,
            weekday: day_of_week(date_to_julian(year, month, day, 12.0)),
            time,
        }
    }

    /// Render with a given style; `ndigits` follows [`Sexagesimal::round`].
    pub fn format(&self, style: DateStyle, ndigits: i32) -> String {
        let ndigits = match style {
            DateStyle::TimeOnlyMinutes => -2,
            DateStyle::TimeOnlyTenths => -1,
            DateStyle::Compact => 0,
            _ => ndigits,
        };
        let r = self.round(ndigits);
        let month_name = MONTH_NAMES[(r.month - 1) as usize];
        let numeric_date = format!("{} {:02} {:02}", r.year, r.month, r.day);
        let named_date = format!("{} {} {:02}", r.year, month_name, r.day);

        match style {
            DateStyle::Numeric => format!("{numeric_date} {}", r.time.format(" ", false)),
            DateStyle::Iso => format!(
                "{}-{:02}-{:02} {}",
                r.year,
                r.month,
                r.day,
                r.time.format(":", false)
            ),
            DateStyle::MonthName => format!("{named_date} {}", r.time.format(":", false)),
            DateStyle::DayOfWeekNumeric => {
                format!("{} {numeric_date} {}", r.weekday, r.time.format(" ", false))
            }
            DateStyle::DayOfWeekMonthName => {
                format!("{} {named_date} {}", r.weekday, r.time.format(":", false))
            }
            DateStyle::DateOnly => numeric_date,
            DateStyle::DateOnlyMonthName => named_date,
            DateStyle::DayOfWeekDateOnly => format!("{} {named_date}", r.weekday),
            DateStyle::TimeOnly | DateStyle::TimeOnlyMinutes | DateStyle::TimeOnlyTenths => {
                r.time.format(":", false)
            }
            DateStyle::Compact => format!(
                "{}{:02}{:02}T{}",
                r.year,
                r.month,
                r.day,
                r.time.format("", false)
            ),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(DateStyle::MonthName, 0))
    }
}

fn parse_year(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse).parse(input)
}

fn month_from_name(name: &str) -> Option<u32> {
    let key = name.get(..3)?;
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(key))
        .map(|i| i as u32 + 1)
}

fn parse_month(input: &str) -> IResult<&str, u32> {
    alt((map_res(digit1, str::parse), map_opt(alpha1, month_from_name))).parse(input)
}

fn date_separator(input: &str) -> IResult<&str, ()> {
    alt((
        map(delimited(space0, one_of("-/"), space0), |_| ()),
        map(space1, |_| ()),
    ))
    .parse(input)
}

fn parse_date_fields(input: &str) -> IResult<&str, (i32, u32, u32, &str)> {
    all_consuming(delimited(
        space0,
        (
            parse_year,
            preceded(date_separator, parse_month),
            preceded(date_separator, map_res(digit1, str::parse)),
            preceded(opt(alt((map(char('T'), |_| ()), map(space1, |_| ())))), rest),
        ),
        space0,
    ))
    .parse(input)
}

impl FromStr for CalendarDate {
    type Err = SkycalcError;

    /// Accepts `"2000 1 1 12 0 0"`, `"2000-01-01 12:00:00"`, `"2000-01-01T12:00"`,
    /// `"2000 Jan 1 12 30"` or a date without time (midnight).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, (year, month, day, time_text)) =
            parse_date_fields(s).map_err(|_| SkycalcError::DateParseError(s.to_string()))?;

        let hours = if time_text.trim().is_empty() {
            0.0
        } else {
            Sexagesimal::parse(time_text)
                .map_err(|_| SkycalcError::DateParseError(s.to_string()))?
                .value()
        };
        CalendarDate::new(year, month, day, hours)
    }
}
