//! # Daylight-saving conventions
//!
//! Five regional conventions are supported, selected by an integer code:
//!
//! | code | region            | DST begins                      | DST ends                         |
//! |------|-------------------|---------------------------------|----------------------------------|
//! | 0    | none              | –                               | –                                |
//! | 1    | USA               | see below, 2:00 local standard  | see below, 2:00 local daylight   |
//! | 2    | European Union    | last Sunday of March, 1:00      | last Sunday of October, 1:00 std |
//! | −1   | Chile             | second Saturday of October, 24:00 | second Saturday of March, 24:00 |
//! | −2   | Australia (NSW)   | last Sunday of October, 2:00    | last Sunday of March, 3:00 daylight |
//!
//! USA dates changed twice: before 1986 DST began on the last Sunday of April, from 1986 to 2006
//! on the first Sunday of April, and from 2007 on the second Sunday of March. It ended on the last
//! Sunday of October before 2007 and on the first Sunday of November from 2007 on.
//!
//! Negative codes are southern-hemisphere rules: the boundary pair returned by
//! [`find_dst_bounds`] then marks the **start and end of standard time** rather than of DST.
//!
//! The transition days are found by walking day by day from a fixed calendar date until the
//! required weekday is reached.

use crate::calendar::{date_to_julian, day_of_week, CalendarDate, Weekday};
use crate::constants::{Hour, JulianDate};
use crate::skycalc_errors::SkycalcError;

/// Daylight-saving convention code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DstRule {
    None,
    Usa,
    Europe,
    Chile,
    Australia,
}

impl DstRule {
    pub fn code(self) -> i32 {
        match self {
            DstRule::None => 0,
            DstRule::Usa => 1,
            DstRule::Europe => 2,
            DstRule::Chile => -1,
            DstRule::Australia => -2,
        }
    }

    /// Southern-hemisphere rules have DST across the new year.
    pub fn is_southern(self) -> bool {
        self.code() < 0
    }
}

impl TryFrom<i32> for DstRule {
    type Error = SkycalcError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DstRule::None),
            1 => Ok(DstRule::Usa),
            2 => Ok(DstRule::Europe),
            -1 => Ok(DstRule::Chile),
            -2 => Ok(DstRule::Australia),
            _ => Err(SkycalcError::InvalidSite(format!("unknown DST code {code}"))),
        }
    }
}

/// Standard-time offset plus DST convention; everything needed to go between UT and local time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRule {
    /// Standard-time offset in hours **west** of Greenwich (5 for US Eastern, −10 for Sydney).
    pub std_offset: Hour,
    pub dst: DstRule,
}

/// The two DST transition instants of one year, as UT Julian Dates and as local clock readings.
///
/// For northern rules `begin` starts daylight time and `end` ends it. For southern rules `begin`
/// starts standard time (autumn) and `end` ends it (spring). The local values are the clock
/// readings at which the change happens (standard clock for a switch to daylight time, daylight
/// clock for a switch back), expressed as Julian Dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DstBounds {
    pub year: i32,
    pub jd_begin: JulianDate,
    pub jd_end: JulianDate,
    pub jd_begin_local: JulianDate,
    pub jd_end_local: JulianDate,
}

/// Walk from `start` in `step` (+1 or −1 days) until `weekday` is reached.
fn walk_to_weekday(year: i32, month: u32, start_day: u32, step: i32, weekday: Weekday) -> u32 {
    let mut day = start_day as i32;
    while day_of_week(date_to_julian(year, month, day as u32, 12.0)) != weekday {
        day += step;
    }
    day as u32
}

/// Local clock reading (as a JD) of a transition at `hours` on the given day.
fn clock(year: i32, month: u32, day: u32, hours: f64) -> JulianDate {
    date_to_julian(year, month, day, hours)
}

/// Compute the DST transitions of `year` under `zone`.
///
/// Returns `None` for [`DstRule::None`]. The result depends only on `(year, zone)`.
pub fn find_dst_bounds(year: i32, zone: ZoneRule) -> Option<DstBounds> {
    let stdz = zone.std_offset / 24.0;

    // (begin clock, begin clock is daylight?, end clock, end clock is daylight?)
    let (begin_local, begin_on_daylight, end_local, end_on_daylight) = match zone.dst {
        DstRule::None => return None,
        DstRule::Usa => {
            let begin_day = if year < 1986 {
                (4, walk_to_weekday(year, 4, 30, -1, Weekday::Sunday))
            } else if year < 2007 {
                (4, walk_to_weekday(year, 4, 1, 1, Weekday::Sunday))
            } else {
                (3, walk_to_weekday(year, 3, 8, 1, Weekday::Sunday))
            };
            let end_day = if year < 2007 {
                (10, walk_to_weekday(year, 10, 31, -1, Weekday::Sunday))
            } else {
                (11, walk_to_weekday(year, 11, 1, 1, Weekday::Sunday))
            };
            (
                clock(year, begin_day.0, begin_day.1, 2.0),
                false,
                clock(year, end_day.0, end_day.1, 2.0),
                true,
            )
        }
        DstRule::Europe => {
            let begin = walk_to_weekday(year, 3, 31, -1, Weekday::Sunday);
            let end = walk_to_weekday(year, 10, 31, -1, Weekday::Sunday);
            (
                clock(year, 3, begin, 1.0),
                false,
                // 01:00 standard is 02:00 on the daylight clock
                clock(year, 10, end, 2.0),
                true,
            )
        }
        DstRule::Chile => {
            // standard time starts at 24:00 daylight on the second Saturday of March,
            // daylight time at 24:00 standard on the second Saturday of October
            let begin = walk_to_weekday(year, 3, 8, 1, Weekday::Saturday);
            let end = walk_to_weekday(year, 10, 8, 1, Weekday::Saturday);
            (
                clock(year, 3, begin, 24.0),
                true,
                clock(year, 10, end, 24.0),
                false,
            )
        }
        DstRule::Australia => {
            let begin = walk_to_weekday(year, 3, 31, -1, Weekday::Sunday);
            let end = walk_to_weekday(year, 10, 31, -1, Weekday::Sunday);
            (
                clock(year, 3, begin, 3.0),
                true,
                clock(year, 10, end, 2.0),
                false,
            )
        }
    };

    let to_ut = |local: JulianDate, on_daylight: bool| {
        if on_daylight {
            local + stdz - 1.0 / 24.0
        } else {
            local + stdz
        }
    };

    Some(DstBounds {
        year,
        jd_begin: to_ut(begin_local, begin_on_daylight),
        jd_end: to_ut(end_local, end_on_daylight),
        jd_begin_local: begin_local,
        jd_end_local: end_local,
    })
}

impl DstBounds {
    fn classify(&self, southern: bool, t: JulianDate, begin: JulianDate, end: JulianDate) -> bool {
        if southern {
            t < begin || t >= end
        } else {
            t >= begin && t < end
        }
    }

    /// Whether daylight time is in effect at UT Julian Date `jd`.
    pub fn in_effect_ut(&self, rule: DstRule, jd: JulianDate) -> bool {
        self.classify(rule.is_southern(), jd, self.jd_begin, self.jd_end)
    }

    /// Whether daylight time is in effect at a local clock reading (expressed as a JD).
    pub fn in_effect_local(&self, rule: DstRule, local_jd: JulianDate) -> bool {
        self.classify(
            rule.is_southern(),
            local_jd,
            self.jd_begin_local,
            self.jd_end_local,
        )
    }
}

impl ZoneRule {
    /// Calendar year of `jd` on the local standard-time clock.
    pub fn local_year(&self, jd: JulianDate) -> i32 {
        CalendarDate::from_julian(jd - self.std_offset / 24.0).year()
    }

    /// Whether DST is in effect at UT Julian Date `jd`.
    pub fn is_dst_ut(&self, jd: JulianDate) -> bool {
        find_dst_bounds(self.local_year(jd), *self)
            .map(|b| b.in_effect_ut(self.dst, jd))
            .unwrap_or(false)
    }

    /// Whether DST is in effect at a local clock reading of the given year.
    pub fn is_dst_local(&self, year: i32, local_jd: JulianDate) -> bool {
        find_dst_bounds(year, *self)
            .map(|b| b.in_effect_local(self.dst, local_jd))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod dst_test {
    use super::*;
    use crate::calendar::CalendarDate;
    use approx::assert_relative_eq;

    fn date_of(jd: JulianDate) -> (i32, u32, u32) {
        let d = CalendarDate::from_julian(jd);
        (d.year(), d.month(), d.day())
    }

    fn zone(std_offset: f64, dst: DstRule) -> ZoneRule {
        ZoneRule { std_offset, dst }
    }

    #[test]
    fn test_usa_rule_changes() {
        let eastern = zone(5.0, DstRule::Usa);

        let b = find_dst_bounds(1985, eastern).unwrap();
        assert_eq!(date_of(b.jd_begin_local), (1985, 4, 28));
        assert_eq!(date_of(b.jd_end_local), (1985, 10, 27));

        let b = find_dst_bounds(2000, eastern).unwrap();
        assert_eq!(date_of(b.jd_begin_local), (2000, 4, 2));
        assert_eq!(date_of(b.jd_end_local), (2000, 10, 29));

        let b = find_dst_bounds(2007, eastern).unwrap();
        assert_eq!(date_of(b.jd_begin_local), (2007, 3, 11));
        assert_eq!(date_of(b.jd_end_local), (2007, 11, 4));

        // 2:00 EST = 7:00 UT; 2:00 EDT = 6:00 UT
        assert_relative_eq!(b.jd_begin, date_to_julian(2007, 3, 11, 7.0), epsilon = 1e-9);
        assert_relative_eq!(b.jd_end, date_to_julian(2007, 11, 4, 6.0), epsilon = 1e-9);
    }

    #[test]
    fn test_europe() {
        let b = find_dst_bounds(2021, zone(-1.0, DstRule::Europe)).unwrap();
        assert_eq!(date_of(b.jd_begin_local), (2021, 3, 28));
        assert_eq!(date_of(b.jd_end_local), (2021, 10, 31));
        assert_relative_eq!(b.jd_begin, date_to_julian(2021, 3, 28, 0.0), epsilon = 1e-9);
        assert_relative_eq!(b.jd_end, date_to_julian(2021, 10, 31, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_southern_rules() {
        let chile = zone(4.0, DstRule::Chile);
        let b = find_dst_bounds(2005, chile).unwrap();
        // second Saturdays, 24:00 means the following midnight
        assert_eq!(date_of(b.jd_begin_local), (2005, 3, 13));
        assert_eq!(date_of(b.jd_end_local), (2005, 10, 9));

        let jd_jan = date_to_julian(2005, 1, 15, 12.0);
        let jd_jul = date_to_julian(2005, 7, 15, 12.0);
        assert!(b.in_effect_ut(DstRule::Chile, jd_jan));
        assert!(!b.in_effect_ut(DstRule::Chile, jd_jul));

        let sydney = zone(-10.0, DstRule::Australia);
        let b = find_dst_bounds(2005, sydney).unwrap();
        assert_eq!(date_of(b.jd_begin_local), (2005, 3, 27));
        assert_eq!(date_of(b.jd_end_local), (2005, 10, 30));
        assert!(sydney.is_dst_ut(date_to_julian(2005, 12, 25, 0.0)));
        assert!(!sydney.is_dst_ut(date_to_julian(2005, 6, 21, 0.0)));
    }

    #[test]
    fn test_bounds_are_deterministic() {
        let pacific = zone(8.0, DstRule::Usa);
        let first = find_dst_bounds(2010, pacific).unwrap();
        for _ in 0..3 {
            assert_eq!(find_dst_bounds(2010, pacific).unwrap(), first);
        }
        assert!(find_dst_bounds(2010, zone(7.0, DstRule::None)).is_none());
    }

    #[test]
    fn test_local_classification() {
        let eastern = zone(5.0, DstRule::Usa);
        assert!(!eastern.is_dst_local(2007, date_to_julian(2007, 3, 11, 1.9)));
        assert!(eastern.is_dst_local(2007, date_to_julian(2007, 3, 11, 3.0)));
        assert!(eastern.is_dst_local(2007, date_to_julian(2007, 11, 4, 1.5)));
        assert!(!eastern.is_dst_local(2007, date_to_julian(2007, 11, 4, 2.5)));
    }

    #[test]
    fn test_rule_codes() {
        for code in [-2, -1, 0, 1, 2] {
            assert_eq!(DstRule::try_from(code).unwrap().code(), code);
        }
        assert!(DstRule::try_from(3).is_err());
    }
}
