//! # Instants
//!
//! An [`Instant`] is a UT Julian Date tied to a civil time zone. The Julian Date is the only
//! stored time; the UT and local calendar dates are derived from it on request, and the
//! daylight-saving flag is re-evaluated every time a new instant is built.
//!
//! Instants are `Copy` values. Advancing one ([`Instant::advanced_by_days`],
//! [`Instant::advanced_by_hours`], [`Instant::with_jd`]) returns a new instant and leaves the
//! original untouched.
//!
//! ```
//! use skycalc::calendar::CalendarDate;
//! use skycalc::instant::Instant;
//! use skycalc::site::dst::{DstRule, ZoneRule};
//!
//! let eastern = ZoneRule { std_offset: 5.0, dst: DstRule::Usa };
//! let noon = CalendarDate::new(2020, 7, 4, 12.0).unwrap();
//! let t = Instant::from_local_date(&noon, eastern);
//! assert!(t.is_dst());
//! assert_eq!(t.ut_date().hours().round(), 16.0);
//! ```

use std::fmt;

use hifitime::Epoch;

use crate::calendar::{CalendarDate, DateStyle};
use crate::constants::{Hour, JulianDate};
use crate::site::dst::{find_dst_bounds, DstBounds, ZoneRule};
use crate::skycalc_errors::SkycalcError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instant {
    jd: JulianDate,
    zone: ZoneRule,
    dst: bool,
}

impl Instant {
    /// Instant at UT Julian Date `jd`.
    pub fn from_jd(jd: JulianDate, zone: ZoneRule) -> Self {
        Instant {
            jd,
            zone,
            dst: zone.is_dst_ut(jd),
        }
    }

    /// Instant from a UT calendar date.
    pub fn from_ut_date(date: &CalendarDate, zone: ZoneRule) -> Self {
        Instant::from_jd(date.to_julian(), zone)
    }

    /// Instant from a local clock reading.
    ///
    /// The DST flag is decided against the local-time transition bounds of the date's year,
    /// then the offset is removed to obtain UT. Readings inside the skipped spring hour are
    /// interpreted as standard time; readings inside the repeated autumn hour as daylight time.
    pub fn from_local_date(date: &CalendarDate, zone: ZoneRule) -> Self {
        let local_jd = date.to_julian();
        let dst = zone.is_dst_local(date.year(), local_jd);
        let offset = zone.std_offset - if dst { 1.0 } else { 0.0 };
        Instant {
            jd: local_jd + offset / 24.0,
            zone,
            dst,
        }
    }

    /// Parse a date string (see [`CalendarDate`]'s `FromStr`) as UT or as local time.
    pub fn parse(text: &str, is_ut: bool, zone: ZoneRule) -> Result<Self, SkycalcError> {
        let date: CalendarDate = text.parse()?;
        Ok(if is_ut {
            Instant::from_ut_date(&date, zone)
        } else {
            Instant::from_local_date(&date, zone)
        })
    }

    /// The current instant from the system clock.
    pub fn now(zone: ZoneRule) -> Result<Self, SkycalcError> {
        let epoch = Epoch::now()?;
        Ok(Instant::from_jd(epoch.to_jde_utc_days(), zone))
    }

    pub fn jd(&self) -> JulianDate {
        self.jd
    }

    pub fn zone(&self) -> ZoneRule {
        self.zone
    }

    pub fn is_dst(&self) -> bool {
        self.dst
    }

    /// Hours to add to local time to get UT (the standard offset minus one hour under DST).
    pub fn offset_hours(&self) -> Hour {
        self.zone.std_offset - if self.dst { 1.0 } else { 0.0 }
    }

    pub fn ut_date(&self) -> CalendarDate {
        CalendarDate::from_julian(self.jd)
    }

    pub fn local_date(&self) -> CalendarDate {
        CalendarDate::from_julian(self.jd - self.offset_hours() / 24.0)
    }

    /// Transition bounds of the local year containing this instant.
    pub fn dst_bounds(&self) -> Option<DstBounds> {
        find_dst_bounds(self.zone.local_year(self.jd), self.zone)
    }

    pub fn with_jd(&self, jd: JulianDate) -> Self {
        Instant::from_jd(jd, self.zone)
    }

    pub fn advanced_by_days(&self, days: f64) -> Self {
        self.with_jd(self.jd + days)
    }

    pub fn advanced_by_hours(&self, hours: Hour) -> Self {
        self.with_jd(self.jd + hours / 24.0)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} local ({} UT)",
            self.local_date().format(DateStyle::DayOfWeekMonthName, 0),
            self.ut_date().format(DateStyle::TimeOnly, 0)
        )
    }
}

#[cfg(test)]
mod instant_test {
    use super::*;
    use crate::calendar::date_to_julian;
    use crate::site::dst::DstRule;
    use approx::assert_abs_diff_eq;

    const EASTERN: ZoneRule = ZoneRule {
        std_offset: 5.0,
        dst: DstRule::Usa,
    };

    #[test]
    fn test_local_to_ut() {
        let summer = CalendarDate::new(2020, 7, 4, 12.0).unwrap();
        let t = Instant::from_local_date(&summer, EASTERN);
        assert!(t.is_dst());
        assert_abs_diff_eq!(t.jd(), date_to_julian(2020, 7, 4, 16.0), epsilon = 1e-9);
        assert_abs_diff_eq!(t.local_date().hours(), 12.0, epsilon = 1e-6);

        let winter = CalendarDate::new(2020, 1, 15, 12.0).unwrap();
        let t = Instant::from_local_date(&winter, EASTERN);
        assert!(!t.is_dst());
        assert_abs_diff_eq!(t.offset_hours(), 5.0);
        assert_abs_diff_eq!(t.jd(), date_to_julian(2020, 1, 15, 17.0), epsilon = 1e-9);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let t = Instant::from_jd(date_to_julian(2021, 1, 1, 3.0), EASTERN);
        let local = t.local_date();
        assert_eq!((local.year(), local.month(), local.day()), (2020, 12, 31));
        assert_abs_diff_eq!(local.hours(), 22.0, epsilon = 1e-6);
    }

    #[test]
    fn test_advancing_returns_new_values() {
        let t = Instant::parse("2007 3 10 12 00", false, EASTERN).unwrap();
        assert!(!t.is_dst());
        let later = t.advanced_by_days(1.0);
        assert!(later.is_dst());
        assert!(!t.is_dst());
        assert_abs_diff_eq!(later.jd() - t.jd(), 1.0);
        assert_abs_diff_eq!(t.advanced_by_hours(6.0).jd() - t.jd(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_ut() {
        let t = Instant::parse("2000-01-01 12:00:00", true, EASTERN).unwrap();
        assert_abs_diff_eq!(t.jd(), 2451545.0, epsilon = 1e-9);
        assert!(Instant::parse("2000 Foo 01", true, EASTERN).is_err());
    }

    #[test]
    fn test_dst_bounds_of_instant() {
        let t = Instant::from_jd(date_to_julian(2010, 6, 1, 0.0), EASTERN);
        let bounds = t.dst_bounds().unwrap();
        assert_eq!(bounds.year, 2010);
        assert!(bounds.jd_begin < t.jd() && t.jd() < bounds.jd_end);
    }

    #[test]
    fn test_now() {
        let t = Instant::now(EASTERN).unwrap();
        // any date after 2020
        assert!(t.jd() > 2_458_850.0);
    }
}
