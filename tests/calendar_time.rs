mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use hifitime::Epoch;
use rand::Rng;

use skycalc::calendar::{date_to_julian, day_of_week, CalendarDate, DateStyle, Weekday};
use skycalc::instant::Instant;
use skycalc::sexagesimal::Sexagesimal;
use skycalc::time::lst;

use common::{cerro_tololo, hours_apart, kitt_peak, random_date, rng};

#[test]
fn j2000_noon() {
    let date: CalendarDate = "2000-01-01 12:00:00".parse().unwrap();
    assert_relative_eq!(date.to_julian(), 2_451_545.0, epsilon = 1e-9);
    assert_eq!(day_of_week(2_451_545.0), Weekday::Saturday);
    assert_eq!(
        CalendarDate::from_julian(2_451_545.0).format(DateStyle::Iso, 0),
        "2000-01-01 12:00:00"
    );
}

#[test]
fn negative_half_hour() {
    let s = Sexagesimal::parse("-00:30:00").unwrap();
    assert_abs_diff_eq!(s.value(), -0.5, epsilon = 1e-12);
    assert!(s.is_negative());
    assert_eq!(s.hour(), 0);
    assert_eq!(s.minute(), 30);
}

#[test]
fn calendar_round_trip() {
    let mut rng = rng();
    for _ in 0..2000 {
        let (y, m, d, h, mi, s) = random_date(&mut rng);
        let hours = h as f64 + mi as f64 / 60.0 + s as f64 / 3600.0;
        let jd = date_to_julian(y, m, d, hours);
        let back = CalendarDate::from_julian(jd);
        assert_eq!((back.year(), back.month(), back.day()), (y, m, d), "JD {jd}");
        assert_abs_diff_eq!(back.hours(), hours, epsilon = 1e-6);
        assert_abs_diff_eq!(back.to_julian(), jd, epsilon = 1e-9);
    }
}

#[test]
fn julian_dates_agree_with_hifitime() {
    let mut rng = rng();
    for _ in 0..500 {
        let (_, m, d, h, mi, s) = random_date(&mut rng);
        let y = rng.random_range(1900..=2100);
        let d = d.min(28);
        let ours = date_to_julian(y, m, d, h as f64 + mi as f64 / 60.0 + s as f64 / 3600.0);
        let theirs =
            Epoch::from_gregorian_utc(y, m as u8, d as u8, h as u8, mi as u8, s as u8, 0)
                .to_jde_utc_days();
        assert_abs_diff_eq!(ours, theirs, epsilon = 1e-6);
    }
}

#[test]
fn sexagesimal_round_trip() {
    let mut rng = rng();
    for _ in 0..2000 {
        let x: f64 = rng.random_range(-90.0..90.0);
        let ndigits = rng.random_range(0..=3);
        let text = Sexagesimal::from_value(x).to_string_with(ndigits, ":");
        let back = Sexagesimal::parse(&text).unwrap().value();
        let tolerance = 0.5 * 10f64.powi(-ndigits) / 3600.0 + 1e-9;
        assert!((back - x).abs() <= tolerance, "{x} -> {text} -> {back}");
    }
}

#[test]
fn local_and_ut_agree_without_dst() {
    let zone = kitt_peak().zone();
    let mut rng = rng();
    for _ in 0..500 {
        let jd = rng.random_range(2_415_020.0..2_488_070.0);
        let t = Instant::from_jd(jd, zone);
        assert!(!t.is_dst());
        let local = t.local_date();
        assert_abs_diff_eq!(local.to_julian() + 7.0 / 24.0, jd, epsilon = 1e-8);
        let again = Instant::from_local_date(&local, zone);
        assert_abs_diff_eq!(again.jd(), jd, epsilon = 1e-8);
    }
}

#[test]
fn southern_summer_time() {
    let zone = cerro_tololo().zone();
    let january = Instant::parse("2005-01-15 22:00", false, zone).unwrap();
    assert!(january.is_dst());
    assert_abs_diff_eq!(january.offset_hours(), 3.0);
    assert_abs_diff_eq!(january.jd(), date_to_julian(2005, 1, 16, 1.0), epsilon = 1e-9);

    let july = Instant::parse("2005-07-15 22:00", false, zone).unwrap();
    assert!(!july.is_dst());
    assert_abs_diff_eq!(july.offset_hours(), 4.0);
    assert_abs_diff_eq!(july.jd(), date_to_julian(2005, 7, 16, 2.0), epsilon = 1e-9);
}

#[test]
fn sidereal_day() {
    let mut rng = rng();
    for _ in 0..200 {
        let jd = rng.random_range(2_440_000.0..2_470_000.0);
        let lon = rng.random_range(-12.0..12.0);
        let s = lst(jd, lon);
        assert!((0.0..24.0).contains(&s));
        // one solar day later the stars are 3m56s further west
        let gain = hours_apart(lst(jd + 1.0, lon), s);
        assert_abs_diff_eq!(gain, 0.06571, epsilon = 1e-4);
        // one sidereal day later they are back
        assert!(hours_apart(lst(jd + 0.99726957, lon), s) < 1e-5);
    }
}
