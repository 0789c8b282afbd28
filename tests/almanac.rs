mod common;

use approx::assert_abs_diff_eq;
use rand::Rng;

use skycalc::almanac::crossing::{moon_altitude, sun_altitude, Crossing, ALTITUDE_TOLERANCE};
use skycalc::almanac::night::NightlyAlmanac;
use skycalc::almanac::AlmanacParams;
use skycalc::instant::Instant;
use skycalc::site::dst::{DstRule, ZoneRule};
use skycalc::site::Site;
use skycalc::skycalc::Skycalc;
use skycalc::when_where::WhenWhere;

use common::{kitt_peak, rng};

fn night_at(site: &Site, jd: f64) -> NightlyAlmanac {
    let ww = WhenWhere::new(Instant::from_jd(jd, site.zone()), site.clone());
    NightlyAlmanac::new(&ww, &AlmanacParams::default())
}

fn far_north(latitude: f64) -> Site {
    let zone = ZoneRule {
        std_offset: 0.0,
        dst: DstRule::None,
    };
    Site::new("Far north", 0.0, latitude, zone).unwrap()
}

#[test]
fn events_come_in_order() {
    let site = kitt_peak();
    let mut rng = rng();
    for _ in 0..200 {
        let night = night_at(&site, rng.random_range(2_440_000.0..2_470_000.0));
        let events = [
            night.sunset.jd().unwrap(),
            night.evening_twilight.jd().unwrap(),
            night.midnight(),
            night.morning_twilight.jd().unwrap(),
            night.sunrise.jd().unwrap(),
        ];
        assert!(
            events.windows(2).all(|w| w[0] < w[1]),
            "night of JD {}",
            night.midnight()
        );
        assert!(events[4] - events[0] < 1.0);
    }
}

#[test]
fn crossings_sit_on_their_altitudes() {
    let site = kitt_peak();
    let horizon = -0.83 - site.horizon_dip();
    assert_abs_diff_eq!(site.horizon_dip(), 0.849, epsilon = 0.001);

    let mut rng = rng();
    for _ in 0..100 {
        let night = night_at(&site, rng.random_range(2_440_000.0..2_470_000.0));
        for sun in [night.sunset, night.sunrise] {
            let jd = sun.jd().unwrap();
            assert!((sun_altitude(jd, &site) - horizon).abs() <= ALTITUDE_TOLERANCE + 1e-9);
        }
        for twilight in [night.evening_twilight, night.morning_twilight] {
            let jd = twilight.jd().unwrap();
            assert!((sun_altitude(jd, &site) + 18.0).abs() <= ALTITUDE_TOLERANCE + 1e-9);
        }
        for moon in [night.moonrise, night.moonset] {
            if let Crossing::At(jd) = moon {
                assert!((moon_altitude(jd, &site) - horizon).abs() <= ALTITUDE_TOLERANCE + 1e-9);
            }
        }
    }
}

#[test]
fn hours_above_shrink_with_altitude() {
    let site = kitt_peak();
    let mut rng = rng();
    for _ in 0..200 {
        let night = night_at(&site, rng.random_range(2_440_000.0..2_470_000.0));
        let (evening, morning) = night.dark_window().unwrap();
        let dark = (morning - evening) * 24.0;

        let ra = rng.random_range(0.0..24.0);
        let dec = rng.random_range(-60.0..89.0);
        let hours: Vec<f64> = [10.0, 30.0, 50.0]
            .iter()
            .map(|alt| night.hours_above(ra, dec, *alt))
            .collect();
        assert!(hours[0] <= dark + 1e-9, "{} > {dark}", hours[0]);
        assert!(hours.windows(2).all(|w| w[1] <= w[0] + 1e-12), "{hours:?}");
        assert!(hours.iter().all(|h| *h >= 0.0));
    }
}

#[test]
fn midnight_sun_and_polar_night() {
    // June 21 2020 at 78 N: the Sun never drops below -18 deg
    let summer = night_at(&far_north(78.0), 2_459_022.0);
    assert_eq!(summer.sunset, Crossing::AlwaysAbove);
    assert_eq!(summer.evening_twilight, Crossing::AlwaysAbove);
    assert!(summer.dark_window().is_none());
    assert_eq!(summer.hours_above(2.5, 89.0, 30.0), 0.0);

    // December 21 2020 at 85 N: dark all day
    let winter = night_at(&far_north(85.0), 2_459_205.0);
    assert_eq!(winter.evening_twilight, Crossing::NeverAbove);
    let (evening, morning) = winter.dark_window().unwrap();
    assert_abs_diff_eq!(morning - evening, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(winter.hours_above(2.5, 89.0, 30.0), 24.0, epsilon = 1e-9);
}

#[test]
fn facade_matches_direct_computation() {
    let calc = Skycalc::new();
    let ww = calc.when_where_at("Kitt Peak", 2_455_197.5).unwrap();
    let night = calc.almanac(&ww);
    let direct = NightlyAlmanac::new(&ww, &AlmanacParams::default());
    assert_eq!(night.sunset, direct.sunset);
    assert_eq!(night.moonrise, direct.moonrise);

    let text = night.to_string();
    assert!(text.contains("Kitt Peak"));
    assert!(text.contains("Sunset"));
    assert!(text.contains("Moonset"));
}
