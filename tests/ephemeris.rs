mod common;

use approx::assert_abs_diff_eq;
use rand::Rng;

use skycalc::celest::Celest;
use skycalc::constants::{Planet, DEG_IN_RADIAN, LIGHTSEC_IN_AU};
use skycalc::ephemeris::barycentric::{time_correction, Frame};
use skycalc::ephemeris::moon::{flmoon, lunation, moon_position, MoonPhase};
use skycalc::ephemeris::planets::PlanetElements;
use skycalc::ephemeris::sun::sun_position;
use skycalc::instant::Instant;
use skycalc::time::lst;
use skycalc::when_where::WhenWhere;

use common::{kitt_peak, rng};

#[test]
fn sun_at_j2000() {
    let sun = sun_position(2_451_545.0);
    // 18h45m, -23.0 deg, 0.983 AU
    assert_abs_diff_eq!(sun.ra, 18.75, epsilon = 0.02);
    assert_abs_diff_eq!(sun.dec, -23.03, epsilon = 0.05);
    assert_abs_diff_eq!(sun.distance, 0.9833, epsilon = 0.0005);
}

#[test]
fn lunation_brackets_the_date() {
    let mut rng = rng();
    for _ in 0..500 {
        let jd = rng.random_range(2_415_100.0..2_488_000.0);
        let lun = lunation(jd);
        assert!(lun.converged);
        assert!(flmoon(lun.number, MoonPhase::New) <= jd, "JD {jd}");
        assert!(jd < flmoon(lun.number + 1, MoonPhase::New), "JD {jd}");
    }
}

#[test]
fn phases_follow_each_other() {
    let mut rng = rng();
    for _ in 0..100 {
        let n = rng.random_range(0..2000);
        let jds: Vec<f64> = MoonPhase::ALL.iter().map(|p| flmoon(n, *p)).collect();
        assert!(jds.windows(2).all(|w| w[1] > w[0]));
        let next = flmoon(n + 1, MoonPhase::New);
        assert!(next - jds[0] > 29.2 && next - jds[0] < 29.9);
    }
}

#[test]
fn full_moon_is_opposite_the_sun() {
    let site = kitt_peak();
    let mut rng = rng();
    for _ in 0..50 {
        let n = rng.random_range(1000..1500);
        let full = flmoon(n, MoonPhase::Full);
        let ww = WhenWhere::new(Instant::from_jd(full, site.zone()), site.clone());
        assert!(ww.moon_illumination() > 0.98, "lunation {n}");

        let new = flmoon(n, MoonPhase::New);
        let ww = ww.with_jd(new);
        assert!(ww.moon_illumination() < 0.02, "lunation {n}");
    }
}

#[test]
fn moon_distance_and_latitude() {
    let mut rng = rng();
    for _ in 0..500 {
        let moon = moon_position(rng.random_range(2_440_000.0..2_470_000.0));
        // perigee and apogee in Earth radii
        assert!(moon.distance > 55.5 && moon.distance < 64.0);
        assert!(moon.latitude.abs() < 5.4);
    }
}

#[test]
fn planets_stay_in_their_orbits() {
    let mut rng = rng();
    let bounds = [
        (Planet::Mercury, 0.30, 0.47),
        (Planet::Venus, 0.71, 0.73),
        (Planet::Earth, 0.98, 1.02),
        (Planet::Mars, 1.37, 1.68),
        (Planet::Jupiter, 4.9, 5.5),
        (Planet::Saturn, 8.9, 10.2),
        (Planet::Uranus, 18.1, 20.2),
        (Planet::Neptune, 29.7, 30.5),
    ];
    for _ in 0..50 {
        let jd = rng.random_range(2_440_000.0..2_470_000.0);
        let elements = PlanetElements::at(jd);
        for (planet, lo, hi) in bounds {
            let r = elements.heliocentric(planet, jd).norm();
            assert!(r > lo && r < hi, "{planet} at {r} AU on JD {jd}");
        }
    }
}

#[test]
fn barycentric_correction_bounds() {
    let site = kitt_peak();
    let mut rng = rng();
    for _ in 0..200 {
        let jd = rng.random_range(2_440_000.0..2_470_000.0);
        let ra = rng.random_range(0.0..24.0);
        let target = Celest::new(ra, rng.random_range(-89.0..89.0), 2000.0);
        let sidereal = lst(jd, site.longitude());
        let lat = site.latitude();
        let bary = time_correction(jd, Frame::Barycentric, &target, lat, 1925.0, sidereal);
        let helio = time_correction(jd, Frame::Heliocentric, &target, lat, 1925.0, sidereal);

        // at most the light time across 1.02 AU, plus the barycentre offset
        assert!(bary.light_time.abs() < 1.02 * LIGHTSEC_IN_AU + 6.0);
        assert!(helio.light_time.abs() < 1.02 * LIGHTSEC_IN_AU);
        assert!(bary.velocity.abs() < 31.0);
        assert_abs_diff_eq!(bary.jd - jd, bary.light_time / 86400.0, epsilon = 1e-12);
    }
}

#[test]
fn sun_moves_a_degree_a_day() {
    let a = sun_position(2_455_000.0);
    let b = sun_position(2_455_001.0);
    let step = a.xyz.angle(&b.xyz) * DEG_IN_RADIAN;
    assert!(step > 0.94 && step < 1.03);
}
