#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skycalc::calendar::days_in_month;
use skycalc::site::dst::{DstRule, ZoneRule};
use skycalc::site::Site;

pub const SEED: u64 = 0x5EED_CA1C;

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// Kitt Peak, Arizona: no daylight saving time.
pub fn kitt_peak() -> Site {
    let zone = ZoneRule {
        std_offset: 7.0,
        dst: DstRule::None,
    };
    Site::new("Kitt Peak", 7.44111, 31.9533, zone)
        .and_then(|s| s.with_elevations(1925.0, 700.0))
        .unwrap()
}

/// Cerro Tololo, Chile: southern-hemisphere daylight saving time.
pub fn cerro_tololo() -> Site {
    let zone = ZoneRule {
        std_offset: 4.0,
        dst: DstRule::Chile,
    };
    Site::new("Cerro Tololo", 4.721, -30.165, zone)
        .and_then(|s| s.with_elevations(2215.0, 2215.0))
        .unwrap()
}

/// Random Gregorian calendar fields between 1583 and 3000, whole seconds.
pub fn random_date(rng: &mut StdRng) -> (i32, u32, u32, u32, u32, u32) {
    let year = rng.random_range(1583..=3000);
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=days_in_month(year, month));
    (
        year,
        month,
        day,
        rng.random_range(0..24),
        rng.random_range(0..60),
        rng.random_range(0..60),
    )
}

/// Difference of two angles in hours, wrapped to `[0, 12]`.
pub fn hours_apart(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(24.0);
    d.min(24.0 - d)
}
