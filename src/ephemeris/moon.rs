//! # The Moon
//!
//! Geocentric lunar position from the full Brown/Meeus series (*Astronomical Formulae for
//! Calculators*, ch. 30): longitude, latitude and horizontal parallax with the additive and
//! Ω-dependent corrections to the fundamental arguments. The series is expressed in dynamical
//! time and referred to the mean equinox of date.
//!
//! Phases come from the separate mean-lunation formula [`flmoon`] (Meeus ch. 32), indexed by a
//! lunation number counted from the new moon of 1900 January 0.
//!
//! ```
//! use skycalc::ephemeris::moon::{flmoon, lunation, MoonPhase};
//!
//! let jd = 2_460_000.5;
//! let n = lunation(jd).number;
//! assert!(flmoon(n, MoonPhase::New) <= jd && jd < flmoon(n + 1, MoonPhase::New));
//! ```

use nalgebra::Vector3;

use super::BodyPosition;
use crate::constants::{
    Degree, EarthRadii, JulianDate, Radian, DEG_IN_RADIAN, EARTHRAD_IN_AU, J1900,
    SECONDS_PER_DAY, SYNODIC_MONTH,
};
use crate::horizon::topocorr;
use crate::ref_system::{cel_unit_xyz, ecliptic_to_equatorial};
use crate::time::etcorr;

/// Maximum number of lunations stepped through by [`lunation`].
const LUNATION_SEARCH_CAP: usize = 40;

/// Geocentric Moon in ecliptic and equatorial coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    /// Ecliptic longitude of date, degrees in `[0, 360)`.
    pub longitude: Degree,
    /// Ecliptic latitude, degrees.
    pub latitude: Degree,
    /// Geocentric distance in Earth radii.
    pub distance: EarthRadii,
    /// Equatorial position of date, distance in AU.
    pub equatorial: BodyPosition,
}

/// Fundamental arguments of the lunar theory, in degrees, after the periodic corrections.
struct Arguments {
    t: f64,
    lpr: f64,
    m: f64,
    mpr: f64,
    d: f64,
    f: f64,
    om: f64,
    e: f64,
}

impl Arguments {
    fn at(jd_tt: JulianDate) -> Self {
        let t = (jd_tt - J1900) / 36525.0;
        let tsq = t * t;
        let tcb = tsq * t;

        let mut lpr = (270.434164 + 481267.8831 * t - 0.001133 * tsq + 0.0000019 * tcb) % 360.0;
        let mut m = (358.475833 + 35999.0498 * t - 0.000150 * tsq - 0.0000033 * tcb) % 360.0;
        let mut mpr = (296.104608 + 477198.8491 * t + 0.009192 * tsq + 0.0000144 * tcb) % 360.0;
        let mut d = (350.737486 + 445267.1142 * t - 0.001436 * tsq + 0.0000019 * tcb) % 360.0;
        let mut f = (11.250889 + 483202.0251 * t - 0.003211 * tsq - 0.0000003 * tcb) % 360.0;
        let om = (259.183275 - 1934.1420 * t + 0.002078 * tsq + 0.0000022 * tcb) % 360.0;

        let sinx = ((51.2 + 20.2 * t) / DEG_IN_RADIAN).sin();
        lpr += 0.000233 * sinx;
        m -= 0.001778 * sinx;
        mpr += 0.000817 * sinx;
        d += 0.002011 * sinx;

        // great Venus term
        let sinx = 0.003964 * ((346.560 + 132.870 * t - 0.0091731 * tsq) / DEG_IN_RADIAN).sin();
        lpr += sinx;
        mpr += sinx;
        d += sinx;
        f += sinx;

        let sinx = (om / DEG_IN_RADIAN).sin();
        lpr += 0.001964 * sinx;
        mpr += 0.002541 * sinx;
        d += 0.001964 * sinx;
        f -= 0.024691 * sinx;
        f -= 0.004328 * ((om + 275.05 - 2.30 * t) / DEG_IN_RADIAN).sin();

        Arguments {
            t,
            lpr,
            m,
            mpr,
            d,
            f,
            om,
            e: 1.0 - 0.002495 * t - 0.00000752 * tsq,
        }
    }
}

/// Ecliptic longitude, latitude (degrees) and horizontal parallax (degrees).
fn lunar_series(jd_tt: JulianDate) -> (Degree, Degree, Degree) {
    let args = Arguments::at(jd_tt);
    let Arguments { t, e, om, .. } = args;
    let m = args.m / DEG_IN_RADIAN;
    let mpr = args.mpr / DEG_IN_RADIAN;
    let d = args.d / DEG_IN_RADIAN;
    let f = args.f / DEG_IN_RADIAN;
    let e2 = e * e;

    let lambda = args.lpr
        + 6.288750 * mpr.sin()
        + 1.274018 * (2.0 * d - mpr).sin()
        + 0.658309 * (2.0 * d).sin()
        + 0.213616 * (2.0 * mpr).sin()
        - e * 0.185596 * m.sin()
        - 0.114336 * (2.0 * f).sin()
        + 0.058793 * (2.0 * d - 2.0 * mpr).sin()
        + e * 0.057212 * (2.0 * d - m - mpr).sin()
        + 0.053320 * (2.0 * d + mpr).sin()
        + e * 0.045874 * (2.0 * d - m).sin()
        + e * 0.041024 * (mpr - m).sin()
        - 0.034718 * d.sin()
        - e * 0.030465 * (m + mpr).sin()
        + 0.015326 * (2.0 * d - 2.0 * f).sin()
        - 0.012528 * (2.0 * f + mpr).sin()
        - 0.010980 * (2.0 * f - mpr).sin()
        + 0.010674 * (4.0 * d - mpr).sin()
        + 0.010034 * (3.0 * mpr).sin()
        + 0.008548 * (4.0 * d - 2.0 * mpr).sin()
        - e * 0.007910 * (m - mpr + 2.0 * d).sin()
        - e * 0.006783 * (2.0 * d + m).sin()
        + 0.005162 * (mpr - d).sin()
        + e * 0.005000 * (m + d).sin()
        + e * 0.004049 * (mpr - m + 2.0 * d).sin()
        + 0.003996 * (2.0 * mpr + 2.0 * d).sin()
        + 0.003862 * (4.0 * d).sin()
        + 0.003665 * (2.0 * d - 3.0 * mpr).sin()
        + e * 0.002695 * (2.0 * mpr - m).sin()
        + 0.002602 * (mpr - 2.0 * f - 2.0 * d).sin()
        + e * 0.002396 * (2.0 * d - m - 2.0 * mpr).sin()
        - 0.002349 * (mpr + d).sin()
        + e2 * 0.002249 * (2.0 * d - 2.0 * m).sin()
        - e * 0.002125 * (2.0 * mpr + m).sin()
        - e2 * 0.002079 * (2.0 * m).sin()
        + e2 * 0.002059 * (2.0 * d - mpr - 2.0 * m).sin()
        - 0.001773 * (mpr + 2.0 * d - 2.0 * f).sin()
        - 0.001595 * (2.0 * f + 2.0 * d).sin()
        + e * 0.001220 * (4.0 * d - m - mpr).sin()
        - 0.001110 * (2.0 * mpr + 2.0 * f).sin()
        + 0.000892 * (mpr - 3.0 * d).sin()
        - e * 0.000811 * (m + mpr + 2.0 * d).sin()
        + e * 0.000761 * (4.0 * d - m - 2.0 * mpr).sin()
        + e2 * 0.000717 * (mpr - 2.0 * m).sin()
        + e2 * 0.000704 * (mpr - 2.0 * m - 2.0 * d).sin()
        + e * 0.000693 * (m - 2.0 * mpr + 2.0 * d).sin()
        + e * 0.000598 * (2.0 * d - m - 2.0 * f).sin()
        + 0.000550 * (mpr + 4.0 * d).sin()
        + 0.000538 * (4.0 * mpr).sin()
        + e * 0.000521 * (4.0 * d - m).sin()
        + 0.000486 * (2.0 * mpr - d).sin();

    let b = 5.128189 * f.sin()
        + 0.280606 * (mpr + f).sin()
        + 0.277693 * (mpr - f).sin()
        + 0.173238 * (2.0 * d - f).sin()
        + 0.055413 * (2.0 * d + f - mpr).sin()
        + 0.046272 * (2.0 * d - f - mpr).sin()
        + 0.032573 * (2.0 * d + f).sin()
        + 0.017198 * (2.0 * mpr + f).sin()
        + 0.009267 * (2.0 * d + mpr - f).sin()
        + 0.008823 * (2.0 * mpr - f).sin()
        + e * 0.008247 * (2.0 * d - m - f).sin()
        + 0.004323 * (2.0 * d - f - 2.0 * mpr).sin()
        + 0.004200 * (2.0 * d + f + mpr).sin()
        + e * 0.003372 * (f - m - 2.0 * d).sin()
        + 0.002472 * (2.0 * d + f - m - mpr).sin()
        + e * 0.002222 * (2.0 * d + f - m).sin()
        + e * 0.002072 * (2.0 * d - f - m - mpr).sin()
        + e * 0.001877 * (f - m + mpr).sin()
        + 0.001828 * (4.0 * d - f - mpr).sin()
        - e * 0.001803 * (f + m).sin()
        - 0.001750 * (3.0 * f).sin()
        + e * 0.001570 * (mpr - m - f).sin()
        - 0.001487 * (f + d).sin()
        - e * 0.001481 * (f + m + mpr).sin()
        + e * 0.001417 * (f - m - mpr).sin()
        + e * 0.001350 * (f - m).sin()
        + 0.001330 * (f - d).sin()
        + 0.001106 * (f + 3.0 * mpr).sin()
        + 0.001020 * (4.0 * d - f).sin()
        + 0.000833 * (f + 4.0 * d - mpr).sin()
        + 0.000781 * (mpr - 3.0 * f).sin()
        + 0.000670 * (f + 4.0 * d - 2.0 * mpr).sin()
        + 0.000606 * (2.0 * d - 3.0 * f).sin()
        + 0.000597 * (2.0 * d + 2.0 * mpr - f).sin()
        + e * 0.000492 * (2.0 * d + mpr - m - f).sin()
        + 0.000450 * (2.0 * mpr - f - 2.0 * d).sin()
        + 0.000439 * (3.0 * mpr - f).sin()
        + 0.000423 * (f + 2.0 * d + 2.0 * mpr).sin()
        + 0.000422 * (2.0 * d - f - 3.0 * mpr).sin()
        - e * 0.000367 * (m + f + 2.0 * d - mpr).sin()
        - e * 0.000353 * (m + f + 2.0 * d).sin()
        + 0.000331 * (f + 4.0 * d).sin()
        + e * 0.000317 * (2.0 * d + f - m + mpr).sin()
        + e2 * 0.000306 * (2.0 * d - 2.0 * m - f).sin()
        - 0.000283 * (mpr + 3.0 * f).sin();

    let om1 = 0.0004664 * (om / DEG_IN_RADIAN).cos();
    let om2 = 0.0000754 * ((om + 275.05 - 2.30 * t) / DEG_IN_RADIAN).cos();
    let beta = b * (1.0 - om1 - om2);

    let pie = 0.950724
        + 0.051818 * mpr.cos()
        + 0.009531 * (2.0 * d - mpr).cos()
        + 0.007843 * (2.0 * d).cos()
        + 0.002824 * (2.0 * mpr).cos()
        + 0.000857 * (2.0 * d + mpr).cos()
        + e * 0.000533 * (2.0 * d - m).cos()
        + e * 0.000401 * (2.0 * d - m - mpr).cos()
        + e * 0.000320 * (mpr - m).cos()
        - 0.000271 * d.cos()
        - e * 0.000264 * (m + mpr).cos()
        - 0.000198 * (2.0 * f - mpr).cos()
        + 0.000173 * (3.0 * mpr).cos()
        + 0.000167 * (4.0 * d - mpr).cos()
        - e * 0.000111 * m.cos()
        + 0.000103 * (4.0 * d - 2.0 * mpr).cos()
        - 0.000084 * (2.0 * mpr - 2.0 * d).cos()
        - e * 0.000083 * (2.0 * d + m).cos()
        + 0.000079 * (2.0 * d + 2.0 * mpr).cos()
        + 0.000072 * (4.0 * d).cos()
        + e * 0.000064 * (2.0 * d - m + mpr).cos()
        - e * 0.000063 * (2.0 * d + m - mpr).cos()
        + e * 0.000041 * (m + d).cos()
        + e * 0.000035 * (2.0 * mpr - m).cos()
        - 0.000033 * (3.0 * mpr - 2.0 * d).cos()
        - 0.000030 * (mpr + d).cos()
        - 0.000029 * (2.0 * f - 2.0 * d).cos()
        - e * 0.000029 * (2.0 * mpr + m).cos()
        + e2 * 0.000026 * (2.0 * d - 2.0 * m).cos()
        - 0.000023 * (2.0 * f - 2.0 * d + mpr).cos()
        + e * 0.000019 * (4.0 * d - m - mpr).cos();

    (lambda.rem_euclid(360.0), beta, pie)
}

/// Geocentric Moon at dynamical time `jd_tt`.
pub fn moon_position_tt(jd_tt: JulianDate) -> MoonPosition {
    let (longitude, latitude, parallax) = lunar_series(jd_tt);
    let distance = 1.0 / (parallax / DEG_IN_RADIAN).sin();

    let lambda = longitude / DEG_IN_RADIAN;
    let beta = latitude / DEG_IN_RADIAN;
    let ecliptic = Vector3::new(
        lambda.cos() * beta.cos(),
        lambda.sin() * beta.cos(),
        beta.sin(),
    );
    let equatorial = ecliptic_to_equatorial(jd_tt, &ecliptic) * (distance / EARTHRAD_IN_AU);

    MoonPosition {
        longitude,
        latitude,
        distance,
        equatorial: BodyPosition::from_xyz(equatorial),
    }
}

/// Geocentric Moon at UT Julian Date `jd`.
pub fn moon_position(jd: JulianDate) -> MoonPosition {
    moon_position_tt(jd + etcorr(jd) / SECONDS_PER_DAY)
}

/// Topocentric Moon seen from latitude `lat` (degrees) and elevation `height` (meters) when the
/// local sidereal time is `sidereal` hours.
pub fn moon_topocentric(jd: JulianDate, lat: Degree, height: f64, sidereal: f64) -> BodyPosition {
    let geo = moon_position(jd).equatorial;
    let (ra, dec, distance) = topocorr(geo.ra, geo.dec, geo.distance, lat, height, sidereal);
    BodyPosition::from_xyz(cel_unit_xyz(ra, dec) * distance)
}

/// The four principal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoonPhase {
    New = 0,
    FirstQuarter = 1,
    Full = 2,
    LastQuarter = 3,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 4] = [
        MoonPhase::New,
        MoonPhase::FirstQuarter,
        MoonPhase::Full,
        MoonPhase::LastQuarter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MoonPhase::New => "new moon",
            MoonPhase::FirstQuarter => "first quarter",
            MoonPhase::Full => "full moon",
            MoonPhase::LastQuarter => "last quarter",
        }
    }
}

/// Julian Date of `phase` in lunation `n`, good to about two minutes.
///
/// Arguments
/// ---------
/// * `n`: lunation number, 0 being the new moon of 1900 January 0.
/// * `phase`: which quarter of the lunation.
///
/// # References
/// * Meeus, *Astronomical Formulae for Calculators*, 2nd ed., ch. 32.
pub fn flmoon(n: i32, phase: MoonPhase) -> JulianDate {
    let lun = n as f64 + phase as i32 as f64 / 4.0;
    let t = lun / 1236.85;
    let tsq = t * t;
    let tcb = tsq * t;

    let jd = 2415020.75933 + 29.53058868 * lun + 0.0001178 * tsq - 0.000000155 * tcb
        + 0.00033 * ((166.56 + 132.87 * t - 0.009173 * tsq) / DEG_IN_RADIAN).sin();

    let m = (359.2242 + 29.10535608 * lun - 0.0000333 * tsq - 0.00000347 * tcb) / DEG_IN_RADIAN;
    let mpr =
        (306.0253 + 385.81691806 * lun + 0.0107306 * tsq + 0.00001236 * tcb) / DEG_IN_RADIAN;
    let f = (21.2964 + 390.67050646 * lun - 0.0016528 * tsq - 0.00000239 * tcb) / DEG_IN_RADIAN;

    let cor = match phase {
        MoonPhase::New | MoonPhase::Full => {
            (0.1734 - 0.000393 * t) * m.sin() + 0.0021 * (2.0 * m).sin()
                - 0.4068 * mpr.sin()
                + 0.0161 * (2.0 * mpr).sin()
                - 0.0004 * (3.0 * mpr).sin()
                + 0.0104 * (2.0 * f).sin()
                - 0.0051 * (m + mpr).sin()
                - 0.0074 * (m - mpr).sin()
                + 0.0004 * (2.0 * f + m).sin()
                - 0.0004 * (2.0 * f - m).sin()
                - 0.0006 * (2.0 * f + mpr).sin()
                + 0.0010 * (2.0 * f - mpr).sin()
                + 0.0005 * (m + 2.0 * mpr).sin()
        }
        MoonPhase::FirstQuarter | MoonPhase::LastQuarter => {
            let quarter = (0.1721 - 0.0004 * t) * m.sin() + 0.0021 * (2.0 * m).sin()
                - 0.6280 * mpr.sin()
                + 0.0089 * (2.0 * mpr).sin()
                - 0.0004 * (3.0 * mpr).sin()
                + 0.0079 * (2.0 * f).sin()
                - 0.0119 * (m + mpr).sin()
                - 0.0047 * (m - mpr).sin()
                + 0.0003 * (2.0 * f + m).sin()
                - 0.0004 * (2.0 * f - m).sin()
                - 0.0006 * (2.0 * f + mpr).sin()
                + 0.0021 * (2.0 * f - mpr).sin()
                + 0.0003 * (m + 2.0 * mpr).sin()
                + 0.0004 * (m - 2.0 * mpr).sin()
                - 0.0003 * (2.0 * m + mpr).sin();
            let w = 0.0028 - 0.0004 * m.cos() + 0.0003 * mpr.cos();
            if phase == MoonPhase::FirstQuarter {
                quarter + w
            } else {
                quarter - w
            }
        }
    };

    jd + cor
}

/// Result of [`lunation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lunation {
    /// Number of the lunation whose new moon most recently preceded the date.
    pub number: i32,
    /// `false` when the search stopped at its iteration cap.
    pub converged: bool,
}

/// The lunation in progress at `jd`.
///
/// The guess from the mean synodic month is never late; new moons are then stepped
/// forward until the next one falls after `jd`, so that
/// `flmoon(n, New) <= jd < flmoon(n + 1, New)`. After 40 steps the search gives up, logs a
/// warning and reports `converged == false`.
pub fn lunation(jd: JulianDate) -> Lunation {
    let mut nlast = ((jd - 2_415_020.5) / 29.5307).floor() as i32;
    let mut newjd = flmoon(nlast, MoonPhase::New);

    let mut kount = 0;
    while newjd <= jd && kount < LUNATION_SEARCH_CAP {
        nlast += 1;
        kount += 1;
        newjd = flmoon(nlast, MoonPhase::New);
    }

    let converged = newjd > jd;
    if !converged {
        log::warn!("lunation search for JD {jd} stopped after {kount} steps");
    }
    Lunation {
        number: nlast - 1,
        converged,
    }
}

/// Age of the Moon in 56ths of a synodic month: 0 at new moon, 28 at full.
pub fn phase_index(jd: JulianDate) -> u32 {
    let n = lunation(jd).number;
    let age = jd - flmoon(n, MoonPhase::New);
    (age / (SYNODIC_MONTH / 56.0)).floor().clamp(0.0, 55.0) as u32
}

/// Human-readable phase relative to the nearest principal phase, e.g.
/// `"2.3 days before full moon"`.
pub fn phase_description(jd: JulianDate) -> String {
    let n = lunation(jd).number;
    let age = jd - flmoon(n, MoonPhase::New);
    let noctiles = (age / (SYNODIC_MONTH / 8.0)).floor() as i32;

    let relative = |phase: MoonPhase| {
        let x = jd - flmoon(n, phase);
        if x < 0.0 {
            format!("{:.1} days before {}", -x, phase.label())
        } else {
            format!("{:.1} days after {}", x, phase.label())
        }
    };

    match noctiles {
        i32::MIN..=0 => format!("{age:.1} days since new moon"),
        1..=2 => relative(MoonPhase::FirstQuarter),
        3..=4 => relative(MoonPhase::Full),
        5..=6 => relative(MoonPhase::LastQuarter),
        _ => {
            let x = flmoon(n + 1, MoonPhase::New) - jd;
            format!("{x:.1} days before new moon")
        }
    }
}

/// Illuminated fraction of the lunar disk for a Moon–Sun elongation in radians.
pub fn illuminated_fraction(elongation: Radian) -> f64 {
    0.5 * (1.0 - elongation.cos())
}
