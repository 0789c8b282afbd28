use crate::constants::{Hour, JulianDate, J2000};

/// Local mean sidereal time.
///
/// Arguments
/// ---------
/// * `jd`: Julian Date (UT).
/// * `longitude`: site longitude in **hours west** of Greenwich.
///
/// Returns
/// --------
/// * Local mean sidereal time in hours, in `[0, 24)`.
///
/// # Details
/// The Greenwich mean sidereal time at the preceding 0h UT is obtained from the IAU 1982
/// cubic (coefficients C0–C3, in seconds), the elapsed UT is scaled by the sidereal
/// rate `RAP`, and the west longitude is subtracted.
///
/// # References
/// * IAU 1982, Explanatory Supplement to the Astronomical Almanac (1992).
pub fn lst(jd: JulianDate, longitude: Hour) -> Hour {
    // Polynomial coefficients for GMST at 0h UT (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.0027379093;

    let jdint = jd.floor();
    let frac = jd - jdint;
    let (jdmid, ut) = if frac < 0.5 {
        (jdint - 0.5, frac + 0.5)
    } else {
        (jdint + 0.5, frac - 0.5)
    };

    let t = (jdmid - J2000) / 36525.0;
    let sid_g = ((((C3 * t + C2) * t + C1) * t + C0) / 86400.0).fract();

    let sid = (sid_g + RAP * ut - longitude / 24.0).fract() * 24.0;
    if sid < 0.0 {
        sid + 24.0
    } else {
        sid
    }
}

/// Tabulated ΔT = TT − UT (seconds) at 5-year steps from 1900, then 2000 and 2004.
const DELTA_T_YEARS: [f64; 22] = [
    1900.0, 1905.0, 1910.0, 1915.0, 1920.0, 1925.0, 1930.0, 1935.0, 1940.0, 1945.0, 1950.0,
    1955.0, 1960.0, 1965.0, 1970.0, 1975.0, 1980.0, 1985.0, 1990.0, 1995.0, 2000.0, 2004.0,
];

const DELTA_T_SECONDS: [f64; 22] = [
    -2.72, 3.86, 10.46, 17.20, 21.16, 23.62, 24.02, 23.93, 24.33, 26.77, 29.15, 31.07, 33.15,
    35.73, 40.18, 45.48, 50.54, 54.34, 56.86, 60.78, 63.83, 64.57,
];

/// ΔT (TT − UT) in seconds.
///
/// Linear interpolation in the table between 1900 and 2004, the last table segment extended
/// linearly after 2004, and zero before 1900.
pub fn etcorr(jd: JulianDate) -> f64 {
    let year = 1900.0 + (jd - 2_415_019.5) / 365.25;

    if year < 1900.0 {
        return 0.0;
    }

    let last = DELTA_T_YEARS.len() - 1;
    let i = if year >= DELTA_T_YEARS[last - 1] {
        last - 1
    } else {
        ((year - 1900.0) / 5.0) as usize
    };

    let slope =
        (DELTA_T_SECONDS[i + 1] - DELTA_T_SECONDS[i]) / (DELTA_T_YEARS[i + 1] - DELTA_T_YEARS[i]);
    DELTA_T_SECONDS[i] + slope * (year - DELTA_T_YEARS[i])
}

/// Julian epoch (decimal year) of a Julian Date, used as the equinox of date.
pub fn julian_epoch(jd: JulianDate) -> f64 {
    2000.0 + (jd - J2000) / 365.25
}
