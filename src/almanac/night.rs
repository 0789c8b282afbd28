//! One night's almanac and the time a target spends high enough in darkness.
//!
//! The night is identified by its central local midnight: the following midnight for an instant
//! after local noon, the preceding one otherwise. Every event is first estimated from the hour
//! angle at which the body reaches the altitude (positions taken at midnight), then refined by
//! the altitude solver of [`super::crossing`].

use std::fmt;
use std::sync::Arc;

use crate::angles::adj_time;
use crate::calendar::{CalendarDate, DateStyle};
use crate::constants::{Degree, Hour, JulianDate, SID_RATE};
use crate::ephemeris::moon::moon_position;
use crate::ephemeris::sun::sun_position;
use crate::horizon::{ha_alt, HourAngleAtAltitude};
use crate::instant::Instant;
use crate::site::Site;
use crate::time::lst;
use crate::when_where::WhenWhere;

use super::crossing::{jd_moon_alt, jd_sun_alt, Crossing};
use super::AlmanacParams;

/// Mean interval between successive moonrises, days.
const LUNAR_DAY: f64 = 1.035;

/// UT Julian Date of the local midnight at the center of the night containing `when`.
pub fn local_midnight(when: &Instant) -> JulianDate {
    let local = when.jd() - when.offset_hours() / 24.0;
    let mut midnight = (local + 0.5).floor() - 0.5;
    if local - midnight >= 0.5 {
        midnight += 1.0;
    }
    Instant::from_local_date(&CalendarDate::from_julian(midnight), when.zone()).jd()
}

/// Estimated setting and rising times from an hour angle at midnight.
fn guesses(midnight: JulianDate, sidereal: Hour, ra: Hour, ha: Hour) -> (JulianDate, JulianDate) {
    (
        midnight + adj_time(ra + ha - sidereal) / 24.0,
        midnight + adj_time(ra - ha - sidereal) / 24.0,
    )
}

fn sun_events(midnight: JulianDate, site: &Site, alt: Degree) -> (Crossing, Crossing) {
    let sidereal = lst(midnight, site.longitude());
    let sun = sun_position(midnight);
    match ha_alt(sun.dec, site.latitude(), alt) {
        HourAngleAtAltitude::AlwaysAbove => (Crossing::AlwaysAbove, Crossing::AlwaysAbove),
        HourAngleAtAltitude::AlwaysBelow => (Crossing::NeverAbove, Crossing::NeverAbove),
        HourAngleAtAltitude::Crossing(ha) => {
            let (set, rise) = guesses(midnight, sidereal, sun.ra, ha);
            (
                Crossing::from_solution(jd_sun_alt(alt, set, site), "sun setting"),
                Crossing::from_solution(jd_sun_alt(alt, rise, site), "sun rising"),
            )
        }
    }
}

/// Solve for a moon event; a solution more than half a day from midnight belongs to another
/// night, so the search is repeated one lunar day later or earlier.
fn moon_event(midnight: JulianDate, site: &Site, alt: Degree, guess: JulianDate, what: &str) -> Crossing {
    let mut solution = jd_moon_alt(alt, guess, site);
    if let Ok(jd) = solution {
        if jd < midnight - 0.5 {
            solution = jd_moon_alt(alt, guess + LUNAR_DAY, site);
        } else if jd > midnight + 0.5 {
            solution = jd_moon_alt(alt, guess - LUNAR_DAY, site);
        }
    }
    Crossing::from_solution(solution, what)
}

fn moon_events(midnight: JulianDate, site: &Site, alt: Degree) -> (Crossing, Crossing) {
    let sidereal = lst(midnight, site.longitude());
    let moon = moon_position(midnight).equatorial;
    match ha_alt(moon.dec, site.latitude(), alt) {
        HourAngleAtAltitude::AlwaysAbove => (Crossing::AlwaysAbove, Crossing::AlwaysAbove),
        HourAngleAtAltitude::AlwaysBelow => (Crossing::NeverAbove, Crossing::NeverAbove),
        HourAngleAtAltitude::Crossing(ha) => {
            let (set, rise) = guesses(midnight, sidereal, moon.ra, ha);
            (
                moon_event(midnight, site, alt, set, "moonset"),
                moon_event(midnight, site, alt, rise, "moonrise"),
            )
        }
    }
}

/// Sun and Moon events of one night.
#[derive(Debug, Clone)]
pub struct NightlyAlmanac {
    reference: Instant,
    site: Arc<Site>,
    midnight: JulianDate,
    pub sunset: Crossing,
    pub sunrise: Crossing,
    pub evening_twilight: Crossing,
    pub morning_twilight: Crossing,
    pub moonrise: Crossing,
    pub moonset: Crossing,
}

impl NightlyAlmanac {
    /// Almanac of the night containing the instant of `ww`.
    ///
    /// Arguments
    /// ---------
    /// * `ww`: instant and site.
    /// * `params`: rise/set and twilight altitudes. The rise/set altitude is lowered by the
    ///   site's horizon dip.
    pub fn new(ww: &WhenWhere, params: &AlmanacParams) -> Self {
        let site = ww.shared_site();
        let midnight = local_midnight(ww.when());
        let horizon = params.rise_set_altitude - site.horizon_dip();

        let (sunset, sunrise) = sun_events(midnight, &site, horizon);
        let (evening_twilight, morning_twilight) =
            sun_events(midnight, &site, params.twilight_altitude);
        let (moonset, moonrise) = moon_events(midnight, &site, horizon);

        NightlyAlmanac {
            reference: *ww.when(),
            site,
            midnight,
            sunset,
            sunrise,
            evening_twilight,
            morning_twilight,
            moonrise,
            moonset,
        }
    }

    /// UT Julian Date of the local midnight.
    pub fn midnight(&self) -> JulianDate {
        self.midnight
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// The instant the almanac was requested for; its zone gives the local times.
    pub fn reference(&self) -> &Instant {
        &self.reference
    }

    /// Start and end of full darkness.
    ///
    /// Returns
    /// --------
    /// * The evening and morning twilight times; the whole day around midnight when the Sun stays
    ///   below the twilight altitude; `None` when it stays above it or a twilight search failed.
    pub fn dark_window(&self) -> Option<(JulianDate, JulianDate)> {
        match (self.evening_twilight, self.morning_twilight) {
            (Crossing::At(evening), Crossing::At(morning)) => Some((evening, morning)),
            (Crossing::NeverAbove, Crossing::NeverAbove) => {
                Some((self.midnight - 0.5, self.midnight + 0.5))
            }
            _ => None,
        }
    }

    /// Hours of darkness during which a target is above `altitude`.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: target position of date, hours and degrees.
    /// * `altitude`: critical altitude, degrees.
    ///
    /// Remarks
    /// -------
    /// The target's passages above `altitude` are the intervals centred on its transits, one
    /// sidereal day apart. The transit nearest midnight and its two neighbours are intersected
    /// with the dark window, so that an object setting after evening twilight and rising again
    /// before morning is counted twice.
    pub fn hours_above(&self, ra: Hour, dec: Degree, altitude: Degree) -> f64 {
        let Some((evening, morning)) = self.dark_window() else {
            return 0.0;
        };

        match ha_alt(dec, self.site.latitude(), altitude) {
            HourAngleAtAltitude::AlwaysAbove => (morning - evening) * 24.0,
            HourAngleAtAltitude::AlwaysBelow => 0.0,
            HourAngleAtAltitude::Crossing(ha) => {
                let sidereal_day = 1.0 / SID_RATE;
                let sidereal = lst(self.midnight, self.site.longitude());
                let transit = self.midnight + adj_time(ra - sidereal) / 24.0 * sidereal_day;
                let half = ha / 24.0 * sidereal_day;

                (-1..=1)
                    .map(|k| {
                        let center = transit + k as f64 * sidereal_day;
                        let up = (center - half).max(evening);
                        let down = (center + half).min(morning);
                        (down - up).max(0.0)
                    })
                    .sum::<f64>()
                    * 24.0
            }
        }
    }
}

impl fmt::Display for NightlyAlmanac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = |c: &Crossing| c.local_time(&self.reference);
        writeln!(
            f,
            "Night of {} at {}",
            self.reference
                .with_jd(self.midnight - 0.5)
                .local_date()
                .format(DateStyle::DayOfWeekDateOnly, 0),
            self.site.name()
        )?;
        writeln!(f, "  Sunset            {}", local(&self.sunset))?;
        writeln!(f, "  Twilight ends     {}", local(&self.evening_twilight))?;
        writeln!(
            f,
            "  Night center      {}",
            local(&Crossing::At(self.midnight))
        )?;
        writeln!(f, "  Twilight begins   {}", local(&self.morning_twilight))?;
        writeln!(f, "  Sunrise           {}", local(&self.sunrise))?;
        writeln!(f, "  Moonrise          {}", local(&self.moonrise))?;
        write!(f, "  Moonset           {}", local(&self.moonset))
    }
}
