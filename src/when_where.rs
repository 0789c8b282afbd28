//! # Observing circumstances
//!
//! [`WhenWhere`] binds an [`Instant`] to a [`Site`] and derives everything that depends only on
//! those two: local sidereal time, the geocentric and topocentric Sun and Moon with their hour
//! angles and horizon coordinates, the Moon's elongation and illuminated fraction, and the
//! twilight brightening of the sky.
//!
//! A `WhenWhere` is an immutable value. All derived quantities are computed together in the
//! constructor; moving to another time returns a new value and leaves the original untouched.

use std::fmt;
use std::sync::Arc;

use crate::angles::BoundedAngle;
use crate::constants::{Degree, Hour, JulianDate, DEG_IN_RADIAN, EARTHRAD_IN_AU};
use crate::ephemeris::moon::{illuminated_fraction, moon_position, phase_description, MoonPosition};
use crate::ephemeris::sun::sun_position;
use crate::ephemeris::BodyPosition;
use crate::horizon::{altit, topocorr, AltAz};
use crate::instant::Instant;
use crate::site::Site;
use crate::sky_brightness::twilight_brightening;
use crate::ref_system::cel_unit_xyz;
use crate::time::lst;

/// A body seen from the site: geocentric and topocentric positions, hour angle and horizon
/// coordinates (from the topocentric position).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteView {
    pub geocentric: BodyPosition,
    pub topocentric: BodyPosition,
    /// Hour angle in hours, in `(-12, 12]`.
    pub hour_angle: Hour,
    pub altaz: AltAz,
}

impl SiteView {
    fn new(geocentric: BodyPosition, site: &Site, sidereal: Hour) -> Self {
        let lat = site.latitude();
        let (ra, dec, distance) = topocorr(
            geocentric.ra,
            geocentric.dec,
            geocentric.distance,
            lat,
            site.elevation_sea(),
            sidereal,
        );
        let topocentric = BodyPosition::from_xyz(cel_unit_xyz(ra, dec) * distance);
        let hour_angle = BoundedAngle::hour_angle(sidereal - ra).value();
        SiteView {
            geocentric,
            topocentric,
            hour_angle,
            altaz: altit(dec, hour_angle, lat),
        }
    }

    pub fn altitude(&self) -> Degree {
        self.altaz.altitude
    }
}

/// Time, place, and the Sun and Moon as seen from there.
#[derive(Debug, Clone)]
pub struct WhenWhere {
    when: Instant,
    site: Arc<Site>,
    sidereal: Hour,
    sun: SiteView,
    moon: SiteView,
    moon_ecliptic: MoonPosition,
    elongation: Degree,
    twilight: Option<f64>,
}

impl WhenWhere {
    /// Circumstances at `when` for an observer at `site`.
    ///
    /// Arguments
    /// ---------
    /// * `when`: the instant; its zone is normally the site's zone.
    /// * `site`: the site, shared between the values derived from it.
    pub fn new(when: Instant, site: impl Into<Arc<Site>>) -> Self {
        let site = site.into();
        let jd = when.jd();
        let sidereal = lst(jd, site.longitude());

        let sun = SiteView::new(sun_position(jd), &site, sidereal);
        let moon_ecliptic = moon_position(jd);
        let moon = SiteView::new(moon_ecliptic.equatorial, &site, sidereal);

        let elongation = sun.topocentric.xyz.angle(&moon.topocentric.xyz) * DEG_IN_RADIAN;
        let twilight = twilight_brightening(sun.altitude());

        WhenWhere {
            when,
            site,
            sidereal,
            sun,
            moon,
            moon_ecliptic,
            elongation,
            twilight,
        }
    }

    /// Same site at another instant.
    pub fn with_instant(&self, when: Instant) -> Self {
        WhenWhere::new(when, Arc::clone(&self.site))
    }

    /// Same site at UT Julian Date `jd`.
    pub fn with_jd(&self, jd: JulianDate) -> Self {
        self.with_instant(self.when.with_jd(jd))
    }

    pub fn advanced_by_hours(&self, hours: Hour) -> Self {
        self.with_instant(self.when.advanced_by_hours(hours))
    }

    pub fn advanced_by_days(&self, days: f64) -> Self {
        self.with_instant(self.when.advanced_by_days(days))
    }

    pub fn when(&self) -> &Instant {
        &self.when
    }

    pub fn jd(&self) -> JulianDate {
        self.when.jd()
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub(crate) fn shared_site(&self) -> Arc<Site> {
        Arc::clone(&self.site)
    }

    /// Local mean sidereal time in hours.
    pub fn sidereal(&self) -> Hour {
        self.sidereal
    }

    pub fn sun(&self) -> &SiteView {
        &self.sun
    }

    pub fn moon(&self) -> &SiteView {
        &self.moon
    }

    /// Geocentric ecliptic longitude, latitude and distance (Earth radii) of the Moon.
    pub fn moon_ecliptic(&self) -> &MoonPosition {
        &self.moon_ecliptic
    }

    /// Topocentric Moon–Sun elongation in degrees.
    pub fn moon_elongation(&self) -> Degree {
        self.elongation
    }

    /// Topocentric distance of the Moon in Earth radii.
    pub fn moon_distance(&self) -> f64 {
        self.moon.topocentric.distance * EARTHRAD_IN_AU
    }

    /// Illuminated fraction of the lunar disk.
    pub fn moon_illumination(&self) -> f64 {
        illuminated_fraction(self.elongation / DEG_IN_RADIAN)
    }

    /// "3.2 days after first quarter" and the like.
    pub fn moon_phase(&self) -> String {
        phase_description(self.jd())
    }

    /// Zenith twilight brightening in blue magnitudes; `None` in daylight.
    pub fn twilight(&self) -> Option<f64> {
        self.twilight
    }
}

impl fmt::Display for WhenWhere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.when, self.site.name())?;
        writeln!(
            f,
            "Sidereal {}",
            BoundedAngle::ra(self.sidereal).rounded_string(0, ":")
        )?;
        writeln!(
            f,
            "Sun  alt {:6.2} az {:6.2}  HA {}",
            self.sun.altaz.altitude,
            self.sun.altaz.azimuth,
            BoundedAngle::hour_angle(self.sun.hour_angle).rounded_string(-1, ":")
        )?;
        writeln!(
            f,
            "Moon alt {:6.2} az {:6.2}  HA {}  illum {:.3}  ({})",
            self.moon.altaz.altitude,
            self.moon.altaz.azimuth,
            BoundedAngle::hour_angle(self.moon.hour_angle).rounded_string(-1, ":"),
            self.moon_illumination(),
            self.moon_phase()
        )?;
        match self.twilight {
            None => write!(f, "Daytime"),
            Some(mag) if mag > 0.0 => write!(f, "Twilight {mag:.1} mag (blue)"),
            Some(_) => write!(f, "Night"),
        }
    }
}
