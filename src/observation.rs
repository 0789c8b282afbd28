//! # Observation of a target
//!
//! An [`Observation`] is a target seen under a [`WhenWhere`]: its position of date, hour angle,
//! horizon coordinates and airmass, the barycentric and heliocentric corrections, its distance
//! to the Sun and the Moon, and the sky brightness contributed by moonlight.
//!
//! Like `WhenWhere`, an observation is an immutable value. [`Observation::advanced_by_hours`]
//! and [`Observation::hourly_table`] build new, independent observations.

use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::almanac::AlmanacParams;
use crate::angles::BoundedAngle;
use crate::calendar::DateStyle;
use crate::celest::Celest;
use crate::constants::{Degree, Hour, Planet, DEG_IN_RADIAN};
use crate::constellation::constellation_of;
use crate::ephemeris::barycentric::{time_correction, Frame, TimeCorrection};
use crate::ephemeris::planets::PlanetElements;
use crate::horizon::{altit, true_airmass, AltAz};
use crate::sky_brightness::{lunar_sky_brightness, MoonlightGeometry};
use crate::time::julian_epoch;
use crate::when_where::WhenWhere;

/// Sun altitude above which no moonlight sky brightness is reported, degrees.
pub const SKY_BRIGHTNESS_SUN_LIMIT: Degree = -12.0;

/// A target observed at a time and place.
#[derive(Debug, Clone)]
pub struct Observation {
    ww: WhenWhere,
    target: Celest,
    current: Celest,
    hour_angle: Hour,
    altaz: AltAz,
    airmass: Option<f64>,
    barycentric: TimeCorrection,
    heliocentric: TimeCorrection,
    sun_separation: Degree,
    moon_separation: Degree,
    sky_brightness: Option<f64>,
    extinction: f64,
}

impl Observation {
    /// Observe `target` under `ww` with the default extinction coefficient.
    pub fn new(ww: WhenWhere, target: Celest) -> Self {
        Observation::with_extinction(ww, target, AlmanacParams::default().extinction)
    }

    /// Observe `target` under `ww`, taking the extinction coefficient from `params`.
    pub fn with_params(ww: WhenWhere, target: Celest, params: &AlmanacParams) -> Self {
        Observation::with_extinction(ww, target, params.extinction)
    }

    fn with_extinction(ww: WhenWhere, target: Celest, extinction: f64) -> Self {
        let jd = ww.jd();
        let site = ww.site();
        let lat = site.latitude();
        let height = site.elevation_sea();
        let sidereal = ww.sidereal();

        let current = target.precessed(julian_epoch(jd));
        let hour_angle = BoundedAngle::hour_angle(sidereal - current.ra().value()).value();
        let altaz = altit(current.dec().value(), hour_angle, lat);
        let airmass = true_airmass(altaz.altitude);

        let barycentric = time_correction(jd, Frame::Barycentric, &target, lat, height, sidereal);
        let heliocentric = time_correction(jd, Frame::Heliocentric, &target, lat, height, sidereal);

        let sun_separation = current.subtend(&ww.sun().topocentric.to_celest(jd)) * DEG_IN_RADIAN;
        let moon_separation =
            current.subtend(&ww.moon().topocentric.to_celest(jd)) * DEG_IN_RADIAN;

        let moon_up = ww.moon().altitude() > 0.0;
        let dark = ww.sun().altitude() < SKY_BRIGHTNESS_SUN_LIMIT;
        let sky_brightness = if moon_up && dark && altaz.altitude > 0.0 {
            lunar_sky_brightness(&MoonlightGeometry {
                elongation: ww.moon_elongation(),
                separation: moon_separation,
                extinction,
                moon_altitude: ww.moon().altitude(),
                altitude: altaz.altitude,
                moon_distance: ww.moon_distance(),
            })
        } else {
            None
        };

        Observation {
            ww,
            target,
            current,
            hour_angle,
            altaz,
            airmass,
            barycentric,
            heliocentric,
            sun_separation,
            moon_separation,
            sky_brightness,
            extinction,
        }
    }

    /// The same target `hours` later (or earlier).
    pub fn advanced_by_hours(&self, hours: Hour) -> Self {
        Observation::with_extinction(self.ww.advanced_by_hours(hours), self.target, self.extinction)
    }

    /// Observations at `n` successive whole hours, starting with this one.
    pub fn hourly_table(&self, n: usize) -> HourlyTable {
        let rows = (0..n)
            .map(|i| self.advanced_by_hours(i as f64))
            .collect();
        HourlyTable { rows }
    }

    pub fn when_where(&self) -> &WhenWhere {
        &self.ww
    }

    /// The target as given.
    pub fn target(&self) -> &Celest {
        &self.target
    }

    /// The target precessed to the equinox of date.
    pub fn current(&self) -> &Celest {
        &self.current
    }

    /// Hour angle in hours, in `(-12, 12]`.
    pub fn hour_angle(&self) -> Hour {
        self.hour_angle
    }

    pub fn altaz(&self) -> &AltAz {
        &self.altaz
    }

    pub fn altitude(&self) -> Degree {
        self.altaz.altitude
    }

    pub fn azimuth(&self) -> Degree {
        self.altaz.azimuth
    }

    pub fn parallactic(&self) -> Degree {
        self.altaz.parallactic
    }

    /// `None` while the target is below the horizon.
    pub fn airmass(&self) -> Option<f64> {
        self.airmass
    }

    pub fn barycentric(&self) -> &TimeCorrection {
        &self.barycentric
    }

    pub fn heliocentric(&self) -> &TimeCorrection {
        &self.heliocentric
    }

    /// Angular distance to the topocentric Sun, degrees.
    pub fn sun_separation(&self) -> Degree {
        self.sun_separation
    }

    /// Angular distance to the topocentric Moon, degrees.
    pub fn moon_separation(&self) -> Degree {
        self.moon_separation
    }

    /// V-band sky brightness due to the Moon, mag/arcsec².
    ///
    /// Defined only when the Moon and the target are above the horizon and the Sun is below
    /// [`SKY_BRIGHTNESS_SUN_LIMIT`].
    pub fn sky_brightness(&self) -> Option<f64> {
        self.sky_brightness
    }

    /// Angular distance to each planet, degrees.
    pub fn planet_separations(&self) -> Vec<(Planet, Degree)> {
        let jd = self.ww.jd();
        PlanetElements::at(jd)
            .separations(&self.current, jd)
            .into_iter()
            .map(|(planet, sep)| (planet, sep * DEG_IN_RADIAN))
            .collect()
    }

    pub fn constellation(&self) -> Option<&'static str> {
        constellation_of(&self.target)
    }

    /// Galactic longitude and latitude, degrees.
    pub fn galactic(&self) -> (Degree, Degree) {
        self.target.galactic()
    }

    /// Ecliptic longitude and latitude of date, degrees.
    pub fn ecliptic(&self) -> (Degree, Degree) {
        self.target.ecliptic(self.ww.jd())
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.ww)?;
        writeln!(f, "Target  {}", self.target)?;
        writeln!(f, "Current {}", self.current)?;
        writeln!(
            f,
            "HA {}  alt {:.2}  az {:.2}  parallactic {:.1}",
            BoundedAngle::hour_angle(self.hour_angle).rounded_string(0, ":"),
            self.altaz.altitude,
            self.altaz.azimuth,
            self.altaz.parallactic
        )?;
        match self.airmass {
            Some(x) => writeln!(f, "Airmass {x:.3}")?,
            None => writeln!(f, "Airmass (down)")?,
        }
        writeln!(
            f,
            "BJD {:.6}  bary. corr. {:.2} s  {:.2} km/s",
            self.barycentric.jd, self.barycentric.light_time, self.barycentric.velocity
        )?;
        writeln!(
            f,
            "Sun {:.1} deg away, Moon {:.1} deg away",
            self.sun_separation, self.moon_separation
        )?;
        if let Some(v) = self.sky_brightness {
            writeln!(f, "Moonlit sky {v:.1} V mag/arcsec2")?;
        }
        write!(f, "Constellation {}", self.constellation().unwrap_or("?"))
    }
}

/// Successive hourly observations of one target.
#[derive(Debug, Clone)]
pub struct HourlyTable {
    rows: Vec<Observation>,
}

impl HourlyTable {
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for HourlyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Local"),
            Cell::new("UT"),
            Cell::new("LST"),
            Cell::new("HA"),
            Cell::new("Airmass"),
            Cell::new("Moon alt"),
            Cell::new("Sun alt"),
        ]);

        let right = |text: String| Cell::new(text).set_alignment(CellAlignment::Right);
        for obs in &self.rows {
            let when = obs.ww.when();
            let airmass = match obs.airmass {
                Some(x) if x < 10.0 => format!("{x:.2}"),
                Some(_) => "> 10".to_string(),
                None => "down".to_string(),
            };
            table.add_row(Row::from(vec![
                right(when.local_date().format(DateStyle::TimeOnlyMinutes, 0)),
                right(when.ut_date().format(DateStyle::TimeOnlyMinutes, 0)),
                right(BoundedAngle::ra(obs.ww.sidereal()).rounded_string(-2, ":")),
                right(BoundedAngle::hour_angle(obs.hour_angle).rounded_string(-2, ":")),
                right(airmass),
                right(format!("{:.1}", obs.ww.moon().altitude())),
                right(format!("{:.1}", obs.ww.sun().altitude())),
            ]));
        }

        write!(f, "{table}")
    }
}
