//! # Observing sites
//!
//! A [`Site`] bundles everything the ephemeris and almanac code needs to know about a place on
//! the Earth:
//!
//! - longitude in **hours west** of Greenwich, latitude in **degrees**,
//! - elevation above sea level (used for topocentric parallax) and elevation above the
//!   surrounding terrain (used for the horizon dip at rise and set), both in **meters**,
//! - the civil time zone: standard offset in hours west plus a [`DstRule`].
//!
//! Sites are usually loaded from the bundled table through [`registry::SiteRegistry`], whose
//! records have the comma-separated form
//!
//! ```text
//! "Kitt Peak [MDM Obs.]",  7.44111,  31.9533,  7.,  0 , "Mountain", "M", 1925., 700.
//! ```
//!
//! i.e. name, longitude, latitude, standard offset, DST code, zone name, zone abbreviation,
//! elevation above sea level and elevation above the horizon.
//!
//! Two sites compare equal when their name, latitude, longitude and standard offset agree.
//! Floating-point fields are stored as `NotNan<f64>` so that `Site` can be hashed and used as a
//! map key.

pub mod dst;
pub mod registry;

use std::fmt;
use std::hash::{Hash, Hasher};

use nom::{
    bytes::complete::{is_not, tag},
    character::complete::{char, i32 as parse_i32, space0},
    combinator::{all_consuming, opt},
    number::complete::double,
    sequence::{delimited, terminated},
    IResult, Parser,
};
use ordered_float::NotNan;

use crate::constants::{Degree, Hour, Meter, DEG_IN_RADIAN, EQUAT_RAD};
use crate::skycalc_errors::SkycalcError;
use dst::{DstRule, ZoneRule};

/// An observing site with its time-zone description.
#[derive(Debug, Clone)]
pub struct Site {
    name: String,
    /// Hours west of Greenwich.
    longitude: NotNan<f64>,
    /// Degrees.
    latitude: NotNan<f64>,
    /// Standard-time offset, hours west.
    std_offset: NotNan<f64>,
    dst: DstRule,
    zone_name: String,
    zone_abbrev: String,
    elevation_sea: NotNan<f64>,
    elevation_horizon: NotNan<f64>,
}

impl Site {
    /// Create a site at sea level with an unnamed zone.
    ///
    /// Arguments
    /// ---------
    /// * `name`: human-readable site name.
    /// * `longitude`: hours **west** of Greenwich, in `[-12, 12]`.
    /// * `latitude`: degrees, in `[-90, 90]`.
    /// * `zone`: standard-time offset and daylight-saving convention.
    ///
    /// Returns
    /// --------
    /// * The site, or [`SkycalcError::InvalidSite`] / [`SkycalcError::FloatIsNan`] when a value is
    ///   out of range or NaN.
    pub fn new(
        name: impl Into<String>,
        longitude: Hour,
        latitude: Degree,
        zone: ZoneRule,
    ) -> Result<Self, SkycalcError> {
        let name = name.into();
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SkycalcError::InvalidSite(format!(
                "{name}: latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-12.0..=12.0).contains(&longitude) {
            return Err(SkycalcError::InvalidSite(format!(
                "{name}: longitude {longitude} h outside [-12, 12]"
            )));
        }
        if !(-14.0..=14.0).contains(&zone.std_offset) {
            return Err(SkycalcError::InvalidSite(format!(
                "{name}: standard offset {} h outside [-14, 14]",
                zone.std_offset
            )));
        }

        Ok(Site {
            name,
            longitude: NotNan::new(longitude)?,
            latitude: NotNan::new(latitude)?,
            std_offset: NotNan::new(zone.std_offset)?,
            dst: zone.dst,
            zone_name: String::new(),
            zone_abbrev: String::new(),
            elevation_sea: NotNan::new(0.0)?,
            elevation_horizon: NotNan::new(0.0)?,
        })
    }

    /// Set the elevations above sea level and above the local horizon, in meters.
    pub fn with_elevations(mut self, sea: Meter, horizon: Meter) -> Result<Self, SkycalcError> {
        if horizon < 0.0 {
            return Err(SkycalcError::InvalidSite(format!(
                "{}: negative elevation above horizon {horizon}",
                self.name
            )));
        }
        self.elevation_sea = NotNan::new(sea)?;
        self.elevation_horizon = NotNan::new(horizon)?;
        Ok(self)
    }

    /// Set the zone name ("Mountain") and its one-letter abbreviation ("M").
    pub fn with_zone_names(mut self, name: impl Into<String>, abbrev: impl Into<String>) -> Self {
        self.zone_name = name.into();
        self.zone_abbrev = abbrev.into();
        self
    }

    /// Parse one record of the site table.
    pub fn parse_record(line: &str) -> Result<Self, SkycalcError> {
        let (_, record) = all_consuming(site_record)
            .parse(line.trim())
            .map_err(|_| SkycalcError::SiteParseError(line.to_string()))?;

        let dst = DstRule::try_from(record.dst_code)?;
        Site::new(
            record.name,
            record.longitude,
            record.latitude,
            ZoneRule {
                std_offset: record.std_offset,
                dst,
            },
        )?
        .with_elevations(record.elevation_sea, record.elevation_horizon)
        .map(|site| site.with_zone_names(record.zone_name, record.zone_abbrev))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hours west of Greenwich.
    pub fn longitude(&self) -> Hour {
        self.longitude.into_inner()
    }

    pub fn latitude(&self) -> Degree {
        self.latitude.into_inner()
    }

    pub fn std_offset(&self) -> Hour {
        self.std_offset.into_inner()
    }

    pub fn dst_rule(&self) -> DstRule {
        self.dst
    }

    pub fn zone(&self) -> ZoneRule {
        ZoneRule {
            std_offset: self.std_offset(),
            dst: self.dst,
        }
    }

    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    pub fn zone_abbrev(&self) -> &str {
        &self.zone_abbrev
    }

    pub fn elevation_sea(&self) -> Meter {
        self.elevation_sea.into_inner()
    }

    pub fn elevation_horizon(&self) -> Meter {
        self.elevation_horizon.into_inner()
    }

    /// Depression of the apparent horizon below the astronomical one, in degrees.
    ///
    /// `sqrt(2 h / R_eq)` for an observer `h` meters above the surrounding terrain.
    pub fn horizon_dip(&self) -> Degree {
        (2.0 * self.elevation_horizon() / EQUAT_RAD).sqrt() * DEG_IN_RADIAN
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.std_offset == other.std_offset
    }
}

impl Eq for Site {}

impl Hash for Site {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.latitude.hash(state);
        self.longitude.hash(state);
        self.std_offset.hash(state);
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (long {:.5} h W, lat {:+.5}, {} m)",
            self.name,
            self.longitude(),
            self.latitude(),
            self.elevation_sea()
        )
    }
}

struct SiteRecord {
    name: String,
    longitude: f64,
    latitude: f64,
    std_offset: f64,
    dst_code: i32,
    zone_name: String,
    zone_abbrev: String,
    elevation_sea: f64,
    elevation_horizon: f64,
}

fn quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        opt(is_not("\"")).map(|s: Option<&str>| s.unwrap_or("").to_string()),
        char('"'),
    )
    .parse(input)
}

/// A field surrounded by optional blanks and terminated by a comma.
fn field<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    terminated(delimited(space0, inner, space0), tag(","))
}

fn site_record(input: &str) -> IResult<&str, SiteRecord> {
    let (input, name) = field(quoted).parse(input)?;
    let (input, longitude) = field(double).parse(input)?;
    let (input, latitude) = field(double).parse(input)?;
    let (input, std_offset) = field(double).parse(input)?;
    let (input, dst_code) = field(parse_i32).parse(input)?;
    let (input, zone_name) = field(quoted).parse(input)?;
    let (input, zone_abbrev) = field(quoted).parse(input)?;
    let (input, elevation_sea) = field(double).parse(input)?;
    let (input, elevation_horizon) = delimited(space0, double, space0).parse(input)?;

    Ok((
        input,
        SiteRecord {
            name,
            longitude,
            latitude,
            std_offset,
            dst_code,
            zone_name,
            zone_abbrev,
            elevation_sea,
            elevation_horizon,
        },
    ))
}

#[cfg(test)]
mod site_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[test]
    fn test_parse_record() {
        let site = Site::parse_record(
            r#""Anglo-Australian Tel., Siding Spring", -9.937739, -31.277039, -10., -2, "Australian", "A", 1149., 670."#,
        )
        .unwrap();

        assert_eq!(site.name(), "Anglo-Australian Tel., Siding Spring");
        assert_relative_eq!(site.longitude(), -9.937739);
        assert_relative_eq!(site.latitude(), -31.277039);
        assert_relative_eq!(site.std_offset(), -10.0);
        assert_eq!(site.dst_rule(), DstRule::Australia);
        assert_eq!(site.zone_name(), "Australian");
        assert_eq!(site.zone_abbrev(), "A");
        assert_relative_eq!(site.elevation_sea(), 1149.0);
        assert_relative_eq!(site.elevation_horizon(), 670.0);
    }

    #[test]
    fn test_parse_record_errors() {
        assert!(matches!(
            Site::parse_record(r#""Nowhere", 7.0, 31.0, 7., 0, "M", "M", 10."#),
            Err(SkycalcError::SiteParseError(_))
        ));
        assert!(matches!(
            Site::parse_record(r#""Bad DST", 7.0, 31.0, 7., 5, "M", "M", 10., 0."#),
            Err(SkycalcError::InvalidSite(_))
        ));
        assert!(matches!(
            Site::parse_record(r#""Bad lat", 7.0, 95.0, 7., 0, "M", "M", 10., 0."#),
            Err(SkycalcError::InvalidSite(_))
        ));
    }

    #[test]
    fn test_horizon_dip() {
        let zone = ZoneRule {
            std_offset: 7.0,
            dst: DstRule::None,
        };
        let flat = Site::new("flat", 7.0, 30.0, zone).unwrap();
        assert_eq!(flat.horizon_dip(), 0.0);

        let high = flat.with_elevations(2000.0, 700.0).unwrap();
        // sqrt(2 * 700 / 6378137) rad = 0.8489 deg
        assert_relative_eq!(high.horizon_dip(), 0.84887, epsilon = 1e-4);
    }

    #[test]
    fn test_equality_and_hash() {
        let zone = ZoneRule {
            std_offset: 5.0,
            dst: DstRule::Usa,
        };
        let a = Site::new("Here", 4.8, 43.7, zone).unwrap();
        let b = Site::new("Here", 4.8, 43.7, zone)
            .unwrap()
            .with_elevations(183.0, 0.0)
            .unwrap();
        let c = Site::new("There", 4.8, 43.7, zone).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Site> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_nan_rejected() {
        let zone = ZoneRule {
            std_offset: 0.0,
            dst: DstRule::None,
        };
        let site = Site::new("nan", 0.0, 0.0, zone).unwrap();
        assert!(matches!(
            site.with_elevations(f64::NAN, 0.0),
            Err(SkycalcError::FloatIsNan(_))
        ));
    }
}
