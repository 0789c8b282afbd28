//! # Almanac
//!
//! Rise, set and twilight times for one night, the time a target spends above given airmasses
//! in darkness, and the seasonal observability table around the current date.
//!
//! ## Modules
//!
//! * [`crossing`]: the Newton–Raphson altitude solver for the Sun and the Moon, and the
//!   [`Crossing`](crossing::Crossing) outcome type,
//! * [`night`]: [`NightlyAlmanac`](night::NightlyAlmanac) and the hours-above-airmass integrator,
//! * [`seasonal`]: the memoized [`SeasonalTable`](seasonal::SeasonalTable).
//!
//! ## Parameters
//!
//! All tunable quantities live in [`AlmanacParams`]:
//!
//! ```rust
//! use skycalc::almanac::AlmanacParams;
//!
//! let params = AlmanacParams::builder()
//!     .twilight_altitude(-12.0)
//!     .extinction(0.2)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.twilight_altitude, -12.0);
//! ```
use std::cmp::Ordering::{Equal, Greater};

use crate::constants::Degree;
use crate::horizon::altitude_at_airmass;
use crate::skycalc_errors::SkycalcError;

pub mod crossing;
pub mod night;
pub mod seasonal;

/// Tunable settings of the almanac computations.
///
/// Fields
/// -----------------
/// * `twilight_altitude`: Sun altitude ending evening / starting morning twilight, degrees.
/// * `rise_set_altitude`: altitude of rise and set for the Sun and the Moon on a flat horizon,
///   degrees (refraction plus semi-diameter). The site's horizon dip is subtracted from it.
/// * `extinction`: V-band zenith extinction, magnitudes per airmass, used by the lunar
///   sky-brightness model.
/// * `seasonal_threshold_days`: the seasonal table is recomputed when the date moves by more
///   than this.
/// * `airmass_thresholds`: airmasses for which the hours in darkness below them are tabulated.
///
/// Defaults
/// -----------------
/// * `twilight_altitude`: −18°
/// * `rise_set_altitude`: −0.83°
/// * `extinction`: 0.172
/// * `seasonal_threshold_days`: 5
/// * `airmass_thresholds`: 3, 2, 1.5
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacParams {
    pub twilight_altitude: Degree,
    pub rise_set_altitude: Degree,
    pub extinction: f64,
    pub seasonal_threshold_days: f64,
    pub airmass_thresholds: [f64; 3],
}

impl AlmanacParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AlmanacParamsBuilder {
        AlmanacParamsBuilder::new()
    }

    /// Altitudes corresponding to [`AlmanacParams::airmass_thresholds`], in the same order.
    pub fn threshold_altitudes(&self) -> [Degree; 3] {
        self.airmass_thresholds
            .map(|x| altitude_at_airmass(x).unwrap_or(90.0))
    }
}

impl Default for AlmanacParams {
    fn default() -> Self {
        AlmanacParams {
            twilight_altitude: -18.0,
            rise_set_altitude: -0.83,
            extinction: 0.172,
            seasonal_threshold_days: 5.0,
            airmass_thresholds: [3.0, 2.0, 1.5],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlmanacParamsBuilder {
    params: AlmanacParams,
}

impl AlmanacParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: AlmanacParams::default(),
        }
    }

    pub fn twilight_altitude(mut self, v: Degree) -> Self {
        self.params.twilight_altitude = v;
        self
    }
    pub fn rise_set_altitude(mut self, v: Degree) -> Self {
        self.params.rise_set_altitude = v;
        self
    }
    pub fn extinction(mut self, v: f64) -> Self {
        self.params.extinction = v;
        self
    }
    pub fn seasonal_threshold_days(mut self, v: f64) -> Self {
        self.params.seasonal_threshold_days = v;
        self
    }
    pub fn airmass_thresholds(mut self, v: [f64; 3]) -> Self {
        self.params.airmass_thresholds = v;
        self
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    pub fn build(self) -> Result<AlmanacParams, SkycalcError> {
        let p = &self.params;

        if !(-90.0..=0.0).contains(&p.twilight_altitude) {
            return Err(SkycalcError::InvalidParameter(
                "twilight_altitude must be in [-90, 0]".into(),
            ));
        }
        if !(-10.0..=10.0).contains(&p.rise_set_altitude) {
            return Err(SkycalcError::InvalidParameter(
                "rise_set_altitude must be in [-10, 10]".into(),
            ));
        }
        if !Self::ge0(p.extinction) {
            return Err(SkycalcError::InvalidParameter(
                "extinction must be >= 0".into(),
            ));
        }
        if !Self::gt0(p.seasonal_threshold_days) {
            return Err(SkycalcError::InvalidParameter(
                "seasonal_threshold_days must be > 0".into(),
            ));
        }
        if p.airmass_thresholds.iter().any(|x| !(*x >= 1.0) || x.is_infinite()) {
            return Err(SkycalcError::InvalidParameter(
                "airmass thresholds must be finite and >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}
