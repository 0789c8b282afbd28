//! # Skycalc: sites, settings, and the entry points of the calculator
//!
//! [`Skycalc`] is the façade most callers need. It owns the almanac settings and the site
//! registry, and turns a site name plus a time into the values of the crate:
//!
//! 1. [`WhenWhere`]: Sun, Moon and sidereal time for an instant at a site,
//! 2. [`Observation`]: a target under those circumstances,
//! 3. [`NightlyAlmanac`]: rise, set and twilight times of the night,
//! 4. [`SeasonalTable`]: observability over the surrounding lunations.
//!
//! The bundled site table is parsed on first use through a [`OnceCell`] and then kept.
//!
//! ## Typical usage
//!
//! ```rust
//! use skycalc::celest::Celest;
//! use skycalc::skycalc::Skycalc;
//!
//! let calc = Skycalc::new();
//! let ww = calc.when_where_local("Kitt Peak", "2020-06-21 23:00").unwrap();
//! let crab = Celest::new(5.5755, 22.0145, 2000.0);
//! let obs = calc.observe(ww.clone(), crab);
//! assert!(obs.airmass().is_none());
//!
//! let night = calc.almanac(&ww);
//! println!("{night}");
//! ```
//!
//! ## See also
//! ------------
//! * [`SiteRegistry`] – Site table format and name lookup rules.
//! * [`AlmanacParams`] – Tunable settings.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::almanac::night::NightlyAlmanac;
use crate::almanac::seasonal::SeasonalTable;
use crate::almanac::AlmanacParams;
use crate::celest::Celest;
use crate::constants::JulianDate;
use crate::instant::Instant;
use crate::observation::Observation;
use crate::site::registry::SiteRegistry;
use crate::site::Site;
use crate::skycalc_errors::SkycalcError;
use crate::when_where::WhenWhere;

#[derive(Debug, Clone, Default)]
pub struct Skycalc {
    params: AlmanacParams,
    sites: OnceCell<SiteRegistry>,
}

impl Skycalc {
    /// A calculator with the default settings and the bundled sites.
    pub fn new() -> Self {
        Self::default()
    }

    /// A calculator with the given settings.
    pub fn with_params(params: AlmanacParams) -> Self {
        Skycalc {
            params,
            sites: OnceCell::new(),
        }
    }

    /// A calculator whose site registry is `sites` instead of the bundled table.
    pub fn with_sites(params: AlmanacParams, sites: SiteRegistry) -> Self {
        Skycalc {
            params,
            sites: OnceCell::with_value(sites),
        }
    }

    pub fn params(&self) -> &AlmanacParams {
        &self.params
    }

    /// The site registry, parsed on first access.
    pub fn sites(&self) -> Result<&SiteRegistry, SkycalcError> {
        self.sites.get_or_try_init(SiteRegistry::bundled)
    }

    /// Look a site up by exact name or unique prefix.
    pub fn site(&self, name: &str) -> Result<Arc<Site>, SkycalcError> {
        self.sites()?.get(name).map(|s| Arc::new(s.clone()))
    }

    /// Circumstances at UT Julian Date `jd` at the named site.
    pub fn when_where_at(&self, site: &str, jd: JulianDate) -> Result<WhenWhere, SkycalcError> {
        let site = self.site(site)?;
        Ok(WhenWhere::new(Instant::from_jd(jd, site.zone()), site))
    }

    /// Circumstances at a local clock time at the named site, daylight saving time included.
    ///
    /// Arguments
    /// -----------------
    /// * `site`: site name or unique prefix.
    /// * `local`: local date and time, e.g. `"2020-06-21 23:00"`.
    pub fn when_where_local(&self, site: &str, local: &str) -> Result<WhenWhere, SkycalcError> {
        let site = self.site(site)?;
        let when = Instant::parse(local, false, site.zone())?;
        Ok(WhenWhere::new(when, site))
    }

    /// Circumstances now at the named site.
    pub fn when_where_now(&self, site: &str) -> Result<WhenWhere, SkycalcError> {
        let site = self.site(site)?;
        let when = Instant::now(site.zone())?;
        Ok(WhenWhere::new(when, site))
    }

    pub fn observe(&self, ww: WhenWhere, target: Celest) -> Observation {
        Observation::with_params(ww, target, &self.params)
    }

    pub fn almanac(&self, ww: &WhenWhere) -> NightlyAlmanac {
        NightlyAlmanac::new(ww, &self.params)
    }

    pub fn seasonal(&self, ww: &WhenWhere, target: &Celest) -> SeasonalTable {
        SeasonalTable::compute(ww, target, &self.params)
    }

    /// Refresh `table` for `ww` and `target`; `true` if it was recomputed.
    pub fn update_seasonal(&self, table: &mut SeasonalTable, ww: &WhenWhere, target: &Celest) -> bool {
        table.update(ww, target, &self.params)
    }
}
