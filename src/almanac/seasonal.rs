//! Seasonal observability of a target.
//!
//! For the new and full moons of the eight lunations around a date (three before the current
//! one, four after it), the table gives the target's hour angle and airmass at the end of evening
//! twilight, at local midnight and at the start of morning twilight, and the hours it spends in
//! darkness above each airmass threshold.
//!
//! Sixteen nightly almanacs are costly next to everything else in the crate, so
//! [`SeasonalTable::update`] only recomputes when its inputs changed enough to matter, and tells
//! the caller whether it did.

use std::fmt;
use std::sync::Arc;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;

use crate::angles::BoundedAngle;
use crate::calendar::DateStyle;
use crate::celest::Celest;
use crate::constants::{Hour, JulianDate, SID_RATE};
use crate::ephemeris::moon::{flmoon, lunation, MoonPhase};
use crate::horizon::{altit, true_airmass};
use crate::instant::Instant;
use crate::site::Site;
use crate::time::{julian_epoch, lst};
use crate::when_where::WhenWhere;

use super::night::NightlyAlmanac;
use super::AlmanacParams;

/// Lunations tabulated before the current one.
const LUNATIONS_BEFORE: i32 = 3;
/// Lunations tabulated after the current one.
const LUNATIONS_AFTER: i32 = 4;

/// Hour angle and airmass of the target at one moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub jd: JulianDate,
    /// Hour angle in `(-12, 12]`.
    pub hour_angle: Hour,
    /// `None` when the target is down.
    pub airmass: Option<f64>,
}

impl Sample {
    fn at(jd: JulianDate, target: &Celest, site: &Site) -> Self {
        let hour_angle =
            BoundedAngle::hour_angle(lst(jd, site.longitude()) - target.ra().value()).value();
        let alt = altit(target.dec().value(), hour_angle, site.latitude()).altitude;
        Sample {
            jd,
            hour_angle,
            airmass: true_airmass(alt),
        }
    }
}

/// One night of the seasonal table.
#[derive(Debug, Clone)]
pub struct SeasonalRow {
    pub lunation: i32,
    pub phase: MoonPhase,
    /// UT Julian Date of the phase.
    pub phase_jd: JulianDate,
    pub almanac: NightlyAlmanac,
    /// `None` when there is no evening twilight that night.
    pub evening: Option<Sample>,
    pub midnight: Sample,
    pub morning: Option<Sample>,
    /// Transit of the target nearest to midnight.
    pub transit: JulianDate,
    /// Hours in darkness below each of the airmass thresholds, in the order of
    /// [`AlmanacParams::airmass_thresholds`].
    pub hours_above: [f64; 3],
}

impl SeasonalRow {
    fn new(
        lunation: i32,
        phase: MoonPhase,
        site: &Arc<Site>,
        now: &Instant,
        target: &Celest,
        params: &AlmanacParams,
    ) -> Self {
        let phase_jd = flmoon(lunation, phase);
        let ww = WhenWhere::new(now.with_jd(phase_jd), Arc::clone(site));
        let almanac = NightlyAlmanac::new(&ww, params);
        let midnight = almanac.midnight();

        let current = target.precessed(julian_epoch(midnight));
        let ra = current.ra().value();
        let dec = current.dec().value();

        let sidereal = lst(midnight, site.longitude());
        let transit =
            midnight + BoundedAngle::hour_angle(ra - sidereal).value() / 24.0 / SID_RATE;

        let sample = |jd: JulianDate| Sample::at(jd, &current, site);
        let altitudes = params.threshold_altitudes();

        SeasonalRow {
            lunation,
            phase,
            phase_jd,
            evening: almanac.evening_twilight.jd().map(sample),
            midnight: sample(midnight),
            morning: almanac.morning_twilight.jd().map(sample),
            transit,
            hours_above: altitudes.map(|alt| almanac.hours_above(ra, dec, alt)),
            almanac,
        }
    }
}

/// Inputs the table was last computed for.
#[derive(Debug, Clone)]
struct SeasonalKey {
    jd: JulianDate,
    site: Arc<Site>,
    target: Celest,
    params: AlmanacParams,
}

/// Memoized seasonal observability table.
#[derive(Debug, Clone, Default)]
pub struct SeasonalTable {
    rows: Vec<SeasonalRow>,
    key: Option<SeasonalKey>,
}

impl SeasonalTable {
    /// An empty table; the first [`SeasonalTable::update`] fills it.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table computed for `ww` and `target`.
    pub fn compute(ww: &WhenWhere, target: &Celest, params: &AlmanacParams) -> Self {
        let mut table = SeasonalTable::new();
        table.update(ww, target, params);
        table
    }

    /// Bring the table up to date.
    ///
    /// Arguments
    /// ---------
    /// * `ww`: current instant and site.
    /// * `target`: the target, any equinox.
    /// * `params`: almanac settings, including the recompute threshold.
    ///
    /// Returns
    /// --------
    /// * `true` if the rows were recomputed: on the first call, when the date moved by more than
    ///   [`AlmanacParams::seasonal_threshold_days`], or when the site, the target or the
    ///   parameters changed. `false` when the previous rows still stand.
    pub fn update(&mut self, ww: &WhenWhere, target: &Celest, params: &AlmanacParams) -> bool {
        let stale = match &self.key {
            None => true,
            Some(key) => {
                (ww.jd() - key.jd).abs() > params.seasonal_threshold_days
                    || *key.site != *ww.site()
                    || key.target != *target
                    || key.params != *params
            }
        };
        if !stale {
            return false;
        }

        log::debug!(
            "recomputing seasonal table for {} at {} (JD {:.3})",
            target,
            ww.site().name(),
            ww.jd()
        );

        let site = ww.shared_site();
        let now = lunation(ww.jd()).number;
        self.rows = (now - LUNATIONS_BEFORE..=now + LUNATIONS_AFTER)
            .cartesian_product([MoonPhase::New, MoonPhase::Full])
            .map(|(n, phase)| SeasonalRow::new(n, phase, &site, ww.when(), target, params))
            .collect();
        self.key = Some(SeasonalKey {
            jd: ww.jd(),
            site,
            target: *target,
            params: params.clone(),
        });
        true
    }

    pub fn rows(&self) -> &[SeasonalRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for SeasonalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(key) = &self.key else {
            return write!(f, "(seasonal table not computed)");
        };

        let airmass_header = |x: f64| Cell::new(format!("hrs < {x}"));
        let [a0, a1, a2] = key.params.airmass_thresholds;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Moon"),
            Cell::new("Night of"),
            Cell::new("HA eve"),
            Cell::new("airm"),
            Cell::new("HA mid"),
            Cell::new("airm"),
            Cell::new("HA morn"),
            Cell::new("airm"),
            airmass_header(a0),
            airmass_header(a1),
            airmass_header(a2),
        ]);

        let right = |text: String| Cell::new(text).set_alignment(CellAlignment::Right);
        let ha = |s: Option<&Sample>| match s {
            Some(s) => BoundedAngle::hour_angle(s.hour_angle).rounded_string(-2, ":"),
            None => "---".to_string(),
        };
        let airmass = |s: Option<&Sample>| match s.and_then(|s| s.airmass) {
            Some(x) if x < 10.0 => format!("{x:.2}"),
            Some(_) => "> 10".to_string(),
            None => "down".to_string(),
        };

        for row in &self.rows {
            let night_of = row
                .almanac
                .reference()
                .with_jd(row.midnight.jd - 0.5)
                .local_date()
                .format(DateStyle::DateOnlyMonthName, 0);
            let moon = match row.phase {
                MoonPhase::Full => "full",
                _ => "new",
            };
            let mut cells = vec![
                Cell::new(moon),
                Cell::new(night_of),
                right(ha(row.evening.as_ref())),
                right(airmass(row.evening.as_ref())),
                right(ha(Some(&row.midnight))),
                right(airmass(Some(&row.midnight))),
                right(ha(row.morning.as_ref())),
                right(airmass(row.morning.as_ref())),
            ];
            cells.extend(row.hours_above.iter().map(|h| right(format!("{h:.1}"))));
            table.add_row(Row::from(cells));
        }

        writeln!(f, "{} at {}", key.target, key.site.name())?;
        write!(f, "{table}")
    }
}
