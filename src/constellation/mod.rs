//! # Constellation lookup
//!
//! The IAU constellation boundaries run along lines of constant right ascension and
//! declination **of the equinox B1875**. Precessed back to that equinox, the sky is covered by
//! a list of boxes `RA low ≤ α < RA high, δ ≥ Dec low`, sorted by decreasing `Dec low`; the
//! first box containing a position names its constellation.
//!
//! The table is compiled into the crate and parsed once on first use.
//!
//! ```rust
//! use skycalc::celest::Celest;
//! use skycalc::constellation::constellation_of;
//!
//! // the Crab nebula
//! let crab = Celest::new(5.0 + 34.0 / 60.0, 22.0, 2000.0);
//! assert_eq!(constellation_of(&crab), Some("Tau"));
//! ```
//!
//! # References
//! * Roman, N. G. 1987, *Identification of a constellation from a position*, PASP 99, 695.

use once_cell::sync::Lazy;

use crate::celest::Celest;
use crate::constants::{Degree, Hour};
use crate::skycalc_errors::SkycalcError;

/// Equinox of the boundary table.
pub const BOUNDARY_EQUINOX: f64 = 1875.0;

static BUNDLED_BOUNDARIES: &str = include_str!("data/boundaries.dat");

static BOUNDARIES: Lazy<ConstellationTable> = Lazy::new(|| {
    ConstellationTable::from_text(BUNDLED_BOUNDARIES).unwrap_or_else(|e| {
        log::error!("bundled constellation table: {e}");
        ConstellationTable { boxes: Vec::new() }
    })
});

/// One box of the boundary table.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryBox {
    pub ra_low: Hour,
    pub ra_high: Hour,
    pub dec_low: Degree,
    pub abbrev: String,
}

impl BoundaryBox {
    fn contains(&self, ra: Hour, dec: Degree) -> bool {
        dec >= self.dec_low && ra >= self.ra_low && ra < self.ra_high
    }
}

/// The boundary boxes in lookup order.
#[derive(Debug, Clone)]
pub struct ConstellationTable {
    boxes: Vec<BoundaryBox>,
}

impl ConstellationTable {
    /// Parse a table of `ra_low ra_high dec_low abbrev` lines.
    ///
    /// Blank lines and lines starting with `#` are skipped. Line order is kept: it is the
    /// priority order of the lookup.
    pub fn from_text(text: &str) -> Result<Self, SkycalcError> {
        let boxes = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(parse_box)
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("loaded {} constellation boundary boxes", boxes.len());
        Ok(ConstellationTable { boxes })
    }

    /// The first box containing `(ra, dec)`, both referred to [`BOUNDARY_EQUINOX`].
    pub fn find_b1875(&self, ra: Hour, dec: Degree) -> Option<&BoundaryBox> {
        self.boxes.iter().find(|b| b.contains(ra, dec))
    }

    /// Constellation abbreviation of `target`, whatever its equinox.
    pub fn find(&self, target: &Celest) -> Option<&str> {
        let old = target.precessed(BOUNDARY_EQUINOX);
        self.find_b1875(old.ra().value(), old.dec().value())
            .map(|b| b.abbrev.as_str())
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

fn parse_box(line: &str) -> Result<BoundaryBox, SkycalcError> {
    let bad = || SkycalcError::CoordinateParseError(line.to_string());
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [ra_low, ra_high, dec_low, abbrev] = fields.as_slice() else {
        return Err(bad());
    };
    let number = |s: &str| s.parse::<f64>().map_err(|_| bad());
    let b = BoundaryBox {
        ra_low: number(ra_low)?,
        ra_high: number(ra_high)?,
        dec_low: number(dec_low)?,
        abbrev: abbrev.to_string(),
    };
    if !(0.0..=24.0).contains(&b.ra_low) || !(b.ra_low..=24.0).contains(&b.ra_high) {
        return Err(bad());
    }
    Ok(b)
}

/// The boundary table bundled with the crate.
pub fn bundled_table() -> &'static ConstellationTable {
    &BOUNDARIES
}

/// Three-letter IAU abbreviation of the constellation containing `target`.
///
/// Returns `None` only if the bundled table failed to load.
pub fn constellation_of(target: &Celest) -> Option<&'static str> {
    BOUNDARIES.find(target)
}

#[cfg(test)]
mod constellation_test {
    use super::*;

    fn at(ra: Hour, dec: Degree) -> &'static str {
        constellation_of(&Celest::new(ra, dec, 2000.0)).unwrap()
    }

    #[test]
    fn test_bundled_table() {
        let table = bundled_table();
        assert_eq!(table.len(), 357);
        let mut names: Vec<&str> = table.boxes.iter().map(|b| b.abbrev.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 88);
    }

    #[test]
    fn test_crab() {
        assert_eq!(at(5.0 + 34.0 / 60.0, 22.0), "Tau");
        assert_eq!(at(5.5755, 22.0145), "Tau");
        // the same point given in B1950
        let crab_1950 = Celest::new(5.0 + 34.0 / 60.0, 22.0, 1950.0);
        assert_eq!(constellation_of(&crab_1950), Some("Tau"));
    }

    #[test]
    fn test_bright_stars() {
        let stars = [
            (2.5303, 89.2641, "UMi"),
            (6.7525, -16.7161, "CMa"),
            (18.6156, 38.7837, "Lyr"),
            (5.9195, 7.4071, "Ori"),
            (16.4901, -26.4320, "Sco"),
            (14.6600, -60.8340, "Cen"),
            (13.4199, -11.1613, "Vir"),
            (20.6905, 45.2803, "Cyg"),
            (22.9608, -29.6222, "PsA"),
            (1.6286, -57.2368, "Eri"),
            (6.3992, -52.6957, "Car"),
            (12.4433, -63.0991, "Cru"),
            (21.1465, -88.9565, "Oct"),
            (0.7123, 41.2690, "And"),
            (10.1395, 11.9672, "Leo"),
            (14.2610, 19.1825, "Boo"),
            (19.8464, 8.8683, "Aql"),
            (7.6550, 5.2250, "CMi"),
            (3.1361, 40.9556, "Per"),
            (14.0731, 64.3758, "Dra"),
            (21.3097, 62.5856, "Cep"),
            (9.3509, 34.3926, "Lyn"),
            (18.5868, -8.2441, "Sct"),
            (16.0543, -49.2297, "Nor"),
        ];
        for (ra, dec, expected) in stars {
            assert_eq!(at(ra, dec), expected, "RA {ra} Dec {dec}");
        }
    }

    #[test]
    fn test_poles() {
        assert_eq!(at(0.0, 89.99), "UMi");
        assert_eq!(at(12.0, -89.99), "Oct");
    }

    #[test]
    fn test_table_order_is_priority() {
        let table = ConstellationTable::from_text("0 24 10 Aaa\n0 24 -90 Bbb\n").unwrap();
        assert_eq!(table.find_b1875(3.0, 20.0).unwrap().abbrev, "Aaa");
        assert_eq!(table.find_b1875(3.0, 10.0).unwrap().abbrev, "Aaa");
        assert_eq!(table.find_b1875(3.0, 9.9).unwrap().abbrev, "Bbb");
        assert!(ConstellationTable::from_text("0 24 10").is_err());
        assert!(ConstellationTable::from_text("5 4 10 Xyz").is_err());
    }
}
