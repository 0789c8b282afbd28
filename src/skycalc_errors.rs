use thiserror::Error;

use crate::constants::JulianDate;

#[derive(Error, Debug)]
pub enum SkycalcError {
    #[error("Unable to parse angle: {0}")]
    AngleParseError(String),

    #[error("Unable to parse date: {0}")]
    DateParseError(String),

    #[error("Unable to parse site record: {0}")]
    SiteParseError(String),

    #[error("Unable to parse coordinates: {0}")]
    CoordinateParseError(String),

    #[error("Invalid site definition: {0}")]
    InvalidSite(String),

    #[error("Site not found in registry: {0}")]
    UnknownSite(String),

    #[error("Unknown planet: {0}")]
    UnknownPlanet(String),

    #[error("Invalid almanac parameter: {0}")]
    InvalidParameter(String),

    #[error("No convergence after {iterations} iterations near JD {near_jd}")]
    ConvergenceFailure {
        iterations: usize,
        near_jd: JulianDate,
    },

    #[error("NaN value rejected: {0}")]
    FloatIsNan(#[from] ordered_float::FloatIsNan),

    #[error("Unable to read the system clock: {0}")]
    ClockError(#[from] hifitime::HifitimeError),
}

impl SkycalcError {
    /// `true` for the variants produced by text parsing.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            SkycalcError::AngleParseError(_)
                | SkycalcError::DateParseError(_)
                | SkycalcError::SiteParseError(_)
                | SkycalcError::CoordinateParseError(_)
        )
    }
}

impl PartialEq for SkycalcError {
    fn eq(&self, other: &Self) -> bool {
        use SkycalcError::*;
        match (self, other) {
            (AngleParseError(a), AngleParseError(b))
            | (DateParseError(a), DateParseError(b))
            | (SiteParseError(a), SiteParseError(b))
            | (CoordinateParseError(a), CoordinateParseError(b))
            | (InvalidSite(a), InvalidSite(b))
            | (UnknownSite(a), UnknownSite(b))
            | (UnknownPlanet(a), UnknownPlanet(b))
            | (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (
                ConvergenceFailure {
                    iterations: i1,
                    near_jd: j1,
                },
                ConvergenceFailure {
                    iterations: i2,
                    near_jd: j2,
                },
            ) => i1 == i2 && j1 == j2,
            (FloatIsNan(_), FloatIsNan(_)) => true,
            (ClockError(_), ClockError(_)) => true,
            _ => false,
        }
    }
}
