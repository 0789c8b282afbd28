pub mod almanac;
pub mod angles;
pub mod calendar;
pub mod celest;
pub mod constants;
pub mod constellation;
pub mod ephemeris;
pub mod horizon;
pub mod instant;
pub mod observation;
pub mod ref_system;
pub mod sexagesimal;
pub mod site;
pub mod sky_brightness;
pub mod skycalc;
pub mod skycalc_errors;
pub mod time;
pub mod when_where;
