//! # Barycentric and heliocentric corrections
//!
//! Light-time and radial-velocity corrections that refer an observation made at a site on the
//! Earth to the solar-system barycentre or to the centre of the Sun.
//!
//! The Earth's heliocentric state is taken from the solar series (the negated geocentric Sun
//! and its velocity). For the barycentric frame, the mass-weighted mean of the nine planets'
//! heliocentric states (IAU 1976 mass ratios) gives the offset of the barycentre from the Sun.
//! The observer's diurnal rotation velocity is added in both frames; the observer's geocentric
//! position is neglected in the light-time term, which it changes by at most 21 ms.

use nalgebra::Vector3;

use super::planets::PlanetElements;
use super::sun::{sun_position, sun_velocity};
use crate::celest::Celest;
use crate::constants::{
    Degree, Hour, JulianDate, Meter, Planet, EARTHRAD_IN_KM, KMS_AUDAY, LIGHTSEC_IN_AU,
    OMEGA_EARTH, SECONDS_PER_DAY, SS_MASS,
};
use crate::horizon::geocent;
use crate::time::julian_epoch;

/// Reference point of the correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    Barycentric,
    Heliocentric,
}

/// Observer position (light-seconds) and velocity (km/s) relative to the reference point,
/// equatorial frame of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Correction for one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeCorrection {
    /// Light-time correction in seconds, to be added to the observed time.
    pub light_time: f64,
    /// Projection of the observer velocity on the line of sight, km/s, to be added to an
    /// observed radial velocity.
    pub velocity: f64,
    /// Corrected Julian Date (BJD or HJD, on the UT scale of the input).
    pub jd: JulianDate,
}

/// Offset of the barycentre from the centre of the Sun.
///
/// Returns
/// --------
/// * `(position AU, velocity AU/day)` in the equatorial frame of date.
pub fn barycenter_offset(elements: &PlanetElements, jd: JulianDate) -> (Vector3<f64>, Vector3<f64>) {
    let (pos, vel) = Planet::ALL.iter().fold(
        (Vector3::zeros(), Vector3::zeros()),
        |(pos, vel), planet| {
            (
                pos + elements.heliocentric(*planet, jd) * planet.mass(),
                vel + elements.heliocentric_velocity(*planet, jd) * planet.mass(),
            )
        },
    );
    (pos / SS_MASS, vel / SS_MASS)
}

/// State of an observer at latitude `lat`, elevation `height`, when the local sidereal time is
/// `sidereal`.
pub fn observer_state(
    jd: JulianDate,
    frame: Frame,
    lat: Degree,
    height: Meter,
    sidereal: Hour,
) -> ObserverState {
    let earth_pos = -sun_position(jd).xyz;
    let earth_vel = -sun_velocity(jd);

    let (pos, vel) = match frame {
        Frame::Heliocentric => (earth_pos, earth_vel),
        Frame::Barycentric => {
            let (bary_pos, bary_vel) = barycenter_offset(&PlanetElements::at(jd), jd);
            (earth_pos - bary_pos, earth_vel - bary_vel)
        }
    };

    // diurnal rotation: omega cross the geocentric position
    let geopos = geocent(sidereal, lat, height);
    let rotation = Vector3::new(
        -OMEGA_EARTH * geopos.y * EARTHRAD_IN_KM,
        OMEGA_EARTH * geopos.x * EARTHRAD_IN_KM,
        0.0,
    );

    ObserverState {
        position: pos * LIGHTSEC_IN_AU,
        velocity: vel * KMS_AUDAY + rotation,
    }
}

/// Light-time and velocity corrections toward `target`.
///
/// Arguments
/// ---------
/// * `jd`: UT Julian Date of the observation.
/// * `frame`: barycentric or heliocentric.
/// * `target`: target position, any equinox (precessed to the equinox of date internally).
/// * `lat`, `height`, `sidereal`: observer latitude (degrees), elevation (m) and local sidereal
///   time (hours).
pub fn time_correction(
    jd: JulianDate,
    frame: Frame,
    target: &Celest,
    lat: Degree,
    height: Meter,
    sidereal: Hour,
) -> TimeCorrection {
    let unit = target.precessed(julian_epoch(jd)).unit_vector();
    let state = observer_state(jd, frame, lat, height, sidereal);

    let light_time = unit.dot(&state.position);
    TimeCorrection {
        light_time,
        velocity: unit.dot(&state.velocity),
        jd: jd + light_time / SECONDS_PER_DAY,
    }
}

#[cfg(test)]
mod barycentric_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const JD: JulianDate = 2_455_197.5;

    #[test]
    fn test_target_toward_sun() {
        let sun = sun_position(JD);
        let target = sun.to_celest(JD);
        let corr = time_correction(JD, Frame::Heliocentric, &target, 0.0, 0.0, 0.0);
        assert_abs_diff_eq!(corr.light_time, -sun.distance * LIGHTSEC_IN_AU, epsilon = 1e-6);
        assert_abs_diff_eq!(
            corr.jd,
            JD - sun.distance * LIGHTSEC_IN_AU / SECONDS_PER_DAY,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_barycentre_offset_size() {
        let el = PlanetElements::at(JD);
        let (pos, vel) = barycenter_offset(&el, JD);
        // within about two solar radii, moving at ~10 m/s
        assert!(pos.norm() < 0.011);
        assert!(pos.norm() > 0.001);
        assert!(vel.norm() * KMS_AUDAY < 0.02);

        let target = Celest::new(6.0, 20.0, 2000.0);
        let bary = time_correction(JD, Frame::Barycentric, &target, 31.9, 2000.0, 3.0);
        let helio = time_correction(JD, Frame::Heliocentric, &target, 31.9, 2000.0, 3.0);
        assert!((bary.light_time - helio.light_time).abs() < 6.0);
        assert!((bary.velocity - helio.velocity).abs() < 0.02);
    }

    #[test]
    fn test_velocity_correction_bounds() {
        for i in 0..24 {
            let target = Celest::new(i as f64, 15.0 * (i % 7) as f64 - 45.0, 2000.0);
            let corr = time_correction(JD, Frame::Barycentric, &target, 0.0, 0.0, 0.0);
            assert!(corr.velocity.abs() < 31.0);
            assert!(corr.light_time.abs() < 505.0);
        }
    }

    #[test]
    fn test_diurnal_rotation() {
        // an equatorial observer moves at 0.465 km/s toward the east point
        let a = observer_state(JD, Frame::Heliocentric, 0.0, 0.0, 0.0);
        let b = observer_state(JD, Frame::Heliocentric, 0.0, 0.0, 12.0);
        let diff = (a.velocity - b.velocity).norm() / 2.0;
        assert_abs_diff_eq!(diff, OMEGA_EARTH * EARTHRAD_IN_KM, epsilon = 1e-9);
        assert_abs_diff_eq!(a.position, b.position, epsilon = 1e-12);
    }
}
