//! # Planets
//!
//! Low-precision heliocentric positions of the nine major bodies from mean orbital elements.
//!
//! * Mercury, Venus and Mars: secular element polynomials from the *Explanatory Supplement*.
//! * Earth: elements from the old *Nautical Almanac*.
//! * Jupiter, Saturn, Uranus and Neptune: Meeus' polynomials plus the largest of their mutual
//!   perturbation terms (*Astronomical Formulae for Calculators*, p. 100 ff.).
//! * Pluto: fixed osculating elements for 1992 September 15.
//!
//! The equation of centre is approximated to third order in the eccentricity instead of solving
//! Kepler's equation, which is adequate for a few arcminutes except for Pluto.
//!
//! ```
//! use skycalc::constants::Planet;
//! use skycalc::ephemeris::planets::PlanetElements;
//!
//! let jd = 2_451_545.0;
//! let elements = PlanetElements::at(jd);
//! let mars = elements.geocentric(Planet::Mars, jd);
//! assert!((mars.ra - 22.035).abs() < 0.01);
//! ```

use nalgebra::Vector3;

use super::BodyPosition;
use crate::celest::Celest;
use crate::constants::{JulianDate, Planet, Radian, DEG_IN_RADIAN, J1900};
use crate::ref_system::ecliptic_to_equatorial;

/// Mean elements of one body, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitalElements {
    /// Inclination to the ecliptic.
    pub incl: f64,
    /// Longitude of the ascending node.
    pub node: f64,
    /// Longitude of perihelion.
    pub perihelion: f64,
    /// Semi-major axis, AU.
    pub a: f64,
    /// Mean daily motion, degrees/day.
    pub daily: f64,
    pub ecc: f64,
    /// Mean longitude at the element epoch.
    pub l0: f64,
}

impl OrbitalElements {
    /// Heliocentric ecliptic rectangular position (AU) at `jd`, for elements computed at
    /// `jd_el`.
    ///
    /// # References
    /// * Astronomical Almanac 1992, p. E4.
    pub fn position(&self, jd_el: JulianDate, jd: JulianDate) -> Vector3<f64> {
        let ii = self.incl / DEG_IN_RADIAN;
        let e = self.ecc;
        let ll = (self.daily * (jd - jd_el) + self.l0) / DEG_IN_RADIAN;
        let om_node = self.node / DEG_IN_RADIAN;
        let om_peri = self.perihelion / DEG_IN_RADIAN;

        let m = ll - om_peri;
        let omnotil = om_peri - om_node;
        let e3 = e * e * e;
        let nu = m
            + (2.0 * e - 0.25 * e3) * m.sin()
            + 1.25 * e * e * (2.0 * m).sin()
            + 1.08333333 * e3 * (3.0 * m).sin();
        let r = self.a * (1.0 - e * e) / (1.0 + e * nu.cos());

        let (su, cu) = (nu + omnotil).sin_cos();
        let (sn, cn) = om_node.sin_cos();
        Vector3::new(
            r * (cu * cn - su * ii.cos() * sn),
            r * (cu * sn + su * ii.cos() * cn),
            r * su * ii.sin(),
        )
    }

    /// Heliocentric ecliptic velocity (AU/day), by central difference over the time the mean
    /// longitude takes to advance 0.1°.
    pub fn velocity(&self, jd_el: JulianDate, jd: JulianDate) -> Vector3<f64> {
        let dt = 0.1 / self.daily;
        let before = self.position(jd_el, jd - dt);
        let after = self.position(jd_el, jd + dt);
        0.5 * (after - before) / dt
    }
}

/// Element sets of all nine bodies for one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetElements {
    jd: JulianDate,
    elements: [OrbitalElements; 9],
}

impl PlanetElements {
    /// Elements for epoch `jd`, perturbations included.
    pub fn at(jd: JulianDate) -> Self {
        let d = jd - J1900;
        let t = d / 36525.0;
        let tsq = t * t;
        let tcb = tsq * t;

        let mut el = [OrbitalElements::default(); 9];

        el[Planet::Mercury.index()] = OrbitalElements {
            incl: 7.002880 + 1.8608e-3 * t - 1.83e-5 * tsq,
            node: 47.14594 + 1.185208 * t + 1.74e-4 * tsq,
            perihelion: 75.899697 + 1.55549 * t + 2.95e-4 * tsq,
            a: 0.3870986,
            daily: 4.0923388,
            ecc: 0.20561421 + 0.00002046 * t,
            l0: 178.179078 + 4.0923770233 * d + 0.0000226 * (3.6525 * t).powi(2),
        };

        el[Planet::Venus.index()] = OrbitalElements {
            incl: 3.39363 + 1.00583e-03 * t - 9.722e-7 * tsq,
            node: 75.7796472 + 0.89985 * t + 4.1e-4 * tsq,
            perihelion: 130.16383 + 1.4080 * t + 9.764e-4 * tsq,
            a: 0.723325,
            daily: 1.60213049,
            ecc: 0.00682069 - 0.00004774 * t,
            l0: 342.767053 + 1.6021687039 * 36525.0 * t + 0.000023212 * (3.6525 * t).powi(2),
        };

        let earth_peri = 101.22083 + 0.0000470684 * d + 0.000453 * tsq + 0.000003 * tcb;
        el[Planet::Earth.index()] = OrbitalElements {
            incl: 0.0,
            node: 0.0,
            perihelion: earth_peri,
            a: 1.0000007,
            daily: 0.985599,
            ecc: 0.01675104 - 0.00004180 * t + 0.000000126 * tsq,
            l0: 358.47583 + 0.9856002670 * d - 0.000150 * tsq - 0.000003 * tcb + earth_peri,
        };

        el[Planet::Mars.index()] = OrbitalElements {
            incl: 1.85033 - 6.75e-04 * t - 1.833e-5 * tsq,
            node: 48.786442 + 0.770992 * t + 1.39e-6 * tsq,
            perihelion: 334.218203 + 1.840758 * t + 1.299e-4 * tsq,
            a: 1.5236915,
            daily: 0.5240329502 + 1.285e-9 * t,
            ecc: 0.09331290 - 0.000092064 * t - 0.000000077 * tsq,
            l0: 293.747628 + 0.5240711638 * d + 0.000023287 * (3.6525 * t).powi(2),
        };

        let gas = GiantArguments::new(t);
        el[Planet::Jupiter.index()] = jupiter(t, tsq, tcb, &gas);
        el[Planet::Saturn.index()] = saturn(t, tsq, tcb, &gas);
        el[Planet::Uranus.index()] = uranus(t, tsq, tcb, &gas);
        el[Planet::Neptune.index()] = neptune(t, tsq, tcb, &gas);

        // osculating for 1992 Sep 15
        let d_pluto = jd - 2_448_880.5;
        el[Planet::Pluto.index()] = OrbitalElements {
            incl: 17.1426,
            node: 110.180,
            perihelion: 223.782,
            a: 39.7465,
            daily: 0.00393329,
            ecc: 0.253834,
            l0: 228.1027 + 0.00393329 * d_pluto,
        };

        PlanetElements { jd, elements: el }
    }

    /// Epoch of the element set.
    pub fn epoch(&self) -> JulianDate {
        self.jd
    }

    pub fn get(&self, planet: Planet) -> &OrbitalElements {
        &self.elements[planet.index()]
    }

    /// Heliocentric ecliptic position (AU) of `planet` at `jd`.
    pub fn heliocentric_ecliptic(&self, planet: Planet, jd: JulianDate) -> Vector3<f64> {
        self.get(planet).position(self.jd, jd)
    }

    /// Heliocentric position (AU) in the equatorial frame of date.
    pub fn heliocentric(&self, planet: Planet, jd: JulianDate) -> Vector3<f64> {
        ecliptic_to_equatorial(jd, &self.heliocentric_ecliptic(planet, jd))
    }

    /// Heliocentric velocity (AU/day) in the equatorial frame of date.
    pub fn heliocentric_velocity(&self, planet: Planet, jd: JulianDate) -> Vector3<f64> {
        ecliptic_to_equatorial(jd, &self.get(planet).velocity(self.jd, jd))
    }

    /// Geocentric position of `planet`, equatorial frame and equinox of date, without
    /// light-time or aberration corrections.
    pub fn geocentric(&self, planet: Planet, jd: JulianDate) -> BodyPosition {
        let earth = self.heliocentric(Planet::Earth, jd);
        BodyPosition::from_xyz(self.heliocentric(planet, jd) - earth)
    }

    /// Angular distance from `target` to every body other than the Earth.
    pub fn separations(&self, target: &Celest, jd: JulianDate) -> Vec<(Planet, Radian)> {
        Planet::ALL
            .iter()
            .filter(|p| **p != Planet::Earth)
            .map(|p| (*p, target.subtend(&self.geocentric(*p, jd).to_celest(jd))))
            .collect()
    }
}

/// Geocentric position of one planet at `jd`, with elements computed for `jd`.
pub fn planet_position(planet: Planet, jd: JulianDate) -> BodyPosition {
    PlanetElements::at(jd).geocentric(planet, jd)
}

/// Arguments shared by the Jupiter/Saturn and Uranus/Neptune perturbation series.
struct GiantArguments {
    ups: f64,
    s: f64,
    q: f64,
    v: f64,
    w: f64,
    zeta: f64,
}

impl GiantArguments {
    fn new(t: f64) -> Self {
        let p = (237.47555 + 3034.9061 * t) / DEG_IN_RADIAN;
        let q = (265.91650 + 1222.1139 * t) / DEG_IN_RADIAN;
        let s = (243.51721 + 428.4677 * t) / DEG_IN_RADIAN;
        GiantArguments {
            ups: 0.2 * t + 0.1,
            s,
            q,
            v: 5.0 * q - 2.0 * p,
            w: 2.0 * p - 6.0 * q + 3.0 * s,
            zeta: q - p,
        }
    }
}

fn jupiter(t: f64, tsq: f64, tcb: f64, g: &GiantArguments) -> OrbitalElements {
    let ups = g.ups;
    let (sin_q, cos_q) = g.q.sin_cos();
    let (sin_v, cos_v) = g.v.sin_cos();
    let (sin_zeta, cos_zeta) = g.zeta.sin_cos();
    let (sin_2zeta, cos_2zeta) = (2.0 * g.zeta).sin_cos();
    let zeta = g.zeta;

    let l0 = 238.049257 + 3036.301986 * t + 0.0003347 * tsq - 1.65e-6 * tcb
        + (0.331364 - 0.010281 * ups - 0.004692 * ups * ups) * sin_v
        + (0.003228 - 0.064436 * ups + 0.002075 * ups * ups) * cos_v
        - (0.003083 + 0.000275 * ups - 0.000489 * ups * ups) * (2.0 * g.v).sin()
        + 0.002472 * g.w.sin()
        + 0.013619 * sin_zeta
        + 0.018472 * sin_2zeta
        + 0.006717 * (3.0 * zeta).sin()
        + (0.007275 - 0.001253 * ups) * sin_zeta * sin_q
        + 0.006417 * sin_2zeta * sin_q
        - (0.033839 + 0.001253 * ups) * cos_zeta * sin_q
        - (0.035681 + 0.001208 * ups) * sin_zeta * sin_q;

    let ecc = 0.04833475 + 1.64180e-4 * t - 4.676e-7 * tsq - 1.7e-9 * tcb
        + 1e-7
            * ((3606.0 + 130.0 * ups - 43.0 * ups * ups) * sin_v
                + (1289.0 - 580.0 * ups) * cos_v
                - 6764.0 * sin_zeta * sin_q
                - 1110.0 * sin_2zeta * sin_q
                + (1284.0 + 116.0 * ups) * cos_zeta * sin_q
                + (1460.0 + 130.0 * ups) * sin_zeta * cos_q
                + 6074.0 * cos_zeta * cos_q);

    let perihelion = 12.720972 + 1.6099617 * t + 1.05627e-3 * tsq - 3.43e-6 * tcb
        + (0.007192 - 0.003147 * ups) * sin_v
        + (0.000197 * ups * ups - 0.00675 * ups - 0.020428) * cos_v
        + 0.034036 * cos_zeta * sin_q
        + 0.037761 * sin_zeta * cos_q;

    // the 181 cos 2ζ sin Q term appears twice in the published series and is kept so
    let a = 5.202561
        + 1.0e-6
            * (205.0 * cos_zeta - 263.0 * cos_v + 693.0 * cos_2zeta + 312.0 * (3.0 * zeta).sin()
                + 147.0 * (4.0 * zeta).cos()
                + 299.0 * sin_zeta * sin_q
                + 181.0 * cos_2zeta * sin_q
                + 181.0 * cos_2zeta * sin_q
                + 204.0 * sin_2zeta * cos_q
                + 111.0 * (3.0 * zeta).sin() * cos_q
                - 337.0 * cos_zeta * cos_q
                - 111.0 * cos_2zeta * cos_q);

    OrbitalElements {
        incl: 1.308736 - 0.0056961 * t + 0.0000039 * tsq,
        node: 99.443414 + 1.0105300 * t + 0.0003522 * tsq - 0.00000851 * tcb,
        perihelion,
        a,
        daily: 0.08312941782,
        ecc,
        l0,
    }
}

fn saturn(t: f64, tsq: f64, tcb: f64, g: &GiantArguments) -> OrbitalElements {
    let ups = g.ups;
    let (sin_q, cos_q) = g.q.sin_cos();
    let (sin_2q, cos_2q) = (2.0 * g.q).sin_cos();
    let (sin_v, cos_v) = g.v.sin_cos();
    let (sin_zeta, cos_zeta) = g.zeta.sin_cos();
    let (sin_2zeta, cos_2zeta) = (2.0 * g.zeta).sin_cos();
    let zeta = g.zeta;

    let l0 = 266.564377 + 1223.509884 * t + 0.0003245 * tsq - 5.8e-6 * tcb
        + (0.018150 * ups - 0.814181 + 0.016714 * ups * ups) * sin_v
        + (0.160906 * ups - 0.010497 - 0.004100 * ups * ups) * cos_v
        + 0.007581 * (2.0 * g.v).sin()
        - 0.007986 * g.w.sin()
        - 0.148811 * sin_zeta
        - 0.040786 * sin_2zeta
        - 0.015208 * (3.0 * zeta).sin()
        - 0.006339 * (4.0 * zeta).sin()
        - 0.006244 * sin_q
        + (0.008931 + 0.002728 * ups) * sin_zeta * sin_q
        - 0.016500 * sin_2zeta * sin_q
        - 0.005775 * (3.0 * zeta).sin() * sin_q
        + (0.081344 + 0.003206 * ups) * cos_zeta * sin_q
        + 0.015019 * cos_2zeta * sin_q
        + (0.085581 + 0.002494 * ups) * sin_zeta * cos_q
        + (0.025328 - 0.003117 * ups) * cos_zeta * cos_q
        + 0.014394 * cos_2zeta * cos_q;

    let ecc = 0.05589232 - 3.4550e-4 * t - 7.28e-7 * tsq
        + 1.0e-7
            * ((2458.0 * ups - 7927.0) * sin_v
                + (13381.0 + 1226.0 * ups) * cos_v
                + 12415.0 * sin_q
                + 26599.0 * cos_zeta * sin_q
                - 4687.0 * cos_2zeta * sin_q
                - 12696.0 * sin_zeta * cos_q
                - 4200.0 * sin_2zeta * cos_q
                + (2211.0 - 286.0 * ups) * sin_zeta * sin_2q
                - 2208.0 * sin_2zeta * sin_2q
                - 2780.0 * cos_zeta * sin_2q
                + 2022.0 * cos_2zeta * sin_2q
                - 2842.0 * sin_zeta * cos_2q
                - 1594.0 * cos_zeta * cos_2q
                + 2162.0 * cos_2zeta * cos_2q);

    let perihelion = 91.098214 + 1.9584158 * t + 8.2636e-4 * tsq
        + (0.077108 + 0.007186 * ups - 0.001533 * ups * ups) * sin_v
        + (0.045803 - 0.014766 * ups - 0.000536 * ups * ups) * cos_v
        - 0.075825 * sin_zeta * sin_q
        - 0.024839 * sin_2zeta * sin_q
        - 0.072582 * cos_q
        - 0.150383 * cos_zeta * cos_q
        + 0.026897 * cos_2zeta * cos_q;

    let a = 9.554747
        + 1.0e-6
            * (2933.0 * cos_v + 33629.0 * cos_zeta - 3081.0 * cos_2zeta
                - 1423.0 * (3.0 * zeta).cos()
                + 1098.0 * sin_q
                - 2812.0 * sin_zeta * sin_q
                + 2138.0 * cos_zeta * sin_q
                + 2206.0 * sin_zeta * cos_q
                - 1590.0 * sin_2zeta * cos_q
                + 2885.0 * cos_zeta * cos_q
                + 2172.0 * cos_2zeta * cos_q);

    OrbitalElements {
        incl: 2.492519 - 0.00034550 * t - 7.28e-7 * tsq,
        node: 112.790414 + 0.8731951 * t - 0.00015218 * tsq - 5.31e-6 * tcb,
        perihelion,
        a,
        daily: 0.0334978749897,
        ecc,
        l0,
    }
}

/// Argument `H = 2G - S` of the Uranus–Neptune interaction (Meeus p. 116).
fn uranus_neptune_h(t: f64, g: &GiantArguments) -> f64 {
    let gg = (83.76922 + 218.4901 * t) / DEG_IN_RADIAN;
    2.0 * gg - g.s
}

fn uranus(t: f64, tsq: f64, tcb: f64, g: &GiantArguments) -> OrbitalElements {
    let ups = g.ups;
    let h = uranus_neptune_h(t, g);
    let (sin_h, cos_h) = h.sin_cos();
    let (sin_2h, cos_2h) = (2.0 * h).sin_cos();

    OrbitalElements {
        incl: 0.772464 + 0.0006253 * t + 0.0000395 * tsq,
        node: 73.477111 + 0.4986678 * t + 0.0013117 * tsq,
        perihelion: 171.548692 + 1.4844328 * t + 2.37e-4 * tsq - 6.1e-7 * tcb
            + 0.120303 * sin_h
            + (0.019472 - 0.000947 * ups) * cos_h
            + 0.006197 * sin_2h,
        a: 19.21814 - 0.003825 * cos_h,
        daily: 1.1769022484e-2,
        ecc: 0.0463444 - 2.658e-5 * t
            + 1.0e-7 * (20981.0 * cos_h - 3349.0 * sin_h + 1311.0 * cos_2h),
        l0: 244.197470 + 429.863546 * t + 0.000316 * tsq - 6e-7 * tcb
            + (0.864319 - 0.001583 * ups) * sin_h
            + (0.082222 - 0.006833 * ups) * cos_h
            + 0.036017 * sin_2h,
    }
}

fn neptune(t: f64, tsq: f64, tcb: f64, g: &GiantArguments) -> OrbitalElements {
    let ups = g.ups;
    let h = uranus_neptune_h(t, g);
    let (sin_h, cos_h) = h.sin_cos();
    let (sin_2h, cos_2h) = (2.0 * h).sin_cos();

    OrbitalElements {
        incl: 1.779242 - 9.5436e-3 * t - 9.1e-6 * tsq,
        node: 130.681389 + 1.0989350 * t + 2.4987e-4 * tsq - 4.718e-6 * tcb,
        perihelion: 46.727364 + 1.4245744 * t + 3.9082e-3 * tsq - 6.05e-7 * tcb
            + 0.024039 * sin_h
            - 0.025303 * cos_h,
        a: 30.10957 + 8.189e-3 * cos_h,
        daily: 6.020148227e-3,
        ecc: 0.00899704 + 6.33e-6 * t
            + 1.0e-7 * (4389.0 * sin_h + 1129.0 * sin_2h + 4262.0 * cos_h + 1089.0 * cos_2h),
        l0: 84.457994 + 219.885914 * t + 0.0003205 * tsq - 6e-7 * tcb
            - (0.589833 - 0.001089 * ups) * sin_h
            - (0.056094 - 0.004658 * ups) * cos_h
            - 0.024286 * sin_2h,
    }
}
