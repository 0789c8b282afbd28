//! Benchmarks for the low-precision ephemerides and the almanac built on them.
//!
//! Examples:
//!   cargo bench --bench ephemeris
//!   cargo bench --bench ephemeris -- ephemeris/moon_position
//!   cargo bench --bench ephemeris -- almanac/seasonal_table

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skycalc::almanac::night::NightlyAlmanac;
use skycalc::almanac::seasonal::SeasonalTable;
use skycalc::almanac::AlmanacParams;
use skycalc::celest::Celest;
use skycalc::constants::Planet;
use skycalc::ephemeris::moon::{lunation, moon_position};
use skycalc::ephemeris::planets::PlanetElements;
use skycalc::ephemeris::sun::sun_position;
use skycalc::skycalc::Skycalc;

/// Random UT Julian Dates between 1968 and 2050.
fn random_dates(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| rng.random_range(2_440_000.0..2_470_000.0))
        .collect()
}

fn bench_bodies(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut group = c.benchmark_group("ephemeris");

    group.bench_function("sun_position", |b| {
        b.iter_batched(
            || random_dates(&mut rng, 1000),
            |dates| {
                for jd in dates {
                    black_box(sun_position(black_box(jd)));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("moon_position", |b| {
        b.iter_batched(
            || random_dates(&mut rng, 1000),
            |dates| {
                for jd in dates {
                    black_box(moon_position(black_box(jd)));
                }
            },
            BatchSize::SmallInput,
        )
    });

    // elements once per date, then every planet
    group.bench_function("planets_geocentric", |b| {
        b.iter_batched(
            || random_dates(&mut rng, 100),
            |dates| {
                for jd in dates {
                    let elements = PlanetElements::at(black_box(jd));
                    for planet in Planet::ALL {
                        if planet != Planet::Earth {
                            black_box(elements.geocentric(planet, jd));
                        }
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("lunation", |b| {
        b.iter_batched(
            || random_dates(&mut rng, 100),
            |dates| {
                for jd in dates {
                    black_box(lunation(black_box(jd)));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_almanac(c: &mut Criterion) {
    let calc = Skycalc::new();
    let params = AlmanacParams::default();
    let ww = calc
        .when_where_at("Kitt Peak", 2_459_022.75)
        .expect("Kitt Peak is in the bundled sites");
    let crab = Celest::new(5.5755, 22.0145, 2000.0);

    let mut group = c.benchmark_group("almanac");

    group.bench_function("nightly_almanac", |b| {
        b.iter(|| black_box(NightlyAlmanac::new(black_box(&ww), &params)))
    });

    group.sample_size(20);
    group.bench_function("seasonal_table", |b| {
        b.iter(|| black_box(SeasonalTable::compute(black_box(&ww), &crab, &params)))
    });

    group.finish();
}

criterion_group!(ephemeris_benches, bench_bodies, bench_almanac);
criterion_main!(ephemeris_benches);
