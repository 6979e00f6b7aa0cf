//! Benchmarking least squares fits
extern crate criterion;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use calval::prelude::*;

fn benchmark(c: &mut Criterion) {
    let mut regression_grp = c.benchmark_group("regression");

    let x = (0..500).map(|i| i as f64 / 50.0).collect::<Vec<_>>();
    let y = x
        .iter()
        .map(|x| 3.0 * x + 2.0 + (x * 7.0).sin())
        .collect::<Vec<_>>();

    regression_grp.bench_function("linreg/500", |b| {
        b.iter(|| {
            let _ = black_box(linreg(&x, &y).unwrap());
        })
    });

    // 4 hours of 6 minute wind samples
    let pivot = Epoch::from_gregorian_utc(2017, 6, 1, 12, 0, 0, 0);
    let t = (-20..=20)
        .map(|k| pivot + Duration::from_seconds(k as f64 * 360.0))
        .collect::<Vec<_>>();
    let speed = (0..t.len())
        .map(|i| 5.0 + (i as f64 / 4.0).cos())
        .collect::<Vec<_>>();

    regression_grp.bench_function("quadreg/41", |b| {
        b.iter(|| {
            let _ = black_box(quadreg(&t, &speed, pivot).unwrap());
        })
    });

    regression_grp.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
