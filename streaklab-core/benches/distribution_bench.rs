//! Criterion benchmarks for the per-instrument streak pipeline.
//!
//! Run with: `cargo bench -p streaklab-core`

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use streaklab_core::data::{PriceSource, SyntheticSource};
use streaklab_core::{StreakDistribution, StreakProfile, ZeroReturnPolicy};

fn twenty_years() -> streaklab_core::PriceSeries {
    let origin = NaiveDate::from_ymd_opt(2004, 1, 1).unwrap();
    SyntheticSource::new(origin)
        .fetch("BENCH", origin, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
        .unwrap()
        .series
}

fn bench_profile(c: &mut Criterion) {
    let series = twenty_years();
    c.bench_function("profile_20y_daily", |b| {
        b.iter(|| StreakProfile::from_prices(black_box(&series), ZeroReturnPolicy::Down).unwrap())
    });
}

fn bench_estimate(c: &mut Criterion) {
    let lengths: Vec<usize> = (0..10_000).map(|i| 1 + (i * 7919) % 13).collect();
    c.bench_function("estimate_10k_streaks", |b| {
        b.iter(|| StreakDistribution::estimate(black_box(&lengths)).unwrap())
    });
}

criterion_group!(benches, bench_profile, bench_estimate);
criterion_main!(benches);
