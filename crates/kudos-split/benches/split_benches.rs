//! Criterion benchmarks for kudos-split.
//!
//! Covers: distribution lookup at the cheapest and most expensive rows, and
//! a full payment split.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kudos_core::types::Amount;
use kudos_split::{get_distribution, split_payment};

fn bench_distribution_lookup(c: &mut Criterion) {
    let low = Amount::from_tokens(1_000);
    let high = Amount::from_tokens(5_000_000);

    c.bench_function("distribution_first_tier", |b| {
        b.iter(|| get_distribution(black_box(low)))
    });
    c.bench_function("distribution_last_tier", |b| {
        b.iter(|| get_distribution(black_box(high)))
    });
}

fn bench_split_payment(c: &mut Criterion) {
    let dist = get_distribution(Amount::from_tokens(300_000));
    let payment = Amount::from_tokens(12);

    c.bench_function("split_payment", |b| {
        b.iter(|| split_payment(black_box(payment), black_box(dist)))
    });
}

criterion_group!(benches, bench_distribution_lookup, bench_split_payment);
criterion_main!(benches);
