//! Criterion benchmarks for kudos-boost.
//!
//! Covers: tier selection, the burn path against a no-op burner, and the
//! multiplier query.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kudos_boost::{tier_for_amount, BoostRegistry, MemoryBoostStore};
use kudos_core::error::BurnError;
use kudos_core::traits::{NoopEventSink, TokenBurner};
use kudos_core::types::{Amount, Timestamp, UserId};

struct FreeBurner;

impl TokenBurner for FreeBurner {
    fn burn(&self, _user: &UserId, _amount: Amount) -> Result<(), BurnError> {
        Ok(())
    }
}

fn bench_tier_selection(c: &mut Criterion) {
    let amount = Amount::from_tokens(7_500);

    c.bench_function("boost_tier_selection", |b| {
        b.iter(|| tier_for_amount(black_box(amount)))
    });
}

fn bench_burn_for_boost(c: &mut Criterion) {
    let registry = BoostRegistry::new(MemoryBoostStore::new(), FreeBurner, NoopEventSink);
    let user = UserId([7; 32]);
    let amount = Amount::from_tokens(30_000);

    c.bench_function("burn_for_boost", |b| {
        b.iter(|| registry.burn_for_boost(black_box(&user), black_box(amount), Timestamp(1_000)))
    });
}

fn bench_get_multiplier(c: &mut Criterion) {
    let registry = BoostRegistry::new(MemoryBoostStore::new(), FreeBurner, NoopEventSink);
    let user = UserId([7; 32]);
    let _ = registry.burn_for_boost(&user, Amount::from_tokens(30_000), Timestamp(1_000));

    c.bench_function("get_multiplier", |b| {
        b.iter(|| registry.get_multiplier(black_box(&user), Timestamp(2_000)))
    });
}

criterion_group!(
    benches,
    bench_tier_selection,
    bench_burn_for_boost,
    bench_get_multiplier
);
criterion_main!(benches);
