//! Thread-contention tests for the boost registry.
//!
//! Burns for one user are serialized across the burn primitive and the
//! record write; burns for different users are not.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kudos_boost::{tier_for_amount, BoostRegistry, BoostStore, MemoryBoostStore, RecordingEventSink};
use kudos_core::types::{BoostRecord, Timestamp};
use kudos_tests::helpers::*;

const T: Timestamp = Timestamp(1_000_000);

#[test]
fn same_user_burn_waits_for_in_flight_burn() {
    let alice = user(1);
    let burner = Arc::new(GatedBurner::new(alice));
    let reg = BoostRegistry::new(
        MemoryBoostStore::new(),
        burner.clone(),
        Arc::new(RecordingEventSink::new()),
    );

    thread::scope(|s| {
        let first = s.spawn(|| reg.burn_for_boost(&alice, tokens(30_000), T));
        burner.wait_entered(Duration::from_secs(5)).unwrap();

        let second = s.spawn(|| reg.burn_for_boost(&alice, tokens(5_000), Timestamp(T.0 + 1)));
        thread::sleep(Duration::from_millis(100));

        // The second burn is parked on the user lock, not in the burner.
        assert_eq!(burner.calls().len(), 1);
        assert!(reg.record(&alice).is_none());

        burner.release();
        first.join().unwrap().unwrap();
        burner.wait_entered(Duration::from_secs(5)).unwrap();
        burner.release();
        second.join().unwrap().unwrap();
    });

    assert_eq!(burner.calls().len(), 2);
    let tier = tier_for_amount(tokens(5_000)).unwrap();
    assert_eq!(
        reg.record(&alice).unwrap().expiration,
        Timestamp(T.0 + 1 + tier.duration_secs)
    );
}

#[test]
fn other_users_are_not_blocked_by_in_flight_burn() {
    let alice = user(1);
    let bob = user(2);
    let burner = Arc::new(GatedBurner::new(alice));
    let reg = BoostRegistry::new(
        MemoryBoostStore::new(),
        burner.clone(),
        Arc::new(RecordingEventSink::new()),
    );

    thread::scope(|s| {
        let parked = s.spawn(|| reg.burn_for_boost(&alice, tokens(30_000), T));
        burner.wait_entered(Duration::from_secs(5)).unwrap();

        // Completes while alice's burn is still parked.
        reg.burn_for_boost(&bob, tokens(15_000), T).unwrap();
        assert!(reg.has_active_boost(&bob, T));
        assert!(!reg.has_active_boost(&alice, T));

        burner.release();
        parked.join().unwrap().unwrap();
    });

    assert!(reg.has_active_boost(&alice, T));
}

#[test]
fn many_users_many_threads() {
    let burner = Arc::new(RecordingBurner::new());
    let sink = Arc::new(RecordingEventSink::new());
    let reg = BoostRegistry::new(MemoryBoostStore::new(), burner.clone(), sink.clone());

    let users: Vec<_> = (0..16u8).map(user).collect();
    let amounts = [5_000u64, 15_000, 30_000, 12_345];

    thread::scope(|s| {
        for (i, u) in users.iter().enumerate() {
            for (j, amt) in amounts.iter().enumerate() {
                let reg = &reg;
                s.spawn(move || {
                    let now = Timestamp(T.0 + (i * amounts.len() + j) as u64);
                    reg.burn_for_boost(u, tokens(*amt), now).unwrap();
                });
            }
        }
    });

    assert_eq!(burner.calls().len(), users.len() * amounts.len());
    assert_eq!(sink.len(), users.len() * amounts.len());
    assert_eq!(reg.store().len(), users.len());

    for (i, u) in users.iter().enumerate() {
        let record = reg.record(u).unwrap();
        let candidates: Vec<BoostRecord> = amounts
            .iter()
            .enumerate()
            .map(|(j, amt)| {
                let tier = tier_for_amount(tokens(*amt)).unwrap();
                let burned_at = T.0 + (i * amounts.len() + j) as u64;
                BoostRecord {
                    expiration: Timestamp(burned_at + tier.duration_secs),
                    multiplier: tier.reward_multiplier,
                }
            })
            .collect();
        assert!(candidates.contains(&record), "torn record for user {i}: {record:?}");
    }
}

#[test]
fn readers_see_whole_records_during_writes() {
    let alice = user(1);
    let reg = BoostRegistry::new(
        MemoryBoostStore::new(),
        Arc::new(RecordingBurner::new()),
        Arc::new(RecordingEventSink::new()),
    );
    let short = tier_for_amount(tokens(5_000)).unwrap();
    let long = tier_for_amount(tokens(30_000)).unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..500u64 {
                let amt = if i % 2 == 0 { tokens(5_000) } else { tokens(30_000) };
                reg.burn_for_boost(&alice, amt, T).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..500 {
                if let Some(rec) = reg.record(&alice) {
                    let whole = (rec.expiration == Timestamp(T.0 + short.duration_secs)
                        && rec.multiplier == short.reward_multiplier)
                        || (rec.expiration == Timestamp(T.0 + long.duration_secs)
                            && rec.multiplier == long.reward_multiplier);
                    assert!(whole, "torn read: {rec:?}");
                }
            }
        });
    });
}
