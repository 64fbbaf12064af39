//! Boost record storage.
//!
//! The registry owns its store exclusively; the trait exists so tests and
//! hosts can inject their own backing map.

use dashmap::DashMap;
use kudos_core::types::{BoostRecord, UserId};

/// Map from user identity to that user's boost record.
///
/// `put` overwrites. Records are never removed.
pub trait BoostStore: Send + Sync {
    fn get(&self, user: &UserId) -> Option<BoostRecord>;

    fn put(&self, user: UserId, record: BoostRecord);

    /// Number of users with a record, active or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, sorted by user for stable output.
    fn snapshot(&self) -> Vec<(UserId, BoostRecord)>;
}

/// Concurrent in-memory store backed by a sharded `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryBoostStore {
    records: DashMap<UserId, BoostRecord>,
}

impl MemoryBoostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a previous [`snapshot`](BoostStore::snapshot).
    /// Later duplicates win.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (UserId, BoostRecord)>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }
}

impl BoostStore for MemoryBoostStore {
    fn get(&self, user: &UserId) -> Option<BoostRecord> {
        self.records.get(user).map(|r| *r)
    }

    fn put(&self, user: UserId, record: BoostRecord) {
        self.records.insert(user, record);
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn snapshot(&self) -> Vec<(UserId, BoostRecord)> {
        let mut out: Vec<(UserId, BoostRecord)> =
            self.records.iter().map(|e| (*e.key(), *e.value())).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_core::types::{Ratio, Timestamp};

    fn rec(exp: u64) -> BoostRecord {
        BoostRecord {
            expiration: Timestamp(exp),
            multiplier: Ratio::ONE,
        }
    }

    #[test]
    fn missing_user_is_none() {
        let store = MemoryBoostStore::new();
        assert!(store.get(&UserId([9; 32])).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn put_overwrites() {
        let store = MemoryBoostStore::new();
        let user = UserId([1; 32]);
        store.put(user, rec(500));
        store.put(user, rec(100));
        assert_eq!(store.get(&user), Some(rec(100)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_is_sorted_and_restorable() {
        let store = MemoryBoostStore::new();
        store.put(UserId([3; 32]), rec(3));
        store.put(UserId([1; 32]), rec(1));
        store.put(UserId([2; 32]), rec(2));

        let snap = store.snapshot();
        let users: Vec<u8> = snap.iter().map(|(u, _)| u.0[0]).collect();
        assert_eq!(users, vec![1, 2, 3]);

        let restored = MemoryBoostStore::from_records(snap.clone());
        assert_eq!(restored.snapshot(), snap);
    }

    #[test]
    fn from_records_later_duplicate_wins() {
        let user = UserId([1; 32]);
        let store = MemoryBoostStore::from_records(vec![(user, rec(1)), (user, rec(2))]);
        assert_eq!(store.get(&user), Some(rec(2)));
    }
}
