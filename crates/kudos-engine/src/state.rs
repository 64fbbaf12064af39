//! JSON state file: boost records plus simulated token balances.

use std::fs;
use std::path::Path;

use kudos_boost::{BoostStore, MemoryBoostStore};
use kudos_core::error::KudosError;
use kudos_core::types::{Amount, BoostRecord, UserId};
use serde::{Deserialize, Serialize};

use crate::ledger::MemoryLedger;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BoostEntry {
    pub user: UserId,
    #[serde(flatten)]
    pub record: BoostRecord,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BalanceEntry {
    pub user: UserId,
    pub amount: Amount,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StateFile {
    #[serde(default)]
    pub boosts: Vec<BoostEntry>,
    #[serde(default)]
    pub token_balances: Vec<BalanceEntry>,
}

impl StateFile {
    /// Read `path`; a missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, KudosError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .map_err(|e| KudosError::State(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| KudosError::State(format!("parse {}: {e}", path.display())))
    }

    /// Write to a sibling temp file, then rename over `path`.
    pub fn save(&self, path: &Path) -> Result<(), KudosError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| KudosError::State(format!("create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| KudosError::State(format!("encode: {e}")))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| KudosError::State(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| KudosError::State(format!("rename {}: {e}", path.display())))
    }

    pub fn capture(store: &impl BoostStore, ledger: &MemoryLedger) -> Self {
        Self {
            boosts: store
                .snapshot()
                .into_iter()
                .map(|(user, record)| BoostEntry { user, record })
                .collect(),
            token_balances: ledger
                .token_balances()
                .into_iter()
                .map(|(user, amount)| BalanceEntry { user, amount })
                .collect(),
        }
    }

    pub fn boost_store(&self) -> MemoryBoostStore {
        MemoryBoostStore::from_records(self.boosts.iter().map(|e| (e.user, e.record)))
    }

    pub fn ledger(&self) -> Result<MemoryLedger, KudosError> {
        Ok(MemoryLedger::from_token_balances(
            self.token_balances.iter().map(|e| (e.user, e.amount)),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_core::traits::TokenBurner;
    use kudos_core::types::{Asset, Ratio, Timestamp};

    #[test]
    fn missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::load(&dir.path().join("state.json")).unwrap();
        assert_eq!(state, StateFile::default());
    }

    #[test]
    fn save_then_load_preserves_records_and_balances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = MemoryBoostStore::new();
        let user = UserId([4; 32]);
        store.put(
            user,
            BoostRecord {
                expiration: Timestamp(99),
                multiplier: Ratio(15_000),
            },
        );
        let ledger = MemoryLedger::from_token_balances([(user, Amount(500))]).unwrap();
        ledger.burn(&user, Amount(200)).unwrap();

        StateFile::capture(&store, &ledger).save(&path).unwrap();
        let loaded = StateFile::load(&path).unwrap();

        assert_eq!(loaded.boost_store().get(&user), store.get(&user));
        let restored = loaded.ledger().unwrap();
        assert_eq!(restored.balance(Asset::Token, &user), Amount(300));
        assert_eq!(restored.token_supply(), Amount(300));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn record_fields_are_flattened() {
        let entry = BoostEntry {
            user: UserId::ZERO,
            record: BoostRecord {
                expiration: Timestamp(5),
                multiplier: Ratio::ONE,
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["expiration"], 5);
        assert_eq!(json["multiplier"], 10_000);
    }

    #[test]
    fn corrupt_file_is_state_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(StateFile::load(&path), Err(KudosError::State(_))));
    }
}
