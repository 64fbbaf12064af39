//! # kudos-engine
//!
//! Composes the distribution policy and the boost registry behind a single
//! [`RewardEngine`] that turns reward events (pet, mint, reveal) into
//! payment legs and a boosted token reward.
//!
//! Also provides [`EngineConfig`], an in-memory [`MemoryLedger`] that plays
//! the external ledger for simulations, and the JSON [`StateFile`].

pub mod config;
pub mod engine;
pub mod ledger;
pub mod state;

pub use config::{EngineConfig, LogFormat, RewardsConfig};
pub use engine::{RewardEngine, RewardEvent, RewardKind, RewardOutcome};
pub use ledger::MemoryLedger;
pub use state::StateFile;
