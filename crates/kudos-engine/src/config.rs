//! Engine configuration.
//!
//! [`EngineConfig`] has defaults for every field. [`EngineConfig::load`]
//! layers, lowest precedence first: defaults, an optional TOML file, then
//! `KUDOS_*` environment variables (`__` separates nested keys, e.g.
//! `KUDOS_REWARDS__PET=3`).

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use kudos_boost::MultiplierScheme;
use kudos_core::error::KudosError;
use kudos_core::types::{Amount, UserId};
use serde::{Deserialize, Serialize};

use crate::engine::RewardKind;

/// Log output format for binaries.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Base token reward per event kind, in whole tokens.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RewardsConfig {
    pub pet: u64,
    pub mint: u64,
    pub reveal: u64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            pet: 1,
            mint: 10,
            reveal: 5,
        }
    }
}

impl RewardsConfig {
    /// Base token reward for `kind`, before any boost multiplier.
    pub fn base_reward(&self, kind: RewardKind) -> Result<Amount, KudosError> {
        let tokens = match kind {
            RewardKind::Pet => self.pet,
            RewardKind::Mint => self.mint,
            RewardKind::Reveal => self.reveal,
        };
        Amount::checked_from_tokens(tokens).ok_or_else(|| {
            KudosError::Config(format!("{kind} reward of {tokens} tokens overflows"))
        })
    }
}

/// Configuration for a [`RewardEngine`](crate::RewardEngine) and the CLI.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Account that receives the platform leg of every payment.
    pub platform_account: UserId,
    pub multiplier_scheme: MultiplierScheme,
    pub rewards: RewardsConfig,
    /// Log level filter string (e.g. "info", "debug", "kudos_boost=trace").
    pub log_level: String,
    pub log_format: LogFormat,
    /// JSON file holding boost records and simulated token balances.
    pub state_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let state_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kudos")
            .join("state.json");

        Self {
            platform_account: UserId::ZERO,
            multiplier_scheme: MultiplierScheme::default(),
            rewards: RewardsConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            state_path,
        }
    }
}

impl EngineConfig {
    /// Load defaults, then `path` (if given, must exist), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, KudosError> {
        let defaults = Config::try_from(&Self::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("KUDOS")
                .prefix_separator("_")
                .separator("__"),
        );

        let cfg: Self = builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject reward amounts that do not fit the fixed-point representation.
    pub fn validate(&self) -> Result<(), KudosError> {
        for kind in RewardKind::ALL {
            self.rewards.base_reward(kind)?;
        }
        Ok(())
    }
}

fn config_err(e: ::config::ConfigError) -> KudosError {
    KudosError::Config(e.to_string())
}
