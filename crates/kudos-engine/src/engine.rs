//! Reward engine: applies the distribution policy and the boost multiplier
//! to a reward-producing event and hands the results to the payment layer.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use kudos_boost::{apply_multiplier, BoostGrant, BoostRegistry, BoostStatus, BoostStore};
use kudos_core::error::{KudosError, ParseError};
use kudos_core::traits::{BoostEventSink, Clock, PaymentTransfer, SupplySource, TokenBurner};
use kudos_core::types::{Amount, Asset, Ratio, Timestamp, Transfer, UserId};
use kudos_split::{split_payment, Distribution, DistributionPolicy, PaymentSplit};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;

/// The kinds of event that produce a reward.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Pet,
    Mint,
    Reveal,
}

impl RewardKind {
    pub const ALL: [RewardKind; 3] = [Self::Pet, Self::Mint, Self::Reveal];
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pet => f.write_str("pet"),
            Self::Mint => f.write_str("mint"),
            Self::Reveal => f.write_str("reveal"),
        }
    }
}

impl FromStr for RewardKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pet" => Ok(Self::Pet),
            "mint" => Ok(Self::Mint),
            "reveal" => Ok(Self::Reveal),
            other => Err(ParseError::UnknownRewardKind(other.to_string())),
        }
    }
}

/// A reward-producing event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardEvent {
    pub kind: RewardKind,
    /// User who earns the token reward (and whose boost applies).
    pub user: UserId,
    /// Uploader of the content the event concerns.
    pub uploader: UserId,
    /// Base-currency payment to split.
    pub payment: Amount,
}

/// Everything computed for one event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardOutcome {
    pub kind: RewardKind,
    pub total_supply: Amount,
    pub at: Timestamp,
    pub distribution: Distribution,
    pub split: PaymentSplit,
    pub multiplier: Ratio,
    pub base_token_reward: Amount,
    pub token_reward: Amount,
}

/// Supply, time and payment collaborators are shared trait objects. The
/// boost registry is built here from a generic store, burner and sink, with
/// the multiplier scheme taken from the config.
pub struct RewardEngine<S, B, E> {
    config: EngineConfig,
    policy: DistributionPolicy,
    registry: BoostRegistry<S, B, E>,
    supply: Arc<dyn SupplySource>,
    clock: Arc<dyn Clock>,
    payments: Arc<dyn PaymentTransfer>,
}

impl<S, B, E> RewardEngine<S, B, E>
where
    S: BoostStore,
    B: TokenBurner,
    E: BoostEventSink,
{
    pub fn new(
        config: EngineConfig,
        store: S,
        burner: B,
        sink: E,
        supply: Arc<dyn SupplySource>,
        clock: Arc<dyn Clock>,
        payments: Arc<dyn PaymentTransfer>,
    ) -> Self {
        let registry = BoostRegistry::with_scheme(store, burner, sink, config.multiplier_scheme);
        Self {
            config,
            policy: DistributionPolicy::new(),
            registry,
            supply,
            clock,
            payments,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &BoostRegistry<S, B, E> {
        &self.registry
    }

    /// Compute the outcome of `event` at the current supply and time
    /// without moving anything.
    pub fn quote(&self, event: &RewardEvent) -> Result<RewardOutcome, KudosError> {
        let total_supply = self.supply.total_supply()?;
        let now = self.clock.now();
        self.compute(event, total_supply, now)
    }

    fn compute(
        &self,
        event: &RewardEvent,
        total_supply: Amount,
        now: Timestamp,
    ) -> Result<RewardOutcome, KudosError> {
        let distribution = self.policy.get_distribution(total_supply);
        let split = split_payment(event.payment, distribution)?;
        let multiplier = self.registry.get_multiplier(&event.user, now);
        let base_token_reward = self.config.rewards.base_reward(event.kind)?;
        let token_reward = apply_multiplier(base_token_reward, multiplier)?;

        Ok(RewardOutcome {
            kind: event.kind,
            total_supply,
            at: now,
            distribution,
            split,
            multiplier,
            base_token_reward,
            token_reward,
        })
    }

    /// Compute the outcome of `event` and pay it out as one batch: platform
    /// leg, uploader leg, then the token reward. Zero-amount legs are
    /// skipped. If the payment layer rejects the batch, nothing is paid.
    pub fn process(&self, event: &RewardEvent) -> Result<RewardOutcome, KudosError> {
        let outcome = self.quote(event)?;

        let legs: Vec<Transfer> = [
            (Asset::Base, self.config.platform_account, outcome.split.platform),
            (Asset::Base, event.uploader, outcome.split.uploader),
            (Asset::Token, event.user, outcome.token_reward),
        ]
        .into_iter()
        .filter(|(_, _, amount)| !amount.is_zero())
        .map(|(asset, to, amount)| Transfer { asset, to, amount })
        .collect();

        if let Err(e) = self.payments.transfer_all(&legs) {
            warn!(
                kind = %event.kind,
                user = %event.user.short(),
                legs = legs.len(),
                error = %e,
                "payout rejected"
            );
            return Err(e.into());
        }

        info!(
            kind = %event.kind,
            user = %event.user.short(),
            uploader = %event.uploader.short(),
            supply = %outcome.total_supply,
            platform = %outcome.split.platform,
            uploader_leg = %outcome.split.uploader,
            multiplier = %outcome.multiplier,
            token_reward = %outcome.token_reward,
            "reward processed"
        );
        Ok(outcome)
    }

    /// [`BoostRegistry::burn_for_boost`] at the current time.
    pub fn burn_for_boost(&self, user: &UserId, amount: Amount) -> Result<BoostGrant, KudosError> {
        let now = self.clock.now();
        Ok(self.registry.burn_for_boost(user, amount, now)?)
    }

    pub fn multiplier(&self, user: &UserId) -> Ratio {
        self.registry.get_multiplier(user, self.clock.now())
    }

    pub fn boost_status(&self, user: &UserId) -> BoostStatus {
        self.registry.boost_status(user, self.clock.now())
    }
}
