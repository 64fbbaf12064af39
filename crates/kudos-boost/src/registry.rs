//! The boost registry: burn → multiplier window → lazy expiry.

use std::sync::Arc;

use dashmap::DashMap;
use kudos_core::constants::{BOOSTED_MULTIPLIER, MINIMUM_BURN, UNBOOSTED_MULTIPLIER};
use kudos_core::error::BoostError;
use kudos_core::traits::{BoostEventSink, TokenBurner};
use kudos_core::types::{
    Amount, BoostGranted, BoostRecord, BoostTier, DurationSecs, Ratio, Timestamp, UserId,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::BoostStore;
use crate::tiers::{tier_for_amount, MultiplierScheme};

/// Result of a successful [`BoostRegistry::burn_for_boost`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostGrant {
    pub new_expiration: Timestamp,
    pub duration_secs: DurationSecs,
    /// Multiplier of the tier the burn qualified for.
    pub tier_multiplier: Ratio,
}

/// A user's boost state as seen at one instant.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BoostStatus {
    /// The user has never burned for a boost.
    Inactive,
    Active {
        expiration: Timestamp,
        remaining_secs: DurationSecs,
        multiplier: Ratio,
    },
    Expired { expired_at: Timestamp },
}

/// Owns the per-user boost records and the burn-then-write protocol.
///
/// Burns for the same user are serialized by a per-user lock held across
/// burn, record write and notification. Different users never contend on
/// that lock. A user's lock entry lives only while a burn for them is in
/// flight.
pub struct BoostRegistry<S, B, E> {
    store: S,
    burner: B,
    sink: E,
    scheme: MultiplierScheme,
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl<S, B, E> BoostRegistry<S, B, E>
where
    S: BoostStore,
    B: TokenBurner,
    E: BoostEventSink,
{
    pub fn new(store: S, burner: B, sink: E) -> Self {
        Self::with_scheme(store, burner, sink, MultiplierScheme::default())
    }

    pub fn with_scheme(store: S, burner: B, sink: E, scheme: MultiplierScheme) -> Self {
        Self {
            store,
            burner,
            sink,
            scheme,
            user_locks: DashMap::new(),
        }
    }

    pub fn scheme(&self) -> MultiplierScheme {
        self.scheme
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored record for `user`, whether or not it has expired.
    pub fn record(&self, user: &UserId) -> Option<BoostRecord> {
        self.store.get(user)
    }

    fn user_lock(&self, user: &UserId) -> Arc<Mutex<()>> {
        self.user_locks.entry(*user).or_default().clone()
    }

    /// Burn `amount` of `user`'s tokens and set their boost to expire at
    /// `now + tier duration`, replacing any existing boost.
    ///
    /// # Errors
    ///
    /// - [`BoostError::InvalidAmount`] if `amount` is below every tier; the
    ///   burn primitive is not called.
    /// - [`BoostError::ArithmeticOverflow`] if the expiration does not fit;
    ///   the burn primitive is not called.
    /// - [`BoostError::BurnFailed`] if the burn primitive fails; the record
    ///   is left untouched.
    pub fn burn_for_boost(
        &self,
        user: &UserId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<BoostGrant, BoostError> {
        let tier = tier_for_amount(amount).ok_or(BoostError::InvalidAmount {
            amount,
            minimum: MINIMUM_BURN,
        })?;
        let new_expiration = now
            .checked_add(tier.duration_secs)
            .ok_or(BoostError::ArithmeticOverflow)?;

        let result = {
            let lock = self.user_lock(user);
            let _guard = lock.lock();
            self.burn_and_record(user, amount, tier, new_expiration)
        };
        // Drop the lock entry unless another burn for this user holds it.
        self.user_locks.remove_if(user, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Caller must hold `user`'s lock.
    fn burn_and_record(
        &self,
        user: &UserId,
        amount: Amount,
        tier: &BoostTier,
        new_expiration: Timestamp,
    ) -> Result<BoostGrant, BoostError> {
        if let Err(e) = self.burner.burn(user, amount) {
            warn!(user = %user.short(), %amount, error = %e, "boost burn failed");
            return Err(BoostError::BurnFailed(e));
        }

        self.store.put(
            *user,
            BoostRecord {
                expiration: new_expiration,
                multiplier: tier.reward_multiplier,
            },
        );
        self.sink.boost_granted(&BoostGranted {
            amount,
            user: *user,
            duration_secs: tier.duration_secs,
        });

        info!(
            user = %user.short(),
            %amount,
            duration_secs = tier.duration_secs,
            expiration = new_expiration.as_secs(),
            "boost applied"
        );

        Ok(BoostGrant {
            new_expiration,
            duration_secs: tier.duration_secs,
            tier_multiplier: tier.reward_multiplier,
        })
    }

    /// Whether `user` holds a boost expiring strictly after `now`.
    pub fn has_active_boost(&self, user: &UserId, now: Timestamp) -> bool {
        self.store
            .get(user)
            .is_some_and(|record| record.is_active_at(now))
    }

    /// Reward multiplier for `user` at `now` under the configured scheme.
    pub fn get_multiplier(&self, user: &UserId, now: Timestamp) -> Ratio {
        match self.store.get(user) {
            Some(record) if record.is_active_at(now) => match self.scheme {
                MultiplierScheme::Flat => BOOSTED_MULTIPLIER,
                MultiplierScheme::Tiered => record.multiplier,
            },
            _ => UNBOOSTED_MULTIPLIER,
        }
    }

    pub fn boost_status(&self, user: &UserId, now: Timestamp) -> BoostStatus {
        match self.store.get(user) {
            None => BoostStatus::Inactive,
            Some(record) if record.is_active_at(now) => BoostStatus::Active {
                expiration: record.expiration,
                remaining_secs: record.expiration.saturating_secs_since(now),
                multiplier: self.get_multiplier(user, now),
            },
            Some(record) => BoostStatus::Expired {
                expired_at: record.expiration,
            },
        }
    }
}
