//! Boost tier selection and multiplier application.

use kudos_core::constants::{BOOST_TIERS, MINIMUM_BURN};
use kudos_core::error::BoostError;
use kudos_core::types::{Amount, BoostTier, Ratio};
use serde::{Deserialize, Serialize};

/// How an active boost translates into a reward multiplier.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MultiplierScheme {
    /// 2.0× while active, 1.0× otherwise.
    #[default]
    Flat,
    /// The multiplier of the tier the last burn qualified for while active,
    /// 1.0× otherwise.
    Tiered,
}

/// Highest tier whose minimum is at or below `amount`.
///
/// Returns `None` below [`MINIMUM_BURN`].
///
/// # Examples
///
/// ```
/// use kudos_core::constants::SECONDS_PER_DAY;
/// use kudos_core::types::Amount;
/// use kudos_boost::tier_for_amount;
///
/// assert!(tier_for_amount(Amount::from_tokens(4_999)).is_none());
/// assert_eq!(tier_for_amount(Amount::from_tokens(5_000)).unwrap().duration_secs, 3 * SECONDS_PER_DAY);
/// assert_eq!(tier_for_amount(Amount::from_tokens(1_000_000)).unwrap().duration_secs, 20 * SECONDS_PER_DAY);
/// ```
pub fn tier_for_amount(amount: Amount) -> Option<&'static BoostTier> {
    let tiers: &'static [BoostTier] = &BOOST_TIERS;
    tiers.iter().find(|tier| tier.minimum_burn <= amount)
}

/// The smallest burn that earns any boost.
pub fn minimum_burn() -> Amount {
    MINIMUM_BURN
}

/// `reward * multiplier`, rounded down, failing instead of wrapping.
pub fn apply_multiplier(reward: Amount, multiplier: Ratio) -> Result<Amount, BoostError> {
    multiplier
        .apply(reward)
        .ok_or(BoostError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_core::constants::{BOOSTED_MULTIPLIER, SECONDS_PER_DAY, UNIT};

    fn duration_days(tokens: u64) -> Option<u64> {
        tier_for_amount(Amount::from_tokens(tokens)).map(|t| t.duration_secs / SECONDS_PER_DAY)
    }

    #[test]
    fn below_floor_has_no_tier() {
        assert_eq!(duration_days(0), None);
        assert_eq!(duration_days(1_000), None);
        assert!(tier_for_amount(Amount(5_000 * UNIT - 1)).is_none());
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(duration_days(5_000), Some(3));
        assert_eq!(duration_days(14_999), Some(3));
        assert_eq!(duration_days(15_000), Some(10));
        assert_eq!(duration_days(29_999), Some(10));
        assert_eq!(duration_days(30_000), Some(20));
    }

    #[test]
    fn amounts_above_top_tier_earn_top_tier() {
        let top = &BOOST_TIERS[0];
        assert_eq!(tier_for_amount(Amount::MAX), Some(top));
        assert_eq!(tier_for_amount(Amount::from_tokens(90_000)), Some(top));
    }

    #[test]
    fn tier_multipliers() {
        let mult = |t| tier_for_amount(Amount::from_tokens(t)).unwrap().reward_multiplier.bps();
        assert_eq!(mult(5_000), 14_000);
        assert_eq!(mult(15_000), 15_000);
        assert_eq!(mult(30_000), 16_000);
    }

    #[test]
    fn minimum_burn_matches_lowest_tier() {
        assert_eq!(minimum_burn(), Amount::from_tokens(5_000));
        assert!(tier_for_amount(minimum_burn()).is_some());
    }

    #[test]
    fn apply_multiplier_doubles() {
        assert_eq!(
            apply_multiplier(Amount::from_tokens(7), BOOSTED_MULTIPLIER).unwrap(),
            Amount::from_tokens(14)
        );
    }

    #[test]
    fn apply_multiplier_overflow_is_error() {
        assert_eq!(
            apply_multiplier(Amount::MAX, BOOSTED_MULTIPLIER),
            Err(BoostError::ArithmeticOverflow)
        );
    }

    #[test]
    fn scheme_defaults_to_flat() {
        assert_eq!(MultiplierScheme::default(), MultiplierScheme::Flat);
    }
}
