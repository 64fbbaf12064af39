//! Protocol constants and the two tier tables.
//!
//! All token quantities are in base units (1 token = [`UNIT`] base units).
//! Ratios are in basis points (10 000 bps = 1.0).

use crate::types::{Amount, BoostTier, DurationSecs, Ratio, SupplyTier};

/// Decimal places of the fixed-point token amount.
pub const DECIMALS: u32 = 9;

/// Base units per whole token.
pub const UNIT: u64 = 1_000_000_000;

/// Basis-point denominator: 10 000 bps = 1.0.
pub const BPS_PRECISION: u64 = 10_000;

pub const SECONDS_PER_DAY: DurationSecs = 86_400;

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Supply-tiered distribution table, ascending by inclusive upper bound.
///
/// | Total supply (tokens) | Platform | Uploader |
/// |-----------------------|----------|----------|
/// | ≤ 10,000              | 50%      | 50%      |
/// | ≤ 50,000              | 45%      | 55%      |
/// | ≤ 100,000             | 40%      | 60%      |
/// | ≤ 250,000             | 35%      | 65%      |
/// | ≤ 500,000             | 30%      | 70%      |
/// | ≤ 1,000,000           | 25%      | 75%      |
/// | above                 | 20%      | 80%      |
pub const SUPPLY_TIERS: [SupplyTier; 7] = [
    supply_tier(Some(10_000), 5_000),
    supply_tier(Some(50_000), 4_500),
    supply_tier(Some(100_000), 4_000),
    supply_tier(Some(250_000), 3_500),
    supply_tier(Some(500_000), 3_000),
    supply_tier(Some(1_000_000), 2_500),
    supply_tier(None, 2_000),
];

const fn supply_tier(bound_tokens: Option<u64>, platform_bps: u64) -> SupplyTier {
    let upper_bound_inclusive = match bound_tokens {
        Some(tokens) => Some(Amount::from_tokens(tokens)),
        None => None,
    };
    SupplyTier {
        upper_bound_inclusive,
        platform_share: Ratio::from_bps(platform_bps),
        uploader_share: Ratio::from_bps(BPS_PRECISION - platform_bps),
    }
}

// ---------------------------------------------------------------------------
// Boost
// ---------------------------------------------------------------------------

/// Multiplier while a boost is active under the flat scheme (2.0×).
pub const BOOSTED_MULTIPLIER: Ratio = Ratio::from_bps(20_000);

/// Multiplier without an active boost (1.0×).
pub const UNBOOSTED_MULTIPLIER: Ratio = Ratio::ONE;

/// Burn-to-boost table, descending by minimum burn.
///
/// | Burn (tokens) | Duration | Tier multiplier |
/// |---------------|----------|-----------------|
/// | ≥ 30,000      | 20 days  | 1.6×            |
/// | ≥ 15,000      | 10 days  | 1.5×            |
/// | ≥ 5,000       | 3 days   | 1.4×            |
pub const BOOST_TIERS: [BoostTier; 3] = [
    BoostTier {
        minimum_burn: Amount::from_tokens(30_000),
        duration_secs: 20 * SECONDS_PER_DAY,
        reward_multiplier: Ratio::from_bps(16_000),
    },
    BoostTier {
        minimum_burn: Amount::from_tokens(15_000),
        duration_secs: 10 * SECONDS_PER_DAY,
        reward_multiplier: Ratio::from_bps(15_000),
    },
    BoostTier {
        minimum_burn: Amount::from_tokens(5_000),
        duration_secs: 3 * SECONDS_PER_DAY,
        reward_multiplier: Ratio::from_bps(14_000),
    },
];

/// Smallest burn that earns any boost: the lowest tier's minimum.
pub const MINIMUM_BURN: Amount = BOOST_TIERS[BOOST_TIERS.len() - 1].minimum_burn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_shares_sum_to_one() {
        for (i, tier) in SUPPLY_TIERS.iter().enumerate() {
            assert_eq!(
                tier.platform_share.bps() + tier.uploader_share.bps(),
                BPS_PRECISION,
                "row {i} does not sum to 1.0"
            );
        }
    }

    #[test]
    fn supply_bounds_ascending_and_last_unbounded() {
        let bounded: Vec<Amount> = SUPPLY_TIERS
            .iter()
            .filter_map(|t| t.upper_bound_inclusive)
            .collect();
        assert_eq!(bounded.len(), SUPPLY_TIERS.len() - 1);
        assert!(bounded.windows(2).all(|w| w[0] < w[1]));
        assert!(SUPPLY_TIERS[SUPPLY_TIERS.len() - 1].upper_bound_inclusive.is_none());
    }

    #[test]
    fn boost_tiers_descending() {
        assert!(BOOST_TIERS.windows(2).all(|w| w[0].minimum_burn > w[1].minimum_burn));
    }

    #[test]
    fn minimum_burn_is_lowest_tier() {
        assert_eq!(MINIMUM_BURN, Amount::from_tokens(5_000));
    }

    #[test]
    fn top_tier_lasts_twenty_days() {
        assert_eq!(BOOST_TIERS[0].duration_secs, 1_728_000);
    }
}
