//! Distribution policy: total supply → (platform share, uploader share).
//!
//! A pure lookup over an ordered, exhaustive tier table. No stored state,
//! so it is safe to share across threads without synchronization.

use kudos_core::constants::{BPS_PRECISION, SUPPLY_TIERS};
use kudos_core::error::SplitError;
use kudos_core::types::{Amount, Ratio, SupplyTier};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The platform/uploader split for one reward event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Distribution {
    pub platform: Ratio,
    pub uploader: Ratio,
}

impl From<&SupplyTier> for Distribution {
    fn from(tier: &SupplyTier) -> Self {
        Self {
            platform: tier.platform_share,
            uploader: tier.uploader_share,
        }
    }
}

/// Tier-table lookup over a validated table.
#[derive(Debug, Clone, Copy)]
pub struct DistributionPolicy {
    tiers: &'static [SupplyTier],
}

impl Default for DistributionPolicy {
    fn default() -> Self {
        Self {
            tiers: &SUPPLY_TIERS,
        }
    }
}

impl DistributionPolicy {
    /// The policy over the built-in [`SUPPLY_TIERS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy over a custom table, rejected unless it passes
    /// [`validate_supply_table`].
    pub fn with_tiers(tiers: &'static [SupplyTier]) -> Result<Self, SplitError> {
        validate_supply_table(tiers)?;
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &'static [SupplyTier] {
        self.tiers
    }

    /// Index of the first row whose inclusive bound is at or above `total_supply`.
    ///
    /// The table always ends with an unbounded row, so every supply matches.
    pub fn tier_index(&self, total_supply: Amount) -> usize {
        self.tiers
            .iter()
            .position(|tier| tier.contains(total_supply))
            .unwrap_or(self.tiers.len() - 1)
    }

    pub fn tier_for_supply(&self, total_supply: Amount) -> &'static SupplyTier {
        &self.tiers[self.tier_index(total_supply)]
    }

    /// Shares for the given supply. Step function, no interpolation.
    pub fn get_distribution(&self, total_supply: Amount) -> Distribution {
        let index = self.tier_index(total_supply);
        let dist = Distribution::from(&self.tiers[index]);
        debug!(
            supply = %total_supply,
            tier = index,
            platform_bps = dist.platform.bps(),
            uploader_bps = dist.uploader.bps(),
            "distribution lookup"
        );
        dist
    }
}

/// [`DistributionPolicy::get_distribution`] over the built-in table.
///
/// # Examples
///
/// ```
/// use kudos_core::types::{Amount, Ratio};
/// use kudos_split::get_distribution;
///
/// let d = get_distribution(Amount::from_tokens(10_000));
/// assert_eq!((d.platform, d.uploader), (Ratio::from_bps(5_000), Ratio::from_bps(5_000)));
///
/// let d = get_distribution(Amount::from_tokens(10_001));
/// assert_eq!((d.platform, d.uploader), (Ratio::from_bps(4_500), Ratio::from_bps(5_500)));
/// ```
pub fn get_distribution(total_supply: Amount) -> Distribution {
    DistributionPolicy::new().get_distribution(total_supply)
}

/// Check a supply table: non-empty, every row sums to 1.0, bounds strictly
/// ascending, and exactly one unbounded row in last position.
pub fn validate_supply_table(tiers: &[SupplyTier]) -> Result<(), SplitError> {
    if tiers.is_empty() {
        return Err(SplitError::EmptyTable);
    }

    let mut prev: Option<Amount> = None;
    for (index, tier) in tiers.iter().enumerate() {
        let sum = tier
            .platform_share
            .checked_add(tier.uploader_share)
            .ok_or(SplitError::ArithmeticOverflow)?
            .bps();
        if sum != BPS_PRECISION {
            return Err(SplitError::SharesDoNotSum { index, sum });
        }

        match tier.upper_bound_inclusive {
            Some(bound) => {
                if prev.is_some_and(|p| bound <= p) {
                    return Err(SplitError::UnorderedBounds { index });
                }
                prev = Some(bound);
            }
            None if index != tiers.len() - 1 => {
                return Err(SplitError::UnboundedNotLast { index });
            }
            None => {}
        }
    }

    if tiers[tiers.len() - 1].upper_bound_inclusive.is_some() {
        return Err(SplitError::MissingUnboundedTier);
    }
    Ok(())
}
