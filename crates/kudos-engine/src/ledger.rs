//! In-memory ledger standing in for the external token and payment layer.
//!
//! Tracks balances per (asset, account) and the token's total supply.
//! Token transfers mint new supply; burns destroy it. Base-currency
//! transfers only credit the recipient.

use std::collections::HashMap;

use kudos_core::error::{BurnError, SupplyError, TransferError};
use kudos_core::traits::{PaymentTransfer, SupplySource, TokenBurner};
use kudos_core::types::{Amount, Asset, Transfer, UserId};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<(Asset, UserId), Amount>,
    token_supply: Amount,
}

/// Not persistent; see [`StateFile`](crate::StateFile) for the CLI's on-disk copy.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from token balances. Supply is their sum.
    pub fn from_token_balances<I>(balances: I) -> Result<Self, TransferError>
    where
        I: IntoIterator<Item = (UserId, Amount)>,
    {
        let ledger = Self::new();
        for (user, amount) in balances {
            ledger.credit(Asset::Token, &user, amount)?;
        }
        Ok(ledger)
    }

    /// Add `amount` to `user`. Token credits also grow the supply.
    pub fn credit(&self, asset: Asset, user: &UserId, amount: Amount) -> Result<(), TransferError> {
        self.transfer_all(&[Transfer {
            asset,
            to: *user,
            amount,
        }])
    }

    pub fn balance(&self, asset: Asset, user: &UserId) -> Amount {
        self.state
            .lock()
            .balances
            .get(&(asset, *user))
            .copied()
            .unwrap_or_default()
    }

    /// Non-zero token balances, sorted by account.
    pub fn token_balances(&self) -> Vec<(UserId, Amount)> {
        let state = self.state.lock();
        let mut out: Vec<(UserId, Amount)> = state
            .balances
            .iter()
            .filter(|((asset, _), amount)| *asset == Asset::Token && !amount.is_zero())
            .map(|((_, user), amount)| (*user, *amount))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn token_supply(&self) -> Amount {
        self.state.lock().token_supply
    }
}

impl TokenBurner for MemoryLedger {
    fn burn(&self, user: &UserId, amount: Amount) -> Result<(), BurnError> {
        let mut state = self.state.lock();
        let have = state
            .balances
            .get(&(Asset::Token, *user))
            .copied()
            .unwrap_or_default();
        let remaining = have
            .checked_sub(amount)
            .ok_or(BurnError::InsufficientBalance { have, need: amount })?;
        state.balances.insert((Asset::Token, *user), remaining);
        state.token_supply = state.token_supply.saturating_sub(amount);
        Ok(())
    }
}

impl PaymentTransfer for MemoryLedger {
    /// Stages every leg against the current balances and commits only if
    /// none overflows.
    fn transfer_all(&self, legs: &[Transfer]) -> Result<(), TransferError> {
        let mut state = self.state.lock();
        let mut staged: HashMap<(Asset, UserId), Amount> = HashMap::new();
        let mut supply = state.token_supply;

        for leg in legs {
            let overflow = || TransferError::Rejected {
                asset: leg.asset,
                to: leg.to,
                amount: leg.amount,
                reason: "balance overflow".to_string(),
            };
            let key = (leg.asset, leg.to);
            let current = staged
                .get(&key)
                .or_else(|| state.balances.get(&key))
                .copied()
                .unwrap_or_default();
            staged.insert(key, current.checked_add(leg.amount).ok_or_else(overflow)?);
            if leg.asset == Asset::Token {
                supply = supply.checked_add(leg.amount).ok_or_else(overflow)?;
            }
        }

        state.balances.extend(staged);
        state.token_supply = supply;
        Ok(())
    }
}

impl SupplySource for MemoryLedger {
    fn total_supply(&self) -> Result<Amount, SupplyError> {
        Ok(self.token_supply())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: UserId = UserId([1; 32]);
    const B: UserId = UserId([2; 32]);

    #[test]
    fn token_credit_grows_supply_base_does_not() {
        let ledger = MemoryLedger::new();
        ledger.credit(Asset::Token, &A, Amount(100)).unwrap();
        ledger.credit(Asset::Base, &A, Amount(40)).unwrap();
        assert_eq!(ledger.total_supply().unwrap(), Amount(100));
        assert_eq!(ledger.balance(Asset::Base, &A), Amount(40));
    }

    #[test]
    fn burn_shrinks_balance_and_supply() {
        let ledger =
            MemoryLedger::from_token_balances([(A, Amount(100)), (B, Amount(50))]).unwrap();
        ledger.burn(&A, Amount(30)).unwrap();
        assert_eq!(ledger.balance(Asset::Token, &A), Amount(70));
        assert_eq!(ledger.token_supply(), Amount(120));
    }

    #[test]
    fn burn_over_balance_fails_without_change() {
        let ledger = MemoryLedger::from_token_balances([(A, Amount(10))]).unwrap();
        let err = ledger.burn(&A, Amount(11)).unwrap_err();
        assert_eq!(
            err,
            BurnError::InsufficientBalance {
                have: Amount(10),
                need: Amount(11)
            }
        );
        assert_eq!(ledger.token_supply(), Amount(10));
        assert_eq!(ledger.balance(Asset::Token, &A), Amount(10));
    }

    #[test]
    fn unknown_account_burn_fails() {
        let ledger = MemoryLedger::new();
        assert!(ledger.burn(&B, Amount(1)).is_err());
    }

    #[test]
    fn credit_overflow_rejected() {
        let ledger = MemoryLedger::new();
        ledger.credit(Asset::Token, &A, Amount::MAX).unwrap();
        assert!(matches!(
            ledger.credit(Asset::Token, &B, Amount(1)),
            Err(TransferError::Rejected { .. })
        ));
        assert_eq!(ledger.balance(Asset::Token, &B), Amount::ZERO);
    }

    #[test]
    fn overflowing_leg_rolls_back_whole_batch() {
        let ledger = MemoryLedger::from_token_balances([(B, Amount::MAX)]).unwrap();
        let legs = [
            Transfer {
                asset: Asset::Base,
                to: A,
                amount: Amount(40),
            },
            Transfer {
                asset: Asset::Token,
                to: A,
                amount: Amount(1),
            },
        ];
        assert!(matches!(
            ledger.transfer_all(&legs),
            Err(TransferError::Rejected { to: A, .. })
        ));
        assert_eq!(ledger.balance(Asset::Base, &A), Amount::ZERO);
        assert_eq!(ledger.balance(Asset::Token, &A), Amount::ZERO);
        assert_eq!(ledger.token_supply(), Amount::MAX);
    }

    #[test]
    fn batch_legs_to_same_account_accumulate() {
        let ledger = MemoryLedger::new();
        let leg = Transfer {
            asset: Asset::Token,
            to: A,
            amount: Amount(7),
        };
        ledger.transfer_all(&[leg, leg]).unwrap();
        assert_eq!(ledger.balance(Asset::Token, &A), Amount(14));
        assert_eq!(ledger.token_supply(), Amount(14));
    }

    #[test]
    fn token_balances_sorted_and_skip_zero() {
        let ledger = MemoryLedger::from_token_balances([(B, Amount(5)), (A, Amount(3))]).unwrap();
        ledger.burn(&A, Amount(3)).unwrap();
        assert_eq!(ledger.token_balances(), vec![(B, Amount(5))]);
    }
}
