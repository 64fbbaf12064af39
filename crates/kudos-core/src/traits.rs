//! Trait interfaces for the collaborators Kudos depends on.
//!
//! The rules engine never talks to a ledger directly. Everything it needs
//! from the outside world comes through these traits:
//! - [`SupplySource`]: Current total supply of the secondary token
//! - [`Clock`]: Current time
//! - [`TokenBurner`]: Irreversible token burn
//! - [`PaymentTransfer`]: Moving base-currency and token amounts
//! - [`BoostEventSink`]: Fire-and-forget boost notifications

use std::sync::Arc;

use crate::error::{BurnError, SupplyError, TransferError};
use crate::types::{Amount, Asset, BoostGranted, Timestamp, Transfer, UserId};

/// Source of the secondary token's current total supply.
///
/// Queried fresh on every distribution calculation.
pub trait SupplySource: Send + Sync {
    fn total_supply(&self) -> Result<Amount, SupplyError>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The external burn primitive.
///
/// Destroys exactly `amount` units from `user`'s holdings. Irreversible:
/// callers must not mutate any state before this returns `Ok`.
pub trait TokenBurner: Send + Sync {
    fn burn(&self, user: &UserId, amount: Amount) -> Result<(), BurnError>;
}

/// The external payment-transfer primitive.
pub trait PaymentTransfer: Send + Sync {
    /// Apply every leg or none of them. On `Err`, no leg has been paid.
    fn transfer_all(&self, legs: &[Transfer]) -> Result<(), TransferError>;

    fn transfer(&self, asset: Asset, to: &UserId, amount: Amount) -> Result<(), TransferError> {
        self.transfer_all(&[Transfer {
            asset,
            to: *to,
            amount,
        }])
    }
}

/// Receiver of boost-granted notifications.
///
/// Delivery is best-effort; implementations must not fail the caller.
pub trait BoostEventSink: Send + Sync {
    fn boost_granted(&self, event: &BoostGranted);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl BoostEventSink for NoopEventSink {
    fn boost_granted(&self, _event: &BoostGranted) {}
}

/// A fixed supply value, for quotes and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSupply(pub Amount);

impl SupplySource for FixedSupply {
    fn total_supply(&self) -> Result<Amount, SupplyError> {
        Ok(self.0)
    }
}

impl<T: SupplySource + ?Sized> SupplySource for Arc<T> {
    fn total_supply(&self) -> Result<Amount, SupplyError> {
        (**self).total_supply()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<T: TokenBurner + ?Sized> TokenBurner for Arc<T> {
    fn burn(&self, user: &UserId, amount: Amount) -> Result<(), BurnError> {
        (**self).burn(user, amount)
    }
}

impl<T: PaymentTransfer + ?Sized> PaymentTransfer for Arc<T> {
    fn transfer_all(&self, legs: &[Transfer]) -> Result<(), TransferError> {
        (**self).transfer_all(legs)
    }
}

impl<T: BoostEventSink + ?Sized> BoostEventSink for Arc<T> {
    fn boost_granted(&self, event: &BoostGranted) {
        (**self).boost_granted(event)
    }
}
