//! Error types for Kudos.
use thiserror::Error;

use crate::types::{Amount, Asset, UserId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid hex")] InvalidHex,
    #[error("invalid length: expected 32 bytes, got {got}")] InvalidLength { got: usize },
    #[error("invalid amount: {0:?}")] InvalidAmount(String),
    #[error("too many decimals: max {max}, got {got}")] TooManyDecimals { max: u32, got: usize },
    #[error("amount overflow")] Overflow,
    #[error("unknown reward kind: {0}")] UnknownRewardKind(String),
}

/// Failures reported by the external burn primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BurnError {
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("burn not authorized for {0}")] Unauthorized(UserId),
    #[error("ledger: {0}")] Ledger(String),
}

/// Failures reported by the external payment-transfer primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("transfer of {amount} {asset} to {to} rejected: {reason}")] Rejected { asset: Asset, to: UserId, amount: Amount, reason: String },
    #[error("ledger: {0}")] Ledger(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupplyError {
    #[error("total supply unavailable: {0}")] Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("empty tier table")] EmptyTable,
    #[error("tier {index}: shares sum to {sum} bps")] SharesDoNotSum { index: usize, sum: u64 },
    #[error("tier {index}: bound not above previous tier")] UnorderedBounds { index: usize },
    #[error("tier {index}: unbounded tier is not last")] UnboundedNotLast { index: usize },
    #[error("last tier is bounded")] MissingUnboundedTier,
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoostError {
    #[error("burn of {amount} is below the minimum boost burn {minimum}")] InvalidAmount { amount: Amount, minimum: Amount },
    #[error("burn failed: {0}")] BurnFailed(#[from] BurnError),
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug)]
pub enum KudosError {
    #[error(transparent)] Split(#[from] SplitError),
    #[error(transparent)] Boost(#[from] BoostError),
    #[error(transparent)] Supply(#[from] SupplyError),
    #[error(transparent)] Transfer(#[from] TransferError),
    #[error("config: {0}")] Config(String),
    #[error("state: {0}")] State(String),
}
