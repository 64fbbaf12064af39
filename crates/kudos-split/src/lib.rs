//! # kudos-split: Supply-tiered reward distribution.
//!
//! All calculations use integer basis-point arithmetic only.
//!
//! - **Distribution policy**: the circulating supply of the secondary token
//!   selects a row of [`SUPPLY_TIERS`](kudos_core::constants::SUPPLY_TIERS),
//!   a step function that shifts the split from 50/50 towards 20/80 in the
//!   uploader's favour as supply grows.
//! - **Payment split**: a payment is divided into a platform leg and an
//!   uploader leg that always sum to the payment exactly.

pub mod policy;
pub mod split;

pub use policy::{get_distribution, validate_supply_table, Distribution, DistributionPolicy};
pub use split::{split_payment, PaymentSplit};
