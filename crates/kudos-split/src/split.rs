//! Applying a [`Distribution`] to a concrete payment.

use kudos_core::error::SplitError;
use kudos_core::types::Amount;
use serde::{Deserialize, Serialize};

use crate::policy::Distribution;

/// The two legs of a split payment. `platform + uploader == payment`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentSplit {
    pub platform: Amount,
    pub uploader: Amount,
}

impl PaymentSplit {
    pub fn total(&self) -> Option<Amount> {
        self.platform.checked_add(self.uploader)
    }
}

/// Divide `payment` by `distribution`.
///
/// The platform leg is rounded down; the uploader receives the remainder,
/// so rounding dust never leaks out of the payment.
///
/// # Examples
///
/// ```
/// use kudos_core::types::{Amount, Ratio};
/// use kudos_split::{split_payment, Distribution};
///
/// let d = Distribution { platform: Ratio::from_bps(4_500), uploader: Ratio::from_bps(5_500) };
/// let s = split_payment(Amount(1_001), d).unwrap();
/// assert_eq!(s.platform, Amount(450));
/// assert_eq!(s.uploader, Amount(551));
/// ```
pub fn split_payment(
    payment: Amount,
    distribution: Distribution,
) -> Result<PaymentSplit, SplitError> {
    let platform = distribution
        .platform
        .apply(payment)
        .ok_or(SplitError::ArithmeticOverflow)?;
    let uploader = payment
        .checked_sub(platform)
        .ok_or(SplitError::ArithmeticOverflow)?;
    Ok(PaymentSplit { platform, uploader })
}
