//! Core value types: fixed-point amounts and ratios, timestamps, identities,
//! and the rows of the two tier tables.
//!
//! All token quantities are in base units (1 token = 10^9 base units).
//! All arithmetic is checked or saturating; nothing here wraps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{BPS_PRECISION, DECIMALS, UNIT};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// Unsigned fixed-point token quantity in base units.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl Amount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u64::MAX);

    /// Wrap a raw base-unit quantity.
    pub const fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    /// Whole tokens to base units, saturating at [`Amount::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use kudos_core::constants::UNIT;
    /// use kudos_core::types::Amount;
    /// assert_eq!(Amount::from_tokens(3).base_units(), 3 * UNIT);
    /// assert_eq!(Amount::from_tokens(u64::MAX), Amount::MAX);
    /// ```
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens.saturating_mul(UNIT))
    }

    /// Whole tokens to base units, `None` on overflow.
    pub const fn checked_from_tokens(tokens: u64) -> Option<Self> {
        match tokens.checked_mul(UNIT) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    pub const fn base_units(&self) -> u64 {
        self.0
    }

    /// Whole-token part, truncating the fraction.
    pub const fn whole_tokens(&self) -> u64 {
        self.0 / UNIT
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:0width$}", width = DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Parses a decimal token quantity such as `"5000"` or `"12.5"`.
impl FromStr for Amount {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole_str, frac_str) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole_str.is_empty() && frac_str.is_empty() {
            return Err(ParseError::InvalidAmount(s.to_string()));
        }
        if !whole_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ParseError::InvalidAmount(s.to_string()));
        }
        if frac_str.len() > DECIMALS as usize {
            return Err(ParseError::TooManyDecimals {
                max: DECIMALS,
                got: frac_str.len(),
            });
        }

        let whole: u64 = if whole_str.is_empty() {
            0
        } else {
            whole_str.parse().map_err(|_| ParseError::Overflow)?
        };
        let frac: u64 = if frac_str.is_empty() {
            0
        } else {
            let scale = 10u64.pow(DECIMALS - frac_str.len() as u32);
            frac_str.parse::<u64>().map_err(|_| ParseError::Overflow)? * scale
        };

        whole
            .checked_mul(UNIT)
            .and_then(|units| units.checked_add(frac))
            .map(Self)
            .ok_or(ParseError::Overflow)
    }
}

// ---------------------------------------------------------------------------
// Ratio
// ---------------------------------------------------------------------------

/// Unsigned fixed-point ratio in basis points, where 10 000 bps = 1.0.
///
/// Used both for distribution shares (at most 1.0) and reward multipliers
/// (1.0× and above).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(transparent)]
pub struct Ratio(pub u64);

impl Ratio {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(BPS_PRECISION);

    pub const fn from_bps(bps: u64) -> Self {
        Self(bps)
    }

    pub const fn bps(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// `1.0 - self`, saturating at zero.
    pub fn complement(self) -> Self {
        Self(BPS_PRECISION.saturating_sub(self.0))
    }

    /// `amount * self` rounded down. `None` if the result exceeds `u64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kudos_core::types::{Amount, Ratio};
    /// let half = Ratio::from_bps(5_000);
    /// assert_eq!(half.apply(Amount(101)), Some(Amount(50)));
    /// assert_eq!(Ratio::from_bps(20_000).apply(Amount::MAX), None);
    /// ```
    pub fn apply(self, amount: Amount) -> Option<Amount> {
        let scaled = (amount.0 as u128).checked_mul(self.0 as u128)? / BPS_PRECISION as u128;
        u64::try_from(scaled).ok().map(Amount)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:04}", self.0 / BPS_PRECISION, self.0 % BPS_PRECISION)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A span of time in whole seconds.
pub type DurationSecs = u64;

/// Unix timestamp in seconds.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, secs: DurationSecs) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    /// Seconds from `earlier` to `self`, zero if `earlier` is later.
    pub fn saturating_secs_since(self, earlier: Self) -> DurationSecs {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// A 32-byte account identity, rendered as 64 lowercase hex characters.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(pub [u8; 32]);

impl UserId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight hex characters, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for UserId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| ParseError::InvalidHex)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| ParseError::InvalidLength { got: v.len() })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for UserId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_string()
    }
}

impl From<[u8; 32]> for UserId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tier rows
// ---------------------------------------------------------------------------

/// One row of the supply-tiered distribution table.
///
/// `upper_bound_inclusive == None` is the unbounded (+∞) final row.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplyTier {
    pub upper_bound_inclusive: Option<Amount>,
    pub platform_share: Ratio,
    pub uploader_share: Ratio,
}

impl SupplyTier {
    /// Whether `supply` is at or below this row's bound.
    pub fn contains(&self, supply: Amount) -> bool {
        match self.upper_bound_inclusive {
            Some(bound) => supply <= bound,
            None => true,
        }
    }
}

/// One row of the burn-to-boost table.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostTier {
    pub minimum_burn: Amount,
    pub duration_secs: DurationSecs,
    pub reward_multiplier: Ratio,
}

/// Per-user boost state. Overwritten by every successful burn.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostRecord {
    pub expiration: Timestamp,
    /// Multiplier of the tier the last burn qualified for.
    pub multiplier: Ratio,
}

impl BoostRecord {
    /// Strictly later than `now`: a record expiring at `now` is expired.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.expiration > now
    }
}

/// Notification emitted after a boost is granted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoostGranted {
    pub amount: Amount,
    pub user: UserId,
    pub duration_secs: DurationSecs,
}

/// Which ledger asset a transfer moves.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    /// The base currency that reward payments are denominated in.
    Base,
    /// The secondary token whose supply drives the split.
    Token,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Token => f.write_str("token"),
        }
    }
}

/// One leg of a payout: `amount` of `asset` credited to `to`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub asset: Asset,
    pub to: UserId,
    pub amount: Amount,
}
