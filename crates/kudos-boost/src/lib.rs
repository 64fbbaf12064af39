//! # kudos-boost: Burn-to-boost registry.
//!
//! A user burns secondary tokens to open a time-bounded multiplier window on
//! their token rewards:
//! - **Tier selection**: the burn amount picks the highest qualifying row of
//!   [`BOOST_TIERS`](kudos_core::constants::BOOST_TIERS); there is no
//!   stacking and no interpolation.
//! - **Overwrite, not extend**: every successful burn replaces the user's
//!   expiration with `now + tier duration`.
//! - **Lazy expiry**: records are never swept; a record is active only while
//!   its expiration is strictly after the queried time.
//! - **Burn first**: the record is written only after the external burn
//!   primitive confirms, under a per-user lock.

pub mod registry;
pub mod sink;
pub mod store;
pub mod tiers;

pub use registry::{BoostGrant, BoostRegistry, BoostStatus};
pub use sink::{RecordingEventSink, TracingEventSink};
pub use store::{BoostStore, MemoryBoostStore};
pub use tiers::{apply_multiplier, minimum_burn, tier_for_amount, MultiplierScheme};
