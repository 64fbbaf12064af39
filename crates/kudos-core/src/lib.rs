//! # kudos-core
//! Foundation types, tier tables and collaborator traits for Kudos.

pub mod clock;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
