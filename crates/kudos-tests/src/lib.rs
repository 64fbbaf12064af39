//! Integration test suite for Kudos.
//!
//! Exercises the distribution policy, boost registry and reward engine
//! together, under adversarial inputs and real thread contention.

pub mod helpers;
