#![deny(unsafe_code)]
//! # walletforge-policy
//!
//! Wallet access policies over a fixed set of keys, and the scoring of those
//! policies against probabilistic key compromise.
//!
//! Every key is independently in one of four [`KeyState`]s. A [`Scenario`]
//! assigns a state to every key; the space of all scenarios has `4^n`
//! members. A [`Wallet`] is a disjunctive-normal-form policy: it is usable
//! by a party when some clause's keys are all available to that party. A
//! wallet *succeeds* in a scenario when the owner can use it and the
//! adversary cannot.
//!
//! Fitness comes in two flavors (see [`FitnessMode`]): the exact success
//! probability over the whole scenario space, and an unnormalized
//! Monte-Carlo sum over sampled scenarios. [`evolve`] binds either of them to
//! the generic engine from `walletforge-evolution`.
//!
//! All randomness and problem parameters live in one [`RandomContext`] per
//! run, passed explicitly to every operation that needs it.

pub mod config;
pub mod context;
pub mod error;
pub mod fitness;
pub mod scenario;
pub mod wallet;

pub use config::{ProblemConfig, MAX_KEYS};
pub use context::RandomContext;
pub use error::{PolicyError, PolicyResult};
pub use fitness::{evolve, evolve_with_cancellation, wallet_engine, FitnessMode};
pub use scenario::{Availability, KeyState, Scenario};
pub use wallet::Wallet;
