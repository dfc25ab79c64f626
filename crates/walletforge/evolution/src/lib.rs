#![deny(unsafe_code)]
//! # walletforge-evolution
//!
//! A generic evolutionary search engine. The engine owns a fixed-size
//! population of chromosomes and evolves it generation by generation:
//!
//! 1. every member is scored by the injected fitness function
//! 2. the best-ever chromosome is tracked across generations
//! 3. the next generation keeps the current fittest unperturbed (elitism) and
//!    fills the remaining slots with perturbed tournament winners
//!
//! The search halts once the best score has not improved for
//! `iterations_to_halt` consecutive generations, when an optional generation
//! cap is reached, or when its [`CancellationToken`] is tripped.
//!
//! The engine knows nothing about the chromosome type beyond `Clone`. Fitness
//! and perturbation are supplied as closures that receive the run's shared
//! random source, so chromosome operators and tournament selection draw from
//! one generator per run.

pub mod cancel;
pub mod config;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod types;

pub use cancel::CancellationToken;
pub use config::SearchConfig;
pub use engine::{EvolutionEngine, FitnessFn, PerturbFn};
pub use entropy::EntropySource;
pub use error::{EvolutionError, EvolutionResult};
pub use types::{GenerationReport, HaltReason, Solution};
