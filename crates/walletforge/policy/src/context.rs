//! Per-run shared configuration and random source.

use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use walletforge_evolution::EntropySource;

use crate::config::ProblemConfig;
use crate::error::PolicyResult;
use crate::scenario::KeyState;

/// Sample size of the heuristic for small key counts.
const BASE_SAMPLE_SIZE: usize = 1000;

/// Problem parameters, derived sizes, and the one generator every scenario,
/// wallet and engine operation of a run draws from.
///
/// Create one per run and pass it explicitly; nothing here is global.
#[derive(Debug)]
pub struct RandomContext {
    config: ProblemConfig,
    scenario_space_size: u64,
    sample_size: usize,
    rng: StdRng,
}

impl RandomContext {
    /// Create a context seeded from operating-system entropy.
    pub fn new(config: ProblemConfig) -> PolicyResult<Self> {
        Self::build(config, StdRng::from_entropy())
    }

    /// Create a context with a deterministic seed.
    pub fn with_seed(config: ProblemConfig, seed: u64) -> PolicyResult<Self> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: ProblemConfig, rng: StdRng) -> PolicyResult<Self> {
        config.validate()?;
        let keys = config.number_of_keys;
        let scenario_space_size = 4u64.pow(keys as u32);
        // 1000 samples up to four keys, then 1000 * keys / 2.
        let sample_size = if keys > 4 {
            BASE_SAMPLE_SIZE * keys / 2
        } else {
            BASE_SAMPLE_SIZE
        };
        tracing::debug!(
            keys,
            scenario_space_size,
            sample_size,
            "Created random context"
        );
        Ok(Self {
            config,
            scenario_space_size,
            sample_size,
            rng,
        })
    }

    pub fn number_of_keys(&self) -> usize {
        self.config.number_of_keys
    }

    pub fn probabilities(&self) -> &[f64; 4] {
        &self.config.probabilities
    }

    /// Probability of a single key being in `state`.
    pub fn probability_of(&self, state: KeyState) -> f64 {
        self.config.probabilities[state.digit() as usize]
    }

    /// Number of distinct scenarios, `4^number_of_keys`.
    pub fn scenario_space_size(&self) -> u64 {
        self.scenario_space_size
    }

    /// Scenarios drawn per heuristic evaluation.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn heuristic_weight(&self) -> f64 {
        self.config.heuristic_weight
    }

    pub fn config(&self) -> &ProblemConfig {
        &self.config
    }

    /// Uniform draw from `[low, high]`, both ends inclusive. Panics if
    /// `low > high`.
    pub fn sample_uniform_int<T>(&mut self, low: T, high: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        self.rng.gen_range(low..=high)
    }

    /// `true` with probability `p`. Panics unless `p` is in `[0, 1]`.
    pub fn sample_bernoulli(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }
}

impl EntropySource for RandomContext {
    type Rng = StdRng;

    fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
