//! Problem parameters: key count and the per-key state distribution.

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};
use crate::scenario::KeyState;

/// Largest supported key count; `4^MAX_KEYS` still fits a `u64` scenario index.
pub const MAX_KEYS: usize = 31;

/// Allowed deviation of the probability vector's sum from 1.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Parameters of the key-compromise model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    /// Number of keys the wallet policy ranges over.
    pub number_of_keys: usize,
    /// Probability of each state, in `KeyState` order (safe, lost, leaked,
    /// stolen). The same distribution applies independently to every key.
    pub probabilities: [f64; 4],
    /// Weight for blending heuristic and exact scores. Carried through the
    /// context but not applied to any score.
    pub heuristic_weight: f64,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            number_of_keys: 2,
            probabilities: [0.7, 0.1, 0.2, 0.0],
            heuristic_weight: 0.001,
        }
    }
}

impl ProblemConfig {
    pub fn new(number_of_keys: usize, probabilities: [f64; 4]) -> Self {
        Self {
            number_of_keys,
            probabilities,
            ..Default::default()
        }
    }

    pub fn with_heuristic_weight(mut self, weight: f64) -> Self {
        self.heuristic_weight = weight;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> PolicyResult<()> {
        if self.number_of_keys == 0 {
            return Err(PolicyError::InvalidKeyCount);
        }
        if self.number_of_keys > MAX_KEYS {
            return Err(PolicyError::TooManyKeys {
                keys: self.number_of_keys,
                max: MAX_KEYS,
            });
        }
        for (state, &value) in KeyState::ALL.iter().zip(&self.probabilities) {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::InvalidProbability {
                    state: *state,
                    value,
                });
            }
        }
        let sum: f64 = self.probabilities.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(PolicyError::ProbabilitySum(sum));
        }
        Ok(())
    }
}
