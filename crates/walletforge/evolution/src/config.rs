//! Search parameters for the evolution engine.

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvolutionResult};

/// Parameters controlling population management, selection and halting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of chromosomes in every generation.
    pub population_size: usize,
    /// Tournament size: members sampled without replacement per slot.
    pub selection_size: usize,
    /// Consecutive generations without improvement before halting.
    pub iterations_to_halt: u32,
    /// Per-gene flip probability handed to the perturbation operator.
    pub perturb_probability: f64,
    /// Hard upper bound on generations, independent of stagnation.
    pub max_generations: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            selection_size: 2,
            iterations_to_halt: 10,
            perturb_probability: 0.3,
            max_generations: None,
        }
    }
}

impl SearchConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_selection_size(mut self, size: usize) -> Self {
        self.selection_size = size;
        self
    }

    pub fn with_iterations_to_halt(mut self, iterations: u32) -> Self {
        self.iterations_to_halt = iterations;
        self
    }

    pub fn with_perturb_probability(mut self, probability: f64) -> Self {
        self.perturb_probability = probability;
        self
    }

    pub fn with_max_generations(mut self, max: u64) -> Self {
        self.max_generations = Some(max);
        self
    }

    /// Validate the configuration.
    ///
    /// All range checks happen here so a constructed engine never runs with
    /// a degenerate population or tournament.
    pub fn validate(&self) -> EvolutionResult<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::InvalidConfig(
                "population_size must be positive".to_string(),
            ));
        }
        if self.selection_size == 0 {
            return Err(EvolutionError::InvalidConfig(
                "selection_size must be positive".to_string(),
            ));
        }
        if self.selection_size > self.population_size {
            return Err(EvolutionError::InvalidConfig(format!(
                "selection_size {} exceeds population_size {}",
                self.selection_size, self.population_size
            )));
        }
        if self.iterations_to_halt == 0 {
            return Err(EvolutionError::InvalidConfig(
                "iterations_to_halt must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.perturb_probability) {
            return Err(EvolutionError::InvalidConfig(format!(
                "perturb_probability {} is outside [0, 1]",
                self.perturb_probability
            )));
        }
        if self.max_generations == Some(0) {
            return Err(EvolutionError::InvalidConfig(
                "max_generations must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}
