//! Layered run settings: defaults, then an optional TOML file, then
//! command-line overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use walletforge_evolution::SearchConfig;
use walletforge_policy::{FitnessMode, ProblemConfig};

use crate::error::{CliError, CliResult};
use crate::restart::RestartPlan;

/// Everything a sweep over key counts needs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub problem: ProblemSettings,
    pub search: SearchConfig,
    pub run: RunSettings,
}

/// Key-state model shared by every key count in the sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemSettings {
    /// Safe, lost, leaked and stolen probabilities.
    pub probabilities: [f64; 4],
    pub heuristic_weight: f64,
}

impl Default for ProblemSettings {
    fn default() -> Self {
        let defaults = ProblemConfig::default();
        Self {
            probabilities: defaults.probabilities,
            heuristic_weight: defaults.heuristic_weight,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// First key count of the sweep.
    pub min_keys: usize,
    /// Last key count of the sweep, inclusive.
    pub max_keys: usize,
    /// Independent searches per key count.
    pub restarts: usize,
    pub fitness: FitnessMode,
    /// Base seed; each key count derives its own from it.
    pub seed: Option<u64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            min_keys: 2,
            max_keys: 9,
            restarts: 1,
            fitness: FitnessMode::Exact,
            seed: None,
        }
    }
}

impl Settings {
    /// Read settings from a TOML file. Missing tables and fields keep their
    /// defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the settings.
    pub fn validate(&self) -> CliResult<()> {
        let run = &self.run;
        if run.min_keys == 0 {
            return Err(CliError::InvalidArgument(
                "min_keys must be at least 1".to_string(),
            ));
        }
        if run.min_keys > run.max_keys {
            return Err(CliError::InvalidArgument(format!(
                "min_keys {} exceeds max_keys {}",
                run.min_keys, run.max_keys
            )));
        }
        if run.restarts == 0 {
            return Err(CliError::InvalidArgument(
                "restarts must be at least 1".to_string(),
            ));
        }
        self.search.validate()?;
        // Every key count in range shares the distribution; checking both
        // ends covers the key-count bounds too.
        self.problem_for(run.min_keys).validate()?;
        self.problem_for(run.max_keys).validate()?;
        Ok(())
    }

    pub fn problem_for(&self, number_of_keys: usize) -> ProblemConfig {
        ProblemConfig::new(number_of_keys, self.problem.probabilities)
            .with_heuristic_weight(self.problem.heuristic_weight)
    }

    /// Seed for the context of one key count, if the run is seeded.
    pub fn seed_for(&self, number_of_keys: usize) -> Option<u64> {
        self.run
            .seed
            .map(|seed| seed.wrapping_add(number_of_keys as u64))
    }

    pub fn restart_plan(&self) -> RestartPlan {
        RestartPlan {
            search: self.search.clone(),
            fitness: self.run.fitness,
            restarts: self.run.restarts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_sweep() {
        let settings = Settings::default();
        assert_eq!(settings.problem.probabilities, [0.7, 0.1, 0.2, 0.0]);
        assert_eq!(settings.search.population_size, 50);
        assert_eq!(settings.run.min_keys, 2);
        assert_eq!(settings.run.max_keys, 9);
        assert_eq!(settings.run.fitness, FitnessMode::Exact);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [search]
            population_size = 12

            [run]
            fitness = "heuristic"
            max_keys = 4
            "#,
        )
        .unwrap();
        assert_eq!(settings.search.population_size, 12);
        assert_eq!(settings.search.selection_size, 2);
        assert_eq!(settings.run.fitness, FitnessMode::Heuristic);
        assert_eq!(settings.run.max_keys, 4);
        assert_eq!(settings.run.min_keys, 2);
    }

    #[test]
    fn toml_round_trip() {
        let mut settings = Settings::default();
        settings.run.seed = Some(99);
        settings.search.max_generations = Some(40);
        let encoded = settings.to_toml().unwrap();
        let decoded: Settings = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, settings);
    }

    #[test]
    fn rejects_inverted_key_range() {
        let mut settings = Settings::default();
        settings.run.min_keys = 5;
        settings.run.max_keys = 3;
        assert!(matches!(
            settings.validate(),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_zero_restarts() {
        let mut settings = Settings::default();
        settings.run.restarts = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_bad_distribution() {
        let mut settings = Settings::default();
        settings.problem.probabilities = [0.5, 0.5, 0.5, 0.0];
        assert!(matches!(settings.validate(), Err(CliError::Policy(_))));
    }

    #[test]
    fn rejects_bad_search() {
        let mut settings = Settings::default();
        settings.search.selection_size = 51;
        assert!(matches!(settings.validate(), Err(CliError::Search(_))));
    }

    #[test]
    fn seeds_differ_per_key_count() {
        let mut settings = Settings::default();
        assert_eq!(settings.seed_for(3), None);
        settings.run.seed = Some(10);
        assert_eq!(settings.seed_for(3), Some(13));
        assert_ne!(settings.seed_for(3), settings.seed_for(4));
    }
}
