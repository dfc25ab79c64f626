//! Fitness selection and the binding of wallet operators to the engine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use walletforge_evolution::{
    CancellationToken, EvolutionEngine, FitnessFn, PerturbFn, SearchConfig, Solution,
};

use crate::context::RandomContext;
use crate::error::PolicyResult;
use crate::wallet::Wallet;

/// Which success metric scores wallets during the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMode {
    /// Exact success probability over the whole scenario space.
    #[default]
    Exact,
    /// Unnormalized Monte-Carlo sum over sampled scenarios.
    Heuristic,
}

impl FitnessMode {
    pub fn score(self, wallet: &Wallet, ctx: &mut RandomContext) -> f64 {
        match self {
            FitnessMode::Exact => wallet.success_probability(ctx),
            FitnessMode::Heuristic => wallet.success_heuristic(ctx),
        }
    }
}

impl std::fmt::Display for FitnessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitnessMode::Exact => write!(f, "exact"),
            FitnessMode::Heuristic => write!(f, "heuristic"),
        }
    }
}

impl FromStr for FitnessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" | "probability" => Ok(FitnessMode::Exact),
            "heuristic" | "sampled" => Ok(FitnessMode::Heuristic),
            other => Err(format!(
                "unknown fitness mode '{}', expected 'exact' or 'heuristic'",
                other
            )),
        }
    }
}

/// An engine over wallets scored by `mode` and mutated by
/// [`Wallet::perturb`].
pub fn wallet_engine(
    search: SearchConfig,
    mode: FitnessMode,
) -> PolicyResult<EvolutionEngine<Wallet, RandomContext>> {
    let fitness: FitnessFn<Wallet, RandomContext> =
        Box::new(move |wallet: &Wallet, ctx: &mut RandomContext| mode.score(wallet, ctx));
    let perturb: PerturbFn<Wallet, RandomContext> =
        Box::new(|wallet: &mut Wallet, rate: f64, ctx: &mut RandomContext| {
            wallet.perturb(rate, ctx)
        });
    Ok(EvolutionEngine::new(search, fitness, perturb)?)
}

/// Seed a population of random wallets and evolve it to completion.
pub fn evolve(
    ctx: &mut RandomContext,
    search: SearchConfig,
    mode: FitnessMode,
) -> PolicyResult<Solution<Wallet>> {
    evolve_with_cancellation(ctx, search, mode, CancellationToken::new())
}

/// [`evolve`], stopping early once `token` is cancelled.
pub fn evolve_with_cancellation(
    ctx: &mut RandomContext,
    search: SearchConfig,
    mode: FitnessMode,
    token: CancellationToken,
) -> PolicyResult<Solution<Wallet>> {
    tracing::debug!(
        keys = ctx.number_of_keys(),
        mode = %mode,
        population = search.population_size,
        "Starting wallet search"
    );
    let mut engine = wallet_engine(search, mode)?.with_cancellation(token);
    engine.seed(ctx, Wallet::random);
    Ok(engine.run(ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProblemConfig;
    use crate::error::PolicyError;
    use walletforge_evolution::HaltReason;

    fn context(keys: usize, seed: u64) -> RandomContext {
        RandomContext::with_seed(ProblemConfig::new(keys, [0.7, 0.1, 0.2, 0.0]), seed).unwrap()
    }

    #[test]
    fn parse_fitness_mode() {
        assert_eq!("exact".parse::<FitnessMode>().unwrap(), FitnessMode::Exact);
        assert_eq!(
            "Heuristic".parse::<FitnessMode>().unwrap(),
            FitnessMode::Heuristic
        );
        assert!("fastest".parse::<FitnessMode>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for mode in [FitnessMode::Exact, FitnessMode::Heuristic] {
            assert_eq!(mode.to_string().parse::<FitnessMode>().unwrap(), mode);
        }
    }

    #[test]
    fn exact_score_matches_success_probability() {
        let mut ctx = context(3, 5);
        let wallet = Wallet::random(&mut ctx);
        let expected = wallet.success_probability(&ctx);
        assert_eq!(FitnessMode::Exact.score(&wallet, &mut ctx), expected);
    }

    #[test]
    fn invalid_search_config_surfaces_as_policy_error() {
        let search = SearchConfig::default().with_selection_size(100);
        assert!(matches!(
            wallet_engine(search, FitnessMode::Exact),
            Err(PolicyError::Evolution(_))
        ));
    }

    #[test]
    fn evolve_exact_finds_good_wallet() {
        let mut ctx = context(3, 17);
        let solution = evolve(&mut ctx, SearchConfig::default(), FitnessMode::Exact).unwrap();
        let best = solution.best.expect("a wallet should score above zero");
        assert_eq!(solution.halt_reason, HaltReason::Stagnated);
        assert!((best.success_probability(&ctx) - solution.score).abs() < 1e-12);
        // A single safe key already succeeds with probability 0.7.
        assert!(solution.score >= 0.7);
    }

    #[test]
    fn evolve_heuristic_runs_to_completion() {
        let mut ctx = context(2, 23);
        let search = SearchConfig::default()
            .with_population_size(20)
            .with_max_generations(50);
        let solution = evolve(&mut ctx, search, FitnessMode::Heuristic).unwrap();
        assert!(solution.generations > 0);
        if let Some(best) = solution.best {
            assert!(best.success_probability(&ctx) > 0.0);
        }
    }

    #[test]
    fn evolve_all_stolen_finds_nothing() {
        let mut ctx =
            RandomContext::with_seed(ProblemConfig::new(2, [0.0, 0.0, 0.0, 1.0]), 1).unwrap();
        let search = SearchConfig::default().with_iterations_to_halt(3);
        let solution = evolve(&mut ctx, search, FitnessMode::Exact).unwrap();
        assert!(solution.best.is_none());
        assert_eq!(solution.generations, 3);
    }

    #[test]
    fn cancelled_search_returns_immediately() {
        let mut ctx = context(3, 29);
        let token = CancellationToken::new();
        token.cancel();
        let solution =
            evolve_with_cancellation(&mut ctx, SearchConfig::default(), FitnessMode::Exact, token)
                .unwrap();
        assert_eq!(solution.halt_reason, HaltReason::Cancelled);
        assert_eq!(solution.generations, 0);
    }
}
