//! Random-restart driver: independent searches on one context, re-scored
//! with the exact metric.

use std::time::Instant;

use serde::Serialize;
use walletforge_evolution::{CancellationToken, SearchConfig};
use walletforge_policy::{evolve_with_cancellation, FitnessMode, RandomContext, Wallet};

use crate::error::CliResult;

/// How to search one key count.
#[derive(Clone, Debug, PartialEq)]
pub struct RestartPlan {
    pub search: SearchConfig,
    pub fitness: FitnessMode,
    pub restarts: usize,
}

/// Outcome of all restarts for one key count.
#[derive(Clone, Debug, Serialize)]
pub struct KeyReport {
    pub number_of_keys: usize,
    pub fitness: FitnessMode,
    pub restarts: usize,
    /// Generations summed over all restarts.
    pub generations: u64,
    /// Wall-clock time spent searching, excluding the final re-scoring.
    pub duration_ms: u64,
    /// Exact success probability of `wallet`, 0 when none was found.
    pub score: f64,
    pub wallet: Option<Wallet>,
}

/// Run every restart of `plan` and keep the wallet with the best exact score.
pub fn run_restarts(ctx: &mut RandomContext, plan: &RestartPlan) -> CliResult<KeyReport> {
    run_restarts_with_cancellation(ctx, plan, &CancellationToken::new())
}

/// Like [`run_restarts`], stopping early once `token` is cancelled. Restarts
/// not yet begun are skipped; a running search stops between generations.
pub fn run_restarts_with_cancellation(
    ctx: &mut RandomContext,
    plan: &RestartPlan,
    token: &CancellationToken,
) -> CliResult<KeyReport> {
    let start = Instant::now();
    let mut candidates = Vec::with_capacity(plan.restarts);
    let mut generations = 0;

    for restart in 0..plan.restarts {
        if token.is_cancelled() {
            tracing::warn!(restart, "Cancelled before all restarts completed");
            break;
        }
        let solution =
            evolve_with_cancellation(ctx, plan.search.clone(), plan.fitness, token.clone())?;
        generations += solution.generations;
        tracing::info!(
            keys = ctx.number_of_keys(),
            restart,
            generations = solution.generations,
            score = solution.score,
            "Restart complete"
        );
        candidates.extend(solution.best);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    let (wallet, score) = match best_by_exact_score(ctx, candidates) {
        Some((wallet, score)) => (Some(wallet), score),
        None => (None, 0.0),
    };

    Ok(KeyReport {
        number_of_keys: ctx.number_of_keys(),
        fitness: plan.fitness,
        restarts: plan.restarts,
        generations,
        duration_ms,
        score,
        wallet,
    })
}

/// The first candidate with the highest exact success probability above zero.
fn best_by_exact_score(ctx: &RandomContext, candidates: Vec<Wallet>) -> Option<(Wallet, f64)> {
    let mut best: Option<(Wallet, f64)> = None;
    for wallet in candidates {
        let score = wallet.success_probability(ctx);
        let best_score = best.as_ref().map_or(0.0, |(_, s)| *s);
        if score > best_score {
            best = Some((wallet, score));
        }
    }
    best
}
