//! The generational search loop.
//!
//! Each generation is rebuilt wholesale into a fresh buffer and swapped in,
//! so no chromosome survives into the next generation except by copy. The
//! best-ever chromosome is tracked separately and need not be a member of the
//! final population.

use crate::cancel::CancellationToken;
use crate::config::SearchConfig;
use crate::entropy::EntropySource;
use crate::error::{EvolutionError, EvolutionResult};
use crate::types::{GenerationReport, HaltReason, Solution};

/// Scores a chromosome. Higher is fitter; scores of zero or below never count
/// as a fittest member.
pub type FitnessFn<C, X> = Box<dyn Fn(&C, &mut X) -> f64>;

/// Mutates a chromosome in place with the configured perturbation rate.
pub type PerturbFn<C, X> = Box<dyn Fn(&mut C, f64, &mut X)>;

// ── Evolution Engine ────────────────────────────────────────────────

/// Evolutionary search over chromosomes of type `C` using the shared random
/// source `X`.
pub struct EvolutionEngine<C, X> {
    config: SearchConfig,
    fitness: FitnessFn<C, X>,
    perturb: PerturbFn<C, X>,
    /// Current generation. A `None` slot was left empty by a tournament in
    /// which no member scored above zero.
    population: Vec<Option<C>>,
    best: Option<C>,
    best_score: f64,
    /// Consecutive generations without improvement.
    stagnation: u32,
    generation: u64,
    cancellation: CancellationToken,
}

impl<C: Clone, X: EntropySource> EvolutionEngine<C, X> {
    /// Create an engine after validating `config`.
    pub fn new(
        config: SearchConfig,
        fitness: FitnessFn<C, X>,
        perturb: PerturbFn<C, X>,
    ) -> EvolutionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fitness,
            perturb,
            population: Vec::new(),
            best: None,
            best_score: 0.0,
            stagnation: 0,
            generation: 0,
            cancellation: CancellationToken::new(),
        })
    }

    /// Attach a cancellation token checked between generations.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Fill the population with `population_size` fresh chromosomes and reset
    /// all search state.
    pub fn seed<F>(&mut self, ctx: &mut X, mut spawn: F)
    where
        F: FnMut(&mut X) -> C,
    {
        self.population = (0..self.config.population_size)
            .map(|_| Some(spawn(ctx)))
            .collect();
        self.best = None;
        self.best_score = 0.0;
        self.stagnation = 0;
        self.generation = 0;
    }

    /// Run one generation: score, track the best, rebuild the population.
    ///
    /// Every member is scored exactly once; those scores drive best tracking,
    /// elitism and all tournaments of this generation.
    pub fn step(&mut self, ctx: &mut X) -> GenerationReport {
        self.generation += 1;

        let scores: Vec<f64> = self
            .population
            .iter()
            .map(|slot| match slot {
                Some(chromosome) => (self.fitness)(chromosome, ctx),
                None => 0.0,
            })
            .collect();

        let fittest = fittest_of(&scores, 0..scores.len());
        let fittest_score = fittest.map_or(0.0, |i| scores[i]);

        let improved = fittest_score > self.best_score;
        if improved {
            self.best = fittest.and_then(|i| self.population[i].clone());
            self.best_score = fittest_score;
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }

        let size = self.config.population_size;
        let rate = self.config.perturb_probability;
        let mut next: Vec<Option<C>> = Vec::with_capacity(size);

        // Elitism: the current fittest survives unperturbed.
        next.push(fittest.and_then(|i| self.population[i].clone()));

        for _ in 1..size {
            let group = self.select_uniform(ctx, self.config.selection_size);
            let slot = fittest_of(&scores, group)
                .and_then(|i| self.population[i].clone())
                .map(|mut child| {
                    (self.perturb)(&mut child, rate, ctx);
                    child
                });
            next.push(slot);
        }

        let empty_slots = next.iter().filter(|slot| slot.is_none()).count();
        self.population = next;

        let report = GenerationReport {
            generation: self.generation,
            fittest_score,
            best_score: self.best_score,
            improved,
            stagnation: self.stagnation,
            empty_slots,
        };
        tracing::debug!(
            generation = report.generation,
            fittest_score = report.fittest_score,
            best_score = report.best_score,
            stagnation = report.stagnation,
            empty_slots = report.empty_slots,
            "Generation complete"
        );
        report
    }

    /// Evolve until stagnation, the generation cap, or cancellation.
    pub fn run(&mut self, ctx: &mut X) -> EvolutionResult<Solution<C>> {
        if self.population.is_empty() {
            return Err(EvolutionError::NotSeeded);
        }

        let halt_reason = loop {
            if let Some(reason) = self.halt_reason() {
                break reason;
            }
            self.step(ctx);
        };

        if self.best.is_none() {
            tracing::warn!(
                generations = self.generation,
                "Search ended without any chromosome scoring above zero"
            );
        }
        tracing::info!(
            reason = %halt_reason,
            generations = self.generation,
            best_score = self.best_score,
            "Search halted"
        );

        Ok(Solution {
            best: self.best.clone(),
            score: self.best_score,
            generations: self.generation,
            halt_reason,
        })
    }

    /// Pick `k` distinct population indices uniformly at random.
    pub fn select_uniform(&self, ctx: &mut X, k: usize) -> Vec<usize> {
        let len = self.population.len();
        rand::seq::index::sample(ctx.rng(), len, k.min(len)).into_vec()
    }

    fn halt_reason(&self) -> Option<HaltReason> {
        if self.stagnation >= self.config.iterations_to_halt {
            Some(HaltReason::Stagnated)
        } else if self.cancellation.is_cancelled() {
            Some(HaltReason::Cancelled)
        } else if self
            .config
            .max_generations
            .is_some_and(|max| self.generation >= max)
        {
            Some(HaltReason::GenerationCap)
        } else {
            None
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halt_reason().is_some()
    }

    pub fn best(&self) -> Option<&C> {
        self.best.as_ref()
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn stagnation(&self) -> u32 {
        self.stagnation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> &[Option<C>] {
        &self.population
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

/// Index of the highest-scoring member among `members`.
///
/// The first maximum wins ties. Members scoring zero or below, and NaN
/// scores, never qualify, so an all-zero group has no fittest.
fn fittest_of(scores: &[f64], members: impl IntoIterator<Item = usize>) -> Option<usize> {
    let mut best_score = 0.0;
    let mut fittest = None;
    for i in members {
        if scores[i] > best_score {
            best_score = scores[i];
            fittest = Some(i);
        }
    }
    fittest
}
