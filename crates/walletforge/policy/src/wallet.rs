//! Wallet policies in disjunctive normal form and their success metrics.

use serde::{Deserialize, Serialize};

use crate::context::RandomContext;
use crate::error::{PolicyError, PolicyResult};
use crate::scenario::Scenario;

/// An access policy over `n` keys: an OR of clauses, each clause an AND of
/// the keys it marks.
///
/// A wallet always has at least one clause and every clause has exactly one
/// entry per key. Perturbation only flips bits; it never adds or removes
/// clauses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWallet")]
pub struct Wallet {
    clauses: Vec<Vec<bool>>,
}

/// Wire form of a wallet, checked for shape before it becomes a `Wallet`.
#[derive(Deserialize)]
struct RawWallet {
    clauses: Vec<Vec<bool>>,
}

impl TryFrom<RawWallet> for Wallet {
    type Error = PolicyError;

    /// Without a context the key count is taken from the first clause; every
    /// other clause must match it.
    fn try_from(raw: RawWallet) -> PolicyResult<Self> {
        let expected = raw.clauses.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(PolicyError::EmptyWallet);
        }
        check_shape(&raw.clauses, expected)?;
        Ok(Self {
            clauses: raw.clauses,
        })
    }
}

fn check_shape(clauses: &[Vec<bool>], expected: usize) -> PolicyResult<()> {
    if clauses.is_empty() {
        return Err(PolicyError::EmptyWallet);
    }
    if let Some(clause) = clauses.iter().find(|c| c.len() != expected) {
        return Err(PolicyError::ClauseLength {
            expected,
            found: clause.len(),
        });
    }
    Ok(())
}

impl Wallet {
    /// A random wallet with between 1 and `floor(1.5 * n)` clauses, each key
    /// joining each clause on a fair coin flip.
    pub fn random(ctx: &mut RandomContext) -> Self {
        let keys = ctx.number_of_keys();
        let max_clauses = keys * 3 / 2;
        let count = ctx.sample_uniform_int(1, max_clauses);
        let clauses = (0..count)
            .map(|_| (0..keys).map(|_| ctx.sample_bernoulli(0.5)).collect())
            .collect();
        Self { clauses }
    }

    /// Build a wallet from explicit clauses, checking them against the
    /// context's key count.
    pub fn from_clauses(ctx: &RandomContext, clauses: Vec<Vec<bool>>) -> PolicyResult<Self> {
        check_shape(&clauses, ctx.number_of_keys())?;
        Ok(Self { clauses })
    }

    /// Check that the wallet covers exactly the context's keys. Needed for
    /// wallets that were deserialized rather than built on `ctx`.
    pub fn check_keys(&self, ctx: &RandomContext) -> PolicyResult<()> {
        check_shape(&self.clauses, ctx.number_of_keys())
    }

    pub fn clauses(&self) -> &[Vec<bool>] {
        &self.clauses
    }

    /// Whether some clause's required keys are all in `availability`.
    ///
    /// A clause whose length differs from `availability` is never satisfied.
    pub fn satisfies(&self, availability: &[bool]) -> bool {
        self.clauses.iter().any(|clause| {
            clause.len() == availability.len()
                && clause
                    .iter()
                    .zip(availability)
                    .all(|(&required, &available)| !required || available)
        })
    }

    /// The owner can use the wallet and the adversary cannot.
    pub fn succeeds_on(&self, scenario: &Scenario) -> bool {
        let availability = scenario.availability();
        self.satisfies(&availability.owner) && !self.satisfies(&availability.adversary)
    }

    /// Pick one clause uniformly and flip each of its bits with probability
    /// `probability`.
    pub fn perturb(&mut self, probability: f64, ctx: &mut RandomContext) {
        let Some(last) = self.clauses.len().checked_sub(1) else {
            return;
        };
        let target = ctx.sample_uniform_int(0, last);
        for bit in self.clauses[target].iter_mut() {
            if ctx.sample_bernoulli(probability) {
                *bit = !*bit;
            }
        }
    }

    /// Exact probability that the wallet succeeds, summed over all `4^n`
    /// scenarios.
    pub fn success_probability(&self, ctx: &RandomContext) -> f64 {
        let mut scenario = Scenario::new(ctx);
        let mut score = 0.0;
        loop {
            if self.succeeds_on(&scenario) {
                score += scenario.probability(ctx);
            }
            if !scenario.advance() {
                break;
            }
        }
        score
    }

    /// Sum of scenario probabilities over `sample_size` uniformly drawn
    /// scenarios in which the wallet succeeds.
    ///
    /// The sum is not normalized: its expectation is
    /// `sample_size / 4^n * success_probability()`. It ranks wallets the same
    /// way the exact metric does but is not itself a probability.
    pub fn success_heuristic(&self, ctx: &mut RandomContext) -> f64 {
        let mut scenario = Scenario::new(ctx);
        let mut score = 0.0;
        for _ in 0..ctx.sample_size() {
            scenario.randomize(ctx);
            if self.succeeds_on(&scenario) {
                score += scenario.probability(ctx);
            }
        }
        score
    }
}

impl std::fmt::Display for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            let keys: Vec<String> = clause
                .iter()
                .enumerate()
                .filter(|(_, &required)| required)
                .map(|(key, _)| format!("k{}", key))
                .collect();
            if keys.is_empty() {
                write!(f, "(true)")?;
            } else {
                write!(f, "({})", keys.join(" & "))?;
            }
        }
        Ok(())
    }
}
