//! Property tests for scenarios and wallets: enumeration, normalization,
//! perturbation and satisfaction semantics.

use proptest::prelude::*;
use std::collections::HashSet;
use walletforge_policy::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// A normalized probability vector over the four key states.
fn arb_probabilities() -> impl Strategy<Value = [f64; 4]> {
    prop::array::uniform4(0.0f64..1.0)
        .prop_filter("weights must not all vanish", |w| w.iter().sum::<f64>() > 1e-3)
        .prop_map(|w| {
            let sum: f64 = w.iter().sum();
            [w[0] / sum, w[1] / sum, w[2] / sum, w[3] / sum]
        })
}

fn context(keys: usize, probabilities: [f64; 4], seed: u64) -> RandomContext {
    RandomContext::with_seed(ProblemConfig::new(keys, probabilities), seed).unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Advancing from all-safe visits each of the 4^n scenarios once, then
    /// wraps back to all-safe.
    #[test]
    fn enumeration_is_complete(keys in 1usize..=5) {
        let ctx = context(keys, [1.0, 0.0, 0.0, 0.0], 0);
        let start = Scenario::new(&ctx);
        let mut scenario = start.clone();
        let mut seen = HashSet::new();
        loop {
            prop_assert!(seen.insert(scenario.clone()));
            if !scenario.advance() {
                break;
            }
        }
        prop_assert_eq!(seen.len() as u64, ctx.scenario_space_size());
        prop_assert_eq!(scenario, start);
    }

    /// Scenario probabilities over the whole space sum to one.
    #[test]
    fn probabilities_are_normalized(keys in 1usize..=5, probabilities in arb_probabilities()) {
        let ctx = context(keys, probabilities, 0);
        let mut scenario = Scenario::new(&ctx);
        let mut total = 0.0;
        loop {
            total += scenario.probability(&ctx);
            if !scenario.advance() {
                break;
            }
        }
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    /// Exact success probability is a probability.
    #[test]
    fn success_probability_is_bounded(
        keys in 1usize..=4,
        probabilities in arb_probabilities(),
        seed in any::<u64>(),
    ) {
        let mut ctx = context(keys, probabilities, seed);
        let wallet = Wallet::random(&mut ctx);
        let p = wallet.success_probability(&ctx);
        prop_assert!((-1e-12..=1.0 + 1e-9).contains(&p));
    }

    /// Perturbing with rate 0 never changes a wallet.
    #[test]
    fn perturb_zero_is_identity(keys in 1usize..=8, seed in any::<u64>()) {
        let mut ctx = context(keys, [0.7, 0.1, 0.2, 0.0], seed);
        let original = Wallet::random(&mut ctx);
        let mut wallet = original.clone();
        wallet.perturb(0.0, &mut ctx);
        prop_assert_eq!(wallet, original);
    }

    /// Perturbing with rate 1 complements one clause and nothing else.
    #[test]
    fn perturb_one_complements_one_clause(keys in 1usize..=8, seed in any::<u64>()) {
        let mut ctx = context(keys, [0.7, 0.1, 0.2, 0.0], seed);
        let original = Wallet::random(&mut ctx);
        let mut wallet = original.clone();
        wallet.perturb(1.0, &mut ctx);

        prop_assert_eq!(wallet.clauses().len(), original.clauses().len());
        let complemented = original
            .clauses()
            .iter()
            .zip(wallet.clauses())
            .filter(|(before, after)| before.iter().zip(after.iter()).all(|(a, b)| a != b))
            .count();
        let unchanged = original
            .clauses()
            .iter()
            .zip(wallet.clauses())
            .filter(|(before, after)| before == after)
            .count();
        prop_assert_eq!(complemented, 1);
        prop_assert_eq!(unchanged, original.clauses().len() - 1);
    }

    /// Granting more keys never breaks satisfaction.
    #[test]
    fn satisfaction_is_monotone(
        seed in any::<u64>(),
        availability in prop::collection::vec(any::<bool>(), 5),
        extra in prop::collection::vec(any::<bool>(), 5),
    ) {
        let mut ctx = context(5, [0.7, 0.1, 0.2, 0.0], seed);
        let wallet = Wallet::random(&mut ctx);
        let widened: Vec<bool> = availability.iter().zip(&extra).map(|(a, b)| *a || *b).collect();
        if wallet.satisfies(&availability) {
            prop_assert!(wallet.satisfies(&widened));
        }
    }

    /// Random scenarios always decode to a valid index.
    #[test]
    fn randomized_scenarios_stay_in_space(keys in 1usize..=10, seed in any::<u64>()) {
        let mut ctx = context(keys, [0.7, 0.1, 0.2, 0.0], seed);
        let mut scenario = Scenario::new(&ctx);
        for _ in 0..20 {
            scenario.randomize(&mut ctx);
            prop_assert_eq!(scenario.states().len(), keys);
            prop_assert!(scenario.index() < ctx.scenario_space_size());
            prop_assert_eq!(&Scenario::from_index(&ctx, scenario.index()), &scenario);
        }
    }
}
