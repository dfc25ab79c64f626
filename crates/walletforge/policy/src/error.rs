use walletforge_evolution::EvolutionError;

use crate::scenario::KeyState;

/// Errors from policy configuration and search.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("number_of_keys must be at least 1")]
    InvalidKeyCount,
    #[error("number_of_keys {keys} exceeds the supported maximum of {max}")]
    TooManyKeys { keys: usize, max: usize },
    #[error("invalid probability {value} for {state} keys")]
    InvalidProbability { state: KeyState, value: f64 },
    #[error("key-state probabilities sum to {0}, expected 1")]
    ProbabilitySum(f64),
    #[error("a wallet needs at least one clause")]
    EmptyWallet,
    #[error("clause has {found} keys, expected {expected}")]
    ClauseLength { expected: usize, found: usize },
    #[error(transparent)]
    Evolution(#[from] EvolutionError),
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
