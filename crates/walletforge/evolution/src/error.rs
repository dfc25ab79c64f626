/// Errors from the evolution engine.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
    #[error("population has not been seeded")]
    NotSeeded,
}

/// Result type for evolution operations.
pub type EvolutionResult<T> = Result<T, EvolutionError>;
