//! CLI error types

use thiserror::Error;
use walletforge_evolution::EvolutionError;
use walletforge_policy::PolicyError;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings file error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("settings encoding error: {0}")]
    SettingsEncode(#[from] toml::ser::Error),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Search error: {0}")]
    Search(#[from] EvolutionError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
