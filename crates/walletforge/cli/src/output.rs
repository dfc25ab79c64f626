//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;

use crate::error::CliResult;
use crate::restart::KeyReport;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable summary lines
    #[default]
    Text,
    /// One JSON object per key count
    Json,
}

/// Render one key-count report.
pub fn render(report: &KeyReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::Text => {
            let seconds = report.duration_ms as f64 / 1000.0;
            let policy = match &report.wallet {
                Some(wallet) => wallet.to_string().green().to_string(),
                None => "none found".dimmed().to_string(),
            };
            Ok(format!(
                "Number of keys: {}, Duration: {}s, Score: {}\n  Policy: {}",
                report.number_of_keys.to_string().bold(),
                format!("{:.3}", seconds).yellow(),
                format!("{:.6}", report.score).bold().cyan(),
                policy
            ))
        }
    }
}
