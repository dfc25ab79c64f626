//! WalletForge CLI - sweep key counts and search for resilient wallet policies
//!
//! For every key count in the sweep the CLI builds one random context, runs
//! the configured number of independent searches on it, re-scores each
//! search's best wallet with the exact success probability, and prints the
//! overall best together with the wall-clock search time.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`--config`), then individual flags.

use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walletforge_policy::{FitnessMode, RandomContext};

pub mod error;
pub mod output;
pub mod restart;
pub mod settings;

pub use error::{CliError, CliResult};
pub use restart::{run_restarts, run_restarts_with_cancellation, KeyReport, RestartPlan};
pub use settings::Settings;

/// WalletForge CLI application
#[derive(Parser, Debug)]
#[command(name = "walletforge")]
#[command(about = "Evolutionary search for key-compromise resilient wallet policies", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML settings file
    #[arg(short, long, env = "WALLETFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Search a single key count (overrides --min-keys/--max-keys)
    #[arg(short, long)]
    keys: Option<usize>,

    /// First key count of the sweep
    #[arg(long)]
    min_keys: Option<usize>,

    /// Last key count of the sweep, inclusive
    #[arg(long)]
    max_keys: Option<usize>,

    /// Safe, lost, leaked and stolen probabilities, comma separated
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    probabilities: Option<Vec<f64>>,

    /// Heuristic weight (carried through, not applied to scores)
    #[arg(long)]
    weight: Option<f64>,

    /// Fitness used during the search (exact or heuristic)
    #[arg(short, long, env = "WALLETFORGE_FITNESS")]
    fitness: Option<FitnessMode>,

    /// Independent searches per key count
    #[arg(short, long)]
    restarts: Option<usize>,

    /// Population size
    #[arg(long)]
    population: Option<usize>,

    /// Tournament size
    #[arg(long)]
    selection: Option<usize>,

    /// Generations without improvement before a search halts
    #[arg(long)]
    halt_after: Option<u32>,

    /// Per-bit flip probability of the perturbation operator
    #[arg(long)]
    perturb: Option<f64>,

    /// Hard cap on generations per search
    #[arg(long)]
    max_generations: Option<u64>,

    /// Seed for reproducible runs
    #[arg(long, env = "WALLETFORGE_SEED")]
    seed: Option<u64>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: output::OutputFormat,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Defaults, overlaid with the settings file, overlaid with flags.
    fn settings(&self) -> CliResult<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(keys) = self.keys {
            settings.run.min_keys = keys;
            settings.run.max_keys = keys;
        }
        if let Some(min) = self.min_keys {
            settings.run.min_keys = min;
        }
        if let Some(max) = self.max_keys {
            settings.run.max_keys = max;
        }
        if let Some(probabilities) = &self.probabilities {
            settings.problem.probabilities =
                probabilities.as_slice().try_into().map_err(|_| {
                    CliError::InvalidArgument(format!(
                        "expected 4 probabilities (safe,lost,leaked,stolen), got {}",
                        probabilities.len()
                    ))
                })?;
        }
        if let Some(weight) = self.weight {
            settings.problem.heuristic_weight = weight;
        }
        if let Some(fitness) = self.fitness {
            settings.run.fitness = fitness;
        }
        if let Some(restarts) = self.restarts {
            settings.run.restarts = restarts;
        }
        if let Some(population) = self.population {
            settings.search.population_size = population;
        }
        if let Some(selection) = self.selection {
            settings.search.selection_size = selection;
        }
        if let Some(halt_after) = self.halt_after {
            settings.search.iterations_to_halt = halt_after;
        }
        if let Some(perturb) = self.perturb {
            settings.search.perturb_probability = perturb;
        }
        if let Some(max) = self.max_generations {
            settings.search.max_generations = Some(max);
        }
        if let Some(seed) = self.seed {
            settings.run.seed = Some(seed);
        }

        settings.validate()?;
        Ok(settings)
    }
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing; stdout is reserved for reports.
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .try_init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = cli.settings()?;
    let mut stdout = std::io::stdout().lock();

    if cli.dump_config {
        write!(stdout, "{}", settings.to_toml()?)?;
        return Ok(());
    }

    let plan = settings.restart_plan();
    tracing::info!(
        min_keys = settings.run.min_keys,
        max_keys = settings.run.max_keys,
        restarts = plan.restarts,
        fitness = %plan.fitness,
        "Starting sweep"
    );

    for keys in settings.run.min_keys..=settings.run.max_keys {
        let problem = settings.problem_for(keys);
        let mut ctx = match settings.seed_for(keys) {
            Some(seed) => RandomContext::with_seed(problem, seed)?,
            None => RandomContext::new(problem)?,
        };
        let report = run_restarts(&mut ctx, &plan)?;
        tracing::info!(
            keys,
            score = report.score,
            duration_ms = report.duration_ms,
            "Key count complete"
        );
        writeln!(stdout, "{}", output::render(&report, cli.output)?)?;
    }

    Ok(())
}
