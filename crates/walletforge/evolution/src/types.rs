use serde::{Deserialize, Serialize};

/// Why a search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// The best score did not improve for `iterations_to_halt` generations.
    Stagnated,
    /// `max_generations` was reached.
    GenerationCap,
    /// The cancellation token was tripped.
    Cancelled,
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaltReason::Stagnated => write!(f, "stagnated"),
            HaltReason::GenerationCap => write!(f, "generation cap"),
            HaltReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Summary of one completed generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// 1-based generation number.
    pub generation: u64,
    /// Score of this generation's fittest member, 0.0 when there was none.
    pub fittest_score: f64,
    /// Best score observed across all generations so far.
    pub best_score: f64,
    /// Whether this generation raised the best score.
    pub improved: bool,
    /// Consecutive generations without improvement.
    pub stagnation: u32,
    /// Slots of the next generation left empty by score-less tournaments.
    pub empty_slots: usize,
}

/// Final result of a search run.
#[derive(Clone, Debug)]
pub struct Solution<C> {
    /// Best chromosome ever observed; `None` if nothing scored above zero.
    pub best: Option<C>,
    /// Score of `best` at the time it was recorded.
    pub score: f64,
    /// Number of generations executed.
    pub generations: u64,
    pub halt_reason: HaltReason,
}

impl<C> Solution<C> {
    pub fn is_found(&self) -> bool {
        self.best.is_some()
    }
}
