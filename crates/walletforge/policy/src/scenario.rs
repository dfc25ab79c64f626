//! Key states, joint scenarios over all keys, and the availability each
//! scenario grants to the owner and the adversary.

use serde::{Deserialize, Serialize};

use crate::context::RandomContext;

/// Compromise status of a single key. Discriminants are the base-4 digits
/// used when a scenario is read as a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum KeyState {
    Safe = 0,
    Lost = 1,
    Leaked = 2,
    Stolen = 3,
}

impl KeyState {
    pub const ALL: [KeyState; 4] = [
        KeyState::Safe,
        KeyState::Lost,
        KeyState::Leaked,
        KeyState::Stolen,
    ];

    pub fn digit(self) -> u8 {
        self as u8
    }

    pub fn from_digit(digit: u8) -> Option<Self> {
        Self::ALL.get(digit as usize).copied()
    }

    /// The owner can still use a key that is neither lost nor stolen.
    pub fn owner_holds(self) -> bool {
        !matches!(self, KeyState::Lost | KeyState::Stolen)
    }

    /// The adversary can use a key that leaked or was stolen.
    pub fn adversary_holds(self) -> bool {
        matches!(self, KeyState::Leaked | KeyState::Stolen)
    }
}

impl std::fmt::Display for KeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyState::Safe => write!(f, "safe"),
            KeyState::Lost => write!(f, "lost"),
            KeyState::Leaked => write!(f, "leaked"),
            KeyState::Stolen => write!(f, "stolen"),
        }
    }
}

/// Which keys each party can use in a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Availability {
    pub owner: Vec<bool>,
    pub adversary: Vec<bool>,
}

/// One state per key, in fixed key order.
///
/// Read as a base-4 number with the first key as the most significant digit,
/// a scenario ranges over `[0, 4^n)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scenario {
    states: Vec<KeyState>,
}

impl Scenario {
    /// The all-safe scenario, index 0.
    pub fn new(ctx: &RandomContext) -> Self {
        Self {
            states: vec![KeyState::Safe; ctx.number_of_keys()],
        }
    }

    pub fn from_states(states: Vec<KeyState>) -> Self {
        Self { states }
    }

    /// Decode `index` into a scenario. Digits above the key count are ignored.
    pub fn from_index(ctx: &RandomContext, index: u64) -> Self {
        let mut scenario = Self::new(ctx);
        scenario.decode(index);
        scenario
    }

    pub fn states(&self) -> &[KeyState] {
        &self.states
    }

    /// The base-4 value of this scenario.
    pub fn index(&self) -> u64 {
        self.states
            .iter()
            .fold(0u64, |acc, state| acc * 4 + state.digit() as u64)
    }

    /// Step to the next scenario in counting order.
    ///
    /// Returns `false` when the counter wraps from all-stolen back to
    /// all-safe, so starting from all-safe every scenario is visited exactly
    /// once before the first `false`.
    pub fn advance(&mut self) -> bool {
        for state in self.states.iter_mut().rev() {
            if *state == KeyState::Stolen {
                *state = KeyState::Safe;
            } else {
                *state = KeyState::from_digit(state.digit() + 1).unwrap_or(KeyState::Safe);
                return true;
            }
        }
        false
    }

    /// Replace every state with a uniformly drawn scenario.
    pub fn randomize(&mut self, ctx: &mut RandomContext) {
        let last = ctx.scenario_space_size() - 1;
        let index = ctx.sample_uniform_int(0, last);
        self.decode(index);
    }

    /// Probability of this scenario: the product of the per-key state
    /// probabilities, keys being independent and identically distributed.
    pub fn probability(&self, ctx: &RandomContext) -> f64 {
        self.states
            .iter()
            .map(|&state| ctx.probability_of(state))
            .product()
    }

    pub fn availability(&self) -> Availability {
        Availability {
            owner: self.states.iter().map(|s| s.owner_holds()).collect(),
            adversary: self.states.iter().map(|s| s.adversary_holds()).collect(),
        }
    }

    fn decode(&mut self, mut index: u64) {
        for state in self.states.iter_mut().rev() {
            *state = KeyState::from_digit((index % 4) as u8).unwrap_or(KeyState::Safe);
            index /= 4;
        }
    }
}
