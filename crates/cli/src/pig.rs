//! Single-player Pig with a turn budget.
//!
//! Each turn the player rolls a die as often as they like, adding faces to a
//! running turn total. Holding banks the turn total and ends the turn; rolling
//! a one throws the turn total away and ends the turn. The game ends when the
//! banked score reaches the target or the turns run out, and is worth the
//! fraction of the target that was banked.

use chancetree_mcts::Simulator;
use rand::{Rng, RngCore};
use serde::Deserialize;
use thiserror::Error;

pub const FACES: u32 = 6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PigError {
    #[error("{action:?} is not legal while the die is rolling")]
    Rolling { action: PigAction },

    #[error("cannot roll the die outside a rolling state")]
    NotRolling,

    #[error("invalid rules: {0}")]
    InvalidRules(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PigAction {
    Roll,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PigState {
    pub banked: u32,
    pub turn_total: u32,
    pub turns_left: u32,
    /// The die is in the air
    pub rolling: bool,
}

/// Rules read from the `[pig]` table of the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PigRules {
    pub target: u32,
    pub turns: u32,
    /// Hide the outcome list so the engine has to sample rolls
    pub sampled: bool,
}

impl Default for PigRules {
    fn default() -> Self {
        Self {
            target: 30,
            turns: 5,
            sampled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pig {
    rules: PigRules,
}

impl Pig {
    pub fn new(rules: PigRules) -> Result<Self, PigError> {
        if rules.target == 0 {
            return Err(PigError::InvalidRules("target must be positive".into()));
        }
        if rules.turns == 0 {
            return Err(PigError::InvalidRules("at least one turn is required".into()));
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &PigRules {
        &self.rules
    }

    pub fn start(&self) -> PigState {
        PigState {
            banked: 0,
            turn_total: 0,
            turns_left: self.rules.turns,
            rolling: false,
        }
    }

    /// State after the die lands on `face`
    fn land(&self, state: &PigState, face: u32) -> PigState {
        if face == 1 {
            PigState {
                turn_total: 0,
                turns_left: state.turns_left - 1,
                rolling: false,
                ..*state
            }
        } else {
            PigState {
                turn_total: state.turn_total + face,
                rolling: false,
                ..*state
            }
        }
    }
}

impl Simulator for Pig {
    type State = PigState;
    type Action = PigAction;
    type Error = PigError;

    fn terminal_value(&self, state: &PigState) -> Result<Option<f64>, PigError> {
        if state.rolling {
            return Ok(None);
        }
        if state.banked >= self.rules.target {
            return Ok(Some(1.0));
        }
        if state.turns_left == 0 {
            return Ok(Some(state.banked as f64 / self.rules.target as f64));
        }
        Ok(None)
    }

    fn is_chance_node(&self, state: &PigState) -> Result<bool, PigError> {
        Ok(state.rolling)
    }

    fn chance_outcomes(&self, state: &PigState) -> Result<Vec<(PigState, f64)>, PigError> {
        if !state.rolling {
            return Err(PigError::NotRolling);
        }
        if self.rules.sampled {
            return Ok(Vec::new());
        }
        let p = 1.0 / FACES as f64;
        Ok((1..=FACES).map(|face| (self.land(state, face), p)).collect())
    }

    fn sample_chance(&self, state: &PigState, rng: &mut dyn RngCore) -> Result<PigState, PigError> {
        if !state.rolling {
            return Err(PigError::NotRolling);
        }
        let face = rng.gen_range(1..=FACES);
        Ok(self.land(state, face))
    }

    fn legal_actions(&self, state: &PigState) -> Result<Vec<PigAction>, PigError> {
        if state.rolling {
            return Ok(Vec::new());
        }
        // Holding on nothing just burns a turn
        if state.turn_total == 0 {
            Ok(vec![PigAction::Roll])
        } else {
            Ok(vec![PigAction::Roll, PigAction::Hold])
        }
    }

    fn step(&self, state: &PigState, action: &PigAction) -> Result<PigState, PigError> {
        if state.rolling {
            return Err(PigError::Rolling { action: *action });
        }
        Ok(match action {
            PigAction::Roll => PigState {
                rolling: true,
                ..*state
            },
            PigAction::Hold => PigState {
                banked: state.banked + state.turn_total,
                turn_total: 0,
                turns_left: state.turns_left - 1,
                rolling: false,
            },
        })
    }
}
