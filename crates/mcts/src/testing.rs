//! Toy simulators shared by the unit tests.

use std::convert::Infallible;

use rand::{Rng, RngCore};

use crate::simulator::Simulator;

/// Root chooses A (+1) or B (-1)
pub struct TwoStep;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TwoStepState {
    Start,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwoStepAction {
    A,
    B,
}

impl Simulator for TwoStep {
    type State = TwoStepState;
    type Action = TwoStepAction;
    type Error = Infallible;

    fn terminal_value(&self, state: &TwoStepState) -> Result<Option<f64>, Infallible> {
        Ok(match state {
            TwoStepState::Start => None,
            TwoStepState::Won => Some(1.0),
            TwoStepState::Lost => Some(-1.0),
        })
    }

    fn is_chance_node(&self, _state: &TwoStepState) -> Result<bool, Infallible> {
        Ok(false)
    }

    fn sample_chance(
        &self,
        state: &TwoStepState,
        _rng: &mut dyn RngCore,
    ) -> Result<TwoStepState, Infallible> {
        Ok(*state)
    }

    fn legal_actions(&self, state: &TwoStepState) -> Result<Vec<TwoStepAction>, Infallible> {
        Ok(match state {
            TwoStepState::Start => vec![TwoStepAction::A, TwoStepAction::B],
            _ => Vec::new(),
        })
    }

    fn step(&self, _state: &TwoStepState, action: &TwoStepAction) -> Result<TwoStepState, Infallible> {
        Ok(match action {
            TwoStepAction::A => TwoStepState::Won,
            TwoStepAction::B => TwoStepState::Lost,
        })
    }
}

/// One forced "Roll" into a die with the given face probabilities.
///
/// Face `i` is terminal with value `i + 1`. With `enumerable == false` the
/// outcomes are only reachable through sampling.
pub struct DiceGame {
    pub probabilities: Vec<f64>,
    pub enumerable: bool,
}

impl DiceGame {
    pub fn sampled() -> Self {
        Self {
            enumerable: false,
            ..Self::default()
        }
    }
}

impl Default for DiceGame {
    fn default() -> Self {
        Self {
            probabilities: vec![1.0 / 6.0; 6],
            enumerable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiceState {
    Start,
    Rolling,
    Rolled(usize),
}

impl Simulator for DiceGame {
    type State = DiceState;
    type Action = &'static str;
    type Error = Infallible;

    fn terminal_value(&self, state: &DiceState) -> Result<Option<f64>, Infallible> {
        Ok(match state {
            DiceState::Rolled(face) => Some(*face as f64 + 1.0),
            _ => None,
        })
    }

    fn is_chance_node(&self, state: &DiceState) -> Result<bool, Infallible> {
        Ok(*state == DiceState::Rolling)
    }

    fn chance_outcomes(&self, _state: &DiceState) -> Result<Vec<(DiceState, f64)>, Infallible> {
        if !self.enumerable {
            return Ok(Vec::new());
        }
        Ok(self
            .probabilities
            .iter()
            .enumerate()
            .map(|(face, &p)| (DiceState::Rolled(face), p))
            .collect())
    }

    fn sample_chance(&self, _state: &DiceState, rng: &mut dyn RngCore) -> Result<DiceState, Infallible> {
        Ok(DiceState::Rolled(rng.gen_range(0..self.probabilities.len())))
    }

    fn legal_actions(&self, state: &DiceState) -> Result<Vec<&'static str>, Infallible> {
        Ok(match state {
            DiceState::Start => vec!["Roll"],
            _ => Vec::new(),
        })
    }

    fn step(&self, _state: &DiceState, _action: &&'static str) -> Result<DiceState, Infallible> {
        Ok(DiceState::Rolling)
    }
}

/// `length` forced single-action steps, then a fork into +1 / -1 terminals
pub struct Corridor {
    pub length: u32,
}

impl Corridor {
    pub fn new(length: u32) -> Self {
        Self { length }
    }

    pub fn start(&self) -> u32 {
        0
    }

    pub fn fork(&self) -> u32 {
        self.length
    }
}

impl Simulator for Corridor {
    type State = u32;
    type Action = u8;
    type Error = Infallible;

    fn terminal_value(&self, state: &u32) -> Result<Option<f64>, Infallible> {
        Ok(if *state == self.length + 1 {
            Some(1.0)
        } else if *state == self.length + 2 {
            Some(-1.0)
        } else {
            None
        })
    }

    fn is_chance_node(&self, _state: &u32) -> Result<bool, Infallible> {
        Ok(false)
    }

    fn sample_chance(&self, state: &u32, _rng: &mut dyn RngCore) -> Result<u32, Infallible> {
        Ok(*state)
    }

    fn legal_actions(&self, state: &u32) -> Result<Vec<u8>, Infallible> {
        Ok(if *state < self.length {
            vec![0]
        } else if *state == self.length {
            vec![0, 1]
        } else {
            Vec::new()
        })
    }

    fn step(&self, state: &u32, action: &u8) -> Result<u32, Infallible> {
        Ok(if *state < self.length {
            state + 1
        } else {
            self.length + 1 + u32::from(*action)
        })
    }
}
