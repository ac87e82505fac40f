use std::fmt::Debug;

use rand::RngCore;

use crate::error::{MctsError, Result};
use crate::tree::NodeKind;

/// Contract between the search engine and a simulated process.
///
/// The engine never inspects states or actions beyond cloning and comparing
/// them; everything it knows about the process comes through these calls.
/// Values returned by [`Simulator::terminal_value`] are read from one fixed
/// perspective, so alternating-player games must encode that in the value.
pub trait Simulator {
    type State: Clone + PartialEq;
    type Action: Clone + PartialEq + Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    /// `Some(value)` if the state is terminal, `None` otherwise
    fn terminal_value(&self, state: &Self::State) -> std::result::Result<Option<f64>, Self::Error>;

    fn is_chance_node(&self, state: &Self::State) -> std::result::Result<bool, Self::Error>;

    /// Enumerate every outcome of a chance state with its probability.
    ///
    /// An empty list means the outcome space cannot be enumerated and
    /// [`Simulator::sample_chance`] is used instead. Probabilities are trusted
    /// as given; summing to one is the simulator's obligation.
    fn chance_outcomes(
        &self,
        _state: &Self::State,
    ) -> std::result::Result<Vec<(Self::State, f64)>, Self::Error> {
        Ok(Vec::new())
    }

    /// Draw a single outcome of a chance state
    fn sample_chance(
        &self,
        state: &Self::State,
        rng: &mut dyn RngCore,
    ) -> std::result::Result<Self::State, Self::Error>;

    /// Legal actions; empty only for terminal and chance states
    fn legal_actions(&self, state: &Self::State)
    -> std::result::Result<Vec<Self::Action>, Self::Error>;

    fn step(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> std::result::Result<Self::State, Self::Error>;
}

/// Classify a state: terminal wins over chance, anything else is a decision
pub(crate) fn classify<Sim: Simulator>(sim: &Sim, state: &Sim::State) -> Result<NodeKind> {
    if sim
        .terminal_value(state)
        .map_err(MctsError::simulator)?
        .is_some()
    {
        return Ok(NodeKind::Terminal);
    }
    if sim.is_chance_node(state).map_err(MctsError::simulator)? {
        return Ok(NodeKind::Chance);
    }
    Ok(NodeKind::Decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DiceGame, DiceState, TwoStep, TwoStepState};

    #[test]
    fn test_classify_decision_and_terminal() {
        let sim = TwoStep;
        assert_eq!(classify(&sim, &TwoStepState::Start).unwrap(), NodeKind::Decision);
        assert_eq!(classify(&sim, &TwoStepState::Won).unwrap(), NodeKind::Terminal);
    }

    #[test]
    fn test_classify_chance() {
        let sim = DiceGame::default();
        assert_eq!(classify(&sim, &DiceState::Rolling).unwrap(), NodeKind::Chance);
    }

    #[test]
    fn test_default_outcomes_are_empty() {
        let sim = TwoStep;
        assert!(sim.chance_outcomes(&TwoStepState::Start).unwrap().is_empty());
    }
}
