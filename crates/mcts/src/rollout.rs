use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::error::{MctsError, Result};
use crate::simulator::Simulator;

/// Value returned when a rollout runs out of depth before reaching a terminal
pub const CUTOFF_VALUE: f64 = 0.0;

/// Estimates the value of a state by playing it out
pub trait SimulationPolicy<Sim: Simulator> {
    fn simulate(
        &self,
        sim: &Sim,
        state: &Sim::State,
        max_depth: u32,
        rng: &mut dyn RngCore,
    ) -> Result<f64>;
}

/// Uniformly random playout.
///
/// Chance states draw one outcome weighted by its stated probability when the
/// simulator can enumerate them, and fall back to `sample_chance` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRollout;

impl<Sim: Simulator> SimulationPolicy<Sim> for RandomRollout {
    fn simulate(
        &self,
        sim: &Sim,
        state: &Sim::State,
        max_depth: u32,
        rng: &mut dyn RngCore,
    ) -> Result<f64> {
        let mut current = state.clone();

        for _ in 0..max_depth {
            if let Some(value) = sim.terminal_value(&current).map_err(MctsError::simulator)? {
                return Ok(value);
            }

            current = if sim.is_chance_node(&current).map_err(MctsError::simulator)? {
                let outcomes = sim.chance_outcomes(&current).map_err(MctsError::simulator)?;
                match sample_outcome(&outcomes, rng) {
                    Some(idx) => outcomes[idx].0.clone(),
                    None => sim.sample_chance(&current, rng).map_err(MctsError::simulator)?,
                }
            } else {
                let actions = sim.legal_actions(&current).map_err(MctsError::simulator)?;
                // A decision state without actions cannot be played out
                let Some(action) = actions.choose(rng) else {
                    return Ok(CUTOFF_VALUE);
                };
                sim.step(&current, action).map_err(MctsError::simulator)?
            };
        }

        // The final state may still be terminal even though the budget is spent
        Ok(sim
            .terminal_value(&current)
            .map_err(MctsError::simulator)?
            .unwrap_or(CUTOFF_VALUE))
    }
}

/// Cumulative-sum sampling over stated probabilities.
///
/// Returns `None` for an empty list. Rounding slack in the cumulative sum
/// falls to the last entry with positive probability.
pub fn sample_outcome<S>(outcomes: &[(S, f64)], rng: &mut dyn RngCore) -> Option<usize> {
    sample_weighted(outcomes.iter().map(|(_, p)| *p), rng)
}

pub(crate) fn sample_weighted<I>(weights: I, rng: &mut dyn RngCore) -> Option<usize>
where
    I: Iterator<Item = f64> + Clone,
{
    let total: f64 = weights.clone().filter(|w| *w > 0.0).sum();
    let mut last_positive = None;

    let draw = if total > 0.0 { rng.gen_range(0.0..total) } else { 0.0 };
    let mut cumsum = 0.0;
    for (i, w) in weights.enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumsum += w;
        last_positive = Some(i);
        if draw < cumsum {
            return Some(i);
        }
    }

    last_positive
}
