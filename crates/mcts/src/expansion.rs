use rand::{Rng, RngCore};
use tracing::warn;

use crate::error::{MctsError, Result};
use crate::simulator::Simulator;

/// Chooses which untried action of a decision node to expand next
pub trait ExpansionPolicy<A> {
    /// Remove and return one untried action, `None` when nothing is left
    fn pick_untried(&self, untried: &mut Vec<A>, rng: &mut dyn RngCore) -> Option<A>;

    /// Whether forced single-action chains are collapsed before a node is created
    fn rolls_forward(&self) -> bool {
        true
    }
}

/// Uniform random pick among untried actions
#[derive(Debug, Clone, Copy)]
pub struct UniformExpansion {
    pub roll_forward: bool,
}

impl UniformExpansion {
    pub fn new(roll_forward: bool) -> Self {
        Self { roll_forward }
    }
}

impl Default for UniformExpansion {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<A> ExpansionPolicy<A> for UniformExpansion {
    fn pick_untried(&self, untried: &mut Vec<A>, rng: &mut dyn RngCore) -> Option<A> {
        if untried.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..untried.len());
        Some(untried.swap_remove(idx))
    }

    fn rolls_forward(&self) -> bool {
        self.roll_forward
    }
}

/// Outcome of collapsing a forced-move chain
#[derive(Debug, Clone, PartialEq)]
pub struct RollForward<S> {
    pub state: S,
    /// Forced actions applied
    pub steps: u32,
    /// True when the chain was cut by the step limit
    pub fuse_blown: bool,
}

/// Apply forced actions until the state offers a real choice.
///
/// Stops at terminal states, chance states, and states with zero or several
/// legal actions. At most `max_steps` actions are applied; hitting the limit
/// keeps whatever state was reached.
pub fn roll_forward<Sim: Simulator>(
    sim: &Sim,
    mut state: Sim::State,
    max_steps: u32,
) -> Result<RollForward<Sim::State>> {
    let mut steps = 0;

    loop {
        if sim.terminal_value(&state).map_err(MctsError::simulator)?.is_some()
            || sim.is_chance_node(&state).map_err(MctsError::simulator)?
        {
            break;
        }

        let mut actions = sim.legal_actions(&state).map_err(MctsError::simulator)?;
        if actions.len() != 1 {
            break;
        }

        if steps >= max_steps {
            warn!(max_steps, "roll-forward limit reached, keeping partially collapsed state");
            return Ok(RollForward {
                state,
                steps,
                fuse_blown: true,
            });
        }

        let forced = actions.swap_remove(0);
        state = sim.step(&state, &forced).map_err(MctsError::simulator)?;
        steps += 1;
    }

    Ok(RollForward {
        state,
        steps,
        fuse_blown: false,
    })
}
