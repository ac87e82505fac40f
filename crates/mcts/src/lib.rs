//! Generic Monte Carlo Tree Search for processes with chance transitions.
//!
//! The engine drives any [`Simulator`]: it asks whether a state is terminal or
//! a chance point, which actions are legal, and how states advance. Chance
//! nodes are expanded by enumerating every outcome when the simulator can list
//! them, and by sampling one outcome per visit otherwise. Chains of forced
//! single-action states are collapsed into one tree edge.
//!
//! # Example
//!
//! ```ignore
//! use chancetree_mcts::{Mcts, MctsConfig};
//!
//! let config = MctsConfig::default().with_iterations(2000).with_seed(7);
//! let mut mcts = Mcts::new(MyGame::new(), config)?;
//! let result = mcts.search(&start_state)?;
//!
//! println!("best action: {:?}", result.best_action);
//! for stats in &result.ranked {
//!     println!("{:?}: {} visits, mean {:.3}", stats.action, stats.visits, stats.mean_value());
//! }
//! ```

// Module declarations
mod aggregate;
mod backup;
mod config;
mod error;
mod expansion;
mod mcts;
mod rollout;
mod search_result;
mod selection;
mod simulator;
mod tree;

#[cfg(test)]
mod testing;

// Public exports
pub use aggregate::{ActionScorer, HighestMean, MostVisited, group_by_action, rank};
pub use backup::{BackpropagationPolicy, SumBackup, backup};
pub use config::{ChanceChildSelection, FinalActionSelection, MctsConfig};
pub use error::{MctsError, Result};
pub use expansion::{ExpansionPolicy, RollForward, UniformExpansion, roll_forward};
pub use mcts::Mcts;
pub use rollout::{CUTOFF_VALUE, RandomRollout, SimulationPolicy, sample_outcome};
pub use search_result::{ActionStats, SearchResult};
pub use selection::{SelectionPolicy, Ucb1};
pub use simulator::Simulator;
pub use tree::{ChanceMode, MctsNode, MctsTree, NodeId, NodeKind};
