use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::aggregate::{ActionScorer, group_by_action, rank, scorer_for};
use crate::backup::{BackpropagationPolicy, SumBackup};
use crate::config::{ChanceChildSelection, MctsConfig};
use crate::error::{MctsError, Result};
use crate::expansion::{ExpansionPolicy, UniformExpansion, roll_forward};
use crate::rollout::{CUTOFF_VALUE, RandomRollout, SimulationPolicy, sample_weighted};
use crate::search_result::{ActionStats, SearchResult};
use crate::selection::{SelectionPolicy, Ucb1};
use crate::simulator::{Simulator, classify};
use crate::tree::{ChanceMode, MctsTree, NodeId, NodeKind};

/// Monte Carlo Tree Search over any [`Simulator`], with chance nodes
///
/// Each iteration descends through fully expanded decision nodes, then
/// handles the node it stopped at by kind: terminal values are backed up
/// directly, chance nodes enumerate (or sample) an outcome child, and decision
/// nodes expand one untried action. A rollout from the reached node provides
/// the value that is backed up to the root.
pub struct Mcts<Sim: Simulator> {
    simulator: Sim,
    config: MctsConfig,
    selection: Box<dyn SelectionPolicy<Sim::State, Sim::Action>>,
    expansion: Box<dyn ExpansionPolicy<Sim::Action>>,
    simulation: Box<dyn SimulationPolicy<Sim>>,
    backpropagation: Box<dyn BackpropagationPolicy<Sim::State, Sim::Action>>,
    scorer: Box<dyn ActionScorer<Sim::Action>>,
    rng: StdRng,
    tree: MctsTree<Sim::State, Sim::Action>,
}

impl<Sim: Simulator> Mcts<Sim> {
    /// Create a new MCTS instance with the default policies
    ///
    /// UCB1 selection, uniform expansion with roll-forward, random rollouts,
    /// sum backup, and the configured final-action scorer.
    pub fn new(simulator: Sim, config: MctsConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            simulator,
            selection: Box::new(Ucb1::new(config.exploration_constant)),
            expansion: Box::new(UniformExpansion::default()),
            simulation: Box::new(RandomRollout),
            backpropagation: Box::new(SumBackup),
            scorer: scorer_for(config.final_action),
            rng,
            tree: MctsTree::new(),
            config,
        })
    }

    pub fn with_selection(
        mut self,
        policy: impl SelectionPolicy<Sim::State, Sim::Action> + 'static,
    ) -> Self {
        self.selection = Box::new(policy);
        self
    }

    pub fn with_expansion(mut self, policy: impl ExpansionPolicy<Sim::Action> + 'static) -> Self {
        self.expansion = Box::new(policy);
        self
    }

    pub fn with_simulation(mut self, policy: impl SimulationPolicy<Sim> + 'static) -> Self {
        self.simulation = Box::new(policy);
        self
    }

    pub fn with_backpropagation(
        mut self,
        policy: impl BackpropagationPolicy<Sim::State, Sim::Action> + 'static,
    ) -> Self {
        self.backpropagation = Box::new(policy);
        self
    }

    /// Replace the final-action scorer chosen by the config
    pub fn with_action_scorer(mut self, scorer: impl ActionScorer<Sim::Action> + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Run MCTS search from a given state
    ///
    /// Returns the best root action and the ranked statistics of every root
    /// action. With a configured seed, the RNG is reseeded here so repeated
    /// searches from the same state give identical results.
    pub fn search(&mut self, root_state: &Sim::State) -> Result<SearchResult<Sim::Action>> {
        if let Some(seed) = self.config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        self.initialize_root(root_state)?;

        for iteration in 0..self.config.iterations {
            self.run_iteration(iteration)?;
        }

        self.create_search_result()
    }

    /// Initialize the tree with root node
    ///
    /// The root state is never rolled forward, so even a forced first move is
    /// reported as the root action.
    fn initialize_root(&mut self, state: &Sim::State) -> Result<NodeId> {
        let kind = classify(&self.simulator, state)?;
        let untried = self.untried_actions(kind, state)?;
        let root_id = self.tree.initialize_root(state.clone(), kind, untried);

        debug!(
            ?kind,
            untried = self.tree.nodes[root_id].untried.len(),
            iterations = self.config.iterations,
            "search root initialized"
        );

        Ok(root_id)
    }

    /// One select / expand / simulate / backpropagate pass
    fn run_iteration(&mut self, iteration: u32) -> Result<()> {
        let mut current = self.tree.root_id;

        let leaf_id = loop {
            current = self.select_down(current);
            let kind = self.tree.nodes[current].kind;

            match kind {
                NodeKind::Terminal => {
                    let value = self
                        .simulator
                        .terminal_value(&self.tree.nodes[current].state)
                        .map_err(MctsError::simulator)?
                        .unwrap_or(CUTOFF_VALUE);
                    self.backpropagation
                        .backpropagate(&mut self.tree, current, value);
                    trace!(iteration, leaf = current, value, "terminal leaf backed up");
                    return Ok(());
                }
                NodeKind::Chance => {
                    let child_id = self.visit_chance(current)?;
                    if self.config.descend_through_chance
                        && child_id != current
                        && self.tree.nodes[child_id].visit_count > 0
                    {
                        current = child_id;
                        continue;
                    }
                    break child_id;
                }
                NodeKind::Decision => break self.expand_decision(current)?,
            }
        };

        let value = self.simulation.simulate(
            &self.simulator,
            &self.tree.nodes[leaf_id].state,
            self.config.rollout_depth,
            &mut self.rng,
        )?;
        self.backpropagation
            .backpropagate(&mut self.tree, leaf_id, value);

        trace!(iteration, leaf = leaf_id, value, "MCTS iteration complete");
        Ok(())
    }

    /// Descend while the current node is a fully expanded decision node
    fn select_down(&self, mut current: NodeId) -> NodeId {
        loop {
            let node = &self.tree.nodes[current];
            if !node.is_fully_expanded() || node.children.is_empty() {
                return current;
            }
            match self.selection.select(&self.tree, current) {
                Some(child_id) => current = child_id,
                None => return current,
            }
        }
    }

    /// Expand one untried action, or select among existing children when none are left
    fn expand_decision(&mut self, node_id: NodeId) -> Result<NodeId> {
        let picked = self
            .expansion
            .pick_untried(&mut self.tree.nodes[node_id].untried, &mut self.rng);

        let Some(action) = picked else {
            // Nothing left to try and nothing to select: simulate from here
            return Ok(self.selection.select(&self.tree, node_id).unwrap_or(node_id));
        };

        let next = self
            .simulator
            .step(&self.tree.nodes[node_id].state, &action)
            .map_err(MctsError::simulator)?;
        let next = self.settle(next)?;
        self.attach_child(node_id, next, Some(action), 1.0)
    }

    /// Pick the outcome child of a chance node to continue from
    fn visit_chance(&mut self, node_id: NodeId) -> Result<NodeId> {
        let mode = match self.tree.nodes[node_id].chance_mode {
            Some(mode) => mode,
            None => self.open_chance_node(node_id)?,
        };

        match mode {
            ChanceMode::Enumerated => Ok(self.pick_enumerated_child(node_id)),
            ChanceMode::Sampled => self.sample_child(node_id),
        }
    }

    /// First visit: enumerate all outcomes, or fall back to sampling mode
    fn open_chance_node(&mut self, node_id: NodeId) -> Result<ChanceMode> {
        let outcomes = self
            .simulator
            .chance_outcomes(&self.tree.nodes[node_id].state)
            .map_err(MctsError::simulator)?;

        let within_ceiling = self
            .config
            .max_enumerated_outcomes
            .is_none_or(|max| outcomes.len() <= max);

        let mode = if !outcomes.is_empty() && within_ceiling {
            let count = outcomes.len();
            for (outcome, probability) in outcomes {
                let outcome = self.settle(outcome)?;
                self.attach_child(node_id, outcome, None, probability)?;
            }
            debug!(node = node_id, outcomes = count, "chance node enumerated");
            ChanceMode::Enumerated
        } else {
            if !outcomes.is_empty() {
                debug!(
                    node = node_id,
                    outcomes = outcomes.len(),
                    max = ?self.config.max_enumerated_outcomes,
                    "too many chance outcomes to enumerate, sampling instead"
                );
            }
            ChanceMode::Sampled
        };

        self.tree.nodes[node_id].chance_mode = Some(mode);
        Ok(mode)
    }

    /// Sample by stated probability while every outcome is unvisited (or when
    /// configured to always do so), otherwise defer to the selection policy
    fn pick_enumerated_child(&mut self, node_id: NodeId) -> NodeId {
        let children = &self.tree.nodes[node_id].children;
        let first_visit = children
            .iter()
            .all(|&child| self.tree.nodes[child].visit_count == 0);

        if first_visit || self.config.chance_child_selection == ChanceChildSelection::Probability {
            let weights = children.iter().map(|&child| self.tree.nodes[child].probability);
            if let Some(idx) = sample_weighted(weights, &mut self.rng) {
                return children[idx];
            }
        }

        self.selection.select(&self.tree, node_id).unwrap_or(node_id)
    }

    /// Draw one outcome and reuse an existing child holding the same state
    fn sample_child(&mut self, node_id: NodeId) -> Result<NodeId> {
        let sampled = self
            .simulator
            .sample_chance(&self.tree.nodes[node_id].state, &mut self.rng)
            .map_err(MctsError::simulator)?;
        let sampled = self.settle(sampled)?;

        match self.tree.find_child_by_state(node_id, &sampled) {
            Some(existing) => Ok(existing),
            None => self.attach_child(node_id, sampled, None, 1.0),
        }
    }

    /// Collapse forced single-action chains when the expansion policy asks for it
    fn settle(&self, state: Sim::State) -> Result<Sim::State> {
        if !self.expansion.rolls_forward() {
            return Ok(state);
        }
        let rolled = roll_forward(&self.simulator, state, self.config.roll_forward_limit)?;
        if rolled.steps > 0 {
            trace!(steps = rolled.steps, fuse_blown = rolled.fuse_blown, "rolled forward");
        }
        Ok(rolled.state)
    }

    /// Classify a new state and link it under `parent`
    fn attach_child(
        &mut self,
        parent: NodeId,
        state: Sim::State,
        action: Option<Sim::Action>,
        probability: f64,
    ) -> Result<NodeId> {
        let kind = classify(&self.simulator, &state)?;
        let untried = self.untried_actions(kind, &state)?;
        Ok(self
            .tree
            .add_child(parent, state, kind, action, probability, untried))
    }

    fn untried_actions(&self, kind: NodeKind, state: &Sim::State) -> Result<Vec<Sim::Action>> {
        if kind != NodeKind::Decision {
            return Ok(Vec::new());
        }
        self.simulator
            .legal_actions(state)
            .map_err(MctsError::simulator)
    }

    /// Create search result from root statistics
    fn create_search_result(&self) -> Result<SearchResult<Sim::Action>> {
        let root_id = self.tree.root_id;
        let root = &self.tree.nodes[root_id];

        let ranked = rank(group_by_action(&self.tree, root_id), self.scorer.as_ref());
        let best_action = ranked
            .first()
            .map(|stats| stats.action.clone())
            .ok_or(MctsError::EmptyRoot { kind: root.kind })?;

        if self.config.verbose {
            log_ranked(&ranked, root.visit_count, self.tree.size());
        }

        Ok(SearchResult {
            best_action,
            ranked,
            iterations: self.config.iterations,
            root_visits: root.visit_count,
            tree_size: self.tree.size(),
        })
    }

    /// The tree built by the last search
    pub fn tree(&self) -> &MctsTree<Sim::State, Sim::Action> {
        &self.tree
    }

    pub fn simulator(&self) -> &Sim {
        &self.simulator
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Reset the tree (clear all nodes)
    pub fn reset(&mut self) {
        self.tree.clear();
    }

    /// Get the number of nodes in the tree
    pub fn tree_size(&self) -> usize {
        self.tree.size()
    }
}

fn log_ranked<A: std::fmt::Debug>(ranked: &[ActionStats<A>], root_visits: u32, tree_size: usize) {
    info!(root_visits, tree_size, actions = ranked.len(), "search finished");
    for (i, stats) in ranked.iter().enumerate() {
        info!(
            rank = i + 1,
            action = ?stats.action,
            visits = stats.visits,
            total_value = stats.total_value,
            mean_value = stats.mean_value(),
            "root action"
        );
    }
}
