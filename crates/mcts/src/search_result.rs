/// Aggregated statistics for one root action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionStats<A> {
    pub action: A,

    /// Visits summed over every root child produced by this action
    pub visits: u32,

    /// Total value summed over the same children
    pub total_value: f64,
}

impl<A> ActionStats<A> {
    pub fn new(action: A) -> Self {
        Self {
            action,
            visits: 0,
            total_value: 0.0,
        }
    }

    /// Mean value, 0.0 when unvisited
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f64
        }
    }
}

/// Result of MCTS search
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Highest-scoring root action
    pub best_action: A,

    /// Every root action, best first
    pub ranked: Vec<ActionStats<A>>,

    /// Number of iterations actually run
    pub iterations: u32,

    /// Visit count of the root node
    pub root_visits: u32,

    /// Number of nodes in the search tree
    pub tree_size: usize,
}

impl<A: PartialEq> SearchResult<A> {
    /// Statistics for a specific action
    pub fn stats_for(&self, action: &A) -> Option<&ActionStats<A>> {
        self.ranked.iter().find(|stats| stats.action == *action)
    }

    /// Get the visit count for a specific action
    pub fn visits_for(&self, action: &A) -> u32 {
        self.stats_for(action).map(|stats| stats.visits).unwrap_or(0)
    }

    /// Get the total number of visits over all root actions
    pub fn total_visits(&self) -> u32 {
        self.ranked.iter().map(|stats| stats.visits).sum()
    }
}
