use serde::Deserialize;

use crate::error::{MctsError, Result};

/// How the final action is chosen from the aggregated root statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalActionSelection {
    /// Highest total visits
    #[default]
    MostVisited,
    /// Highest mean value
    HighestMean,
}

/// How a chance node picks the outcome child to simulate from once its
/// outcomes are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceChildSelection {
    /// Sample by stated probability on the first visit, then defer to the
    /// selection policy
    #[default]
    SelectionPolicy,
    /// Always sample by stated probability
    Probability,
}

/// Configuration for MCTS search
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Number of iterations to run
    pub iterations: u32,

    /// Maximum number of steps in a single rollout
    pub rollout_depth: u32,

    /// Maximum forced actions collapsed into one tree edge
    pub roll_forward_limit: u32,

    /// UCB1 exploration constant
    pub exploration_constant: f64,

    pub final_action: FinalActionSelection,

    /// RNG seed, entropy-seeded when absent
    pub seed: Option<u64>,

    /// Log the ranked action table after each search
    pub verbose: bool,

    /// Chance nodes with more outcomes than this are sampled instead of enumerated
    pub max_enumerated_outcomes: Option<usize>,

    pub chance_child_selection: ChanceChildSelection,

    /// Keep descending below chance outcomes that were already in the tree
    pub descend_through_chance: bool,
}

impl MctsConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of iterations
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Set maximum rollout depth
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Set roll-forward step limit
    pub fn with_roll_forward_limit(mut self, limit: u32) -> Self {
        self.roll_forward_limit = limit;
        self
    }

    /// Set UCB1 exploration constant
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_final_action(mut self, selection: FinalActionSelection) -> Self {
        self.final_action = selection;
        self
    }

    /// Seed the search RNG for reproducible results
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the enumeration ceiling (None removes it)
    pub fn with_max_enumerated_outcomes(mut self, max: Option<usize>) -> Self {
        self.max_enumerated_outcomes = max;
        self
    }

    pub fn with_chance_child_selection(mut self, selection: ChanceChildSelection) -> Self {
        self.chance_child_selection = selection;
        self
    }

    pub fn with_descend_through_chance(mut self, descend: bool) -> Self {
        self.descend_through_chance = descend;
        self
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(MctsError::InvalidConfig("iterations must be at least 1".into()));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MctsError::InvalidConfig(format!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.max_enumerated_outcomes == Some(0) {
            return Err(MctsError::InvalidConfig(
                "max_enumerated_outcomes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            rollout_depth: 100,
            roll_forward_limit: 64,
            exploration_constant: std::f64::consts::SQRT_2,
            final_action: FinalActionSelection::MostVisited,
            seed: None,
            verbose: false,
            max_enumerated_outcomes: Some(1024),
            chance_child_selection: ChanceChildSelection::SelectionPolicy,
            descend_through_chance: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.rollout_depth, 100);
        assert_eq!(config.roll_forward_limit, 64);
        assert_eq!(config.final_action, FinalActionSelection::MostVisited);
        assert!(config.seed.is_none());
        assert!(!config.descend_through_chance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(500)
            .with_rollout_depth(20)
            .with_roll_forward_limit(8)
            .with_exploration_constant(0.7)
            .with_final_action(FinalActionSelection::HighestMean)
            .with_seed(42)
            .with_verbose(true)
            .with_max_enumerated_outcomes(None)
            .with_chance_child_selection(ChanceChildSelection::Probability)
            .with_descend_through_chance(true);

        assert_eq!(config.iterations, 500);
        assert_eq!(config.rollout_depth, 20);
        assert_eq!(config.roll_forward_limit, 8);
        assert_eq!(config.exploration_constant, 0.7);
        assert_eq!(config.final_action, FinalActionSelection::HighestMean);
        assert_eq!(config.seed, Some(42));
        assert!(config.verbose);
        assert_eq!(config.max_enumerated_outcomes, None);
        assert_eq!(config.chance_child_selection, ChanceChildSelection::Probability);
        assert!(config.descend_through_chance);
    }

    #[test]
    fn test_validate_rejects_bad_exploration() {
        let config = MctsConfig::default().with_exploration_constant(f64::NAN);
        assert!(matches!(config.validate(), Err(MctsError::InvalidConfig(_))));

        let config = MctsConfig::default().with_exploration_constant(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = MctsConfig::default().with_iterations(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MctsError::InvalidConfig(_)));
        assert!(err.to_string().contains("iterations"));

        assert!(MctsConfig::default().with_iterations(1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let config = MctsConfig::default().with_max_enumerated_outcomes(Some(0));
        assert!(config.validate().is_err());
    }
}
