//! Command-line arguments and config file loading.
//!
//! Settings are layered: built-in defaults, then the TOML file given with
//! `--config`, then any flags passed on the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chancetree_mcts::{FinalActionSelection, MctsConfig};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::pig::PigRules;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "chancetree")]
#[command(about = "Run chance-aware MCTS on a game of Pig and print the ranked actions")]
pub struct Args {
    /// TOML file with `[mcts]` and `[pig]` tables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Search iterations
    #[arg(long, short = 'n')]
    pub iterations: Option<u32>,

    /// Maximum rollout length
    #[arg(long)]
    pub rollout_depth: Option<u32>,

    /// UCB1 exploration constant
    #[arg(long)]
    pub exploration: Option<f64>,

    /// RNG seed for a reproducible search
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub final_action: Option<FinalAction>,

    /// Log the ranked table from inside the engine
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Score needed to win
    #[arg(long)]
    pub target: Option<u32>,

    /// Turns available
    #[arg(long)]
    pub turns: Option<u32>,

    /// Points already banked in the searched position
    #[arg(long, default_value_t = 0)]
    pub banked: u32,

    /// Points at stake in the current turn of the searched position
    #[arg(long, default_value_t = 0)]
    pub turn_total: u32,

    /// Make the engine sample die rolls instead of enumerating them
    #[arg(long)]
    pub sampled: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalAction {
    MostVisited,
    HighestMean,
}

impl From<FinalAction> for FinalActionSelection {
    fn from(value: FinalAction) -> Self {
        match value {
            FinalAction::MostVisited => FinalActionSelection::MostVisited,
            FinalAction::HighestMean => FinalActionSelection::HighestMean,
        }
    }
}

/// Contents of a config file; missing tables fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub mcts: MctsConfig,
    pub pig: PigRules,
}

impl FileSettings {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("malformed config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Everything a run needs after all layers are merged
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mcts: MctsConfig,
    pub pig: PigRules,
}

impl Settings {
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileSettings::load(path)?,
            None => FileSettings::default(),
        };
        Ok(Self::merge(file, args))
    }

    /// Apply command-line overrides on top of file settings
    pub fn merge(file: FileSettings, args: &Args) -> Self {
        let mut mcts = file.mcts;
        let mut pig = file.pig;

        if let Some(n) = args.iterations {
            mcts.iterations = n;
        }
        if let Some(depth) = args.rollout_depth {
            mcts.rollout_depth = depth;
        }
        if let Some(c) = args.exploration {
            mcts.exploration_constant = c;
        }
        if let Some(seed) = args.seed {
            mcts.seed = Some(seed);
        }
        if let Some(selection) = args.final_action {
            mcts.final_action = selection.into();
        }
        // Flags can only switch these on
        mcts.verbose |= args.verbose;
        pig.sampled |= args.sampled;

        if let Some(target) = args.target {
            pig.target = target;
        }
        if let Some(turns) = args.turns {
            pig.turns = turns;
        }

        Self { mcts, pig }
    }
}
