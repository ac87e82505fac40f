//! chancetree - run the MCTS engine on a bundled game of Pig
//!
//! Loads settings (defaults, then `--config`, then flags), searches from the
//! requested position and prints the ranked root actions.

use anyhow::{Context, Result};
use chancetree_mcts::{Mcts, SearchResult};
use clap::Parser;
use tracing::{debug, info};

mod pig;
mod settings;

use crate::pig::{Pig, PigAction, PigState};
use crate::settings::{Args, Settings};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {level:?}"))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn print_result(result: &SearchResult<PigAction>) {
    println!("best action: {:?}", result.best_action);
    println!(
        "iterations: {}  root visits: {}  tree size: {}",
        result.iterations, result.root_visits, result.tree_size
    );
    println!("{:<8} {:>8} {:>8} {:>10}", "action", "visits", "share", "mean");
    let total = result.total_visits().max(1) as f64;
    for stats in &result.ranked {
        println!(
            "{:<8} {:>8} {:>7.1}% {:>10.4}",
            format!("{:?}", stats.action),
            stats.visits,
            100.0 * stats.visits as f64 / total,
            stats.mean_value()
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let settings = Settings::resolve(&args)?;
    debug!(?settings, "Settings resolved");

    let game = Pig::new(settings.pig.clone())?;
    let start = PigState {
        banked: args.banked,
        turn_total: args.turn_total,
        ..game.start()
    };
    info!(
        banked = start.banked,
        turn_total = start.turn_total,
        target = game.rules().target,
        turns = game.rules().turns,
        sampled = game.rules().sampled,
        iterations = settings.mcts.iterations,
        "Searching position"
    );

    let mut mcts = Mcts::new(game, settings.mcts)?;
    let result = mcts.search(&start)?;

    print_result(&result);
    Ok(())
}
