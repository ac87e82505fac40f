use std::cmp::Ordering;

use crate::config::FinalActionSelection;
use crate::search_result::ActionStats;
use crate::tree::{MctsTree, NodeId};

/// Scores an aggregated root action; the highest score is chosen
pub trait ActionScorer<A> {
    fn score(&self, stats: &ActionStats<A>) -> f64;
}

/// Most-explored action wins
#[derive(Debug, Clone, Copy, Default)]
pub struct MostVisited;

impl<A> ActionScorer<A> for MostVisited {
    fn score(&self, stats: &ActionStats<A>) -> f64 {
        stats.visits as f64
    }
}

/// Best average value wins
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestMean;

impl<A> ActionScorer<A> for HighestMean {
    fn score(&self, stats: &ActionStats<A>) -> f64 {
        stats.mean_value()
    }
}

impl<A, F> ActionScorer<A> for F
where
    F: Fn(&ActionStats<A>) -> f64,
{
    fn score(&self, stats: &ActionStats<A>) -> f64 {
        self(stats)
    }
}

/// Built-in scorer for a configured selection
pub fn scorer_for<A>(selection: FinalActionSelection) -> Box<dyn ActionScorer<A>> {
    match selection {
        FinalActionSelection::MostVisited => Box::new(MostVisited),
        FinalActionSelection::HighestMean => Box::new(HighestMean),
    }
}

/// Group the children of `node_id` by the action that produced them.
///
/// One action may own several children (one per chance outcome, or several
/// distinct sampled states), so visits and values are summed per action.
/// Children without an incoming action are skipped. Groups keep the order in
/// which their action first appears.
pub fn group_by_action<S, A: Clone + PartialEq>(
    tree: &MctsTree<S, A>,
    node_id: NodeId,
) -> Vec<ActionStats<A>> {
    let mut groups: Vec<ActionStats<A>> = Vec::new();

    for &child_id in &tree.nodes[node_id].children {
        let child = &tree.nodes[child_id];
        let Some(action) = &child.incoming_action else {
            continue;
        };

        let idx = match groups.iter().position(|g| g.action == *action) {
            Some(idx) => idx,
            None => {
                groups.push(ActionStats::new(action.clone()));
                groups.len() - 1
            }
        };
        groups[idx].visits += child.visit_count;
        groups[idx].total_value += child.total_value;
    }

    groups
}

/// Sort best-first by score.
///
/// Equal scores fall back to the higher mean value, then to first-seen order.
pub fn rank<A>(mut groups: Vec<ActionStats<A>>, scorer: &dyn ActionScorer<A>) -> Vec<ActionStats<A>> {
    groups.sort_by(|a, b| {
        descending(scorer.score(a), scorer.score(b))
            .then_with(|| descending(a.mean_value(), b.mean_value()))
    });
    groups
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
