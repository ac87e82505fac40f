use crate::tree::{MctsTree, NodeId};

/// Propagates a simulated value from a node up to the root
pub trait BackpropagationPolicy<S, A> {
    fn backpropagate(&self, tree: &mut MctsTree<S, A>, leaf_id: NodeId, value: f64);
}

/// Adds the same value to every node on the path, leaf and root included
#[derive(Debug, Clone, Copy, Default)]
pub struct SumBackup;

impl<S, A> BackpropagationPolicy<S, A> for SumBackup {
    fn backpropagate(&self, tree: &mut MctsTree<S, A>, leaf_id: NodeId, value: f64) {
        backup(tree, leaf_id, value);
    }
}

/// Backup value from leaf to root
///
/// Values are read from one fixed perspective, so nothing is negated on the
/// way up.
pub fn backup<S, A>(tree: &mut MctsTree<S, A>, leaf_id: NodeId, value: f64) {
    let mut current_id = Some(leaf_id);

    while let Some(node_id) = current_id {
        let node = &mut tree.nodes[node_id];

        node.visit_count += 1;
        node.total_value += value;

        current_id = node.parent;
    }
}
