use crate::tree::{MctsTree, NodeId};

/// Picks one already-expanded child of a node to descend into
pub trait SelectionPolicy<S, A> {
    /// Returns `None` only when the node has no children
    fn select(&self, tree: &MctsTree<S, A>, node_id: NodeId) -> Option<NodeId>;
}

/// UCB1 selection
///
/// Unvisited children are returned immediately, in creation order. Otherwise
/// the child maximizing
///
/// UCB1(s, a) = Q(s, a) + C * sqrt(ln(max(1, N(s))) / N(s, a))
///
/// wins, with the first-seen child kept on ties.
#[derive(Debug, Clone, Copy)]
pub struct Ucb1 {
    pub exploration: f64,
}

impl Ucb1 {
    pub fn new(exploration: f64) -> Self {
        Self { exploration }
    }
}

impl Default for Ucb1 {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl<S, A> SelectionPolicy<S, A> for Ucb1 {
    fn select(&self, tree: &MctsTree<S, A>, node_id: NodeId) -> Option<NodeId> {
        let node = &tree.nodes[node_id];
        let ln_parent = (node.visit_count.max(1) as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let child = &tree.nodes[child_id];
            if child.visit_count == 0 {
                return Some(child_id);
            }

            let score = ucb1_value(child.q_value(), child.visit_count, ln_parent, self.exploration);
            // Strict comparison keeps the first-seen child on ties
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }

        best.map(|(id, _)| id)
    }
}

fn ucb1_value(mean: f64, visits: u32, ln_parent: f64, exploration: f64) -> f64 {
    mean + exploration * (ln_parent / visits as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use approx::assert_relative_eq;

    fn tree_with_children(stats: &[(u32, f64)], parent_visits: u32) -> MctsTree<u8, u8> {
        let mut tree = MctsTree::new();
        tree.initialize_root(0, NodeKind::Decision, Vec::new());
        tree.nodes[0].visit_count = parent_visits;
        for (i, &(visits, total)) in stats.iter().enumerate() {
            let id = tree.add_child(0, i as u8 + 1, NodeKind::Decision, Some(i as u8), 1.0, Vec::new());
            tree.nodes[id].visit_count = visits;
            tree.nodes[id].total_value = total;
        }
        tree
    }

    #[test]
    fn test_ucb1_value_formula() {
        // 0.5 + 1.5 * sqrt(ln(100) / 10)
        let ln_parent = 100f64.ln();
        let value = ucb1_value(0.5, 10, ln_parent, 1.5);
        assert_relative_eq!(value, 0.5 + 1.5 * (ln_parent / 10.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_unvisited_child_selected_first() {
        let tree = tree_with_children(&[(10, 9.0), (0, 0.0), (0, 0.0)], 10);
        assert_eq!(Ucb1::default().select(&tree, 0), Some(2));
    }

    #[test]
    fn test_exploits_higher_mean() {
        let tree = tree_with_children(&[(10, 2.0), (10, 8.0)], 20);
        assert_eq!(Ucb1::default().select(&tree, 0), Some(2));
    }

    #[test]
    fn test_explores_rarely_visited() {
        // Equal means, the less visited child gets the larger bonus
        let tree = tree_with_children(&[(50, 25.0), (2, 1.0)], 52);
        assert_eq!(Ucb1::default().select(&tree, 0), Some(2));
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let tree = tree_with_children(&[(5, 1.0), (5, 1.0), (5, 1.0)], 15);
        assert_eq!(Ucb1::default().select(&tree, 0), Some(1));
    }

    #[test]
    fn test_parent_visits_floor_at_one() {
        // ln(max(1, 0)) == 0, so only the mean counts
        let tree = tree_with_children(&[(3, 0.0), (3, 3.0)], 0);
        assert_eq!(Ucb1::new(100.0).select(&tree, 0), Some(2));
    }

    #[test]
    fn test_no_children() {
        let tree = tree_with_children(&[], 4);
        assert_eq!(Ucb1::default().select(&tree, 0), None);
    }
}
