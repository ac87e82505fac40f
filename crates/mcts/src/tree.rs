use crate::error::{MctsError, Result};

/// Node ID in the arena-style tree
pub type NodeId = usize;

/// What kind of point in the process a node represents.
///
/// Classified once when the node is created and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Decision,
    Chance,
    Terminal,
}

/// How a chance node's outcomes were materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanceMode {
    /// Every outcome was attached in one pass
    Enumerated,
    /// Outcomes are drawn one at a time and deduplicated by state
    Sampled,
}

/// A single node in the MCTS tree
pub struct MctsNode<S, A> {
    /// Simulator state at this node
    pub state: S,

    pub kind: NodeKind,

    /// Action that led here from a decision parent (None for root and chance outcomes)
    pub incoming_action: Option<A>,

    /// Parent node ID
    pub parent: Option<NodeId>,

    /// Stated probability when this node is a chance outcome, 1.0 otherwise
    pub probability: f64,

    /// Child node IDs, in creation order
    pub children: Vec<NodeId>,

    /// Legal actions not yet expanded (decision nodes only)
    pub untried: Vec<A>,

    /// Set once the chance node has been visited
    pub chance_mode: Option<ChanceMode>,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of values backed up through this node
    pub total_value: f64,
}

impl<S, A> MctsNode<S, A> {
    /// Create a new root node
    pub fn new_root(state: S, kind: NodeKind, untried: Vec<A>) -> Self {
        Self {
            state,
            kind,
            incoming_action: None,
            parent: None,
            probability: 1.0,
            children: Vec::new(),
            untried,
            chance_mode: None,
            visit_count: 0,
            total_value: 0.0,
        }
    }

    /// Create a new child node
    pub fn new_child(
        state: S,
        kind: NodeKind,
        parent: NodeId,
        incoming_action: Option<A>,
        probability: f64,
        untried: Vec<A>,
    ) -> Self {
        Self {
            state,
            kind,
            incoming_action,
            parent: Some(parent),
            probability,
            children: Vec::new(),
            untried,
            chance_mode: None,
            visit_count: 0,
            total_value: 0.0,
        }
    }

    /// Mean backed-up value, 0.0 while unvisited
    pub fn q_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_value / self.visit_count as f64
        }
    }

    /// Decision node with no untried actions left
    pub fn is_fully_expanded(&self) -> bool {
        self.kind == NodeKind::Decision && self.untried.is_empty()
    }
}

/// MCTS tree using arena allocation.
///
/// Nodes are only ever appended; a node's ID stays valid until the tree is
/// cleared.
pub struct MctsTree<S, A> {
    /// Arena of all nodes
    pub nodes: Vec<MctsNode<S, A>>,

    /// Root node ID (usually 0)
    pub root_id: NodeId,
}

impl<S, A> MctsTree<S, A> {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(1024),
            root_id: 0,
        }
    }

    /// Initialize the tree with a root node
    pub fn initialize_root(&mut self, state: S, kind: NodeKind, untried: Vec<A>) -> NodeId {
        self.nodes.clear();
        self.nodes.push(MctsNode::new_root(state, kind, untried));
        self.root_id = 0;
        self.root_id
    }

    /// Add a new node and return its ID
    pub fn add_node(&mut self, node: MctsNode<S, A>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    /// Append a child under `parent` and link it
    pub fn add_child(
        &mut self,
        parent: NodeId,
        state: S,
        kind: NodeKind,
        incoming_action: Option<A>,
        probability: f64,
        untried: Vec<A>,
    ) -> NodeId {
        let child = MctsNode::new_child(state, kind, parent, incoming_action, probability, untried);
        let child_id = self.add_node(child);
        self.nodes[parent].children.push(child_id);
        child_id
    }

    pub fn get(&self, id: NodeId) -> Result<&MctsNode<S, A>> {
        self.nodes.get(id).ok_or(MctsError::InvalidNodeId(id))
    }

    pub fn root(&self) -> Option<&MctsNode<S, A>> {
        self.nodes.get(self.root_id)
    }

    /// # Panics
    ///
    /// Panics if `id` is not in the tree; use [`MctsTree::get`] for a checked lookup.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Number of edges between `id` and the root
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the tree.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent].parent;
        }
        depth
    }

    /// Deepest node below the root
    pub fn max_depth(&self) -> usize {
        (0..self.nodes.len()).map(|id| self.depth(id)).max().unwrap_or(0)
    }

    /// Get the number of nodes in the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Clear the tree
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<S: PartialEq, A> MctsTree<S, A> {
    /// Linear scan for a child holding an equal state
    pub fn find_child_by_state(&self, parent: NodeId, state: &S) -> Option<NodeId> {
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].state == *state)
    }
}

impl<S, A> Default for MctsTree<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> MctsTree<u32, char> {
        let mut tree = MctsTree::new();
        tree.initialize_root(0, NodeKind::Decision, vec!['a', 'b']);
        tree
    }

    #[test]
    fn test_add_child_links_parent() {
        let mut tree = small_tree();
        let child = tree.add_child(0, 1, NodeKind::Terminal, Some('a'), 1.0, Vec::new());

        assert_eq!(tree.size(), 2);
        assert_eq!(tree.children(0), &[child]);
        assert_eq!(tree.nodes[child].parent, Some(0));
        assert_eq!(tree.nodes[child].incoming_action, Some('a'));
        assert_eq!(tree.depth(child), 1);
    }

    #[test]
    fn test_q_value_unvisited_is_zero() {
        let tree = small_tree();
        assert_eq!(tree.nodes[0].q_value(), 0.0);
    }

    #[test]
    fn test_fully_expanded_only_for_decisions() {
        let mut tree = small_tree();
        assert!(!tree.nodes[0].is_fully_expanded());
        tree.nodes[0].untried.clear();
        assert!(tree.nodes[0].is_fully_expanded());

        let chance = tree.add_child(0, 7, NodeKind::Chance, Some('a'), 1.0, Vec::new());
        assert!(!tree.nodes[chance].is_fully_expanded());
    }

    #[test]
    fn test_find_child_by_state() {
        let mut tree = small_tree();
        tree.add_child(0, 5, NodeKind::Terminal, None, 0.5, Vec::new());
        let second = tree.add_child(0, 6, NodeKind::Terminal, None, 0.5, Vec::new());

        assert_eq!(tree.find_child_by_state(0, &6), Some(second));
        assert_eq!(tree.find_child_by_state(0, &9), None);
    }

    #[test]
    fn test_get_invalid_id() {
        let tree = small_tree();
        assert!(matches!(tree.get(42), Err(MctsError::InvalidNodeId(42))));
    }

    #[test]
    #[should_panic]
    fn test_children_of_unknown_id_panics() {
        let tree = small_tree();
        let _ = tree.children(42);
    }

    #[test]
    #[should_panic]
    fn test_depth_of_unknown_id_panics() {
        let tree = small_tree();
        let _ = tree.depth(42);
    }

    #[test]
    fn test_initialize_root_resets_tree() {
        let mut tree = small_tree();
        tree.add_child(0, 1, NodeKind::Terminal, Some('a'), 1.0, Vec::new());
        tree.initialize_root(3, NodeKind::Terminal, Vec::new());
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.max_depth(), 0);
    }
}
