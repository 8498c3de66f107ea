//! UCT tree structure with arena allocation.
//!
//! The tree uses arena allocation for node storage. Nodes are stored in a
//! contiguous Vec and referenced by NodeId indices, so parent and child
//! links are plain handles and the whole tree is dropped in one go once a
//! decision has been made.

use games_connect4::GameState;

use crate::node::{NodeId, SearchNode};

/// UCT tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all nodes
    nodes: Vec<SearchNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl SearchTree {
    /// Create a new tree rooted at the given state.
    pub fn new(root_state: GameState) -> Self {
        Self {
            nodes: vec![SearchNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[SearchNode] {
        &self.nodes
    }

    /// Select the child of a node with the highest UCT score.
    ///
    /// Ties go to the earliest expanded child. Returns None for leaves.
    pub fn select_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per child
        let parent_visits_ln = (node.visit_count as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &(_, child_id) in &node.children {
            let score = self.get(child_id).uct_score(parent_visits_ln, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }

        best.map(|(id, _)| id)
    }

    /// Add a child for `mv` under `parent_id`, taking `mv` off the parent's
    /// untried list. Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, mv: usize, state: GameState) -> NodeId {
        let child_id = self.allocate(SearchNode::new_child(parent_id, mv, state));

        let parent = self.get_mut(parent_id);
        let pos = parent.untried_moves.iter().position(|&m| m == mv);
        debug_assert!(pos.is_some(), "move {} is not an untried move of its parent", mv);
        if let Some(pos) = pos {
            parent.untried_moves.remove(pos);
        }
        parent.children.push((mv, child_id));

        child_id
    }

    /// Backpropagate a rollout result from a node to the root.
    ///
    /// `result` is 1 for a win and 0 otherwise, from the leaf's perspective.
    /// It flips at each level because consecutive levels belong to opposing
    /// movers.
    pub fn backpropagate(&mut self, leaf_id: NodeId, result: u32) {
        debug_assert!(result <= 1);
        let mut current = Some(leaf_id);
        let mut current_result = result;

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visit_count += 1;
            node.win_count += current_result;

            current_result = 1 - current_result;
            current = node.parent;
        }
    }

    /// Most visited root move as (column, visit_count).
    /// Ties go to the earliest expanded child. None if the root has no children.
    pub fn best_move(&self) -> Option<(usize, u32)> {
        let root = self.get(self.root);

        let mut best: Option<(usize, u32)> = None;
        for &(mv, id) in &root.children {
            let visits = self.get(id).visit_count;
            match best {
                Some((_, best_visits)) if visits <= best_visits => {}
                _ => best = Some((mv, visits)),
            }
        }

        best
    }

    /// Visit counts of the root's children as (column, visits), by column.
    pub fn root_visits(&self) -> Vec<(usize, u32)> {
        let mut visits: Vec<(usize, u32)> = self
            .get(self.root)
            .children
            .iter()
            .map(|&(mv, id)| (mv, self.get(id).visit_count))
            .collect();
        visits.sort_unstable_by_key(|&(mv, _)| mv);
        visits
    }

    /// Win rate of the root child for `mv`, from the root mover's perspective.
    pub fn root_win_rate(&self, mv: usize) -> Option<f64> {
        self.get(self.root)
            .children
            .iter()
            .find(|&&(m, _)| m == mv)
            .map(|&(_, id)| self.get(id).win_rate())
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        self.get(node_id)
            .children
            .iter()
            .map(|&(_, id)| self.compute_max_depth(id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about a UCT tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_state(parent: &GameState, mv: usize) -> GameState {
        let mut state = parent.clone();
        assert!(state.apply_move(mv));
        state
    }

    #[test]
    fn test_new_tree() {
        let tree = SearchTree::new(GameState::standard());

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert!(root.mv.is_none());
        assert_eq!(root.untried_moves.len(), 7);
    }

    #[test]
    fn test_add_child() {
        let root_state = GameState::standard();
        let mut tree = SearchTree::new(root_state.clone());

        let child_id = tree.add_child(tree.root(), 4, child_state(&root_state, 4));

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(4, NodeId(1))]);
        assert_eq!(root.untried_moves, vec![0, 1, 2, 3, 5, 6]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, Some(tree.root()));
        assert_eq!(child.mv, Some(4));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not an untried move")]
    fn test_add_child_twice_for_same_move() {
        let root_state = GameState::standard();
        let mut tree = SearchTree::new(root_state.clone());

        tree.add_child(tree.root(), 4, child_state(&root_state, 4));
        tree.add_child(tree.root(), 4, child_state(&root_state, 4));
    }

    #[test]
    fn test_backpropagate_alternates_result() {
        let root_state = GameState::standard();
        let mut tree = SearchTree::new(root_state.clone());

        // Create a chain: root -> child -> grandchild
        let first = child_state(&root_state, 0);
        let second = child_state(&first, 1);
        let child_id = tree.add_child(tree.root(), 0, first);
        let grandchild_id = tree.add_child(child_id, 1, second);

        tree.backpropagate(grandchild_id, 1);

        assert_eq!(tree.get(grandchild_id).visit_count, 1);
        assert_eq!(tree.get(child_id).visit_count, 1);
        assert_eq!(tree.get(tree.root()).visit_count, 1);

        assert_eq!(tree.get(grandchild_id).win_count, 1);
        assert_eq!(tree.get(child_id).win_count, 0);
        assert_eq!(tree.get(tree.root()).win_count, 1);

        tree.backpropagate(grandchild_id, 0);
        assert_eq!(tree.get(grandchild_id).win_count, 1);
        assert_eq!(tree.get(child_id).win_count, 1);
        assert_eq!(tree.get(tree.root()).visit_count, 2);
    }

    #[test]
    fn test_select_child_prefers_higher_score() {
        let root_state = GameState::standard();
        let mut tree = SearchTree::new(root_state.clone());

        let c0 = tree.add_child(tree.root(), 0, child_state(&root_state, 0));
        let c1 = tree.add_child(tree.root(), 1, child_state(&root_state, 1));
        tree.backpropagate(c0, 0);
        tree.backpropagate(c1, 1);

        assert_eq!(tree.select_child(tree.root(), 2.0), Some(c1));
    }

    #[test]
    fn test_select_child_ties_go_to_first() {
        let root_state = GameState::standard();
        let mut tree = SearchTree::new(root_state.clone());

        let c5 = tree.add_child(tree.root(), 5, child_state(&root_state, 5));
        let c2 = tree.add_child(tree.root(), 2, child_state(&root_state, 2));
        tree.backpropagate(c5, 1);
        tree.backpropagate(c2, 1);

        assert_eq!(tree.select_child(tree.root(), 2.0), Some(c5));
        assert_eq!(tree.select_child(c5, 2.0), None);
    }

    #[test]
    fn test_best_move_uses_visits_not_win_rate() {
        let root_state = GameState::standard();
        let mut tree = SearchTree::new(root_state.clone());

        let c3 = tree.add_child(tree.root(), 3, child_state(&root_state, 3));
        let c6 = tree.add_child(tree.root(), 6, child_state(&root_state, 6));

        // One lucky win for column 6, many mixed results for column 3
        tree.backpropagate(c6, 1);
        for i in 0..10 {
            tree.backpropagate(c3, i % 2);
        }

        assert_eq!(tree.best_move(), Some((3, 10)));
        assert_eq!(tree.root_visits(), vec![(3, 10), (6, 1)]);
        assert_eq!(tree.root_win_rate(6), Some(1.0));
        assert_eq!(tree.root_win_rate(0), None);
    }

    #[test]
    fn test_best_move_empty_root() {
        let tree = SearchTree::new(GameState::standard());
        assert_eq!(tree.best_move(), None);
        assert!(tree.root_visits().is_empty());
    }

    #[test]
    fn test_tree_stats() {
        let root_state = GameState::standard();
        let mut tree = SearchTree::new(root_state.clone());
        let child = tree.add_child(tree.root(), 0, child_state(&root_state, 0));
        tree.backpropagate(child, 1);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 2);
        assert_eq!(stats.root_visits, 1);
        assert_eq!(stats.max_depth, 1);
    }
}
