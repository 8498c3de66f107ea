//! UCT tree node representation.
//!
//! Each node owns a snapshot of the game state reached by playing `mv` from
//! its parent, plus the win/visit statistics used by the UCT formula.

use games_connect4::{GameState, Side};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A node in the UCT tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,

    /// Column played from the parent to reach this node (None for root)
    pub mv: Option<usize>,

    /// Game state at this node
    pub state: GameState,

    /// Expanded children as (column, NodeId), in expansion order
    pub children: Vec<(usize, NodeId)>,

    /// Number of rollouts that passed through this node
    pub visit_count: u32,

    /// Rollouts won by the side that moved into this node.
    /// Never exceeds `visit_count`.
    pub win_count: u32,

    /// Legal columns not yet expanded into a child
    pub untried_moves: Vec<usize>,
}

impl SearchNode {
    /// Create a new root node.
    pub fn new_root(state: GameState) -> Self {
        Self::new(None, None, state)
    }

    /// Create a new child node reached by playing `mv` from `parent`.
    pub fn new_child(parent: NodeId, mv: usize, state: GameState) -> Self {
        Self::new(Some(parent), Some(mv), state)
    }

    fn new(parent: Option<NodeId>, mv: Option<usize>, state: GameState) -> Self {
        let untried_moves = state.legal_moves();
        Self {
            parent,
            mv,
            state,
            children: Vec::new(),
            visit_count: 0,
            win_count: 0,
            untried_moves,
        }
    }

    /// The side whose results `win_count` counts: whoever made the move
    /// into this node, i.e. the opponent of the side to move here.
    #[inline]
    pub fn perspective(&self) -> Side {
        self.state.current_player().opponent()
    }

    /// Win rate from `perspective()`. Returns 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.win_count as f64 / self.visit_count as f64
        }
    }

    /// UCT score for selecting this node from its parent.
    /// UCT = W/N + sqrt(c * ln(N_parent) / N)
    ///
    /// Takes pre-computed ln(parent visits) so the log is evaluated once per
    /// selection step. Only defined for visited nodes, which every child is:
    /// a child is created and visited in the same iteration.
    #[inline]
    pub fn uct_score(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        debug_assert!(self.visit_count > 0, "UCT score of an unvisited node");
        let n = self.visit_count as f64;
        self.win_rate() + (exploration * parent_visits_ln / n).sqrt()
    }

    /// No legal move is left to expand.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Check if this is a leaf node (no expanded children).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
