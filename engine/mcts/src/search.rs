//! UCT search implementation.
//!
//! Implements the core UCT algorithm:
//! 1. Selection: descend fully expanded nodes by UCT score
//! 2. Expansion: add one child for a random untried move
//! 3. Simulation: play the new node out with the rollout policy
//! 4. Backpropagation: update win/visit counts along the path, flipping the
//!    result at every level

use std::time::Instant;

use games_connect4::GameState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::UctConfig;
use crate::node::NodeId;
use crate::rollout::{HeuristicRollout, RolloutPolicy};
use crate::tree::{SearchTree, TreeStats};

/// Errors that can occur during UCT search.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("Cannot search a finished game: no legal moves")]
    TerminalState,

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),

    #[error("Search finished without expanding any root move")]
    EmptyTree,
}

/// Result of a UCT search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen column (most visited root child)
    pub column: usize,

    /// Visit counts of every expanded root move, by column
    pub root_visits: Vec<(usize, u32)>,

    /// Win rate of the chosen column for the side to move at the root
    pub win_rate: f64,

    /// Number of simulations performed
    pub simulations: u32,

    /// Shape of the discarded tree
    pub tree: TreeStats,

    /// Wall-clock search time in microseconds
    pub elapsed_us: u64,
}

/// UCT search engine.
///
/// Owns its random source so that a fixed seed reproduces the same move
/// choices. Every call builds a fresh tree and drops it before returning.
pub struct UctSearch<P: RolloutPolicy = HeuristicRollout> {
    config: UctConfig,
    rollout: P,
    rng: ChaCha20Rng,
}

impl UctSearch<HeuristicRollout> {
    /// Create an engine with the heuristic rollout.
    pub fn new(config: UctConfig, rng: ChaCha20Rng) -> Result<Self, SearchError> {
        Self::with_rollout(config, HeuristicRollout::new(), rng)
    }

    /// Create an engine with the heuristic rollout and a seeded random source.
    pub fn with_seed(config: UctConfig, seed: u64) -> Result<Self, SearchError> {
        Self::new(config, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<P: RolloutPolicy> UctSearch<P> {
    /// Create an engine with a custom rollout policy.
    pub fn with_rollout(
        config: UctConfig,
        rollout: P,
        rng: ChaCha20Rng,
    ) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        Ok(Self {
            config,
            rollout,
            rng,
        })
    }

    pub fn config(&self) -> &UctConfig {
        &self.config
    }

    /// Choose a column for the side to move in `state`.
    pub fn select_move(&mut self, state: &GameState) -> Result<usize, SearchError> {
        self.search(state).map(|result| result.column)
    }

    /// Run the configured number of simulations from `state` and report the
    /// most visited root move along with the root statistics.
    ///
    /// `state` is cloned into the root; the caller's copy is never touched.
    pub fn search(&mut self, state: &GameState) -> Result<SearchResult, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::TerminalState);
        }

        let start = Instant::now();
        let mut tree = SearchTree::new(state.clone());

        for _ in 0..self.config.num_simulations {
            self.iterate(&mut tree);
        }

        let (column, _) = tree.best_move().ok_or(SearchError::EmptyTree)?;
        let root_visits = tree.root_visits();
        let stats = tree.stats();

        debug!(
            column,
            ?root_visits,
            nodes = stats.total_nodes,
            depth = stats.max_depth,
            "UCT search complete"
        );

        Ok(SearchResult {
            column,
            win_rate: tree.root_win_rate(column).unwrap_or(0.0),
            root_visits,
            simulations: stats.root_visits,
            tree: stats,
            elapsed_us: start.elapsed().as_micros() as u64,
        })
    }

    /// Run a single simulation (select -> expand -> rollout -> backpropagate).
    fn iterate(&mut self, tree: &mut SearchTree) {
        let selected = self.select(tree);
        let node_id = self.expand(tree, selected);

        let node = tree.get(node_id);
        let perspective = node.perspective();
        let mut scratch = node.state.clone();
        let winner = self.rollout.playout(&mut scratch, &mut self.rng);

        let result = u32::from(winner == Some(perspective));
        tree.backpropagate(node_id, result);

        trace!(
            node = node_id.0,
            plies = scratch.move_count(),
            ?winner,
            result,
            "UCT simulation complete"
        );
    }

    /// Descend from the root while nodes are fully expanded and have children.
    fn select(&self, tree: &SearchTree) -> NodeId {
        let mut current = tree.root();

        loop {
            let node = tree.get(current);

            // Stop at nodes with untried moves and at terminal leaves
            if !node.is_fully_expanded() || node.is_leaf() {
                return current;
            }

            match tree.select_child(current, self.config.exploration) {
                Some(child_id) => current = child_id,
                None => return current,
            }
        }
    }

    /// Expand one uniformly random untried move of `node_id`.
    /// Returns the new child, or `node_id` itself if nothing is left to try.
    fn expand(&mut self, tree: &mut SearchTree, node_id: NodeId) -> NodeId {
        let node = tree.get(node_id);
        if node.untried_moves.is_empty() {
            return node_id;
        }

        let mv = node.untried_moves[self.rng.gen_range(0..node.untried_moves.len())];
        let mut state = node.state.clone();
        state.apply_move(mv);

        tree.add_child(node_id, mv, state)
    }
}

/// Convenience function to run a single seeded UCT search.
pub fn run_uct(
    state: &GameState,
    config: UctConfig,
    seed: u64,
) -> Result<SearchResult, SearchError> {
    UctSearch::with_seed(config, seed)?.search(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::RandomRollout;
    use games_connect4::Side;

    #[test]
    fn test_basic_search() {
        let state = GameState::standard();
        let result = run_uct(&state, UctConfig::for_testing(), 42).unwrap();

        assert!(state.legal_moves().contains(&result.column));
        assert_eq!(result.simulations, 100);
        assert!(result.win_rate >= 0.0 && result.win_rate <= 1.0);
        assert!(result.tree.total_nodes > 1);
    }

    #[test]
    fn test_selected_move_is_always_legal() {
        for seed in 0..10u64 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut state = GameState::standard();

            // Random opening of up to 15 plies
            for _ in 0..rng.gen_range(0..15) {
                let legal = state.legal_moves();
                if legal.is_empty() {
                    break;
                }
                state.apply_move(legal[rng.gen_range(0..legal.len())]);
            }
            if state.is_terminal() {
                continue;
            }

            let config = UctConfig::default().with_simulations(50);
            let mut engine = UctSearch::with_seed(config, seed).unwrap();
            let column = engine.select_move(&state).unwrap();
            assert!(
                state.legal_moves().contains(&column),
                "seed={} column={}",
                seed,
                column
            );
        }
    }

    #[test]
    fn test_takes_immediate_win() {
        // Player 1 holds columns 0-2 of the bottom row; column 3 wins
        let state = GameState::from_moves(6, 7, Side::One, &[0, 0, 1, 1, 2, 2]).unwrap();

        for seed in 0..5 {
            let config = UctConfig::default().with_simulations(400);
            let result = run_uct(&state, config, seed).unwrap();

            assert_eq!(result.column, 3, "seed={}", seed);
            assert!(
                result.win_rate > 0.9,
                "seed={} win_rate={}",
                seed,
                result.win_rate
            );
        }
    }

    #[test]
    fn test_blocks_opponent_threat() {
        // Player 1 threatens 0-1-2-3 on the bottom row; player 2 must block 3
        let state = GameState::from_moves(6, 7, Side::One, &[0, 6, 1, 6, 2]).unwrap();
        assert_eq!(state.current_player(), Side::Two);

        for seed in 0..5 {
            let config = UctConfig::default().with_simulations(1000);
            let column = UctSearch::with_seed(config, seed)
                .unwrap()
                .select_move(&state)
                .unwrap();

            assert_eq!(column, 3, "seed={}", seed);
        }
    }

    #[test]
    fn test_search_does_not_mutate_state() {
        let state = GameState::from_moves(6, 7, Side::One, &[3, 3, 4]).unwrap();
        let before = state.clone();

        run_uct(&state, UctConfig::for_testing(), 7).unwrap();

        assert_eq!(state, before);
    }

    #[test]
    fn test_terminal_state_is_an_error() {
        let state = GameState::from_moves(6, 7, Side::One, &[0, 0, 1, 1, 2, 2, 3]).unwrap();
        let mut engine = UctSearch::with_seed(UctConfig::for_testing(), 0).unwrap();

        assert_eq!(engine.select_move(&state), Err(SearchError::TerminalState));
    }

    #[test]
    fn test_zero_simulations_rejected() {
        let result = UctSearch::with_seed(UctConfig::default().with_simulations(0), 0);
        assert!(matches!(result, Err(SearchError::InvalidConfig(_))));
    }

    #[test]
    fn test_same_seed_same_search() {
        let state = GameState::from_moves(6, 7, Side::One, &[3, 2, 3]).unwrap();

        let a = run_uct(&state, UctConfig::for_testing(), 99).unwrap();
        let b = run_uct(&state, UctConfig::for_testing(), 99).unwrap();

        assert_eq!(a.column, b.column);
        assert_eq!(a.root_visits, b.root_visits);
        assert_eq!(a.tree, b.tree);
    }

    #[test]
    fn test_engine_can_be_reused() {
        let state = GameState::standard();
        let mut engine = UctSearch::with_seed(UctConfig::for_testing(), 5).unwrap();

        // Each call is independent: both succeed on a fresh tree
        let first = engine.search(&state).unwrap();
        let second = engine.search(&state).unwrap();
        assert_eq!(first.simulations, 100);
        assert_eq!(second.simulations, 100);
    }

    #[test]
    fn test_single_simulation_expands_one_child() {
        let state = GameState::standard();
        let result = run_uct(&state, UctConfig::default().with_simulations(1), 3).unwrap();

        assert_eq!(result.tree.total_nodes, 2);
        assert_eq!(result.tree.max_depth, 1);
        assert_eq!(result.root_visits.len(), 1);
        assert_eq!(result.root_visits[0], (result.column, 1));
    }

    #[test]
    fn test_root_child_visits_sum_to_budget() {
        let state = GameState::from_moves(6, 7, Side::One, &[3]).unwrap();
        let result = run_uct(&state, UctConfig::default().with_simulations(300), 11).unwrap();

        let total: u32 = result.root_visits.iter().map(|&(_, v)| v).sum();
        assert_eq!(total, 300);
        assert_eq!(result.simulations, 300);
        // Every legal move gets tried with this budget
        assert_eq!(result.root_visits.len(), 7);
    }

    #[test]
    fn test_single_legal_move() {
        // 2x3 board: only column 2 has room left and no line of four fits
        let state = GameState::from_moves(2, 3, Side::One, &[0, 0, 1, 1, 2]).unwrap();
        assert_eq!(state.legal_moves(), vec![2]);

        let result = run_uct(&state, UctConfig::for_testing(), 1).unwrap();
        assert_eq!(result.column, 2);
        assert_eq!(result.root_visits, vec![(2, 100)]);
    }

    #[test]
    fn test_tree_statistics_stay_consistent() {
        let positions: [&[usize]; 4] = [
            &[],
            &[0, 0, 1, 1, 2, 2],
            &[0, 6, 1, 6, 2],
            &[3, 3, 2, 4, 4, 2, 5, 1, 1, 5],
        ];

        for (seed, moves) in positions.iter().enumerate() {
            let state = GameState::from_moves(6, 7, Side::One, moves).unwrap();
            let mut engine = UctSearch::with_seed(UctConfig::default(), seed as u64 + 1).unwrap();
            let mut tree = SearchTree::new(state);

            for _ in 0..500 {
                engine.iterate(&mut tree);
            }
            assert_eq!(tree.get(tree.root()).visit_count, 500);

            for node in tree.arena() {
                assert!(node.win_count <= node.visit_count);

                let mut covered: Vec<usize> = node.children.iter().map(|&(mv, _)| mv).collect();
                assert!(covered.iter().all(|mv| !node.untried_moves.contains(mv)));
                covered.extend(&node.untried_moves);
                covered.sort_unstable();
                assert_eq!(covered, node.state.legal_moves());

                let child_visits: u32 = node
                    .children
                    .iter()
                    .map(|&(_, id)| tree.get(id).visit_count)
                    .sum();
                assert!(child_visits <= node.visit_count);
            }
        }
    }

    #[test]
    fn test_random_rollout_engine() {
        let state = GameState::from_moves(6, 7, Side::One, &[0, 0, 1, 1, 2, 2]).unwrap();
        let mut engine = UctSearch::with_rollout(
            UctConfig::default().with_simulations(500),
            RandomRollout::new(),
            ChaCha20Rng::seed_from_u64(21),
        )
        .unwrap();

        // The winning child is terminal, so even random rollouts score it 1.0
        let result = engine.search(&state).unwrap();
        assert_eq!(result.column, 3);
    }
}
