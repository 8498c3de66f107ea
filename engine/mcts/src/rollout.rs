//! Rollout policies for the simulation phase.
//!
//! A rollout plays a position out to the end of the game and reports who
//! won. The search only needs that single outcome sample per iteration, so
//! policies are free to be as cheap or as clever as they like.
//!
//! Implementations:
//! - [`HeuristicRollout`]: take an immediate win, else avoid handing the
//!   opponent one, else play at random (default)
//! - [`RandomRollout`]: uniformly random legal moves

use games_connect4::{GameState, Side};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Trait for rollout policies.
pub trait RolloutPolicy {
    /// Play `state` to termination in place and return the winner
    /// (None for a draw).
    ///
    /// `state` is a scratch copy owned by the caller; it is left at the
    /// final position.
    fn playout(&self, state: &mut GameState, rng: &mut ChaCha20Rng) -> Option<Side>;
}

/// Lookahead-of-one rollout.
///
/// At every ply the side to move:
/// 1. plays a move that wins on the spot, if there is one;
/// 2. otherwise plays the first move (lowest column) after which the
///    opponent has no winning reply;
/// 3. otherwise plays a uniformly random legal move.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRollout;

impl HeuristicRollout {
    pub fn new() -> Self {
        Self
    }
}

impl RolloutPolicy for HeuristicRollout {
    fn playout(&self, state: &mut GameState, rng: &mut ChaCha20Rng) -> Option<Side> {
        while !state.is_terminal() {
            let legal = state.legal_moves();
            let col = winning_move(state)
                .or_else(|| safe_move(state))
                .unwrap_or_else(|| legal[rng.gen_range(0..legal.len())]);
            state.apply_move(col);
        }
        state.winner()
    }
}

/// Rollout that plays uniformly random legal moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRollout;

impl RandomRollout {
    pub fn new() -> Self {
        Self
    }
}

impl RolloutPolicy for RandomRollout {
    fn playout(&self, state: &mut GameState, rng: &mut ChaCha20Rng) -> Option<Side> {
        while !state.is_terminal() {
            let legal = state.legal_moves();
            state.apply_move(legal[rng.gen_range(0..legal.len())]);
        }
        state.winner()
    }
}

/// First legal column (ascending) that wins immediately for the side to move.
///
/// Probes with apply/undo, so `state` is unchanged on return.
pub fn winning_move(state: &mut GameState) -> Option<usize> {
    let mover = state.current_player();
    state.legal_moves().into_iter().find(|&col| {
        state.apply_move(col);
        let won = state.winner() == Some(mover);
        state.undo_last_move();
        won
    })
}

/// First legal column (ascending) after which the opponent has no
/// immediately winning reply.
///
/// Probes with apply/undo, so `state` is unchanged on return.
pub fn safe_move(state: &mut GameState) -> Option<usize> {
    state.legal_moves().into_iter().find(|&col| {
        state.apply_move(col);
        let opponent_wins = winning_move(state).is_some();
        state.undo_last_move();
        !opponent_wins
    })
}
