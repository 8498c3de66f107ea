//! UCT Monte Carlo Tree Search for Four-in-a-Row.
//!
//! This crate chooses moves for a synthetic player by running UCT search over
//! [`games_connect4::GameState`] positions.
//!
//! # Overview
//!
//! UCT builds a search tree by running simulations. Each simulation consists
//! of four phases:
//!
//! 1. **Selection**: From the root, descend through fully expanded nodes,
//!    picking the child with the highest UCT score
//!    `wins/visits + sqrt(c * ln(parent_visits) / visits)`
//! 2. **Expansion**: When a node still has untried moves, pick one uniformly
//!    at random and add the resulting position as a new child
//! 3. **Simulation**: Play the new position out to the end of the game with a
//!    rollout policy (by default: win if possible, else avoid handing the
//!    opponent a win, else play at random)
//! 4. **Backpropagation**: Walk back to the root, adding one visit to every
//!    node and one win to every node whose mover won, flipping the result at
//!    each level
//!
//! After the simulation budget is spent, the most visited root move is played.
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::{GameState, Side};
//! use mcts::{UctConfig, UctSearch};
//!
//! // Player 1 holds three in a row on the bottom row
//! let state = GameState::from_moves(6, 7, Side::One, &[0, 0, 1, 1, 2, 2]).unwrap();
//!
//! let config = UctConfig::default().with_simulations(400);
//! let mut engine = UctSearch::with_seed(config, 42).unwrap();
//!
//! let column = engine.select_move(&state).unwrap();
//! assert_eq!(column, 3);
//! ```
//!
//! # Configuration
//!
//! The [`UctConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Number of simulations per decision (default: 1000)
//! - `exploration`: Factor under the square root of the exploration term
//!   (default: 2.0)
//!
//! # Rollout policies
//!
//! The simulation phase is pluggable through [`RolloutPolicy`]:
//!
//! - [`HeuristicRollout`]: Lookahead-of-one play (default)
//! - [`RandomRollout`]: Uniformly random legal moves
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          UctSearch                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ SearchTree  │  │ ChaCha20Rng │  │   RolloutPolicy     │  │
//! │  │  (arena)    │  │  (seeded)   │  │ (heuristic/random)  │  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────────┬──────────┘  │
//! │         │                │                    │             │
//! │         ▼                ▼                    ▼             │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │          select → expand → simulate →                 │  │
//! │  │                     backpropagate                     │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::UctConfig;
pub use node::{NodeId, SearchNode};
pub use rollout::{safe_move, winning_move, HeuristicRollout, RandomRollout, RolloutPolicy};
pub use search::{run_uct, SearchError, SearchResult, UctSearch};
pub use tree::{SearchTree, TreeStats};
