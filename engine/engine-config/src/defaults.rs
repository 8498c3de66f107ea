//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary and the
//! checked-in documentation of every knob never drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    board: BoardDefaults,
    mcts: MctsDefaults,
    players: PlayersDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct BoardDefaults {
    rows: usize,
    cols: usize,
    first_player: u8,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    exploration: f64,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct PlayersDefaults {
    player1_name: String,
    player1_kind: String,
    player2_name: String,
    player2_kind: String,
    max_rejected_moves: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Board
pub fn rows() -> usize {
    DEFAULTS.board.rows
}
pub fn cols() -> usize {
    DEFAULTS.board.cols
}
pub fn first_player() -> u8 {
    DEFAULTS.board.first_player
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn seed() -> u64 {
    DEFAULTS.mcts.seed
}

// Players
pub fn player1_name() -> &'static str {
    &DEFAULTS.players.player1_name
}
pub fn player1_kind() -> &'static str {
    &DEFAULTS.players.player1_kind
}
pub fn player2_name() -> &'static str {
    &DEFAULTS.players.player2_name
}
pub fn player2_kind() -> &'static str {
    &DEFAULTS.players.player2_kind
}
pub fn max_rejected_moves() -> u32 {
    DEFAULTS.players.max_rejected_moves
}
