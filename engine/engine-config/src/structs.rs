//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_rows() -> usize {
    defaults::rows()
}
fn d_cols() -> usize {
    defaults::cols()
}
fn d_first_player() -> u8 {
    defaults::first_player()
}
fn d_num_sims() -> u32 {
    defaults::num_simulations()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_player1_name() -> String {
    defaults::player1_name().into()
}
fn d_player1_kind() -> String {
    defaults::player1_kind().into()
}
fn d_player2_name() -> String {
    defaults::player2_name().into()
}
fn d_player2_kind() -> String {
    defaults::player2_kind().into()
}
fn d_max_rejected() -> u32 {
    defaults::max_rejected_moves()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub players: PlayersConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Grid geometry and who moves first
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoardConfig {
    #[serde(default = "d_rows")]
    pub rows: usize,
    #[serde(default = "d_cols")]
    pub cols: usize,
    /// 1 or 2
    #[serde(default = "d_first_player")]
    pub first_player: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: defaults::rows(),
            cols: defaults::cols(),
            first_player: defaults::first_player(),
        }
    }
}

/// UCT search configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_sims")]
    pub num_simulations: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// RNG seed for the engine-backed players (0 = seed from entropy)
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            exploration: defaults::exploration(),
            seed: defaults::seed(),
        }
    }
}

/// Names and kinds of the two seats
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayersConfig {
    #[serde(default = "d_player1_name")]
    pub player1_name: String,
    /// One of "mcts", "human", "random"
    #[serde(default = "d_player1_kind")]
    pub player1_kind: String,
    #[serde(default = "d_player2_name")]
    pub player2_name: String,
    #[serde(default = "d_player2_kind")]
    pub player2_kind: String,
    /// Consecutive illegal moves tolerated from one player before the match aborts
    #[serde(default = "d_max_rejected")]
    pub max_rejected_moves: u32,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        Self {
            player1_name: defaults::player1_name().into(),
            player1_kind: defaults::player1_kind().into(),
            player2_name: defaults::player2_name().into(),
            player2_kind: defaults::player2_kind().into(),
            max_rejected_moves: defaults::max_rejected_moves(),
        }
    }
}
