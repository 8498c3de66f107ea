//! Configuration for the match runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use engine_config::LoadedConfig;
use games_connect4::{GameState, Side};
use mcts::UctConfig;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup; clap reads it for its defaults
static CENTRAL_CONFIG: Lazy<LoadedConfig> = Lazy::new(LoadedConfig::discover);

/// Log where the config came from and anything that went wrong loading it.
/// Call once tracing is initialized.
pub fn report_config_load() {
    CENTRAL_CONFIG.log();
}

/// Who sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    /// UCT search engine
    Mcts,
    /// Moves typed on the console
    Human,
    /// Uniformly random legal moves
    Random,
}

/// Parse a player kind named in the config file or environment.
fn configured_kind(raw: &str) -> Result<PlayerKind> {
    PlayerKind::from_str(raw.trim(), true).map_err(|_| {
        anyhow!(
            "unknown player kind '{}' in config, expected one of mcts, human, random",
            raw
        )
    })
}

// Default value functions that read from central config
fn default_player1_name() -> String {
    CENTRAL_CONFIG.config.players.player1_name.clone()
}

fn default_player2_name() -> String {
    CENTRAL_CONFIG.config.players.player2_name.clone()
}

fn default_max_rejected_moves() -> u32 {
    CENTRAL_CONFIG.config.players.max_rejected_moves
}

fn default_simulations() -> u32 {
    CENTRAL_CONFIG.config.mcts.num_simulations
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.config.mcts.exploration
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.config.mcts.seed
}

fn default_rows() -> usize {
    CENTRAL_CONFIG.config.board.rows
}

fn default_cols() -> usize {
    CENTRAL_CONFIG.config.board.cols
}

fn default_first_player() -> u8 {
    CENTRAL_CONFIG.config.board.first_player
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.config.common.log_level.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "four-in-a-row")]
#[command(about = "Four-in-a-Row on the console against a UCT engine")]
#[command(
    long_about = "Plays Four-in-a-Row between any two of: a UCT Monte Carlo Tree Search
engine, a human at the console, and a random mover.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Name of player 1
    #[arg(long, default_value_t = default_player1_name())]
    pub player1_name: String,

    /// Who plays as player 1 [default: players.player1_kind from config]
    #[arg(long, value_enum, ignore_case = true)]
    pub player1_kind: Option<PlayerKind>,

    /// Name of player 2
    #[arg(long, default_value_t = default_player2_name())]
    pub player2_name: String,

    /// Who plays as player 2 [default: players.player2_kind from config]
    #[arg(long, value_enum, ignore_case = true)]
    pub player2_kind: Option<PlayerKind>,

    /// Number of UCT simulations per engine move
    #[arg(long, default_value_t = default_simulations())]
    pub simulations: u32,

    /// UCT exploration factor
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// RNG seed for engine and random players (0 = seed from entropy)
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Board rows
    #[arg(long, default_value_t = default_rows())]
    pub rows: usize,

    /// Board columns
    #[arg(long, default_value_t = default_cols())]
    pub cols: usize,

    /// Which player moves first (1 or 2)
    #[arg(long, default_value_t = default_first_player())]
    pub first_player: u8,

    /// Comma-separated columns replayed before play starts (e.g. 3,3,4)
    #[arg(long, value_delimiter = ',')]
    pub opening: Vec<usize>,

    /// Consecutive illegal moves tolerated from one player before aborting
    #[arg(long, default_value_t = default_max_rejected_moves())]
    pub max_rejected_moves: u32,

    /// Number of matches to play back to back
    #[arg(long, default_value_t = 1)]
    pub games: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.player1_name.trim().is_empty() || self.player2_name.trim().is_empty() {
            return Err(anyhow!("player names cannot be empty"));
        }

        if self.rows == 0 || self.cols == 0 {
            return Err(anyhow!(
                "board must have at least one row and one column, got {}x{}",
                self.rows,
                self.cols
            ));
        }

        if Side::from_id(self.first_player).is_none() {
            return Err(anyhow!(
                "first_player must be 1 or 2, got {}",
                self.first_player
            ));
        }

        if self.max_rejected_moves == 0 {
            return Err(anyhow!("max_rejected_moves must be greater than 0"));
        }

        self.kind_for(Side::One)?;
        self.kind_for(Side::Two)?;

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        self.uct_config()
            .validate()
            .map_err(|e| anyhow!("invalid search settings: {}", e))?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Kind of player in `side`'s seat: the CLI choice, else the config's.
    pub fn kind_for(&self, side: Side) -> Result<PlayerKind> {
        let players = &CENTRAL_CONFIG.config.players;
        let (chosen, configured) = match side {
            Side::One => (self.player1_kind, &players.player1_kind),
            Side::Two => (self.player2_kind, &players.player2_kind),
        };
        chosen.map_or_else(|| configured_kind(configured), Ok)
    }

    /// Side that moves first on an empty board.
    pub fn first_side(&self) -> Side {
        Side::from_id(self.first_player).unwrap_or(Side::One)
    }

    pub fn uct_config(&self) -> UctConfig {
        UctConfig::default()
            .with_simulations(self.simulations)
            .with_exploration(self.exploration)
    }

    /// Board after replaying the configured opening.
    pub fn initial_state(&self) -> Result<GameState> {
        GameState::from_moves(self.rows, self.cols, self.first_side(), &self.opening)
            .context("invalid opening")
    }

    /// Names indexed by seat (player 1 first).
    pub fn names(&self) -> [String; 2] {
        [self.player1_name.clone(), self.player2_name.clone()]
    }

    /// Seed for the player in `side`'s seat; 0 stays 0 (entropy).
    pub fn seed_for(&self, side: Side) -> u64 {
        match (self.seed, side) {
            (0, _) => 0,
            (seed, Side::One) => seed,
            (seed, Side::Two) => seed.wrapping_add(1).max(1),
        }
    }
}
