//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the match runner and anything else that needs board, search or player
//! settings.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`FOUR_IN_A_ROW_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (`config.defaults.toml`, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! FOUR_IN_A_ROW_<SECTION>_<KEY>=value
//!
//! Examples:
//!     FOUR_IN_A_ROW_COMMON_LOG_LEVEL=debug
//!     FOUR_IN_A_ROW_BOARD_COLS=8
//!     FOUR_IN_A_ROW_MCTS_NUM_SIMULATIONS=1000
//!     FOUR_IN_A_ROW_PLAYERS_PLAYER2_KIND=human
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, LoadedConfig, CONFIG_PATH_VAR,
    CONFIG_SEARCH_PATHS,
};
pub use structs::*;
