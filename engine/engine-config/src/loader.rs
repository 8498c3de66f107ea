//! Locating, parsing and overriding the config file.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "FOUR_IN_A_ROW_CONFIG";

/// Relative locations searched when `CONFIG_PATH_VAR` is unset or stale
pub const CONFIG_SEARCH_PATHS: &[&str] = &["config.toml", "../config.toml"];

/// A loaded configuration together with where it came from and the problems
/// met on the way.
///
/// Loading usually happens before logging is set up (clap reads defaults
/// from the config), so the problems are kept here and reported later with
/// [`LoadedConfig::log`].
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: CentralConfig,
    /// File the config was read from; None for the embedded defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Find and load the config file, then apply environment overrides.
    ///
    /// `FOUR_IN_A_ROW_CONFIG` is tried first, then each entry of
    /// [`CONFIG_SEARCH_PATHS`]. With no file at all the embedded defaults are used.
    pub fn discover() -> Self {
        let mut warnings = Vec::new();
        let explicit = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);

        if let Some(path) = &explicit {
            if !path.exists() {
                warnings.push(format!(
                    "{} points at a missing file: {}",
                    CONFIG_PATH_VAR,
                    path.display()
                ));
            }
        }

        let found = explicit
            .into_iter()
            .chain(CONFIG_SEARCH_PATHS.iter().map(PathBuf::from))
            .find(|path| path.exists());

        match found {
            Some(path) => {
                let mut loaded = Self::from_path(&path);
                warnings.append(&mut loaded.warnings);
                loaded.warnings = warnings;
                loaded
            }
            None => Self {
                config: env_overrides(CentralConfig::default(), &mut warnings),
                source: None,
                warnings,
            },
        }
    }

    /// Load one config file. A file that cannot be read or parsed is
    /// recorded as a warning and replaced by the embedded defaults;
    /// environment overrides apply either way.
    pub fn from_path(path: &Path) -> Self {
        let mut warnings = Vec::new();
        let (config, source) = match read_file(path) {
            Ok(config) => (config, Some(path.to_path_buf())),
            Err(reason) => {
                warnings.push(format!(
                    "Ignoring config file {}: {}",
                    path.display(),
                    reason
                ));
                (CentralConfig::default(), None)
            }
        };

        Self {
            config: env_overrides(config, &mut warnings),
            source,
            warnings,
        }
    }

    /// Report the config source and every warning through `tracing`.
    pub fn log(&self) {
        match &self.source {
            Some(path) => info!(path = %path.display(), "Loaded config file"),
            None => debug!("No config file loaded, using embedded defaults"),
        }
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

/// Load the config and log what happened. See [`LoadedConfig::discover`].
pub fn load_config() -> CentralConfig {
    let loaded = LoadedConfig::discover();
    loaded.log();
    loaded.config
}

/// Load one config file and log what happened. See [`LoadedConfig::from_path`].
pub fn load_from_path(path: &Path) -> CentralConfig {
    let loaded = LoadedConfig::from_path(path);
    loaded.log();
    loaded.config
}

fn read_file(path: &Path) -> Result<CentralConfig, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("read failed: {}", e))?;
    toml::from_str(&content).map_err(|e| format!("parse failed: {}", e))
}

/// Overwrite one field from `FOUR_IN_A_ROW_<key>` when that variable is set.
macro_rules! env_override {
    ($config:expr, $warnings:expr, $section:ident . $field:ident, $key:literal) => {
        if let Ok(v) = std::env::var(concat!("FOUR_IN_A_ROW_", $key)) {
            $config.$section.$field = v;
        }
    };
    ($config:expr, $warnings:expr, $section:ident . $field:ident, $key:literal, parse) => {
        match std::env::var(concat!("FOUR_IN_A_ROW_", $key)).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => {
                $warnings.push(format!("Ignoring unparseable FOUR_IN_A_ROW_{}", $key))
            }
            Err(_) => {}
        }
    };
}

/// Apply `FOUR_IN_A_ROW_<SECTION>_<KEY>` environment overrides, logging any
/// value that does not parse.
pub fn apply_env_overrides(config: CentralConfig) -> CentralConfig {
    let mut warnings = Vec::new();
    let config = env_overrides(config, &mut warnings);
    for warning in &warnings {
        warn!("{}", warning);
    }
    config
}

fn env_overrides(mut config: CentralConfig, warnings: &mut Vec<String>) -> CentralConfig {
    env_override!(config, warnings, common.log_level, "COMMON_LOG_LEVEL");

    env_override!(config, warnings, board.rows, "BOARD_ROWS", parse);
    env_override!(config, warnings, board.cols, "BOARD_COLS", parse);
    env_override!(config, warnings, board.first_player, "BOARD_FIRST_PLAYER", parse);

    env_override!(config, warnings, mcts.num_simulations, "MCTS_NUM_SIMULATIONS", parse);
    env_override!(config, warnings, mcts.exploration, "MCTS_EXPLORATION", parse);
    env_override!(config, warnings, mcts.seed, "MCTS_SEED", parse);

    env_override!(config, warnings, players.player1_name, "PLAYERS_PLAYER1_NAME");
    env_override!(config, warnings, players.player1_kind, "PLAYERS_PLAYER1_KIND");
    env_override!(config, warnings, players.player2_name, "PLAYERS_PLAYER2_NAME");
    env_override!(config, warnings, players.player2_kind, "PLAYERS_PLAYER2_KIND");
    env_override!(
        config,
        warnings,
        players.max_rejected_moves,
        "PLAYERS_MAX_REJECTED_MOVES",
        parse
    );

    config
}
