//! four-in-a-row - console match runner
//!
//! A short-lived process that:
//! 1. Loads configuration (defaults, config.toml, environment, CLI)
//! 2. Seats two players (UCT engine, human or random)
//! 3. Plays one or more matches, rendering the board after every move
//! 4. Logs the series result

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{error, info};

mod config;
mod game;
mod player;
mod render;
mod stats;

use crate::config::{report_config_load, Config};
use crate::game::Match;
use crate::player::build_player;
use crate::stats::MatchStats;
use games_connect4::Side;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize tracing, then report what loading the config file ran into
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");
    report_config_load();

    // Validate configuration
    config.validate()?;

    info!(
        rows = config.rows,
        cols = config.cols,
        simulations = config.simulations,
        seed = config.seed,
        games = config.games,
        "Starting four-in-a-row"
    );

    let opening = config.initial_state()?;
    let players = [
        build_player(Side::One, &config)?,
        build_player(Side::Two, &config)?,
    ];
    let rng = match config.seed {
        0 => ChaCha20Rng::from_entropy(),
        seed => ChaCha20Rng::seed_from_u64(seed),
    };

    println!("Hello from four-in-a-row!");
    let mut game = Match::new(
        opening,
        players,
        config.max_rejected_moves,
        std::io::stdout(),
        rng,
    );
    let mut stats = MatchStats::new();

    for number in 1..=config.games {
        match game.play() {
            Ok(outcome) => stats.record(&outcome),
            Err(e) => {
                error!(game = number, "Match failed: {:#}", e);
                return Err(e);
            }
        }
    }

    stats.log_summary(&config.names());
    Ok(())
}
