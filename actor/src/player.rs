//! Players: anything that can pick a column for the side to move.
//!
//! - [`MctsPlayer`]: UCT search
//! - [`RandomPlayer`]: uniformly random legal column
//! - [`HumanPlayer`]: reads columns from a line-oriented input

use std::io::{self, BufRead, Cursor, Stdin, Write};

use anyhow::{anyhow, bail, Context, Result};
use games_connect4::{GameState, Side};
use mcts::{SearchResult, UctConfig, UctSearch};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::config::{Config, PlayerKind};
use crate::render::{history_lines, symbol};

/// A participant in a match.
pub trait Player {
    fn name(&self) -> &str;

    /// Clear any per-game state before a new match.
    fn reset(&mut self);

    /// Pick a column for the side to move in `state`.
    ///
    /// The match loop validates the answer; an illegal column is rejected
    /// and the player is asked again.
    fn choose_move(&mut self, state: &GameState) -> Result<usize>;

    /// The line of play this player expects from here (may be empty).
    fn predicted_continuation(&self) -> Vec<usize>;

    /// Estimated probability of winning from the current position, in [0, 1].
    fn win_likelihood(&self) -> f64;
}

/// Where a human player's answers come from, one line at a time.
pub trait LineSource {
    /// Append the next line to `buf`; returns 0 at end of input.
    fn next_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

// Stdin locks per call, so two console players can share it.
impl LineSource for Stdin {
    fn next_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.read_line(buf)
    }
}

impl<T: AsRef<[u8]>> LineSource for Cursor<T> {
    fn next_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

fn rng_from_seed(seed: u64) -> ChaCha20Rng {
    if seed == 0 {
        ChaCha20Rng::from_entropy()
    } else {
        ChaCha20Rng::seed_from_u64(seed)
    }
}

/// Build the player for `side`'s seat from the configuration.
pub fn build_player(side: Side, config: &Config) -> Result<Box<dyn Player>> {
    let name = match side {
        Side::One => config.player1_name.clone(),
        Side::Two => config.player2_name.clone(),
    };
    let kind = config.kind_for(side)?;
    let seed = config.seed_for(side);

    let player: Box<dyn Player> = match kind {
        PlayerKind::Mcts => Box::new(MctsPlayer::new(name, config.uct_config(), seed)?),
        PlayerKind::Random => Box::new(RandomPlayer::new(name, seed)),
        PlayerKind::Human => Box::new(HumanPlayer::new(
            name,
            config.names(),
            io::stdin(),
            io::stdout(),
        )),
    };

    info!(player = player.name(), ?kind, id = side.id(), "Player joined the game");
    Ok(player)
}

/// Engine-backed player running a UCT search per move.
pub struct MctsPlayer {
    name: String,
    engine: UctSearch,
    last_search: Option<SearchResult>,
}

impl MctsPlayer {
    /// Create a UCT player; `seed` 0 seeds from entropy.
    pub fn new(name: String, config: UctConfig, seed: u64) -> Result<Self> {
        let engine = UctSearch::new(config, rng_from_seed(seed))
            .with_context(|| format!("failed to create engine for {}", name))?;
        Ok(Self {
            name,
            engine,
            last_search: None,
        })
    }

    /// Statistics of the most recent search, if any.
    #[cfg(test)]
    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }
}

impl Player for MctsPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.last_search = None;
    }

    fn choose_move(&mut self, state: &GameState) -> Result<usize> {
        let result = self
            .engine
            .search(state)
            .with_context(|| format!("{} could not choose a move", self.name))?;

        let previous_win_rate = self.last_search.as_ref().map(|last| last.win_rate);
        info!(
            player = %self.name,
            column = result.column,
            win_rate = format!("{:.3}", result.win_rate),
            previous_win_rate = ?previous_win_rate,
            simulations = result.simulations,
            elapsed_ms = format!("{:.1}", result.elapsed_us as f64 / 1000.0),
            "Engine move"
        );

        let column = result.column;
        self.last_search = Some(result);
        Ok(column)
    }

    fn predicted_continuation(&self) -> Vec<usize> {
        Vec::new()
    }

    fn win_likelihood(&self) -> f64 {
        0.0
    }
}

/// Player that picks uniformly among the legal columns.
#[derive(Debug)]
pub struct RandomPlayer {
    name: String,
    rng: ChaCha20Rng,
}

impl RandomPlayer {
    /// Create a random player; `seed` 0 seeds from entropy.
    pub fn new(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: rng_from_seed(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {}

    fn choose_move(&mut self, state: &GameState) -> Result<usize> {
        let legal = state.legal_moves();
        let column = legal
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("{} has no legal move to choose from", self.name))?;
        debug!(player = %self.name, column, "Random move");
        Ok(column)
    }

    fn predicted_continuation(&self) -> Vec<usize> {
        Vec::new()
    }

    fn win_likelihood(&self) -> f64 {
        0.0
    }
}

/// Console player reading one column per line.
///
/// `h` or `history` prints the moves played so far and asks again.
pub struct HumanPlayer<R: LineSource, W: Write> {
    name: String,
    names: [String; 2],
    input: R,
    output: W,
}

impl<R: LineSource, W: Write> HumanPlayer<R, W> {
    /// `names` holds both seats' names (player 1 first) for the history dump.
    pub fn new(name: String, names: [String; 2], input: R, output: W) -> Self {
        Self {
            name,
            names,
            input,
            output,
        }
    }
}

impl<R: LineSource, W: Write> Player for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {}

    fn choose_move(&mut self, state: &GameState) -> Result<usize> {
        let last_col = state.cols().saturating_sub(1);

        loop {
            write!(
                self.output,
                "{} ({}), enter your move (0-{}): ",
                self.name,
                symbol(Some(state.current_player())),
                last_col
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.next_line(&mut line)? == 0 {
                bail!("input closed while waiting for {}'s move", self.name);
            }

            let answer = line.trim();
            if answer.eq_ignore_ascii_case("h") || answer.eq_ignore_ascii_case("history") {
                for entry in history_lines(state, &self.names) {
                    writeln!(self.output, "{}", entry)?;
                }
                continue;
            }

            match answer.parse::<usize>() {
                Ok(col) if state.legal_moves().contains(&col) => return Ok(col),
                Ok(col) => writeln!(self.output, "Column {} is not playable. Try again.", col)?,
                Err(_) => writeln!(
                    self.output,
                    "Please enter a column number between 0 and {}, or 'h' for the history.",
                    last_col
                )?,
            }
        }
    }

    fn predicted_continuation(&self) -> Vec<usize> {
        Vec::new()
    }

    fn win_likelihood(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> [String; 2] {
        ["Ada".to_string(), "Dalek".to_string()]
    }

    fn human(input: &str) -> HumanPlayer<Cursor<Vec<u8>>, Vec<u8>> {
        HumanPlayer::new(
            "Ada".into(),
            names(),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    fn output_of(player: &HumanPlayer<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(player.output.clone()).unwrap()
    }

    #[test]
    fn test_mcts_player_plays_winning_move() {
        let state = GameState::from_moves(6, 7, Side::One, &[0, 0, 1, 1, 2, 2]).unwrap();
        let mut player =
            MctsPlayer::new("HAL9000".into(), UctConfig::default().with_simulations(400), 1)
                .unwrap();

        assert_eq!(player.choose_move(&state).unwrap(), 3);
        assert_eq!(player.last_search().map(|r| r.simulations), Some(400));

        // Prediction queries are not implemented by the engine player
        assert!(player.predicted_continuation().is_empty());
        assert_eq!(player.win_likelihood(), 0.0);

        player.reset();
        assert!(player.last_search().is_none());
    }

    #[test]
    fn test_mcts_player_errors_on_finished_game() {
        let state = GameState::from_moves(6, 7, Side::One, &[0, 0, 1, 1, 2, 2, 3]).unwrap();
        let mut player = MctsPlayer::new("HAL9000".into(), UctConfig::for_testing(), 1).unwrap();

        assert!(player.choose_move(&state).is_err());
    }

    #[test]
    fn test_mcts_player_rejects_bad_config() {
        let result = MctsPlayer::new("HAL9000".into(), UctConfig::default().with_simulations(0), 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_random_player_plays_legal_moves() {
        let mut player = RandomPlayer::new("Dalek".into(), 5);
        let mut state = GameState::standard();

        while !state.is_terminal() {
            let col = player.choose_move(&state).unwrap();
            assert!(state.is_legal_move(col));
            state.apply_move(col);
        }

        assert!(player.choose_move(&state).is_err());
    }

    #[test]
    fn test_random_player_is_deterministic_with_seed() {
        let state = GameState::standard();
        let mut a = RandomPlayer::new("a".into(), 77);
        let mut b = RandomPlayer::new("b".into(), 77);

        for _ in 0..20 {
            assert_eq!(a.choose_move(&state).unwrap(), b.choose_move(&state).unwrap());
        }
    }

    #[test]
    fn test_human_player_reads_column() {
        let mut player = human("4\n");
        let state = GameState::standard();

        assert_eq!(player.choose_move(&state).unwrap(), 4);
        assert!(output_of(&player).contains("Ada (X), enter your move (0-6): "));
    }

    #[test]
    fn test_human_player_reprompts_on_bad_input() {
        let mut player = human("abc\n9\n\n2\n");
        let state = GameState::standard();

        assert_eq!(player.choose_move(&state).unwrap(), 2);

        let output = output_of(&player);
        assert_eq!(output.matches("enter your move").count(), 4);
        assert!(output.contains("Column 9 is not playable"));
        assert!(output.contains("Please enter a column number between 0 and 6"));
    }

    #[test]
    fn test_human_player_rejects_full_column() {
        let state = GameState::from_moves(6, 7, Side::One, &[0, 0, 0, 0, 0, 0]).unwrap();
        let mut player = human("0\n1\n");

        assert_eq!(player.choose_move(&state).unwrap(), 1);
        assert!(output_of(&player).contains("Column 0 is not playable"));
    }

    #[test]
    fn test_human_player_history_command() {
        let state = GameState::from_moves(6, 7, Side::One, &[3, 4]).unwrap();
        let mut player = human("h\nHISTORY\n5\n");

        assert_eq!(player.choose_move(&state).unwrap(), 5);

        let output = output_of(&player);
        assert_eq!(
            output
                .matches("board.apply_move(3)  # Move 1: Ada played at (row=5, col=3)")
                .count(),
            2
        );
        assert!(output.contains("board.apply_move(4)  # Move 2: Dalek played at (row=5, col=4)"));
        // Asking for the history does not touch the board
        assert_eq!(state.move_count(), 2);
    }

    #[test]
    fn test_human_player_end_of_input_is_an_error() {
        let mut player = human("x\n");
        let err = player.choose_move(&GameState::standard()).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_human_player_prompt_uses_side_symbol() {
        let state = GameState::from_moves(6, 7, Side::One, &[3]).unwrap();
        let mut player = human("3\n");

        player.choose_move(&state).unwrap();
        assert!(output_of(&player).contains("Ada (O), enter your move"));
    }
}
