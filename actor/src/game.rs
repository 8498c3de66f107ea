//! Match loop: asks the side to move for a column, validates it, applies it
//! and renders the board until the game is over.

use std::io::Write;

use anyhow::{bail, Context, Result};
use games_connect4::{GameState, Side};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::player::Player;
use crate::render::render_board;

const CONGRATULATIONS: [&str; 6] = [
    "Congratulations!",
    "Well played!",
    "You are the champion!",
    "Victory is yours!",
    "You nailed it!",
    "Amazing win!",
];

/// How a match ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// None for a draw
    pub winner: Option<Side>,
    /// Moves played in this match, not counting the opening
    pub plies: usize,
}

/// Two players and the position they start from.
pub struct Match<W: Write> {
    opening: GameState,
    players: [Box<dyn Player>; 2],
    names: [String; 2],
    max_rejected_moves: u32,
    out: W,
    rng: ChaCha20Rng,
}

impl<W: Write> Match<W> {
    /// `players[0]` plays as player 1. Every call to [`Match::play`] starts
    /// over from `opening`.
    pub fn new(
        opening: GameState,
        players: [Box<dyn Player>; 2],
        max_rejected_moves: u32,
        out: W,
        rng: ChaCha20Rng,
    ) -> Self {
        let names = [players[0].name().to_string(), players[1].name().to_string()];
        Self {
            opening,
            players,
            names,
            max_rejected_moves,
            out,
            rng,
        }
    }

    fn seat(side: Side) -> usize {
        match side {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    /// Play one game to the end.
    pub fn play(&mut self) -> Result<MatchOutcome> {
        let mut state = self.opening.clone();
        for player in self.players.iter_mut() {
            player.reset();
        }

        info!(
            player1 = %self.names[0],
            player2 = %self.names[1],
            rows = state.rows(),
            cols = state.cols(),
            opening_moves = state.move_count(),
            "Match starting"
        );
        writeln!(self.out, "{}\n", render_board(&state, &self.names))?;

        let mut plies = 0usize;
        while !state.is_terminal() {
            let column = self.request_move(&state)?;
            state.apply_move(column);
            plies += 1;

            debug!(ply = plies, column, "Move applied");
            writeln!(self.out, "{}\n", render_board(&state, &self.names))?;
        }

        self.announce(&state)?;

        let outcome = MatchOutcome {
            winner: state.winner(),
            plies,
        };
        info!(winner = ?outcome.winner.map(|s| s.id()), plies, "Match finished");
        Ok(outcome)
    }

    /// Ask the side to move until it names a legal column.
    fn request_move(&mut self, state: &GameState) -> Result<usize> {
        let seat = Self::seat(state.current_player());
        let legal = state.legal_moves();
        let mut rejected = 0u32;

        loop {
            let player = &mut self.players[seat];
            let column = player
                .choose_move(state)
                .with_context(|| format!("{} failed to move", self.names[seat]))?;

            if legal.contains(&column) {
                debug!(
                    player = %self.names[seat],
                    column,
                    win_likelihood = player.win_likelihood(),
                    continuation = ?player.predicted_continuation(),
                    "Move accepted"
                );
                return Ok(column);
            }

            rejected += 1;
            warn!(
                player = %self.names[seat],
                column,
                ?legal,
                rejected,
                "Rejected illegal move"
            );
            writeln!(self.out, "Illegal move: {}. Try again.", column)?;
            if rejected >= self.max_rejected_moves {
                bail!(
                    "{} made {} illegal moves in a row, aborting the match",
                    self.names[seat],
                    rejected
                );
            }
        }
    }

    fn announce(&mut self, state: &GameState) -> Result<()> {
        writeln!(self.out, "Game over!")?;
        match state.winner() {
            Some(side) => {
                let name = &self.names[Self::seat(side)];
                let message = CONGRATULATIONS
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or("Congratulations!");
                writeln!(self.out, "Hey {}... {}", name, message)?;
                writeln!(self.out, "{} wins!", name)?;
            }
            None => writeln!(self.out, "It's a draw!")?,
        }
        Ok(())
    }

    /// Consume the match and return the output sink.
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}
