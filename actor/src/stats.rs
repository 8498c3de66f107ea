//! Outcome tally across a series of matches.

use std::time::Instant;

use games_connect4::Side;
use tracing::info;

use crate::game::MatchOutcome;

/// Running totals over every match played in this process.
#[derive(Debug)]
pub struct MatchStats {
    /// Number of matches completed
    matches: u32,
    /// Matches won by player 1
    player1_wins: u32,
    /// Matches won by player 2
    player2_wins: u32,
    /// Matches that filled the board
    draws: u32,
    /// Sum of match lengths for average calculation
    total_plies: u64,
    /// Start time for rate calculations
    start_time: Instant,
}

/// Point-in-time view of [`MatchStats`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStatsSnapshot {
    pub matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub draws: u32,
    pub avg_plies: f64,
    pub runtime_seconds: f64,
}

impl Default for MatchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStats {
    pub fn new() -> Self {
        Self {
            matches: 0,
            player1_wins: 0,
            player2_wins: 0,
            draws: 0,
            total_plies: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a completed match.
    pub fn record(&mut self, outcome: &MatchOutcome) {
        self.matches += 1;
        self.total_plies += outcome.plies as u64;

        match outcome.winner {
            Some(Side::One) => self.player1_wins += 1,
            Some(Side::Two) => self.player2_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn snapshot(&self) -> MatchStatsSnapshot {
        let avg_plies = if self.matches > 0 {
            self.total_plies as f64 / self.matches as f64
        } else {
            0.0
        };

        MatchStatsSnapshot {
            matches: self.matches,
            player1_wins: self.player1_wins,
            player2_wins: self.player2_wins,
            draws: self.draws,
            avg_plies,
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }

    /// Log the totals at info level.
    pub fn log_summary(&self, names: &[String; 2]) {
        let snapshot = self.snapshot();
        info!(
            matches = snapshot.matches,
            player1 = %names[0],
            player1_wins = snapshot.player1_wins,
            player2 = %names[1],
            player2_wins = snapshot.player2_wins,
            draws = snapshot.draws,
            avg_plies = format!("{:.1}", snapshot.avg_plies),
            runtime_s = format!("{:.2}", snapshot.runtime_seconds),
            "Series complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(winner: Option<Side>, plies: usize) -> MatchOutcome {
        MatchOutcome { winner, plies }
    }

    #[test]
    fn test_record_outcomes() {
        let mut stats = MatchStats::new();

        stats.record(&outcome(Some(Side::One), 7));
        stats.record(&outcome(Some(Side::Two), 12));
        stats.record(&outcome(None, 42));
        stats.record(&outcome(Some(Side::One), 9));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.matches, 4);
        assert_eq!(snapshot.player1_wins, 2);
        assert_eq!(snapshot.player2_wins, 1);
        assert_eq!(snapshot.draws, 1);
        assert!((snapshot.avg_plies - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_average_with_zero_matches() {
        let snapshot = MatchStats::default().snapshot();
        assert_eq!(snapshot.matches, 0);
        assert_eq!(snapshot.avg_plies, 0.0);
        assert!(snapshot.runtime_seconds >= 0.0);
    }
}
