//! Four-in-a-Row game state
//!
//! Two sides alternate dropping pieces into the columns of a vertically
//! suspended grid. The first side to form a horizontal, vertical, or diagonal
//! line of four pieces wins; a full grid with no line is a draw.
//!
//! # Board Layout
//!
//! The grid is stored in row-major order with row 0 at the **top**, so a
//! piece dropped into a column lands on the highest free row index:
//! ```text
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Top
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 4: [28][29][30][31][32][33][34]
//! Row 5: [35][36][37][38][39][40][41]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//! Rows and columns are chosen at construction; 6x7 is the standard board.
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::{GameState, Side};
//!
//! let mut state = GameState::standard();
//! for col in [0, 0, 1, 1, 2, 2, 3] {
//!     assert!(state.apply_move(col));
//! }
//! assert_eq!(state.winner(), Some(Side::One));
//! assert!(state.is_terminal());
//! ```

use std::fmt;
use thiserror::Error;

/// Standard board dimensions
pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;

/// Pieces in a row needed to win
pub const CONNECT: usize = 4;

/// One of the two sides of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Player 1
    One,
    /// Player 2
    Two,
}

impl Side {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Numeric player id (1 or 2).
    #[inline]
    pub fn id(self) -> u8 {
        match self {
            Side::One => 1,
            Side::Two => 2,
        }
    }

    /// Parse a numeric player id. Returns None for anything but 1 or 2.
    pub fn from_id(id: u8) -> Option<Side> {
        match id {
            1 => Some(Side::One),
            2 => Some(Side::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.id())
    }
}

/// One applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    /// Row the piece landed on (0 = top)
    pub row: usize,
    /// Column the piece was dropped into
    pub col: usize,
    /// Side that played the move
    pub player: Side,
}

/// Errors from the fallible constructors.
///
/// Move application itself never errors: `apply_move` and `undo_last_move`
/// report failure with `false` and leave the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Invalid board dimensions {rows}x{cols}: rows and cols must be positive")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Illegal move at ply {ply}: column {col}")]
    IllegalMove { ply: usize, col: usize },
}

/// Direction vectors (row delta, col delta) in scan order:
/// horizontal, vertical (top to bottom), down-right diagonal, up-right diagonal.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// Four-in-a-Row game state
///
/// Holds the grid, the side to move and the full move history. Every
/// successful `apply_move` flips the side to move and every successful
/// `undo_last_move` flips it back, so the history always has exactly one
/// entry per occupied cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    rows: usize,
    cols: usize,
    /// None = empty, Some(side) = occupied. Row-major, row 0 at the top.
    grid: Vec<Option<Side>>,
    /// Number of pieces in each column
    column_heights: Vec<usize>,
    current_player: Side,
    /// Side that moves first after `reset`
    first_player: Side,
    history: Vec<MoveRecord>,
}

impl GameState {
    /// Create an empty board with `first` to move.
    pub fn new(rows: usize, cols: usize, first: Side) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }

        Ok(Self {
            rows,
            cols,
            grid: vec![None; rows * cols],
            column_heights: vec![0; cols],
            current_player: first,
            first_player: first,
            history: Vec::new(),
        })
    }

    /// Empty 6x7 board with player 1 to move.
    pub fn standard() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            grid: vec![None; DEFAULT_ROWS * DEFAULT_COLS],
            column_heights: vec![0; DEFAULT_COLS],
            current_player: Side::One,
            first_player: Side::One,
            history: Vec::new(),
        }
    }

    /// Create a board and replay `moves` on it.
    ///
    /// Fails on the first move that is not legal at its ply (including any
    /// move played after the game has already been decided).
    pub fn from_moves(
        rows: usize,
        cols: usize,
        first: Side,
        moves: &[usize],
    ) -> Result<Self, BoardError> {
        let mut state = Self::new(rows, cols, first)?;
        for (ply, &col) in moves.iter().enumerate() {
            if state.is_terminal() || !state.apply_move(col) {
                return Err(BoardError::IllegalMove { ply, col });
            }
        }
        Ok(state)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Convert row and column to grid index
    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Content of a cell. Out-of-range coordinates read as empty.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<Side> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.grid[self.idx(row, col)]
    }

    /// Side to move next.
    #[inline]
    pub fn current_player(&self) -> Side {
        self.current_player
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Most recent move, if any.
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Number of pieces on the board.
    #[inline]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Legal columns in ascending order. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        (0..self.cols)
            .filter(|&col| self.is_legal_move(col))
            .collect()
    }

    /// Whether a piece can be dropped into `col`.
    ///
    /// Only looks at the column itself; a decided game still reports its
    /// non-full columns as legal.
    #[inline]
    pub fn is_legal_move(&self, col: usize) -> bool {
        col < self.cols && self.column_heights[col] < self.rows
    }

    /// Drop the side to move's piece into `col`.
    ///
    /// Returns false without touching the state when the column is out of
    /// range or full.
    pub fn apply_move(&mut self, col: usize) -> bool {
        if !self.is_legal_move(col) {
            return false;
        }

        let row = self.rows - 1 - self.column_heights[col];
        let idx = self.idx(row, col);
        self.grid[idx] = Some(self.current_player);
        self.column_heights[col] += 1;
        self.history.push(MoveRecord {
            row,
            col,
            player: self.current_player,
        });
        self.current_player = self.current_player.opponent();

        true
    }

    /// Take back the most recent move. Returns false if there is none.
    pub fn undo_last_move(&mut self) -> bool {
        let Some(last) = self.history.pop() else {
            return false;
        };

        let idx = self.idx(last.row, last.col);
        self.grid[idx] = None;
        self.column_heights[last.col] -= 1;
        self.current_player = last.player;

        true
    }

    /// Clear the board and hand the move back to the first player.
    pub fn reset(&mut self) {
        self.grid.iter_mut().for_each(|cell| *cell = None);
        self.column_heights.iter_mut().for_each(|h| *h = 0);
        self.history.clear();
        self.current_player = self.first_player;
    }

    /// True when every column is full.
    pub fn is_full(&self) -> bool {
        self.column_heights.iter().all(|&h| h >= self.rows)
    }

    /// The game is over: somebody won or the board is full.
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// Scan the whole grid for four in a row.
    ///
    /// Windows are checked rows first (left to right), then columns (top to
    /// bottom), then down-right diagonals, then up-right diagonals; the first
    /// complete window decides the result.
    pub fn winner(&self) -> Option<Side> {
        let [horizontal, vertical, down_right, up_right] = DIRECTIONS;

        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some(side) = self.window(row, col, horizontal) {
                    return Some(side);
                }
            }
        }

        for col in 0..self.cols {
            for row in 0..self.rows {
                if let Some(side) = self.window(row, col, vertical) {
                    return Some(side);
                }
            }
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some(side) = self.window(row, col, down_right) {
                    return Some(side);
                }
            }
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some(side) = self.window(row, col, up_right) {
                    return Some(side);
                }
            }
        }

        None
    }

    /// Side owning all CONNECT cells starting at (row, col) along (dr, dc).
    fn window(&self, row: usize, col: usize, (dr, dc): (isize, isize)) -> Option<Side> {
        let side = self.cell(row, col)?;

        (1..CONNECT as isize)
            .all(|i| {
                let r = row as isize + dr * i;
                let c = col as isize + dc * i;
                r >= 0 && c >= 0 && self.cell(r as usize, c as usize) == Some(side)
            })
            .then_some(side)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::standard()
    }
}
