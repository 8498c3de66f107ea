//! Console rendering of the board and the move history.

use games_connect4::{GameState, MoveRecord, Side};

/// Board symbol of a cell.
pub fn symbol(cell: Option<Side>) -> char {
    match cell {
        Some(Side::One) => 'X',
        Some(Side::Two) => 'O',
        None => '.',
    }
}

fn name_of(names: &[String; 2], side: Side) -> &str {
    match side {
        Side::One => &names[0],
        Side::Two => &names[1],
    }
}

/// Render the grid top row first, followed by a separator, the column
/// indices, the side to move (while the game is running) and the last move.
///
/// ```text
/// . | . | . | . | . | . | .
/// X | O | . | . | . | . | .
/// --+---+---+---+---+---+--
/// 0 | 1 | 2 | 3 | 4 | 5 | 6
/// Current player: HAL9000 (1, X)
/// Last move: Dalek (O) at (row=1, col=1)
/// ```
pub fn render_board(state: &GameState, names: &[String; 2]) -> String {
    // Cells are as wide as the widest column index
    let width = state.cols().saturating_sub(1).to_string().len();

    let mut lines: Vec<String> = (0..state.rows())
        .map(|row| {
            (0..state.cols())
                .map(|col| format!("{:>width$}", symbol(state.cell(row, col))))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();

    let separator: String = lines
        .last()
        .map(|row| {
            row.chars()
                .map(|c| if c == '|' { '+' } else { '-' })
                .collect::<String>()
        })
        .unwrap_or_default();
    lines.push(separator);
    lines.push(
        (0..state.cols())
            .map(|col| format!("{:>width$}", col))
            .collect::<Vec<_>>()
            .join(" | "),
    );

    if !state.is_terminal() {
        let side = state.current_player();
        lines.push(format!(
            "Current player: {} ({}, {})",
            name_of(names, side),
            side.id(),
            symbol(Some(side))
        ));
    }

    if let Some(last) = state.last_move() {
        lines.push(format!("Last move: {}", describe_move(last, names)));
    }

    lines.join("\n")
}

fn describe_move(record: &MoveRecord, names: &[String; 2]) -> String {
    format!(
        "{} ({}) at (row={}, col={})",
        name_of(names, record.player),
        symbol(Some(record.player)),
        record.row,
        record.col
    )
}

/// The move history as a replayable sequence, one line per move.
pub fn history_lines(state: &GameState, names: &[String; 2]) -> Vec<String> {
    state
        .history()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                "board.apply_move({})  # Move {}: {} played at (row={}, col={})",
                record.col,
                i + 1,
                name_of(names, record.player),
                record.row,
                record.col
            )
        })
        .collect()
}
