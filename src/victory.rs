//! Win and draw detection.

use crate::board::{cell::Player, Board};
use crate::geometry::Coord;
use crate::BOARD_SIZE;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A complete line of the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinLine {
    Row(u8),
    Column(u8),
    /// The main diagonal, where the row index equals the column index.
    MainDiagonal,
    /// The anti-diagonal, where the row and column indices add up to `BOARD_SIZE - 1`.
    AntiDiagonal,
}

impl WinLine {
    /// Returns the positions of all the cells making up the line.
    pub fn cells(self) -> Vec<Coord> {
        (0..BOARD_SIZE)
            .map(|i| match self {
                WinLine::Row(row_index) => (row_index, i),
                WinLine::Column(column_index) => (i, column_index),
                WinLine::MainDiagonal => (i, i),
                WinLine::AntiDiagonal => (i, BOARD_SIZE - 1 - i),
            })
            .collect()
    }

    pub fn contains(self, (row_index, column_index): Coord) -> bool {
        match self {
            WinLine::Row(r) => row_index == r && column_index < BOARD_SIZE,
            WinLine::Column(c) => column_index == c && row_index < BOARD_SIZE,
            WinLine::MainDiagonal => row_index == column_index && row_index < BOARD_SIZE,
            WinLine::AntiDiagonal => {
                row_index < BOARD_SIZE && column_index < BOARD_SIZE && row_index + column_index == BOARD_SIZE - 1
            }
        }
    }

    /// All the lines in the order they are checked: rows, columns, the main diagonal and the anti-diagonal.
    fn all() -> impl Iterator<Item = WinLine> {
        (0..BOARD_SIZE)
            .map(WinLine::Row)
            .chain((0..BOARD_SIZE).map(WinLine::Column))
            .chain([WinLine::MainDiagonal, WinLine::AntiDiagonal])
    }
}

/// The result of evaluating the board for a player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Neither a win nor a draw, the game goes on.
    Undecided,
    Win(WinLine),
    /// The board is full and nobody has a complete line.
    Draw,
}

/// Evaluates the board for the player who has just completed an action.
///
/// The first complete line of the player's markers wins, rows checked first, then columns, then the two diagonals.
/// Without one, a full board is a draw.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board, player: Player) -> Outcome {
    let winning_line = WinLine::all().find(|line| {
        line.cells()
            .into_iter()
            .all(|coord| board.cell(coord).and_then(|cell| cell.marker()) == Some(player))
    });

    match winning_line {
        Some(line) => Outcome::Win(line),
        None if board.is_full() => Outcome::Draw,
        None => Outcome::Undecided,
    }
}

#[cfg(test)]
mod test {
    use super::{evaluate, Outcome, Player, WinLine};
    use crate::board::Board;

    fn board_with(markers: &[((u8, u8), Player)]) -> Board {
        let mut board = Board::new();

        for (coord, player) in markers {
            board.place_marker(*coord, *player).unwrap();
        }

        board
    }

    #[test]
    fn an_empty_board_is_undecided() {
        assert_eq!(evaluate(&Board::new(), Player::X), Outcome::Undecided);
    }

    #[test]
    fn a_full_row_wins() {
        let markers: Vec<((u8, u8), Player)> = (0..5).map(|c| ((3, c), Player::X)).collect();
        let board = board_with(&markers);

        assert_eq!(evaluate(&board, Player::X), Outcome::Win(WinLine::Row(3)));
        // the line belongs to X, so there's nothing for O
        assert_eq!(evaluate(&board, Player::O), Outcome::Undecided);
    }

    #[test]
    fn a_full_column_wins() {
        let markers: Vec<((u8, u8), Player)> = (0..5).map(|r| ((r, 1), Player::O)).collect();
        let board = board_with(&markers);

        assert_eq!(evaluate(&board, Player::O), Outcome::Win(WinLine::Column(1)));
    }

    #[test]
    fn the_main_diagonal_wins() {
        let markers: Vec<((u8, u8), Player)> = (0..5).map(|i| ((i, i), Player::O)).collect();
        let board = board_with(&markers);

        assert_eq!(evaluate(&board, Player::O), Outcome::Win(WinLine::MainDiagonal));
    }

    #[test]
    fn the_anti_diagonal_wins() {
        let markers: Vec<((u8, u8), Player)> = (0..5).map(|i| ((i, 4 - i), Player::X)).collect();
        let board = board_with(&markers);

        assert_eq!(evaluate(&board, Player::X), Outcome::Win(WinLine::AntiDiagonal));
    }

    #[test]
    fn an_incomplete_line_does_not_win() {
        let markers: Vec<((u8, u8), Player)> = (0..4).map(|c| ((0, c), Player::X)).collect();
        let board = board_with(&markers);

        assert_eq!(evaluate(&board, Player::X), Outcome::Undecided);
    }

    #[test]
    fn a_full_board_without_lines_is_a_draw() {
        // X X O O X
        // O O X X O
        // X X O O X
        // O O X X O
        // X O X O O
        let layout = [
            "XXOOX", //
            "OOXXO", //
            "XXOOX", //
            "OOXXO", //
            "XOXOO",
        ];

        let markers: Vec<((u8, u8), Player)> = layout
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.chars().enumerate().map(move |(c, symbol)| {
                    let player = if symbol == 'X' { Player::X } else { Player::O };
                    ((r as u8, c as u8), player)
                })
            })
            .collect();
        let board = board_with(&markers);

        assert_eq!(evaluate(&board, Player::X), Outcome::Draw);
        assert_eq!(evaluate(&board, Player::O), Outcome::Draw);
    }

    #[test]
    fn line_cells_and_contains_agree() {
        for line in [
            WinLine::Row(2),
            WinLine::Column(0),
            WinLine::MainDiagonal,
            WinLine::AntiDiagonal,
        ] {
            let cells = line.cells();
            assert_eq!(cells.len(), 5);
            assert!(cells.iter().all(|coord| line.contains(*coord)));
        }

        assert_eq!(WinLine::AntiDiagonal.cells()[0], (0, 4));
        assert!(!WinLine::AntiDiagonal.contains((2, 3)));
    }
}
