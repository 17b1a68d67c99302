pub mod cell;
pub mod fuse;

use crate::error::{GameError, InvalidMove, Result};
use crate::geometry::{in_bounds, is_orthogonally_adjacent, Coord};
use crate::BOARD_SIZE;
use cell::{Cell, Player};
use fuse::{Fuse, FuseId};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The board representation.
///
/// The board is a fixed-size grid (a 2D vector) of cells plus the table of all the fuses laid between them. The table
/// is the single source of truth for fuses; the cells at both endpoints only hold the fuse's id, and every mutation
/// touches the table and both endpoints together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// The grid of cells. The top level represents rows, and the nested vector of each row represents cells.
    grid: Vec<Vec<Cell>>,
    fuses: BTreeMap<FuseId, Fuse>,
    /// The id the next fuse is going to get. Only ever grows.
    next_fuse_id: u32,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        let grid = (0..BOARD_SIZE)
            .map(|row_index| {
                (0..BOARD_SIZE)
                    .map(|column_index| Cell::new((row_index, column_index)))
                    .collect()
            })
            .collect();

        Board {
            grid,
            fuses: BTreeMap::new(),
            next_fuse_id: 0,
        }
    }

    /// Returns a read-only cell reference by its position or [`None`] if there's no cell at the given position.
    pub fn cell(&self, (row_index, column_index): Coord) -> Option<&Cell> {
        self.grid
            .get(row_index as usize)
            .and_then(|r| r.get(column_index as usize))
    }

    /// Returns a mutable cell reference by its position or [`None`] if there's no cell at the given position.
    fn cell_mut(&mut self, (row_index, column_index): Coord) -> Option<&mut Cell> {
        self.grid
            .get_mut(row_index as usize)
            .and_then(|r| r.get_mut(column_index as usize))
    }

    /// Same as [`Board::cell`], but with a missing cell turned into [`GameError::OutOfBounds`].
    pub fn try_cell(&self, coord: Coord) -> Result<&Cell> {
        self.cell(coord).ok_or(GameError::OutOfBounds(coord))
    }

    fn try_cell_mut(&mut self, coord: Coord) -> Result<&mut Cell> {
        self.cell_mut(coord).ok_or(GameError::OutOfBounds(coord))
    }

    /// Iterates over all the cells in the row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter().flatten()
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter().map(|row| row.as_slice())
    }

    /// Writes the player's marker into an empty cell.
    ///
    /// Fails with [`InvalidMove::CellOccupied`] if the cell already holds a marker.
    pub fn place_marker(&mut self, coord: Coord, player: Player) -> Result<()> {
        let cell = self.try_cell_mut(coord)?;

        if cell.is_occupied() {
            return Err(InvalidMove::CellOccupied(coord).into());
        }

        cell.set_marker(player);
        Ok(())
    }

    /// Arms a cell with a bomb.
    ///
    /// Fails with [`InvalidMove::BombAlreadyPlaced`] if there's a bomb in the cell already.
    pub fn place_bomb(&mut self, coord: Coord) -> Result<()> {
        let cell = self.try_cell_mut(coord)?;

        if cell.has_bomb() {
            return Err(InvalidMove::BombAlreadyPlaced(coord).into());
        }

        cell.arm();
        Ok(())
    }

    /// Lays a new fuse from one cell into an orthogonally adjacent one and returns it.
    ///
    /// The method only checks the shape of the edge (no self-loops, adjacency, no duplicates). Whether `from` is
    /// allowed to start a fuse at all is a rule of the game, not of the board, and is checked by the caller.
    pub fn add_fuse(&mut self, from: Coord, to: Coord) -> Result<Fuse> {
        if !in_bounds(from) {
            return Err(GameError::OutOfBounds(from));
        }
        if !in_bounds(to) {
            return Err(GameError::OutOfBounds(to));
        }

        if from == to {
            return Err(InvalidMove::SelfLoop(from).into());
        }
        if !is_orthogonally_adjacent(from, to) {
            return Err(InvalidMove::NotAdjacent(from, to).into());
        }
        if self.has_fuse(from, to) {
            return Err(InvalidMove::DuplicateFuse(from, to).into());
        }

        let fuse = Fuse {
            id: FuseId(self.next_fuse_id),
            from,
            to,
        };
        self.next_fuse_id += 1;

        self.try_cell_mut(from)?.attach_outgoing(fuse.id);
        self.try_cell_mut(to)?.attach_incoming(fuse.id);
        self.fuses.insert(fuse.id, fuse);

        Ok(fuse)
    }

    /// Removes a fuse from the table and from both of its endpoints.
    ///
    /// Fails with [`GameError::FuseNotFound`] if there's no such fuse, which only ever happens when the caller holds a
    /// stale id.
    pub fn remove_fuse(&mut self, id: FuseId) -> Result<Fuse> {
        let fuse = self.fuses.remove(&id).ok_or(GameError::FuseNotFound(id))?;

        self.try_cell_mut(fuse.from)?.detach_outgoing(id);
        self.try_cell_mut(fuse.to)?.detach_incoming(id);

        Ok(fuse)
    }

    pub fn fuse(&self, id: FuseId) -> Option<&Fuse> {
        self.fuses.get(&id)
    }

    /// Iterates over all the fuses in the ascending id order.
    pub fn fuses(&self) -> impl Iterator<Item = &Fuse> {
        self.fuses.values()
    }

    /// Iterates over the fuses feeding into the cell, in the ascending id order.
    pub fn incoming_fuses(&self, coord: Coord) -> impl Iterator<Item = &Fuse> {
        self.cell(coord)
            .into_iter()
            .flat_map(|cell| cell.incoming().iter())
            .filter_map(move |id| self.fuses.get(id))
    }

    /// Iterates over the fuses leaving the cell, in the ascending id order.
    pub fn outgoing_fuses(&self, coord: Coord) -> impl Iterator<Item = &Fuse> {
        self.cell(coord)
            .into_iter()
            .flat_map(|cell| cell.outgoing().iter())
            .filter_map(move |id| self.fuses.get(id))
    }

    /// Checks whether a fuse from `from` into `to` already exists.
    pub fn has_fuse(&self, from: Coord, to: Coord) -> bool {
        self.outgoing_fuses(from).any(|fuse| fuse.to == to)
    }

    /// Checks that every cell holds a marker. Together with the absence of a winning line this is the draw condition.
    pub fn is_full(&self) -> bool {
        self.cells().all(|cell| cell.is_occupied())
    }

    /// Lets the bomb of the cell go off (see [`Cell::detonate`]).
    pub(crate) fn detonate_cell(&mut self, coord: Coord, flip: bool) -> Result<bool> {
        Ok(self.try_cell_mut(coord)?.detonate(flip))
    }

    /// Verifies that the fuse table and the ids stored in the cells describe exactly the same set of fuses.
    ///
    /// Every fuse in the table must be referenced once from its origin's outgoing set and once from its
    /// destination's incoming set, and the cells must not reference anything else.
    pub fn check_fuse_symmetry(&self) -> bool {
        let table_matches_cells = self.fuses.iter().all(|(id, fuse)| {
            *id == fuse.id
                && self.cell(fuse.from).is_some_and(|cell| cell.outgoing().contains(id))
                && self.cell(fuse.to).is_some_and(|cell| cell.incoming().contains(id))
        });

        let cells_match_table = self.cells().all(|cell| {
            cell.outgoing().iter().all(|id| {
                self.fuses
                    .get(id)
                    .is_some_and(|fuse| fuse.from == cell.position())
            }) && cell.incoming().iter().all(|id| {
                self.fuses
                    .get(id)
                    .is_some_and(|fuse| fuse.to == cell.position())
            })
        });

        table_matches_cells && cells_match_table
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for i in 0..BOARD_SIZE {
            write!(f, "{:^5}", i)?;
        }
        writeln!(f)?;

        for (row_index, row) in self.grid.iter().enumerate() {
            write!(f, "{:^3}", row_index)?;

            for cell in row {
                let position = cell.position();
                let right = (position.0, position.1 + 1);
                let connector = match (self.has_fuse(position, right), self.has_fuse(right, position)) {
                    (true, true) => "<>",
                    (true, false) => "->",
                    (false, true) => "<-",
                    (false, false) => "  ",
                };

                write!(f, " {}{}", cell, connector)?;
            }

            writeln!(f)?;

            // the vertical connectors go on their own line between two rows
            write!(f, "   ")?;
            for cell in row {
                let position = cell.position();
                let below = (position.0 + 1, position.1);
                let connector = match (self.has_fuse(position, below), self.has_fuse(below, position)) {
                    (true, true) => "↕",
                    (true, false) => "↓",
                    (false, true) => "↑",
                    (false, false) => " ",
                };

                write!(f, " {}   ", connector)?;
            }

            writeln!(f)?;
        }

        write!(f, "")
    }
}

#[cfg(test)]
mod test {
    use super::{Board, FuseId, GameError, InvalidMove, Player};

    #[test]
    fn a_new_board_is_empty() {
        let board = Board::new();

        assert_eq!(board.cells().count(), 25);
        assert!(board.cells().all(|cell| !cell.is_occupied() && !cell.has_bomb()));
        assert_eq!(board.fuses().count(), 0);
    }

    #[test]
    fn cell_returns_none_for_non_existing_cells() {
        let board = Board::new();

        assert!(board.cell((0, 0)).is_some());
        assert!(board.cell((5, 5)).is_none());
        assert_eq!(board.try_cell((7, 0)), Err(GameError::OutOfBounds((7, 0))));
    }

    #[test]
    fn place_marker_fails_on_an_occupied_cell() {
        let mut board = Board::new();

        assert!(board.place_marker((1, 1), Player::X).is_ok());
        assert_eq!(
            board.place_marker((1, 1), Player::O),
            Err(GameError::InvalidMove(InvalidMove::CellOccupied((1, 1))))
        );
        assert_eq!(board.cell((1, 1)).unwrap().marker(), Some(Player::X));
    }

    #[test]
    fn place_bomb_fails_when_there_is_a_bomb_already() {
        let mut board = Board::new();

        assert!(board.place_bomb((1, 1)).is_ok());
        assert_eq!(
            board.place_bomb((1, 1)),
            Err(GameError::InvalidMove(InvalidMove::BombAlreadyPlaced((1, 1))))
        );
    }

    #[test]
    fn a_bomb_can_go_under_an_existing_marker() {
        let mut board = Board::new();

        board.place_marker((0, 0), Player::O).unwrap();
        assert!(board.place_bomb((0, 0)).is_ok());
        assert!(board.cell((0, 0)).unwrap().has_bomb());
    }

    #[test]
    fn add_fuse_stores_both_endpoints() {
        let mut board = Board::new();

        let fuse = board.add_fuse((2, 2), (2, 3)).unwrap();

        assert_eq!(fuse.id, FuseId(0));
        assert!(board.cell((2, 2)).unwrap().outgoing().contains(&fuse.id));
        assert!(board.cell((2, 3)).unwrap().incoming().contains(&fuse.id));
        assert!(board.has_fuse((2, 2), (2, 3)));
        assert!(!board.has_fuse((2, 3), (2, 2)));
        assert!(board.check_fuse_symmetry());
    }

    #[test]
    fn add_fuse_rejects_malformed_edges() {
        let mut board = Board::new();

        assert_eq!(
            board.add_fuse((2, 2), (2, 2)),
            Err(GameError::InvalidMove(InvalidMove::SelfLoop((2, 2))))
        );
        assert_eq!(
            board.add_fuse((2, 2), (3, 3)),
            Err(GameError::InvalidMove(InvalidMove::NotAdjacent((2, 2), (3, 3))))
        );
        assert_eq!(board.add_fuse((4, 4), (4, 5)), Err(GameError::OutOfBounds((4, 5))));

        board.add_fuse((2, 2), (2, 3)).unwrap();
        assert_eq!(
            board.add_fuse((2, 2), (2, 3)),
            Err(GameError::InvalidMove(InvalidMove::DuplicateFuse((2, 2), (2, 3))))
        );

        // the opposite direction is a different edge
        assert!(board.add_fuse((2, 3), (2, 2)).is_ok());
        assert_eq!(board.fuses().count(), 2);
        assert!(board.check_fuse_symmetry());
    }

    #[test]
    fn fuse_ids_keep_growing_after_removal() {
        let mut board = Board::new();

        let first = board.add_fuse((0, 0), (0, 1)).unwrap();
        board.remove_fuse(first.id).unwrap();
        let second = board.add_fuse((0, 0), (0, 1)).unwrap();

        assert_eq!(second.id, FuseId(1));
    }

    #[test]
    fn remove_fuse_detaches_both_endpoints() {
        let mut board = Board::new();
        let fuse = board.add_fuse((1, 1), (0, 1)).unwrap();

        assert_eq!(board.remove_fuse(fuse.id), Ok(fuse));

        assert!(board.fuse(fuse.id).is_none());
        assert!(!board.cell((1, 1)).unwrap().has_outgoing_fuses());
        assert!(!board.cell((0, 1)).unwrap().has_incoming_fuses());
        assert!(board.check_fuse_symmetry());
    }

    #[test]
    fn remove_fuse_fails_for_unknown_ids() {
        let mut board = Board::new();

        assert_eq!(
            board.remove_fuse(FuseId(42)),
            Err(GameError::FuseNotFound(FuseId(42)))
        );
    }

    #[test]
    fn incoming_and_outgoing_fuses_are_looked_up_through_the_table() {
        let mut board = Board::new();
        let a = board.add_fuse((1, 2), (2, 2)).unwrap();
        let b = board.add_fuse((2, 1), (2, 2)).unwrap();
        let c = board.add_fuse((2, 2), (2, 3)).unwrap();

        assert_eq!(board.incoming_fuses((2, 2)).copied().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(board.outgoing_fuses((2, 2)).copied().collect::<Vec<_>>(), vec![c]);
        assert_eq!(board.incoming_fuses((9, 9)).count(), 0);
    }

    #[test]
    fn is_full_requires_a_marker_everywhere() {
        let mut board = Board::new();
        assert!(!board.is_full());

        for row_index in 0..5 {
            for column_index in 0..5 {
                board.place_marker((row_index, column_index), Player::X).unwrap();
            }
        }

        assert!(board.is_full());
    }

    #[test]
    fn display_draws_markers_bombs_and_fuses() {
        let mut board = Board::new();
        board.place_marker((0, 0), Player::X).unwrap();
        board.place_bomb((0, 0)).unwrap();
        board.add_fuse((0, 0), (0, 1)).unwrap();
        board.add_fuse((0, 0), (1, 0)).unwrap();

        let rendered = board.to_string();

        assert!(rendered.contains("X*->"));
        assert!(rendered.contains('↓'));
    }
}
