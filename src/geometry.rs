//! Coordinates and the orthogonal-adjacency helpers.

use crate::BOARD_SIZE;

/// A cell position as `(row_index, column_index)`.
pub type Coord = (u8, u8);

/// Checks whether both coordinates lie within the board.
pub fn in_bounds((row_index, column_index): Coord) -> bool {
    row_index < BOARD_SIZE && column_index < BOARD_SIZE
}

/// True iff exactly one of row/column differs by 1 and the other one is equal.
pub fn is_orthogonally_adjacent(a: Coord, b: Coord) -> bool {
    let row_diff = a.0.abs_diff(b.0);
    let column_diff = a.1.abs_diff(b.1);

    (row_diff == 1 && column_diff == 0) || (row_diff == 0 && column_diff == 1)
}

/// Returns the in-bounds orthogonal neighbours of the cell in the up, left, down, right order.
pub fn neighbors((row_index, column_index): Coord) -> Vec<Coord> {
    // Work in `i16` to step past the first row/column without underflowing.
    let (row_index, column_index) = (row_index as i16, column_index as i16);

    [
        (row_index - 1, column_index),
        (row_index, column_index - 1),
        (row_index + 1, column_index),
        (row_index, column_index + 1),
    ]
    .into_iter()
    .filter(|(row_index, column_index)| *row_index >= 0 && *column_index >= 0)
    .map(|(row_index, column_index)| (row_index as u8, column_index as u8))
    .filter(|coord| in_bounds(*coord))
    .collect()
}

#[cfg(test)]
mod test {
    use super::{in_bounds, is_orthogonally_adjacent, neighbors};

    #[test]
    fn orthogonal_neighbours_are_adjacent() {
        assert!(is_orthogonally_adjacent((2, 2), (1, 2)));
        assert!(is_orthogonally_adjacent((2, 2), (3, 2)));
        assert!(is_orthogonally_adjacent((2, 2), (2, 1)));
        assert!(is_orthogonally_adjacent((2, 2), (2, 3)));
    }

    #[test]
    fn diagonal_distant_and_identical_cells_are_not_adjacent() {
        assert!(!is_orthogonally_adjacent((2, 2), (2, 2)));
        assert!(!is_orthogonally_adjacent((2, 2), (3, 3)));
        assert!(!is_orthogonally_adjacent((2, 2), (2, 4)));
        assert!(!is_orthogonally_adjacent((0, 0), (4, 0)));
    }

    #[test]
    fn bounds_follow_the_board_size() {
        assert!(in_bounds((0, 0)));
        assert!(in_bounds((4, 4)));
        assert!(!in_bounds((5, 0)));
        assert!(!in_bounds((0, 5)));
    }

    #[test]
    fn neighbours_of_a_corner_stay_on_the_board() {
        assert_eq!(neighbors((0, 0)), vec![(1, 0), (0, 1)]);
        assert_eq!(neighbors((4, 4)), vec![(3, 4), (4, 3)]);
        assert_eq!(neighbors((2, 2)), vec![(1, 2), (2, 1), (3, 2), (2, 3)]);
    }
}
