use super::fuse::FuseId;
use crate::geometry::Coord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// One of the two players. The variant doubles as the player's marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// The representation of a cell.
///
/// A cell is described with its position on the board, the marker it holds (if any), whether it's armed with a bomb
/// and the ids of the fuses attached to it. The fuses themselves live in the board's fuse table; the cell only keeps
/// references into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The cell's position on the board is represented with its row's and column's indices (respectively).
    position: Coord,
    marker: Option<Player>,
    has_bomb: bool,
    /// Fuses for which this cell is the destination.
    incoming: BTreeSet<FuseId>,
    /// Fuses for which this cell is the origin.
    outgoing: BTreeSet<FuseId>,
}

impl Cell {
    /// Creates a new empty `Cell` instance with the position provided.
    pub fn new(position: Coord) -> Self {
        Cell {
            position,
            marker: None,
            has_bomb: false,
            incoming: BTreeSet::new(),
            outgoing: BTreeSet::new(),
        }
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn marker(&self) -> Option<Player> {
        self.marker
    }

    pub fn is_occupied(&self) -> bool {
        self.marker.is_some()
    }

    pub fn has_bomb(&self) -> bool {
        self.has_bomb
    }

    pub fn incoming(&self) -> &BTreeSet<FuseId> {
        &self.incoming
    }

    pub fn outgoing(&self) -> &BTreeSet<FuseId> {
        &self.outgoing
    }

    pub fn has_incoming_fuses(&self) -> bool {
        !self.incoming.is_empty()
    }

    pub fn has_outgoing_fuses(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Checks whether a new fuse may start here: at a bomb, or at the loose end of an existing chain (fed by at least
    /// one fuse and feeding none).
    pub fn is_valid_fuse_origin(&self) -> bool {
        self.has_bomb || (self.has_incoming_fuses() && !self.has_outgoing_fuses())
    }

    pub(crate) fn set_marker(&mut self, player: Player) {
        self.marker = Some(player);
    }

    pub(crate) fn arm(&mut self) {
        self.has_bomb = true;
    }

    /// Lets the cell's bomb (if any) go off.
    ///
    /// The bomb vanishes and, when `flip` is set, the marker the cell holds (if any) changes sides. Returns whether
    /// anything about the cell has changed.
    pub(crate) fn detonate(&mut self, flip: bool) -> bool {
        if !self.has_bomb {
            return false;
        }

        self.has_bomb = false;

        if flip {
            self.marker = self.marker.map(Player::opponent);
        }

        true
    }

    pub(crate) fn attach_incoming(&mut self, id: FuseId) {
        self.incoming.insert(id);
    }

    pub(crate) fn attach_outgoing(&mut self, id: FuseId) {
        self.outgoing.insert(id);
    }

    pub(crate) fn detach_incoming(&mut self, id: FuseId) -> bool {
        self.incoming.remove(&id)
    }

    pub(crate) fn detach_outgoing(&mut self, id: FuseId) -> bool {
        self.outgoing.remove(&id)
    }
}

/// The `Display` implementation shows the marker and the bomb, the fuses are left to the board.
impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let marker = match self.marker {
            Some(player) => player.to_string(),
            None => "·".to_string(),
        };
        let bomb = if self.has_bomb { "*" } else { " " };

        write!(f, "{marker}{bomb}")
    }
}

#[cfg(test)]
mod test {
    use super::{Cell, FuseId, Player};

    #[test]
    fn new_creates_an_empty_cell_with_the_provided_position() {
        let cell = Cell::new((3, 1));

        assert_eq!(cell.position(), (3, 1));
        assert_eq!(cell.marker(), None);
        assert!(!cell.has_bomb());
        assert!(!cell.has_incoming_fuses());
        assert!(!cell.has_outgoing_fuses());
    }

    #[test]
    fn opponent_switches_sides() {
        assert_eq!(Player::X.opponent(), Player::O);
        assert_eq!(Player::O.opponent(), Player::X);
    }

    #[test]
    fn detonate_clears_the_bomb_and_flips_the_marker() {
        let mut cell = Cell::new((0, 0));
        cell.set_marker(Player::X);
        cell.arm();

        assert!(cell.detonate(true));
        assert!(!cell.has_bomb());
        assert_eq!(cell.marker(), Some(Player::O));
    }

    #[test]
    fn detonate_keeps_an_empty_cell_empty() {
        let mut cell = Cell::new((0, 0));
        cell.arm();

        assert!(cell.detonate(true));
        assert!(!cell.has_bomb());
        assert_eq!(cell.marker(), None);
    }

    #[test]
    fn detonate_without_a_bomb_changes_nothing() {
        let mut cell = Cell::new((0, 0));
        cell.set_marker(Player::O);

        assert!(!cell.detonate(true));
        assert_eq!(cell.marker(), Some(Player::O));
    }

    #[test]
    fn detonate_without_flipping_keeps_the_marker() {
        let mut cell = Cell::new((0, 0));
        cell.set_marker(Player::O);
        cell.arm();

        assert!(cell.detonate(false));
        assert!(!cell.has_bomb());
        assert_eq!(cell.marker(), Some(Player::O));
    }

    #[test]
    fn fuse_origin_validity() {
        let mut bomb = Cell::new((0, 0));
        bomb.arm();
        bomb.attach_outgoing(FuseId(0));
        assert!(bomb.is_valid_fuse_origin());

        let mut loose_end = Cell::new((0, 1));
        loose_end.attach_incoming(FuseId(0));
        assert!(loose_end.is_valid_fuse_origin());

        loose_end.attach_outgoing(FuseId(1));
        assert!(!loose_end.is_valid_fuse_origin());

        assert!(!Cell::new((2, 2)).is_valid_fuse_origin());
    }
}
