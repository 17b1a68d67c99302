//! A read-only picture of a session, everything a front end needs to draw it.

use crate::action::{ActionKind, ActionState, FuseStep};
use crate::board::{
    cell::{Cell, Player},
    fuse::{Fuse, FuseId},
};
use crate::geometry::{neighbors, Coord};
use crate::session::{GameStatus, Session};
use serde::{Deserialize, Serialize};

/// How a cell should stand out given the currently selected action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    None,
    /// A marker can be placed here.
    Place,
    /// A bomb can be placed here.
    Bomb,
    /// A fuse can start here.
    FuseFrom,
    /// The origin of the fuse being placed.
    FuseSelectedFrom,
    /// The fuse being placed can end here.
    FuseTo,
    /// The cell is a part of the winning line.
    Winning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub coord: Coord,
    pub marker: Option<Player>,
    pub has_bomb: bool,
    pub incoming: Vec<FuseId>,
    pub outgoing: Vec<FuseId>,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_player: Player,
    pub action: ActionKind,
    /// The fuse placement progress, [`None`] unless placing a fuse.
    pub fuse_step: Option<FuseStep>,
    pub status: GameStatus,
    /// All the cells, row by row.
    pub cells: Vec<CellSnapshot>,
    pub fuses: Vec<Fuse>,
}

impl Snapshot {
    pub fn of(session: &Session) -> Self {
        let board = session.board();

        let cells = board
            .cells()
            .map(|cell| CellSnapshot {
                coord: cell.position(),
                marker: cell.marker(),
                has_bomb: cell.has_bomb(),
                incoming: cell.incoming().iter().copied().collect(),
                outgoing: cell.outgoing().iter().copied().collect(),
                highlight: highlight(session, cell),
            })
            .collect();

        Snapshot {
            current_player: session.current_player(),
            action: session.action().kind(),
            fuse_step: session.action().fuse_step(),
            status: session.status(),
            cells,
            fuses: board.fuses().copied().collect(),
        }
    }

    pub fn cell(&self, coord: Coord) -> Option<&CellSnapshot> {
        self.cells.iter().find(|cell| cell.coord == coord)
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn status_line(&self) -> String {
        match self.status {
            GameStatus::InProgress => format!("Player {}'s Turn", self.current_player),
            GameStatus::Won { player, .. } => format!("Player {player} Wins!"),
            GameStatus::Draw => String::from("It's a Draw!"),
        }
    }
}

fn highlight(session: &Session, cell: &Cell) -> Highlight {
    let coord = cell.position();

    match session.status() {
        GameStatus::Won { line, .. } if line.contains(coord) => return Highlight::Winning,
        GameStatus::Won { .. } | GameStatus::Draw => return Highlight::None,
        GameStatus::InProgress => {}
    }

    match session.action() {
        ActionState::PlaceMarker if !cell.is_occupied() => Highlight::Place,
        ActionState::PlaceBomb if !cell.has_bomb() => Highlight::Bomb,
        ActionState::PlaceFuse(FuseStep::SelectFrom) if cell.is_valid_fuse_origin() => Highlight::FuseFrom,
        ActionState::PlaceFuse(FuseStep::SelectTo(from)) if from == coord => Highlight::FuseSelectedFrom,
        ActionState::PlaceFuse(FuseStep::SelectTo(from))
            if neighbors(from).contains(&coord) && !session.board().has_fuse(from, coord) =>
        {
            Highlight::FuseTo
        }
        _ => Highlight::None,
    }
}

#[cfg(test)]
mod test {
    use super::{Highlight, Snapshot};
    use crate::action::{ActionKind, ActionState, FuseStep};
    use crate::board::cell::Player;
    use crate::session::{GameStatus, Session};
    use crate::victory::WinLine;

    fn highlights(snapshot: &Snapshot) -> Vec<((u8, u8), Highlight)> {
        snapshot
            .cells
            .iter()
            .filter(|cell| cell.highlight != Highlight::None)
            .map(|cell| (cell.coord, cell.highlight))
            .collect()
    }

    #[test]
    fn every_empty_cell_can_take_a_marker() {
        let mut session = Session::new();
        session.board.place_marker((0, 0), Player::X).unwrap();

        let snapshot = Snapshot::of(&session);

        assert_eq!(snapshot.cells.len(), 25);
        assert_eq!(snapshot.cell((0, 0)).unwrap().highlight, Highlight::None);
        assert_eq!(snapshot.cell((0, 1)).unwrap().highlight, Highlight::Place);
        assert_eq!(highlights(&snapshot).len(), 24);
    }

    #[test]
    fn bombs_go_where_there_are_none() {
        let mut session = Session::new();
        session.board.place_bomb((4, 4)).unwrap();
        session.select_action(ActionKind::PlaceBomb);

        let snapshot = Snapshot::of(&session);

        assert_eq!(snapshot.cell((4, 4)).unwrap().highlight, Highlight::None);
        assert_eq!(snapshot.cell((3, 4)).unwrap().highlight, Highlight::Bomb);
    }

    #[test]
    fn fuse_origins_and_destinations() {
        let mut session = Session::new();
        session.board.place_bomb((2, 2)).unwrap();
        session.board.add_fuse((2, 2), (2, 3)).unwrap();
        session.select_action(ActionKind::PlaceFuse);

        // the bomb and the loose end of the fuse
        assert_eq!(
            highlights(&Snapshot::of(&session)),
            vec![((2, 2), Highlight::FuseFrom), ((2, 3), Highlight::FuseFrom)]
        );

        session.action = ActionState::PlaceFuse(FuseStep::SelectTo((2, 2)));
        let snapshot = Snapshot::of(&session);

        assert_eq!(snapshot.fuse_step, Some(FuseStep::SelectTo((2, 2))));
        assert_eq!(
            highlights(&snapshot),
            vec![
                ((1, 2), Highlight::FuseTo),
                ((2, 1), Highlight::FuseTo),
                ((2, 2), Highlight::FuseSelectedFrom),
                ((3, 2), Highlight::FuseTo),
            ]
        );
    }

    #[test]
    fn a_won_game_only_highlights_the_winning_line() {
        let mut session = Session::new();
        session.status = GameStatus::Won {
            player: Player::O,
            line: WinLine::Column(3),
        };

        let snapshot = Snapshot::of(&session);

        assert_eq!(
            highlights(&snapshot),
            (0..5u8).map(|r| ((r, 3), Highlight::Winning)).collect::<Vec<_>>()
        );
        assert!(snapshot.is_game_over());
        assert_eq!(snapshot.status_line(), "Player O Wins!");
    }

    #[test]
    fn status_lines() {
        let mut session = Session::new();
        assert_eq!(Snapshot::of(&session).status_line(), "Player X's Turn");

        session.status = GameStatus::Draw;
        let snapshot = Snapshot::of(&session);
        assert_eq!(snapshot.status_line(), "It's a Draw!");
        assert!(highlights(&snapshot).is_empty());
    }

    #[test]
    fn fuses_are_listed_on_both_ends() {
        let mut session = Session::new();
        session.board.place_bomb((0, 0)).unwrap();
        let fuse = session.board.add_fuse((0, 0), (1, 0)).unwrap();

        let snapshot = Snapshot::of(&session);

        assert_eq!(snapshot.fuses, vec![fuse]);
        assert_eq!(snapshot.cell((0, 0)).unwrap().outgoing, vec![fuse.id]);
        assert_eq!(snapshot.cell((1, 0)).unwrap().incoming, vec![fuse.id]);
        assert!(snapshot.cell((0, 0)).unwrap().has_bomb);
    }
}
