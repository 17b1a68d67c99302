use crate::board::fuse::FuseId;
use crate::geometry::Coord;
use thiserror::Error;

/// Everything that can go wrong while driving a game.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The requested coordinates lie outside the board.
    #[error("coordinates {0:?} are outside the board")]
    OutOfBounds(Coord),
    /// The command violated a placement precondition. The state machine turns these into a silent rejection, so
    /// callers of the session controller never see this variant as an `Err`.
    #[error("invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),
    /// A fuse id was looked up that no longer exists on the board. Only an engine bug can produce this.
    #[error("fuse {0} is not attached to the board")]
    FuseNotFound(FuseId),
    /// The game has already ended, no new moves are accepted.
    #[error("game already ended, no new moves are accepted")]
    AlreadyEnded,
}

/// The placement precondition a command failed to meet.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidMove {
    #[error("cell {0:?} already holds a marker")]
    CellOccupied(Coord),
    #[error("cell {0:?} already holds a bomb")]
    BombAlreadyPlaced(Coord),
    #[error("a fuse cannot start and end at {0:?}")]
    SelfLoop(Coord),
    #[error("{0:?} and {1:?} are not orthogonally adjacent")]
    NotAdjacent(Coord, Coord),
    #[error("a fuse from {0:?} to {1:?} already exists")]
    DuplicateFuse(Coord, Coord),
    /// A fuse may only start at a bomb or at the loose end of an existing fuse chain.
    #[error("cell {0:?} cannot be the origin of a fuse")]
    InvalidFuseOrigin(Coord),
}

pub type Result<T> = core::result::Result<T, GameError>;
