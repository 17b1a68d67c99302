//! A two-player tic-tac-toe variant on a 5x5 board, spiced up with bombs and the fuses between them.
//!
//! Each turn a player either places a marker, places a bomb, or lays a fuse between two adjacent cells. Placing a
//! marker into a bomb (or into the loose end of a fuse chain) may blow it up, flipping the markers of every bombed cell
//! the explosion reaches.

pub mod action;
pub mod board;
pub mod effect;
pub mod error;
pub mod explosion;
pub mod geometry;
pub mod session;
pub mod snapshot;
pub mod victory;

pub use action::{ActionKind, ActionOutcome, ActionState, FuseStep};
pub use board::{
    cell::{Cell, Player},
    fuse::{Fuse, FuseId},
    Board,
};
pub use effect::{Effect, EffectKind, GameEvent, EXPLOSION_DURATION, LEVEL_DELAY};
pub use error::{GameError, InvalidMove, Result};
pub use explosion::Trigger;
pub use geometry::Coord;
pub use session::{GameStatus, Session};
pub use snapshot::{CellSnapshot, Highlight, Snapshot};
pub use victory::WinLine;

use rand::{thread_rng, RngCore};
use std::fmt::{Debug, Formatter};
use tracing::{info, instrument};

/// The amount of rows and columns of the board.
pub const BOARD_SIZE: u8 = 5;

/// The chance of an explosive marker placement to actually explode.
pub const EXPLOSION_CHANCE: f64 = 0.5;

/// Describes all the commands a front end can send to a game.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameAction {
    /// Selects the cell at the given position under the currently selected action.
    Cell(Coord),
    /// Switches the currently selected action.
    Select(ActionKind),
    /// Throws the current game away and starts a new one.
    Reset,
}

/// The game itself: the current session plus the source of randomness deciding whether explosive placements explode.
pub struct FuseTacToe {
    session: Session,
    rng: Box<dyn RngCore>,
}

impl FuseTacToe {
    /// Creates a new game flipping its coins with the thread-local generator.
    pub fn new() -> Self {
        FuseTacToe::with_rng(thread_rng())
    }

    /// Creates a new game flipping its coins with the provided generator.
    ///
    /// Useful for reproducible games (a seeded generator) and for forcing the explosions in tests (a mock one).
    pub fn with_rng(rng: impl RngCore + 'static) -> Self {
        FuseTacToe {
            session: Session::new(),
            rng: Box::new(rng),
        }
    }

    /// Selects the cell at the given position under the currently selected action.
    ///
    /// Fails with [`GameError::OutOfBounds`] for positions outside the board and with [`GameError::AlreadyEnded`] once
    /// the game is over. A selection breaking the placement rules is not an error: it comes back as
    /// [`ActionOutcome::Rejected`] and leaves the game untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn attempt_action(&mut self, coord: Coord) -> Result<ActionOutcome> {
        if !geometry::in_bounds(coord) {
            return Err(GameError::OutOfBounds(coord));
        }

        if self.session.status().is_over() {
            return Err(GameError::AlreadyEnded);
        }

        self.session.attempt(coord, self.rng.as_mut())
    }

    /// Switches the currently selected action. Fails with [`GameError::AlreadyEnded`] once the game is over.
    #[instrument(level = "debug", skip(self))]
    pub fn select_action(&mut self, kind: ActionKind) -> Result<()> {
        if self.session.status().is_over() {
            return Err(GameError::AlreadyEnded);
        }

        self.session.select_action(kind);
        Ok(())
    }

    /// Starts over with a brand new session. The random generator is kept.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) {
        self.session = Session::new();
        info!("new game");
    }

    /// Performs the requested action and returns what came out of it.
    ///
    /// Switching the action and resetting the game always succeed with no events.
    pub fn take_action(&mut self, action: GameAction) -> Result<ActionOutcome> {
        match action {
            GameAction::Cell(coord) => self.attempt_action(coord),
            GameAction::Select(kind) => {
                self.select_action(kind)?;
                Ok(ActionOutcome::Applied(Vec::new()))
            }
            GameAction::Reset => {
                self.reset();
                Ok(ActionOutcome::Applied(Vec::new()))
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.session)
    }

    pub fn status(&self) -> GameStatus {
        self.session.status()
    }

    pub fn current_player(&self) -> Player {
        self.session.current_player()
    }

    pub fn action(&self) -> ActionState {
        self.session.action()
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl Default for FuseTacToe {
    fn default() -> Self {
        FuseTacToe::new()
    }
}

impl Debug for FuseTacToe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuseTacToe")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
