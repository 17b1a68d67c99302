//! The action state machine: what selecting a cell means under the currently selected action.

use crate::effect::GameEvent;
use crate::error::{GameError, InvalidMove, Result};
use crate::explosion;
use crate::geometry::Coord;
use crate::session::Session;
use crate::EXPLOSION_CHANCE;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The actions a player can choose from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    PlaceMarker,
    PlaceBomb,
    PlaceFuse,
}

/// The two halves of placing a fuse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuseStep {
    /// Waiting for the origin of the fuse.
    SelectFrom,
    /// The origin is chosen, waiting for the destination.
    SelectTo(Coord),
}

/// The currently selected action, including the progress of a fuse placement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionState {
    PlaceMarker,
    PlaceBomb,
    PlaceFuse(FuseStep),
}

impl ActionState {
    /// Switches to another action.
    ///
    /// Switching away from a fuse placement discards a pending origin. Choosing the fuse placement while it's already
    /// selected keeps it.
    pub fn select(self, kind: ActionKind) -> Self {
        match (self, kind) {
            (ActionState::PlaceFuse(step), ActionKind::PlaceFuse) => ActionState::PlaceFuse(step),
            (_, ActionKind::PlaceFuse) => ActionState::PlaceFuse(FuseStep::SelectFrom),
            (_, ActionKind::PlaceMarker) => ActionState::PlaceMarker,
            (_, ActionKind::PlaceBomb) => ActionState::PlaceBomb,
        }
    }

    pub fn kind(self) -> ActionKind {
        match self {
            ActionState::PlaceMarker => ActionKind::PlaceMarker,
            ActionState::PlaceBomb => ActionKind::PlaceBomb,
            ActionState::PlaceFuse(_) => ActionKind::PlaceFuse,
        }
    }

    /// The fuse placement progress, or [`None`] when another action is selected.
    pub fn fuse_step(self) -> Option<FuseStep> {
        match self {
            ActionState::PlaceFuse(step) => Some(step),
            _ => None,
        }
    }
}

/// What came out of selecting a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The selection broke a placement rule. Nothing has changed, the same player is still to move.
    Rejected(InvalidMove),
    /// The selection was applied. The events describe what happened, in order.
    Applied(Vec<GameEvent>),
}

impl ActionOutcome {
    pub fn has_update(&self) -> bool {
        matches!(self, ActionOutcome::Applied(_))
    }

    pub fn events(&self) -> &[GameEvent] {
        match self {
            ActionOutcome::Rejected(_) => &[],
            ActionOutcome::Applied(events) => events,
        }
    }
}

/// Separates placement rule violations (misclicks, answered with a rejection) from actual errors.
fn accept<T>(result: Result<T>) -> Result<core::result::Result<T, InvalidMove>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(GameError::InvalidMove(reason)) => Ok(Err(reason)),
        Err(err) => Err(err),
    }
}

fn reject(reason: InvalidMove) -> ActionOutcome {
    debug!(%reason, "selection rejected");
    ActionOutcome::Rejected(reason)
}

impl Session {
    /// Applies the selection of a cell under the currently selected action.
    ///
    /// The coin is only ever flipped for an accepted marker placement into an explosive cell.
    pub(crate) fn attempt(&mut self, coord: Coord, coin: &mut dyn RngCore) -> Result<ActionOutcome> {
        match self.action {
            ActionState::PlaceMarker => self.place_marker(coord, coin),
            ActionState::PlaceBomb => self.place_bomb(coord),
            ActionState::PlaceFuse(FuseStep::SelectFrom) => self.select_fuse_origin(coord),
            ActionState::PlaceFuse(FuseStep::SelectTo(from)) => self.complete_fuse(from, coord),
        }
    }

    pub(crate) fn select_action(&mut self, kind: ActionKind) {
        self.action = self.action.select(kind);
        debug!(action = ?self.action, "action selected");
    }

    fn place_marker(&mut self, coord: Coord, coin: &mut dyn RngCore) -> Result<ActionOutcome> {
        let player = self.current_player;

        if let Err(reason) = accept(self.board.place_marker(coord, player))? {
            return Ok(reject(reason));
        }

        let mut events = vec![GameEvent::MarkerPlaced { coord, player }];

        // the marker doesn't change the cell's explosiveness, only its bomb and fuses do
        let trigger = explosion::classify(self.board.try_cell(coord)?);

        if let Some(trigger) = trigger {
            if coin.gen_bool(EXPLOSION_CHANCE) {
                info!(?coord, ?trigger, "explosion");
                events.push(GameEvent::ExplosionTriggered { coord, trigger });
                events.extend(
                    explosion::detonate(&mut self.board, coord, trigger)
                        .into_iter()
                        .map(GameEvent::Effect),
                );
            } else {
                debug!(?coord, "fizzled");
                events.push(GameEvent::Fizzled { coord });
            }
        }

        self.conclude_turn(&mut events);

        Ok(ActionOutcome::Applied(events))
    }

    /// Placing a bomb never wins or explodes anything, the turn always passes.
    fn place_bomb(&mut self, coord: Coord) -> Result<ActionOutcome> {
        if let Err(reason) = accept(self.board.place_bomb(coord))? {
            return Ok(reject(reason));
        }

        let mut events = vec![GameEvent::BombPlaced { coord }];
        self.switch_player(&mut events);

        Ok(ActionOutcome::Applied(events))
    }

    fn select_fuse_origin(&mut self, coord: Coord) -> Result<ActionOutcome> {
        if !self.board.try_cell(coord)?.is_valid_fuse_origin() {
            return Ok(reject(InvalidMove::InvalidFuseOrigin(coord)));
        }

        self.action = ActionState::PlaceFuse(FuseStep::SelectTo(coord));

        Ok(ActionOutcome::Applied(vec![GameEvent::FuseOriginSelected {
            coord,
        }]))
    }

    /// Placing a fuse never wins anything, the turn always passes.
    fn complete_fuse(&mut self, from: Coord, to: Coord) -> Result<ActionOutcome> {
        let fuse = match accept(self.board.add_fuse(from, to))? {
            Ok(fuse) => fuse,
            Err(reason) => return Ok(reject(reason)),
        };

        self.action = ActionState::PlaceFuse(FuseStep::SelectFrom);

        let mut events = vec![GameEvent::FusePlaced(fuse)];
        self.switch_player(&mut events);

        Ok(ActionOutcome::Applied(events))
    }
}
