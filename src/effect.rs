//! What the engine reports back to the presentation layer.
//!
//! Every command settles the whole game state before returning. The effects it emits only carry a level, which the
//! presentation turns into a delay (`level * LEVEL_DELAY`) when animating them.

use crate::board::{cell::Player, fuse::Fuse};
use crate::explosion::Trigger;
use crate::geometry::Coord;
use crate::victory::WinLine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The delay between two consecutive levels of an explosion cascade.
pub const LEVEL_DELAY: Duration = Duration::from_millis(100);

/// How long a single cell's explosion animation lasts.
pub const EXPLOSION_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// The cell was caught by the explosion. Whether its state changed depends on its bomb.
    CellAffected(Coord),
    /// The fuse burnt down and is gone from the board.
    FuseRemoved(Fuse),
}

/// A single leveled record of an explosion cascade.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    /// The distance (in reversed fuse hops) from the triggering cell.
    pub level: u8,
}

impl Effect {
    pub fn cell(coord: Coord, level: u8) -> Self {
        Effect {
            kind: EffectKind::CellAffected(coord),
            level,
        }
    }

    pub fn fuse(fuse: Fuse, level: u8) -> Self {
        Effect {
            kind: EffectKind::FuseRemoved(fuse),
            level,
        }
    }

    /// When the effect should start playing, relative to the start of the explosion.
    pub fn delay(&self, per_level: Duration) -> Duration {
        per_level * self.level as u32
    }
}

/// Everything a command can report, in the order it happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    MarkerPlaced {
        coord: Coord,
        player: Player,
    },
    BombPlaced {
        coord: Coord,
    },
    /// The first half of a fuse placement: the origin is remembered and the turn does not change yet.
    FuseOriginSelected {
        coord: Coord,
    },
    FusePlaced(Fuse),
    /// The coin went the explosive way. The cascade's effects follow as [`GameEvent::Effect`]s.
    ExplosionTriggered {
        coord: Coord,
        trigger: Trigger,
    },
    /// The placement could have exploded but the coin decided otherwise.
    Fizzled {
        coord: Coord,
    },
    Effect(Effect),
    TurnChanged(Player),
    GameWon {
        player: Player,
        line: WinLine,
    },
    GameDraw,
}
