//! The explosion engine: which cells and fuses an explosion reaches, in which order, and what it does to them.

use crate::board::{cell::Cell, fuse::FuseId, Board};
use crate::effect::Effect;
use crate::geometry::Coord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, instrument};

/// How a marker placement can set off an explosion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// The cell's own bomb goes off. Only the cell itself is affected.
    Direct,
    /// The cell is the loose end of a fuse chain, everything feeding into it is ignited.
    Chain,
}

/// Decides whether placing a marker into the cell may explode, and how.
///
/// A cell feeding a fuse is never an origin of an explosion. Otherwise a bomb makes it explode directly, and an
/// incoming fuse makes it ignite the chain behind it.
pub fn classify(cell: &Cell) -> Option<Trigger> {
    if cell.has_outgoing_fuses() {
        None
    } else if cell.has_bomb() {
        Some(Trigger::Direct)
    } else if cell.has_incoming_fuses() {
        Some(Trigger::Chain)
    } else {
        None
    }
}

/// The cells and fuses reached at a single distance from the trigger.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChainLevel {
    pub cells: Vec<Coord>,
    pub fuses: Vec<FuseId>,
}

/// The leveled result of a chain traversal: level `n` holds everything exactly `n` reversed fuse hops away from the
/// trigger. Level 0 is the trigger alone and never holds fuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuseChain {
    levels: Vec<ChainLevel>,
}

impl FuseChain {
    /// A chain consisting of the trigger alone.
    pub fn single(trigger: Coord) -> Self {
        FuseChain {
            levels: vec![ChainLevel {
                cells: vec![trigger],
                fuses: Vec::new(),
            }],
        }
    }

    pub fn levels(&self) -> &[ChainLevel] {
        &self.levels
    }

    /// Returns the level at which the cell is reached, if it's reached at all.
    pub fn level_of(&self, coord: Coord) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.cells.contains(&coord))
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.levels.iter().flat_map(|level| level.cells.iter().copied())
    }

    pub fn fuses(&self) -> impl Iterator<Item = FuseId> + '_ {
        self.levels.iter().flat_map(|level| level.fuses.iter().copied())
    }

    fn level_mut(&mut self, level: usize) -> &mut ChainLevel {
        if self.levels.len() <= level {
            self.levels.resize_with(level + 1, ChainLevel::default);
        }

        &mut self.levels[level]
    }
}

/// Walks the fuses backwards (from a destination to its origins) starting at the trigger, breadth first.
///
/// Each fuse is visited once and scheduled one level further than the cell it feeds into. Each cell is visited once,
/// at its shortest reversed-edge distance from the trigger. Incoming fuses are examined in the ascending id order, so
/// the result is fully deterministic.
#[instrument(level = "debug", skip(board))]
pub fn find_fuse_chain(board: &Board, trigger: Coord) -> FuseChain {
    let mut chain = FuseChain::single(trigger);
    let mut visited_cells = BTreeSet::from([trigger]);
    let mut visited_fuses = BTreeSet::new();
    let mut to_visit = VecDeque::from([(trigger, 0usize)]);

    while let Some((coord, level)) = to_visit.pop_front() {
        for fuse in board.incoming_fuses(coord) {
            if !visited_fuses.insert(fuse.id) {
                continue;
            }

            chain.level_mut(level + 1).fuses.push(fuse.id);

            if visited_cells.insert(fuse.from) {
                chain.level_mut(level + 1).cells.push(fuse.from);
                to_visit.push_back((fuse.from, level + 1));
            }
        }
    }

    debug!(
        levels = chain.levels.len(),
        cells = visited_cells.len(),
        fuses = visited_fuses.len(),
        "fuse chain traversed"
    );

    chain
}

/// Sets off an explosion at the trigger and applies it to the board.
///
/// The reach of the explosion is computed on the board as it is before anything burns. The state changes are then
/// applied level by level: the fuses scheduled for a level are removed (from the table and both endpoints), after which
/// each cell of the level is hit. A hit cell with a bomb loses it and its marker (if any) is flipped; a cell without a
/// bomb stays as it is. The trigger's own marker, placed right before the explosion, is never flipped.
///
/// Returns the effects in the order they were applied.
///
/// # Panics
///
/// Panics if a fuse reached by the traversal has disappeared from the board before it could be removed, which would
/// mean the board's fuse bookkeeping is corrupted.
pub fn detonate(board: &mut Board, trigger: Coord, kind: Trigger) -> Vec<Effect> {
    let chain = match kind {
        Trigger::Direct => FuseChain::single(trigger),
        Trigger::Chain => find_fuse_chain(board, trigger),
    };

    let mut effects = Vec::new();

    for (level, ChainLevel { cells, fuses }) in chain.levels().iter().enumerate() {
        let level = level as u8;

        for &id in fuses {
            let fuse = board
                .remove_fuse(id)
                .unwrap_or_else(|err| panic!("fuse chain reached a detached fuse: {err}"));
            effects.push(Effect::fuse(fuse, level));
        }

        for &coord in cells {
            let defused = board
                .detonate_cell(coord, coord != trigger)
                .unwrap_or_else(|err| panic!("fuse chain reached a missing cell: {err}"));
            if defused {
                debug!(?coord, level, "bomb went off");
            }
            effects.push(Effect::cell(coord, level));
        }
    }

    effects
}
