//! The explosion playback.
//!
//! By the time a playback starts the game has already settled everything. The playback only decides which of the
//! effects are visible at a given moment: a cell explodes for [`EXPLOSION_DURATION`] starting at its level's delay, and
//! a burnt fuse keeps being drawn until its level's delay is reached.

use fuse_rs::{Coord, Effect, EffectKind, Fuse, GameEvent, EXPLOSION_DURATION};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Playback {
    /// The moment the explosion went off.
    start_time: Instant,
    effects: Vec<Effect>,
    /// The delay between two consecutive levels.
    level_delay: Duration,
}

impl Playback {
    /// Starts playing back the effects among the events. Returns [`None`] if there's nothing to play.
    pub fn start(events: &[GameEvent], level_delay: Duration) -> Option<Self> {
        let effects: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Effect(effect) => Some(*effect),
                _ => None,
            })
            .collect();

        if effects.is_empty() {
            return None;
        }

        Some(Playback {
            start_time: Instant::now(),
            effects,
            level_delay,
        })
    }

    pub fn get_elapsed_time(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished_at(self.get_elapsed_time())
    }

    pub fn exploding_cells(&self) -> BTreeSet<Coord> {
        self.exploding_cells_at(self.get_elapsed_time())
    }

    pub fn burning_fuses(&self) -> Vec<Fuse> {
        self.burning_fuses_at(self.get_elapsed_time())
    }

    /// The whole playback lasts until the explosion of the last level is over.
    fn is_finished_at(&self, elapsed: Duration) -> bool {
        let last_delay = self
            .effects
            .iter()
            .map(|effect| effect.delay(self.level_delay))
            .max()
            .unwrap_or_default();

        elapsed >= last_delay + EXPLOSION_DURATION
    }

    fn exploding_cells_at(&self, elapsed: Duration) -> BTreeSet<Coord> {
        self.effects
            .iter()
            .filter_map(|effect| match effect.kind {
                EffectKind::CellAffected(coord) => {
                    let delay = effect.delay(self.level_delay);
                    (delay <= elapsed && elapsed < delay + EXPLOSION_DURATION).then_some(coord)
                }
                EffectKind::FuseRemoved(_) => None,
            })
            .collect()
    }

    fn burning_fuses_at(&self, elapsed: Duration) -> Vec<Fuse> {
        self.effects
            .iter()
            .filter_map(|effect| match effect.kind {
                EffectKind::FuseRemoved(fuse) if elapsed < effect.delay(self.level_delay) => Some(fuse),
                _ => None,
            })
            .collect()
    }
}
