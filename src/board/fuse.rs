use crate::geometry::Coord;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The unique, never reused identifier of a fuse within one game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FuseId(pub u32);

impl Display for FuseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "fuse-{}", self.0)
    }
}

/// A directed connection between two orthogonally adjacent cells.
///
/// A fuse feeds from its origin (`from`) into its destination (`to`): exploding the destination ignites everything
/// feeding into it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fuse {
    pub id: FuseId,
    pub from: Coord,
    pub to: Coord,
}
