//! Tile Events
//!
//! The ordered change list a presentation layer consumes to animate a turn
//! without reading the grid directly.

use serde::{Serialize, Deserialize};
use crate::core::coord::Coord;
use crate::game::state::TileId;

/// Phase of a turn that produced an event.
///
/// Declaration order is processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TurnPhase {
    /// Board construction and direct placement
    Setup = 0,
    /// Tiles sliding towards the target edge
    Slide = 1,
    /// Equal neighbours combining, plus gap closing
    Merge = 2,
    /// New tiles appearing after the board settles
    Spawn = 3,
}

/// A single tile state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileChange {
    /// A tile appeared
    Created {
        /// New tile
        id: TileId,
        /// Slot it occupies
        coord: Coord,
        /// Its value
        value: u64,
    },

    /// A tile moved between slots
    Moved {
        /// Tile that moved
        id: TileId,
        /// Slot it left
        from: Coord,
        /// Slot it stopped in
        to: Coord,
    },

    /// `survivor` absorbed `absorbed` and now holds `value`
    Merged {
        /// Tile removed by the merge
        absorbed: TileId,
        /// Tile that stays
        survivor: TileId,
        /// Survivor's new value
        value: u64,
    },

    /// A tile left the board
    Removed {
        /// Tile that left
        id: TileId,
    },
}

/// A tile change tagged with its turn and phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEvent {
    /// Turn the change belongs to (0 = setup before the first move)
    pub turn: u32,

    /// Phase within the turn
    pub phase: TurnPhase,

    /// What changed
    pub change: TileChange,
}

impl TileEvent {
    /// Create a new event.
    pub fn new(turn: u32, phase: TurnPhase, change: TileChange) -> Self {
        Self { turn, phase, change }
    }

    /// Create tile created event.
    pub fn created(turn: u32, phase: TurnPhase, id: TileId, coord: Coord, value: u64) -> Self {
        Self::new(turn, phase, TileChange::Created { id, coord, value })
    }

    /// Create tile moved event.
    pub fn moved(turn: u32, phase: TurnPhase, id: TileId, from: Coord, to: Coord) -> Self {
        Self::new(turn, phase, TileChange::Moved { id, from, to })
    }

    /// Create tiles merged event.
    pub fn merged(turn: u32, absorbed: TileId, survivor: TileId, value: u64) -> Self {
        Self::new(
            turn,
            TurnPhase::Merge,
            TileChange::Merged { absorbed, survivor, value },
        )
    }

    /// Create tile removed event.
    pub fn removed(turn: u32, phase: TurnPhase, id: TileId) -> Self {
        Self::new(turn, phase, TileChange::Removed { id })
    }

    /// The tile this event is about (the survivor, for merges).
    pub fn tile_id(&self) -> TileId {
        match self.change {
            TileChange::Created { id, .. } => id,
            TileChange::Moved { id, .. } => id,
            TileChange::Merged { survivor, .. } => survivor,
            TileChange::Removed { id } => id,
        }
    }
}

/// Events of one phase, in emission order.
pub fn events_in_phase(events: &[TileEvent], phase: TurnPhase) -> impl Iterator<Item = &TileEvent> {
    events.iter().filter(move |e| e.phase == phase)
}
