//! Tile Spawning
//!
//! Places new tiles on random empty slots once a turn has settled.
//! All randomness comes from the board's deterministic RNG.

use serde::{Serialize, Deserialize};

use crate::game::events::{TileEvent, TurnPhase};
use crate::game::state::{BoardState, PlacementError, TileId};

/// Configuration for tile spawning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Values a new tile can take, chosen uniformly
    pub values: Vec<u64>,
    /// Tiles spawned every turn (while slots remain)
    pub min_per_turn: u32,
    /// Upper bound on tiles spawned in one turn
    pub max_per_turn: u32,
    /// Chance, in percent, of each spawn beyond `min_per_turn`
    pub extra_chance_percent: u8,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            values: vec![3, 9],
            min_per_turn: 1,
            max_per_turn: 2,
            extra_chance_percent: 50,
        }
    }
}

/// Result of a spawn phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// Tiles placed this phase (possibly fewer than requested if the board
    /// filled up)
    Spawned(Vec<TileId>),
    /// No empty slot was available; nothing was placed
    BoardFull,
}

impl SpawnOutcome {
    /// Tiles placed, empty for `BoardFull`.
    pub fn tiles(&self) -> &[TileId] {
        match self {
            SpawnOutcome::Spawned(ids) => ids,
            SpawnOutcome::BoardFull => &[],
        }
    }

    /// True if the phase found no room.
    pub fn is_board_full(&self) -> bool {
        matches!(self, SpawnOutcome::BoardFull)
    }
}

/// Spawn between `min_count` and `max_count` tiles.
///
/// The first `min_count` spawns always happen while there is room; each
/// further one happens with `config.extra_chance_percent`.
pub fn spawn_tiles(
    state: &mut BoardState,
    config: &SpawnConfig,
    min_count: u32,
    max_count: u32,
) -> Result<SpawnOutcome, PlacementError> {
    let mut empty = state.empty_slots();
    if empty.is_empty() {
        return Ok(SpawnOutcome::BoardFull);
    }

    let mut spawned = Vec::new();
    while (spawned.len() as u32) < max_count && !empty.is_empty() {
        if spawned.len() as u32 >= min_count && !state.rng.next_chance(config.extra_chance_percent) {
            break;
        }

        let slot = state.rng.next_int(empty.len() as u32) as usize;
        let coord = empty.swap_remove(slot);
        let Some(&value) = state.rng.choose(&config.values) else {
            break;
        };

        let id = state.insert_tile(coord, value)?;
        state.push_event(TileEvent::created(state.turn, TurnPhase::Spawn, id, coord, value));
        spawned.push(id);
    }

    if !spawned.is_empty() {
        state.refresh_neighbors();
    }
    Ok(SpawnOutcome::Spawned(spawned))
}
