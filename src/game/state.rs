//! Board State
//!
//! The grid of slots, the tile arena and the derived adjacency cache.
//! The grid is the single source of truth for occupancy; every tile's
//! `neighbors` is recomputed wholesale from it by [`BoardState::refresh_neighbors`].

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::coord::{Coord, Direction};
use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::events::TileEvent;

// =============================================================================
// TILE ID
// =============================================================================

/// Unique tile identifier (monotonic counter per board).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Check that `value` is a legal tile value: a power of 3, at least 3.
pub fn is_tile_value(value: u64) -> bool {
    let mut v = value;
    if v < 3 {
        return false;
    }
    while v % 3 == 0 {
        v /= 3;
    }
    v == 1
}

// =============================================================================
// ERRORS
// =============================================================================

/// Board state a turn cannot continue from. Always a logic bug or an
/// out-of-range board; the turn is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Slot holds a tile whose recorded coordinate is elsewhere.
    #[error("slot {slot} holds {id} which records {recorded}")]
    SlotMismatch {
        /// Slot inspected
        slot: Coord,
        /// Tile the slot names
        id: TileId,
        /// Coordinate the tile records
        recorded: Coord,
    },

    /// Slot refers to a tile that is not in the arena.
    #[error("slot {slot} refers to unknown tile {id}")]
    DanglingSlot {
        /// Slot inspected
        slot: Coord,
        /// Missing tile
        id: TileId,
    },

    /// Tile is not referenced by the slot at its coordinate.
    #[error("{id} records {coord} but that slot does not hold it")]
    OrphanTile {
        /// Tile inspected
        id: TileId,
        /// Coordinate it records
        coord: Coord,
    },

    /// Tile lookup by id failed.
    #[error("unknown tile {0}")]
    UnknownTile(TileId),

    /// Coordinate is outside the board.
    #[error("coordinate {0} is off the board")]
    OutOfBounds(Coord),

    /// A move targeted an occupied slot.
    #[error("slot {0} is already occupied")]
    SlotOccupied(Coord),

    /// Cached neighbour differs from what the grid says.
    #[error("{id} caches {cached:?} as {direction} neighbour, grid says {actual:?}")]
    StaleNeighbor {
        /// Tile inspected
        id: TileId,
        /// Side of the cache entry
        direction: Direction,
        /// Cached neighbour
        cached: Option<TileId>,
        /// Neighbour read from the grid
        actual: Option<TileId>,
    },

    /// Neighbour link is not mirrored by the opposite link.
    #[error("{id} has {neighbor} to the {direction} but not the reverse")]
    AsymmetricNeighbor {
        /// Tile inspected
        id: TileId,
        /// Neighbour it links to
        neighbor: TileId,
        /// Side of the link
        direction: Direction,
    },

    /// Merge partners are not next to each other.
    #[error("{front} at {front_at} and {back} at {back_at} are not adjacent")]
    NotAdjacent {
        /// Surviving tile
        front: TileId,
        /// Its coordinate
        front_at: Coord,
        /// Tile to absorb
        back: TileId,
        /// Its coordinate
        back_at: Coord,
    },

    /// Merge partners hold different values.
    #[error("cannot merge {front} ({front_value}) with {back} ({back_value})")]
    ValueMismatch {
        /// Surviving tile
        front: TileId,
        /// Its value
        front_value: u64,
        /// Tile to absorb
        back: TileId,
        /// Its value
        back_value: u64,
    },

    /// Tripling the value does not fit in a `u64`.
    #[error("{id} cannot triple {value} without overflow")]
    ValueOverflow {
        /// Surviving tile
        id: TileId,
        /// Value before the merge
        value: u64,
    },

    /// Score does not fit in a `u64`.
    #[error("score {score} cannot grow by {delta} without overflow")]
    ScoreOverflow {
        /// Score before the addition
        score: u64,
        /// Amount that was to be added
        delta: u64,
    },
}

/// Direct tile placement errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Coordinate is outside the board.
    #[error("coordinate {0} is off the board")]
    OutOfBounds(Coord),

    /// Slot already holds a tile.
    #[error("slot {0} is already occupied")]
    Occupied(Coord),

    /// Value is not a power of 3.
    #[error("{0} is not a tile value (powers of 3 from 3)")]
    InvalidValue(u64),
}

// =============================================================================
// TILE
// =============================================================================

/// Nearest occupied slot in each direction. A lookup cache, not ownership.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    /// Towards row 0
    pub up: Option<TileId>,
    /// Towards the last row
    pub down: Option<TileId>,
    /// Towards column 0
    pub left: Option<TileId>,
    /// Towards the last column
    pub right: Option<TileId>,
}

impl Neighbors {
    /// Neighbour in `direction`.
    #[inline]
    pub fn get(&self, direction: Direction) -> Option<TileId> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    fn set(&mut self, direction: Direction, id: Option<TileId>) {
        match direction {
            Direction::Up => self.up = id,
            Direction::Down => self.down = id,
            Direction::Left => self.left = id,
            Direction::Right => self.right = id,
        }
    }
}

/// One numbered piece on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Unique tile ID
    pub id: TileId,

    /// Current value (3, 9, 27, ...)
    pub value: u64,

    /// Slot this tile occupies
    pub coord: Coord,

    /// Adjacency cache, valid after the last `refresh_neighbors`
    pub neighbors: Neighbors,
}

impl Tile {
    fn new(id: TileId, coord: Coord, value: u64) -> Self {
        Self {
            id,
            value,
            coord,
            neighbors: Neighbors::default(),
        }
    }
}

// =============================================================================
// BOARD STATE
// =============================================================================

/// Complete state of one board.
///
/// Tiles live in a BTreeMap so iteration (and therefore hashing and event
/// order) is deterministic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardState {
    size: u8,

    /// Row-major slots, each empty or naming one tile
    slots: Vec<Option<TileId>>,

    tiles: BTreeMap<TileId, Tile>,

    next_tile_id: u32,

    /// Cumulative score
    pub score: u64,

    /// Number of completed board-changing turns
    pub turn: u32,

    /// RNG seed (for verification)
    pub rng_seed: u64,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// Events generated since the last `take_events`
    #[serde(skip)]
    pending_events: Vec<TileEvent>,
}

impl BoardState {
    /// Create an empty `size` × `size` board.
    pub fn new(size: u8, rng_seed: u64) -> Self {
        let slot_count = size as usize * size as usize;
        Self {
            size,
            slots: vec![None; slot_count],
            tiles: BTreeMap::new(),
            next_tile_id: 0,
            score: 0,
            turn: 0,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            pending_events: Vec::new(),
        }
    }

    /// Board edge length.
    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Total number of slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Get a tile by ID.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// All tiles in ID order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of tiles on the board.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// ID of the tile occupying `coord`, if any.
    #[inline]
    pub fn id_at(&self, coord: Coord) -> Option<TileId> {
        if !coord.in_bounds(self.size) {
            return None;
        }
        self.slots[coord.index(self.size)]
    }

    /// Tile occupying `coord`, if any.
    pub fn tile_at(&self, coord: Coord) -> Option<&Tile> {
        self.id_at(coord).and_then(|id| self.tiles.get(&id))
    }

    /// Value at `coord`, if occupied.
    pub fn value_at(&self, coord: Coord) -> Option<u64> {
        self.tile_at(coord).map(|t| t.value)
    }

    /// True if `coord` is on the board and holds no tile.
    #[inline]
    pub fn is_vacant(&self, coord: Coord) -> bool {
        coord.in_bounds(self.size) && self.slots[coord.index(self.size)].is_none()
    }

    /// All empty slots in row-major order.
    pub fn empty_slots(&self) -> Vec<Coord> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| Coord::from_index(i, self.size))
            .collect()
    }

    /// Highest tile value on the board (0 when empty).
    pub fn max_value(&self) -> u64 {
        self.tiles.values().map(|t| t.value).max().unwrap_or(0)
    }

    /// Place a new tile. Does not emit an event; callers tag it with a phase.
    pub fn insert_tile(&mut self, coord: Coord, value: u64) -> Result<TileId, PlacementError> {
        if !coord.in_bounds(self.size) {
            return Err(PlacementError::OutOfBounds(coord));
        }
        if !is_tile_value(value) {
            return Err(PlacementError::InvalidValue(value));
        }
        let idx = coord.index(self.size);
        if self.slots[idx].is_some() {
            return Err(PlacementError::Occupied(coord));
        }

        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        self.slots[idx] = Some(id);
        self.tiles.insert(id, Tile::new(id, coord, value));
        Ok(id)
    }

    /// Move a tile to an empty slot, keeping grid and coordinate in step.
    pub fn relocate(&mut self, id: TileId, to: Coord) -> Result<(), InvariantViolation> {
        if !to.in_bounds(self.size) {
            return Err(InvariantViolation::OutOfBounds(to));
        }
        let from = self.checked_coord(id)?;
        let to_idx = to.index(self.size);
        if self.slots[to_idx].is_some() {
            return Err(InvariantViolation::SlotOccupied(to));
        }

        self.slots[from.index(self.size)] = None;
        self.slots[to_idx] = Some(id);
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.coord = to;
        }
        Ok(())
    }

    /// Take a tile off the board.
    pub fn remove_tile(&mut self, id: TileId) -> Result<Tile, InvariantViolation> {
        let coord = self.checked_coord(id)?;
        self.slots[coord.index(self.size)] = None;
        self.tiles.remove(&id).ok_or(InvariantViolation::UnknownTile(id))
    }

    /// Set a tile's value.
    pub fn set_value(&mut self, id: TileId, value: u64) -> Result<(), InvariantViolation> {
        let tile = self.tiles.get_mut(&id).ok_or(InvariantViolation::UnknownTile(id))?;
        tile.value = value;
        Ok(())
    }

    /// Coordinate of `id`, verified against the grid.
    pub fn checked_coord(&self, id: TileId) -> Result<Coord, InvariantViolation> {
        let tile = self.tiles.get(&id).ok_or(InvariantViolation::UnknownTile(id))?;
        if self.id_at(tile.coord) != Some(id) {
            return Err(InvariantViolation::OrphanTile { id, coord: tile.coord });
        }
        Ok(tile.coord)
    }

    /// Nearest occupied slot from `coord` in `direction`, read from the grid.
    pub fn nearest_in(&self, coord: Coord, direction: Direction) -> Option<TileId> {
        let mut cursor = coord;
        while let Some(next) = cursor.step(direction, self.size) {
            if let Some(id) = self.slots[next.index(self.size)] {
                return Some(id);
            }
            cursor = next;
        }
        None
    }

    /// Recompute every tile's adjacency cache from the grid.
    pub fn refresh_neighbors(&mut self) {
        let fresh: Vec<(TileId, Neighbors)> = self
            .tiles
            .values()
            .map(|tile| {
                let mut n = Neighbors::default();
                for dir in Direction::ALL {
                    n.set(dir, self.nearest_in(tile.coord, dir));
                }
                (tile.id, n)
            })
            .collect();

        for (id, neighbors) in fresh {
            if let Some(tile) = self.tiles.get_mut(&id) {
                tile.neighbors = neighbors;
            }
        }
    }

    /// Check occupancy consistency, adjacency freshness and symmetry.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(id) = *slot else { continue };
            let here = Coord::from_index(i, self.size);
            let tile = self
                .tiles
                .get(&id)
                .ok_or(InvariantViolation::DanglingSlot { slot: here, id })?;
            if tile.coord != here {
                return Err(InvariantViolation::SlotMismatch {
                    slot: here,
                    id,
                    recorded: tile.coord,
                });
            }
        }

        for tile in self.tiles.values() {
            if self.id_at(tile.coord) != Some(tile.id) {
                return Err(InvariantViolation::OrphanTile { id: tile.id, coord: tile.coord });
            }
        }

        for tile in self.tiles.values() {
            for dir in Direction::ALL {
                let cached = tile.neighbors.get(dir);
                let actual = self.nearest_in(tile.coord, dir);
                if cached != actual {
                    return Err(InvariantViolation::StaleNeighbor {
                        id: tile.id,
                        direction: dir,
                        cached,
                        actual,
                    });
                }
                if let Some(n) = cached {
                    let back = self.tiles.get(&n).and_then(|t| t.neighbors.get(dir.opposite()));
                    if back != Some(tile.id) {
                        return Err(InvariantViolation::AsymmetricNeighbor {
                            id: tile.id,
                            neighbor: n,
                            direction: dir,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// True if two orthogonally adjacent tiles share a value along the
    /// given axis (rows when `horizontal`, columns otherwise).
    pub fn has_equal_pair(&self, horizontal: bool) -> bool {
        let step = if horizontal { Direction::Right } else { Direction::Down };
        self.tiles.values().any(|tile| {
            tile.coord
                .step(step, self.size)
                .and_then(|c| self.value_at(c))
                .is_some_and(|v| v == tile.value)
        })
    }

    /// True when no slot is free and no adjacent pair could merge.
    pub fn is_stuck(&self) -> bool {
        self.tiles.len() == self.slots.len()
            && !self.has_equal_pair(true)
            && !self.has_equal_pair(false)
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.turn, self.rng_seed, |hasher| {
            hasher.update_u8(self.size);
            hasher.update_u32(self.tiles.len() as u32);
            for tile in self.tiles.values() {
                hasher.update_u32(tile.id.0);
                hasher.update_coord(tile.coord);
                hasher.update_u64(tile.value);
            }
            hasher.update_u64(self.score);
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<TileEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a tile event.
    pub fn push_event(&mut self, event: TileEvent) {
        self.pending_events.push(event);
    }

    /// Overwrite a tile's recorded coordinate without touching the grid.
    #[cfg(test)]
    pub(crate) fn force_coord(&mut self, id: TileId, coord: Coord) {
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.coord = coord;
        }
    }

    /// Render the grid as rows of values, `.` for empty slots.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.size {
            let row: Vec<String> = (0..self.size)
                .map(|x| match self.value_at(Coord::new(x, y)) {
                    Some(v) => format!("{:>5}", v),
                    None => format!("{:>5}", "."),
                })
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
        out
    }
}

// =============================================================================
// TESTS
// =============================================================================
