//! Input Parsing and Recording
//!
//! Turns raw commands into a `Direction` and records the applied moves of
//! a game so it can be replayed.

use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::coord::Direction;

/// Input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The command does not name one of the four directions.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
}

impl Direction {
    /// Decode a wire code (0 = up, 1 = down, 2 = left, 3 = right).
    pub fn from_u8(code: u8) -> Result<Self, InputError> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            other => Err(InputError::InvalidDirection(other.to_string())),
        }
    }
}

impl FromStr for Direction {
    type Err = InputError;

    /// Accepts direction names in any case, WASD letters and browser key
    /// names (`ArrowUp`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.strip_prefix("arrow").unwrap_or(&key);
        match key {
            "up" | "w" => Ok(Direction::Up),
            "down" | "s" => Ok(Direction::Down),
            "left" | "a" => Ok(Direction::Left),
            "right" | "d" => Ok(Direction::Right),
            _ => Err(InputError::InvalidDirection(s.to_string())),
        }
    }
}

// =============================================================================
// MOVE LOG
// =============================================================================

/// One applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Turn number the move produced
    pub turn: u32,
    /// Direction that was applied
    pub direction: Direction,
}

/// Complete move recording for one game.
///
/// Only moves that changed the board are recorded; no-op and ignored
/// inputs leave the board and RNG untouched, so replay does not need them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MoveLog {
    /// Seed the game was started with
    pub rng_seed: u64,

    records: Vec<MoveRecord>,
}

impl MoveLog {
    /// Create an empty log for a game seed.
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            records: Vec::with_capacity(256),
        }
    }

    /// Record a move.
    pub fn record(&mut self, turn: u32, direction: Direction) {
        self.records.push(MoveRecord { turn, direction });
    }

    /// All records in application order.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the recorded directions.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.records.iter().map(|r| r.direction)
    }
}

// =============================================================================
// TESTS
// =============================================================================
