//! Engine Configuration
//!
//! Board size, win threshold, spawn behaviour and end-of-game policy.
//! Every field has a default; a JSON document only needs the fields it
//! overrides.

use std::time::Duration;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::spawn::SpawnConfig;
use crate::game::state::is_tile_value;

/// Smallest supported board edge.
pub const MIN_BOARD_SIZE: u8 = 2;

/// Largest supported board edge.
pub const MAX_BOARD_SIZE: u8 = 16;

/// 3^8, the threshold of the complete game.
pub const DEFAULT_WINNING_VALUE: u64 = 6561;

/// What happens once the winning value appears.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinPolicy {
    /// Report the win and keep accepting moves
    #[default]
    Continue,
    /// Report the win and stop
    Halt,
}

/// What happens once no move can change the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossPolicy {
    /// Stop accepting moves
    #[default]
    EndGame,
    /// Report the loss and stay idle; every move is a no-op
    Report,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Board edge outside the supported range.
    #[error("board size {0} outside 2..=16")]
    InvalidBoardSize(u8),

    /// Winning value is not a power of 3 above the smallest tile.
    #[error("winning value {0} must be a power of 3, at least 9")]
    InvalidWinningValue(u64),

    /// No spawn values configured.
    #[error("spawn value set is empty")]
    NoSpawnValues,

    /// Spawn value is not a power of 3.
    #[error("spawn value {0} is not a power of 3")]
    InvalidSpawnValue(u64),

    /// Spawn count bounds are inverted or zero.
    #[error("spawn counts must satisfy 1 <= min ({min}) <= max ({max})")]
    InvalidSpawnRange {
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },

    /// Chance above 100 percent.
    #[error("extra spawn chance {0}% exceeds 100%")]
    InvalidChance(u8),

    /// More initial tiles than slots.
    #[error("{requested} initial tiles do not fit on {slots} slots")]
    TooManyInitialTiles {
        /// Configured initial tiles
        requested: u32,
        /// Slots on the board
        slots: usize,
    },

    /// JSON could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for a board engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Board edge length N (N × N slots)
    pub board_size: u8,
    /// Tile value that wins the game
    pub winning_value: u64,
    /// Spawn phase configuration
    pub spawn: SpawnConfig,
    /// Tiles spawned when the board is created
    pub initial_tiles: u32,
    /// Cool-down between slide completion and spawn, for the presentation layer
    pub settle_delay_ms: u64,
    /// Behaviour after a win
    pub win_policy: WinPolicy,
    /// Behaviour after a loss
    pub loss_policy: LossPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: 4,
            winning_value: DEFAULT_WINNING_VALUE,
            spawn: SpawnConfig::default(),
            initial_tiles: 2,
            settle_delay_ms: 150,
            win_policy: WinPolicy::Continue,
            loss_policy: LossPolicy::EndGame,
        }
    }
}

impl EngineConfig {
    /// Default configuration on an `n` × `n` board.
    pub fn with_size(n: u8) -> Self {
        Self {
            board_size: n,
            ..Self::default()
        }
    }

    /// Settle delay as a `Duration`.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Number of slots on the configured board.
    pub fn slot_count(&self) -> usize {
        self.board_size as usize * self.board_size as usize
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::InvalidBoardSize(self.board_size));
        }
        if self.winning_value < 9 || !is_tile_value(self.winning_value) {
            return Err(ConfigError::InvalidWinningValue(self.winning_value));
        }
        if self.spawn.values.is_empty() {
            return Err(ConfigError::NoSpawnValues);
        }
        if let Some(&bad) = self.spawn.values.iter().find(|v| !is_tile_value(**v)) {
            return Err(ConfigError::InvalidSpawnValue(bad));
        }
        if self.spawn.min_per_turn == 0 || self.spawn.min_per_turn > self.spawn.max_per_turn {
            return Err(ConfigError::InvalidSpawnRange {
                min: self.spawn.min_per_turn,
                max: self.spawn.max_per_turn,
            });
        }
        if self.spawn.extra_chance_percent > 100 {
            return Err(ConfigError::InvalidChance(self.spawn.extra_chance_percent));
        }
        if self.initial_tiles as usize > self.slot_count() {
            return Err(ConfigError::TooManyInitialTiles {
                requested: self.initial_tiles,
                slots: self.slot_count(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.board_size, 4);
        assert_eq!(config.winning_value, 6561);
        assert_eq!(config.spawn.values, vec![3, 9]);
        assert_eq!(config.settle_delay(), Duration::from_millis(150));
    }

    #[test]
    fn test_prototype_sizes_are_valid() {
        for n in [4, 6, 9] {
            EngineConfig::with_size(n).validate().unwrap();
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "board_size": 9, "win_policy": "halt", "spawn": { "max_per_turn": 3 } }"#,
        )
        .unwrap();

        assert_eq!(config.board_size, 9);
        assert_eq!(config.win_policy, WinPolicy::Halt);
        assert_eq!(config.spawn.max_per_turn, 3);
        assert_eq!(config.spawn.values, vec![3, 9]);
        assert_eq!(config.loss_policy, LossPolicy::EndGame);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = EngineConfig::with_size(1);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBoardSize(1))));

        config = EngineConfig { winning_value: 100, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWinningValue(100))));

        config = EngineConfig::default();
        config.spawn.values = vec![3, 6];
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpawnValue(6))));

        config = EngineConfig::default();
        config.spawn.values.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoSpawnValues)));

        config = EngineConfig::default();
        config.spawn.min_per_turn = 3;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpawnRange { min: 3, max: 2 })));

        config = EngineConfig::default();
        config.spawn.extra_chance_percent = 101;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidChance(101))));

        config = EngineConfig { board_size: 2, initial_tiles: 5, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::TooManyInitialTiles { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json_str("{ board_size: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
