//! Game Logic Module
//!
//! Board rules and the turn engine. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Direction decoding and the move log
//! - `state`: Grid, tile arena and adjacency cache
//! - `slide`: Movement assessment and the slide phase
//! - `merge`: Merge resolution and scoring
//! - `spawn`: Random tile placement
//! - `events`: Tile events for presentation and replay
//! - `config`: Engine configuration
//! - `engine`: Turn state machine

pub mod input;
pub mod state;
pub mod slide;
pub mod merge;
pub mod spawn;
pub mod events;
pub mod config;
pub mod engine;

// Re-export key types
pub use input::{InputError, MoveLog, MoveRecord};
pub use state::{BoardState, InvariantViolation, PlacementError, Tile, TileId};
pub use events::{TileChange, TileEvent, TurnPhase};
pub use config::{ConfigError, EngineConfig, LossPolicy, WinPolicy};
pub use engine::{
    replay_game, BoardEngine, EngineError, EnginePhase, GameOverReason, TurnOutcome, TurnReport,
};
