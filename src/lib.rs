//! # Trimerge
//!
//! Deterministic board engine for a sliding puzzle in which equal tiles
//! merge and triple in value.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         TRIMERGE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── coord.rs    - Grid coordinates and directions           │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Board rules (deterministic)               │
//! │  ├── input.rs    - Direction decoding, move log              │
//! │  ├── state.rs    - Grid, tiles, adjacency cache              │
//! │  ├── slide.rs    - Movement assessment and sliding           │
//! │  ├── merge.rs    - Merge resolution and scoring              │
//! │  ├── spawn.rs    - Random tile spawning                      │
//! │  ├── events.rs   - Tile events                               │
//! │  ├── config.rs   - Engine configuration                      │
//! │  └── engine.rs   - Turn state machine                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given the same configuration, seed and move sequence, a game produces
//! **identical results** and the same state hash on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::coord::{Coord, Direction};
pub use core::rng::DeterministicRng;
pub use game::config::EngineConfig;
pub use game::engine::{BoardEngine, EngineError, TurnOutcome, TurnReport};
pub use game::state::{BoardState, TileId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
