//! Core deterministic primitives.
//!
//! Coordinates, seeded randomness and state hashing. Nothing here knows
//! about tiles or merges.

pub mod coord;
pub mod rng;
pub mod hash;

// Re-export core types
pub use coord::{Coord, Direction};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
