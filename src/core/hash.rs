//! State Hashing for Verification
//!
//! Deterministic SHA-256 digests of board state, used to check that a
//! replayed move log reproduces the recorded game exactly.

use sha2::{Sha256, Digest};
use super::coord::Coord;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for board state.
///
/// Order of updates is part of the hash.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for board state.
    pub fn for_board_state() -> Self {
        Self::new(b"TRIMERGE_BOARD_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a board coordinate.
    #[inline]
    pub fn update_coord(&mut self, coord: Coord) {
        self.update_u8(coord.x);
        self.update_u8(coord.y);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for board verification.
///
/// Called by `BoardState::compute_hash()`; the closure adds the
/// board-specific data after the turn counter and seed.
pub fn compute_state_hash<F>(turn: u32, rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_board_state();

    hasher.update_u32(turn);
    hasher.update_u64(rng_seed);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let mut a = StateHasher::new(b"DOMAIN_A");
        let mut b = StateHasher::new(b"DOMAIN_B");
        a.update_bytes(&[1, 2, 3, 4]);
        b.update_bytes(&[1, 2, 3, 4]);
        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_compute_state_hash() {
        let make = |turn| {
            compute_state_hash(turn, 12345, |hasher| {
                hasher.update_coord(Coord::new(3, 0));
                hasher.update_u32(9);
                hasher.update_bool(true);
            })
        };

        assert_eq!(make(100), make(100));
        assert_ne!(make(100), make(101));
    }
}
