//! Merge Resolution
//!
//! After sliding, each line is walked from the target edge back towards the
//! opposite edge. A tile whose rear neighbour holds the same value absorbs
//! it and triples; the tiles behind close the gap and the walk continues
//! with the next tile back. A tile merges at most once per turn.

use std::collections::BTreeSet;

use crate::core::coord::Direction;
use crate::game::events::{TileEvent, TurnPhase};
use crate::game::slide::slide_tile;
use crate::game::state::{BoardState, InvariantViolation, TileId};

/// Value growth factor of a merge.
pub const MERGE_FACTOR: u64 = 3;

/// What the merge phase did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Surviving tiles, in merge order
    pub merged: Vec<TileId>,

    /// Tiles absorbed and removed
    pub absorbed: Vec<TileId>,

    /// Score gained (sum of post-merge values)
    pub score_delta: u64,
}

impl MergeSummary {
    /// Number of merges performed.
    pub fn count(&self) -> usize {
        self.merged.len()
    }
}

/// Resolve merges for a move in `direction`. Adds the gain to `state.score`.
pub fn resolve_merges(
    state: &mut BoardState,
    direction: Direction,
) -> Result<MergeSummary, InvariantViolation> {
    state.refresh_neighbors();

    let mut summary = MergeSummary::default();
    let mut merged: BTreeSet<TileId> = BTreeSet::new();
    let behind = direction.opposite();
    let size = state.size();

    for lane in 0..size {
        let mut current = direction.line(lane, size).find_map(|c| state.id_at(c));

        while let Some(front) = current {
            let front_tile = state.tile(front).ok_or(InvariantViolation::UnknownTile(front))?;
            let Some(back) = front_tile.neighbors.get(behind) else {
                break;
            };
            let front_value = front_tile.value;
            let back_value = state
                .tile(back)
                .ok_or(InvariantViolation::UnknownTile(back))?
                .value;

            if front_value != back_value || merged.contains(&front) {
                current = Some(back);
                continue;
            }

            let value = merge_pair(state, front, back, direction)?;
            merged.insert(front);
            summary.merged.push(front);
            summary.absorbed.push(back);
            summary.score_delta = summary
                .score_delta
                .checked_add(value)
                .ok_or(InvariantViolation::ScoreOverflow { score: summary.score_delta, delta: value })?;

            slide_tile(state, front, direction, TurnPhase::Merge)?;
            close_gap(state, front, direction)?;

            current = state.tile(front).and_then(|t| t.neighbors.get(behind));
        }
    }

    state.score = state.score.checked_add(summary.score_delta).ok_or(
        InvariantViolation::ScoreOverflow { score: state.score, delta: summary.score_delta },
    )?;
    Ok(summary)
}

/// Merge `back` into `front`, returning the new value.
///
/// Both tiles must be where the grid says they are, adjacent along
/// `direction` and equal in value.
pub fn merge_pair(
    state: &mut BoardState,
    front: TileId,
    back: TileId,
    direction: Direction,
) -> Result<u64, InvariantViolation> {
    let front_at = state.checked_coord(front)?;
    let back_at = state.checked_coord(back)?;
    if !front_at.is_adjacent(back_at, direction.opposite()) {
        return Err(InvariantViolation::NotAdjacent { front, front_at, back, back_at });
    }

    let front_value = state.tile(front).map(|t| t.value).unwrap_or(0);
    let back_value = state.tile(back).map(|t| t.value).unwrap_or(0);
    if front_value != back_value {
        return Err(InvariantViolation::ValueMismatch { front, front_value, back, back_value });
    }

    let value = front_value
        .checked_mul(MERGE_FACTOR)
        .ok_or(InvariantViolation::ValueOverflow { id: front, value: front_value })?;
    state.remove_tile(back)?;
    state.set_value(front, value)?;

    let turn = state.turn;
    state.push_event(TileEvent::merged(turn, back, front, value));
    state.push_event(TileEvent::removed(turn, TurnPhase::Merge, back));

    // Front's rear link now skips over the absorbed tile
    state.refresh_neighbors();
    Ok(value)
}

/// Slide every tile behind `front` towards the edge to fill the slot an
/// absorbed tile left.
fn close_gap(
    state: &mut BoardState,
    front: TileId,
    direction: Direction,
) -> Result<(), InvariantViolation> {
    let behind = direction.opposite();
    let size = state.size();
    let mut cursor = state.checked_coord(front)?;

    while let Some(next) = cursor.step(behind, size) {
        if let Some(id) = state.id_at(next) {
            slide_tile(state, id, direction, TurnPhase::Merge)?;
        }
        cursor = next;
    }

    state.refresh_neighbors();
    Ok(())
}
