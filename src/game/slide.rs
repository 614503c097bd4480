//! Sliding
//!
//! Movement assessment and the slide phase. Every tile slides as far as it
//! can in one action; lines are traversed from the target edge inwards so a
//! contiguous run closes up without gaps.

use crate::core::coord::{Coord, Direction};
use crate::game::events::{TileEvent, TurnPhase};
use crate::game::state::{BoardState, InvariantViolation, TileId};

/// Snapshot of what a move in one direction can do, taken before any tile
/// moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveAssessment {
    /// Direction assessed
    pub direction: Direction,

    /// Tiles whose next slot in `direction` is empty
    pub movable: Vec<TileId>,

    /// Empty slots before the slide. The spawn phase reads the board again
    /// after merging, since merges free further slots.
    pub empty_slots: Vec<Coord>,

    /// At least one adjacent equal pair lies along the move axis
    pub can_merge: bool,
}

impl MoveAssessment {
    /// True if any tile will slide.
    #[inline]
    pub fn can_slide(&self) -> bool {
        !self.movable.is_empty()
    }

    /// True if the move changes the board at all.
    #[inline]
    pub fn changes_board(&self) -> bool {
        self.can_slide() || self.can_merge
    }
}

/// Assess a move in `direction`.
///
/// Refreshes the adjacency cache first; the result reflects the board as it
/// is before any movement this turn.
pub fn compute_movable(state: &mut BoardState, direction: Direction) -> MoveAssessment {
    state.refresh_neighbors();

    let size = state.size();
    let movable = state
        .tiles()
        .filter(|tile| {
            let Some(next) = tile.coord.step(direction, size) else {
                return false;
            };
            match tile.neighbors.get(direction) {
                None => true,
                Some(n) => state.tile(n).is_some_and(|t| t.coord != next),
            }
        })
        .map(|tile| tile.id)
        .collect();

    MoveAssessment {
        direction,
        movable,
        empty_slots: state.empty_slots(),
        can_merge: state.has_equal_pair(direction.is_horizontal()),
    }
}

/// Whether a move in `direction` would change the board, read straight
/// from the grid without touching the cache.
pub fn would_change(state: &BoardState, direction: Direction) -> bool {
    let size = state.size();
    let slides = state.tiles().any(|tile| {
        tile.coord
            .step(direction, size)
            .is_some_and(|next| state.is_vacant(next))
    });
    slides || state.has_equal_pair(direction.is_horizontal())
}

/// Slide one tile as far as possible in `direction`, one slot at a time.
///
/// Emits a single `Moved` event covering the whole distance and returns the
/// destination, or `None` if the tile was already blocked.
pub(crate) fn slide_tile(
    state: &mut BoardState,
    id: TileId,
    direction: Direction,
    phase: TurnPhase,
) -> Result<Option<Coord>, InvariantViolation> {
    let size = state.size();
    let start = state.checked_coord(id)?;
    let mut at = start;

    while let Some(next) = at.step(direction, size) {
        if !state.is_vacant(next) {
            break;
        }
        state.relocate(id, next)?;
        at = next;
    }

    if at == start {
        return Ok(None);
    }
    state.push_event(TileEvent::moved(state.turn, phase, id, start, at));
    Ok(Some(at))
}

/// Apply the slide phase for an assessed move.
///
/// Returns the tiles that moved, in processing order. The adjacency cache is
/// refreshed afterwards.
pub fn apply_move(
    state: &mut BoardState,
    assessment: &MoveAssessment,
) -> Result<Vec<TileId>, InvariantViolation> {
    let mut moved = Vec::new();
    if !assessment.can_slide() {
        return Ok(moved);
    }

    let direction = assessment.direction;
    let size = state.size();

    for lane in 0..size {
        // Tiles only move into slots this traversal has already passed,
        // so each tile is visited exactly once.
        let line: Vec<Coord> = direction.line(lane, size).collect();
        for coord in line {
            let Some(id) = state.id_at(coord) else { continue };
            if slide_tile(state, id, direction, TurnPhase::Slide)?.is_some() {
                moved.push(id);
            }
        }
    }

    state.refresh_neighbors();
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::TileChange;

    fn board(tiles: &[(u8, u8, u64)]) -> BoardState {
        let mut state = BoardState::new(4, 1);
        for &(x, y, v) in tiles {
            state.insert_tile(Coord::new(x, y), v).unwrap();
        }
        state
    }

    #[test]
    fn test_assessment_before_moving() {
        let mut state = board(&[(0, 0, 3), (1, 0, 9), (3, 1, 3)]);
        let assessment = compute_movable(&mut state, Direction::Right);

        // (1,0) has an empty slot to its right; (0,0) is blocked by it;
        // (3,1) is at the edge.
        let expected = state.id_at(Coord::new(1, 0)).unwrap();
        assert_eq!(assessment.movable, vec![expected]);
        assert_eq!(assessment.empty_slots.len(), 13);
        assert!(!assessment.can_merge);
        assert!(assessment.changes_board());
    }

    #[test]
    fn test_run_slides_together() {
        let mut state = board(&[(0, 0, 3), (1, 0, 9)]);
        let a = state.id_at(Coord::new(0, 0)).unwrap();
        let b = state.id_at(Coord::new(1, 0)).unwrap();

        let assessment = compute_movable(&mut state, Direction::Right);
        let moved = apply_move(&mut state, &assessment).unwrap();

        assert_eq!(moved, vec![b, a]);
        assert_eq!(state.tile(b).unwrap().coord, Coord::new(3, 0));
        assert_eq!(state.tile(a).unwrap().coord, Coord::new(2, 0));
        state.check_invariants().unwrap();

        let events = state.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].change,
            TileChange::Moved { id: b, from: Coord::new(1, 0), to: Coord::new(3, 0) }
        );
        assert_eq!(
            events[1].change,
            TileChange::Moved { id: a, from: Coord::new(0, 0), to: Coord::new(2, 0) }
        );
    }

    #[test]
    fn test_slide_stops_at_occupied_slot() {
        let mut state = board(&[(0, 3, 3), (0, 0, 9)]);
        let top = state.id_at(Coord::new(0, 0)).unwrap();

        let assessment = compute_movable(&mut state, Direction::Down);
        apply_move(&mut state, &assessment).unwrap();

        assert_eq!(state.tile(top).unwrap().coord, Coord::new(0, 2));
    }

    #[test]
    fn test_second_slide_is_noop() {
        let mut state = board(&[(0, 0, 3), (2, 1, 9), (1, 3, 27)]);

        let first = compute_movable(&mut state, Direction::Left);
        assert!(!apply_move(&mut state, &first).unwrap().is_empty());
        let snapshot = state.compute_hash();
        state.take_events();

        let second = compute_movable(&mut state, Direction::Left);
        assert!(!second.can_slide());
        assert!(apply_move(&mut state, &second).unwrap().is_empty());
        assert_eq!(state.compute_hash(), snapshot);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_would_change_matches_assessment() {
        let mut state = board(&[(3, 0, 3), (3, 1, 9), (3, 2, 27), (3, 3, 81)]);
        assert!(!would_change(&state, Direction::Right));
        assert!(!would_change(&state, Direction::Down));
        assert!(would_change(&state, Direction::Left));

        for dir in Direction::ALL {
            let assessment = compute_movable(&mut state, dir);
            assert_eq!(assessment.changes_board(), would_change(&state, dir));
        }
    }
}
