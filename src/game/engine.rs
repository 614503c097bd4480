//! Board Engine
//!
//! Turn state machine around a `BoardState`. A turn is resolved in two
//! halves: `begin_turn` slides and merges, `complete_turn` spawns and
//! evaluates win and loss. Input arriving in between is dropped, never
//! queued. `apply_input` runs both halves back to back for callers that
//! do not animate.

use std::time::Duration;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::coord::{Coord, Direction};
use crate::core::hash::StateHash;
use crate::game::config::{ConfigError, EngineConfig, LossPolicy, WinPolicy};
use crate::game::events::{events_in_phase, TileEvent, TurnPhase};
use crate::game::input::{InputError, MoveLog};
use crate::game::merge::resolve_merges;
use crate::game::slide::{apply_move, compute_movable, would_change};
use crate::game::spawn::spawn_tiles;
use crate::game::state::{BoardState, InvariantViolation, PlacementError, TileId};

// =============================================================================
// PHASES AND ERRORS
// =============================================================================

/// Why the game stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Winning value reached under `WinPolicy::Halt`
    Won,
    /// No move can change the board under `LossPolicy::EndGame`
    Lost,
    /// A turn was aborted on an invariant violation
    Fault,
}

/// Engine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Waiting for input
    Idle,
    /// Slide and merge done, spawn pending
    Resolving {
        /// Direction being resolved
        direction: Direction,
    },
    /// No further turns
    Over {
        /// Why the game stopped
        reason: GameOverReason,
    },
}

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input could not be decoded; nothing changed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Configuration rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Direct placement rejected.
    #[error("placement rejected: {0}")]
    Placement(#[from] PlacementError),

    /// Board corrupted; the engine is now `Over { Fault }`.
    #[error("board invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Operation requires an idle engine.
    #[error("engine is {0:?}, operation needs Idle")]
    NotIdle(EnginePhase),
}

// =============================================================================
// TURN RESULTS
// =============================================================================

/// Everything one turn did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    /// Turn number
    pub turn: u32,
    /// Direction applied
    pub direction: Direction,
    /// Tile changes in phase order
    pub events: Vec<TileEvent>,
    /// Tiles moved in the slide phase
    pub moved: Vec<TileId>,
    /// Merges performed
    pub merges: usize,
    /// Score gained this turn
    pub score_delta: u64,
    /// Cumulative score after the turn
    pub score: u64,
    /// Tiles spawned
    pub spawned: Vec<TileId>,
    /// Spawn phase found no empty slot
    pub board_full: bool,
    /// Winning value reached for the first time by a merge or spawn this
    /// turn. A winning tile set with `place_tile` counts at placement and
    /// is never reported here.
    pub won: bool,
    /// No move can change the board any more
    pub lost: bool,
    /// Delay the presentation layer should hold before the spawn phase
    pub settle_delay: Duration,
}

impl TurnReport {
    /// Events of one phase.
    pub fn events_in(&self, phase: TurnPhase) -> impl Iterator<Item = &TileEvent> {
        events_in_phase(&self.events, phase)
    }
}

/// Outcome of feeding a direction to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Slide and merge done; `complete_turn` finishes the turn.
    /// Spawn fields of the report are still empty.
    Started(TurnReport),
    /// Turn fully resolved
    Applied(TurnReport),
    /// The direction would not change the board; nothing happened
    NoMovement {
        /// No direction can change the board
        lost: bool,
        /// The engine is in `Over`
        game_over: bool,
    },
    /// A turn was already resolving; the input was dropped
    Ignored,
}

impl TurnOutcome {
    /// Report, if the board changed.
    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            TurnOutcome::Started(r) | TurnOutcome::Applied(r) => Some(r),
            _ => None,
        }
    }

    /// True for `Ignored`.
    pub fn is_ignored(&self) -> bool {
        matches!(self, TurnOutcome::Ignored)
    }
}

/// Slide and merge results waiting for the spawn phase.
struct PendingTurn {
    direction: Direction,
    moved: Vec<TileId>,
    merges: usize,
    score_delta: u64,
    events: Vec<TileEvent>,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Turn-based engine for one board.
pub struct BoardEngine {
    config: EngineConfig,
    state: BoardState,
    phase: EnginePhase,
    pending: Option<PendingTurn>,
    won: bool,
    log: MoveLog,
    setup_events: Vec<TileEvent>,
}

impl BoardEngine {
    /// Create an engine and spawn `config.initial_tiles` tiles.
    pub fn new(config: EngineConfig, rng_seed: u64) -> Result<Self, EngineError> {
        let mut engine = Self::empty(config, rng_seed)?;

        let initial = engine.config.initial_tiles;
        if initial > 0 {
            spawn_tiles(&mut engine.state, &engine.config.spawn, initial, initial)?;
        }
        engine.setup_events = engine.state.take_events();
        engine.state.check_invariants()?;
        if engine.state.is_stuck() {
            engine.enter_loss();
        }

        info!(
            "Board {}x{} ready (seed {}, {} tiles)",
            engine.config.board_size,
            engine.config.board_size,
            rng_seed,
            engine.state.tile_count()
        );
        Ok(engine)
    }

    /// Create an engine with an empty board.
    pub fn empty(config: EngineConfig, rng_seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        let state = BoardState::new(config.board_size, rng_seed);
        Ok(Self {
            config,
            state,
            phase: EnginePhase::Idle,
            pending: None,
            won: false,
            log: MoveLog::new(rng_seed),
            setup_events: Vec::new(),
        })
    }

    /// Place a tile directly. Only allowed while idle.
    pub fn place_tile(&mut self, coord: Coord, value: u64) -> Result<TileId, EngineError> {
        if self.phase != EnginePhase::Idle {
            return Err(EngineError::NotIdle(self.phase));
        }

        let id = self.state.insert_tile(coord, value)?;
        self.state.refresh_neighbors();
        if !self.won && value >= self.config.winning_value {
            info!("Placed winning value {} at {}", value, coord);
            self.won = true;
        }
        self.setup_events
            .push(TileEvent::created(self.state.turn, TurnPhase::Setup, id, coord, value));
        Ok(id)
    }

    /// Take the Created events of initial and placed tiles.
    pub fn take_setup_events(&mut self) -> Vec<TileEvent> {
        std::mem::take(&mut self.setup_events)
    }

    /// Start a turn: slide and merge.
    pub fn begin_turn(&mut self, direction: Direction) -> Result<TurnOutcome, EngineError> {
        match self.phase {
            EnginePhase::Resolving { direction: current } => {
                debug!("Input {} ignored, turn {} resolving {}", direction, self.state.turn, current);
                return Ok(TurnOutcome::Ignored);
            }
            EnginePhase::Over { reason } => {
                debug!("Input {} after game over ({:?})", direction, reason);
                return Ok(TurnOutcome::NoMovement {
                    lost: self.state.is_stuck(),
                    game_over: true,
                });
            }
            EnginePhase::Idle => {}
        }

        let assessment = compute_movable(&mut self.state, direction);
        if !assessment.changes_board() {
            let lost = self.state.is_stuck();
            if lost {
                self.enter_loss();
            }
            debug!("Input {} moves nothing (lost: {})", direction, lost);
            return Ok(TurnOutcome::NoMovement {
                lost,
                game_over: self.is_over(),
            });
        }

        self.phase = EnginePhase::Resolving { direction };
        self.state.turn += 1;
        let turn = self.state.turn;

        let result = apply_move(&mut self.state, &assessment);
        let moved = self.guard(result)?;
        let result = resolve_merges(&mut self.state, direction);
        let merges = self.guard(result)?;

        let events = self.state.take_events();
        self.trace_events(&events);
        self.log.record(turn, direction);

        let pending = PendingTurn {
            direction,
            moved,
            merges: merges.count(),
            score_delta: merges.score_delta,
            events,
        };
        let report = self.report(&pending, Vec::new(), false, false, false);
        self.pending = Some(pending);
        Ok(TurnOutcome::Started(report))
    }

    /// Finish a started turn: spawn, then evaluate win and loss.
    ///
    /// Returns `Ignored` when no turn is resolving.
    pub fn complete_turn(&mut self) -> Result<TurnOutcome, EngineError> {
        let Some(mut pending) = self.pending.take() else {
            return Ok(TurnOutcome::Ignored);
        };

        let (min, max) = (self.config.spawn.min_per_turn, self.config.spawn.max_per_turn);
        let spawn = match spawn_tiles(&mut self.state, &self.config.spawn, min, max) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Spawn failed on turn {}: {}", self.state.turn, e);
                self.phase = EnginePhase::Over { reason: GameOverReason::Fault };
                return Err(e.into());
            }
        };
        let check = self.state.check_invariants();
        self.guard(check)?;

        let spawn_events = self.state.take_events();
        self.trace_events(&spawn_events);
        pending.events.extend(spawn_events);

        let won = !self.won && self.state.max_value() >= self.config.winning_value;
        if won {
            self.won = true;
            info!(
                "Reached {} on turn {} (score {})",
                self.config.winning_value, self.state.turn, self.state.score
            );
        }
        let lost = self.state.is_stuck();

        self.phase = if won && self.config.win_policy == WinPolicy::Halt {
            EnginePhase::Over { reason: GameOverReason::Won }
        } else {
            EnginePhase::Idle
        };
        if lost && self.phase == EnginePhase::Idle {
            self.enter_loss();
        }

        let report = self.report(
            &pending,
            spawn.tiles().to_vec(),
            spawn.is_board_full(),
            won,
            lost,
        );
        debug!(
            "Turn {} {}: {} moved, {} merges, +{}, {} spawned",
            report.turn,
            report.direction,
            report.moved.len(),
            report.merges,
            report.score_delta,
            report.spawned.len()
        );
        Ok(TurnOutcome::Applied(report))
    }

    /// Resolve a whole turn.
    pub fn apply_input(&mut self, direction: Direction) -> Result<TurnOutcome, EngineError> {
        match self.begin_turn(direction)? {
            TurnOutcome::Started(_) => self.complete_turn(),
            other => Ok(other),
        }
    }

    /// Parse a direction name and resolve a whole turn.
    pub fn apply_command(&mut self, command: &str) -> Result<TurnOutcome, EngineError> {
        let direction: Direction = command.parse()?;
        self.apply_input(direction)
    }

    /// Directions that would change the board right now.
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| would_change(&self.state, *d))
            .collect()
    }

    /// True when no move can change the board.
    pub fn is_lost(&self) -> bool {
        self.state.is_stuck()
    }

    /// True once the winning value has been reached.
    pub fn has_won(&self) -> bool {
        self.won
    }

    /// True when the engine accepts new turns.
    pub fn accepting_input(&self) -> bool {
        self.phase == EnginePhase::Idle
    }

    /// True in `Over`.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, EnginePhase::Over { .. })
    }

    /// Current phase.
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Cumulative score.
    pub fn score(&self) -> u64 {
        self.state.score
    }

    /// Current turn number.
    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    /// Board state.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Moves applied so far.
    pub fn move_log(&self) -> &MoveLog {
        &self.log
    }

    /// Hash of the board state.
    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash()
    }

    fn enter_loss(&mut self) {
        if self.config.loss_policy == LossPolicy::EndGame && !self.is_over() {
            info!("No moves left on turn {} (score {})", self.state.turn, self.state.score);
            self.phase = EnginePhase::Over { reason: GameOverReason::Lost };
        }
    }

    fn guard<T>(&mut self, result: Result<T, InvariantViolation>) -> Result<T, EngineError> {
        result.map_err(|violation| {
            error!("Turn {} aborted: {}", self.state.turn, violation);
            self.pending = None;
            self.phase = EnginePhase::Over { reason: GameOverReason::Fault };
            EngineError::Invariant(violation)
        })
    }

    fn report(
        &self,
        pending: &PendingTurn,
        spawned: Vec<TileId>,
        board_full: bool,
        won: bool,
        lost: bool,
    ) -> TurnReport {
        TurnReport {
            turn: self.state.turn,
            direction: pending.direction,
            events: pending.events.clone(),
            moved: pending.moved.clone(),
            merges: pending.merges,
            score_delta: pending.score_delta,
            score: self.state.score,
            spawned,
            board_full,
            won,
            lost,
            settle_delay: self.config.settle_delay(),
        }
    }

    #[cfg(feature = "debug-tracing")]
    fn trace_events(&self, events: &[TileEvent]) {
        for event in events {
            tracing::trace!(
                "turn {} {:?} {}: {:?}",
                event.turn,
                event.phase,
                event.tile_id(),
                event.change
            );
        }
    }

    #[cfg(not(feature = "debug-tracing"))]
    fn trace_events(&self, _events: &[TileEvent]) {}
}

/// Replay a move log from a fresh engine.
///
/// Returns the final engine and every event, setup included. Given the same
/// configuration the final hash matches the recorded game.
pub fn replay_game(
    config: EngineConfig,
    log: &MoveLog,
) -> Result<(BoardEngine, Vec<TileEvent>), EngineError> {
    let mut engine = BoardEngine::new(config, log.rng_seed)?;
    let mut events = engine.take_setup_events();

    for direction in log.directions() {
        if let TurnOutcome::Applied(report) = engine.apply_input(direction)? {
            events.extend(report.events);
        }
    }

    Ok((engine, events))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::TileChange;

    fn engine_with(tiles: &[(u8, u8, u64)], config: EngineConfig) -> BoardEngine {
        let mut engine = BoardEngine::empty(config, 7).unwrap();
        for &(x, y, v) in tiles {
            engine.place_tile(Coord::new(x, y), v).unwrap();
        }
        engine
    }

    fn checkerboard(size: u8) -> Vec<(u8, u8, u64)> {
        let mut tiles = Vec::new();
        for y in 0..size {
            for x in 0..size {
                tiles.push((x, y, if (x + y) % 2 == 0 { 3 } else { 9 }));
            }
        }
        tiles
    }

    fn applied(outcome: TurnOutcome) -> TurnReport {
        match outcome {
            TurnOutcome::Applied(report) => report,
            other => panic!("expected Applied, got {:?}", other),
        }
    }

    #[test]
    fn test_new_spawns_initial_tiles() {
        let mut engine = BoardEngine::new(EngineConfig::default(), 42).unwrap();
        assert_eq!(engine.state().tile_count(), 2);
        assert_eq!(engine.turn(), 0);
        assert!(engine.accepting_input());

        let setup = engine.take_setup_events();
        assert_eq!(setup.len(), 2);
        assert!(setup.iter().all(|e| matches!(e.change, TileChange::Created { .. })));
        assert!(engine.take_setup_events().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = BoardEngine::new(EngineConfig::with_size(1), 1);
        assert!(matches!(result, Err(EngineError::Config(ConfigError::InvalidBoardSize(1)))));
    }

    #[test]
    fn test_two_threes_merge_right() {
        let mut engine = engine_with(&[(0, 0, 3), (3, 0, 3)], EngineConfig::default());
        let report = applied(engine.apply_input(Direction::Right).unwrap());

        assert_eq!(engine.state().value_at(Coord::new(3, 0)), Some(9));
        assert_eq!(report.merges, 1);
        assert_eq!(report.score_delta, 9);
        assert_eq!(engine.score(), 9);
        assert_eq!(engine.state().tile_count(), 1 + report.spawned.len());
        assert!(!report.spawned.is_empty());
        assert_eq!(report.turn, 1);
        engine.state().check_invariants().unwrap();
    }

    #[test]
    fn test_full_row_of_threes() {
        let mut engine = engine_with(
            &[(0, 0, 3), (1, 0, 3), (2, 0, 3), (3, 0, 3)],
            EngineConfig::default(),
        );
        let report = applied(engine.apply_input(Direction::Right).unwrap());

        assert_eq!(engine.state().value_at(Coord::new(2, 0)), Some(9));
        assert_eq!(engine.state().value_at(Coord::new(3, 0)), Some(9));
        assert_eq!(report.merges, 2);
        assert_eq!(report.score_delta, 18);
    }

    #[test]
    fn test_events_follow_phase_order() {
        let mut engine = engine_with(
            &[(0, 1, 3), (2, 1, 3), (1, 3, 9)],
            EngineConfig::default(),
        );
        engine.take_setup_events();
        let report = applied(engine.apply_input(Direction::Left).unwrap());

        let phases: Vec<TurnPhase> = report.events.iter().map(|e| e.phase).collect();
        let mut sorted = phases.clone();
        sorted.sort();
        assert_eq!(phases, sorted);
        assert!(report.events.iter().all(|e| e.turn == 1));
        assert_eq!(report.events_in(TurnPhase::Spawn).count(), report.spawned.len());
        assert_eq!(
            report.events_in(TurnPhase::Merge)
                .filter(|e| matches!(e.change, TileChange::Merged { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_stuck_board_reports_loss() {
        let mut engine = engine_with(&checkerboard(4), EngineConfig::default());
        let before = engine.compute_hash();
        assert!(engine.is_lost());
        assert!(engine.legal_directions().is_empty());

        for direction in Direction::ALL {
            let outcome = engine.apply_input(direction).unwrap();
            assert_eq!(outcome, TurnOutcome::NoMovement { lost: true, game_over: true });
        }
        assert_eq!(engine.phase(), EnginePhase::Over { reason: GameOverReason::Lost });
        assert_eq!(engine.compute_hash(), before);
        assert_eq!(engine.turn(), 0);
    }

    #[test]
    fn test_report_policy_stays_idle_on_loss() {
        let config = EngineConfig { loss_policy: LossPolicy::Report, ..EngineConfig::default() };
        let mut engine = engine_with(&checkerboard(4), config);

        let outcome = engine.apply_input(Direction::Up).unwrap();
        assert_eq!(outcome, TurnOutcome::NoMovement { lost: true, game_over: false });
        assert_eq!(engine.phase(), EnginePhase::Idle);
    }

    #[test]
    fn test_noop_move_changes_nothing() {
        let mut engine = engine_with(&[(3, 0, 3), (3, 1, 9)], EngineConfig::default());
        let before = engine.compute_hash();

        let outcome = engine.apply_input(Direction::Right).unwrap();
        assert_eq!(outcome, TurnOutcome::NoMovement { lost: false, game_over: false });
        assert_eq!(engine.compute_hash(), before);
        assert!(engine.move_log().is_empty());
        assert!(!engine.legal_directions().contains(&Direction::Right));
        assert!(engine.legal_directions().contains(&Direction::Left));
    }

    #[test]
    fn test_input_ignored_while_resolving() {
        let mut engine = engine_with(&[(0, 0, 3), (3, 0, 3)], EngineConfig::default());

        let started = engine.begin_turn(Direction::Right).unwrap();
        let partial = started.report().unwrap().clone();
        assert!(partial.spawned.is_empty());
        assert_eq!(engine.phase(), EnginePhase::Resolving { direction: Direction::Right });
        assert!(!engine.accepting_input());

        let mid = engine.compute_hash();
        assert!(engine.begin_turn(Direction::Left).unwrap().is_ignored());
        assert!(engine.apply_input(Direction::Down).unwrap().is_ignored());
        assert!(matches!(
            engine.place_tile(Coord::new(1, 1), 3),
            Err(EngineError::NotIdle(EnginePhase::Resolving { .. }))
        ));
        assert_eq!(engine.compute_hash(), mid);

        let report = applied(engine.complete_turn().unwrap());
        assert_eq!(report.score_delta, 9);
        assert!(!report.spawned.is_empty());
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(engine.complete_turn().unwrap().is_ignored());
        assert_eq!(engine.move_log().len(), 1);
    }

    #[test]
    fn test_invalid_command_changes_nothing() {
        let mut engine = BoardEngine::new(EngineConfig::default(), 3).unwrap();
        let before = engine.compute_hash();

        let result = engine.apply_command("north");
        assert!(matches!(result, Err(EngineError::Input(InputError::InvalidDirection(_)))));
        assert_eq!(engine.compute_hash(), before);
        assert!(engine.accepting_input());
    }

    #[test]
    fn test_win_reported_once() {
        let mut engine = engine_with(&[(0, 0, 2187), (1, 0, 2187)], EngineConfig::default());
        let report = applied(engine.apply_input(Direction::Left).unwrap());

        assert!(report.won);
        assert!(engine.has_won());
        assert_eq!(engine.state().value_at(Coord::new(0, 0)), Some(6561));
        assert_eq!(engine.phase(), EnginePhase::Idle);

        let next = engine.legal_directions()[0];
        let report = applied(engine.apply_input(next).unwrap());
        assert!(!report.won);
        assert!(engine.has_won());
    }

    #[test]
    fn test_halt_policy_ends_game() {
        let config = EngineConfig { win_policy: WinPolicy::Halt, ..EngineConfig::default() };
        let mut engine = engine_with(&[(0, 0, 2187), (1, 0, 2187)], config);
        assert!(applied(engine.apply_input(Direction::Left).unwrap()).won);
        assert_eq!(engine.phase(), EnginePhase::Over { reason: GameOverReason::Won });

        let outcome = engine.apply_input(Direction::Right).unwrap();
        assert!(matches!(outcome, TurnOutcome::NoMovement { game_over: true, .. }));
    }

    #[test]
    fn test_corruption_aborts_turn() {
        let mut engine = engine_with(&[(0, 0, 3)], EngineConfig::default());
        let id = engine.state.id_at(Coord::new(0, 0)).unwrap();
        engine.state.force_coord(id, Coord::new(1, 0));

        let result = engine.apply_input(Direction::Right);
        assert!(matches!(
            result,
            Err(EngineError::Invariant(InvariantViolation::OrphanTile { .. }))
        ));
        assert_eq!(engine.phase(), EnginePhase::Over { reason: GameOverReason::Fault });
        assert!(engine.complete_turn().unwrap().is_ignored());
    }

    #[test]
    fn test_placed_winning_tile_is_not_reported() {
        let mut engine = engine_with(&[(0, 0, 6561), (3, 3, 3)], EngineConfig::default());
        assert!(engine.has_won());

        let report = applied(engine.apply_input(Direction::Right).unwrap());
        assert_eq!(report.merges, 0);
        assert!(!report.won);
        assert!(engine.has_won());
    }

    #[test]
    fn test_merge_overflow_aborts_turn() {
        let top = 3u64.pow(40);
        let mut engine = engine_with(&[(0, 0, top), (1, 0, top)], EngineConfig::default());

        let result = engine.apply_input(Direction::Left);
        assert!(matches!(
            result,
            Err(EngineError::Invariant(InvariantViolation::ValueOverflow { value, .. })) if value == top
        ));
        assert_eq!(engine.phase(), EnginePhase::Over { reason: GameOverReason::Fault });
        assert_eq!(engine.state().tile_count(), 2);
        assert!(engine.move_log().is_empty());
    }

    #[test]
    fn test_replay_matches_hash() {
        let config = EngineConfig::with_size(6);
        let mut engine = BoardEngine::new(config.clone(), 2024).unwrap();

        for step in 0..60 {
            let legal = engine.legal_directions();
            if legal.is_empty() || engine.is_over() {
                break;
            }
            engine.apply_input(legal[step % legal.len()]).unwrap();
        }

        let (replayed, events) = replay_game(config, engine.move_log()).unwrap();
        assert_eq!(replayed.compute_hash(), engine.compute_hash());
        assert_eq!(replayed.score(), engine.score());
        assert_eq!(replayed.turn(), engine.turn());
        assert!(events.len() >= engine.state().tile_count());
    }

    #[test]
    fn test_different_seed_diverges() {
        let a = BoardEngine::new(EngineConfig::default(), 1).unwrap();
        let b = BoardEngine::new(EngineConfig::default(), 2).unwrap();
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
