//! Trimerge Demo
//!
//! Plays a seeded game by cycling through legal directions, then replays
//! the move log and checks that the final hashes agree.
//!
//! Usage: `trimerge [config.json] [seed]`

use std::fs;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trimerge::{
    VERSION,
    game::{
        config::EngineConfig,
        engine::{replay_game, BoardEngine, TurnOutcome},
        events::TileChange,
    },
};

/// Turn limit for the demo game.
const MAX_DEMO_TURNS: u32 = 2000;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Trimerge v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            EngineConfig::from_json_str(&json).with_context(|| format!("loading config {}", path))?
        }
        None => EngineConfig::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().with_context(|| format!("invalid seed {:?}", s))?,
        None => 12345,
    };

    demo_game(config, seed)
}

/// Run one autoplayed game and verify it replays identically.
fn demo_game(config: EngineConfig, seed: u64) -> Result<()> {
    info!("=== Starting Demo Game ===");
    info!(
        "Board: {}x{}, winning value {}, seed {}",
        config.board_size, config.board_size, config.winning_value, seed
    );

    let mut engine = BoardEngine::new(config.clone(), seed)?;
    let mut total_events = engine.take_setup_events().len();
    let mut step = 0usize;

    while engine.turn() < MAX_DEMO_TURNS {
        let legal = engine.legal_directions();
        if legal.is_empty() || engine.is_over() {
            break;
        }
        let direction = legal[step % legal.len()];
        step += 1;

        let report = match engine.apply_input(direction)? {
            TurnOutcome::Applied(report) => report,
            other => {
                warn!("Unexpected outcome for {}: {:?}", direction, other);
                continue;
            }
        };
        total_events += report.events.len();

        for event in &report.events {
            if let TileChange::Merged { value, .. } = event.change {
                if value >= 729 {
                    info!("Turn {}: tile {} merged into {}", report.turn, event.tile_id(), value);
                }
            }
        }

        if report.won {
            info!("Winning value reached on turn {}", report.turn);
        }
        if report.turn % 100 == 0 {
            info!("Turn {}: score {}, {} tiles", report.turn, report.score, engine.state().tile_count());
        }
        if report.lost {
            info!("No moves left after turn {}", report.turn);
            break;
        }
    }

    // Print final results
    info!("=== Game Results ===");
    info!("Final board:\n{}", engine.state().render());
    info!("Turns: {}, score: {}, highest tile: {}", engine.turn(), engine.score(), engine.state().max_value());
    info!("Total events: {}", total_events);

    let hash = engine.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_game(config, engine.move_log())?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("determinism failure: hashes differ");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
