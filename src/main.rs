//! Carrom Engine Demo
//!
//! Drives a scripted match against the engine and logs what happens,
//! then round-trips the final position through the save format.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use carrom::{
    GameEvent, GameSession, Shot, Snapshot, TICK_INTERVAL_MS, TURN_TIME_SECS, VERSION,
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Carrom Engine v{}", VERSION);
    info!("Physics step: {} ms", TICK_INTERVAL_MS);
    info!("Turn clock: {} s", TURN_TIME_SECS);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_secs();

    demo_match(seed)
}

/// Play a handful of scripted shots and log the outcomes.
fn demo_match(seed: u64) -> Result<()> {
    info!("=== Starting Demo Match (seed {}) ===", seed);

    let mut session = GameSession::new_game(seed);
    session.finish_setup();

    // A spread of break-style shots from different baseline offsets
    let script = [
        (300.0, -std::f64::consts::FRAC_PI_2, 35.0),
        (200.0, -1.2, 28.0),
        (400.0, -1.9, 30.0),
        (260.0, -1.4, 22.0),
        (340.0, -1.7, 26.0),
        (300.0, -std::f64::consts::FRAC_PI_2, 18.0),
    ];

    for (turn, (x, angle, speed)) in script.iter().enumerate() {
        if session.is_game_over() {
            break;
        }
        let player = session.state().current_player;
        session.place_striker(*x);
        if !session.submit_shot(Shot {
            angle: *angle,
            speed: *speed,
        }) {
            info!(turn, "shot rejected, skipping");
            continue;
        }

        let mut steps = 0u32;
        loop {
            let events = session.tick();
            for event in &events {
                log_event(player, event);
            }
            steps += 1;
            if !matches!(session.state().phase, carrom::TurnPhase::ShotInFlight) {
                break;
            }
        }
        info!(
            turn,
            player,
            steps,
            score_p1 = session.state().score_of(0),
            score_p2 = session.state().score_of(1),
            "turn complete"
        );
    }

    // Round-trip the final position through the save format
    let json = session.snapshot().to_json()?;
    info!("snapshot: {} bytes", json.len());
    let restored = GameSession::restore(&Snapshot::from_json(&json)?, seed)?;
    info!(
        coins = restored.state().coins.len(),
        next_player = restored.state().current_player,
        "snapshot restored"
    );

    Ok(())
}

fn log_event(player: u8, event: &GameEvent) {
    match event {
        GameEvent::CoinPocketed { color } => info!(player, ?color, "coin pocketed"),
        GameEvent::StrikerPocketed => info!(player, "striker pocketed"),
        GameEvent::QueenPocketed => info!(player, "queen pocketed"),
        GameEvent::QueenCovered { player } => info!(player, "queen covered"),
        GameEvent::Foul { player } => info!(player, "foul"),
        GameEvent::TurnEnded { next_player } => info!(next_player, "turn ended"),
        GameEvent::GameWon { player } => info!(player, "game won"),
        // Collision noise is too chatty for the demo log
        GameEvent::EdgeCollision { .. } | GameEvent::BodyCollision { .. } => {}
    }
}
