//! # Carrom Engine
//!
//! Physics and turn-rule engine for a two-player carrom board game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CARROM ENGINE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── vec2.rs     - 2D vector math                            │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  game/           - Board simulation and rules                │
//! │  ├── board.rs    - Geometry and starting formation           │
//! │  ├── body.rs     - Striker and coin model                    │
//! │  ├── state.rs    - Game and player state                     │
//! │  ├── physics.rs  - Fixed-step integration and collisions     │
//! │  ├── shot.rs     - Aim gesture and striker placement         │
//! │  ├── rules.rs    - Turn resolution state machine             │
//! │  ├── session.rs  - Orchestration, turn clock, persistence    │
//! │  ├── snapshot.rs - Persisted save record                     │
//! │  └── events.rs   - Event vocabulary for collaborators        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is host-driven and single-threaded: the embedding
//! application calls [`GameSession::tick`] on a fixed ~20ms cadence
//! while a shot is in flight and [`GameSession::second_tick`] once per
//! second for the turn clock. Rendering, audio, and save-file I/O live
//! outside the crate and couple only through [`GameEvent`] and
//! [`Snapshot`].
//!
//! All randomness (coin-return placement) comes from a seeded
//! Xorshift128+ generator, so a session replays identically from the
//! same seed and inputs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use crate::core::vec2::Vec2;
pub use game::{
    Body, BodyKind, CoinColor, GameEvent, GameSession, GameState, PlayerId, Shot,
    Snapshot, SnapshotError, TurnPhase,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Physics step interval driven by the host (milliseconds)
pub const TICK_INTERVAL_MS: u64 = 20;

/// Seconds each player has to take their shot
pub const TURN_TIME_SECS: u32 = game::session::TURN_TIME_SECS;
