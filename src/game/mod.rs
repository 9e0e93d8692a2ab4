//! Game Logic Module
//!
//! The whole board simulation and rule set.
//!
//! ## Module Structure
//!
//! - `board`: static geometry and the starting formation
//! - `body`: striker and coin model
//! - `state`: game state, players, turn bookkeeping
//! - `physics`: fixed-step integration and collision resolution
//! - `shot`: drag gesture, aim preview, striker placement
//! - `rules`: turn resolution state machine
//! - `session`: orchestration, turn clock, pause, persistence
//! - `snapshot`: the persisted save record
//! - `events`: event vocabulary for rendering/audio collaborators

pub mod board;
pub mod body;
pub mod events;
pub mod physics;
pub mod rules;
pub mod session;
pub mod shot;
pub mod snapshot;
pub mod state;

// Re-export key types
pub use body::{Body, BodyKind, CoinColor};
pub use events::GameEvent;
pub use session::GameSession;
pub use shot::{AimGesture, Shot};
pub use snapshot::{Snapshot, SnapshotError};
pub use state::{GameState, PlayerId, PlayerState, TurnPhase};
