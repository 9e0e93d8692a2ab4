//! Game Session
//!
//! Owns the game state and drives it from the host's two clocks: the
//! ~20ms physics tick while a shot is in flight, and a 1-second
//! countdown while a player is deciding. All outside input funnels
//! through here; invalid input is a no-op, never an error.

use tracing::{debug, info};

use crate::core::vec2::Vec2;
use crate::game::events::GameEvent;
use crate::game::physics;
use crate::game::rules;
use crate::game::shot::{self, Shot};
use crate::game::snapshot::{Snapshot, SnapshotError};
use crate::game::state::{GameState, TurnPhase};

/// Seconds each player has to shoot.
pub const TURN_TIME_SECS: u32 = 10;

/// A running two-player game.
#[derive(Clone, Debug)]
pub struct GameSession {
    state: GameState,
    remaining_secs: u32,
    paused: bool,
    setup_active: bool,
}

impl GameSession {
    /// Start a fresh game.
    ///
    /// The session opens in its setup phase, where the coin formation
    /// may still be rotated; the first shot (or `finish_setup`) locks it.
    pub fn new_game(seed: u64) -> Self {
        info!(seed, "new game");
        Self {
            state: GameState::new(seed),
            remaining_secs: TURN_TIME_SECS,
            paused: false,
            setup_active: true,
        }
    }

    /// Read-only view of the game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Seconds left on the current turn clock.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Whether the session is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the game has been won.
    pub fn is_game_over(&self) -> bool {
        self.state.phase == TurnPhase::GameOver
    }

    /// Move the striker along the baseline, sliding to the nearest free
    /// spot. Ignored while paused or while bodies are moving.
    pub fn place_striker(&mut self, x: f64) {
        if self.paused || self.state.phase != TurnPhase::AwaitingShot {
            return;
        }
        let x = shot::place_striker(&self.state.coins, x);
        self.state.striker.pos = Vec2::new(x, self.state.striker.pos.y);
    }

    /// Launch the striker. Returns whether the shot was accepted.
    pub fn submit_shot(&mut self, shot: Shot) -> bool {
        if self.paused || self.state.phase != TurnPhase::AwaitingShot {
            return false;
        }
        self.setup_active = false;
        self.state.striker.launch(shot.velocity());
        self.state.phase = TurnPhase::ShotInFlight;
        debug!(angle = shot.angle, speed = shot.speed, "shot launched");
        true
    }

    /// One physics step on the host's fixed tick.
    ///
    /// Resolves the turn when the board settles. Returns the events
    /// produced since the last drain.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.paused || self.state.phase != TurnPhase::ShotInFlight {
            return Vec::new();
        }
        if physics::step(&mut self.state).settled {
            rules::resolve_turn(&mut self.state, false);
            self.remaining_secs = TURN_TIME_SECS;
        }
        self.state.take_events()
    }

    /// One second of turn-clock time.
    ///
    /// The clock only runs while a player is deciding; it is suspended
    /// during setup, pause, flight, and after the game ends. Expiry
    /// forfeits the turn as a foul.
    pub fn second_tick(&mut self) -> Vec<GameEvent> {
        if self.paused || self.setup_active || self.state.phase != TurnPhase::AwaitingShot
        {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            info!(player = self.state.current_player, "turn clock expired");
            rules::resolve_turn(&mut self.state, true);
            self.remaining_secs = TURN_TIME_SECS;
        }
        self.state.take_events()
    }

    /// Suspend the session. Idempotent; the turn clock keeps its
    /// remaining duration.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume a paused session. Idempotent.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Rigidly rotate the starting formation about the queen.
    ///
    /// Setup only; rejected once play has begun or while anything moves.
    /// Returns whether the rotation was applied.
    pub fn rotate_setup_coins(&mut self, angle_deg: f64) -> bool {
        if !self.setup_active || self.paused || self.state.any_motion() {
            return false;
        }
        self.state.rotate_formation(angle_deg);
        true
    }

    /// Undo any setup rotation, restoring the stock formation.
    pub fn cancel_setup_rotation(&mut self) -> bool {
        self.rotate_setup_coins(0.0)
    }

    /// Lock the formation and start the first turn clock.
    pub fn finish_setup(&mut self) {
        self.setup_active = false;
        self.remaining_secs = TURN_TIME_SECS;
    }

    /// Capture the game for the save layer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Rebuild a session from a saved record.
    pub fn restore(snapshot: &Snapshot, seed: u64) -> Result<Self, SnapshotError> {
        let state = snapshot.restore(seed)?;
        Ok(Self {
            state,
            remaining_secs: TURN_TIME_SECS,
            paused: false,
            setup_active: false,
        })
    }

    /// Rebuild from a saved record, or start fresh when it is corrupt.
    pub fn restore_or_new(snapshot: &Snapshot, seed: u64) -> Self {
        match Self::restore(snapshot, seed) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(%err, "discarding corrupt snapshot, starting fresh");
                Self::new_game(seed)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
