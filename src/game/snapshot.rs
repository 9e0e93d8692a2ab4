//! Snapshots
//!
//! The persisted game record consumed and produced by the external
//! save/load layer. The JSON shape follows the save-file format: coin
//! colors serialize as `"white"`, `"black"`, `"red"`, and the striker
//! offset keeps its historical `slider_knob_x` name, though it now
//! stores the striker's baseline x in board coordinates rather than the
//! old slider widget offset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::vec2::Vec2;
use crate::game::board::{
    BASELINE_MAX_X, BASELINE_MIN_X, BOARD_SIZE, CENTER, STRIKER_BASELINE_Y,
};
use crate::game::body::{Body, CoinColor};
use crate::game::state::{GameState, TurnPhase, COINS_PER_PLAYER};

/// Why a snapshot was rejected.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Player index outside 0..=1
    #[error("invalid player index {0}")]
    InvalidPlayer(u8),

    /// Coin coordinate off the board or not finite
    #[error("coin out of bounds at ({x}, {y})")]
    OutOfBounds {
        /// Saved x coordinate
        x: f64,
        /// Saved y coordinate
        y: f64,
    },

    /// More than one queen persisted
    #[error("more than one queen")]
    DuplicateQueen,

    /// More coins of one color than a player owns
    #[error("too many {color:?} coins: {count}")]
    TooManyCoins {
        /// Offending color
        color: CoinColor,
        /// How many were persisted
        count: usize,
    },

    /// Not valid JSON for this record shape
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One persisted coin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    /// Center x
    pub x: f64,
    /// Center y
    pub y: f64,
    /// Coin color
    #[serde(rename = "type")]
    pub color: CoinColor,
}

/// Persisted game record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Player to act, 0 or 1
    pub current_player: u8,
    /// Whether the board was in its rotated orientation
    pub board_rotated: bool,
    /// Active coins only; pocketed coins are never persisted
    pub coins: Vec<CoinRecord>,
    /// Striker baseline offset
    #[serde(rename = "slider_knob_x")]
    pub striker_x: f64,
    /// First player covered the queen
    pub player1_queen_covered: bool,
    /// Second player covered the queen
    pub player2_queen_covered: bool,
    /// The save happened while bodies were still moving
    pub turn_incomplete: bool,
}

impl Snapshot {
    /// Capture the current game.
    pub fn capture(state: &GameState) -> Self {
        Self {
            current_player: state.current_player,
            board_rotated: state.board_rotated,
            coins: state
                .coins
                .iter()
                .filter(|c| c.is_active())
                .filter_map(|c| {
                    c.color().map(|color| CoinRecord {
                        x: c.pos.x,
                        y: c.pos.y,
                        color,
                    })
                })
                .collect(),
            striker_x: state.striker.pos.x.clamp(BASELINE_MIN_X, BASELINE_MAX_X),
            player1_queen_covered: state.players[0].queen_covered,
            player2_queen_covered: state.players[1].queen_covered,
            turn_incomplete: state.any_motion(),
        }
    }

    /// Structural validation, applied before any restore.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.current_player > 1 {
            return Err(SnapshotError::InvalidPlayer(self.current_player));
        }
        if !(BASELINE_MIN_X..=BASELINE_MAX_X).contains(&self.striker_x) {
            return Err(SnapshotError::OutOfBounds {
                x: self.striker_x,
                y: STRIKER_BASELINE_Y,
            });
        }
        for coin in &self.coins {
            let in_board = coin.x.is_finite()
                && coin.y.is_finite()
                && (0.0..=BOARD_SIZE).contains(&coin.x)
                && (0.0..=BOARD_SIZE).contains(&coin.y);
            if !in_board {
                return Err(SnapshotError::OutOfBounds {
                    x: coin.x,
                    y: coin.y,
                });
            }
        }
        let count_of = |target: CoinColor| {
            self.coins.iter().filter(|c| c.color == target).count()
        };
        if count_of(CoinColor::Queen) > 1 {
            return Err(SnapshotError::DuplicateQueen);
        }
        for color in [CoinColor::White, CoinColor::Black] {
            let count = count_of(color);
            if count > COINS_PER_PLAYER as usize {
                return Err(SnapshotError::TooManyCoins { color, count });
            }
        }
        Ok(())
    }

    /// Rebuild a game from this record.
    ///
    /// An interrupted shot is forfeited: the player flips and the board
    /// rotation is re-applied so the next player shoots from the saved
    /// opponent's view.
    pub fn restore(&self, seed: u64) -> Result<GameState, SnapshotError> {
        self.validate()?;

        let mut state = GameState::new(seed);
        state.coins = self
            .coins
            .iter()
            .map(|c| {
                let pos = Vec2::new(c.x, c.y);
                Body::coin(c.color, pos, pos - CENTER)
            })
            .collect();
        state.current_player = self.current_player;
        state.board_rotated = self.board_rotated;
        state.players[0].queen_covered = self.player1_queen_covered;
        state.players[1].queen_covered = self.player2_queen_covered;
        state.phase = TurnPhase::AwaitingShot;

        if self.turn_incomplete {
            state.rotate_board_180();
            state.current_player = state.opponent();
        }
        // The rotation recenters the striker, so the saved baseline
        // position is applied last
        state.striker.pos = Vec2::new(self.striker_x, STRIKER_BASELINE_Y);
        Ok(state)
    }

    /// Serialize to the save-file JSON format.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a save-file record.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_round_trip() {
        let state = GameState::new(21);
        let snapshot = Snapshot::capture(&state);
        assert_eq!(snapshot.coins.len(), 19);
        assert!(!snapshot.turn_incomplete);

        let json = snapshot.to_json().unwrap();
        let back = Snapshot::from_json(&json).unwrap();
        assert_eq!(back, snapshot);

        let restored = back.restore(22).unwrap();
        assert_eq!(restored.coins.len(), 19);
        assert_eq!(restored.current_player, 0);
        assert_eq!(restored.score_of(0), 0);
    }

    #[test]
    fn test_save_file_field_names() {
        let state = GameState::new(21);
        let json = Snapshot::capture(&state).to_json().unwrap();
        // Historical save format keys
        assert!(json.contains("\"slider_knob_x\""));
        assert!(json.contains("\"type\":\"red\""));
        assert!(json.contains("\"player1_queen_covered\""));
    }

    #[test]
    fn test_pocketed_coins_not_persisted() {
        let mut state = GameState::new(21);
        state.coins[3].pocketed = true;
        let snapshot = Snapshot::capture(&state);
        assert_eq!(snapshot.coins.len(), 18);
    }

    #[test]
    fn test_turn_incomplete_forfeits_shot() {
        let mut state = GameState::new(21);
        state.striker.launch(Vec2::new(10.0, -5.0));
        let snapshot = Snapshot::capture(&state);
        assert!(snapshot.turn_incomplete);

        let saved_coins = snapshot.coins.clone();
        let restored = snapshot.restore(22).unwrap();

        assert_eq!(restored.current_player, 1);
        assert!(restored.board_rotated);
        for (coin, saved) in restored.coins.iter().zip(&saved_coins) {
            let expected =
                crate::game::board::rotate_180(Vec2::new(saved.x, saved.y));
            assert!(coin.pos.distance(expected) < 1e-9);
        }
    }

    #[test]
    fn test_invalid_player_rejected() {
        let mut snapshot = Snapshot::capture(&GameState::new(21));
        snapshot.current_player = 2;
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::InvalidPlayer(2))
        ));
    }

    #[test]
    fn test_out_of_bounds_coin_rejected() {
        let mut snapshot = Snapshot::capture(&GameState::new(21));
        snapshot.coins[0].x = 900.0;
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_duplicate_queen_rejected() {
        let mut snapshot = Snapshot::capture(&GameState::new(21));
        snapshot.coins.push(CoinRecord {
            x: 200.0,
            y: 200.0,
            color: CoinColor::Queen,
        });
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::DuplicateQueen)
        ));
    }

    #[test]
    fn test_too_many_coins_rejected() {
        let mut snapshot = Snapshot::capture(&GameState::new(21));
        snapshot.coins.push(CoinRecord {
            x: 200.0,
            y: 200.0,
            color: CoinColor::White,
        });
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::TooManyCoins { .. })
        ));
    }

    #[test]
    fn test_out_of_range_striker_rejected() {
        let mut snapshot = Snapshot::capture(&GameState::new(21));
        snapshot.striker_x = 5000.0;
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_capture_clamps_striker_to_baseline() {
        let mut state = GameState::new(21);
        state.striker.pos = Vec2::new(50.0, 200.0);
        let snapshot = Snapshot::capture(&state);
        assert_eq!(snapshot.striker_x, BASELINE_MIN_X);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_restore_keeps_saved_striker_position() {
        let mut snapshot = Snapshot::capture(&GameState::new(21));
        snapshot.striker_x = 200.0;
        snapshot.turn_incomplete = true;

        let restored = snapshot.restore(22).unwrap();
        // The forfeit rotation must not discard the saved baseline spot
        assert_eq!(
            restored.striker.pos,
            Vec2::new(200.0, STRIKER_BASELINE_Y)
        );
    }

    #[test]
    fn test_non_finite_striker_rejected() {
        let mut snapshot = Snapshot::capture(&GameState::new(21));
        snapshot.striker_x = f64::NAN;
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_garbage_json_is_malformed() {
        assert!(matches!(
            Snapshot::from_json("{not json"),
            Err(SnapshotError::Malformed(_))
        ));
    }
}
