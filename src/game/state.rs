//! Game State
//!
//! The complete board state: striker, coins, players, turn bookkeeping,
//! and the buffered event stream drained by the session each tick.

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::board::{
    self, CENTER, CENTER_CIRCLE_RADIUS, COIN_RADIUS, STRIKER_BASELINE_Y,
};
use crate::game::body::{Body, BodyKind, CoinColor};
use crate::game::events::GameEvent;

/// Player index, 0 or 1.
pub type PlayerId = u8;

/// Coins each player starts with.
pub const COINS_PER_PLAYER: u8 = 9;

/// Maximum attempts when sampling an open spot near the center.
const PLACEMENT_ATTEMPTS: u32 = 100;

/// Where the game is in its turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the acting player to shoot
    AwaitingShot,
    /// Bodies are in motion
    ShotInFlight,
    /// Motion has stopped; the turn outcome is being applied
    Resolving,
    /// A player has won; no further shots are accepted
    GameOver,
}

/// Per-player standing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    /// Coin color this player sinks
    pub color: CoinColor,
    /// Set permanently once this player covers the queen
    pub queen_covered: bool,
    /// Most recently pocketed own coin, kept for coin-return rules
    pub last_pocketed: Option<Body>,
}

impl PlayerState {
    fn new(color: CoinColor) -> Self {
        Self {
            color,
            queen_covered: false,
            last_pocketed: None,
        }
    }
}

/// Full simulation state for one game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// The striker
    pub striker: Body,
    /// All 19 coins, pocketed ones included until the turn is purged
    pub coins: Vec<Body>,
    /// Both players; index 0 opens with white
    pub players: [PlayerState; 2],
    /// Player whose turn it is
    pub current_player: PlayerId,
    /// Turn cycle phase
    pub phase: TurnPhase,
    /// Toggled on every 180 degree hand-off rotation
    pub board_rotated: bool,
    /// Queen pocketed on a previous turn and awaiting cover
    pub queen_carry: bool,
    /// Queen pocketed during the turn in flight
    pub queen_pocketed_this_turn: bool,
    /// Indices into `coins` in pocket-capture order, cleared each turn
    pub pocketed_this_turn: Vec<usize>,
    /// PRNG for coin-return placement
    pub rng: DeterministicRng,
    /// Buffered events since the last drain
    pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh game with the standard formation.
    ///
    /// Player 0 plays white and acts first.
    pub fn new(seed: u64) -> Self {
        let mut coins = Vec::with_capacity(19);
        coins.push(Body::coin(CoinColor::Queen, CENTER, Vec2::ZERO));
        for (i, offset) in board::formation_offsets().into_iter().enumerate() {
            let color = if i % 2 == 0 {
                CoinColor::White
            } else {
                CoinColor::Black
            };
            coins.push(Body::coin(color, CENTER + offset, offset));
        }

        Self {
            striker: Body::striker(Vec2::new(CENTER.x, STRIKER_BASELINE_Y)),
            coins,
            players: [
                PlayerState::new(CoinColor::White),
                PlayerState::new(CoinColor::Black),
            ],
            current_player: 0,
            phase: TurnPhase::AwaitingShot,
            board_rotated: false,
            queen_carry: false,
            queen_pocketed_this_turn: false,
            pocketed_this_turn: Vec::new(),
            rng: DeterministicRng::new(seed),
            pending_events: Vec::new(),
        }
    }

    /// The player not currently acting.
    #[inline]
    pub fn opponent(&self) -> PlayerId {
        1 - self.current_player
    }

    /// Active coins of the given color still on the board.
    pub fn active_count(&self, color: CoinColor) -> u8 {
        self.coins
            .iter()
            .filter(|c| c.is_active() && c.color() == Some(color))
            .count() as u8
    }

    /// A player's score: own coins pocketed so far.
    pub fn score_of(&self, player: PlayerId) -> u8 {
        COINS_PER_PLAYER - self.active_count(self.players[player as usize].color)
    }

    /// Whether the queen is still on the board.
    pub fn queen_on_board(&self) -> bool {
        self.coins
            .iter()
            .any(|c| c.is_active() && c.color() == Some(CoinColor::Queen))
    }

    /// Index of the queen coin, pocketed or not.
    pub fn queen_index(&self) -> Option<usize> {
        self.coins
            .iter()
            .position(|c| c.color() == Some(CoinColor::Queen))
    }

    /// Whether any body is still in motion.
    pub fn any_motion(&self) -> bool {
        (self.striker.is_active() && self.striker.moving)
            || self.coins.iter().any(|c| c.is_active() && c.moving)
    }

    /// Zero every velocity on the board.
    pub fn halt_all(&mut self) {
        self.striker.halt();
        for coin in &mut self.coins {
            coin.halt();
        }
    }

    /// Mirror every active body through the board center and flip the
    /// rotation flag. The striker snaps back to the baseline center.
    pub fn rotate_board_180(&mut self) {
        for coin in &mut self.coins {
            if coin.is_active() {
                coin.pos = board::rotate_180(coin.pos);
            }
        }
        self.striker.pos = Vec2::new(CENTER.x, STRIKER_BASELINE_Y);
        self.board_rotated = !self.board_rotated;
    }

    /// Find an open position in the center circle.
    ///
    /// The exact center is preferred; otherwise up to 100 random points
    /// in the circle are tried against the active coins. Falls back to
    /// the center when the area is crowded.
    pub fn open_spot_near_center(&mut self, clearance: f64) -> Vec2 {
        if self.spot_is_clear(CENTER, clearance) {
            return CENTER;
        }
        for _ in 0..PLACEMENT_ATTEMPTS {
            let candidate = self.rng.random_point_in_disc(CENTER, CENTER_CIRCLE_RADIUS);
            if self.spot_is_clear(candidate, clearance) {
                return candidate;
            }
        }
        CENTER
    }

    fn spot_is_clear(&self, pos: Vec2, clearance: f64) -> bool {
        self.coins
            .iter()
            .filter(|c| c.is_active())
            .all(|c| c.pos.distance(pos) >= clearance)
    }

    /// Return the queen to (or near) the center, clearing its capture.
    pub fn return_queen_to_center(&mut self) {
        let spot = self.open_spot_near_center(2.5 * COIN_RADIUS);
        if let Some(idx) = self.queen_index() {
            let queen = &mut self.coins[idx];
            queen.pocketed = false;
            queen.pos = spot;
            queen.halt();
        }
    }

    /// Place a coin of the given color near the center as a penalty.
    pub fn place_penalty_coin(&mut self, color: CoinColor) {
        let spot = self.open_spot_near_center(2.0 * COIN_RADIUS);
        self.coins.push(Body::coin(color, spot, Vec2::ZERO));
    }

    /// Queue an event for collaborators.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Drain all buffered events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Drop coins that were pocketed and are staying off the board.
    ///
    /// The queen is kept even when pocketed: a carried queen may still be
    /// returned to play, and a covered one is simply inert.
    pub fn purge_pocketed(&mut self) {
        self.coins
            .retain(|c| c.is_active() || c.color() == Some(CoinColor::Queen));
    }

    /// Rigidly rotate the ring coins about the queen by the given angle.
    ///
    /// Pre-game setup only; uses the stored formation offsets so repeated
    /// adjustment never accumulates drift.
    pub fn rotate_formation(&mut self, angle_deg: f64) {
        let angle = angle_deg.to_radians();
        let (sin, cos) = angle.sin_cos();
        for coin in &mut self.coins {
            if coin.kind == BodyKind::Coin(CoinColor::Queen) {
                continue;
            }
            let off = coin.home_offset;
            coin.pos = CENTER
                + Vec2::new(off.x * cos - off.y * sin, off.x * sin + off.y * cos);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
