//! Rigid Bodies
//!
//! The striker and the coins share one body model. A body is a circle
//! with a position, a velocity, and capture bookkeeping.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::board::{COIN_RADIUS, STRIKER_RADIUS};

/// Motion below this speed is treated as rest.
pub const REST_THRESHOLD: f64 = 0.5;

/// Mass of the striker.
pub const STRIKER_MASS: f64 = 15.0;

/// Mass of each coin.
pub const COIN_MASS: f64 = 5.0;

/// Color of a coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinColor {
    /// First player's coins
    White,
    /// Second player's coins
    Black,
    /// The queen (red in save files and on the board art)
    #[serde(rename = "red")]
    Queen,
}

impl CoinColor {
    /// Whether this color belongs to a player (the queen belongs to neither).
    pub fn is_player_color(self) -> bool {
        !matches!(self, CoinColor::Queen)
    }
}

/// What kind of body this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// The striker
    Striker,
    /// A coin of the given color
    Coin(CoinColor),
}

/// A circular rigid body on the board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Body {
    /// Striker or coin
    pub kind: BodyKind,
    /// Center position
    pub pos: Vec2,
    /// Velocity in board units per step
    pub vel: Vec2,
    /// Circle radius
    pub radius: f64,
    /// Set while the body is in motion
    pub moving: bool,
    /// Set once the body has fallen into a pocket
    pub pocketed: bool,
    /// Offset from the queen in the starting formation, kept for the
    /// pre-game setup rotation
    pub home_offset: Vec2,
}

impl Body {
    /// Create a striker at rest at the given position.
    pub fn striker(pos: Vec2) -> Self {
        Self {
            kind: BodyKind::Striker,
            pos,
            vel: Vec2::ZERO,
            radius: STRIKER_RADIUS,
            moving: false,
            pocketed: false,
            home_offset: Vec2::ZERO,
        }
    }

    /// Create a coin at rest at the given position.
    pub fn coin(color: CoinColor, pos: Vec2, home_offset: Vec2) -> Self {
        Self {
            kind: BodyKind::Coin(color),
            pos,
            vel: Vec2::ZERO,
            radius: COIN_RADIUS,
            moving: false,
            pocketed: false,
            home_offset,
        }
    }

    /// Color of this body, if it is a coin.
    pub fn color(&self) -> Option<CoinColor> {
        match self.kind {
            BodyKind::Coin(color) => Some(color),
            BodyKind::Striker => None,
        }
    }

    /// Body mass for impulse resolution.
    pub fn mass(&self) -> f64 {
        match self.kind {
            BodyKind::Striker => STRIKER_MASS,
            BodyKind::Coin(_) => COIN_MASS,
        }
    }

    /// Still on the board (not pocketed).
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.pocketed
    }

    /// Current speed in board units per step.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Whether the body counts as stationary.
    #[inline]
    pub fn at_rest(&self) -> bool {
        self.speed() < REST_THRESHOLD
    }

    /// Set velocity and mark the body as moving.
    pub fn launch(&mut self, vel: Vec2) {
        self.vel = vel;
        self.moving = true;
    }

    /// Zero the velocity and clear the moving flag.
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
        self.moving = false;
    }
}

// =============================================================================
// TESTS
// =============================================================================
