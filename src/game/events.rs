//! Game Events
//!
//! Events emitted during simulation for the rendering and audio layers.
//! Speeds are in board units per step so collaborators can scale volume
//! or effects without reaching into the physics.

use serde::{Deserialize, Serialize};

use crate::game::body::CoinColor;
use crate::game::state::PlayerId;

/// Something observable happened on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A body bounced off a wall
    EdgeCollision {
        /// Impact speed before the bounce
        speed: f64,
    },

    /// Two bodies collided
    BodyCollision {
        /// Relative speed along the contact normal
        speed: f64,
    },

    /// A coin fell into a pocket
    CoinPocketed {
        /// Color of the captured coin
        color: CoinColor,
    },

    /// The striker fell into a pocket (a foul)
    StrikerPocketed,

    /// The queen fell into a pocket
    QueenPocketed,

    /// A player covered the queen
    QueenCovered {
        /// Player who now owns the queen
        player: PlayerId,
    },

    /// A foul was committed
    Foul {
        /// Offending player
        player: PlayerId,
    },

    /// The turn was resolved and play continues
    TurnEnded {
        /// Player to act next
        next_player: PlayerId,
    },

    /// The game is over
    GameWon {
        /// Winning player
        player: PlayerId,
    },
}

// =============================================================================
// TESTS
// =============================================================================
