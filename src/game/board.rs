//! Board Geometry
//!
//! Static board layout: dimensions, pockets, striker baseline, and the
//! starting coin formation. All distances are in board units with the
//! origin at the top-left corner and +Y pointing down.

use crate::core::vec2::Vec2;

/// Side length of the square board.
pub const BOARD_SIZE: f64 = 600.0;

/// Radius of every coin, queen included.
pub const COIN_RADIUS: f64 = 12.0;

/// Radius of the striker.
pub const STRIKER_RADIUS: f64 = 15.0;

/// Capture radius of each corner pocket.
pub const POCKET_RADIUS: f64 = 12.0;

/// Board center point.
pub const CENTER: Vec2 = Vec2::new(BOARD_SIZE / 2.0, BOARD_SIZE / 2.0);

/// Radius of the center circle, used when returning coins to play.
pub const CENTER_CIRCLE_RADIUS: f64 = 60.0;

/// Inset of the playable region from each wall.
pub const BOUNDARY_MARGIN: f64 = STRIKER_RADIUS + 29.0;

/// Y coordinate of the acting player's striker baseline.
pub const STRIKER_BASELINE_Y: f64 = BOARD_SIZE - 117.0;

/// Leftmost striker center on the baseline.
pub const BASELINE_MIN_X: f64 = STRIKER_RADIUS + 126.0;

/// Rightmost striker center on the baseline.
pub const BASELINE_MAX_X: f64 = BOARD_SIZE - STRIKER_RADIUS - 127.0;

/// Corner pocket centers. Slightly asymmetric on purpose; they match the
/// inlaid pocket artwork rather than the exact board corners.
pub const POCKETS: [Vec2; 4] = [
    Vec2::new(45.0, 48.0),
    Vec2::new(550.0, 50.0),
    Vec2::new(48.0, 548.0),
    Vec2::new(548.0, 548.0),
];

/// Gap between adjacent coin centers in the starting formation.
const FORMATION_SPACING: f64 = 2.0 * COIN_RADIUS + 2.0;

/// Clamp a position to the playable region.
#[inline]
pub fn clamp_to_play_area(pos: Vec2) -> Vec2 {
    pos.clamp(BOUNDARY_MARGIN, BOARD_SIZE - BOUNDARY_MARGIN)
}

/// Whether a position lies inside the playable region.
#[inline]
pub fn in_play_area(pos: Vec2) -> bool {
    pos.x >= BOUNDARY_MARGIN
        && pos.x <= BOARD_SIZE - BOUNDARY_MARGIN
        && pos.y >= BOUNDARY_MARGIN
        && pos.y <= BOARD_SIZE - BOUNDARY_MARGIN
}

/// Mirror a point through the board center (180 degree rotation).
#[inline]
pub fn rotate_180(pos: Vec2) -> Vec2 {
    Vec2::new(BOARD_SIZE - pos.x, BOARD_SIZE - pos.y)
}

/// Offsets of the 18 ring coins from the queen in the starting formation.
///
/// Two hexagonal rings around the center: six lattice directions at
/// 30, 90, ..., 330 degrees, each ring walked from the bottom vertex.
/// Colors alternate over the generated sequence, so even indices are
/// one player's coins and odd indices the other's.
pub fn formation_offsets() -> Vec<Vec2> {
    let base = 30.0_f64.to_radians();
    let directions: Vec<Vec2> = (0..6)
        .map(|i| Vec2::from_angle(base + (i as f64) * 60.0_f64.to_radians()))
        .collect();

    let mut offsets = Vec::with_capacity(18);
    for layer in 1..=2 {
        let mut pos = directions[4] * (FORMATION_SPACING * layer as f64);
        for dir in &directions {
            for _ in 0..layer {
                offsets.push(pos);
                pos += *dir * FORMATION_SPACING;
            }
        }
    }
    offsets
}

// =============================================================================
// TESTS
// =============================================================================
