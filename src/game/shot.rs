//! Shot Controller
//!
//! Turns a drag gesture into a striker launch, produces the aim preview
//! for the renderer, and finds a legal striker position on the baseline.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::board::{BASELINE_MAX_X, BASELINE_MIN_X, BOARD_SIZE};
use crate::game::body::Body;

/// Drags shorter than this are treated as accidental taps.
pub const MIN_DRAG_DISTANCE: f64 = 20.0;

/// Drag distance per unit of launch speed.
pub const DRAG_TO_SPEED: f64 = 5.0;

/// Launch speed ceiling.
pub const MAX_SPEED: f64 = 35.0;

/// Aim line length per unit of drag.
const AIM_SCALE: f64 = 2.0;

/// Aim dots stay this far inside the board edges.
const AIM_MARGIN: f64 = 22.0;

/// Spacing between aim preview dots.
const AIM_DOT_SPACING: f64 = 12.0;

/// A committed shot: direction and launch speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Launch direction in radians
    pub angle: f64,
    /// Launch speed in board units per step
    pub speed: f64,
}

impl Shot {
    /// Initial striker velocity for this shot.
    pub fn velocity(&self) -> Vec2 {
        Vec2::from_angle(self.angle) * self.speed
    }
}

/// One dot of the aim preview line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimDot {
    /// Dot center
    pub pos: Vec2,
    /// Dot radius, shrinking along the line
    pub radius: f64,
}

/// An in-progress drag gesture.
///
/// The drag is pulled back from the striker; the shot launches the
/// opposite way, like drawing a slingshot.
#[derive(Clone, Copy, Debug)]
pub struct AimGesture {
    start: Vec2,
}

impl AimGesture {
    /// Begin a drag at the given point.
    pub fn begin(start: Vec2) -> Self {
        Self { start }
    }

    /// Shot that would launch if the drag ended at `current`, if any.
    pub fn shot(&self, current: Vec2) -> Option<Shot> {
        let drag = self.start - current;
        let dist = drag.length();
        if dist < MIN_DRAG_DISTANCE {
            return None;
        }
        Some(Shot {
            angle: drag.angle(),
            speed: (dist / DRAG_TO_SPEED).min(MAX_SPEED),
        })
    }

    /// Preview dots from the striker along the launch direction.
    ///
    /// Dots fade and shrink with distance and are clamped inside the
    /// visible board area.
    pub fn preview(&self, striker_pos: Vec2, current: Vec2) -> Vec<AimDot> {
        let drag = self.start - current;
        if drag.length() < MIN_DRAG_DISTANCE {
            return Vec::new();
        }
        let line_len = drag.length() * AIM_SCALE;
        let dir = drag.normalize();

        let count = (line_len / AIM_DOT_SPACING) as usize;
        let mut dots = Vec::with_capacity(count);
        for i in 1..=count {
            let along = i as f64 * AIM_DOT_SPACING;
            let t = along / line_len;
            let pos = (striker_pos + dir * along)
                .clamp(AIM_MARGIN, BOARD_SIZE - AIM_MARGIN);
            dots.push(AimDot {
                pos,
                radius: (6.0 * (0.8 - t)).max(2.0),
            });
        }
        dots
    }

    /// Finish the gesture, committing the shot if the drag was long enough.
    pub fn release(self, end: Vec2) -> Option<Shot> {
        self.shot(end)
    }
}

/// Nearest legal striker x on the baseline.
///
/// Probes one unit further left and right each iteration and stops as
/// soon as either side is free of coin overlap. When both sides open in
/// the same iteration the strictly nearer one wins, ties going right.
pub fn place_striker(coins: &[Body], target_x: f64) -> f64 {
    let target_x = target_x.clamp(BASELINE_MIN_X, BASELINE_MAX_X);
    if baseline_spot_clear(coins, target_x) {
        return target_x;
    }

    let mut offset = 1.0;
    loop {
        let lx = target_x - offset;
        let rx = target_x + offset;
        let left_ok = lx >= BASELINE_MIN_X && baseline_spot_clear(coins, lx);
        let right_ok = rx <= BASELINE_MAX_X && baseline_spot_clear(coins, rx);

        match (left_ok, right_ok) {
            // Both probes sit at the same offset, so a double hit is a
            // tie, and ties go right
            (_, true) => return rx,
            (true, false) => return lx,
            (false, false) => {
                if lx < BASELINE_MIN_X && rx > BASELINE_MAX_X {
                    // Entire baseline blocked; stay where asked
                    return target_x;
                }
            }
        }
        offset += 1.0;
    }
}

fn baseline_spot_clear(coins: &[Body], x: f64) -> bool {
    use crate::game::board::{STRIKER_BASELINE_Y, STRIKER_RADIUS};
    let pos = Vec2::new(x, STRIKER_BASELINE_Y);
    coins
        .iter()
        .filter(|c| c.is_active())
        .all(|c| c.pos.distance(pos) >= c.radius + STRIKER_RADIUS)
}

// =============================================================================
// TESTS
// =============================================================================
