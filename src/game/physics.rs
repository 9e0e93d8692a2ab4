//! Physics Step
//!
//! One fixed-rate integration step: striker translation with sub-stepped
//! coin contacts, friction, wall reflection, pocket capture, and rest
//! detection. The step only moves bodies and records what happened;
//! turn outcomes are applied by the rule engine once motion stops.

use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::board::{self, POCKETS, POCKET_RADIUS, STRIKER_RADIUS};
use crate::game::body::{Body, CoinColor, REST_THRESHOLD};
use crate::game::events::GameEvent;
use crate::game::state::GameState;

/// Per-step velocity retention.
pub const FRICTION: f64 = 0.96;

/// Velocity retention on a wall bounce.
pub const WALL_RESTITUTION: f64 = 0.9;

/// Restitution for body-body contacts.
pub const RESTITUTION: f64 = 0.9;

/// Impacts faster than this are loud enough to report.
pub const AUDIBLE_SPEED: f64 = 3.0;

/// Below this separation the contact normal is meaningless.
pub const CONTACT_EPSILON: f64 = 1e-10;

/// Striker displacement covered per collision sub-step.
const SUBSTEP_DIVISOR: f64 = 4.0;

/// Result of one physics step.
#[derive(Clone, Copy, Debug)]
pub struct StepOutcome {
    /// All motion has stopped (or the striker was captured)
    pub settled: bool,
}

/// Advance the simulation by one fixed step.
pub fn step(state: &mut GameState) -> StepOutcome {
    // Striker capture is checked against its pre-step position. A captured
    // striker ends the shot immediately; leftover coin motion is the rule
    // engine's problem.
    if state.striker.is_active() && state.striker.moving {
        if striker_over_pocket(state.striker.pos) {
            state.striker.pocketed = true;
            state.striker.halt();
            state.push_event(GameEvent::StrikerPocketed);
            debug!("striker captured by pocket");
            return StepOutcome { settled: true };
        }
        move_striker(state);
    }

    move_coins(state);
    resolve_coin_contacts(state);
    clamp_active_bodies(state);
    settle_slow_bodies(state);

    StepOutcome {
        settled: !state.any_motion(),
    }
}

fn striker_over_pocket(pos: Vec2) -> bool {
    POCKETS
        .iter()
        .any(|p| pos.distance(*p) < POCKET_RADIUS + STRIKER_RADIUS / 2.0)
}

/// Translate the striker, resolving coin contacts at sub-step positions
/// so a fast striker cannot pass through a coin between steps.
fn move_striker(state: &mut GameState) {
    let start = state.striker.pos;
    let travel = state.striker.vel;
    let substeps = (travel.max_abs_component() / SUBSTEP_DIVISOR).floor() as u32 + 1;
    let mut events = Vec::new();

    for i in 1..=substeps {
        let t = i as f64 / substeps as f64;
        state.striker.pos = start + travel * t;
        for coin in &mut state.coins {
            if coin.is_active() {
                resolve_pair(&mut state.striker, coin, &mut events);
            }
        }
    }

    // Contacts adjust velocities only; the step's displacement is the
    // velocity captured at its start.
    state.striker.pos = start + travel;
    apply_friction_and_walls(&mut state.striker, &mut events);

    for e in events {
        state.push_event(e);
    }
}

/// Integrate every active coin, then capture any that reached a pocket.
fn move_coins(state: &mut GameState) {
    let mut events = Vec::new();
    let mut captured = Vec::new();

    for (idx, coin) in state.coins.iter_mut().enumerate() {
        if !coin.is_active() {
            continue;
        }
        coin.pos += coin.vel;
        apply_friction_and_walls(coin, &mut events);

        if let Some(pocket) = capturing_pocket(coin) {
            coin.pocketed = true;
            coin.pos = pocket;
            coin.halt();
            captured.push(idx);
        }
    }

    for e in events {
        state.push_event(e);
    }
    for idx in captured {
        record_capture(state, idx);
    }
}

fn capturing_pocket(coin: &Body) -> Option<Vec2> {
    POCKETS
        .iter()
        .copied()
        .find(|p| coin.pos.distance(*p) < POCKET_RADIUS + coin.radius)
}

fn record_capture(state: &mut GameState, idx: usize) {
    let color = match state.coins[idx].color() {
        Some(c) => c,
        None => return,
    };
    state.pocketed_this_turn.push(idx);
    state.push_event(GameEvent::CoinPocketed { color });
    if color == CoinColor::Queen {
        state.queen_pocketed_this_turn = true;
        state.push_event(GameEvent::QueenPocketed);
    }
    debug!(?color, "coin captured by pocket");
}

/// Resolve overlap between every pair of active coins.
fn resolve_coin_contacts(state: &mut GameState) {
    for i in 0..state.coins.len() {
        for j in (i + 1)..state.coins.len() {
            if !state.coins[i].is_active() || !state.coins[j].is_active() {
                continue;
            }
            let (left, right) = state.coins.split_at_mut(j);
            let mut events = Vec::new();
            resolve_pair(&mut left[i], &mut right[0], &mut events);
            for e in events {
                state.push_event(e);
            }
        }
    }
}

/// Impulse response for two overlapping circles.
///
/// Degenerate separations are nudged apart before the normal is taken, so
/// stacked centers never divide by zero. Coin pairs are also separated
/// positionally once an impulse is accepted; striker contacts adjust
/// velocities only, the sub-stepped pass re-samples the striker's path.
fn resolve_pair(a: &mut Body, b: &mut Body, events: &mut Vec<GameEvent>) {
    let mut delta = b.pos - a.pos;
    let min_dist = a.radius + b.radius;
    if delta.length() >= min_dist {
        return;
    }
    if delta.length() < CONTACT_EPSILON {
        delta = Vec2::new(0.1, 0.1);
    }
    let dist = delta.length();
    let normal = delta * (1.0 / dist);

    // The contact cue fires on any overlap, separating or not
    let rel = a.vel - b.vel;
    let impact = rel.x.abs() + rel.y.abs();
    if impact > AUDIBLE_SPEED {
        events.push(GameEvent::BodyCollision { speed: impact });
    }

    // Approach speed along the contact normal
    let closing = rel.dot(normal);
    if closing <= 0.0 {
        return;
    }

    let impulse = (1.0 + RESTITUTION) * closing / (1.0 / a.mass() + 1.0 / b.mass());
    a.vel += -normal * (impulse / a.mass());
    b.vel += normal * (impulse / b.mass());
    a.moving = true;
    b.moving = true;

    if a.color().is_some() && b.color().is_some() {
        let overlap = min_dist - dist;
        a.pos += -normal * (overlap / 2.0);
        b.pos += normal * (overlap / 2.0);
    }
}

/// Friction, then axis-wise wall reflection and clamping.
fn apply_friction_and_walls(body: &mut Body, events: &mut Vec<GameEvent>) {
    body.vel = body.vel * FRICTION;

    let speed = body.speed();
    let min = board::BOUNDARY_MARGIN;
    let max = board::BOARD_SIZE - board::BOUNDARY_MARGIN;
    let mut bounced = false;

    if body.pos.x < min || body.pos.x > max {
        body.vel.x = -body.vel.x * WALL_RESTITUTION;
        bounced = true;
    }
    if body.pos.y < min || body.pos.y > max {
        body.vel.y = -body.vel.y * WALL_RESTITUTION;
        bounced = true;
    }
    body.pos = board::clamp_to_play_area(body.pos);

    if bounced && speed > AUDIBLE_SPEED {
        events.push(GameEvent::EdgeCollision { speed });
    }
}

/// Overlap correction can shove a body past the margin; pull everything
/// back inside before the step result is observed.
fn clamp_active_bodies(state: &mut GameState) {
    if state.striker.is_active() {
        state.striker.pos = board::clamp_to_play_area(state.striker.pos);
    }
    for coin in &mut state.coins {
        if coin.is_active() {
            coin.pos = board::clamp_to_play_area(coin.pos);
        }
    }
}

/// Zero out crawling bodies so the shot can settle.
fn settle_slow_bodies(state: &mut GameState) {
    if state.striker.speed() < REST_THRESHOLD {
        state.striker.halt();
    } else {
        state.striker.moving = true;
    }
    for coin in &mut state.coins {
        if coin.speed() < REST_THRESHOLD {
            coin.halt();
        } else {
            coin.moving = true;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{BOUNDARY_MARGIN, CENTER, COIN_RADIUS};
    use crate::game::body::{CoinColor, COIN_MASS, STRIKER_MASS};

    fn bare_state() -> GameState {
        let mut state = GameState::new(99);
        state.coins.clear();
        state
    }

    #[test]
    fn test_friction_decay() {
        let mut state = bare_state();
        state.striker.pos = Vec2::new(300.0, 300.0);
        state.striker.launch(Vec2::new(10.0, 0.0));

        step(&mut state);
        assert_eq!(state.striker.pos, Vec2::new(310.0, 300.0));
        assert!((state.striker.vel.x - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_wall_bounce_reflects_and_clamps() {
        let mut state = bare_state();
        state.coins.push(Body::coin(
            CoinColor::White,
            Vec2::new(BOUNDARY_MARGIN + 2.0, 300.0),
            Vec2::ZERO,
        ));
        state.coins[0].launch(Vec2::new(-10.0, 0.0));

        step(&mut state);
        let coin = &state.coins[0];
        assert_eq!(coin.pos.x, BOUNDARY_MARGIN);
        // Reflected with wall restitution on top of friction
        assert!((coin.vel.x - 10.0 * FRICTION * WALL_RESTITUTION).abs() < 1e-9);
        assert!(state
            .take_events()
            .iter()
            .any(|e| matches!(e, GameEvent::EdgeCollision { .. })));
    }

    #[test]
    fn test_coin_coin_impulse_equal_masses() {
        let mut state = bare_state();
        state.coins.push(Body::coin(
            CoinColor::White,
            Vec2::new(300.0, 300.0),
            Vec2::ZERO,
        ));
        state.coins.push(Body::coin(
            CoinColor::Black,
            Vec2::new(300.0 + 2.0 * COIN_RADIUS - 0.5, 300.0),
            Vec2::ZERO,
        ));
        state.coins[0].launch(Vec2::new(10.0, 0.0));

        let mut a = state.coins[0].clone();
        let mut b = state.coins[1].clone();
        let mut events = Vec::new();
        resolve_pair(&mut a, &mut b, &mut events);

        // Equal masses share the impulse: 0.95 of the closing speed moves over
        assert!((a.vel.x - 0.5).abs() < 1e-9);
        assert!((b.vel.x - 9.5).abs() < 1e-9);
        // Momentum conserved
        assert!((a.vel.x * COIN_MASS + b.vel.x * COIN_MASS - 10.0 * COIN_MASS).abs() < 1e-9);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::BodyCollision { .. })));
    }

    #[test]
    fn test_striker_coin_impulse_uses_masses() {
        let mut striker = Body::striker(Vec2::new(300.0, 300.0));
        striker.launch(Vec2::new(10.0, 0.0));
        let mut coin = Body::coin(
            CoinColor::Black,
            Vec2::new(300.0 + STRIKER_RADIUS + COIN_RADIUS - 0.5, 300.0),
            Vec2::ZERO,
        );

        let momentum_before = striker.vel.x * STRIKER_MASS + coin.vel.x * COIN_MASS;
        resolve_pair(&mut striker, &mut coin, &mut Vec::new());

        assert!((striker.vel.x - 5.25).abs() < 1e-9);
        assert!((coin.vel.x - 14.25).abs() < 1e-9);
        let momentum_after = striker.vel.x * STRIKER_MASS + coin.vel.x * COIN_MASS;
        assert!((momentum_after - momentum_before).abs() < 1e-9);
    }

    #[test]
    fn test_separating_bodies_ignored() {
        let mut a = Body::coin(CoinColor::White, Vec2::new(300.0, 300.0), Vec2::ZERO);
        let mut b = Body::coin(CoinColor::Black, Vec2::new(320.0, 300.0), Vec2::ZERO);
        a.launch(Vec2::new(-5.0, 0.0));
        b.launch(Vec2::new(5.0, 0.0));

        let mut events = Vec::new();
        resolve_pair(&mut a, &mut b, &mut events);
        // Overlapping but separating: no impulse and no separation push
        assert_eq!(a.vel, Vec2::new(-5.0, 0.0));
        assert_eq!(b.vel, Vec2::new(5.0, 0.0));
        assert_eq!(a.pos, Vec2::new(300.0, 300.0));
        assert_eq!(b.pos, Vec2::new(320.0, 300.0));
        // The scrape is still audible
        assert!(events.contains(&GameEvent::BodyCollision { speed: 10.0 }));
    }

    #[test]
    fn test_striker_contact_leaves_coin_position() {
        let mut striker = Body::striker(Vec2::new(300.0, 300.0));
        striker.launch(Vec2::new(-6.0, 0.0));
        let mut coin = Body::coin(CoinColor::White, Vec2::new(310.0, 300.0), Vec2::ZERO);

        // Separating: the coin must be left completely untouched
        resolve_pair(&mut striker, &mut coin, &mut Vec::new());
        assert_eq!(coin.pos, Vec2::new(310.0, 300.0));
        assert_eq!(coin.vel, Vec2::ZERO);

        // Approaching: velocity responds, positions still do not
        striker.launch(Vec2::new(6.0, 0.0));
        resolve_pair(&mut striker, &mut coin, &mut Vec::new());
        assert_eq!(striker.pos, Vec2::new(300.0, 300.0));
        assert_eq!(coin.pos, Vec2::new(310.0, 300.0));
        assert!(coin.vel.x > 0.0);
    }

    #[test]
    fn test_collision_cue_uses_l1_relative_speed() {
        let mut a = Body::coin(CoinColor::White, Vec2::new(300.0, 300.0), Vec2::ZERO);
        let mut b = Body::coin(CoinColor::Black, Vec2::new(316.0, 312.0), Vec2::ZERO);
        a.launch(Vec2::new(2.0, 2.0));

        let mut events = Vec::new();
        resolve_pair(&mut a, &mut b, &mut events);
        // |dvx| + |dvy| = 4, louder than either component alone
        assert!(events.contains(&GameEvent::BodyCollision { speed: 4.0 }));
    }

    #[test]
    fn test_degenerate_overlap_gets_nudged() {
        let mut a = Body::coin(CoinColor::White, CENTER, Vec2::ZERO);
        let mut b = Body::coin(CoinColor::Black, CENTER, Vec2::ZERO);
        a.launch(Vec2::new(3.0, 0.0));
        b.launch(Vec2::new(-3.0, 0.0));

        resolve_pair(&mut a, &mut b, &mut Vec::new());
        // Centers no longer coincide
        assert!(a.pos.distance(b.pos) > 20.0);
    }

    #[test]
    fn test_fast_striker_does_not_tunnel() {
        let mut state = bare_state();
        state.striker.pos = Vec2::new(150.0, 300.0);
        state.striker.launch(Vec2::new(35.0, 0.0));
        // Coin sits in the middle of this step's travel
        state.coins.push(Body::coin(
            CoinColor::White,
            Vec2::new(170.0, 300.0),
            Vec2::ZERO,
        ));

        step(&mut state);
        // The coin was hit rather than passed through
        assert!(state.coins[0].vel.x > 0.0);
        assert!(state.coins[0].moving);
    }

    #[test]
    fn test_coin_pocket_capture() {
        let mut state = bare_state();
        let pocket = POCKETS[0];
        state.coins.push(Body::coin(
            CoinColor::Black,
            pocket + Vec2::new(POCKET_RADIUS + COIN_RADIUS + 1.0, 0.0),
            Vec2::ZERO,
        ));
        state.coins[0].launch(Vec2::new(-3.0, 0.0));

        step(&mut state);
        assert!(state.coins[0].pocketed);
        assert_eq!(state.pocketed_this_turn, vec![0]);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::CoinPocketed {
            color: CoinColor::Black
        }));
    }

    #[test]
    fn test_queen_capture_sets_flag() {
        let mut state = bare_state();
        state
            .coins
            .push(Body::coin(CoinColor::Queen, POCKETS[2], Vec2::ZERO));
        state.coins[0].launch(Vec2::new(0.1, 0.0));

        step(&mut state);
        assert!(state.queen_pocketed_this_turn);
        assert!(state.take_events().contains(&GameEvent::QueenPocketed));
    }

    #[test]
    fn test_striker_pocket_gate_settles_immediately() {
        let mut state = bare_state();
        state.striker.pos = POCKETS[3] + Vec2::new(POCKET_RADIUS / 2.0, 0.0);
        state.striker.launch(Vec2::new(5.0, 5.0));

        let outcome = step(&mut state);
        assert!(outcome.settled);
        assert!(state.striker.pocketed);
        assert!(state.take_events().contains(&GameEvent::StrikerPocketed));
    }

    #[test]
    fn test_rest_detection() {
        let mut state = bare_state();
        state.striker.launch(Vec2::new(0.45, 0.0));

        let outcome = step(&mut state);
        assert!(outcome.settled);
        assert!(state.striker.at_rest());
        assert!(!state.striker.moving);
    }

    #[test]
    fn test_shot_always_settles() {
        let mut state = GameState::new(4);
        state.striker.launch(Vec2::new(30.0, -25.0));

        let mut settled = false;
        for _ in 0..2000 {
            if step(&mut state).settled {
                settled = true;
                break;
            }
        }
        assert!(settled, "friction must bring every shot to rest");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bodies_stay_in_play_area(
                vx in -35.0f64..35.0,
                vy in -35.0f64..0.0,
                seed in 0u64..1000,
            ) {
                let mut state = GameState::new(seed);
                state.striker.launch(Vec2::new(vx, vy));

                for _ in 0..600 {
                    let outcome = step(&mut state);
                    prop_assert!(board::in_play_area(state.striker.pos)
                        || state.striker.pocketed);
                    for coin in state.coins.iter().filter(|c| c.is_active()) {
                        prop_assert!(board::in_play_area(coin.pos));
                    }
                    if outcome.settled {
                        break;
                    }
                }
            }
        }
    }
}
