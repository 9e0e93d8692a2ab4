//! Turn Rule Engine
//!
//! Applies the turn outcome once all motion has stopped: queen return
//! and covering, foul penalties, the last-coin rule, hand-off rotation,
//! and the win check. The resolution order is load-bearing; several
//! rules read flags that earlier rules clear.

use tracing::info;

use crate::core::vec2::Vec2;
use crate::game::board::{CENTER, COIN_RADIUS, STRIKER_BASELINE_Y};
use crate::game::events::GameEvent;
use crate::game::state::{GameState, PlayerId, TurnPhase, COINS_PER_PLAYER};

/// Resolve the settled turn and hand the board to whoever acts next.
///
/// `forced_foul` marks a timeout: treated exactly like a pocketed
/// striker with no score.
pub fn resolve_turn(state: &mut GameState, forced_foul: bool) {
    state.phase = TurnPhase::Resolving;

    let player = state.current_player;
    let own_color = state.players[player as usize].color;
    let own_pocketed: Vec<usize> = state
        .pocketed_this_turn
        .iter()
        .copied()
        .filter(|&i| state.coins[i].color() == Some(own_color))
        .collect();
    let scored = !own_pocketed.is_empty();
    let foul = state.striker.pocketed || forced_foul;

    // A queen pocketed before the player has opened their account goes
    // straight back, capture and carry both forgotten.
    if state.queen_pocketed_this_turn && state.score_of(player) == 0 {
        state.return_queen_to_center();
        state.queen_pocketed_this_turn = false;
        state.queen_carry = false;
    }

    // Cover-within-next-shot: a carried queen is either covered by a
    // score this turn or returned to the board.
    if state.queen_carry && !scored {
        state.return_queen_to_center();
        state.queen_carry = false;
    } else if state.queen_carry && scored {
        state.players[player as usize].queen_covered = true;
        state.queen_carry = false;
        state.push_event(GameEvent::QueenCovered { player });
        info!(player, "queen covered");
    }

    // A queen that survived the return above awaits cover next turn
    if state.queen_pocketed_this_turn {
        state.queen_carry = true;
    }
    let queen_this_turn = state.queen_pocketed_this_turn;

    if foul {
        apply_foul(state, player, &own_pocketed);
    }

    remember_last_pocketed(state);
    apply_last_coin_rule(state, player);

    state.purge_pocketed();
    state.pocketed_this_turn.clear();
    state.queen_pocketed_this_turn = false;
    reset_striker(state);

    // Hand-off: a turn with neither a score nor a queen passes play on,
    // flipping the board so both players shoot from the same baseline
    if !scored && !queen_this_turn {
        state.rotate_board_180();
        state.current_player = state.opponent();
    }
    state.push_event(GameEvent::TurnEnded {
        next_player: state.current_player,
    });

    if let Some(winner) = winner(state) {
        state.phase = TurnPhase::GameOver;
        state.push_event(GameEvent::GameWon { player: winner });
        info!(winner, "game over");
        return;
    }
    state.phase = TurnPhase::AwaitingShot;
}

/// Foul penalty: a co-occurring legal score sends the extra coin back to
/// the exact center; otherwise one own coin re-enters near center,
/// provided the player has any pocketed at all.
fn apply_foul(state: &mut GameState, player: PlayerId, own_pocketed: &[usize]) {
    state.halt_all();
    state.push_event(GameEvent::Foul { player });
    info!(player, "foul");

    if let Some(&idx) = own_pocketed.last() {
        let coin = &mut state.coins[idx];
        coin.pocketed = false;
        coin.pos = CENTER;
        coin.halt();
    } else {
        let own_color = state.players[player as usize].color;
        if state.active_count(own_color) < COINS_PER_PLAYER {
            state.place_penalty_coin(own_color);
        }
    }
}

/// Track each player's most recently pocketed coin that stayed pocketed.
fn remember_last_pocketed(state: &mut GameState) {
    for i in 0..state.pocketed_this_turn.len() {
        let idx = state.pocketed_this_turn[i];
        let coin = state.coins[idx].clone();
        if !coin.pocketed {
            continue; // restored by a foul penalty
        }
        for side in &mut state.players {
            if coin.color() == Some(side.color) {
                side.last_pocketed = Some(coin.clone());
            }
        }
    }
}

/// While the queen is on the board and nobody has covered it, a player
/// may not run out of coins; their last pocketed coin re-enters so a
/// final queen attempt stays possible.
fn apply_last_coin_rule(state: &mut GameState, player: PlayerId) {
    let own_color = state.players[player as usize].color;
    let queen_unclaimed =
        !state.players[0].queen_covered && !state.players[1].queen_covered;

    if state.active_count(own_color) == 0 && state.queen_on_board() && queen_unclaimed {
        if let Some(mut coin) = state.players[player as usize].last_pocketed.take() {
            let spot = state.open_spot_near_center(2.0 * COIN_RADIUS);
            coin.pocketed = false;
            coin.pos = spot;
            coin.halt();
            state.coins.push(coin);
        }
    }
}

fn reset_striker(state: &mut GameState) {
    state.striker.pocketed = false;
    state.striker.pos = Vec2::new(CENTER.x, STRIKER_BASELINE_Y);
    state.striker.halt();
}

/// A score of nine wins, unless the queen is pending cover with nobody
/// having claimed it yet.
fn winner(state: &GameState) -> Option<PlayerId> {
    let queen_resolved = state.players[0].queen_covered
        || state.players[1].queen_covered
        || !state.queen_carry;
    if !queen_resolved {
        return None;
    }
    [state.current_player, state.opponent()]
        .into_iter()
        .find(|&p| state.score_of(p) == COINS_PER_PLAYER)
}

// =============================================================================
// TESTS
// =============================================================================
