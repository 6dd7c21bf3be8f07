//! Per-frame simulation step
//!
//! Advances a `GameState` by one variable-length frame.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, Player};
use super::level::CellKind;
use super::state::{GameState, Status};

/// Held keys for a single frame (read-only to the simulation)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

/// Compute the next frame.
///
/// 1. Resolved levels are frozen and returned unchanged.
/// 2. Every actor (player included) updates against the *previous* state.
/// 3. A player touching a hazard cell loses immediately.
/// 4. Otherwise each actor overlapping the updated player applies its
///    `collide` effect, in actor order, each seeing the previous effects.
pub fn tick(state: &GameState, input: &TickInput, dt: f32) -> GameState {
    if state.status().is_terminal() {
        return state.clone();
    }

    let player = state.player().update(dt, state, input);
    let actors: Vec<Actor> = state.actors().iter().map(|a| a.update(dt, state)).collect();

    if state.level().touches(player.pos, Player::SIZE, CellKind::Hazard) {
        log::debug!("Player touched a hazard cell at {:?}", player.pos);
        return state.next_frame(player, actors).with_status(Status::Lost);
    }

    let bounds = player.bounds();
    let hits: Vec<Actor> = actors
        .iter()
        .filter(|a| a.bounds().overlaps(&bounds))
        .copied()
        .collect();

    let next = hits
        .iter()
        .fold(state.next_frame(player, actors), |next, actor| actor.collide(next));

    if next.status().is_terminal() {
        log::debug!(
            "Level resolved: {} (pickups {}, life {})",
            next.status(),
            next.pickups(),
            next.life()
        );
    }
    next
}
