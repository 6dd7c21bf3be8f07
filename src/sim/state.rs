//! Game state snapshot
//!
//! A `GameState` is never mutated after it is built: each frame produces a
//! new snapshot that shares the level grid with the previous one.

use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorTag, Player};
use super::level::Level;
use super::tick::{TickInput, tick};
use crate::Vector;
use crate::consts::PICKUPS_PER_LIFE;

/// Outcome state of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Active gameplay
    #[default]
    Playing,
    /// Player reached the win spot
    Won,
    /// Player was electrified or caught
    Lost,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Playing => "playing",
            Status::Won => "won",
            Status::Lost => "lost",
        }
    }

    /// Won and lost are final for the level
    pub fn is_terminal(&self) -> bool {
        *self != Status::Playing
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draw-ready view of one actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub tag: ActorTag,
    pub pos: Vector,
    pub size: Vector,
}

/// Seed used by `GameState::start`
pub const DEFAULT_SEED: u64 = 0;

/// Complete, immutable frame state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    level: Arc<Level>,
    player: Player,
    /// Non-player actors in plan order (collision resolution order)
    actors: Vec<Actor>,
    status: Status,
    pickups: u32,
    life: i32,
}

impl GameState {
    /// Start a level with the default wobble seed
    pub fn start(level: Arc<Level>, pickups: u32, life: i32) -> Self {
        Self::start_seeded(level, pickups, life, DEFAULT_SEED)
    }

    /// Start a level, realizing its spawns into live actors.
    ///
    /// Ids follow plan order; `seed` drives the cookie wobble phases.
    /// Carried pickups beyond `PICKUPS_PER_LIFE` are traded for lives up front
    /// so the counter always starts below the exchange threshold.
    pub fn start_seeded(level: Arc<Level>, pickups: u32, life: i32, seed: u64) -> Self {
        let (pickups, life) = exchange_pickups(pickups, life);
        let mut rng = Pcg32::seed_from_u64(seed);
        let actors = level
            .spawns()
            .iter()
            .zip(1u32..)
            .filter_map(|(spawn, id)| Actor::spawn(id, spawn, &mut rng))
            .collect();

        Self {
            player: Player::spawn(level.player_spawn()),
            level,
            actors,
            status: Status::Playing,
            pickups,
            life,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Shared handle to the level grid
    pub fn level_handle(&self) -> Arc<Level> {
        Arc::clone(&self.level)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: u32) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn pickups(&self) -> u32 {
        self.pickups
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    /// Advance one frame (see `tick`)
    pub fn update(&self, dt: f32, input: &TickInput) -> GameState {
        tick(self, input, dt)
    }

    /// Every actor including the player, player last so it draws on top
    pub fn sprites(&self) -> Vec<Sprite> {
        self.actors
            .iter()
            .map(|a| Sprite {
                tag: a.tag(),
                pos: a.pos(),
                size: a.size(),
            })
            .chain(std::iter::once(Sprite {
                tag: ActorTag::Player,
                pos: self.player.pos,
                size: Player::SIZE,
            }))
            .collect()
    }

    /// Next-frame snapshot with the same status and counters
    pub(crate) fn next_frame(&self, player: Player, actors: Vec<Actor>) -> GameState {
        Self {
            level: Arc::clone(&self.level),
            player,
            actors,
            status: self.status,
            pickups: self.pickups,
            life: self.life,
        }
    }

    pub(crate) fn with_player(self, player: Player) -> Self {
        Self { player, ..self }
    }

    pub(crate) fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }

    pub(crate) fn with_pickups(self, pickups: u32) -> Self {
        Self { pickups, ..self }
    }

    pub(crate) fn with_life(self, life: i32) -> Self {
        Self { life, ..self }
    }

    /// Drop an actor, keeping the survivors' order
    pub(crate) fn without_actor(mut self, id: u32) -> Self {
        self.actors.retain(|a| a.id != id);
        self
    }
}

/// Trade every full set of pickups for a life
pub(crate) fn exchange_pickups(pickups: u32, life: i32) -> (u32, i32) {
    let bonus = i32::try_from(pickups / PICKUPS_PER_LIFE).unwrap_or(i32::MAX);
    (pickups % PICKUPS_PER_LIFE, life.saturating_add(bonus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Body;

    const PLAN: &str = "
        ..........
        .@..o..o..
        .>.|..m.x.
        ##########
    ";

    fn level() -> Arc<Level> {
        Arc::new(Level::parse(PLAN).unwrap())
    }

    #[test]
    fn test_start_realizes_spawns_in_plan_order() {
        let state = GameState::start(level(), 0, 10);
        assert_eq!(state.status(), Status::Playing);
        assert_eq!(state.pickups(), 0);
        assert_eq!(state.life(), 10);
        assert_eq!(state.player().pos, Vector::new(1.0, 0.5));

        let tags: Vec<ActorTag> = state.actors().iter().map(Actor::tag).collect();
        assert_eq!(
            tags,
            vec![
                ActorTag::Cookie,
                ActorTag::Cookie,
                ActorTag::Cloud,
                ActorTag::Lightning,
                ActorTag::Monster,
                ActorTag::WinSpot,
            ]
        );
        let ids: Vec<u32> = state.actors().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_start_trades_carried_pickups() {
        let state = GameState::start(level(), 5, 3);
        assert_eq!(state.pickups(), 1);
        assert_eq!(state.life(), 5);

        let state = GameState::start(level(), 1, 3);
        assert_eq!(state.pickups(), 1);
        assert_eq!(state.life(), 3);
    }

    #[test]
    fn test_seed_controls_wobble() {
        let a = GameState::start_seeded(level(), 0, 1, 7);
        let b = GameState::start_seeded(level(), 0, 1, 7);
        let c = GameState::start_seeded(level(), 0, 1, 8);
        assert_eq!(a.actors(), b.actors());
        assert_ne!(a.actors(), c.actors());

        for actor in a.actors() {
            if let Body::Cookie(cookie) = actor.body {
                assert!((0.0..std::f32::consts::TAU).contains(&cookie.wobble));
            }
        }
    }

    #[test]
    fn test_level_is_shared_between_frames() {
        let state = GameState::start(level(), 0, 3);
        let next = state.update(0.016, &TickInput::default());
        assert!(Arc::ptr_eq(&state.level_handle(), &next.level_handle()));
    }

    #[test]
    fn test_without_actor_keeps_order() {
        let state = GameState::start(level(), 0, 3).without_actor(3);
        let ids: Vec<u32> = state.actors().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 6]);
        assert!(state.actor(3).is_none());
    }

    #[test]
    fn test_sprites_include_player_last() {
        let state = GameState::start(level(), 0, 3);
        let sprites = state.sprites();
        assert_eq!(sprites.len(), state.actors().len() + 1);
        let last = sprites.last().unwrap();
        assert_eq!(last.tag, ActorTag::Player);
        assert_eq!(last.size, Player::SIZE);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(Status::Playing.to_string(), "playing");
        assert!(Status::Won.is_terminal());
        assert!(Status::Lost.is_terminal());
        assert!(!Status::Playing.is_terminal());
    }
}
