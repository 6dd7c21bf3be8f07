//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Snapshots are immutable; every frame builds a new `GameState`
//! - Seeded RNG only
//! - Stable iteration order (plan order, by actor id)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use actor::{
    Actor, ActorKind, ActorTag, Body, Bounce, Cloud, Cookie, Heading, Lightning, Monster, Player,
    WinSpot,
};
pub use collision::Bounds;
pub use level::{ActorSpawn, CellKind, Glyph, Legend, Level, LevelError};
pub use state::{DEFAULT_SEED, GameState, Sprite, Status};
pub use tick::{TickInput, tick};
