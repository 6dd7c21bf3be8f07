//! Movable actors and their per-frame contracts
//!
//! Every actor exposes `update` (its value for the next frame, computed from
//! the previous frame's state) and, apart from the player, `collide` (the
//! effect of overlapping the player). Both return new values; nothing is
//! mutated in place.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use super::level::{ActorSpawn, CellKind, Level};
use super::state::{GameState, Status};
use super::tick::TickInput;
use crate::Vector;
use crate::consts::*;

/// Cloud drift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

/// Lightning motion pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bounce {
    Still,
    Horizontal,
    Vertical,
}

/// Spawnable actor kinds, including the sub-variant picked by the plan glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Cloud(Heading),
    Lightning(Bounce),
    Monster,
    Cookie,
    WinSpot,
}

/// Type tag exposed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorTag {
    Player,
    Cloud,
    Lightning,
    Monster,
    Cookie,
    WinSpot,
}

impl ActorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorTag::Player => "player",
            ActorTag::Cloud => "cloud",
            ActorTag::Lightning => "lightning",
            ActorTag::Monster => "monster",
            ActorTag::Cookie => "cookie",
            ActorTag::WinSpot => "win_spot",
        }
    }
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vector,
    pub speed: Vector,
}

impl Player {
    pub const SIZE: Vector = Vector::new(0.8, 1.0);

    /// Player spawned at a plan cell, lifted half a cell so it stands on the
    /// cell's bottom edge.
    pub fn spawn(cell: Vector) -> Self {
        Self {
            pos: cell + Vector::new(0.0, -0.5),
            speed: Vector::ZERO,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, Self::SIZE)
    }

    /// Advance the player one frame against the previous frame's state
    pub fn update(&self, dt: f32, state: &GameState, input: &TickInput) -> Player {
        let bounds = self.bounds();
        let cloud = state.actors().iter().find_map(|actor| match &actor.body {
            Body::Cloud(cloud) if cloud.bounds().overlaps(&bounds) => Some(cloud),
            _ => None,
        });

        let mut x_speed = 0.0;
        if input.move_left {
            x_speed -= PLAYER_X_SPEED;
        }
        if input.move_right {
            x_speed += PLAYER_X_SPEED;
        }
        if let Some(cloud) = cloud {
            x_speed += cloud.speed.x;
        }

        let level = state.level();
        let mut pos = self.pos;
        let moved_x = pos + Vector::new(x_speed * dt, 0.0);
        if !level.touches(moved_x, Self::SIZE, CellKind::Wall) {
            pos = moved_x;
        }

        // Riding a cloud at its own height: no gravity this frame
        let mut y_speed = match cloud {
            Some(cloud) if self.pos.y == cloud.pos.y => self.speed.y,
            _ => self.speed.y + dt * GRAVITY,
        };
        let moved_y = pos + Vector::new(0.0, y_speed * dt);
        if !level.touches(moved_y, Self::SIZE, CellKind::Wall) {
            pos = moved_y;
        } else if input.jump && y_speed > 0.0 {
            y_speed = -JUMP_SPEED;
        } else {
            y_speed = 0.0;
        }

        Player {
            pos,
            speed: Vector::new(x_speed, y_speed),
        }
    }
}

/// Drifting platform that wraps around the level horizontally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vector,
    pub speed: Vector,
}

impl Cloud {
    pub const SIZE: Vector = Vector::ONE;

    pub fn spawn(cell: Vector, heading: Heading) -> Self {
        let speed = match heading {
            Heading::Left => -CLOUD_SPEED,
            Heading::Right => CLOUD_SPEED,
        };
        Self {
            pos: cell,
            speed: Vector::new(speed, 0.0),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, Self::SIZE)
    }

    pub fn update(&self, dt: f32, level: &Level) -> Cloud {
        let new_pos = self.pos + self.speed * dt;
        let width = level.width() as f32;
        let pos = if new_pos.x > width {
            Vector::new(0.0, self.pos.y)
        } else if new_pos.x < 0.0 {
            Vector::new(width, self.pos.y)
        } else {
            new_pos
        };
        Cloud { pos, ..*self }
    }

    /// A player above the cloud stops falling
    pub fn collide(&self, state: GameState) -> GameState {
        let player = *state.player();
        if player.pos.y < self.pos.y {
            state.with_player(Player {
                speed: Vector::new(player.speed.x, 0.0),
                ..player
            })
        } else {
            state
        }
    }
}

/// Electrified hazard; bounces off walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lightning {
    pub pos: Vector,
    pub speed: Vector,
}

impl Lightning {
    pub const SIZE: Vector = Vector::ONE;

    pub fn spawn(cell: Vector, bounce: Bounce) -> Self {
        let speed = match bounce {
            Bounce::Still => Vector::ZERO,
            Bounce::Horizontal => Vector::new(LIGHTNING_SPEED, 0.0),
            Bounce::Vertical => Vector::new(0.0, LIGHTNING_SPEED),
        };
        Self { pos: cell, speed }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, Self::SIZE)
    }

    pub fn update(&self, dt: f32, level: &Level) -> Lightning {
        let (pos, speed) = bounce_off_walls(self.pos, self.speed, Self::SIZE, dt, level);
        Lightning { pos, speed }
    }

    pub fn collide(&self, state: GameState) -> GameState {
        log::debug!("Player hit lightning at {:?}", self.pos);
        state.with_status(Status::Lost)
    }
}

/// Patrolling monster; can be stomped from above
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vector,
    pub speed: Vector,
}

impl Monster {
    pub const SIZE: Vector = Vector::new(1.0, 1.5);

    pub fn spawn(cell: Vector) -> Self {
        Self {
            pos: cell + Vector::new(0.0, -1.0),
            speed: Vector::new(MONSTER_SPEED, 0.0),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, Self::SIZE)
    }

    pub fn update(&self, dt: f32, level: &Level) -> Monster {
        let (pos, speed) = bounce_off_walls(self.pos, self.speed, Self::SIZE, dt, level);
        Monster { pos, speed }
    }

    /// Bounce the player vertically; a stomp from above removes the monster
    /// and grants a life, anything else costs a life and the level.
    pub fn collide(&self, id: u32, state: GameState) -> GameState {
        let player = *state.player();
        let life = state.life();
        let state = state.with_player(Player {
            speed: Vector::new(player.speed.x, -player.speed.y),
            ..player
        });

        if player.pos.y < self.pos.y {
            log::debug!("Monster {} stomped", id);
            state.without_actor(id).with_life(life + 1)
        } else {
            log::debug!("Player caught by monster {}", id);
            state.with_life(life - 1).with_status(Status::Lost)
        }
    }
}

/// Collectible cookie bobbing around a fixed base position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub base_pos: Vector,
    /// Wobble phase (radians)
    pub wobble: f32,
}

impl Cookie {
    pub const SIZE: Vector = Vector::new(0.7, 0.7);

    pub fn spawn(cell: Vector, wobble: f32) -> Self {
        Self {
            base_pos: cell + Vector::new(0.2, 0.1),
            wobble,
        }
    }

    /// Displayed position: base offset vertically by the wobble
    pub fn pos(&self) -> Vector {
        self.base_pos + Vector::new(0.0, self.wobble.sin() * WOBBLE_DIST)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos(), Self::SIZE)
    }

    pub fn update(&self, dt: f32) -> Cookie {
        Cookie {
            wobble: self.wobble + dt * WOBBLE_SPEED,
            ..*self
        }
    }

    /// Collect the cookie; every `PICKUPS_PER_LIFE` cookies trade for a life
    pub fn collide(&self, id: u32, state: GameState) -> GameState {
        let mut pickups = state.pickups() + 1;
        let mut life = state.life();
        if pickups >= PICKUPS_PER_LIFE {
            pickups = 0;
            life += 1;
        }
        state
            .without_actor(id)
            .with_pickups(pickups)
            .with_life(life)
    }
}

/// Level exit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinSpot {
    pub pos: Vector,
}

impl WinSpot {
    pub const SIZE: Vector = Vector::new(2.0, 2.0);

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, Self::SIZE)
    }

    pub fn collide(&self, state: GameState) -> GameState {
        state.with_status(Status::Won)
    }
}

/// Variant payload of a non-player actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Body {
    Cloud(Cloud),
    Lightning(Lightning),
    Monster(Monster),
    Cookie(Cookie),
    WinSpot(WinSpot),
}

/// A non-player actor with a stable id (assigned in plan order)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pub body: Body,
}

impl Actor {
    /// Realize a level spawn. Returns `None` for the player spawn, which the
    /// game state owns separately.
    pub fn spawn<R: Rng>(id: u32, spawn: &ActorSpawn, rng: &mut R) -> Option<Actor> {
        let cell = spawn.pos;
        let body = match spawn.kind {
            ActorKind::Player => return None,
            ActorKind::Cloud(heading) => Body::Cloud(Cloud::spawn(cell, heading)),
            ActorKind::Lightning(bounce) => Body::Lightning(Lightning::spawn(cell, bounce)),
            ActorKind::Monster => Body::Monster(Monster::spawn(cell)),
            ActorKind::Cookie => Body::Cookie(Cookie::spawn(cell, rng.random_range(0.0..TAU))),
            ActorKind::WinSpot => Body::WinSpot(WinSpot { pos: cell }),
        };
        Some(Actor { id, body })
    }

    pub fn tag(&self) -> ActorTag {
        match self.body {
            Body::Cloud(_) => ActorTag::Cloud,
            Body::Lightning(_) => ActorTag::Lightning,
            Body::Monster(_) => ActorTag::Monster,
            Body::Cookie(_) => ActorTag::Cookie,
            Body::WinSpot(_) => ActorTag::WinSpot,
        }
    }

    pub fn pos(&self) -> Vector {
        match &self.body {
            Body::Cloud(c) => c.pos,
            Body::Lightning(l) => l.pos,
            Body::Monster(m) => m.pos,
            Body::Cookie(c) => c.pos(),
            Body::WinSpot(w) => w.pos,
        }
    }

    pub fn size(&self) -> Vector {
        match self.body {
            Body::Cloud(_) => Cloud::SIZE,
            Body::Lightning(_) => Lightning::SIZE,
            Body::Monster(_) => Monster::SIZE,
            Body::Cookie(_) => Cookie::SIZE,
            Body::WinSpot(_) => WinSpot::SIZE,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos(), self.size())
    }

    /// Value of this actor for the next frame
    pub fn update(&self, dt: f32, state: &GameState) -> Actor {
        let level = state.level();
        let body = match &self.body {
            Body::Cloud(c) => Body::Cloud(c.update(dt, level)),
            Body::Lightning(l) => Body::Lightning(l.update(dt, level)),
            Body::Monster(m) => Body::Monster(m.update(dt, level)),
            Body::Cookie(c) => Body::Cookie(c.update(dt)),
            Body::WinSpot(w) => Body::WinSpot(*w),
        };
        Actor { id: self.id, body }
    }

    /// Apply this actor's effect on overlapping the player
    pub fn collide(&self, state: GameState) -> GameState {
        match &self.body {
            Body::Cloud(c) => c.collide(state),
            Body::Lightning(l) => l.collide(state),
            Body::Monster(m) => m.collide(self.id, state),
            Body::Cookie(c) => c.collide(self.id, state),
            Body::WinSpot(w) => w.collide(state),
        }
    }
}

/// Constant-velocity move that reverses the velocity instead of entering a
/// wall. The position is kept on the bouncing frame.
fn bounce_off_walls(
    pos: Vector,
    speed: Vector,
    size: Vector,
    dt: f32,
    level: &Level,
) -> (Vector, Vector) {
    let new_pos = pos + speed * dt;
    if level.touches(new_pos, size, CellKind::Wall) {
        (pos, -speed)
    } else {
        (new_pos, speed)
    }
}
