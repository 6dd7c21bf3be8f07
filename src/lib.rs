//! Cloud Hop - a tile-based platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level grid, actors, game state)
//! - `campaign`: Headless level driver (transition delay, level sequencing)
//! - `levels`: Built-in level plans
//! - `settings`: Run configuration

pub mod campaign;
pub mod levels;
pub mod settings;
pub mod sim;

pub use campaign::{Campaign, CampaignError, CampaignPhase, LevelOutcome, LevelRun};
pub use settings::Settings;

/// 2-D point/size value in grid units. `plus` is `+`, `times(k)` is `* k`.
pub type Vector = glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Player horizontal speed while a direction is held (cells/s)
    pub const PLAYER_X_SPEED: f32 = 9.0;
    /// Downward acceleration (cells/s², +y is down)
    pub const GRAVITY: f32 = 25.0;
    /// Upward impulse applied when jumping off a surface
    pub const JUMP_SPEED: f32 = 16.0;

    /// Cloud drift speed
    pub const CLOUD_SPEED: f32 = 5.0;
    /// Bouncing lightning speed
    pub const LIGHTNING_SPEED: f32 = 2.0;
    /// Monster patrol speed
    pub const MONSTER_SPEED: f32 = 1.0;

    /// Cookie wobble phase speed (radians/s)
    pub const WOBBLE_SPEED: f32 = 6.0;
    /// Cookie wobble amplitude (cells)
    pub const WOBBLE_DIST: f32 = 0.1;

    /// Cookies traded in for one extra life
    pub const PICKUPS_PER_LIFE: u32 = 2;

    /// Run defaults
    pub const DEFAULT_START_LIFE: i32 = 10;
    /// Seconds the driver keeps a resolved level on screen
    pub const TRANSITION_DELAY: f32 = 1.0;
    /// Longest frame step fed to the simulation (seconds)
    pub const MAX_FRAME_STEP: f32 = 0.1;
}
