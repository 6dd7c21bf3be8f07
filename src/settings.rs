//! Run settings
//!
//! Loaded from an optional JSON file; any missing field keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::state::exchange_pickups;

/// Settings for a campaign run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lives at the start of the first level
    pub start_life: i32,
    /// Cookies already collected at the start
    pub start_pickups: u32,
    /// Seconds a resolved level stays up before it is torn down
    pub transition_delay: f32,
    /// Frame steps longer than this are clamped (seconds)
    pub max_frame_step: f32,
    /// Seed for cookie wobble phases
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_life: DEFAULT_START_LIFE,
            start_pickups: 0,
            transition_delay: TRANSITION_DELAY,
            max_frame_step: MAX_FRAME_STEP,
            seed: 0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values the driver cannot work with
    pub fn sanitized(mut self) -> Self {
        if self.max_frame_step.is_nan() || self.max_frame_step <= 0.0 {
            self.max_frame_step = MAX_FRAME_STEP;
        }
        if self.transition_delay.is_nan() || self.transition_delay < 0.0 {
            self.transition_delay = 0.0;
        }
        (self.start_pickups, self.start_life) =
            exchange_pickups(self.start_pickups, self.start_life);
        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}
