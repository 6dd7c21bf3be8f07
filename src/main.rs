//! Cloud Hop entry point
//!
//! Plays the built-in campaign headlessly with a simple autopilot and prints
//! a JSON report. Usage: `cloud-hop [settings.json]`

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use cloud_hop::sim::{Body, CellKind, GameState, Player, TickInput};
use cloud_hop::{Campaign, CampaignPhase, Settings, Vector, levels};

/// Simulated frame rate of the headless driver
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a level after this many frames (two simulated minutes)
const MAX_FRAMES_PER_LEVEL: u32 = 120 * 60;
/// Give up on the whole run after this many level attempts
const MAX_ATTEMPTS: u32 = 50;

#[derive(Debug, Serialize)]
struct Report {
    phase: CampaignPhase,
    levels_won: usize,
    level_count: usize,
    attempts: u32,
    life: i32,
    pickups: u32,
    frames: u64,
}

/// Head for the win spot, or the nearest cookie if there is none.
/// Jumps when a wall is in the way or the target is above.
fn autopilot(state: &GameState) -> TickInput {
    let player = state.player();
    let target = state
        .actors()
        .iter()
        .find_map(|a| match a.body {
            Body::WinSpot(w) => Some(w.pos),
            _ => None,
        })
        .or_else(|| {
            state
                .actors()
                .iter()
                .filter(|a| matches!(a.body, Body::Cookie(_)))
                .map(|a| a.pos())
                .min_by(|a, b| {
                    a.distance_squared(player.pos)
                        .partial_cmp(&b.distance_squared(player.pos))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

    let Some(target) = target else {
        return TickInput::default();
    };

    let dx = target.x - player.pos.x;
    let step = Vector::new(dx.signum() * 0.5, 0.0);
    let blocked = state
        .level()
        .touches(player.pos + step, Player::SIZE, CellKind::Wall);

    TickInput {
        move_left: dx < -0.1,
        move_right: dx > 0.1,
        jump: blocked || target.y + 0.5 < player.pos.y,
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Cloud Hop (headless) starting...");

    let settings = std::env::args()
        .nth(1)
        .map(|path| Settings::load(Path::new(&path)))
        .unwrap_or_default();

    let mut campaign = match Campaign::from_plans(levels::PLANS, settings) {
        Ok(campaign) => campaign,
        Err(err) => {
            log::error!("Failed to build campaign: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut attempts = 0;
    let mut frames: u64 = 0;
    while let Some(mut run) = campaign.start_level() {
        if attempts >= MAX_ATTEMPTS {
            log::warn!("Giving up after {} attempts", attempts);
            break;
        }
        attempts += 1;

        let mut outcome = None;
        for _ in 0..MAX_FRAMES_PER_LEVEL {
            frames += 1;
            let input = autopilot(run.state());
            if let Some(done) = run.frame(FRAME_DT, &input) {
                outcome = Some(done);
                break;
            }
        }

        match outcome {
            Some(outcome) => {
                campaign.record(outcome);
            }
            None => {
                log::warn!(
                    "Level {} did not resolve within {} frames",
                    campaign.level_index() + 1,
                    MAX_FRAMES_PER_LEVEL
                );
                break;
            }
        }
    }

    let report = Report {
        phase: campaign.phase(),
        levels_won: campaign.level_index(),
        level_count: campaign.level_count(),
        attempts,
        life: campaign.life(),
        pickups: campaign.pickups(),
        frames,
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Failed to serialize report: {}", err);
            ExitCode::FAILURE
        }
    }
}
