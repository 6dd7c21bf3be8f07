//! Headless level driver
//!
//! `LevelRun` plays one level frame by frame and keeps a resolved level
//! around for a short transition before reporting its outcome. `Campaign`
//! sequences levels and carries lives and cookies between them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Settings;
use crate::sim::{GameState, Level, LevelError, Status, TickInput};

/// Final report of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOutcome {
    pub status: Status,
    pub pickups: u32,
    pub life: i32,
}

/// One level in progress
#[derive(Debug, Clone)]
pub struct LevelRun {
    state: GameState,
    /// Transition time left once the level is resolved
    ending: f32,
    max_frame_step: f32,
}

impl LevelRun {
    pub fn new(level: Arc<Level>, pickups: u32, life: i32, settings: &Settings) -> Self {
        Self {
            state: GameState::start_seeded(level, pickups, life, settings.seed),
            ending: settings.transition_delay,
            max_frame_step: settings.max_frame_step,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Advance one frame. Returns the outcome once the level is resolved and
    /// its transition delay has run out.
    pub fn frame(&mut self, dt: f32, input: &TickInput) -> Option<LevelOutcome> {
        let dt = dt.max(0.0).min(self.max_frame_step);
        self.state = self.state.update(dt, input);

        if self.state.is_playing() {
            return None;
        }
        if self.ending > 0.0 {
            self.ending -= dt;
            return None;
        }
        Some(LevelOutcome {
            status: self.state.status(),
            pickups: self.state.pickups(),
            life: self.state.life(),
        })
    }
}

/// Campaign progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignPhase {
    InProgress,
    /// Every level won
    Victory,
    /// Out of lives
    Defeat,
}

/// Errors raised while building a campaign
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("campaign has no levels")]
    NoLevels,

    #[error("level {index}: {source}")]
    Level {
        index: usize,
        #[source]
        source: LevelError,
    },
}

/// Ordered levels plus the lives and cookies carried between them
#[derive(Debug, Clone)]
pub struct Campaign {
    levels: Vec<Arc<Level>>,
    index: usize,
    life: i32,
    pickups: u32,
    settings: Settings,
}

impl Campaign {
    pub fn new(levels: Vec<Arc<Level>>, settings: Settings) -> Result<Self, CampaignError> {
        if levels.is_empty() {
            return Err(CampaignError::NoLevels);
        }
        Ok(Self {
            levels,
            index: 0,
            life: settings.start_life,
            pickups: settings.start_pickups,
            settings,
        })
    }

    /// Parse every plan up front so a bad level fails before play starts
    pub fn from_plans(plans: &[&str], settings: Settings) -> Result<Self, CampaignError> {
        let levels = plans
            .iter()
            .enumerate()
            .map(|(index, plan)| {
                Level::parse(plan)
                    .map(Arc::new)
                    .map_err(|source| CampaignError::Level { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels, settings)
    }

    pub fn phase(&self) -> CampaignPhase {
        if self.life <= 0 {
            CampaignPhase::Defeat
        } else if self.index >= self.levels.len() {
            CampaignPhase::Victory
        } else {
            CampaignPhase::InProgress
        }
    }

    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn pickups(&self) -> u32 {
        self.pickups
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run for the current level, or `None` once the campaign is over
    pub fn start_level(&self) -> Option<LevelRun> {
        if self.phase() != CampaignPhase::InProgress {
            return None;
        }
        let level = Arc::clone(&self.levels[self.index]);
        Some(LevelRun::new(level, self.pickups, self.life, &self.settings))
    }

    /// Fold a finished level into the campaign.
    ///
    /// A win carries lives and cookies to the next level; a loss retries the
    /// same level with one life fewer.
    pub fn record(&mut self, outcome: LevelOutcome) -> CampaignPhase {
        match outcome.status {
            Status::Won => {
                self.pickups = outcome.pickups;
                self.life = outcome.life;
                self.index += 1;
                log::info!(
                    "Level {} won ({} lives, {} cookies)",
                    self.index,
                    self.life,
                    self.pickups
                );
            }
            Status::Lost => {
                self.pickups = outcome.pickups;
                self.life = outcome.life - 1;
                log::info!("Level {} lost, lives left: {}", self.index + 1, self.life);
            }
            Status::Playing => {
                log::warn!("Ignoring outcome of an unresolved level");
            }
        }
        self.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIN_NOW: &str = "x...\n.@..\n....\n####";
    const LOSE_NOW: &str = "....\n.@..\n.!..\n####";

    fn settings() -> Settings {
        Settings {
            start_life: 2,
            transition_delay: 0.25,
            ..Default::default()
        }
    }

    fn play(run: &mut LevelRun, dt: f32) -> (LevelOutcome, usize) {
        for frame in 1..1000 {
            if let Some(outcome) = run.frame(dt, &TickInput::default()) {
                return (outcome, frame);
            }
        }
        panic!("level never resolved");
    }

    #[test]
    fn test_outcome_waits_for_transition() {
        let level = Arc::new(Level::parse(WIN_NOW).unwrap());
        let mut run = LevelRun::new(level, 0, 3, &settings());
        let (outcome, frames) = play(&mut run, 0.1);
        assert_eq!(outcome.status, Status::Won);
        assert_eq!(outcome.life, 3);
        // Resolved on frame 1; the 0.25s transition takes three more frames
        assert_eq!(frames, 4);
    }

    #[test]
    fn test_frame_step_is_clamped() {
        let level = Arc::new(Level::parse("...\n.@.\n...\n...\n...\n...").unwrap());
        let mut run = LevelRun::new(level, 0, 3, &settings());
        run.frame(5.0, &TickInput::default());
        // One clamped 0.1s step of free fall
        let expected = 0.5 + crate::consts::GRAVITY * 0.1 * 0.1;
        assert!((run.state().player().pos.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_win_advances_and_carries_counts() {
        let mut campaign = Campaign::from_plans(&[WIN_NOW, WIN_NOW], settings()).unwrap();
        let phase = campaign.record(LevelOutcome {
            status: Status::Won,
            pickups: 1,
            life: 5,
        });
        assert_eq!(phase, CampaignPhase::InProgress);
        assert_eq!(campaign.level_index(), 1);
        assert_eq!(campaign.life(), 5);
        assert_eq!(campaign.pickups(), 1);

        let run = campaign.start_level().unwrap();
        assert_eq!(run.state().life(), 5);
        assert_eq!(run.state().pickups(), 1);
    }

    #[test]
    fn test_loss_retries_with_one_life_fewer() {
        let mut campaign = Campaign::from_plans(&[LOSE_NOW], settings()).unwrap();
        let mut run = campaign.start_level().unwrap();
        let (outcome, _) = play(&mut run, 0.1);
        assert_eq!(outcome.status, Status::Lost);

        assert_eq!(campaign.record(outcome), CampaignPhase::InProgress);
        assert_eq!(campaign.level_index(), 0);
        assert_eq!(campaign.life(), 1);

        let mut run = campaign.start_level().unwrap();
        let (outcome, _) = play(&mut run, 0.1);
        assert_eq!(campaign.record(outcome), CampaignPhase::Defeat);
        assert!(campaign.start_level().is_none());
    }

    #[test]
    fn test_unresolved_outcome_is_ignored() {
        let settings = Settings {
            start_pickups: 1,
            ..settings()
        };
        let mut campaign = Campaign::from_plans(&[WIN_NOW], settings).unwrap();
        let phase = campaign.record(LevelOutcome {
            status: Status::Playing,
            pickups: 0,
            life: 9,
        });
        assert_eq!(phase, CampaignPhase::InProgress);
        assert_eq!(campaign.level_index(), 0);
        assert_eq!(campaign.life(), 2);
        assert_eq!(campaign.pickups(), 1);
    }

    #[test]
    fn test_victory_after_last_level() {
        let mut campaign = Campaign::from_plans(&[WIN_NOW], settings()).unwrap();
        let mut run = campaign.start_level().unwrap();
        let (outcome, _) = play(&mut run, 0.05);
        assert_eq!(campaign.record(outcome), CampaignPhase::Victory);
        assert!(campaign.start_level().is_none());
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            Campaign::from_plans(&[], settings()),
            Err(CampaignError::NoLevels)
        ));
        assert!(matches!(
            Campaign::from_plans(&[WIN_NOW, "..."], settings()),
            Err(CampaignError::Level {
                index: 1,
                source: LevelError::MissingPlayer
            })
        ));
    }

    #[test]
    fn test_builtin_campaign_builds() {
        let campaign = Campaign::from_plans(crate::levels::PLANS, Settings::default()).unwrap();
        assert_eq!(campaign.level_count(), crate::levels::PLANS.len());
        assert_eq!(campaign.phase(), CampaignPhase::InProgress);
    }
}
