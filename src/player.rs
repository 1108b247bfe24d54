//! End-to-end autoplay: load, compile, schedule, drive.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::PlayerConfig;
use crate::error::ConfigError;
use crate::hand::{HandSchedule, HandScheduler};
use crate::input::{InputDriver, InputLogger, KeyInjector};
use crate::level::{LevelRecord, load_level};
use crate::rhythm::{DelaySchedule, compile};
use crate::traits::time::TimeProvider;

/// A level compiled into a ready-to-play press schedule.
///
/// Everything that can fail on bad input fails in the constructor, before
/// any key event is sent.
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    level: LevelRecord,
    config: PlayerConfig,
    delays: DelaySchedule,
    schedule: HandSchedule,
}

impl AutoPlayer {
    /// Load the level at `path` and compile it for `config`.
    pub fn new<P: AsRef<Path>>(path: P, config: PlayerConfig) -> Result<Self> {
        let path = path.as_ref();
        let level = load_level(path, &config.staging_dir)
            .with_context(|| format!("Failed to load level: {}", path.display()))?;
        Self::from_level(level, config)
    }

    pub fn from_level(level: LevelRecord, config: PlayerConfig) -> Result<Self> {
        config.validate()?;
        let bpm = level.settings.bpm;
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(ConfigError::InvalidBpm { floor: 0, bpm }.into());
        }

        let delays = compile(&level).context("Failed to compile level timing")?;
        let scheduler = HandScheduler::new(config.keys.len(), config.dwell_budget()?)?;
        let schedule = scheduler.schedule(&delays);

        info!(
            "Compiled {} presses, {:.2}s of play",
            delays.len(),
            delays.total_secs()
        );
        Ok(Self {
            level,
            config,
            delays,
            schedule,
        })
    }

    pub fn level(&self) -> &LevelRecord {
        &self.level
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn delays(&self) -> &DelaySchedule {
        &self.delays
    }

    pub fn schedule(&self) -> &HandSchedule {
        &self.schedule
    }

    /// Seconds between the start trigger and the first press.
    pub fn countdown_secs(&self) -> f64 {
        self.level.settings.countdown_secs() + self.config.wait_secs
    }

    /// Every press is held for half the dwell budget.
    pub fn hold_secs(&self) -> f64 {
        // validated in from_level
        1.0 / self.config.one_hand_cps / 2.0
    }

    pub fn driver<I: KeyInjector, T: TimeProvider>(
        &self,
        injector: I,
        clock: T,
    ) -> InputDriver<I, T> {
        InputDriver::new(
            injector,
            clock,
            self.config.keys.clone(),
            self.config.mode,
            self.hold_secs(),
        )
    }

    /// Run the countdown and the whole schedule, returning the issued events.
    pub fn play<I: KeyInjector, T: TimeProvider>(
        &self,
        injector: I,
        clock: T,
    ) -> Result<InputLogger> {
        let mut driver = self.driver(injector, clock);
        driver
            .countdown(&self.config.start_key, self.countdown_secs())
            .context("Failed to send start key")?;
        driver
            .play(&self.schedule)
            .context("Key injection failed during playback")?;
        Ok(driver.into_log())
    }

    /// Write the hand schedule as pretty JSON.
    pub fn export_schedule<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.schedule)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write schedule: {}", path.display()))?;
        Ok(())
    }
}
