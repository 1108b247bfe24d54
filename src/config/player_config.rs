use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::hand::{FingeringMode, HandScheduler};
use crate::level::DEFAULT_STAGING_DIR;

pub const CONFIG_FILE: &str = "adofai_auto.json";

/// Player settings, loaded from JSON and overridable from the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Physical keys, left to right. Split in two halves, one per hand.
    pub keys: Vec<String>,
    pub mode: FingeringMode,
    /// Maximum taps per second for one hand.
    pub one_hand_cps: f64,
    /// Extra seconds to wait after the level countdown.
    pub wait_secs: f64,
    /// Key that starts the level.
    pub start_key: String,
    /// Name of the staging folder created next to the level file.
    pub staging_dir: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            keys: ["a", "s", "k", "l"].iter().map(|k| k.to_string()).collect(),
            mode: FingeringMode::default(),
            one_hand_cps: 10.0,
            wait_secs: 0.0,
            start_key: "space".to_string(),
            staging_dir: DEFAULT_STAGING_DIR.to_string(),
        }
    }
}

impl PlayerConfig {
    /// Loads config from the default config file.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Seconds one hand may keep tapping before switching.
    pub fn dwell_budget(&self) -> Result<f64, ConfigError> {
        HandScheduler::budget_for_rate(self.one_hand_cps)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.len() < 2 {
            return Err(ConfigError::TooFewKeys(self.keys.len()));
        }
        self.dwell_budget()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = PlayerConfig::default();
        assert_eq!(config.keys, vec!["a", "s", "k", "l"]);
        assert_eq!(config.mode, FingeringMode::RightMainInside);
        assert_eq!(config.one_hand_cps, 10.0);
        assert_eq!(config.start_key, "space");
        assert_eq!(config.staging_dir, "adofai_auto");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"keys": ["q", "w", "o", "p", "z", "x"], "one_hand_cps": 12}"#)
                .unwrap();
        assert_eq!(config.keys.len(), 6);
        assert_eq!(config.one_hand_cps, 12.0);
        assert_eq!(config.start_key, "space");
    }

    #[test]
    fn test_file_io() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");

        let config = PlayerConfig {
            keys: vec!["d".into(), "f".into(), "j".into(), "k".into()],
            wait_secs: 0.25,
            ..PlayerConfig::default()
        };

        config.save_to(&file_path).unwrap();
        let loaded = PlayerConfig::load_from(&file_path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nonexistent.json");

        let config = PlayerConfig::load_from(&file_path).unwrap();
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let config = PlayerConfig {
            one_hand_cps: 0.0,
            ..PlayerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTapRate(0.0)));
    }

    #[test]
    fn test_validate_rejects_single_key() {
        let config = PlayerConfig {
            keys: vec!["a".into()],
            ..PlayerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewKeys(1)));
    }
}
