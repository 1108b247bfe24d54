use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A single key event issued by the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInputLog {
    /// Timestamp in microseconds from playback start.
    pub time_us: i64,
    /// Physical key index into the configured key list.
    pub key: usize,
    /// true = pressed, false = released.
    pub pressed: bool,
}

/// Logger for key events sent during playback.
#[derive(Debug)]
pub struct InputLogger {
    logs: Vec<KeyInputLog>,
}

impl InputLogger {
    /// Create a new input logger with pre-allocated capacity.
    pub fn new() -> Self {
        Self {
            logs: Vec::with_capacity(10000),
        }
    }

    pub fn record(&mut self, time_us: i64, key: usize, pressed: bool) {
        self.logs.push(KeyInputLog {
            time_us,
            key,
            pressed,
        });
    }

    pub fn logs(&self) -> &[KeyInputLog] {
        &self.logs
    }

    /// Only the press events, in issue order.
    pub fn presses(&self) -> impl Iterator<Item = &KeyInputLog> {
        self.logs.iter().filter(|log| log.pressed)
    }

    pub fn into_logs(self) -> Vec<KeyInputLog> {
        self.logs
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Write the log as pretty JSON.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.logs)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write key log: {}", path.display()))?;
        Ok(())
    }
}

impl Default for InputLogger {
    fn default() -> Self {
        Self::new()
    }
}
