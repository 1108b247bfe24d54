use serde::{Deserialize, Serialize};

/// Root of a `.adofai` level file.
///
/// Only the fields needed for timing are modelled; everything else in the
/// file is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecord {
    pub settings: LevelSettings,
    /// Symbolic path, one character per tile (older format).
    #[serde(default)]
    pub path_data: Option<String>,
    /// Explicit tile angles in degrees; `999` marks a mid-spin tile.
    #[serde(default)]
    pub angle_data: Option<Vec<f64>>,
    #[serde(default)]
    pub actions: Vec<LevelAction>,
}

/// Global level settings relevant to timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSettings {
    pub bpm: f64,
    /// Playback speed in percent.
    #[serde(default = "default_pitch")]
    pub pitch: f64,
    /// Audio offset in milliseconds.
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_countdown_ticks")]
    pub countdown_ticks: u32,
}

fn default_pitch() -> f64 {
    100.0
}

fn default_countdown_ticks() -> u32 {
    4
}

impl LevelSettings {
    /// Seconds from the start trigger until the first tile is hit, before
    /// any user supplied wait.
    pub fn countdown_secs(&self) -> f64 {
        self.countdown_ticks as f64 * 60.0 / self.bpm * 100.0 / self.pitch
            + self.offset as f64 * 0.001
    }
}

/// A timed action attached to a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelAction {
    pub floor: usize,
    #[serde(flatten)]
    pub event: ActionEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum ActionEvent {
    #[serde(rename_all = "camelCase")]
    SetSpeed {
        #[serde(default)]
        speed_type: SpeedType,
        #[serde(default)]
        beats_per_minute: Option<f64>,
        #[serde(default = "default_multiplier")]
        bpm_multiplier: f64,
    },
    Twirl,
    /// Decorations, camera moves and every other event without timing effect.
    #[serde(other)]
    Other,
}

fn default_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedType {
    #[default]
    Bpm,
    Multiplier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_level() {
        let json = r#"{"pathData":"RULD","settings":{"bpm":100,"pitch":100},"actions":[]}"#;
        let level: LevelRecord = serde_json::from_str(json).unwrap();

        assert_eq!(level.path_data.as_deref(), Some("RULD"));
        assert!(level.angle_data.is_none());
        assert_eq!(level.settings.offset, 0);
        assert_eq!(level.settings.countdown_ticks, 4);
    }

    #[test]
    fn test_deserialize_actions() {
        let json = r#"{
            "angleData": [0, 90, 999, 180],
            "settings": {"bpm": 120, "pitch": 100, "offset": 250, "countdownTicks": 4, "artist": "x"},
            "actions": [
                {"floor": 2, "eventType": "SetSpeed", "speedType": "Multiplier", "beatsPerMinute": 100, "bpmMultiplier": 2},
                {"floor": 3, "eventType": "Twirl"},
                {"floor": 1, "eventType": "MoveCamera", "duration": 1}
            ]
        }"#;
        let level: LevelRecord = serde_json::from_str(json).unwrap();

        assert_eq!(level.actions.len(), 3);
        assert_eq!(
            level.actions[0].event,
            ActionEvent::SetSpeed {
                speed_type: SpeedType::Multiplier,
                beats_per_minute: Some(100.0),
                bpm_multiplier: 2.0,
            }
        );
        assert_eq!(level.actions[1].event, ActionEvent::Twirl);
        assert_eq!(level.actions[2].event, ActionEvent::Other);
    }

    #[test]
    fn test_countdown_secs() {
        let settings = LevelSettings {
            bpm: 120.0,
            pitch: 50.0,
            offset: 500,
            countdown_ticks: 4,
        };
        // 4 beats at 120 BPM = 2s, half pitch doubles it, plus 0.5s offset
        assert!((settings.countdown_secs() - 4.5).abs() < 1e-9);
    }
}
