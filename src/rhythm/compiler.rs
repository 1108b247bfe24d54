use serde::{Deserialize, Serialize};
use tracing::debug;

use super::angle::{Tile, normalize_degree, path_to_angles};
use crate::error::{CompileError, ConfigError, ParseError};
use crate::level::{ActionEvent, LevelRecord, SpeedType};

/// Seconds between consecutive key presses, in tile order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DelaySchedule {
    pub delays: Vec<f64>,
}

impl DelaySchedule {
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// Sum of all delays in seconds.
    pub fn total_secs(&self) -> f64 {
        self.delays.iter().sum()
    }
}

/// Per-floor tempo events collected before the timing scan.
#[derive(Debug, Clone)]
struct ActionOverlay {
    bpm: Vec<Option<f64>>,
    twirl: Vec<bool>,
}

impl ActionOverlay {
    fn build(level: &LevelRecord, tiles: usize) -> Result<Self, ParseError> {
        let mut bpm = vec![None; tiles];
        let mut twirl = vec![false; tiles];
        // Multipliers compound in file order, not floor order.
        let mut running_bpm = level.settings.bpm;

        for action in &level.actions {
            if action.floor >= tiles {
                return Err(ParseError::FloorOutOfRange {
                    floor: action.floor,
                    tiles,
                });
            }
            match action.event {
                ActionEvent::SetSpeed {
                    speed_type,
                    beats_per_minute,
                    bpm_multiplier,
                } => {
                    running_bpm = match speed_type {
                        SpeedType::Multiplier => running_bpm * bpm_multiplier,
                        SpeedType::Bpm => beats_per_minute.unwrap_or(running_bpm),
                    };
                    bpm[action.floor] = Some(running_bpm);
                }
                ActionEvent::Twirl => twirl[action.floor] = true,
                ActionEvent::Other => {}
            }
        }

        Ok(Self { bpm, twirl })
    }
}

/// Where the scan is relative to a run of mid-spin tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    Normal,
    /// The next transition measures from `floor_angle` instead of the
    /// reverse of the current tile.
    AwaitingFloor { floor_angle: f64 },
}

/// Tiles of the level with the synthetic start tile in front.
pub fn resolve_angles(level: &LevelRecord) -> Result<Vec<Tile>, ParseError> {
    let mut tiles = vec![Tile::Angle(0.0)];
    match (&level.angle_data, &level.path_data) {
        (Some(angles), _) => tiles.extend(angles.iter().copied().map(Tile::from_degrees)),
        (None, Some(path)) => tiles.extend(path_to_angles(path)?),
        (None, None) => return Err(ParseError::MissingPath),
    }
    Ok(tiles)
}

/// Delay in seconds for a turn of `degrees` at the given tempo.
///
/// `(100 / pitch) * (60 / bpm) * (degrees / 180)`
pub fn turn_delay_secs(degrees: f64, bpm: f64, pitch: f64) -> f64 {
    100.0 * degrees / bpm / pitch / 3.0
}

/// Compile a level into the delays between presses.
pub fn compile(level: &LevelRecord) -> Result<DelaySchedule, CompileError> {
    let pitch = level.settings.pitch;
    if !(pitch.is_finite() && pitch > 0.0) {
        return Err(ConfigError::InvalidPitch(pitch).into());
    }

    let tiles = resolve_angles(level)?;
    let overlay = ActionOverlay::build(level, tiles.len())?;

    let mut delays = Vec::with_capacity(tiles.len().saturating_sub(1));
    let mut bpm = level.settings.bpm;
    let mut spin = -1.0;
    let mut state = ScanState::Normal;

    for (floor, pair) in tiles.windows(2).enumerate() {
        let (current, next) = (pair[0], pair[1]);

        if overlay.twirl[floor] {
            spin = -spin;
        }
        if let Some(new_bpm) = overlay.bpm[floor] {
            bpm = new_bpm;
        }

        let current_angle = match (current, state) {
            (Tile::Angle(angle), _) => angle,
            (Tile::MidSpin, ScanState::AwaitingFloor { floor_angle }) => floor_angle,
            // A mid-spin can only follow a tile that put us in AwaitingFloor,
            // and the start tile is never mid-spin.
            (Tile::MidSpin, ScanState::Normal) => 0.0,
        };

        let Tile::Angle(next_angle) = next else {
            state = ScanState::AwaitingFloor {
                floor_angle: current_angle,
            };
            continue;
        };

        let floor_angle = match state {
            ScanState::AwaitingFloor { floor_angle } => floor_angle,
            ScanState::Normal => current_angle + 180.0,
        };
        state = ScanState::Normal;

        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(ConfigError::InvalidBpm { floor, bpm }.into());
        }

        let degree = normalize_degree(spin * (next_angle - floor_angle));
        delays.push(turn_delay_secs(degree, bpm, pitch));
    }

    debug!(
        "Compiled {} tiles into {} delays",
        tiles.len(),
        delays.len()
    );
    Ok(DelaySchedule { delays })
}
