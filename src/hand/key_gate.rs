use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Finger layout over the physical key array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum FingeringMode {
    /// First hand plays the upper half outward, second hand the lower half
    /// inward. Other layouts are not implemented yet.
    #[default]
    #[serde(rename = "rightMain_inside")]
    RightMainInside,
}

/// Maps logical hand slots onto physical key indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGate {
    mode: FingeringMode,
    table: Vec<usize>,
}

impl KeyGate {
    pub fn new(mode: FingeringMode, key_count: usize) -> Self {
        let table = match mode {
            FingeringMode::RightMainInside => {
                let half = key_count / 2;
                (key_count - half..key_count)
                    .chain((0..half).rev())
                    .collect()
            }
        };
        Self { mode, table }
    }

    pub fn mode(&self) -> FingeringMode {
        self.mode
    }

    /// Physical key index for a logical slot.
    ///
    /// # Panics
    /// If `slot` is not below twice the hand size.
    pub fn map(&self, slot: usize) -> usize {
        self.table[slot]
    }

    pub fn table(&self) -> &[usize] {
        &self.table
    }
}
