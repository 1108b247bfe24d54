//! Conversion of level tiles and tempo events into press delays.

mod angle;
mod compiler;

pub use angle::{MIDSPIN_ANGLE, Tile, normalize_degree, path_to_angles, symbol_to_tile};
pub use compiler::{DelaySchedule, compile, resolve_angles, turn_delay_secs};
