//! Two-handed fingering for a delay schedule.
//!
//! - [`HandScheduler`]: absolute press times with alternating hand slots
//! - [`KeyGate`]: slot to physical key remapping for a [`FingeringMode`]

mod key_gate;
mod scheduler;

pub use key_gate::{FingeringMode, KeyGate};
pub use scheduler::{Hand, HandSchedule, HandScheduler, HandStep, schedule_hands};
