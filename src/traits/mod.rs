//! Seams for collaborators swapped out in tests.

pub mod time;

pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider, secs_to_us};
