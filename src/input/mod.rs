//! Synthetic key input.
//!
//! This module provides:
//! - [`InputDriver`]: real-time press/release loop over a hand schedule
//! - [`KeyInjector`]: backend seam, with [`DryRunInjector`] and [`RecordingInjector`]
//! - [`InputLogger`]: record of every key event issued during playback
//! - [`KeyState`]: per-key press state with hold deadline

mod driver;
mod injector;
mod key_input_log;
mod key_state;

pub use driver::InputDriver;
#[cfg(feature = "enigo")]
pub use injector::{EnigoInjector, parse_key};
pub use injector::{DryRunInjector, InjectedEvent, InjectedKind, KeyInjector, RecordingInjector};
pub use key_input_log::{InputLogger, KeyInputLog};
pub use key_state::KeyState;
