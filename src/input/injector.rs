use tracing::info;

use crate::error::InjectError;

/// Synthetic keyboard backend. Calls are immediate and non-blocking.
pub trait KeyInjector {
    fn key_down(&mut self, key: &str) -> Result<(), InjectError>;

    fn key_up(&mut self, key: &str) -> Result<(), InjectError>;

    /// Press and release in one call.
    fn press_once(&mut self, key: &str) -> Result<(), InjectError>;
}

impl<T: KeyInjector + ?Sized> KeyInjector for &mut T {
    fn key_down(&mut self, key: &str) -> Result<(), InjectError> {
        (**self).key_down(key)
    }

    fn key_up(&mut self, key: &str) -> Result<(), InjectError> {
        (**self).key_up(key)
    }

    fn press_once(&mut self, key: &str) -> Result<(), InjectError> {
        (**self).press_once(key)
    }
}

/// Logs every event instead of sending it.
#[derive(Debug, Default)]
pub struct DryRunInjector;

impl KeyInjector for DryRunInjector {
    fn key_down(&mut self, key: &str) -> Result<(), InjectError> {
        info!("key down {key}");
        Ok(())
    }

    fn key_up(&mut self, key: &str) -> Result<(), InjectError> {
        info!("key up {key}");
        Ok(())
    }

    fn press_once(&mut self, key: &str) -> Result<(), InjectError> {
        info!("tap {key}");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedKind {
    Down,
    Up,
    Tap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedEvent {
    pub kind: InjectedKind,
    pub key: String,
}

/// Collects events in memory; can be told to fail after a number of calls.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    events: Vec<InjectedEvent>,
    fail_after: Option<usize>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call after the first `calls` successful ones fails.
    pub fn failing_after(calls: usize) -> Self {
        Self {
            events: Vec::new(),
            fail_after: Some(calls),
        }
    }

    pub fn events(&self) -> &[InjectedEvent] {
        &self.events
    }

    /// Keys currently held down according to the recorded events.
    pub fn held_keys(&self) -> Vec<&str> {
        let mut held: Vec<&str> = Vec::new();
        for event in &self.events {
            match event.kind {
                InjectedKind::Down => held.push(&event.key),
                InjectedKind::Up => held.retain(|k| *k != event.key),
                InjectedKind::Tap => {}
            }
        }
        held
    }

    fn push(&mut self, kind: InjectedKind, key: &str) -> Result<(), InjectError> {
        if let Some(limit) = self.fail_after
            && self.events.len() >= limit
        {
            return Err(InjectError::Backend(format!("refused {kind:?} {key}")));
        }
        self.events.push(InjectedEvent {
            kind,
            key: key.to_string(),
        });
        Ok(())
    }

    /// Let later calls succeed again.
    pub fn recover(&mut self) {
        self.fail_after = None;
    }
}

impl KeyInjector for RecordingInjector {
    fn key_down(&mut self, key: &str) -> Result<(), InjectError> {
        self.push(InjectedKind::Down, key)
    }

    fn key_up(&mut self, key: &str) -> Result<(), InjectError> {
        self.push(InjectedKind::Up, key)
    }

    fn press_once(&mut self, key: &str) -> Result<(), InjectError> {
        self.push(InjectedKind::Tap, key)
    }
}

#[cfg(feature = "enigo")]
mod os {
    use enigo::{Direction, Enigo, Key, Keyboard, Settings};

    use super::KeyInjector;
    use crate::error::InjectError;

    /// Sends real key events through the OS input API.
    pub struct EnigoInjector {
        enigo: Enigo,
    }

    impl EnigoInjector {
        pub fn new() -> Result<Self, InjectError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| InjectError::Backend(e.to_string()))?;
            Ok(Self { enigo })
        }

        fn send(&mut self, key: &str, direction: Direction) -> Result<(), InjectError> {
            let key = parse_key(key)?;
            self.enigo
                .key(key, direction)
                .map_err(|e| InjectError::Backend(e.to_string()))
        }
    }

    /// Single characters map to themselves; a few names map to special keys.
    pub fn parse_key(name: &str) -> Result<Key, InjectError> {
        let key = match name.to_ascii_lowercase().as_str() {
            "space" => Key::Space,
            "enter" | "return" => Key::Return,
            "tab" => Key::Tab,
            "esc" | "escape" => Key::Escape,
            "shift" => Key::Shift,
            "ctrl" | "control" => Key::Control,
            "alt" => Key::Alt,
            "backspace" => Key::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Unicode(c),
                    _ => return Err(InjectError::UnknownKey(name.to_string())),
                }
            }
        };
        Ok(key)
    }

    impl KeyInjector for EnigoInjector {
        fn key_down(&mut self, key: &str) -> Result<(), InjectError> {
            self.send(key, Direction::Press)
        }

        fn key_up(&mut self, key: &str) -> Result<(), InjectError> {
            self.send(key, Direction::Release)
        }

        fn press_once(&mut self, key: &str) -> Result<(), InjectError> {
            self.send(key, Direction::Click)
        }
    }
}

#[cfg(feature = "enigo")]
pub use os::{EnigoInjector, parse_key};
