/// Runtime state of one physical key driven by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Whether the key is currently held down.
    pub pressed: bool,
    /// How long the current press should be held (microseconds).
    pub hold_us: i64,
    /// Timestamp when the key was pressed (microseconds).
    pub press_time_us: i64,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a press that should last `hold_us`.
    pub fn on_press(&mut self, time_us: i64, hold_us: i64) {
        self.pressed = true;
        self.hold_us = hold_us;
        self.press_time_us = time_us;
    }

    pub fn on_release(&mut self) {
        self.pressed = false;
    }

    /// Whether a held key has reached its hold duration at `now_us`.
    pub fn is_release_due(&self, now_us: i64) -> bool {
        self.pressed && now_us - self.press_time_us >= self.hold_us
    }
}
