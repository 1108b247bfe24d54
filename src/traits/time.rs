use std::cell::Cell;

/// Abstraction over monotonic time sources.
/// Implementations: SystemTimeProvider (production), MockTimeProvider (testing).
pub trait TimeProvider {
    /// Current time in microseconds from an arbitrary epoch.
    fn now_us(&self) -> i64;
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}

/// System time provider using std::time::Instant.
pub struct SystemTimeProvider {
    start: std::time::Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_us(&self) -> i64 {
        self.start.elapsed().as_micros() as i64
    }
}

/// Mock time provider for deterministic testing.
///
/// In ticking mode every read advances the clock by a fixed step, so busy-wait
/// loops polling it make progress without real time passing.
pub struct MockTimeProvider {
    current_us: Cell<i64>,
    tick_us: i64,
}

impl MockTimeProvider {
    pub fn new() -> Self {
        Self::ticking(0)
    }

    /// Clock that advances by `tick_us` after each read.
    pub fn ticking(tick_us: i64) -> Self {
        Self {
            current_us: Cell::new(0),
            tick_us,
        }
    }

    pub fn set_time(&self, us: i64) {
        self.current_us.set(us);
    }

    pub fn advance(&self, delta_us: i64) {
        self.current_us.set(self.current_us.get() + delta_us);
    }
}

impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_us(&self) -> i64 {
        let now = self.current_us.get();
        self.current_us.set(now + self.tick_us);
        now
    }
}

/// Seconds to whole microseconds, rounded to nearest.
pub fn secs_to_us(secs: f64) -> i64 {
    (secs * 1_000_000.0).round() as i64
}
