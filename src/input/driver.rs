//! Real-time press/release loop over a hand schedule.

use tracing::{debug, info, warn};

use super::injector::KeyInjector;
use super::key_input_log::InputLogger;
use super::key_state::KeyState;
use crate::error::InjectError;
use crate::hand::{FingeringMode, HandSchedule, KeyGate};
use crate::traits::time::{TimeProvider, secs_to_us};

/// Drives synthetic key presses against a clock.
///
/// The loop busy-waits: it never sleeps, so press latency is bounded by how
/// fast the clock can be polled. Releases are swept between presses and may
/// lag their deadline by one iteration.
pub struct InputDriver<I: KeyInjector, T: TimeProvider> {
    injector: I,
    clock: T,
    keys: Vec<String>,
    gate: KeyGate,
    states: Vec<KeyState>,
    hold_us: i64,
    logger: InputLogger,
    origin_us: i64,
}

impl<I: KeyInjector, T: TimeProvider> InputDriver<I, T> {
    /// `hold_secs` is how long every press is held before release.
    pub fn new(
        injector: I,
        clock: T,
        keys: Vec<String>,
        mode: FingeringMode,
        hold_secs: f64,
    ) -> Self {
        let gate = KeyGate::new(mode, keys.len());
        let states = vec![KeyState::new(); keys.len()];
        Self {
            injector,
            clock,
            keys,
            gate,
            states,
            hold_us: secs_to_us(hold_secs),
            logger: InputLogger::new(),
            origin_us: 0,
        }
    }

    pub fn log(&self) -> &InputLogger {
        &self.logger
    }

    pub fn into_log(self) -> InputLogger {
        self.logger
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn key_states(&self) -> &[KeyState] {
        &self.states
    }

    /// Trigger the level start, then spin until `wait_secs` have elapsed.
    pub fn countdown(&mut self, start_key: &str, wait_secs: f64) -> Result<(), InjectError> {
        self.injector.press_once(start_key)?;
        let start = self.clock.now_us();
        let target = secs_to_us(wait_secs);
        info!("Countdown started, first tile in {wait_secs:.3}s");

        while self.clock.now_us() - start < target {
            std::hint::spin_loop();
        }
        Ok(())
    }

    /// Play every step after the start tile, then release whatever is held.
    ///
    /// On an injector failure every held key is released before the error is
    /// returned.
    pub fn play(&mut self, schedule: &HandSchedule) -> Result<(), InjectError> {
        let result = self.run(schedule);
        if result.is_err() {
            self.release_all();
        }
        result
    }

    fn run(&mut self, schedule: &HandSchedule) -> Result<(), InjectError> {
        self.origin_us = self.clock.now_us();
        info!("Playback started ({} presses)", schedule.len().saturating_sub(1));

        // The first step is the start tile, already covered by the countdown.
        let mut steps = schedule.steps.iter().skip(1).peekable();
        while let Some(step) = steps.peek() {
            let elapsed = self.elapsed_us();
            if elapsed >= secs_to_us(step.at_secs) {
                let key = self.gate.map(step.slot);
                debug!(
                    "press {} (slot {}) at {:.3}s",
                    self.keys[key], step.slot, step.at_secs
                );
                self.press(key, elapsed)?;
                steps.next();
            }
            self.release_due(self.elapsed_us())?;
        }

        while self.states.iter().any(|s| s.pressed) {
            self.release_due(self.elapsed_us())?;
            std::hint::spin_loop();
        }

        info!("Playback finished");
        Ok(())
    }

    fn elapsed_us(&self) -> i64 {
        self.clock.now_us() - self.origin_us
    }

    /// Press `key`, force-releasing it first if it is still held.
    fn press(&mut self, key: usize, now_us: i64) -> Result<(), InjectError> {
        let name = &self.keys[key];
        if self.states[key].pressed {
            self.injector.key_up(name)?;
            self.states[key].on_release();
            self.logger.record(now_us, key, false);
        }
        self.injector.key_down(name)?;
        self.states[key].on_press(now_us, self.hold_us);
        self.logger.record(now_us, key, true);
        Ok(())
    }

    fn release_due(&mut self, now_us: i64) -> Result<(), InjectError> {
        for (key, state) in self.states.iter_mut().enumerate() {
            if state.is_release_due(now_us) {
                self.injector.key_up(&self.keys[key])?;
                state.on_release();
                self.logger.record(now_us, key, false);
            }
        }
        Ok(())
    }

    /// Best-effort release of every held key. Failures are logged only.
    pub fn release_all(&mut self) {
        let now_us = self.elapsed_us();
        for (key, state) in self.states.iter_mut().enumerate() {
            if !state.pressed {
                continue;
            }
            if let Err(e) = self.injector.key_up(&self.keys[key]) {
                warn!("Failed to release {}: {e}", self.keys[key]);
            }
            state.on_release();
            self.logger.record(now_us, key, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Hand, HandStep};
    use crate::input::injector::{InjectedKind, RecordingInjector};
    use crate::traits::time::MockTimeProvider;

    fn keys() -> Vec<String> {
        ["a", "s", "k", "l"].iter().map(|k| k.to_string()).collect()
    }

    fn step(at_secs: f64, slot: usize) -> HandStep {
        HandStep {
            at_secs,
            slot,
            hand: if slot < 2 { Hand::First } else { Hand::Second },
            finger: slot % 2,
        }
    }

    fn schedule(steps: &[(f64, usize)]) -> HandSchedule {
        HandSchedule {
            steps: steps.iter().map(|&(t, s)| step(t, s)).collect(),
        }
    }

    #[test]
    fn test_countdown_taps_start_and_waits() {
        let clock = MockTimeProvider::ticking(1_000);
        let mut driver = InputDriver::new(
            RecordingInjector::new(),
            &clock,
            keys(),
            FingeringMode::RightMainInside,
            0.05,
        );

        driver.countdown("space", 0.5).unwrap();

        assert_eq!(driver.injector().events()[0].kind, InjectedKind::Tap);
        assert_eq!(driver.injector().events()[0].key, "space");
        assert!(clock.now_us() >= 500_000);
    }

    #[test]
    fn test_play_skips_start_step_and_maps_slots() {
        let clock = MockTimeProvider::ticking(100);
        let mut driver = InputDriver::new(
            RecordingInjector::new(),
            &clock,
            keys(),
            FingeringMode::RightMainInside,
            0.005,
        );

        let plan = schedule(&[(0.0, 0), (0.01, 0), (0.02, 1), (0.03, 2), (0.04, 3)]);
        driver.play(&plan).unwrap();

        let pressed: Vec<usize> = driver.log().presses().map(|l| l.key).collect();
        // gate for 4 keys is [2, 3, 1, 0]
        assert_eq!(pressed, vec![2, 3, 1, 0]);

        let times: Vec<i64> = driver.log().presses().map(|l| l.time_us).collect();
        for (time, expected) in times.iter().zip([10_000, 20_000, 30_000, 40_000]) {
            assert!(*time >= expected);
            assert!(*time < expected + 1_000);
        }
        assert!(driver.injector().held_keys().is_empty());
    }

    #[test]
    fn test_release_after_hold() {
        let clock = MockTimeProvider::ticking(100);
        let mut driver = InputDriver::new(
            RecordingInjector::new(),
            &clock,
            keys(),
            FingeringMode::RightMainInside,
            0.005,
        );

        driver.play(&schedule(&[(0.0, 0), (0.01, 0)])).unwrap();

        let logs = driver.log().logs();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].pressed);
        assert!(!logs[1].pressed);
        let held = logs[1].time_us - logs[0].time_us;
        assert!((5_000..6_000).contains(&held), "held {held}us");
    }

    #[test]
    fn test_repress_force_releases_first() {
        let clock = MockTimeProvider::ticking(100);
        let mut driver = InputDriver::new(
            RecordingInjector::new(),
            &clock,
            keys(),
            FingeringMode::RightMainInside,
            1.0,
        );

        driver
            .play(&schedule(&[(0.0, 0), (0.001, 0), (0.002, 0)]))
            .unwrap();

        let kinds: Vec<InjectedKind> = driver.injector().events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InjectedKind::Down,
                InjectedKind::Up,
                InjectedKind::Down,
                InjectedKind::Up
            ]
        );
    }

    #[test]
    fn test_injector_failure_releases_held_keys() {
        let clock = MockTimeProvider::ticking(100);
        // first two key downs succeed, the third call fails
        let mut driver = InputDriver::new(
            RecordingInjector::failing_after(2),
            &clock,
            keys(),
            FingeringMode::RightMainInside,
            1.0,
        );

        let result = driver.play(&schedule(&[(0.0, 0), (0.001, 0), (0.002, 1), (0.003, 2)]));

        assert!(matches!(result, Err(InjectError::Backend(_))));
        assert!(driver.key_states().iter().all(|s| !s.pressed));
    }

    #[test]
    fn test_empty_schedule_finishes() {
        let clock = MockTimeProvider::ticking(100);
        let mut driver = InputDriver::new(
            RecordingInjector::new(),
            &clock,
            keys(),
            FingeringMode::RightMainInside,
            0.05,
        );

        driver.play(&HandSchedule::default()).unwrap();
        assert!(driver.log().is_empty());
    }
}
