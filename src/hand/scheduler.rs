use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::rhythm::DelaySchedule;

/// Which half of the key array a press uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    First,
    Second,
}

impl Hand {
    fn other(self) -> Self {
        match self {
            Hand::First => Hand::Second,
            Hand::Second => Hand::First,
        }
    }
}

/// A press at `at_secs` after playback start on logical `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandStep {
    pub at_secs: f64,
    pub slot: usize,
    pub hand: Hand,
    pub finger: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandSchedule {
    pub steps: Vec<HandStep>,
}

impl HandSchedule {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Assigns delays to alternating halves of the key array so neither hand
/// exceeds its tap rate.
#[derive(Debug, Clone, Copy)]
pub struct HandScheduler {
    half_keys: usize,
    dwell_budget: f64,
}

impl HandScheduler {
    pub fn new(key_count: usize, dwell_budget: f64) -> Result<Self, ConfigError> {
        if key_count < 2 {
            return Err(ConfigError::TooFewKeys(key_count));
        }
        if !(dwell_budget.is_finite() && dwell_budget > 0.0) {
            return Err(ConfigError::InvalidDwellBudget(dwell_budget));
        }
        if key_count % 2 != 0 {
            warn!("Odd key count {key_count}; the last key will not be used");
        }
        Ok(Self {
            half_keys: key_count / 2,
            dwell_budget,
        })
    }

    /// Dwell budget for a one-hand tap rate in taps per second.
    pub fn budget_for_rate(taps_per_sec: f64) -> Result<f64, ConfigError> {
        if !(taps_per_sec.is_finite() && taps_per_sec > 0.0) {
            return Err(ConfigError::InvalidTapRate(taps_per_sec));
        }
        Ok(1.0 / taps_per_sec)
    }

    pub fn half_keys(&self) -> usize {
        self.half_keys
    }

    pub fn dwell_budget(&self) -> f64 {
        self.dwell_budget
    }

    /// One step per delay plus a closing step for the final tile.
    pub fn schedule(&self, delays: &DelaySchedule) -> HandSchedule {
        let mut steps = Vec::with_capacity(delays.len() + 1);
        let mut hand = Hand::First;
        let mut finger = 0;
        let mut time = 0.0;
        let mut dwell = 0.0;

        for &delay in delays.delays.iter().chain(std::iter::once(&0.0)) {
            let slot = match hand {
                Hand::First => finger,
                Hand::Second => self.half_keys + finger,
            };
            steps.push(HandStep {
                at_secs: time,
                slot,
                hand,
                finger,
            });
            time += delay;

            // Long pause: start over on the first hand.
            if delay > 2.0 * self.dwell_budget {
                hand = Hand::First;
                finger = 0;
                dwell = 0.0;
                continue;
            }

            finger += 1;
            dwell += delay;
            if dwell >= self.dwell_budget || finger == self.half_keys {
                hand = hand.other();
                finger = 0;
                dwell = 0.0;
            }
        }

        debug!("Scheduled {} presses over {:.3}s", steps.len(), time);
        HandSchedule { steps }
    }
}

/// Convenience wrapper around [`HandScheduler`].
pub fn schedule_hands(
    delays: &DelaySchedule,
    key_count: usize,
    dwell_budget: f64,
) -> Result<HandSchedule, ConfigError> {
    Ok(HandScheduler::new(key_count, dwell_budget)?.schedule(delays))
}
