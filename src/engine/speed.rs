//! Tick interval ladder and its display multiplier

use super::observer::{Callback, ObserverSlot};
use crate::error::{LifeError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Each cycle divides the interval by this factor
pub const STEP_FACTOR: u32 = 2;
pub const MIN_STEP_MILLIS: u32 = 8;
pub const MAX_STEP_MILLIS: u32 = 512;

/// Bounds of the interval ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub max_millis: u32,
    pub min_millis: u32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            max_millis: MAX_STEP_MILLIS,
            min_millis: MIN_STEP_MILLIS,
        }
    }
}

impl SpeedConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.max_millis.is_power_of_two() {
            return Err(LifeError::InvalidSettings(format!(
                "max_millis must be a power of two, got {}",
                self.max_millis
            )));
        }
        // Halving only happens at or above min, so min >= 2 keeps the interval above zero
        if self.min_millis < 2 {
            return Err(LifeError::InvalidSettings(format!(
                "min_millis must be at least 2, got {}",
                self.min_millis
            )));
        }
        if self.min_millis > self.max_millis {
            return Err(LifeError::InvalidSettings(format!(
                "min_millis ({}) exceeds max_millis ({})",
                self.min_millis, self.max_millis
            )));
        }
        Ok(())
    }
}

/// Current tick interval, cycled through a descending power-of-two ladder.
///
/// Starts at `max_millis`. Each [`cycle_speed`](Self::cycle_speed) halves the
/// interval while it is at or above `min_millis`, otherwise wraps back to
/// `max_millis`. With the defaults that is 512, 256, ..., 8, 4, 512.
#[derive(Debug)]
pub struct SpeedController {
    config: SpeedConfig,
    millis: Mutex<u32>,
    observer: ObserverSlot<u32>,
}

impl SpeedController {
    pub fn new(config: SpeedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            millis: Mutex::new(config.max_millis),
            observer: ObserverSlot::new(),
        })
    }

    pub fn config(&self) -> SpeedConfig {
        self.config
    }

    pub fn millis(&self) -> u32 {
        *self.millis.lock()
    }

    /// Delay the run loop sleeps after each generation
    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.millis()))
    }

    /// Display label for the current interval
    pub fn multiplier(&self) -> u32 {
        self.multiplier_for(self.millis())
    }

    /// Ascending label derived from an interval: 1 at `max_millis`, one more
    /// for every halving below it.
    pub fn multiplier_for(&self, millis: u32) -> u32 {
        let steps = log2(self.config.max_millis).saturating_sub(1);
        (steps + 2).saturating_sub(log2(millis))
    }

    /// Advance one rung on the ladder and publish the new multiplier.
    /// Returns the new multiplier.
    pub fn cycle_speed(&self) -> u32 {
        let millis = {
            let mut millis = self.millis.lock();
            *millis = if *millis >= self.config.min_millis {
                *millis / STEP_FACTOR
            } else {
                self.config.max_millis
            };
            *millis
        };

        let multiplier = self.multiplier_for(millis);
        debug!(millis, multiplier, "speed cycled");
        self.observer.publish(&multiplier);
        multiplier
    }

    /// Subscribe to multiplier changes, replacing any previous subscriber
    pub fn set_observer<F>(&self, callback: F)
    where
        F: Fn(&u32) + Send + Sync + 'static,
    {
        let callback: Callback<u32> = Arc::new(callback);
        self.observer.set(callback);
    }

    pub fn clear_observer(&self) {
        self.observer.clear();
    }
}

impl Default for SpeedController {
    fn default() -> Self {
        Self {
            config: SpeedConfig::default(),
            millis: Mutex::new(MAX_STEP_MILLIS),
            observer: ObserverSlot::new(),
        }
    }
}

// log2(0) is treated as 0; validated configs never reach a zero interval
fn log2(value: u32) -> u32 {
    value.checked_ilog2().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_max() {
        let speed = SpeedController::default();
        assert_eq!(speed.millis(), 512);
        assert_eq!(speed.interval(), Duration::from_millis(512));
        assert_eq!(speed.multiplier(), 1);
    }

    #[test]
    fn test_ladder_sequence() {
        let speed = SpeedController::default();
        let seen: Vec<u32> = (0..9)
            .map(|_| {
                speed.cycle_speed();
                speed.millis()
            })
            .collect();
        assert_eq!(seen, vec![256, 128, 64, 32, 16, 8, 4, 512, 256]);
    }

    #[test]
    fn test_multiplier_rises_then_resets() {
        let speed = SpeedController::default();
        let multipliers: Vec<u32> = (0..8).map(|_| speed.cycle_speed()).collect();
        assert_eq!(multipliers, vec![2, 3, 4, 5, 6, 7, 8, 1]);
    }

    #[test]
    fn test_multiplier_published_to_observer() {
        let speed = SpeedController::default();
        let (tx, rx) = std::sync::mpsc::channel();
        let tx = Mutex::new(tx);
        speed.set_observer(move |m| {
            tx.lock().send(*m).unwrap();
        });

        speed.cycle_speed();
        speed.cycle_speed();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![2, 3]);

        speed.clear_observer();
        speed.cycle_speed();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_custom_ladder() {
        let speed = SpeedController::new(SpeedConfig {
            max_millis: 64,
            min_millis: 16,
        })
        .unwrap();
        let seen: Vec<u32> = (0..5)
            .map(|_| {
                speed.cycle_speed();
                speed.millis()
            })
            .collect();
        assert_eq!(seen, vec![32, 16, 8, 64, 32]);
    }

    #[test]
    fn test_invalid_configs() {
        let bad = [(500, 8), (512, 1), (512, 0), (8, 16)];
        for (max_millis, min_millis) in bad {
            let config = SpeedConfig {
                max_millis,
                min_millis,
            };
            assert!(
                matches!(SpeedController::new(config), Err(LifeError::InvalidSettings(_))),
                "{:?}",
                config
            );
        }
    }
}
