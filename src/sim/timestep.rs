//! Per-tick time delta
//!
//! Deltas are measured in reference frames: 1.0 means "one frame at the
//! reference rate", so the same per-tick tuning works in both modes.

use crate::config::{Config, TimestepMode};

/// Produces the delta fed into each simulation tick
#[derive(Debug, Clone)]
pub struct Timestep {
    mode: TimestepMode,
    reference_interval_ms: f64,
    max_delta: Option<f32>,
    /// Host timestamp of the previous call (Normalized mode)
    last_ms: Option<f64>,
}

impl Timestep {
    pub fn new(mode: TimestepMode, reference_interval_ms: f64, max_delta: Option<f32>) -> Self {
        Self {
            mode,
            reference_interval_ms,
            max_delta,
            last_ms: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.timestep,
            config.reference_interval_ms(),
            config.max_delta,
        )
    }

    /// Forget the previous timestamp (call on start/restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Delta since the previous call, given the host's current time in ms
    ///
    /// Normalized mode returns 0 on the first call after a reset. A clock
    /// that runs backwards yields 0 rather than a negative delta.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let raw = match self.mode {
            TimestepMode::Fixed => 1.0,
            TimestepMode::Normalized => {
                let elapsed = match self.last_ms {
                    Some(last) => ((now_ms - last) / self.reference_interval_ms).max(0.0),
                    None => 0.0,
                };
                self.last_ms = Some(now_ms);
                elapsed as f32
            }
        };

        match self.max_delta {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }
}
