//! Simulation clock
//!
//! Turns host frame timestamps into tick deltas and accumulates simulation
//! time. Deltas follow the host's real frame spacing; only rollbacks are
//! clamped. Spawn and combo timing read simulation time, so time spent paused
//! never counts.

use serde::{Deserialize, Serialize};

use crate::consts::{FIRST_TICK_MS, MIN_TICK_MS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    last_timestamp_ms: Option<f64>,
    elapsed_ms: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a host timestamp and return the delta to simulate.
    ///
    /// The first tick after start/resume uses `FIRST_TICK_MS`. Rollbacks clamp to
    /// `MIN_TICK_MS`. Long gaps are kept as-is; the swept catch test covers the
    /// distance an object travels in one large step.
    pub fn delta(&mut self, timestamp_ms: f64) -> f64 {
        let delta = match self.last_timestamp_ms {
            Some(last) if timestamp_ms.is_finite() => timestamp_ms - last,
            _ => FIRST_TICK_MS,
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp_ms = Some(timestamp_ms);
        }
        let delta = delta.max(MIN_TICK_MS);
        self.elapsed_ms += delta;
        delta
    }

    /// Forget the last timestamp so the next tick starts from a fresh baseline
    pub fn reset_baseline(&mut self) {
        self.last_timestamp_ms = None;
    }

    /// Full reset (restart)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Simulation time accumulated so far
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.last_timestamp_ms
    }
}
