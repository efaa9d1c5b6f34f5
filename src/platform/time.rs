//! Fixed-rate frame timestamps
//!
//! Stands in for a display refresh callback on headless hosts: each call to
//! `next_timestamp` is one frame.

use crate::consts::NOMINAL_FRAME_MS;

#[derive(Debug, Clone)]
pub struct FixedStepTimer {
    step_ms: f64,
    now_ms: f64,
}

impl FixedStepTimer {
    /// Timer stepping `step_ms` per frame (non-positive steps use the nominal frame)
    pub fn new(step_ms: f64) -> Self {
        let step_ms = if step_ms.is_finite() && step_ms > 0.0 {
            step_ms
        } else {
            NOMINAL_FRAME_MS
        };
        Self {
            step_ms,
            now_ms: 0.0,
        }
    }

    pub fn with_hz(hz: u32) -> Self {
        Self::new(1000.0 / hz.max(1) as f64)
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance one step and return the new timestamp
    pub fn next_timestamp(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }
}
