//! Combo state and catch scoring
//!
//! points = point_value * speed_bonus * multiplier

use serde::{Deserialize, Serialize};

use crate::consts::NOMINAL_FRAME_MS;
use crate::settings::ComboRules;

/// Consecutive fast catches and the multiplier they earn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub consecutive_catches: u32,
    pub multiplier: u32,
    /// Simulation time of the last catch
    pub last_catch_ms: Option<f64>,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            consecutive_catches: 0,
            multiplier: 1,
            last_catch_ms: None,
        }
    }
}

/// Scoring outcome of one catch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchScore {
    pub speed_bonus: u32,
    pub multiplier: u32,
    pub points: u64,
    /// Multiplier differs from before the catch
    pub combo_changed: bool,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn time_since_last_catch(&self, now_ms: f64) -> Option<f64> {
        self.last_catch_ms.map(|last| now_ms - last)
    }

    /// Register a catch at `now_ms` and score an object worth `point_value`
    pub fn register_catch(&mut self, now_ms: f64, point_value: u32, rules: &ComboRules) -> CatchScore {
        let before = self.multiplier;

        let speed_bonus = match self.time_since_last_catch(now_ms) {
            Some(since) if since < rules.window_ms => {
                self.consecutive_catches += 1;
                self.multiplier = combo_multiplier(self.consecutive_catches, rules);
                speed_bonus(since, rules.speed_bonus_k)
            }
            _ => {
                self.consecutive_catches = 1;
                self.multiplier = baseline_multiplier(rules);
                1
            }
        };
        self.last_catch_ms = Some(now_ms);

        let points = (point_value.max(1) as u64)
            .saturating_mul(speed_bonus as u64)
            .saturating_mul(self.multiplier as u64);

        CatchScore {
            speed_bonus,
            multiplier: self.multiplier,
            points,
            combo_changed: self.multiplier != before,
        }
    }

    /// Drop the combo if the last catch is older than the timeout.
    /// Returns true if the combo was reset.
    pub fn decay(&mut self, now_ms: f64, rules: &ComboRules) -> bool {
        if self.consecutive_catches == 0 {
            return false;
        }
        match self.time_since_last_catch(now_ms) {
            Some(since) if since >= rules.timeout_ms => {
                self.consecutive_catches = 0;
                self.multiplier = 1;
                true
            }
            _ => false,
        }
    }
}

/// Multiplier for a run of `consecutive` fast catches
pub fn combo_multiplier(consecutive: u32, rules: &ComboRules) -> u32 {
    let cap = rules.cap.max(1);
    (1 + consecutive / rules.step.max(1)).min(cap)
}

/// Multiplier granted by a first or slow catch
pub fn baseline_multiplier(rules: &ComboRules) -> u32 {
    rules.baseline.clamp(1, rules.cap.max(1))
}

/// Bonus for catching quickly after the previous catch: `max(2, floor(K / since))`.
///
/// `since` is floored at one nominal frame, so catches resolved in the same tick
/// earn at most `K / NOMINAL_FRAME_MS` rather than an unbounded bonus.
pub fn speed_bonus(since_ms: f64, k: f64) -> u32 {
    let since = since_ms.max(NOMINAL_FRAME_MS);
    // Tolerate float noise in summed frame deltas (499.9999... ms is 500 ms)
    let bonus = (k / since + 1e-9).floor();
    if bonus >= u32::MAX as f64 {
        u32::MAX
    } else {
        (bonus as u32).max(2)
    }
}

/// Popup emphasis tier for a point value (0 = plain, up to 5)
pub fn popup_tier(points: u64) -> u8 {
    match points {
        0..=1 => 0,
        2 => 2,
        3 => 3,
        4 => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, Variant};

    fn classic() -> ComboRules {
        Settings::default().combo
    }

    #[test]
    fn test_first_catch_gets_baseline() {
        let rules = classic();
        let mut combo = ComboState::new();
        let score = combo.register_catch(1000.0, 1, &rules);
        assert_eq!(score.speed_bonus, 1);
        assert_eq!(score.multiplier, 2);
        assert_eq!(score.points, 2);
        assert!(score.combo_changed);
        assert_eq!(combo.consecutive_catches, 1);
        assert_eq!(combo.last_catch_ms, Some(1000.0));
    }

    #[test]
    fn test_fast_second_catch() {
        let rules = classic();
        let mut combo = ComboState::new();
        combo.register_catch(1000.0, 1, &rules);
        let score = combo.register_catch(1500.0, 1, &rules);

        assert_eq!(combo.consecutive_catches, 2);
        // 1 + 2 / 2
        assert_eq!(score.multiplier, 2);
        // max(2, 1500 / 500)
        assert_eq!(score.speed_bonus, 3);
        assert_eq!(score.points, 6);
        assert!(!score.combo_changed);
    }

    #[test]
    fn test_slow_catch_resets_run() {
        let rules = classic();
        let mut combo = ComboState::new();
        combo.register_catch(0.0, 1, &rules);
        combo.register_catch(200.0, 1, &rules);
        combo.register_catch(400.0, 1, &rules);
        assert_eq!(combo.consecutive_catches, 3);

        let score = combo.register_catch(1400.0, 1, &rules);
        assert_eq!(combo.consecutive_catches, 1);
        assert_eq!(score.speed_bonus, 1);
        assert_eq!(score.multiplier, 2);
    }

    #[test]
    fn test_multiplier_capped() {
        let rules = Settings::from_variant(Variant::Festival).combo;
        let mut combo = ComboState::new();
        let mut t = 0.0;
        for _ in 0..50 {
            let score = combo.register_catch(t, 1, &rules);
            assert!(score.multiplier >= 1 && score.multiplier <= rules.cap);
            t += 100.0;
        }
        assert_eq!(combo.multiplier, 5);
    }

    #[test]
    fn test_points_scale_with_value() {
        let rules = classic();
        let mut combo = ComboState::new();
        let score = combo.register_catch(0.0, 3, &rules);
        assert_eq!(score.points, 6);
    }

    #[test]
    fn test_decay_after_timeout() {
        let rules = classic();
        let mut combo = ComboState::new();
        assert!(!combo.decay(10_000.0, &rules));

        combo.register_catch(1000.0, 1, &rules);
        assert!(!combo.decay(3999.0, &rules));
        assert!(combo.decay(4000.0, &rules));
        assert_eq!(combo.consecutive_catches, 0);
        assert_eq!(combo.multiplier, 1);
        // Already reset
        assert!(!combo.decay(9000.0, &rules));
    }

    #[test]
    fn test_speed_bonus() {
        assert_eq!(speed_bonus(500.0, 1500.0), 3);
        assert_eq!(speed_bonus(900.0, 1500.0), 2);
        assert_eq!(speed_bonus(100.0, 1000.0), 10);
        // Same-tick catches count as one nominal frame apart
        assert_eq!(speed_bonus(0.0, 1500.0), 89);
        assert_eq!(speed_bonus(5.0, 1500.0), 89);
        // Float noise from summed deltas
        assert_eq!(speed_bonus(500.000_000_000_000_1, 1500.0), 3);
    }

    #[test]
    fn test_popup_tier() {
        assert_eq!(popup_tier(1), 0);
        assert_eq!(popup_tier(3), 3);
        assert_eq!(popup_tier(42), 5);
    }
}
