//! Difficulty and level progression
//!
//! Levels are coarse tiers of cumulative score. Spawn interval, fall speed and
//! paddle speed are derived from score/level by a selectable policy; both
//! policies are non-decreasing in difficulty and clamped to the configured
//! floor/ceilings.

use serde::{Deserialize, Serialize};

use crate::settings::DifficultyTuning;

/// Score below which the tiered curve stays gentle
pub const TIER_EASY_END: u64 = 15;
/// Score below which the tiered curve is in its medium band
pub const TIER_MEDIUM_END: u64 = 20;

/// Spawn interval reduction per point in the easy and hard bands
const TIER_INTERVAL_STEP_MS: f64 = 50.0;
/// Spawn interval reduction per point in the medium band
const TIER_MEDIUM_INTERVAL_STEP_MS: f64 = 100.0;
/// Fall speed increase per point in the medium band
const TIER_MEDIUM_SPEED_STEP: f32 = 0.1;

/// Derived per-tick difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParameters {
    pub spawn_interval_ms: f64,
    pub fall_speed_base: f32,
    pub paddle_speed_percent: f32,
}

/// How difficulty grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPolicy {
    /// Step function over score bands (<15, <20, beyond)
    #[default]
    ScoreTiered,
    /// Linear in level, clamped
    LevelLinear,
}

impl DifficultyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPolicy::ScoreTiered => "ScoreTiered",
            DifficultyPolicy::LevelLinear => "LevelLinear",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scoretiered" | "score-tiered" | "tiered" => Some(DifficultyPolicy::ScoreTiered),
            "levellinear" | "level-linear" | "linear" => Some(DifficultyPolicy::LevelLinear),
            _ => None,
        }
    }

    /// Difficulty for the given score and level
    pub fn parameters_for(
        &self,
        score: u64,
        level: u32,
        tuning: &DifficultyTuning,
    ) -> DifficultyParameters {
        let (interval, fall, paddle) = match self {
            DifficultyPolicy::ScoreTiered => {
                let s = score as f64;
                let easy = TIER_EASY_END as f64;
                let medium = TIER_MEDIUM_END as f64;
                let interval = if score < TIER_EASY_END {
                    tuning.spawn_interval_ms - s * TIER_INTERVAL_STEP_MS
                } else if score < TIER_MEDIUM_END {
                    tuning.spawn_interval_ms
                        - easy * TIER_INTERVAL_STEP_MS
                        - (s - easy) * TIER_MEDIUM_INTERVAL_STEP_MS
                } else {
                    tuning.spawn_interval_ms
                        - easy * TIER_INTERVAL_STEP_MS
                        - (medium - easy) * TIER_MEDIUM_INTERVAL_STEP_MS
                        - (s - medium) * TIER_INTERVAL_STEP_MS
                };

                let fall = if score < TIER_EASY_END {
                    tuning.fall_speed_base
                } else if score < TIER_MEDIUM_END {
                    tuning.fall_speed_base + (score - TIER_EASY_END) as f32 * TIER_MEDIUM_SPEED_STEP
                } else {
                    tuning.fall_speed_base
                        + (TIER_MEDIUM_END - TIER_EASY_END) as f32 * TIER_MEDIUM_SPEED_STEP
                        + (score - TIER_MEDIUM_END) as f32 * tuning.fall_speed_increment
                };

                (interval, fall, tuning.paddle_speed_percent)
            }
            DifficultyPolicy::LevelLinear => {
                let steps = level.saturating_sub(1) as f64;
                (
                    tuning.spawn_interval_ms - steps * tuning.spawn_interval_step_ms,
                    tuning.fall_speed_base + steps as f32 * tuning.fall_speed_increment,
                    tuning.paddle_speed_percent + steps as f32 * tuning.paddle_speed_increment,
                )
            }
        };

        DifficultyParameters {
            spawn_interval_ms: interval.max(tuning.spawn_interval_min_ms),
            fall_speed_base: fall.min(tuning.fall_speed_max.max(tuning.fall_speed_base)),
            paddle_speed_percent: paddle
                .min(tuning.paddle_speed_max.max(tuning.paddle_speed_percent)),
        }
    }
}

/// Level for a cumulative score (1-based)
pub fn current_level(score: u64, threshold: u64) -> u32 {
    let level = score / threshold.max(1) + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Score at which `level + 1` begins
pub fn next_level_score(level: u32, threshold: u64) -> u64 {
    (level as u64).saturating_mul(threshold.max(1))
}
