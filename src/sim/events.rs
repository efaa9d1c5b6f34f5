//! Events emitted by the simulation for render/audio collaborators
//!
//! Events carry semantic data only. Sinks map object ids to their own
//! visual handles. Cosmetic timers (bursts, popups, bounces) arrive as
//! fire-and-forget `Effect` events with a duration; the simulation never
//! waits on them.

use serde::{Deserialize, Serialize};

use super::objects::ColorTag;

/// Cosmetic effect kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Burst at the catch point
    CatchBurst { color: ColorTag },
    /// Floating "+points" label; `tier` picks its emphasis
    ScorePopup { points: u64, tier: u8 },
    /// Paddle bounce animation
    PaddleBounce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ObjectSpawned {
        id: u32,
        x: f32,
        color: ColorTag,
        speed: f32,
        is_special: bool,
    },
    ObjectAdvanced {
        id: u32,
        y: f32,
    },
    ObjectCaught {
        id: u32,
        x: f32,
        y: f32,
        color: ColorTag,
        points: u64,
    },
    ObjectMissed {
        id: u32,
        x: f32,
        y: f32,
    },
    LevelUp {
        level: u32,
        next_level_score: u64,
    },
    GameOver {
        final_score: u64,
        is_new_high_score: bool,
    },
    ScoreChanged {
        score: u64,
    },
    LivesChanged {
        lives: u32,
    },
    ComboChanged {
        multiplier: u32,
    },
    HighScoreChanged {
        high_score: u64,
    },
    /// Live objects flagged special for a while (level-up celebration)
    SpecialFlash {
        ids: Vec<u32>,
        duration_ms: u32,
    },
    Effect {
        kind: EffectKind,
        x: f32,
        y: f32,
        duration_ms: u32,
    },
}

impl GameEvent {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::ObjectSpawned { .. } => "object_spawned",
            GameEvent::ObjectAdvanced { .. } => "object_advanced",
            GameEvent::ObjectCaught { .. } => "object_caught",
            GameEvent::ObjectMissed { .. } => "object_missed",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::GameOver { .. } => "game_over",
            GameEvent::ScoreChanged { .. } => "score_changed",
            GameEvent::LivesChanged { .. } => "lives_changed",
            GameEvent::ComboChanged { .. } => "combo_changed",
            GameEvent::HighScoreChanged { .. } => "high_score_changed",
            GameEvent::SpecialFlash { .. } => "special_flash",
            GameEvent::Effect { .. } => "effect",
        }
    }

    /// Per-frame motion updates, usually too noisy to log
    pub fn is_motion(&self) -> bool {
        matches!(self, GameEvent::ObjectAdvanced { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let event = GameEvent::ObjectCaught {
            id: 4,
            x: 12.5,
            y: 530.0,
            color: ColorTag::Purple,
            points: 6,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "object_caught");
        assert_eq!(json["color"], "purple");
        assert_eq!(json["points"], 6);
        assert_eq!(event.name(), "object_caught");

        let effect = GameEvent::Effect {
            kind: EffectKind::PaddleBounce,
            x: 0.0,
            y: 0.0,
            duration_ms: 300,
        };
        let json = serde_json::to_string(&effect).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effect);
    }
}
