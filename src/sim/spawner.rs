//! Object spawning
//!
//! Fires when the spawn interval has elapsed since the last spawn. Position and
//! color are uniform random; a configured fraction of spawns become rainbow
//! specials that are worth more and fall faster.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::DifficultyParameters;
use super::objects::{ColorTag, FallingObject};
use super::state::PlayArea;
use crate::settings::{PlayfieldTuning, SpawnTuning};

/// Borrowed session pieces the spawner needs
pub struct SpawnContext<'a> {
    pub area: &'a PlayArea,
    pub playfield: &'a PlayfieldTuning,
    pub tuning: &'a SpawnTuning,
    pub rng: &'a mut Pcg32,
    pub next_id: &'a mut u32,
}

/// Whether a spawn is due at `now_ms`
pub fn spawn_due(now_ms: f64, last_spawn_ms: Option<f64>, params: &DifficultyParameters) -> bool {
    match last_spawn_ms {
        Some(last) => now_ms - last > params.spawn_interval_ms,
        None => true,
    }
}

/// Spawn an object if one is due
pub fn maybe_spawn(
    now_ms: f64,
    last_spawn_ms: Option<f64>,
    params: &DifficultyParameters,
    ctx: &mut SpawnContext<'_>,
) -> Option<FallingObject> {
    if !spawn_due(now_ms, last_spawn_ms, params) {
        return None;
    }
    Some(spawn_object(params, ctx))
}

/// Create one object with randomized attributes
pub fn spawn_object(params: &DifficultyParameters, ctx: &mut SpawnContext<'_>) -> FallingObject {
    let size = Vec2::new(ctx.playfield.object_width, ctx.playfield.object_height);

    let max_x = ctx.area.width - size.x;
    let x = if max_x > 0.0 {
        ctx.rng.random_range(0.0..=max_x)
    } else {
        0.0
    };

    let color = if ctx.tuning.palette.is_empty() {
        ColorTag::Red
    } else {
        ctx.tuning.palette[ctx.rng.random_range(0..ctx.tuning.palette.len())]
    };

    let chance = ctx.tuning.special_chance.clamp(0.0, 1.0);
    let is_special = chance > 0.0 && ctx.rng.random_bool(chance);

    let speed_multiplier = if is_special {
        ctx.tuning.special_speed_multiplier
    } else {
        1.0
    };
    let jitter = ctx.rng.random::<f32>() * ctx.tuning.fall_speed_jitter.max(0.0);
    let fall_speed = (params.fall_speed_base * speed_multiplier + jitter).max(f32::EPSILON);

    let id = *ctx.next_id;
    *ctx.next_id = ctx.next_id.wrapping_add(1).max(1);

    let mut object = FallingObject::new(
        id,
        Vec2::new(x, 0.0),
        size,
        fall_speed,
        if is_special { ColorTag::Rainbow } else { color },
    );
    let base = ctx.tuning.base_point_value.max(1);
    object.point_value = if is_special {
        base.saturating_mul(ctx.tuning.special_point_multiplier.max(1))
    } else {
        base
    };
    object.is_special = is_special;

    log::debug!(
        "Spawned object {} at x={:.1} ({}, speed {:.2}{})",
        object.id,
        x,
        object.color.as_str(),
        fall_speed,
        if is_special { ", special" } else { "" }
    );
    object
}
