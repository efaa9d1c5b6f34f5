//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as host timestamps, converted by `SimClock`
//! - Seeded RNG only
//! - Stable iteration order (spawn order, resolved back to front)
//! - No rendering, audio or storage dependencies

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod events;
pub mod objects;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::SimClock;
pub use collision::{Aabb, Catch, CatchZone, Resolution, resolve};
pub use difficulty::{DifficultyParameters, DifficultyPolicy, current_level, next_level_score};
pub use events::{EffectKind, GameEvent};
pub use objects::{ColorTag, FallingObject, ObjectSet};
pub use scoring::{CatchScore, ComboState};
pub use spawner::{SpawnContext, maybe_spawn, spawn_due};
pub use state::{Direction, GamePhase, GameSession, Paddle, PlayArea};
pub use tick::{TickInput, tick};
