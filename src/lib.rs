//! Balloon Catch - falling-object catch arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling, collisions, scoring)
//! - `game`: Loop driver wiring the simulation to its collaborators
//! - `highscores`: Persisted high score ledger
//! - `persistence`: Key-value storage backends
//! - `platform`: Input accumulation and headless frame timing
//! - `settings`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{EventLog, EventSink, Game, SinkError};
pub use highscores::HighScoreLedger;
pub use settings::{Settings, Variant};

/// Game configuration constants
pub mod consts {
    /// Duration of one nominal display frame; fall speeds are expressed per this frame
    pub const NOMINAL_FRAME_MS: f64 = 16.67;
    /// Delta assumed on the first tick after start/resume/restart
    pub const FIRST_TICK_MS: f64 = 16.7;
    /// Smallest delta a tick may advance by (clock rollback guard)
    pub const MIN_TICK_MS: f64 = 0.1;

    /// Default play area, matching the original 400x600 portrait board
    pub const DEFAULT_AREA_WIDTH: f32 = 400.0;
    pub const DEFAULT_AREA_HEIGHT: f32 = 600.0;

    /// Paddle starts centered
    pub const PADDLE_START_PERCENT: f32 = 50.0;

    /// Cosmetic timer durations handed to the render sink
    pub const CATCH_BURST_MS: u32 = 500;
    pub const SCORE_POPUP_MS: u32 = 1000;
    pub const PADDLE_BOUNCE_MS: u32 = 300;
}
