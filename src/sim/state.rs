//! Game session state
//!
//! Everything one run of the game owns lives in `GameSession`, passed
//! explicitly to the tick. Restart resets it in place.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimClock;
use super::difficulty::{DifficultyParameters, current_level};
use super::events::GameEvent;
use super::objects::ObjectSet;
use super::scoring::ComboState;
use crate::consts::PADDLE_START_PERCENT;
use crate::settings::{PlayfieldTuning, Settings};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ticks are suspended
    Paused,
    /// Lives exhausted; only a restart leaves this phase
    GameOver,
}

/// Play area size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    /// Dimensions below one pixel are raised to one
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(1.0) } else { 1.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    pub fn percent_to_px(&self, percent: f32) -> f32 {
        percent / 100.0 * self.width
    }

    pub fn px_to_percent(&self, px: f32) -> f32 {
        px / self.width * 100.0
    }
}

/// Move direction for discrete paddle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// The player's paddle (bowl)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Center position, percent of play area width
    pub center_percent: f32,
    pub width_px: f32,
    /// Step per move command, percent of play area width
    pub speed_percent: f32,
}

impl Paddle {
    pub fn new(area: &PlayArea, playfield: &PlayfieldTuning, speed_percent: f32) -> Self {
        let mut paddle = Self {
            center_percent: PADDLE_START_PERCENT,
            width_px: Self::width_for(area, playfield),
            speed_percent,
        };
        paddle.clamp(area);
        paddle
    }

    /// Paddle width for a play area
    pub fn width_for(area: &PlayArea, playfield: &PlayfieldTuning) -> f32 {
        playfield
            .paddle_max_width_px
            .min(area.width * playfield.paddle_width_fraction)
            .min(area.width)
    }

    /// Allowed center range in percent, keeping the whole paddle inside the area
    pub fn bounds_percent(&self, area: &PlayArea) -> (f32, f32) {
        let half = area.px_to_percent(self.width_px / 2.0).min(50.0);
        (half, 100.0 - half)
    }

    pub fn clamp(&mut self, area: &PlayArea) {
        let (min, max) = self.bounds_percent(area);
        self.center_percent = self.center_percent.clamp(min, max);
    }

    /// Move one step in `direction`
    pub fn step(&mut self, direction: Direction, area: &PlayArea) {
        match direction {
            Direction::Left => self.center_percent -= self.speed_percent,
            Direction::Right => self.center_percent += self.speed_percent,
        }
        self.clamp(area);
    }

    /// Jump to an absolute position (drag/touch); non-finite targets are ignored
    pub fn set_target_percent(&mut self, percent: f32, area: &PlayArea) {
        if percent.is_finite() {
            self.center_percent = percent;
            self.clamp(area);
        }
    }

    /// Recompute width for a new play area size and re-clamp
    pub fn resize(&mut self, area: &PlayArea, playfield: &PlayfieldTuning) {
        self.width_px = Self::width_for(area, playfield);
        self.clamp(area);
    }

    pub fn center_px(&self, area: &PlayArea) -> f32 {
        area.percent_to_px(self.center_percent)
    }

    /// Horizontal span `(left, right)` in pixels
    pub fn span_px(&self, area: &PlayArea) -> (f32, f32) {
        let left = self.center_px(area) - self.width_px / 2.0;
        (left, left + self.width_px)
    }
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub phase: GamePhase,
    /// Best score known to this session (ledger value or beaten in this run)
    pub high_score: u64,
    pub area: PlayArea,
    pub paddle: Paddle,
    pub objects: ObjectSet,
    pub combo: ComboState,
    pub clock: SimClock,
    /// Difficulty in effect for the next spawn decision
    pub params: DifficultyParameters,
    /// Simulation time of the last spawn
    pub last_spawn_ms: Option<f64>,
    /// Level-up flash is active until this simulation time
    pub flash_until_ms: Option<f64>,
    /// Seed of the current run
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) next_id: u32,
    starting_high_score: u64,
}

impl GameSession {
    /// Start a new session
    pub fn new(settings: &Settings, seed: u64, high_score: u64) -> Self {
        let area = PlayArea::new(settings.area_width, settings.area_height);
        let params = settings
            .difficulty
            .policy
            .parameters_for(0, 1, &settings.difficulty);
        Self {
            score: 0,
            lives: settings.initial_lives,
            level: current_level(0, settings.difficulty.level_threshold),
            phase: GamePhase::Playing,
            high_score,
            area,
            paddle: Paddle::new(&area, &settings.playfield, params.paddle_speed_percent),
            objects: ObjectSet::new(),
            combo: ComboState::new(),
            clock: SimClock::new(),
            params,
            last_spawn_ms: None,
            flash_until_ms: None,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            starting_high_score: high_score,
        }
    }

    /// Reset for a restart. Keeps the play area, high score and id sequence.
    pub fn reset(&mut self, settings: &Settings, seed: u64) {
        let params = settings
            .difficulty
            .policy
            .parameters_for(0, 1, &settings.difficulty);
        self.score = 0;
        self.lives = settings.initial_lives;
        self.level = current_level(0, settings.difficulty.level_threshold);
        self.phase = GamePhase::Playing;
        self.paddle = Paddle::new(&self.area, &settings.playfield, params.paddle_speed_percent);
        self.objects.clear();
        self.combo.reset();
        self.clock.reset();
        self.params = params;
        self.last_spawn_ms = None;
        self.flash_until_ms = None;
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.starting_high_score = self.high_score;
    }

    pub fn is_running(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Suspend ticking. Returns false if not playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    /// Resume ticking from a fresh clock baseline. Returns false if not paused.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.clock.reset_baseline();
        true
    }

    /// Enter the terminal phase, returning the game over event the first time only
    pub fn end(&mut self) -> Option<GameEvent> {
        if self.phase == GamePhase::GameOver {
            return None;
        }
        self.phase = GamePhase::GameOver;
        Some(GameEvent::GameOver {
            final_score: self.score,
            is_new_high_score: self.is_new_high_score(),
        })
    }

    /// This run beat the best score known when it started
    pub fn is_new_high_score(&self) -> bool {
        self.score > self.starting_high_score
    }

    pub fn starting_high_score(&self) -> u64 {
        self.starting_high_score
    }

    /// Allocate an object id
    pub fn next_object_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Level-up flash is active at the current simulation time
    pub fn flash_active(&self) -> bool {
        self.flash_until_ms
            .is_some_and(|until| self.clock.elapsed_ms() < until)
    }

    /// Resize the play area; the paddle width follows
    pub fn resize(&mut self, width: f32, height: f32, settings: &Settings) {
        self.area = PlayArea::new(width, height);
        self.paddle.resize(&self.area, &settings.playfield);
    }
}
