//! Game settings and balance tuning
//!
//! Every tunable the simulation reads lives here as a named, overridable value.
//! Persisted as JSON: a file on native, LocalStorage on the web.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_AREA_HEIGHT, DEFAULT_AREA_WIDTH};
use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::{ColorTag, DifficultyPolicy};

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Ten lives, score-tiered difficulty, generous combos, no specials
    #[default]
    Classic,
    /// Three lives, level-linear difficulty, rainbow specials
    Festival,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Festival => "Festival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "festival" | "fest" => Some(Variant::Festival),
            _ => None,
        }
    }
}

/// Paddle and catch geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldTuning {
    /// Paddle width never exceeds this many pixels
    pub paddle_max_width_px: f32,
    /// Paddle width as a fraction of the play area width
    pub paddle_width_fraction: f32,
    /// Catch band top, measured up from the bottom of the play area
    pub catch_band_top: f32,
    /// Catch band bottom, measured up from the bottom of the play area
    pub catch_band_bottom: f32,
    /// Miss line, measured up from the bottom of the play area
    pub miss_line_offset: f32,
    /// Falling object size in pixels
    pub object_width: f32,
    pub object_height: f32,
}

impl Default for PlayfieldTuning {
    fn default() -> Self {
        Self {
            paddle_max_width_px: 80.0,
            paddle_width_fraction: 0.2,
            catch_band_top: 70.0,
            catch_band_bottom: 50.0,
            miss_line_offset: 50.0,
            object_width: 30.0,
            object_height: 40.0,
        }
    }
}

/// Spawned object attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Colors a regular object is drawn from (uniformly)
    pub palette: Vec<ColorTag>,
    /// Points for catching a regular object
    pub base_point_value: u32,
    /// Probability [0, 1] that a spawn is promoted to a rainbow special
    pub special_chance: f64,
    /// Point value multiplier for specials
    pub special_point_multiplier: u32,
    /// Fall speed multiplier for specials
    pub special_speed_multiplier: f32,
    /// Upper bound of the random fall speed jitter
    pub fall_speed_jitter: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            palette: ColorTag::CLASSIC_PALETTE.to_vec(),
            base_point_value: 1,
            special_chance: 0.0,
            special_point_multiplier: 3,
            special_speed_multiplier: 1.3,
            fall_speed_jitter: 0.3,
        }
    }
}

/// Difficulty curve inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub policy: DifficultyPolicy,
    /// Score needed per level
    pub level_threshold: u64,
    pub spawn_interval_ms: f64,
    /// Floor the spawn interval never drops below
    pub spawn_interval_min_ms: f64,
    /// Interval reduction per level (level-linear policy)
    pub spawn_interval_step_ms: f64,
    /// Base fall speed in pixels per nominal frame
    pub fall_speed_base: f32,
    /// Fall speed increase per score point (tiered) or per level (linear)
    pub fall_speed_increment: f32,
    pub fall_speed_max: f32,
    /// Paddle step per move, percent of play area width
    pub paddle_speed_percent: f32,
    /// Paddle speed increase per level (level-linear policy)
    pub paddle_speed_increment: f32,
    pub paddle_speed_max: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            policy: DifficultyPolicy::ScoreTiered,
            level_threshold: 30,
            spawn_interval_ms: 3000.0,
            spawn_interval_min_ms: 800.0,
            spawn_interval_step_ms: 250.0,
            fall_speed_base: 0.7,
            fall_speed_increment: 0.05,
            fall_speed_max: 6.0,
            paddle_speed_percent: 10.0,
            paddle_speed_increment: 0.0,
            paddle_speed_max: 10.0,
        }
    }
}

/// Combo and speed bonus rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboRules {
    /// Catches closer together than this extend the combo
    pub window_ms: f64,
    /// Combo resets after this long without a catch
    pub timeout_ms: f64,
    /// Consecutive catches per multiplier step
    pub step: u32,
    /// Multiplier cap
    pub cap: u32,
    /// Multiplier granted by a first or slow catch
    pub baseline: u32,
    /// Speed bonus numerator: bonus = max(2, k / ms since last catch)
    pub speed_bonus_k: f64,
}

impl Default for ComboRules {
    fn default() -> Self {
        Self {
            window_ms: 1000.0,
            timeout_ms: 3000.0,
            step: 2,
            cap: 10,
            baseline: 2,
            speed_bonus_k: 1500.0,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset these values were derived from
    pub variant: Variant,
    pub initial_lives: u32,
    /// Play area size in pixels
    pub area_width: f32,
    pub area_height: f32,
    /// How long live objects stay flagged after a level up
    pub level_up_flash_ms: u32,

    pub playfield: PlayfieldTuning,
    pub spawn: SpawnTuning,
    pub difficulty: DifficultyTuning,
    pub combo: ComboRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            initial_lives: 10,
            area_width: DEFAULT_AREA_WIDTH,
            area_height: DEFAULT_AREA_HEIGHT,
            level_up_flash_ms: 2000,
            playfield: PlayfieldTuning::default(),
            spawn: SpawnTuning::default(),
            difficulty: DifficultyTuning::default(),
            combo: ComboRules::default(),
        }
    }
}

/// Settings that cannot drive a session
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{0} must be positive")]
    NotPositive(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("catch band top {top} must be above its bottom {bottom}")]
    EmptyCatchBand { top: f32, bottom: f32 },
    #[error("combo cap {cap} is below the baseline multiplier {baseline}")]
    ComboCapBelowBaseline { cap: u32, baseline: u32 },
    #[error("special chance {0} is outside [0, 1]")]
    SpecialChance(f64),
    #[error("spawn palette is empty")]
    EmptyPalette,
}

impl Settings {
    /// Storage key used on the web
    pub const STORAGE_KEY: &'static str = "balloon_catch_settings";

    /// Create settings from a variant preset
    pub fn from_variant(variant: Variant) -> Self {
        let mut settings = Self::default();
        settings.apply_variant(variant);
        settings
    }

    /// Apply a variant preset (overwrites every preset-controlled value)
    pub fn apply_variant(&mut self, variant: Variant) {
        self.variant = variant;
        match variant {
            Variant::Classic => {
                self.initial_lives = 10;
                self.spawn = SpawnTuning::default();
                self.difficulty = DifficultyTuning::default();
                self.combo = ComboRules::default();
            }
            Variant::Festival => {
                self.initial_lives = 3;
                self.spawn = SpawnTuning {
                    palette: ColorTag::FESTIVAL_PALETTE.to_vec(),
                    special_chance: 0.15,
                    ..SpawnTuning::default()
                };
                self.difficulty = DifficultyTuning {
                    policy: DifficultyPolicy::LevelLinear,
                    level_threshold: 20,
                    spawn_interval_ms: 2000.0,
                    spawn_interval_min_ms: 1000.0,
                    spawn_interval_step_ms: 150.0,
                    fall_speed_base: 1.0,
                    fall_speed_increment: 0.2,
                    fall_speed_max: 5.0,
                    paddle_speed_percent: 8.0,
                    paddle_speed_increment: 0.5,
                    paddle_speed_max: 14.0,
                };
                self.combo = ComboRules {
                    step: 3,
                    cap: 5,
                    baseline: 1,
                    speed_bonus_k: 1000.0,
                    ..ComboRules::default()
                };
            }
        }
    }

    /// Check the tuning is internally consistent
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("initial_lives", self.initial_lives as f64),
            ("area_width", self.area_width as f64),
            ("area_height", self.area_height as f64),
            ("playfield.paddle_max_width_px", self.playfield.paddle_max_width_px as f64),
            ("playfield.paddle_width_fraction", self.playfield.paddle_width_fraction as f64),
            ("playfield.object_width", self.playfield.object_width as f64),
            ("playfield.object_height", self.playfield.object_height as f64),
            ("spawn.base_point_value", self.spawn.base_point_value as f64),
            ("spawn.special_point_multiplier", self.spawn.special_point_multiplier as f64),
            ("spawn.special_speed_multiplier", self.spawn.special_speed_multiplier as f64),
            ("difficulty.level_threshold", self.difficulty.level_threshold as f64),
            ("difficulty.spawn_interval_min_ms", self.difficulty.spawn_interval_min_ms),
            ("difficulty.fall_speed_base", self.difficulty.fall_speed_base as f64),
            ("difficulty.paddle_speed_percent", self.difficulty.paddle_speed_percent as f64),
            ("combo.step", self.combo.step as f64),
            ("combo.baseline", self.combo.baseline as f64),
            ("combo.speed_bonus_k", self.combo.speed_bonus_k),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SettingsError::NotPositive(name));
            }
        }

        let non_negative = [
            ("playfield.catch_band_bottom", self.playfield.catch_band_bottom),
            ("playfield.miss_line_offset", self.playfield.miss_line_offset),
            ("spawn.fall_speed_jitter", self.spawn.fall_speed_jitter),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(SettingsError::Negative(name));
            }
        }

        // Offsets are measured up from the bottom, so the top needs the larger one
        if !(self.playfield.catch_band_top > self.playfield.catch_band_bottom) {
            return Err(SettingsError::EmptyCatchBand {
                top: self.playfield.catch_band_top,
                bottom: self.playfield.catch_band_bottom,
            });
        }

        if self.combo.cap < self.combo.baseline {
            return Err(SettingsError::ComboCapBelowBaseline {
                cap: self.combo.cap,
                baseline: self.combo.baseline,
            });
        }
        if !(0.0..=1.0).contains(&self.spawn.special_chance) {
            return Err(SettingsError::SpecialChance(self.spawn.special_chance));
        }
        if self.spawn.palette.is_empty() {
            return Err(SettingsError::EmptyPalette);
        }
        Ok(())
    }

    /// Parse and validate settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings from a key-value store, `None` if never saved
    pub fn load_from_store(store: &impl KeyValueStore) -> Result<Option<Self>, SettingsError> {
        match store.get(Self::STORAGE_KEY)? {
            Some(json) => Self::from_json(&json).map(Some),
            None => Ok(None),
        }
    }

    pub fn save_to_store(&self, store: &mut impl KeyValueStore) -> Result<(), SettingsError> {
        store.set(Self::STORAGE_KEY, &serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Settings for a new game: stored settings unless the host asks for a
    /// different variant, in which case that preset wins.
    pub fn load_or_preset(store: &impl KeyValueStore, requested: Option<Variant>) -> Self {
        match Self::load_from_store(store) {
            Ok(Some(stored)) => match requested {
                Some(variant) if variant != stored.variant => {
                    log::info!(
                        "Requested {} preset replaces stored {} settings",
                        variant.as_str(),
                        stored.variant.as_str()
                    );
                    Self::from_variant(variant)
                }
                _ => {
                    log::info!("Using stored {} settings", stored.variant.as_str());
                    stored
                }
            },
            Ok(None) => Self::from_variant(requested.unwrap_or_default()),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::from_variant(requested.unwrap_or_default())
            }
        }
    }
}
