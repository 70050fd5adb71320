use std::ops::Range;

/// Internal drawing surface, in virtual pixels
pub const WORLD_WIDTH: f32 = 320.0;
pub const WORLD_HEIGHT: f32 = 480.0;
pub const GROUND_HEIGHT: f32 = 40.0;

// Growth tuning
pub const NEW_GAME_WATER: f64 = 50.0;
pub const RESET_WATER: f64 = 100.0;
pub const MAX_WATER: f64 = 100.0;
pub const WATER_PER_POUR: f64 = 10.0;
pub const WATER_DECAY_PER_DAY: f64 = 0.1;
pub const SKIP_DAY_WATER_LOSS: f64 = 10.0;
pub const WARP_DAYS: u64 = 730;

/// 1 minute of real time is roughly 180 virtual days
pub const DEFAULT_MS_PER_DAY: i64 = 60_000 / 180;

// Tree shape
pub const TRUNK_LENGTH: f32 = 60.0;
pub const BRANCH_SHRINK: f32 = 0.75;
pub const SPREAD_BASE: f32 = 0.3;
pub const SPREAD_JITTER: f32 = 0.2;
pub const AGE_PER_DEPTH: u64 = 120;
pub const MIN_GEN_DEPTH: u32 = 2;
pub const MAX_GEN_DEPTH: u32 = 7;
pub const TRIM_RADIUS: f32 = 10.0;

// Weather
pub const WEATHER_MIN_INTERVAL_MS: i64 = 30_000;
pub const WEATHER_MAX_INTERVAL_MS: i64 = 60_000;
pub const RAIN_SPAWN_PROBABILITY: f64 = 0.3;
pub const SNOW_SPAWN_PROBABILITY: f64 = 0.2;
pub const SHIELD_DAMPING: f32 = 0.1;
pub const RAIN_SPEED: Range<f32> = 3.0..5.0;
pub const SNOW_SPEED: Range<f32> = 0.5..1.5;
pub const SNOW_DRIFT: Range<f32> = -0.25..0.25;
/// Wind phase advance per elapsed millisecond
pub const WIND_PHASE_RATE: f64 = 0.001;
pub const WIND_AMPLITUDE: f64 = 0.1;

// Petals
pub const PETAL_SPAWN_PROBABILITY: f64 = 0.02;
pub const PETAL_MIN_AGE: u64 = 10;
pub const PETAL_LIFE_DECAY: f32 = 0.002;
pub const PETAL_WIND_SCALE: f32 = 20.0;
/// Petals shed from a band starting this far above the ground
pub const PETAL_CANOPY_OFFSET: f32 = 60.0;
pub const PETAL_CANOPY_DEPTH: f32 = 100.0;
/// Horizontal reach either side of the trunk
pub const PETAL_SPREAD: f32 = 30.0;

pub const MESSAGE_DURATION_MS: i64 = 2_000;
pub const DEFAULT_FPS: u32 = 30;

/// How the canopy is regenerated between frames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeMode {
    /// Fresh branch angles every frame
    #[default]
    Living,
    /// Same shape until the tree ages
    Stable,
}

/// Session tuning
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub ms_per_day: i64,
    pub shape: ShapeMode,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ms_per_day: DEFAULT_MS_PER_DAY,
            shape: ShapeMode::Living,
            seed: 0,
        }
    }
}

/// Configuration for the interactive front end
#[derive(Clone)]
pub struct AppConfig {
    pub game: GameConfig,
    pub fps: u32,
}

impl AppConfig {
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.fps.clamp(1, 120) as f32
    }
}
