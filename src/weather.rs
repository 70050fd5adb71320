use crate::colors;
use crate::config::{
    RAIN_SPAWN_PROBABILITY, RAIN_SPEED, SHIELD_DAMPING, SNOW_DRIFT, SNOW_SPAWN_PROBABILITY,
    SNOW_SPEED, WEATHER_MAX_INTERVAL_MS, WEATHER_MIN_INTERVAL_MS, WIND_AMPLITUDE, WIND_PHASE_RATE,
};
use crossterm::style::Color;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherMode {
    Clear,
    Rain,
    Snow,
    HeavyWind,
}

impl WeatherMode {
    pub const ALL: [WeatherMode; 4] = [
        WeatherMode::Clear,
        WeatherMode::Rain,
        WeatherMode::Snow,
        WeatherMode::HeavyWind,
    ];

    pub fn wind_multiplier(&self) -> f32 {
        match self {
            WeatherMode::Clear => 1.0,
            WeatherMode::Rain => 1.5,
            WeatherMode::Snow => 0.5,
            WeatherMode::HeavyWind => 3.0,
        }
    }

    pub fn background_color(&self) -> Color {
        match self {
            WeatherMode::Clear => colors::SKY_CLEAR,
            WeatherMode::Rain => colors::SKY_RAIN,
            WeatherMode::Snow => colors::SKY_SNOW,
            WeatherMode::HeavyWind => colors::SKY_WIND,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherMode::Clear => "Clear",
            WeatherMode::Rain => "Rainy",
            WeatherMode::Snow => "Snowy",
            WeatherMode::HeavyWind => "Windy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub drift: f32,
}

/// Random weather that changes every 30 to 60 seconds
pub struct WeatherCycle {
    current: WeatherMode,
    next_change: i64,
    pub raindrops: Vec<Raindrop>,
    pub snowflakes: Vec<Snowflake>,
}

impl WeatherCycle {
    pub fn new<R: Rng>(now: i64, rng: &mut R) -> Self {
        Self {
            current: WeatherMode::Clear,
            next_change: now + random_interval(rng),
            raindrops: Vec::new(),
            snowflakes: Vec::new(),
        }
    }

    pub fn current(&self) -> WeatherMode {
        self.current
    }

    #[cfg(test)]
    pub fn next_change(&self) -> i64 {
        self.next_change
    }

    /// Roll a new mode once the timer runs out
    pub fn tick<R: Rng>(&mut self, now: i64, rng: &mut R) -> WeatherMode {
        if now >= self.next_change {
            self.change(now, rng);
        }
        self.current
    }

    fn change<R: Rng>(&mut self, now: i64, rng: &mut R) {
        let old = self.current;
        self.current = WeatherMode::ALL[rng.gen_range(0..WeatherMode::ALL.len())];
        self.next_change = now + random_interval(rng);
        tracing::info!(from = ?old, to = ?self.current, "weather changed");

        // No fade-out: the sky is swapped in one frame
        self.raindrops.clear();
        self.snowflakes.clear();
    }

    /// Spawn and move rain or snow for one frame
    pub fn update_particles<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        match self.current {
            WeatherMode::Rain => {
                if rng.gen_bool(RAIN_SPAWN_PROBABILITY) {
                    self.raindrops.push(Raindrop {
                        x: rng.gen_range(0.0..width),
                        y: -5.0,
                        speed: rng.gen_range(RAIN_SPEED),
                    });
                }
                self.raindrops.retain_mut(|drop| {
                    drop.y += drop.speed;
                    drop.y <= height
                });
            }
            WeatherMode::Snow => {
                if rng.gen_bool(SNOW_SPAWN_PROBABILITY) {
                    self.snowflakes.push(Snowflake {
                        x: rng.gen_range(0.0..width),
                        y: -5.0,
                        speed: rng.gen_range(SNOW_SPEED),
                        drift: rng.gen_range(SNOW_DRIFT),
                    });
                }
                self.snowflakes.retain_mut(|flake| {
                    flake.y += flake.speed;
                    flake.x += flake.drift;
                    flake.y <= height
                });
            }
            WeatherMode::Clear | WeatherMode::HeavyWind => {}
        }
    }
}

fn random_interval<R: Rng>(rng: &mut R) -> i64 {
    rng.gen_range(WEATHER_MIN_INTERVAL_MS..=WEATHER_MAX_INTERVAL_MS)
}

/// Gusting wind that sways petals
#[derive(Debug, Default)]
pub struct Wind {
    phase: f64,
    force: f32,
}

impl Wind {
    pub fn update(&mut self, dt_ms: f64, multiplier: f32, shielded: bool) {
        self.phase += dt_ms * WIND_PHASE_RATE;
        let base = (self.phase.sin() * WIND_AMPLITUDE) as f32;
        let mut force = base * multiplier;
        if shielded {
            force *= SHIELD_DAMPING;
        }
        self.force = if force.is_nan() { 0.0 } else { force };
    }

    pub fn force(&self) -> f32 {
        self.force
    }
}
