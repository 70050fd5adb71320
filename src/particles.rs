//! Falling petals shed by a grown tree

use crate::colors;
use crate::config::{
    GROUND_HEIGHT, PETAL_CANOPY_DEPTH, PETAL_CANOPY_OFFSET, PETAL_LIFE_DECAY, PETAL_MIN_AGE,
    PETAL_SPAWN_PROBABILITY, PETAL_SPREAD, PETAL_WIND_SCALE, WORLD_WIDTH,
};
use crossterm::style::Color;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Petal {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// 1.0 at spawn, gone at 0.0
    pub life: f32,
    pub color: Color,
    pub size: f32,
}

#[derive(Debug, Default)]
pub struct PetalSystem {
    pub petals: Vec<Petal>,
}

impl PetalSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32) {
        self.petals.push(Petal {
            x,
            y,
            vx: rng.gen_range(-0.25..0.25),
            vy: rng.gen_range(0.2..0.5),
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: rng.gen_range(-0.05..0.05),
            life: 1.0,
            color: if rng.gen_bool(0.5) {
                colors::PETAL_PINK
            } else {
                colors::PETAL_WHITE
            },
            size: rng.gen_range(3.0..5.0),
        });
    }

    /// Shed new petals from the canopy and move the rest with the wind
    pub fn update<R: Rng>(&mut self, rng: &mut R, tree_age: u64, wind_force: f32, height: f32) {
        if tree_age > PETAL_MIN_AGE && rng.gen_bool(PETAL_SPAWN_PROBABILITY) {
            let x = WORLD_WIDTH / 2.0 + rng.gen_range(-PETAL_SPREAD..PETAL_SPREAD);
            let y = height - GROUND_HEIGHT - PETAL_CANOPY_OFFSET
                - rng.gen_range(0.0..PETAL_CANOPY_DEPTH);
            self.spawn(rng, x, y);
        }

        self.petals.retain_mut(|petal| {
            petal.x += petal.vx + wind_force * PETAL_WIND_SCALE;
            petal.y += petal.vy;
            petal.rotation += petal.rotation_speed;
            petal.life -= PETAL_LIFE_DECAY;
            petal.life > 0.0 && petal.y <= height
        });
    }

    pub fn clear(&mut self) {
        self.petals.clear();
    }
}
