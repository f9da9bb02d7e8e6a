#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Intervals are small positive millisecond counts, so float round trips stay exact enough
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use bevy_ecs::prelude::*;

use crate::game::{
    FALL_SPEED_FACTOR, MAX_FALL_SPEED, MAX_TIME_LIMIT_MS, MIN_SPAWN_INTERVAL_MS, MIN_TIME_LIMIT_MS,
    SPAWN_INTERVAL_FACTOR, START_FALL_SPEED, START_SPAWN_INTERVAL_MS, TIME_LIMIT_FACTOR,
};

/// Time allowed per target for a given spawn interval.
///
/// Scales with the spawn interval but stays within
/// [`MIN_TIME_LIMIT_MS`, `MAX_TIME_LIMIT_MS`].
#[must_use]
pub fn recalc_time_limit(spawn_interval_ms: u32) -> u32 {
    let scaled = (f64::from(spawn_interval_ms) * TIME_LIMIT_FACTOR).floor() as u32;
    scaled.clamp(MIN_TIME_LIMIT_MS, MAX_TIME_LIMIT_MS)
}

#[derive(Debug, Resource, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub spawn_interval_ms: u32,
    pub fall_speed: f32,
    pub time_limit_ms: u32,
    pub steps: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            spawn_interval_ms: START_SPAWN_INTERVAL_MS,
            fall_speed: START_FALL_SPEED,
            time_limit_ms: recalc_time_limit(START_SPAWN_INTERVAL_MS),
            steps: 0,
        }
    }
}

impl Difficulty {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applies one acceleration step
    pub fn accelerate(&mut self) {
        let next = (f64::from(self.spawn_interval_ms) * SPAWN_INTERVAL_FACTOR).floor() as u32;
        self.spawn_interval_ms = next.max(MIN_SPAWN_INTERVAL_MS);
        self.fall_speed = (self.fall_speed * FALL_SPEED_FACTOR).min(MAX_FALL_SPEED);
        self.time_limit_ms = recalc_time_limit(self.spawn_interval_ms);
        self.steps += 1;
    }

    // Shown in the HUD as "x.xx"
    #[must_use]
    pub fn speed_factor(&self) -> f32 {
        1000.0 / self.spawn_interval_ms as f32
    }
}
