#![warn(clippy::all, clippy::pedantic)]

// Lane geometry, in lane units (the browser layout used pixels)
pub const LANE_HEIGHT: f32 = 600.0;
pub const BLOCK_SIZE: f32 = 60.0;
pub const SPAWN_POSITION: f32 = -BLOCK_SIZE; // Just above the visible lane
pub const FLOOR_POSITION: f32 = LANE_HEIGHT - BLOCK_SIZE; // Touching the floor ends the round

// Round start
pub const COUNTDOWN_SECONDS: u32 = 3;
pub const COUNTDOWN_STEP_MS: u64 = 1000;
pub const INITIAL_BLOCKS: usize = 5;
pub const INITIAL_STAGGER: f32 = 70.0; // Gap between pre-stacked blocks

// Difficulty curve
pub const START_SPAWN_INTERVAL_MS: u32 = 1000;
pub const MIN_SPAWN_INTERVAL_MS: u32 = 260;
pub const SPAWN_INTERVAL_FACTOR: f64 = 0.92; // 8% faster every step
pub const START_FALL_SPEED: f32 = 1.2; // Units per reference frame
pub const MAX_FALL_SPEED: f32 = 4.5;
pub const FALL_SPEED_FACTOR: f32 = 1.08;
pub const ACCELERATION_PERIOD_MS: u64 = 6000;
pub const REFERENCE_FRAMES_PER_SECOND: f32 = 60.0;

// Per-target time limit
pub const TIME_LIMIT_FACTOR: f64 = 1.25; // A bit more than one spawn interval
pub const MIN_TIME_LIMIT_MS: u32 = 420;
pub const MAX_TIME_LIMIT_MS: u32 = 1400;
pub const TARGET_TICK_MS: u64 = 50;
