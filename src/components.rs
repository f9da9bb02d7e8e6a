#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow precision loss when casting between numeric types since timer ratios are only displayed
    clippy::cast_precision_loss
)]

use bevy_ecs::prelude::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Red,
    Green,
    Blue,
}

impl BlockColor {
    pub const ALL: [BlockColor; 3] = [BlockColor::Red, BlockColor::Green, BlockColor::Blue];

    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        match rng.u8(0..3) {
            0 => BlockColor::Red,
            1 => BlockColor::Green,
            _ => BlockColor::Blue,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BlockColor::Red => "red",
            BlockColor::Green => "green",
            BlockColor::Blue => "blue",
        }
    }

    #[must_use]
    pub fn get_color(self) -> ratatui::style::Color {
        match self {
            BlockColor::Red => ratatui::style::Color::Red,
            BlockColor::Green => ratatui::style::Color::Green,
            BlockColor::Blue => ratatui::style::Color::Blue,
        }
    }
}

impl fmt::Display for BlockColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an input names no known color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color: {:?}", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for BlockColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(BlockColor::Red),
            "green" | "g" => Ok(BlockColor::Green),
            "blue" | "b" => Ok(BlockColor::Blue),
            _ => Err(UnknownColor(s.to_string())),
        }
    }
}

/// Stable identifier handed to renderers; never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub color: BlockColor,
    pub position: f32,
    pub spawned_at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    #[default]
    Ready,
    Countdown,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOverReason {
    WrongColor { expected: BlockColor },
    Timeout { expected: BlockColor },
    FloorReached,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::WrongColor { expected } => {
                write!(f, "Wrong! It was {}", expected.name().to_uppercase())
            }
            GameOverReason::Timeout { expected } => write!(
                f,
                "Time's up! Next was {} (press R to restart)",
                expected.name().to_uppercase()
            ),
            GameOverReason::FloorReached => f.write_str("A block hit the floor!"),
        }
    }
}

#[derive(Debug, Resource, Clone, Default)]
pub struct GameState {
    pub round: RoundState,
    pub score: u32,
    pub paused: bool,
    pub countdown_remaining: u32,
    pub last_reason: Option<GameOverReason>,
    pub next_block_id: u64,
}

impl GameState {
    /// Clears the round but keeps the block id counter running
    pub fn reset(&mut self) {
        let next_block_id = self.next_block_id;
        *self = Self::default();
        self.next_block_id = next_block_id;
    }

    pub fn allocate_block_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.round == RoundState::Playing && !self.paused
    }
}

// Countdown budget for matching the current target
#[derive(Debug, Resource, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetTimer {
    pub limit_ms: u32,
    pub remaining_ms: u32,
    pub active: bool,
}

impl TargetTimer {
    pub fn reset(&mut self, limit_ms: u32) {
        self.limit_ms = limit_ms;
        self.remaining_ms = limit_ms;
        self.active = true;
    }

    pub fn idle(&mut self) {
        self.active = false;
    }

    /// Takes `step_ms` off the budget and reports whether it ran out
    pub fn tick(&mut self, step_ms: u32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(step_ms);
        self.remaining_ms == 0
    }

    #[must_use]
    pub fn ratio(&self) -> f32 {
        if !self.active || self.limit_ms == 0 {
            return 1.0;
        }
        (self.remaining_ms as f32 / self.limit_ms as f32).clamp(0.0, 1.0)
    }
}

// Pending player actions, consumed by the input system
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pub shoot: Option<BlockColor>,
    pub restart: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct ColorRng(pub fastrand::Rng);

impl ColorRng {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(fastrand::Rng::with_seed(seed)),
            None => Self(fastrand::Rng::new()),
        }
    }

    pub fn next_color(&mut self) -> BlockColor {
        BlockColor::random(&mut self.0)
    }
}
