pub mod app;
pub mod components;
pub mod config;
pub mod difficulty;
pub mod events;
pub mod game;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod sound;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

use bevy_ecs::prelude::Resource;

pub use components::{BlockColor, BlockId, GameOverReason, RoundState};
pub use events::{GameEvent, GameObserver};
pub use session::GameSession;

/// Game clock in milliseconds. Only moves when the session is told to advance time.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Time {
    elapsed_ms: u64,
}

impl Time {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock to `now_ms`; an earlier time leaves it where it is
    pub fn advance_to(&mut self, now_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.max(now_ms);
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
