#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::{BlockColor, BlockId};

/// Everything a renderer needs to mirror the game, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BlockSpawned {
        id: BlockId,
        color: BlockColor,
        position: f32,
    },
    BlockPositionChanged {
        id: BlockId,
        position: f32,
    },
    BlockRemoved {
        id: BlockId,
    },
    BeamFired {
        color: BlockColor,
    },
    GameOver {
        reason: String,
    },
    ScoreChanged {
        score: u32,
    },
    SpeedChanged {
        speed_factor: f32,
    },
    TimerRatioChanged {
        ratio: f32,
    },
    CountdownTick {
        seconds_remaining: u32,
    },
}

/// Renderer side of the event interface. Every hook defaults to doing nothing.
pub trait GameObserver {
    fn on_block_spawned(&mut self, _id: BlockId, _color: BlockColor, _position: f32) {}
    fn on_block_position_changed(&mut self, _id: BlockId, _position: f32) {}
    fn on_block_removed(&mut self, _id: BlockId) {}
    fn on_beam_fired(&mut self, _color: BlockColor) {}
    fn on_game_over(&mut self, _reason: &str) {}
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_speed_changed(&mut self, _speed_factor: f32) {}
    fn on_timer_ratio_changed(&mut self, _ratio: f32) {}
    fn on_countdown_tick(&mut self, _seconds_remaining: u32) {}
}

impl GameEvent {
    pub fn dispatch<O: GameObserver + ?Sized>(&self, observer: &mut O) {
        match self {
            GameEvent::BlockSpawned {
                id,
                color,
                position,
            } => observer.on_block_spawned(*id, *color, *position),
            GameEvent::BlockPositionChanged { id, position } => {
                observer.on_block_position_changed(*id, *position);
            }
            GameEvent::BlockRemoved { id } => observer.on_block_removed(*id),
            GameEvent::BeamFired { color } => observer.on_beam_fired(*color),
            GameEvent::GameOver { reason } => observer.on_game_over(reason),
            GameEvent::ScoreChanged { score } => observer.on_score_changed(*score),
            GameEvent::SpeedChanged { speed_factor } => observer.on_speed_changed(*speed_factor),
            GameEvent::TimerRatioChanged { ratio } => observer.on_timer_ratio_changed(*ratio),
            GameEvent::CountdownTick { seconds_remaining } => {
                observer.on_countdown_tick(*seconds_remaining);
            }
        }
    }
}

// Outbound buffer, drained by whoever owns the session
#[derive(Resource, Debug, Default)]
pub struct GameEvents {
    pending: Vec<GameEvent>,
}

impl GameEvents {
    pub fn emit(&mut self, event: GameEvent) {
        trace!("Event: {event:?}");
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Shorthand for systems that only hold the world
pub fn emit(world: &mut World, event: GameEvent) {
    world.resource_mut::<GameEvents>().emit(event);
}
