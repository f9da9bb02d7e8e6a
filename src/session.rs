#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::Time;
use crate::components::{
    Block, BlockColor, ColorRng, GameOverReason, GameState, Input, RoundState, TargetTimer,
};
use crate::difficulty::Difficulty;
use crate::events::{GameEvent, GameEvents, GameObserver};
use crate::queue;
use crate::scheduler::Scheduler;
use crate::systems;

/// One game instance. Owns its world; nothing happens unless the owner calls
/// in (input, [`GameSession::advance_time`]).
pub struct GameSession {
    pub world: World,
    suspended: bool,
}

impl GameSession {
    /// Creates a session in the Ready state. `seed` fixes the color sequence.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(GameState::default());
        world.insert_resource(Difficulty::default());
        world.insert_resource(TargetTimer::default());
        world.insert_resource(Scheduler::new());
        world.insert_resource(GameEvents::default());
        world.insert_resource(Input::default());
        world.insert_resource(ColorRng::new(seed));

        debug!("Created game session (seed: {seed:?})");
        Self {
            world,
            suspended: false,
        }
    }

    pub fn restart(&mut self) {
        systems::restart(&mut self.world);
    }

    /// Judges a beam against the current target. Ignored while suspended,
    /// since the player cannot see the lane.
    pub fn shoot(&mut self, color: BlockColor) {
        if self.suspended {
            debug!("Ignoring {color} shot while suspended");
            return;
        }
        systems::shoot(&mut self.world, color);
    }

    /// Shoots by color name; names that are not a color are ignored
    pub fn shoot_named(&mut self, name: &str) {
        match name.parse::<BlockColor>() {
            Ok(color) => self.shoot(color),
            Err(err) => debug!("Ignoring shot: {err}"),
        }
    }

    /// Records actions to be applied on the next [`GameSession::advance_time`]
    pub fn queue_input(&mut self, input: Input) {
        *self.world.resource_mut::<Input>() = input;
    }

    /// Applies queued input and moves game time forward.
    ///
    /// While suspended time stands still and only a queued restart is
    /// applied; a queued shot waits until the session resumes.
    pub fn advance_time(&mut self, delta_ms: u64) {
        if self.suspended {
            if self.world.resource::<Input>().restart {
                // The shot was aimed at the round being thrown away
                *self.world.resource_mut::<Input>() = Input::default();
                systems::restart(&mut self.world);
            }
            return;
        }
        systems::input_system(&mut self.world);
        systems::game_tick_system(&mut self.world, delta_ms);
    }

    /// Freezes game time entirely, e.g. while the host cannot display the lane
    pub fn set_suspended(&mut self, suspended: bool) {
        if self.suspended != suspended {
            info!("Session {}", if suspended { "suspended" } else { "resumed" });
        }
        self.suspended = suspended;
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<GameEvents>().drain()
    }

    /// Hands every pending event to `observer`, oldest first
    pub fn dispatch_events<O: GameObserver + ?Sized>(&mut self, observer: &mut O) {
        for event in self.drain_events() {
            event.dispatch(observer);
        }
    }

    /// Cancels every process and empties the lane. The session stays usable:
    /// a later restart starts over.
    pub fn dispose(&mut self) {
        self.world.resource_mut::<Scheduler>().cancel_all();
        let ids: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<Block>>()
            .iter(&self.world)
            .collect();
        for entity in ids {
            self.world.despawn(entity);
        }
        self.world.resource_mut::<GameState>().reset();
        self.world.resource_mut::<Difficulty>().reset();
        self.world.resource_mut::<TargetTimer>().idle();
        self.world.resource_mut::<GameEvents>().drain();
        debug!("Disposed game session");
    }

    #[must_use]
    pub fn round(&self) -> RoundState {
        self.world.resource::<GameState>().round
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.world.resource::<GameState>().score
    }

    #[must_use]
    pub fn countdown_remaining(&self) -> u32 {
        self.world.resource::<GameState>().countdown_remaining
    }

    #[must_use]
    pub fn game_over_reason(&self) -> Option<&GameOverReason> {
        self.world.resource::<GameState>().last_reason.as_ref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        *self.world.resource::<Difficulty>()
    }

    #[must_use]
    pub fn target_timer(&self) -> TargetTimer {
        *self.world.resource::<TargetTimer>()
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.world.resource::<Time>().elapsed_ms()
    }

    /// Live blocks in spawn order
    pub fn blocks(&mut self) -> Vec<Block> {
        queue::blocks(&mut self.world)
    }

    pub fn current_target(&mut self) -> Option<Block> {
        queue::current_target(&mut self.world)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(None)
    }
}
