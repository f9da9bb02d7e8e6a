use bevy_ecs::prelude::*;

use crate::components::{GameState, RoundState};
use crate::events::{GameEvent, GameEvents};
use crate::game::{COUNTDOWN_SECONDS, COUNTDOWN_STEP_MS};
use crate::session::GameSession;

/// Time from restart until the round is Playing
pub const COUNTDOWN_MS: u64 = COUNTDOWN_SECONDS as u64 * COUNTDOWN_STEP_MS;

/// Creates a world with every game resource, in the Ready state
#[must_use]
pub fn create_test_world() -> World {
    GameSession::new(Some(1)).world
}

/// Creates a world already in the Playing state, without any blocks or
/// scheduled processes
#[must_use]
pub fn create_playing_world() -> World {
    let mut world = create_test_world();
    world.resource_mut::<GameState>().round = RoundState::Playing;
    world
}

/// A seeded session that has gone through its countdown and is now Playing
/// with the initial blocks in the lane
#[must_use]
pub fn playing_session(seed: u64) -> GameSession {
    let mut session = GameSession::new(Some(seed));
    session.restart();
    session.advance_time(COUNTDOWN_MS);
    session.drain_events();
    session
}

pub fn take_events(world: &mut World) -> Vec<GameEvent> {
    world.resource_mut::<GameEvents>().drain()
}
