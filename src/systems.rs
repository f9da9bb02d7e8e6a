#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Millisecond spans fed to the physics step are far below f32's exact range
    clippy::cast_precision_loss
)]

use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::Time;
use crate::components::{
    BlockColor, ColorRng, GameOverReason, GameState, Input, RoundState, TargetTimer,
};
use crate::difficulty::Difficulty;
use crate::events::{GameEvent, emit};
use crate::game::{
    ACCELERATION_PERIOD_MS, COUNTDOWN_SECONDS, COUNTDOWN_STEP_MS, INITIAL_BLOCKS, INITIAL_STAGGER,
    REFERENCE_FRAMES_PER_SECOND, SPAWN_POSITION, TARGET_TICK_MS,
};
use crate::queue;
use crate::scheduler::{Process, Scheduler};

fn now_ms(world: &World) -> u64 {
    world.resource::<Time>().elapsed_ms()
}

fn is_running(world: &World) -> bool {
    world.resource::<GameState>().is_running()
}

/// Starts a fresh round with a countdown. Safe to call in any state; a
/// countdown already in progress is replaced by the new one.
pub fn restart(world: &mut World) {
    info!("Restarting round");

    // Nothing from the previous round may fire after this point
    world.resource_mut::<Scheduler>().cancel_all();
    queue::clear_blocks(world);

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.reset();
        game_state.round = RoundState::Countdown;
        game_state.paused = true;
        game_state.countdown_remaining = COUNTDOWN_SECONDS;
    }
    world.resource_mut::<Difficulty>().reset();
    world.resource_mut::<TargetTimer>().idle();

    let speed_factor = world.resource::<Difficulty>().speed_factor();
    emit(world, GameEvent::ScoreChanged { score: 0 });
    emit(world, GameEvent::SpeedChanged { speed_factor });
    emit(world, GameEvent::TimerRatioChanged { ratio: 1.0 });
    emit(
        world,
        GameEvent::CountdownTick {
            seconds_remaining: COUNTDOWN_SECONDS,
        },
    );

    let now = now_ms(world);
    world
        .resource_mut::<Scheduler>()
        .every(Process::Countdown, now, COUNTDOWN_STEP_MS);
}

pub fn countdown_step_system(world: &mut World) {
    let remaining = {
        let mut game_state = world.resource_mut::<GameState>();
        if game_state.round != RoundState::Countdown {
            return;
        }
        game_state.countdown_remaining = game_state.countdown_remaining.saturating_sub(1);
        game_state.countdown_remaining
    };

    emit(
        world,
        GameEvent::CountdownTick {
            seconds_remaining: remaining,
        },
    );

    if remaining == 0 {
        world.resource_mut::<Scheduler>().cancel(Process::Countdown);
        start_round(world);
    }
}

fn start_round(world: &mut World) {
    // Pre-stack the lane, first block lowest
    for i in 0..INITIAL_BLOCKS {
        let color = world.resource_mut::<ColorRng>().next_color();
        let offset = (INITIAL_BLOCKS - 1 - i) as f32 * INITIAL_STAGGER;
        queue::spawn_block(world, color, SPAWN_POSITION + offset);
    }

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.round = RoundState::Playing;
        game_state.paused = false;
    }
    reset_target_timer(world);

    let now = now_ms(world);
    let spawn_interval_ms = u64::from(world.resource::<Difficulty>().spawn_interval_ms);
    let mut scheduler = world.resource_mut::<Scheduler>();
    scheduler.every(Process::Spawn, now, spawn_interval_ms);
    scheduler.every(Process::Accelerate, now, ACCELERATION_PERIOD_MS);
    scheduler.every(Process::TargetTick, now, TARGET_TICK_MS);

    info!("Round started with {INITIAL_BLOCKS} blocks");
}

fn reset_target_timer(world: &mut World) {
    let limit_ms = world.resource::<Difficulty>().time_limit_ms;
    world.resource_mut::<TargetTimer>().reset(limit_ms);
    emit(world, GameEvent::TimerRatioChanged { ratio: 1.0 });
}

pub fn spawn_system(world: &mut World) {
    if !is_running(world) {
        return;
    }

    let color = world.resource_mut::<ColorRng>().next_color();
    queue::spawn_block(world, color, SPAWN_POSITION);

    // A spawn into an empty lane is a new target
    if queue::len(world) == 1 {
        reset_target_timer(world);
    }
}

pub fn accelerate_system(world: &mut World) {
    if !is_running(world) {
        return;
    }

    let difficulty = {
        let mut difficulty = world.resource_mut::<Difficulty>();
        difficulty.accelerate();
        *difficulty
    };
    debug!(
        "Accelerated: spawn every {}ms, fall speed {:.2}, time limit {}ms",
        difficulty.spawn_interval_ms, difficulty.fall_speed, difficulty.time_limit_ms
    );

    let now = now_ms(world);
    world.resource_mut::<Scheduler>().every(
        Process::Spawn,
        now,
        u64::from(difficulty.spawn_interval_ms),
    );

    // The remaining budget is kept, only the limit follows the new pace
    let ratio = {
        let mut timer = world.resource_mut::<TargetTimer>();
        timer.limit_ms = difficulty.time_limit_ms;
        timer.ratio()
    };

    emit(
        world,
        GameEvent::SpeedChanged {
            speed_factor: difficulty.speed_factor(),
        },
    );
    emit(world, GameEvent::TimerRatioChanged { ratio });
}

pub fn target_tick_system(world: &mut World) {
    if !is_running(world) {
        return;
    }

    let Some(target) = queue::current_target(world) else {
        return;
    };

    let (expired, ratio) = {
        let mut timer = world.resource_mut::<TargetTimer>();
        if !timer.active {
            return;
        }
        let step = u32::try_from(TARGET_TICK_MS).unwrap_or(u32::MAX);
        (timer.tick(step), timer.ratio())
    };
    trace!("Target {} timer ratio {ratio:.2}", target.id);

    emit(world, GameEvent::TimerRatioChanged { ratio });

    if expired {
        game_over(
            world,
            GameOverReason::Timeout {
                expected: target.color,
            },
        );
    }
}

/// Continuous fall over `elapsed_ms` of game time
pub fn advance_blocks_system(world: &mut World, elapsed_ms: u64) {
    if !is_running(world) || elapsed_ms == 0 || queue::is_empty(world) {
        return;
    }

    let fall_speed = world.resource::<Difficulty>().fall_speed;
    let delta = fall_speed * REFERENCE_FRAMES_PER_SECOND * (elapsed_ms as f32 / 1000.0);

    if queue::advance_all(world, delta) {
        game_over(world, GameOverReason::FloorReached);
    }
}

/// Judges a beam of `color` against the current target
pub fn shoot(world: &mut World, color: BlockColor) {
    if !is_running(world) {
        return;
    }

    let Some(target) = queue::current_target(world) else {
        return;
    };

    // The beam is shown whether or not it hits
    emit(world, GameEvent::BeamFired { color });

    if color != target.color {
        game_over(
            world,
            GameOverReason::WrongColor {
                expected: target.color,
            },
        );
        return;
    }

    queue::remove_block(world, target.id);

    let score = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.score += 1;
        game_state.score
    };
    debug!("Hit {} with {color}, score {score}", target.id);
    emit(world, GameEvent::ScoreChanged { score });

    if queue::is_empty(world) {
        world.resource_mut::<TargetTimer>().idle();
    } else {
        reset_target_timer(world);
    }
}

pub fn game_over(world: &mut World, reason: GameOverReason) {
    if world.resource::<GameState>().round == RoundState::GameOver {
        return;
    }

    world.resource_mut::<Scheduler>().cancel_all();

    let score = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.round = RoundState::GameOver;
        game_state.paused = false;
        game_state.last_reason = Some(reason.clone());
        game_state.score
    };
    info!("Game over with score {score}: {reason}");

    emit(
        world,
        GameEvent::GameOver {
            reason: reason.to_string(),
        },
    );
}

/// Applies the pending player actions recorded in [`Input`]
pub fn input_system(world: &mut World) {
    let input = std::mem::take(&mut *world.resource_mut::<Input>());

    if input.restart {
        restart(world);
    }
    if let Some(color) = input.shoot {
        shoot(world, color);
    }
}

fn run_process(world: &mut World, process: Process) {
    match process {
        Process::Countdown => countdown_step_system(world),
        Process::Spawn => spawn_system(world),
        Process::Accelerate => accelerate_system(world),
        Process::TargetTick => target_tick_system(world),
    }
}

// Moves the clock forward, letting blocks fall over the covered span
fn integrate_to(world: &mut World, target_ms: u64) {
    let from = now_ms(world);
    world.resource_mut::<Time>().advance_to(target_ms);
    if target_ms > from {
        advance_blocks_system(world, target_ms - from);
    }
}

/// Advances game time by `delta_ms`, firing every scheduled process that
/// falls due on the way, in time order.
pub fn game_tick_system(world: &mut World, delta_ms: u64) {
    let until = now_ms(world).saturating_add(delta_ms);

    loop {
        let due = world.resource_mut::<Scheduler>().pop_due(until);
        let Some((fire_at_ms, process)) = due else {
            break;
        };
        integrate_to(world, fire_at_ms);
        run_process(world, process);
    }

    integrate_to(world, until);
}
