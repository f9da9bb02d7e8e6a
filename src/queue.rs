#![warn(clippy::all, clippy::pedantic)]

//! The lane's in-flight blocks. Blocks live as entities in the world; the
//! functions here give them queue semantics (spawn order, target selection,
//! removal by id).

use bevy_ecs::prelude::*;
use log::debug;
use std::cmp::Ordering;

use crate::Time;
use crate::components::{Block, BlockColor, BlockId, GameState};
use crate::events::{GameEvent, emit};
use crate::game::FLOOR_POSITION;

/// Appends a block to the lane and announces it
pub fn spawn_block(world: &mut World, color: BlockColor, position: f32) -> BlockId {
    let id = world.resource_mut::<GameState>().allocate_block_id();
    let spawned_at_ms = world.resource::<Time>().elapsed_ms();

    world.spawn(Block {
        id,
        color,
        position,
        spawned_at_ms,
    });
    debug!("Spawned {color} block {id} at {position}");

    emit(
        world,
        GameEvent::BlockSpawned {
            id,
            color,
            position,
        },
    );
    id
}

/// Live blocks in spawn order
pub fn blocks(world: &mut World) -> Vec<Block> {
    let mut blocks: Vec<Block> = world.query::<&Block>().iter(world).copied().collect();
    blocks.sort_by_key(|block| (block.spawned_at_ms, block.id));
    blocks
}

#[must_use]
pub fn len(world: &mut World) -> usize {
    world.query::<&Block>().iter(world).count()
}

#[must_use]
pub fn is_empty(world: &mut World) -> bool {
    len(world) == 0
}

// Lower position loses; on equal positions the older block wins
fn target_order(a: &Block, b: &Block) -> Ordering {
    a.position
        .total_cmp(&b.position)
        .then_with(|| b.spawned_at_ms.cmp(&a.spawned_at_ms))
        .then_with(|| b.id.cmp(&a.id))
}

/// The block the player has to match: the one closest to the floor
pub fn current_target(world: &mut World) -> Option<Block> {
    world
        .query::<&Block>()
        .iter(world)
        .max_by(|a, b| target_order(a, b))
        .copied()
}

/// Removes one block by identity. Returns false if it was already gone.
pub fn remove_block(world: &mut World, id: BlockId) -> bool {
    let entity = world
        .query::<(Entity, &Block)>()
        .iter(world)
        .find(|(_, block)| block.id == id)
        .map(|(entity, _)| entity);

    let Some(entity) = entity else {
        return false;
    };

    world.despawn(entity);
    emit(world, GameEvent::BlockRemoved { id });
    true
}

/// Removes every block, announcing each removal
pub fn clear_blocks(world: &mut World) {
    for block in blocks(world) {
        remove_block(world, block.id);
    }
}

/// Moves every block down by `delta`.
///
/// Returns true when at least one block has reached the floor.
pub fn advance_all(world: &mut World, delta: f32) -> bool {
    let mut moved = Vec::new();
    let mut floor_reached = false;

    {
        let mut query = world.query::<&mut Block>();
        for mut block in query.iter_mut(world) {
            block.position += delta;
            floor_reached |= block.position >= FLOOR_POSITION;
            moved.push((block.spawned_at_ms, block.id, block.position));
        }
    }

    moved.sort_by_key(|(spawned_at_ms, id, _)| (*spawned_at_ms, *id));
    for (_, id, position) in moved {
        emit(world, GameEvent::BlockPositionChanged { id, position });
    }

    floor_reached
}
