//! Common entity query helpers.
//!
//! Pure read-only lookups shared by the systems.

use glam::Vec3;
use hecs::{Entity, World};

use crate::collision::flat_distance;
use crate::components::{EnemyAi, Lifecycle, Transform};

/// Get an entity's position
pub fn position(world: &World, entity: Entity) -> Option<Vec3> {
    world.get::<&Transform>(entity).ok().map(|t| t.pos)
}

/// True if the entity exists and is not waiting to respawn.
/// Entities without a lifecycle (the player, NPCs) count as alive.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    if !world.contains(entity) {
        return false;
    }
    world
        .get::<&Lifecycle>(entity)
        .map(|l| l.is_alive())
        .unwrap_or(true)
}

/// True if the entity is an enemy that can currently be fought
pub fn is_live_enemy(world: &World, entity: Entity) -> bool {
    world.get::<&EnemyAi>(entity).is_ok() && is_alive(world, entity)
}

/// Live enemies within `radius` of `from`, nearest first
pub fn enemies_within(world: &World, from: Vec3, radius: f32) -> Vec<(Entity, f32)> {
    let mut found: Vec<(Entity, f32)> = world
        .query::<(&Transform, &EnemyAi, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, lifecycle))| lifecycle.is_alive())
        .map(|(id, (transform, _, _))| (id, flat_distance(transform.pos, from)))
        .filter(|(_, dist)| *dist < radius)
        .collect();
    found.sort_by(|a, b| a.1.total_cmp(&b.1));
    found
}

/// Closest live enemy strictly within `radius`
pub fn find_nearest_enemy(world: &World, from: Vec3, radius: f32) -> Option<Entity> {
    enemies_within(world, from, radius).first().map(|(id, _)| *id)
}
