//! Loot tables, ground drops and pickup.

use glam::Vec3;
use hecs::{Entity, World};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::collision::flat_distance;
use crate::components::{Inventory, LootDrop, Transform};
use crate::constants::*;
use crate::content::{ContentDb, ItemKind, LootTable, StepKind};
use crate::events::{EventQueue, GameEvent};
use crate::queries;

/// Pick one item id from a weighted table. Empty or all-zero tables drop nothing.
pub fn roll<'a>(table: &'a LootTable, rng: &mut impl Rng) -> Option<&'a str> {
    let weights = WeightedIndex::new(table.entries.iter().map(|e| e.weight)).ok()?;
    table
        .entries
        .get(weights.sample(rng))
        .map(|entry| entry.item.as_str())
}

pub fn spawn_loot_drop(world: &mut World, item: &str, pos: Vec3) -> Entity {
    world.spawn((
        Transform::at(pos),
        LootDrop {
            item: item.to_string(),
            remaining: LOOT_DROP_LIFETIME,
        },
    ))
}

/// Roll `table_id` and leave the result on the ground at `pos`
pub fn drop_loot(
    world: &mut World,
    content: &ContentDb,
    table_id: &str,
    pos: Vec3,
    rng: &mut impl Rng,
) -> Option<Entity> {
    let table = content.loot_table(table_id)?;
    let item = roll(table, rng)?;
    debug!("dropped {item} at {pos:?}");
    Some(spawn_loot_drop(world, item, pos))
}

/// Collect every drop within reach of the player. Quest items feed fetch
/// objectives, everything else goes into the bag.
pub fn pickup_loot(
    world: &mut World,
    player: Entity,
    content: &ContentDb,
    events: &mut EventQueue,
) {
    puffin::profile_function!();
    let Some(player_pos) = queries::position(world, player) else {
        return;
    };

    let picked: Vec<(Entity, String)> = world
        .query::<(&Transform, &LootDrop)>()
        .iter()
        .filter(|(_, (transform, _))| {
            flat_distance(transform.pos, player_pos) <= LOOT_PICKUP_RADIUS
        })
        .map(|(id, (_, drop))| (id, drop.item.clone()))
        .collect();

    for (id, item) in picked {
        let _ = world.despawn(id);
        let is_quest_item = content
            .item(&item)
            .is_some_and(|def| def.kind == ItemKind::Quest);
        if is_quest_item {
            events.push(GameEvent::QuestProgress {
                kind: StepKind::Fetch,
                target: item.clone(),
                amount: 1,
            });
        } else if let Ok(mut inventory) = world.get::<&mut Inventory>(player) {
            inventory.add(&item, 1);
        }
        events.push(GameEvent::LootPicked { item });
    }
}

/// Remove drops nobody picked up in time
pub fn expire_loot(world: &mut World, dt: f32) {
    let expired: Vec<Entity> = world
        .query_mut::<&mut LootDrop>()
        .into_iter()
        .filter_map(|(id, drop)| {
            drop.remaining -= dt;
            (drop.remaining <= 0.0).then_some(id)
        })
        .collect();
    for id in expired {
        let _ = world.despawn(id);
    }
}
