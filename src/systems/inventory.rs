//! Bag and equipment interactions.

use hecs::{Entity, World};
use log::debug;

use crate::components::{Equipment, Health, Inventory, PlayerStats};
use crate::content::{ConsumableEffect, ContentDb, ItemKind};
use crate::systems::resources::{recalc_player, restore_mana};

/// Result of equipping or using an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The slot's previous occupant went back into the bag
    Equipped { previous: Option<String> },
    Used,
    NotHeld,
    /// Item exists but can't be equipped/used this way
    NotUsable,
    Unknown,
}

/// Put items straight into an entity's bag
pub fn give_item(world: &mut World, entity: Entity, item: &str, quantity: u32) -> bool {
    match world.get::<&mut Inventory>(entity) {
        Ok(mut inventory) => {
            inventory.add(item, quantity);
            true
        }
        Err(_) => false,
    }
}

/// Move one unit from the bag into its slot and rederive stats
pub fn equip_item(
    world: &mut World,
    player: Entity,
    content: &ContentDb,
    item: &str,
) -> ItemOutcome {
    let Some(def) = content.item(item) else {
        return ItemOutcome::Unknown;
    };
    let ItemKind::Equipment { slot, .. } = def.kind else {
        return ItemOutcome::NotUsable;
    };

    let previous = {
        let Ok((inventory, equipment)) =
            world.query_one_mut::<(&mut Inventory, &mut Equipment)>(player)
        else {
            return ItemOutcome::NotHeld;
        };
        if !inventory.remove_one(item) {
            return ItemOutcome::NotHeld;
        }
        let previous = equipment.set(slot, Some(item.to_string()));
        if let Some(old) = &previous {
            inventory.add(old, 1);
        }
        previous
    };

    recalc_player(world, player, content);
    debug!("equipped {item} in {slot:?}");
    ItemOutcome::Equipped { previous }
}

/// Consume one unit and apply its effect
pub fn use_consumable(
    world: &mut World,
    player: Entity,
    content: &ContentDb,
    item: &str,
) -> ItemOutcome {
    let Some(def) = content.item(item) else {
        return ItemOutcome::Unknown;
    };
    let ItemKind::Consumable { effect } = def.kind else {
        return ItemOutcome::NotUsable;
    };

    let Ok((inventory, stats, health)) =
        world.query_one_mut::<(&mut Inventory, &mut PlayerStats, &mut Health)>(player)
    else {
        return ItemOutcome::NotHeld;
    };
    if !inventory.remove_one(item) {
        return ItemOutcome::NotHeld;
    }
    match effect {
        ConsumableEffect::RestoreMana { amount } => restore_mana(stats, amount),
        ConsumableEffect::RestoreHealth { amount } => health.heal(amount),
    }
    ItemOutcome::Used
}
