//! Buying from and selling to the merchant.

use hecs::{Entity, World};
use log::debug;

use crate::components::{Inventory, PlayerStats};
use crate::constants::VALUELESS_SELL_PRICE;
use crate::content::ContentDb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    Bought { item: String, price: u32 },
    Sold { item: String, gold: u32 },
    NotEnoughGold,
    NotHeld,
    /// No such stock line or item
    Unknown,
}

/// What the merchant pays for an item
pub fn sell_price(content: &ContentDb, item: &str) -> Option<u32> {
    content.item(item).map(|def| match def.value {
        0 => VALUELESS_SELL_PRICE,
        value => value,
    })
}

/// Buy the stock line at `index`
pub fn buy(world: &mut World, player: Entity, content: &ContentDb, index: usize) -> TradeOutcome {
    let Some(stock) = content.vendor_stock().get(index) else {
        return TradeOutcome::Unknown;
    };
    let Ok((stats, inventory)) = world.query_one_mut::<(&mut PlayerStats, &mut Inventory)>(player)
    else {
        return TradeOutcome::Unknown;
    };
    if stats.gold < stock.price {
        return TradeOutcome::NotEnoughGold;
    }
    stats.gold -= stock.price;
    inventory.add(&stock.item, 1);
    debug!("bought {} for {}", stock.label, stock.price);
    TradeOutcome::Bought {
        item: stock.item.clone(),
        price: stock.price,
    }
}

/// Sell one unit of `item` from the bag
pub fn sell(world: &mut World, player: Entity, content: &ContentDb, item: &str) -> TradeOutcome {
    let Some(gold) = sell_price(content, item) else {
        return TradeOutcome::Unknown;
    };
    let Ok((stats, inventory)) = world.query_one_mut::<(&mut PlayerStats, &mut Inventory)>(player)
    else {
        return TradeOutcome::Unknown;
    };
    if !inventory.remove_one(item) {
        return TradeOutcome::NotHeld;
    }
    stats.gold = stats.gold.saturating_add(gold);
    debug!("sold {item} for {gold}");
    TradeOutcome::Sold {
        item: item.to_string(),
        gold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLAYER_STARTING_GOLD;
    use crate::content::{builtin, ItemDef, ItemKind};

    fn spawn_player(world: &mut World, gold: u32) -> Entity {
        let mut stats = PlayerStats::new();
        stats.gold = gold;
        world.spawn((stats, Inventory::new()))
    }

    #[test]
    fn test_buy_needs_gold() {
        let content = ContentDb::builtin();
        let mut world = World::new();
        let player = spawn_player(&mut world, PLAYER_STARTING_GOLD);

        // Arcane Tonic for 15
        assert_eq!(
            buy(&mut world, player, &content, 0),
            TradeOutcome::Bought { item: "arcane_tonic".into(), price: 15 }
        );
        assert_eq!(world.get::<&PlayerStats>(player).unwrap().gold, PLAYER_STARTING_GOLD - 15);
        assert_eq!(buy(&mut world, player, &content, 0), TradeOutcome::NotEnoughGold);
        assert_eq!(buy(&mut world, player, &content, 99), TradeOutcome::Unknown);
        assert_eq!(world.get::<&Inventory>(player).unwrap().count("arcane_tonic"), 1);
    }

    #[test]
    fn test_valueless_items_sell_for_flat_price() {
        let content = ContentDb::builtin();
        let mut world = World::new();
        let player = spawn_player(&mut world, 0);
        world.get::<&mut Inventory>(player).unwrap().add("crystal_dust", 1);
        world.get::<&mut Inventory>(player).unwrap().add("tarnished_charm", 1);

        assert_eq!(sell_price(&content, "relic_shard"), Some(VALUELESS_SELL_PRICE));
        assert_eq!(
            sell(&mut world, player, &content, "tarnished_charm"),
            TradeOutcome::Sold { item: "tarnished_charm".into(), gold: 10 }
        );
        assert_eq!(
            sell(&mut world, player, &content, "crystal_dust"),
            TradeOutcome::Sold { item: "crystal_dust".into(), gold: 6 }
        );
        assert_eq!(sell(&mut world, player, &content, "crystal_dust"), TradeOutcome::NotHeld);
        assert_eq!(world.get::<&PlayerStats>(player).unwrap().gold, 16);
    }

    #[test]
    fn test_cheap_items_keep_their_value() {
        let mut catalog = builtin::item_catalog();
        catalog.items.push(ItemDef {
            id: "bent_nail".into(),
            name: "Bent Nail".into(),
            value: 2,
            kind: ItemKind::Loot,
        });
        let content = ContentDb::new(
            builtin::abilities(),
            catalog,
            builtin::quests(),
            builtin::world_layout(),
        )
        .unwrap();
        let mut world = World::new();
        let player = spawn_player(&mut world, 0);
        world.get::<&mut Inventory>(player).unwrap().add("bent_nail", 1);

        assert_eq!(
            sell(&mut world, player, &content, "bent_nail"),
            TradeOutcome::Sold { item: "bent_nail".into(), gold: 2 }
        );
    }
}
