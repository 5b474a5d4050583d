//! Player resources: mana, fatigue, combat timer and derived stats.
//!
//! Every mutation goes through `Pool`/`Health` so values stay inside
//! `[0, max]`.

use hecs::{Entity, World};

use crate::components::{Equipment, Health, Perk, PlayerStats};
use crate::constants::*;
use crate::content::{ContentDb, ItemKind, ItemStats};

/// Reset the in-combat window (damage dealt or received)
pub fn mark_in_combat(stats: &mut PlayerStats) {
    stats.in_combat_timer = IN_COMBAT_WINDOW;
}

pub fn add_fatigue(stats: &mut PlayerStats, amount: f32) {
    stats.fatigue.add(amount);
}

/// Fraction of full move speed left after fatigue
pub fn move_speed_multiplier(stats: &PlayerStats) -> f32 {
    1.0 - stats.fatigue.fraction() * FATIGUE_SPEED_PENALTY
}

/// Per-tick regeneration: combat timer decay, mana regen throttled by
/// fatigue, fatigue decay.
pub fn regenerate(stats: &mut PlayerStats, dt: f32) {
    stats.in_combat_timer = (stats.in_combat_timer - dt).max(0.0);

    let rate = if stats.in_combat() {
        stats.mana_regen
    } else {
        stats.mana_regen_ooc
    };
    let throttle = 1.0 - stats.fatigue.fraction() * FATIGUE_REGEN_PENALTY;
    stats.mana.add(rate * throttle * dt);
    stats.fatigue.add(-FATIGUE_DECAY * dt);
}

/// Deduct mana if affordable. Returns false without touching the pool otherwise.
pub fn spend_mana(stats: &mut PlayerStats, cost: f32) -> bool {
    if stats.mana.current < cost {
        return false;
    }
    stats.mana.add(-cost);
    true
}

pub fn restore_mana(stats: &mut PlayerStats, amount: f32) {
    stats.mana.add(amount);
}

fn equipment_bonus(equipment: &Equipment, content: &ContentDb) -> ItemStats {
    let mut total = ItemStats::default();
    for id in equipment.equipped() {
        if let Some(ItemKind::Equipment { stats, .. }) = content.item(id).map(|def| def.kind) {
            total.hp += stats.hp;
            total.mana += stats.mana;
            total.mana_regen += stats.mana_regen;
            total.spell_power += stats.spell_power;
        }
    }
    total
}

/// Derive max health/mana, regen rates and spell power from base stats,
/// equipment and perks. Current values are clamped down when a max shrinks.
pub fn recalc_stats(
    stats: &mut PlayerStats,
    health: &mut Health,
    equipment: &Equipment,
    content: &ContentDb,
) {
    let mut bonus = equipment_bonus(equipment, content);
    for perk in &stats.perks {
        match perk {
            Perk::Vigor => bonus.hp += PERK_VIGOR_HEALTH,
            Perk::Focus => bonus.mana += PERK_FOCUS_MANA,
            Perk::Flow => bonus.mana_regen += PERK_FLOW_REGEN,
            Perk::Might => bonus.spell_power += PERK_MIGHT_POWER,
        }
    }

    health.set_max(stats.base_health + bonus.hp);
    stats.mana.set_max(stats.base_mana + bonus.mana);
    stats.mana_regen = stats.base_mana_regen + bonus.mana_regen;
    stats.mana_regen_ooc = stats.base_mana_regen_ooc + bonus.mana_regen * OOC_REGEN_BONUS_FACTOR;
    stats.spell_power = 1.0 + bonus.spell_power;
}

/// `recalc_stats` for the player entity
pub fn recalc_player(world: &mut World, player: Entity, content: &ContentDb) {
    if let Ok((stats, health, equipment)) =
        world.query_one_mut::<(&mut PlayerStats, &mut Health, &Equipment)>(player)
    {
        recalc_stats(stats, health, equipment, content);
    }
}
