//! Experience, leveling and talent perks.

use hecs::{Entity, World};
use log::info;

use crate::components::{Perk, PlayerStats};
use crate::constants::*;
use crate::content::ContentDb;
use crate::events::{EventQueue, GameEvent};
use crate::systems::resources::recalc_player;

/// Progress toward the next level (0.0 to 1.0)
pub fn xp_progress(stats: &PlayerStats) -> f32 {
    if stats.xp_to_next == 0 {
        return 1.0;
    }
    (stats.xp as f32 / stats.xp_to_next as f32).min(1.0)
}

/// Threshold for the level after one with `threshold`
pub fn next_threshold(threshold: u32) -> u32 {
    (threshold as f32 * XP_THRESHOLD_GROWTH).floor() as u32
}

/// Add XP, levelling up as many times as it covers. Returns levels gained.
///
/// Each level raises base health and mana and every even level grants a
/// talent point. XP keeps accumulating at the level cap.
pub fn grant_xp(stats: &mut PlayerStats, amount: u32) -> u32 {
    stats.xp = stats.xp.saturating_add(amount);
    let mut gained = 0;
    while stats.level < MAX_LEVEL && stats.xp >= stats.xp_to_next {
        stats.xp -= stats.xp_to_next;
        stats.level += 1;
        stats.xp_to_next = next_threshold(stats.xp_to_next);
        stats.base_health += LEVEL_HEALTH_GAIN;
        stats.base_mana += LEVEL_MANA_GAIN;
        if stats.level % 2 == 0 {
            stats.talents += 1;
        }
        gained += 1;
    }
    gained
}

/// Grant XP to the player and rederive stats on level up
pub fn award_xp(
    world: &mut World,
    player: Entity,
    content: &ContentDb,
    amount: u32,
    events: &mut EventQueue,
) {
    let (gained, level) = match world.get::<&mut PlayerStats>(player) {
        Ok(mut stats) => (grant_xp(&mut stats, amount), stats.level),
        Err(_) => return,
    };
    if gained == 0 {
        return;
    }
    recalc_player(world, player, content);
    info!("reached level {level}");
    events.push(GameEvent::LevelUp { new_level: level });
}

/// Spend a talent point on a perk. False if no points are left.
pub fn choose_perk(world: &mut World, player: Entity, content: &ContentDb, perk: Perk) -> bool {
    {
        let Ok(mut stats) = world.get::<&mut PlayerStats>(player) else {
            return false;
        };
        if stats.talents == 0 {
            return false;
        }
        stats.talents -= 1;
        stats.perks.push(perk);
    }
    recalc_player(world, player, content);
    info!("perk chosen: {}", perk.label());
    true
}
