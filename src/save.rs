//! Local save blob.
//!
//! The blob holds the player's resources, progression, bag and position plus
//! the quest log. Loading merges it into a freshly built world: derived
//! values (max health, regen, spell power) are recomputed, then the saved
//! current values are clamped into the new ranges.

use std::fs;
use std::path::Path;

use glam::Vec3;
use hecs::{Entity, World};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::components::{
    Equipment, Health, Inventory, Perk, PlayerStats, Shield, Transform, Velocity,
};
use crate::constants::*;
use crate::content::ContentDb;
use crate::error::SaveError;
use crate::systems::quests::QuestLog;
use crate::systems::resources::recalc_stats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSave {
    pub hp: f32,
    pub mana: f32,
    pub fatigue: f32,
    pub max_hp: f32,
    pub max_mana: f32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next: u32,
    pub gold: u32,
    pub pos: [f32; 3],
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub equipment: Equipment,
    /// Older blobs lack these; they are rebuilt from the level
    #[serde(default)]
    pub base_hp: Option<f32>,
    #[serde(default)]
    pub base_mana: Option<f32>,
    #[serde(default)]
    pub perks: Vec<Perk>,
    #[serde(default)]
    pub talents: u32,
    #[serde(default)]
    pub shield: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub player: PlayerSave,
    #[serde(default)]
    pub quest_state: QuestLog,
}

/// Capture the player and quest log
pub fn snapshot(world: &World, player: Entity, log: &QuestLog) -> Result<SaveData, SaveError> {
    let mut query = world
        .query_one::<(&Transform, &Health, &Shield, &PlayerStats, &Inventory, &Equipment)>(player)
        .map_err(|_| SaveError::MissingPlayer)?;
    let (transform, health, shield, stats, inventory, equipment) =
        query.get().ok_or(SaveError::MissingPlayer)?;

    Ok(SaveData {
        player: PlayerSave {
            hp: health.current,
            mana: stats.mana.current,
            fatigue: stats.fatigue.current,
            max_hp: health.max,
            max_mana: stats.mana.max,
            xp: stats.xp,
            level: stats.level,
            xp_to_next: stats.xp_to_next,
            gold: stats.gold,
            pos: transform.pos.to_array(),
            inventory: inventory.clone(),
            equipment: equipment.clone(),
            base_hp: Some(stats.base_health),
            base_mana: Some(stats.base_mana),
            perks: stats.perks.clone(),
            talents: stats.talents,
            shield: shield.amount,
        },
        quest_state: log.clone(),
    })
}

/// Merge a save into the world and quest log
pub fn apply_save(
    world: &mut World,
    player: Entity,
    content: &ContentDb,
    log: &mut QuestLog,
    save: &SaveData,
) -> Result<(), SaveError> {
    let saved = &save.player;
    let (transform, velocity, health, shield, stats, inventory, equipment) = world
        .query_one_mut::<(
            &mut Transform,
            &mut Velocity,
            &mut Health,
            &mut Shield,
            &mut PlayerStats,
            &mut Inventory,
            &mut Equipment,
        )>(player)
        .map_err(|_| SaveError::MissingPlayer)?;

    let level = saved.level.clamp(1, MAX_LEVEL);
    let gained = (level - 1) as f32;
    stats.level = level;
    stats.xp = saved.xp;
    stats.xp_to_next = saved.xp_to_next.max(1);
    stats.gold = saved.gold;
    stats.talents = saved.talents;
    stats.perks = saved.perks.clone();
    stats.base_health = saved
        .base_hp
        .unwrap_or(PLAYER_BASE_HEALTH + gained * LEVEL_HEALTH_GAIN);
    stats.base_mana = saved
        .base_mana
        .unwrap_or(PLAYER_BASE_MANA + gained * LEVEL_MANA_GAIN);
    *inventory = saved.inventory.clone();
    *equipment = saved.equipment.clone();

    recalc_stats(stats, health, equipment, content);
    health.current = saved.hp.clamp(0.0, health.max);
    if health.is_depleted() {
        health.current = health.max * DEFEAT_RESTORE_FRACTION;
    }
    stats.mana.current = saved.mana.clamp(0.0, stats.mana.max);
    stats.fatigue.current = saved.fatigue.clamp(0.0, stats.fatigue.max);
    shield.amount = saved.shield.clamp(0.0, WARD_SHELL_CAP);

    transform.pos = Vec3::from_array(saved.pos);
    velocity.0 = Vec3::ZERO;
    *log = save.quest_state.clone();
    for id in log.forget_unknown(content) {
        warn!("save refers to unknown quest `{id}`, dropping it");
    }
    Ok(())
}

pub fn write_save(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(data)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SaveError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved game to {}", path.display());
    Ok(())
}

pub fn read_save(path: &Path) -> Result<SaveData, SaveError> {
    let raw = fs::read_to_string(path).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = serde_json::from_str(&raw)?;
    info!("loaded save from {}", path.display());
    Ok(data)
}
