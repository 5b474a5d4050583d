//! Data-driven entity spawning.
//!
//! Enemy types are plain data so new ones can be added to the content files
//! without touching spawning code.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{
    AiState, Archetype, Body, EnemyAi, EscortNpc, Health, Interactable, Lifecycle, Npc, Shield,
    StatusEffects, Summon, Transform, Velocity,
};
use crate::constants::*;
use crate::content::{InteractableDef, NpcDef};

/// Definition of an enemy type - all the data needed to spawn one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDef {
    /// Type id quests count kills against
    pub kind: String,
    /// Display name
    pub name: String,
    pub archetype: Archetype,
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
    /// Strike or shooting range
    pub range: f32,
    pub aggro: f32,
    #[serde(default = "default_leash")]
    pub leash: f32,
    #[serde(default = "default_xp")]
    pub xp: u32,
    #[serde(default = "default_loot_table")]
    pub loot_table: String,
}

fn default_leash() -> f32 {
    DEFAULT_LEASH
}

fn default_xp() -> u32 {
    DEFAULT_ENEMY_XP
}

fn default_loot_table() -> String {
    "common".to_string()
}

impl EnemyDef {
    fn attack_interval(&self) -> f32 {
        if self.archetype.is_ranged() {
            RANGED_ATTACK_INTERVAL
        } else {
            MELEE_ATTACK_INTERVAL
        }
    }

    /// Spawn this enemy type at the given position with a jittered two-point patrol
    pub fn spawn(&self, world: &mut World, pos: Vec3, rng: &mut impl Rng) -> Entity {
        let patrol = (0..2)
            .map(|_| {
                pos + Vec3::new(
                    rng.gen_range(-PATROL_JITTER..PATROL_JITTER),
                    0.0,
                    rng.gen_range(-PATROL_JITTER..PATROL_JITTER),
                )
            })
            .collect();

        world.spawn((
            Transform::at(pos),
            Velocity::default(),
            Body { radius: ENEMY_RADIUS },
            Health::new(self.health),
            Shield::default(),
            StatusEffects::default(),
            Lifecycle::Alive,
            EnemyAi {
                kind: self.kind.clone(),
                name: self.name.clone(),
                archetype: self.archetype,
                state: AiState::Patrol,
                home: pos,
                patrol,
                patrol_index: 0,
                aggro_radius: self.aggro,
                leash: self.leash,
                range: self.range,
                kite_range: (self.range - KITE_MARGIN).max(0.0),
                damage: self.damage,
                speed: self.speed,
                attack_timer: 0.0,
                attack_interval: self.attack_interval(),
                pending_strike: None,
                xp: self.xp,
                loot_table: self.loot_table.clone(),
            },
        ))
    }
}

/// Spawn a quest giver / vendor / escort NPC
pub fn spawn_npc(world: &mut World, def: &NpcDef) -> Entity {
    let npc = world.spawn((
        Transform::at(def.pos),
        Npc {
            id: def.id.clone(),
            name: def.name.clone(),
            role: def.role.clone(),
            line: def.line.clone(),
            vendor: def.vendor,
        },
    ));
    if let Some(escort) = &def.escort {
        let _ = world.insert_one(
            npc,
            EscortNpc {
                quest: escort.quest.clone(),
                destination: escort.destination,
            },
        );
    }
    npc
}

/// Spawn a ritual stone, sample site or similar
pub fn spawn_interactable(world: &mut World, def: &InteractableDef) -> Entity {
    world.spawn((
        Transform::at(def.pos),
        Interactable {
            id: def.id.clone(),
            name: def.name.clone(),
            kind: def.kind,
            order: def.order,
        },
    ))
}

/// Spawn a temporary ally next to its owner
pub fn spawn_summon(world: &mut World, owner: Entity, pos: Vec3, lifetime: f32) -> Entity {
    world.spawn((
        Transform::at(pos),
        Summon {
            owner,
            remaining: lifetime,
            attack_timer: 0.0,
        },
    ))
}
