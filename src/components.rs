use std::collections::BTreeMap;

use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::content::AbilityDef;

/// World transform - authoritative position on the ground plane (XZ) plus facing
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub pos: Vec3,
    pub yaw: f32,
}

impl Transform {
    pub fn at(pos: Vec3) -> Self {
        Self { pos, yaw: 0.0 }
    }

    /// Unit vector the entity is facing along the ground plane
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Unit vector to the entity's right along the ground plane
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }
}

/// Velocity in world units per second
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec3);

/// Collision disc radius
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub radius: f32,
}

/// Player marker component
#[derive(Debug, Clone, Copy)]
pub struct Player;

/// Health component
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Change the ceiling, pulling the current value down if it no longer fits
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.clamp(0.0, self.max);
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

/// Damage absorption that is consumed before health
#[derive(Debug, Clone, Copy, Default)]
pub struct Shield {
    pub amount: f32,
}

/// A bounded numeric resource (mana, fatigue)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub current: f32,
    pub max: f32,
}

impl Pool {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn empty(max: f32) -> Self {
        Self { current: 0.0, max }
    }

    pub fn add(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.clamp(0.0, self.max);
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// One-time permanent modifiers picked with talent points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Perk {
    Vigor,
    Focus,
    Flow,
    Might,
}

impl Perk {
    pub const ALL: [Perk; 4] = [Perk::Vigor, Perk::Focus, Perk::Flow, Perk::Might];

    pub fn label(&self) -> &'static str {
        match self {
            Perk::Vigor => "Vigor (+10 Max Health)",
            Perk::Focus => "Focus (+10 Max Mana)",
            Perk::Flow => "Flow (+2 Mana Regen)",
            Perk::Might => "Might (+15% Spell Power)",
        }
    }
}

/// Player resources, progression and derived stats
#[derive(Debug, Clone)]
pub struct PlayerStats {
    pub mana: Pool,
    pub fatigue: Pool,
    pub base_health: f32,
    pub base_mana: f32,
    pub base_mana_regen: f32,
    pub base_mana_regen_ooc: f32,
    /// Derived: in-combat regen per second
    pub mana_regen: f32,
    /// Derived: out-of-combat regen per second
    pub mana_regen_ooc: f32,
    /// Derived: damage multiplier for spells
    pub spell_power: f32,
    pub in_combat_timer: f32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next: u32,
    pub gold: u32,
    pub talents: u32,
    pub perks: Vec<Perk>,
}

impl PlayerStats {
    pub fn new() -> Self {
        Self {
            mana: Pool::full(PLAYER_BASE_MANA),
            fatigue: Pool::empty(PLAYER_MAX_FATIGUE),
            base_health: PLAYER_BASE_HEALTH,
            base_mana: PLAYER_BASE_MANA,
            base_mana_regen: PLAYER_MANA_REGEN,
            base_mana_regen_ooc: PLAYER_MANA_REGEN_OOC,
            mana_regen: PLAYER_MANA_REGEN,
            mana_regen_ooc: PLAYER_MANA_REGEN_OOC,
            spell_power: 1.0,
            in_combat_timer: 0.0,
            xp: 0,
            level: 1,
            xp_to_next: STARTING_XP_TO_NEXT,
            gold: PLAYER_STARTING_GOLD,
            talents: 0,
            perks: Vec::new(),
        }
    }

    pub fn in_combat(&self) -> bool {
        self.in_combat_timer > 0.0
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Player's current target
#[derive(Debug, Clone, Copy, Default)]
pub struct Target(pub Option<Entity>);

/// An ability being channelled
#[derive(Debug, Clone)]
pub struct Cast {
    pub ability: AbilityDef,
    pub target: Option<Entity>,
    pub remaining: f32,
}

/// Per-player ability runtime state
#[derive(Debug, Clone, Default)]
pub struct Spellbook {
    /// Remaining cooldown per ability id (absent = ready)
    pub cooldowns: BTreeMap<String, f32>,
    pub global_cooldown: f32,
    pub cast: Option<Cast>,
}

impl Spellbook {
    pub fn cooldown(&self, ability_id: &str) -> f32 {
        self.cooldowns.get(ability_id).copied().unwrap_or(0.0)
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_some()
    }
}

/// Movement slow with a timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slow {
    /// Fraction of speed removed (0.5 = half speed)
    pub factor: f32,
    pub remaining: f32,
}

/// Periodic damage with a timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub damage: f32,
    pub interval: f32,
    pub tick_timer: f32,
    pub remaining: f32,
    pub source: Option<Entity>,
}

/// Status effects on an entity
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusEffects {
    pub slow: Option<Slow>,
    pub dot: Option<Dot>,
}

impl StatusEffects {
    pub fn speed_multiplier(&self) -> f32 {
        self.slow.map(|s| 1.0 - s.factor).unwrap_or(1.0)
    }

    pub fn clear(&mut self) {
        self.slow = None;
        self.dot = None;
    }
}

/// Alive/dead lifecycle for recycled entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifecycle {
    Alive,
    Down { respawn_timer: f32 },
}

impl Lifecycle {
    pub fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Alive)
    }
}

/// AI states for enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    /// Walking the patrol path
    Patrol,
    /// Pursuing and attacking the player
    Aggro,
    /// Ranged enemy backing away while still shooting
    Kite,
    /// Walking home after losing interest
    Return,
}

/// How an enemy fights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Archetype {
    /// Strikes when in range
    Melee,
    /// Telegraphs, then strikes
    Heavy,
    /// Shoots projectiles and kites
    Ranged,
    /// Melee that flees at low health
    Skirmisher,
}

impl Archetype {
    pub fn is_ranged(&self) -> bool {
        matches!(self, Archetype::Ranged)
    }
}

/// Enemy brain
#[derive(Debug, Clone)]
pub struct EnemyAi {
    pub kind: String,
    pub name: String,
    pub archetype: Archetype,
    pub state: AiState,
    pub home: Vec3,
    pub patrol: Vec<Vec3>,
    pub patrol_index: usize,
    pub aggro_radius: f32,
    pub leash: f32,
    pub range: f32,
    /// Ranged enemies back off when the player gets closer than this
    pub kite_range: f32,
    pub damage: f32,
    pub speed: f32,
    pub attack_timer: f32,
    pub attack_interval: f32,
    /// Heavy attack countdown, if one is winding up
    pub pending_strike: Option<f32>,
    pub xp: u32,
    pub loot_table: String,
}

/// Non-hostile character
#[derive(Debug, Clone)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub role: String,
    pub line: String,
    pub vendor: bool,
}

/// NPC that follows the player while its escort quest is active
#[derive(Debug, Clone)]
pub struct EscortNpc {
    pub quest: String,
    pub destination: Vec3,
}

/// How an interactable feeds quests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractKind {
    /// Counts once per activation
    Sample,
    /// Counts only when activated in order
    Ritual,
}

/// World object the player can activate
#[derive(Debug, Clone)]
pub struct Interactable {
    pub id: String,
    pub name: String,
    pub kind: InteractKind,
    pub order: u32,
}

/// Temporary ally
#[derive(Debug, Clone, Copy)]
pub struct Summon {
    pub owner: Entity,
    pub remaining: f32,
    pub attack_timer: f32,
}

/// Travelling damage
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub source: Option<Entity>,
    pub target: Entity,
    pub velocity: Vec3,
    pub damage: f32,
    pub life: f32,
    /// Re-aims at the target every tick
    pub homing: bool,
}

/// Item lying on the ground
#[derive(Debug, Clone)]
pub struct LootDrop {
    pub item: String,
    pub remaining: f32,
}

/// Inventory component - item id to quantity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    pub items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.items.entry(item.to_string()).or_insert(0) += quantity;
    }

    /// Remove one unit; false if none were held
    pub fn remove_one(&mut self, item: &str) -> bool {
        match self.items.get_mut(item) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.items.remove(item);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipSlot {
    Staff,
    Robe,
    Ring,
}

/// Equipped item per slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub staff: Option<String>,
    pub robe: Option<String>,
    pub ring: Option<String>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&str> {
        match slot {
            EquipSlot::Staff => self.staff.as_deref(),
            EquipSlot::Robe => self.robe.as_deref(),
            EquipSlot::Ring => self.ring.as_deref(),
        }
    }

    /// Put an item in a slot, returning the previous occupant
    pub fn set(&mut self, slot: EquipSlot, item: Option<String>) -> Option<String> {
        let slot_ref = match slot {
            EquipSlot::Staff => &mut self.staff,
            EquipSlot::Robe => &mut self.robe,
            EquipSlot::Ring => &mut self.ring,
        };
        std::mem::replace(slot_ref, item)
    }

    pub fn equipped(&self) -> impl Iterator<Item = &str> {
        [&self.staff, &self.robe, &self.ring]
            .into_iter()
            .filter_map(|slot| slot.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_set_max_clamps_current() {
        let mut health = Health::new(100.0);
        health.set_max(60.0);
        assert_eq!(health.current, 60.0);
        health.set_max(-5.0);
        assert_eq!(health.max, 0.0);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_pool_add_clamps() {
        let mut pool = Pool::full(50.0);
        pool.add(10.0);
        assert_eq!(pool.current, 50.0);
        pool.add(-80.0);
        assert_eq!(pool.current, 0.0);
    }

    #[test]
    fn test_inventory_remove_one() {
        let mut inv = Inventory::new();
        inv.add("crystal_dust", 2);
        assert!(inv.remove_one("crystal_dust"));
        assert_eq!(inv.count("crystal_dust"), 1);
        assert!(inv.remove_one("crystal_dust"));
        assert!(inv.is_empty());
        assert!(!inv.remove_one("crystal_dust"));
    }

    #[test]
    fn test_equipment_set_returns_previous() {
        let mut equipment = Equipment::default();
        assert_eq!(equipment.set(EquipSlot::Ring, Some("focus_ring".into())), None);
        let previous = equipment.set(EquipSlot::Ring, Some("caveward_ring".into()));
        assert_eq!(previous.as_deref(), Some("focus_ring"));
        assert_eq!(equipment.get(EquipSlot::Ring), Some("caveward_ring"));
        assert_eq!(equipment.equipped().count(), 1);
    }

    #[test]
    fn test_slow_speed_multiplier() {
        let mut effects = StatusEffects::default();
        assert_eq!(effects.speed_multiplier(), 1.0);
        effects.slow = Some(Slow { factor: 0.5, remaining: 2.0 });
        assert_eq!(effects.speed_multiplier(), 0.5);
    }
}
