//! Static definitions for abilities, items, quests and world layout.
//!
//! Everything here is plain serde data: the builtin set is constructed in
//! `builtin.rs` and the same shapes load from JSON definition files.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::Collider;
use crate::components::{EquipSlot, InteractKind};
use crate::spawning::EnemyDef;

// =============================================================================
// ABILITIES
// =============================================================================

/// How direct damage reaches its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Delivery {
    /// Damage lands the moment the effect resolves
    Instant,
    /// A homing projectile carries the damage
    Projectile { speed: f32 },
}

/// What an ability does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AbilityEffect {
    Bolt { damage: f32, delivery: Delivery },
    Lance { damage: f32, delivery: Delivery },
    Snare { slow: f32, duration: f32 },
    Shield { amount: f32, cap: f32 },
    Nova { radius: f32, damage: f32 },
    Dot { damage: f32, interval: f32, duration: f32 },
    Blink { distance: f32 },
    Summon { lifetime: f32 },
}

/// Complete definition of an ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityDef {
    pub id: String,
    pub name: String,
    /// Hotbar slot (1..N)
    pub slot: u8,
    /// Mana cost, paid when the cast starts
    pub cost: f32,
    #[serde(default)]
    pub cooldown: f32,
    /// 0 = instant
    #[serde(default)]
    pub cast_time: f32,
    #[serde(default)]
    pub range: f32,
    #[serde(default)]
    pub requires_target: bool,
    pub effect: AbilityEffect,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// ITEMS
// =============================================================================

/// Stat bonuses granted while equipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemStats {
    pub hp: f32,
    pub mana: f32,
    pub mana_regen: f32,
    pub spell_power: f32,
}

/// What a consumable does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConsumableEffect {
    RestoreMana { amount: f32 },
    RestoreHealth { amount: f32 },
}

/// Categories of items for behavior grouping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    Equipment { slot: EquipSlot, stats: ItemStats },
    Consumable { effect: ConsumableEffect },
    /// Tradeable loot
    Loot,
    /// Counts toward fetch objectives instead of going to the bag
    Quest,
}

/// Complete definition of an item's properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    /// Sell value in gold
    #[serde(default)]
    pub value: u32,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    pub weight: u32,
}

/// Weighted drop table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub id: String,
    pub entries: Vec<LootEntry>,
}

/// One line of the merchant's wares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorStock {
    pub label: String,
    pub item: String,
    pub price: u32,
}

// =============================================================================
// QUESTS
// =============================================================================

/// Event type a quest step listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    Kill,
    Fetch,
    Interact,
    Talk,
    Escort,
    Sequence,
    Reach,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestStep {
    pub kind: StepKind,
    pub target: String,
    #[serde(default = "one")]
    pub count: u32,
}

/// Granted once on turn-in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reward {
    pub gold: u32,
    pub xp: u32,
    /// Permanent base mana increase
    pub mana: f32,
    /// Permanent base health increase
    pub hp: f32,
    pub item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: String,
    pub title: String,
    /// NPC id that hands out and accepts the quest
    pub giver: String,
    #[serde(default)]
    pub text: String,
    pub steps: Vec<QuestStep>,
    #[serde(default)]
    pub reward: Reward,
}

// =============================================================================
// DIALOGUE
// =============================================================================

/// Resources an option consumes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueCost {
    pub gold: u32,
    pub mana: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueOption {
    pub label: String,
    #[serde(default)]
    pub next_node: Option<usize>,
    #[serde(default)]
    pub cost: DialogueCost,
    /// XP granted when the option is taken
    #[serde(default)]
    pub grant_xp: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub text: String,
    pub options: Vec<DialogueOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTree {
    pub nodes: Vec<DialogueNode>,
}

// =============================================================================
// WORLD LAYOUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscortDef {
    pub quest: String,
    pub destination: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: String,
    pub name: String,
    pub role: String,
    pub pos: Vec3,
    #[serde(default)]
    pub line: String,
    #[serde(default)]
    pub vendor: bool,
    #[serde(default)]
    pub escort: Option<EscortDef>,
    #[serde(default)]
    pub dialogue: Option<DialogueTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractableDef {
    pub id: String,
    pub name: String,
    pub kind: InteractKind,
    pub pos: Vec3,
    #[serde(default)]
    pub order: u32,
}

/// Destination for reach objectives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointDef {
    pub id: String,
    pub pos: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDef {
    pub name: String,
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub id: String,
    pub kind: String,
    pub pos: Vec3,
}

/// Randomly scattered props (trees, boulders) inside a rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterDef {
    pub count: u32,
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub radius: [f32; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldLayout {
    pub props: Vec<Collider>,
    pub scatter: Vec<ScatterDef>,
    pub zones: Vec<ZoneDef>,
    pub npcs: Vec<NpcDef>,
    pub interactables: Vec<InteractableDef>,
    pub waypoints: Vec<WaypointDef>,
    pub enemy_types: Vec<EnemyDef>,
    pub spawns: Vec<SpawnPoint>,
}

/// `items.json` layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemCatalog {
    pub items: Vec<ItemDef>,
    pub loot_tables: Vec<LootTable>,
    pub vendor: Vec<VendorStock>,
}
