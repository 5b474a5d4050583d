//! Content database - id-keyed lookup of every static definition.
//!
//! Content comes from the builtin tables or from JSON definition files in a
//! directory. Missing ids are not fatal: lookups log a warning and return
//! `None`, and callers treat the thing as absent.

pub(crate) mod builtin;
mod defs;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::de::DeserializeOwned;

use crate::collision::flat_distance;
use crate::error::ContentError;
use crate::spawning::EnemyDef;

pub use defs::*;

/// All static game definitions, indexed for lookup
#[derive(Debug, Clone)]
pub struct ContentDb {
    abilities: Vec<AbilityDef>,
    items: HashMap<String, ItemDef>,
    loot_tables: HashMap<String, LootTable>,
    vendor: Vec<VendorStock>,
    quests: Vec<QuestDef>,
    quest_index: HashMap<String, usize>,
    enemy_types: HashMap<String, EnemyDef>,
    layout: WorldLayout,
}

impl ContentDb {
    /// Build a database, rejecting duplicate ids
    pub fn new(
        mut abilities: Vec<AbilityDef>,
        catalog: ItemCatalog,
        quests: Vec<QuestDef>,
        layout: WorldLayout,
    ) -> Result<Self, ContentError> {
        check_unique("ability", abilities.iter().map(|a| a.id.as_str()))?;
        check_unique("item", catalog.items.iter().map(|i| i.id.as_str()))?;
        check_unique("loot table", catalog.loot_tables.iter().map(|t| t.id.as_str()))?;
        check_unique("quest", quests.iter().map(|q| q.id.as_str()))?;
        check_unique("enemy type", layout.enemy_types.iter().map(|e| e.kind.as_str()))?;
        check_unique("npc", layout.npcs.iter().map(|n| n.id.as_str()))?;

        abilities.sort_by_key(|a| a.slot);
        let quest_index = quests
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), i))
            .collect();

        let db = Self {
            abilities,
            items: catalog.items.into_iter().map(|i| (i.id.clone(), i)).collect(),
            loot_tables: catalog
                .loot_tables
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            vendor: catalog.vendor,
            quests,
            quest_index,
            enemy_types: layout
                .enemy_types
                .iter()
                .map(|e| (e.kind.clone(), e.clone()))
                .collect(),
            layout,
        };
        db.warn_unknown_references();
        Ok(db)
    }

    /// The hand-authored content shipped with the game
    pub fn builtin() -> Self {
        match Self::new(
            builtin::abilities(),
            builtin::item_catalog(),
            builtin::quests(),
            builtin::world_layout(),
        ) {
            Ok(db) => db,
            Err(e) => {
                warn!("builtin content rejected: {e}");
                Self::empty()
            }
        }
    }

    /// A database with nothing in it
    pub fn empty() -> Self {
        Self {
            abilities: Vec::new(),
            items: HashMap::new(),
            loot_tables: HashMap::new(),
            vendor: Vec::new(),
            quests: Vec::new(),
            quest_index: HashMap::new(),
            enemy_types: HashMap::new(),
            layout: WorldLayout::default(),
        }
    }

    /// Load definitions from `dir`. Each of `abilities.json`, `items.json`,
    /// `quests.json` and `world.json` is optional and falls back to the
    /// builtin set when absent.
    pub fn load_dir(dir: &Path) -> Result<Self, ContentError> {
        let abilities = load_or(dir, "abilities.json", builtin::abilities)?;
        let catalog = load_or(dir, "items.json", builtin::item_catalog)?;
        let quests = load_or(dir, "quests.json", builtin::quests)?;
        let layout = load_or(dir, "world.json", builtin::world_layout)?;
        let db = Self::new(abilities, catalog, quests, layout)?;
        info!(
            "loaded content from {}: {} abilities, {} items, {} quests",
            dir.display(),
            db.abilities.len(),
            db.items.len(),
            db.quests.len()
        );
        Ok(db)
    }

    pub fn abilities(&self) -> &[AbilityDef] {
        &self.abilities
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDef> {
        let found = self.abilities.iter().find(|a| a.id == id);
        if found.is_none() {
            warn!("unknown ability id `{id}`");
        }
        found
    }

    pub fn ability_in_slot(&self, slot: u8) -> Option<&AbilityDef> {
        self.abilities.iter().find(|a| a.slot == slot)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        let found = self.items.get(id);
        if found.is_none() {
            warn!("unknown item id `{id}`");
        }
        found
    }

    pub fn loot_table(&self, id: &str) -> Option<&LootTable> {
        let found = self.loot_tables.get(id);
        if found.is_none() {
            warn!("unknown loot table `{id}`");
        }
        found
    }

    pub fn vendor_stock(&self) -> &[VendorStock] {
        &self.vendor
    }

    pub fn quests(&self) -> &[QuestDef] {
        &self.quests
    }

    pub fn quest(&self, id: &str) -> Option<&QuestDef> {
        let found = self.find_quest(id);
        if found.is_none() {
            warn!("unknown quest id `{id}`");
        }
        found
    }

    /// Lookup without the warning, for paths that run every tick
    pub fn find_quest(&self, id: &str) -> Option<&QuestDef> {
        self.quest_index.get(id).and_then(|&i| self.quests.get(i))
    }

    pub fn enemy_type(&self, kind: &str) -> Option<&EnemyDef> {
        let found = self.enemy_types.get(kind);
        if found.is_none() {
            warn!("unknown enemy type `{kind}`");
        }
        found
    }

    pub fn npc(&self, id: &str) -> Option<&NpcDef> {
        let found = self.layout.npcs.iter().find(|n| n.id == id);
        if found.is_none() {
            warn!("unknown npc id `{id}`");
        }
        found
    }

    pub fn waypoint(&self, id: &str) -> Option<&WaypointDef> {
        self.layout.waypoints.iter().find(|w| w.id == id)
    }

    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Name of the zone containing `pos`, or "Wilds"
    pub fn zone_name(&self, pos: glam::Vec3) -> &str {
        self.layout
            .zones
            .iter()
            .find(|zone| flat_distance(zone.center, pos) < zone.radius)
            .map(|zone| zone.name.as_str())
            .unwrap_or("Wilds")
    }

    fn warn_unknown_references(&self) {
        for quest in &self.quests {
            if let Some(item) = &quest.reward.item {
                if !self.items.contains_key(item) {
                    warn!("quest `{}` rewards unknown item `{item}`", quest.id);
                }
            }
            if !self.layout.npcs.iter().any(|n| n.id == quest.giver) {
                warn!("quest `{}` has unknown giver `{}`", quest.id, quest.giver);
            }
        }
        for table in self.loot_tables.values() {
            for entry in &table.entries {
                if !self.items.contains_key(&entry.item) {
                    warn!("loot table `{}` drops unknown item `{}`", table.id, entry.item);
                }
            }
        }
        for stock in &self.vendor {
            if !self.items.contains_key(&stock.item) {
                warn!("vendor sells unknown item `{}`", stock.item);
            }
        }
        for spawn in &self.layout.spawns {
            if !self.enemy_types.contains_key(&spawn.kind) {
                warn!("spawn `{}` uses unknown enemy type `{}`", spawn.id, spawn.kind);
            }
        }
    }
}

impl Default for ContentDb {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn load_or<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    fallback: fn() -> T,
) -> Result<T, ContentError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(fallback());
    }
    let raw = fs::read_to_string(&path).map_err(|source| ContentError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Parse { path, source })
}
