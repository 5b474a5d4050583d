//! Game systems organized by domain.
//!
//! This module contains all game logic systems, split into focused submodules:
//! - `abilities`: Cast validation, the casting state machine and ability effects
//! - `ai`: Enemy perception, state machine and respawns
//! - `combat`: Shield absorption, damage and defeat transitions
//! - `effects`: Slow and damage-over-time status effects
//! - `resources`: Mana, fatigue, regeneration and derived stats
//! - `experience`: XP, leveling and perks
//! - `quests`: Quest log progression and rewards
//! - `dialogue`: NPC menus and dialogue trees
//! - `interact`: Talking, world objects, escorts and waypoints
//! - `loot` / `inventory` / `vendor`: Drops, the bag and trading
//! - `movement` / `targeting`: Player locomotion and tab-targeting
//! - `projectile` / `summons`: Bolts in flight and summoned allies

pub mod abilities;
pub mod ai;
pub mod combat;
pub mod dialogue;
pub mod effects;
pub mod experience;
pub mod interact;
pub mod inventory;
pub mod loot;
pub mod movement;
pub mod projectile;
pub mod quests;
pub mod resources;
pub mod summons;
pub mod targeting;
pub mod vendor;

// Re-export commonly used items
pub use abilities::{attempt_cast, CastOutcome, RejectReason};
pub use combat::{apply_damage, DamageReport};
pub use experience::xp_progress;
pub use quests::{QuestLog, QuestProgress, QuestStatus};
