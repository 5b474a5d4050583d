//! Core gameplay constants (player stats, XP, regeneration).

pub const PLAYER_BASE_HEALTH: f32 = 120.0;
pub const PLAYER_BASE_MANA: f32 = 100.0;
pub const PLAYER_MAX_FATIGUE: f32 = 100.0;
/// Mana per second while in combat
pub const PLAYER_MANA_REGEN: f32 = 8.0;
/// Mana per second out of combat
pub const PLAYER_MANA_REGEN_OOC: f32 = 14.0;
/// Fatigue shed per second
pub const FATIGUE_DECAY: f32 = 18.0;
/// Mana regen lost at maximum fatigue
pub const FATIGUE_REGEN_PENALTY: f32 = 0.6;
/// Move speed lost at maximum fatigue
pub const FATIGUE_SPEED_PENALTY: f32 = 0.3;
pub const PLAYER_STARTING_GOLD: u32 = 20;

pub const PLAYER_SPEED: f32 = 7.5;
pub const PLAYER_ACCEL: f32 = 18.0;
pub const PLAYER_DECEL: f32 = 20.0;
pub const PLAYER_TURN_RATE: f32 = 2.5;
pub const PLAYER_RADIUS: f32 = 0.6;

pub const STARTING_XP_TO_NEXT: u32 = 120;
pub const MAX_LEVEL: u32 = 10;
pub const XP_THRESHOLD_GROWTH: f32 = 1.25;
pub const LEVEL_HEALTH_GAIN: f32 = 6.0;
pub const LEVEL_MANA_GAIN: f32 = 4.0;

pub const PERK_VIGOR_HEALTH: f32 = 10.0;
pub const PERK_FOCUS_MANA: f32 = 10.0;
pub const PERK_FLOW_REGEN: f32 = 2.0;
pub const PERK_MIGHT_POWER: f32 = 0.15;
/// Out-of-combat regen gets this multiple of every regen bonus
pub const OOC_REGEN_BONUS_FACTOR: f32 = 1.5;

/// Reach for talking to NPCs and using interactables
pub const INTERACT_RANGE: f32 = 2.2;
/// Tab-targeting only considers enemies this close
pub const TARGET_CYCLE_RADIUS: f32 = 25.0;
/// Default radius for nearest-enemy lookups
pub const NEAREST_ENEMY_RADIUS: f32 = 20.0;
