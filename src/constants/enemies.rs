//! Enemy behaviour and respawn constants.

/// Default leash distance from the home point
pub const DEFAULT_LEASH: f32 = 25.0;
/// Enemies give up when the player is this many aggro radii away
pub const DISENGAGE_FACTOR: f32 = 2.0;
/// Patrol walk speed as a fraction of full speed
pub const PATROL_SPEED_FACTOR: f32 = 0.5;
/// Random offset applied to each patrol point around the spawn
pub const PATROL_JITTER: f32 = 6.0;
/// Distance at which a patrol point counts as reached
pub const PATROL_ARRIVE_DISTANCE: f32 = 0.6;
/// Distance at which a returning enemy counts as home
pub const RETURN_ARRIVE_DISTANCE: f32 = 0.4;
/// Collision radius for enemies
pub const ENEMY_RADIUS: f32 = 0.5;
/// Seconds an enemy stays down before respawning at home
pub const ENEMY_RESPAWN_TIME: f32 = 20.0;
/// XP granted for an enemy without an explicit value
pub const DEFAULT_ENEMY_XP: u32 = 25;

/// Melee attack interval
pub const MELEE_ATTACK_INTERVAL: f32 = 1.6;
/// Ranged attack interval
pub const RANGED_ATTACK_INTERVAL: f32 = 2.2;
/// Heavy attacks land this long after the telegraph starts
pub const HEAVY_TELEGRAPH_TIME: f32 = 0.6;
/// Heavy attacks still connect if the player is within range times this
pub const HEAVY_REACH_FACTOR: f32 = 1.25;
/// Skirmishers flee once health drops below this fraction
pub const SKIRMISHER_FLEE_THRESHOLD: f32 = 0.25;
/// Flee speed multiplier for skirmishers
pub const SKIRMISHER_FLEE_SPEED: f32 = 1.2;
/// Ranged enemies start kiting this far inside their attack range
pub const KITE_MARGIN: f32 = 3.0;
