//! Combat system constants.

/// Seconds the player stays "in combat" after dealing or taking damage
pub const IN_COMBAT_WINDOW: f32 = 6.0;

/// Distance at which a projectile connects with its target
pub const PROJECTILE_HIT_RADIUS: f32 = 0.8;
/// Seconds before an unconnected projectile fizzles
pub const PROJECTILE_LIFETIME: f32 = 3.0;
/// Speed of hostile projectiles
pub const ENEMY_PROJECTILE_SPEED: f32 = 14.0;

/// Fraction of max health and mana restored when the player is defeated
pub const DEFEAT_RESTORE_FRACTION: f32 = 0.5;
/// Fraction of carried gold lost when the player is defeated
pub const DEFEAT_GOLD_PENALTY: f32 = 0.1;
