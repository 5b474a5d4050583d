//! Ability tuning for the arcanist spellbook.

/// Shared cooldown started by every successful cast (seconds)
pub const GLOBAL_COOLDOWN: f32 = 1.2;
/// Fatigue added per cast
pub const CAST_FATIGUE: f32 = 12.0;

// Arc Bolt
pub const ARC_BOLT_COST: f32 = 8.0;
pub const ARC_BOLT_RANGE: f32 = 18.0;
pub const ARC_BOLT_DAMAGE: f32 = 22.0;
pub const ARC_BOLT_SPEED: f32 = 18.0;

// Ember Lance
pub const EMBER_LANCE_COST: f32 = 16.0;
pub const EMBER_LANCE_COOLDOWN: f32 = 4.0;
pub const EMBER_LANCE_CAST: f32 = 1.2;
pub const EMBER_LANCE_RANGE: f32 = 20.0;
pub const EMBER_LANCE_DAMAGE: f32 = 32.0;
pub const EMBER_LANCE_SPEED: f32 = 20.0;

// Sigil Snare
pub const SIGIL_SNARE_COST: f32 = 18.0;
pub const SIGIL_SNARE_COOLDOWN: f32 = 8.0;
pub const SIGIL_SNARE_CAST: f32 = 0.8;
pub const SIGIL_SNARE_RANGE: f32 = 16.0;
pub const SIGIL_SNARE_SLOW: f32 = 0.5;
pub const SIGIL_SNARE_DURATION: f32 = 4.0;

// Ward Shell
pub const WARD_SHELL_COST: f32 = 20.0;
pub const WARD_SHELL_COOLDOWN: f32 = 12.0;
pub const WARD_SHELL_AMOUNT: f32 = 30.0;
/// Shield can never stack above this value
pub const WARD_SHELL_CAP: f32 = 45.0;

// Nova Pulse
pub const NOVA_PULSE_COST: f32 = 28.0;
pub const NOVA_PULSE_COOLDOWN: f32 = 10.0;
pub const NOVA_PULSE_RADIUS: f32 = 6.0;
pub const NOVA_PULSE_DAMAGE: f32 = 20.0;

// Gloom Tether
pub const GLOOM_TETHER_COST: f32 = 14.0;
pub const GLOOM_TETHER_COOLDOWN: f32 = 6.0;
pub const GLOOM_TETHER_CAST: f32 = 1.0;
pub const GLOOM_TETHER_RANGE: f32 = 18.0;
pub const GLOOM_TETHER_TICK_DAMAGE: f32 = 4.0;
pub const GLOOM_TETHER_DURATION: f32 = 6.0;
pub const GLOOM_TETHER_INTERVAL: f32 = 1.0;

// Blink Step
pub const BLINK_STEP_COST: f32 = 22.0;
pub const BLINK_STEP_COOLDOWN: f32 = 14.0;
pub const BLINK_STEP_DISTANCE: f32 = 6.0;

// Astral Companion
pub const ASTRAL_COMPANION_COST: f32 = 26.0;
pub const ASTRAL_COMPANION_COOLDOWN: f32 = 20.0;
pub const ASTRAL_COMPANION_CAST: f32 = 1.5;
pub const SUMMON_LIFETIME: f32 = 12.0;
pub const SUMMON_ATTACK_INTERVAL: f32 = 2.4;
pub const SUMMON_SEEK_RADIUS: f32 = 10.0;
pub const SUMMON_DAMAGE: f32 = 12.0;
pub const SUMMON_PROJECTILE_SPEED: f32 = 16.0;
/// Summon walks toward its target until this close
pub const SUMMON_ENGAGE_RANGE: f32 = 6.0;
pub const SUMMON_SPEED: f32 = 5.0;
