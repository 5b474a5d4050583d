//! Status effect parameters.

/// Radius in which allies join a fight on initial aggro
pub const GROUP_PULL_RADIUS: f32 = 8.0;

/// Slow multipliers are capped so enemies never fully stop
pub const MAX_SLOW: f32 = 0.9;
