//! World layout constants.

/// Side length of the square play area
pub const WORLD_SIZE: f32 = 240.0;
/// Push-out margin so resolved bodies don't re-penetrate next tick
pub const COLLISION_EPSILON: f32 = 0.01;
/// Where a defeated player wakes up
pub const SAFE_POINT: [f32; 3] = [-50.0, 1.0, 0.0];

/// Escort NPC walks at this speed
pub const ESCORT_SPEED: f32 = 3.0;
/// Escort NPC stops following this close to the player
pub const ESCORT_FOLLOW_DISTANCE: f32 = 2.4;
/// Escort counts as delivered within this distance of its destination
pub const ESCORT_ARRIVE_DISTANCE: f32 = 3.5;
/// Scattered trees and rocks keep this far from authored points
pub const SCATTER_CLEARANCE: f32 = 3.0;
