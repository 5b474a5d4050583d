//! Item, loot and vendor constants.

/// Seconds a loot drop stays on the ground
pub const LOOT_DROP_LIFETIME: f32 = 14.0;
/// Player picks up drops within this distance
pub const LOOT_PICKUP_RADIUS: f32 = 1.4;
/// What a vendor pays for an item with no listed value
pub const VALUELESS_SELL_PRICE: u32 = 5;
/// Mana restored by an Arcane Tonic
pub const ARCANE_TONIC_MANA: f32 = 25.0;
