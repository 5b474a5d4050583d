//! Game constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Constants are split into submodules by domain for easier navigation.

mod abilities;
mod combat;
mod effects;
mod enemies;
mod gameplay;
mod items;
mod time;
mod world;

pub use abilities::*;
pub use combat::*;
pub use effects::*;
pub use enemies::*;
pub use gameplay::*;
pub use items::*;
pub use time::*;
pub use world::*;
