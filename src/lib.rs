//! Headless simulation core for a small open-world action RPG.
//!
//! The host feeds `MoveInput` and `PlayerCommand`s into a `GameEngine` each
//! frame and reads back a `FrameReport`. Everything gameplay-related lives in
//! the hecs world owned by `GameState`.

pub mod collision;
pub mod components;
pub mod config;
pub mod constants;
pub mod content;
pub mod engine;
pub mod error;
pub mod events;
pub mod input;
pub mod queries;
pub mod save;
pub mod spawning;
pub mod systems;
pub mod time_system;

pub use config::SimConfig;
pub use engine::{CommandOutcome, EngineStatus, FrameReport, GameEngine, PlayerView};
pub use input::{MoveInput, PlayerCommand};
