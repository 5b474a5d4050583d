//! Core game state - owns the simulation data.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::Arena;
use crate::config::{CombatRules, SimConfig};
use crate::content::ContentDb;
use crate::events::EventQueue;
use crate::systems::dialogue::Conversation;
use crate::systems::quests::QuestLog;
use crate::time_system::{GameClock, IntervalTimer};

use super::initialization;

/// The single seeded generator behind patrol jitter, scatter and loot rolls
pub type GameRng = StdRng;

/// Core game state - owns all simulation data.
pub struct GameState {
    /// The ECS world
    pub world: World,

    /// Player entity handle
    pub player: Entity,

    /// Static props and world bounds
    pub arena: Arena,

    pub content: ContentDb,

    pub quest_log: QuestLog,

    pub rng: GameRng,

    /// Events emitted during the current tick
    pub events: EventQueue,

    /// Game clock (simulation time)
    pub clock: GameClock,

    pub config: SimConfig,
    pub rules: CombatRules,

    /// Fires every `config.save_interval` seconds
    pub save_timer: IntervalTimer,

    /// NPC conversation the player has open, if any
    pub conversation: Option<Conversation>,
}

impl GameState {
    /// Create a fresh world from `content`, seeded from `config`.
    pub fn new(config: SimConfig, content: ContentDb) -> Self {
        let mut rng = GameRng::seed_from_u64(config.seed);
        let (world, player, arena) =
            initialization::init_world(&content, config.world_size, &mut rng);

        Self {
            world,
            player,
            arena,
            content,
            quest_log: QuestLog::new(),
            rng,
            events: EventQueue::new(),
            clock: GameClock::new(),
            rules: config.combat_rules(),
            save_timer: IntervalTimer::new(config.save_interval),
            conversation: None,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Transform;

    #[test]
    fn test_same_seed_same_world() {
        let positions = |state: &GameState| {
            let mut pos: Vec<[f32; 3]> = state
                .world
                .query::<&Transform>()
                .iter()
                .map(|(_, t)| t.pos.to_array())
                .collect();
            pos.sort_by(|a, b| a.partial_cmp(b).unwrap());
            pos
        };
        let a = GameState::new(SimConfig::default(), ContentDb::builtin());
        let b = GameState::new(SimConfig::default(), ContentDb::builtin());
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.arena.colliders, b.arena.colliders);

        let reseeded = SimConfig {
            seed: 7,
            ..Default::default()
        };
        let other = GameState::new(reseeded, ContentDb::builtin());
        assert_ne!(a.arena.colliders, other.arena.colliders);
    }
}
