//! Game event system for decoupled communication between systems.
//!
//! Systems push events during the tick; the engine drains them at the end of
//! the frame to drive quests, experience and loot.

use glam::Vec3;
use hecs::Entity;

use crate::components::AiState;
use crate::content::StepKind;

/// Game events that systems can emit and subscribe to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Damage landed after shield absorption
    DamageDealt {
        source: Option<Entity>,
        target: Entity,
        amount: f32,
        absorbed: f32,
    },
    /// An enemy went down
    EnemyDefeated {
        entity: Entity,
        kind: String,
        position: Vec3,
        xp: u32,
        loot_table: String,
    },
    EnemyRespawned {
        entity: Entity,
        kind: String,
    },
    /// Player hit zero health and woke up at the safe point
    PlayerDefeated {
        gold_lost: u32,
    },
    AiStateChanged {
        entity: Entity,
        from: AiState,
        to: AiState,
    },
    AbilityCast {
        ability: String,
    },
    CastInterrupted {
        ability: String,
    },
    /// Typed progress for quest steps
    QuestProgress {
        kind: StepKind,
        target: String,
        amount: u32,
    },
    /// An ordered interactable was activated
    RitualActivated {
        name: String,
        order: u32,
    },
    QuestCompleted {
        quest: String,
    },
    LootPicked {
        item: String,
    },
    LevelUp {
        new_level: u32,
    },
}

/// Simple event queue - events are pushed during update, processed at end of frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
