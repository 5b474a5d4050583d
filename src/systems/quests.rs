//! Quest state machine.
//!
//! A quest is absent until started, then Active -> Complete -> TurnedIn.
//! Progress only moves when an event matches the kind and target of the
//! current step; anything else leaves the log untouched.

use std::collections::{BTreeMap, BTreeSet};

use hecs::{Entity, World};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::components::{Health, Inventory, PlayerStats};
use crate::content::{ContentDb, QuestDef, QuestStep, Reward, StepKind};
use crate::events::EventQueue;
use crate::systems::experience::award_xp;
use crate::systems::resources::{recalc_player, restore_mana};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestStatus {
    Active,
    /// Every step done, waiting to be turned in
    Complete,
    TurnedIn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgress {
    pub status: QuestStatus,
    pub step_index: usize,
    pub progress: u32,
}

/// Per-quest progress plus the active and turned-in lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestLog {
    pub quests: BTreeMap<String, QuestProgress>,
    pub active: Vec<String>,
    pub completed: Vec<String>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: &str) -> Option<QuestStatus> {
        self.quests.get(id).map(|q| q.status)
    }

    pub fn progress(&self, id: &str) -> Option<&QuestProgress> {
        self.quests.get(id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.status(id) == Some(QuestStatus::Active)
    }

    /// Drop every quest `content` does not define. Returns the dropped ids.
    pub fn forget_unknown(&mut self, content: &ContentDb) -> Vec<String> {
        let unknown: Vec<String> = self
            .quests
            .keys()
            .chain(&self.active)
            .chain(&self.completed)
            .filter(|id| content.find_quest(id).is_none())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self.quests.retain(|id, _| !unknown.contains(id));
        self.active.retain(|id| !unknown.contains(id));
        self.completed.retain(|id| !unknown.contains(id));
        unknown
    }
}

/// The step a quest is currently waiting on
pub fn current_step<'a>(
    log: &QuestLog,
    content: &'a ContentDb,
    id: &str,
) -> Option<&'a QuestStep> {
    let progress = log.quests.get(id)?;
    content.find_quest(id)?.steps.get(progress.step_index)
}

/// Quests `npc` can hand out that have not been started yet
pub fn available_quests<'a>(
    log: &QuestLog,
    content: &'a ContentDb,
    npc: &str,
) -> Vec<&'a QuestDef> {
    content
        .quests()
        .iter()
        .filter(|q| q.giver == npc && !log.quests.contains_key(&q.id))
        .collect()
}

/// Finished quests `npc` will accept
pub fn completable_quests<'a>(
    log: &QuestLog,
    content: &'a ContentDb,
    npc: &str,
) -> Vec<&'a QuestDef> {
    content
        .quests()
        .iter()
        .filter(|q| q.giver == npc && log.status(&q.id) == Some(QuestStatus::Complete))
        .collect()
}

/// Accept a quest. False if it is unknown or was already started.
pub fn start_quest(log: &mut QuestLog, content: &ContentDb, id: &str) -> bool {
    let Some(quest) = content.quest(id) else {
        return false;
    };
    if log.quests.contains_key(id) {
        return false;
    }
    log.quests.insert(
        id.to_string(),
        QuestProgress {
            status: QuestStatus::Active,
            step_index: 0,
            progress: 0,
        },
    );
    log.active.push(id.to_string());
    info!("quest accepted: {}", quest.title);
    finish_if_stepless(log, quest);
    true
}

fn finish_if_stepless(log: &mut QuestLog, quest: &QuestDef) {
    if quest.steps.is_empty() {
        if let Some(progress) = log.quests.get_mut(&quest.id) {
            progress.status = QuestStatus::Complete;
        }
    }
}

/// Advance one quest if the event matches its current step.
/// Returns true when this completed the quest.
pub fn add_progress(
    log: &mut QuestLog,
    content: &ContentDb,
    id: &str,
    kind: StepKind,
    target: &str,
    amount: u32,
) -> bool {
    let Some(quest) = content.find_quest(id) else {
        return false;
    };
    let Some(progress) = log.quests.get_mut(id) else {
        return false;
    };
    if progress.status != QuestStatus::Active || amount == 0 {
        return false;
    }
    let Some(step) = quest.steps.get(progress.step_index) else {
        return false;
    };
    if step.kind != kind || step.target != target {
        return false;
    }

    progress.progress = (progress.progress + amount).min(step.count);
    if progress.progress < step.count {
        return false;
    }

    progress.step_index += 1;
    progress.progress = 0;
    if progress.step_index < quest.steps.len() {
        return false;
    }
    progress.status = QuestStatus::Complete;
    info!("quest complete: {}", quest.title);
    true
}

/// Offer an event to every active quest. Returns the ids it completed.
pub fn record_event(
    log: &mut QuestLog,
    content: &ContentDb,
    kind: StepKind,
    target: &str,
    amount: u32,
) -> Vec<String> {
    let active = log.active.clone();
    active
        .into_iter()
        .filter(|id| add_progress(log, content, id, kind, target, amount))
        .collect()
}

/// An ordered activation counts only when it is the next one expected
pub fn record_sequence(
    log: &mut QuestLog,
    content: &ContentDb,
    target: &str,
    order: u32,
) -> Vec<String> {
    let active = log.active.clone();
    let mut completed = Vec::new();
    for id in active {
        let expected = match (current_step(log, content, &id), log.quests.get(&id)) {
            (Some(step), Some(progress))
                if step.kind == StepKind::Sequence && step.target == target =>
            {
                progress.progress + 1
            }
            _ => continue,
        };
        if order == expected && add_progress(log, content, &id, StepKind::Sequence, target, 1) {
            completed.push(id);
        }
    }
    completed
}

/// Hand in a finished quest. The reward comes back exactly once.
pub fn turn_in(log: &mut QuestLog, content: &ContentDb, id: &str) -> Option<Reward> {
    let quest = content.quest(id)?;
    let progress = log.quests.get_mut(id)?;
    if progress.status != QuestStatus::Complete {
        return None;
    }
    progress.status = QuestStatus::TurnedIn;
    log.active.retain(|q| q != id);
    log.completed.push(id.to_string());
    info!("quest turned in: {}", quest.title);
    Some(quest.reward.clone())
}

/// Pay out a reward bundle to the player
pub fn apply_reward(
    world: &mut World,
    player: Entity,
    content: &ContentDb,
    reward: &Reward,
    events: &mut EventQueue,
) {
    {
        let Ok((stats, inventory)) =
            world.query_one_mut::<(&mut PlayerStats, &mut Inventory)>(player)
        else {
            return;
        };
        stats.gold = stats.gold.saturating_add(reward.gold);
        stats.base_mana += reward.mana;
        stats.base_health += reward.hp;
        if let Some(item) = &reward.item {
            if content.item(item).is_some() {
                inventory.add(item, 1);
            } else {
                warn!("reward item {item} is not defined");
            }
        }
    }
    recalc_player(world, player, content);

    if let Ok((stats, health)) = world.query_one_mut::<(&mut PlayerStats, &mut Health)>(player) {
        restore_mana(stats, reward.mana);
        health.heal(reward.hp);
    }
    if reward.xp > 0 {
        award_xp(world, player, content, reward.xp, events);
    }
}
