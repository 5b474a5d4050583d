//! Proximity interactions: talking, activating world objects, escorts and
//! reach objectives. These only emit quest events; the quest log is updated
//! when the engine drains the queue.

use hecs::{Entity, World};

use crate::collision::{flat, flat_distance};
use crate::components::{EscortNpc, InteractKind, Interactable, Npc, Transform};
use crate::constants::*;
use crate::content::{ContentDb, StepKind};
use crate::events::{EventQueue, GameEvent};
use crate::queries;
use crate::systems::quests::{current_step, QuestLog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Opened a conversation with this NPC id
    Talked { npc: String },
    Activated { name: String },
    Nothing,
}

enum Nearby {
    Npc(String),
    Object { name: String, kind: InteractKind, order: u32 },
}

/// Use whatever is closest to the player within reach
pub fn handle_interact(world: &World, player: Entity, events: &mut EventQueue) -> InteractOutcome {
    let Some(from) = queries::position(world, player) else {
        return InteractOutcome::Nothing;
    };

    let npcs = world
        .query::<(&Transform, &Npc)>()
        .iter()
        .map(|(_, (t, npc))| (flat_distance(t.pos, from), Nearby::Npc(npc.id.clone())))
        .collect::<Vec<_>>();
    let objects = world
        .query::<(&Transform, &Interactable)>()
        .iter()
        .map(|(_, (t, obj))| {
            (
                flat_distance(t.pos, from),
                Nearby::Object {
                    name: obj.name.clone(),
                    kind: obj.kind,
                    order: obj.order,
                },
            )
        })
        .collect::<Vec<_>>();

    let nearest = npcs
        .into_iter()
        .chain(objects)
        .filter(|(dist, _)| *dist <= INTERACT_RANGE)
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match nearest.map(|(_, thing)| thing) {
        Some(Nearby::Npc(npc)) => {
            events.push(GameEvent::QuestProgress {
                kind: StepKind::Talk,
                target: npc.clone(),
                amount: 1,
            });
            InteractOutcome::Talked { npc }
        }
        Some(Nearby::Object { name, kind, order }) => {
            match kind {
                InteractKind::Sample => events.push(GameEvent::QuestProgress {
                    kind: StepKind::Interact,
                    target: name.clone(),
                    amount: 1,
                }),
                InteractKind::Ritual => events.push(GameEvent::RitualActivated {
                    name: name.clone(),
                    order,
                }),
            }
            InteractOutcome::Activated { name }
        }
        None => InteractOutcome::Nothing,
    }
}

/// Escort NPCs trail the player while their quest is active and report
/// arrival near their destination
pub fn update_escort(
    world: &mut World,
    player: Entity,
    log: &QuestLog,
    events: &mut EventQueue,
    dt: f32,
) {
    puffin::profile_function!();
    let Some(player_pos) = queries::position(world, player) else {
        return;
    };

    for (_, (transform, escort, npc)) in world.query_mut::<(&mut Transform, &EscortNpc, &Npc)>() {
        if !log.is_active(&escort.quest) {
            continue;
        }
        let offset = flat(player_pos - transform.pos);
        let dist = offset.length();
        if dist > ESCORT_FOLLOW_DISTANCE {
            let step = (ESCORT_SPEED * dt).min(dist - ESCORT_FOLLOW_DISTANCE);
            transform.pos += offset / dist * step;
        }
        if flat_distance(transform.pos, escort.destination) < ESCORT_ARRIVE_DISTANCE {
            events.push(GameEvent::QuestProgress {
                kind: StepKind::Escort,
                target: npc.id.clone(),
                amount: 1,
            });
        }
    }
}

/// Emit reach events for active quests waiting on a waypoint the player is in
pub fn check_reach(
    world: &World,
    player: Entity,
    content: &ContentDb,
    log: &QuestLog,
    events: &mut EventQueue,
) {
    let Some(pos) = queries::position(world, player) else {
        return;
    };
    let mut reached: Vec<&str> = Vec::new();
    for id in &log.active {
        let Some(step) = current_step(log, content, id) else {
            continue;
        };
        if step.kind != StepKind::Reach || reached.contains(&step.target.as_str()) {
            continue;
        }
        let Some(waypoint) = content.waypoint(&step.target) else {
            continue;
        };
        if flat_distance(pos, waypoint.pos) <= waypoint.radius {
            reached.push(&step.target);
        }
    }
    for target in reached {
        events.push(GameEvent::QuestProgress {
            kind: StepKind::Reach,
            target: target.to_string(),
            amount: 1,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawning::{spawn_interactable, spawn_npc};
    use crate::systems::quests::{record_event, start_quest};
    use glam::Vec3;

    fn world_with_player(pos: Vec3) -> (World, Entity) {
        let mut world = World::new();
        let player = world.spawn((Transform::at(pos),));
        (world, player)
    }

    #[test]
    fn test_talk_to_nearest_npc() {
        let content = ContentDb::builtin();
        let (mut world, player) = world_with_player(Vec3::new(-55.0, 1.0, 1.5));
        for def in &content.layout().npcs {
            spawn_npc(&mut world, def);
        }
        let mut events = EventQueue::new();

        let outcome = handle_interact(&world, player, &mut events);
        assert_eq!(outcome, InteractOutcome::Talked { npc: "rysa".into() });
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::QuestProgress { kind: StepKind::Talk, target, .. } if target == "rysa"
        )));
    }

    #[test]
    fn test_nothing_in_reach() {
        let (world, player) = world_with_player(Vec3::new(100.0, 1.0, 100.0));
        let mut events = EventQueue::new();
        assert_eq!(handle_interact(&world, player, &mut events), InteractOutcome::Nothing);
        assert!(events.is_empty());
    }

    #[test]
    fn test_ritual_stone_reports_order() {
        let content = ContentDb::builtin();
        let (mut world, player) = world_with_player(Vec3::new(68.0, 1.0, 69.0));
        for def in &content.layout().interactables {
            spawn_interactable(&mut world, def);
        }
        let mut events = EventQueue::new();
        handle_interact(&world, player, &mut events);
        assert!(events
            .iter()
            .any(|e| *e == GameEvent::RitualActivated { name: "Ritual Stone".into(), order: 2 }));
    }

    #[test]
    fn test_escort_follows_and_arrives() {
        let content = ContentDb::builtin();
        let mut log = QuestLog::new();
        let scribe_def = content.npc("scribe").unwrap();
        let (mut world, player) = world_with_player(Vec3::new(-40.0, 1.0, 10.0));
        let scribe = spawn_npc(&mut world, scribe_def);
        let mut events = EventQueue::new();

        // Idle until the quest is taken
        update_escort(&mut world, player, &log, &mut events, 1.0);
        assert_eq!(queries::position(&world, scribe), Some(scribe_def.pos));

        start_quest(&mut log, &content, "escortScribe");
        update_escort(&mut world, player, &log, &mut events, 1.0);
        let pos = queries::position(&world, scribe).unwrap();
        assert!((pos.x - (-52.0 + ESCORT_SPEED)).abs() < 1e-4);

        // Walk the pair to the ruin gate
        world.get::<&mut Transform>(player).unwrap().pos = Vec3::new(72.0, 1.0, 44.0);
        world.get::<&mut Transform>(scribe).unwrap().pos = Vec3::new(70.0, 1.0, 41.0);
        update_escort(&mut world, player, &log, &mut events, HEADLESS_STEP);
        let done = events
            .drain()
            .filter_map(|e| match e {
                GameEvent::QuestProgress { kind, target, amount } => {
                    Some(record_event(&mut log, &content, kind, &target, amount))
                }
                _ => None,
            })
            .flatten()
            .collect::<Vec<_>>();
        assert_eq!(done, vec!["escortScribe".to_string()]);
    }

    #[test]
    fn test_reach_waypoint() {
        let content = ContentDb::builtin();
        let mut log = QuestLog::new();
        start_quest(&mut log, &content, "scoutCave");
        let (world, player) = world_with_player(Vec3::new(2.0, 1.0, 60.0));
        let mut events = EventQueue::new();
        check_reach(&world, player, &content, &log, &mut events);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::QuestProgress { kind: StepKind::Reach, target, .. } if target == "cave_gate"
        )));

        let (far_world, far_player) = world_with_player(Vec3::ZERO);
        let mut events = EventQueue::new();
        check_reach(&far_world, far_player, &content, &log, &mut events);
        assert!(events.is_empty());
    }
}
