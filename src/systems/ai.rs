//! Enemy AI state machine.
//!
//! Each live enemy runs Patrol -> Aggro -> {Kite | Return} -> Patrol, with
//! archetype-specific fighting inside Aggro. Decisions are collected during
//! the query and applied afterwards so damage can touch other entities.

use glam::Vec3;
use hecs::{Entity, World};
use log::debug;

use crate::collision::{flat, flat_distance, resolve, Arena};
use crate::components::{
    AiState, Archetype, EnemyAi, Health, Lifecycle, Shield, StatusEffects, Transform, Velocity,
};
use crate::config::CombatRules;
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::queries;
use crate::systems::abilities::launch_projectile;
use crate::systems::combat::apply_damage;

/// Something an enemy decided to do that touches other entities
#[derive(Debug, Clone, Copy)]
enum Intent {
    Strike { enemy: Entity, damage: f32 },
    Shoot { enemy: Entity, from: Vec3, damage: f32 },
    Pull { source: Entity, around: Vec3 },
}

fn change_state(entity: Entity, ai: &mut EnemyAi, to: AiState, events: &mut EventQueue) {
    if ai.state == to {
        return;
    }
    debug!("{} {:?} -> {:?}", ai.name, ai.state, to);
    events.push(GameEvent::AiStateChanged {
        entity,
        from: ai.state,
        to,
    });
    ai.state = to;
}

/// Move along `dir` at `speed`, resolving collisions
fn step_dir(
    transform: &mut Transform,
    velocity: &mut Velocity,
    dir: Vec3,
    speed: f32,
    arena: &Arena,
    dt: f32,
) {
    let dir = flat(dir).normalize_or_zero();
    if dir == Vec3::ZERO {
        velocity.0 = Vec3::ZERO;
        return;
    }
    transform.yaw = dir.x.atan2(dir.z);
    velocity.0 = dir * speed;
    let (pos, _) = resolve(transform.pos + velocity.0 * dt, ENEMY_RADIUS, arena);
    transform.pos = pos;
}

/// Walk toward a point without overshooting it
fn step_toward(
    transform: &mut Transform,
    velocity: &mut Velocity,
    target: Vec3,
    speed: f32,
    arena: &Arena,
    dt: f32,
) {
    let dist = flat_distance(transform.pos, target);
    if dist <= f32::EPSILON || dt <= 0.0 {
        velocity.0 = Vec3::ZERO;
        return;
    }
    let speed = speed.min(dist / dt);
    step_dir(transform, velocity, target - transform.pos, speed, arena, dt);
}

fn face(transform: &mut Transform, velocity: &mut Velocity, target: Vec3) {
    velocity.0 = Vec3::ZERO;
    let dir = flat(target - transform.pos);
    if dir.length_squared() > f32::EPSILON {
        transform.yaw = dir.x.atan2(dir.z);
    }
}

struct Perception {
    player_pos: Vec3,
    dt: f32,
}

#[allow(clippy::too_many_arguments)]
fn think(
    id: Entity,
    transform: &mut Transform,
    velocity: &mut Velocity,
    ai: &mut EnemyAi,
    health: &Health,
    effects: &StatusEffects,
    seen: &Perception,
    arena: &Arena,
    events: &mut EventQueue,
    intents: &mut Vec<Intent>,
) {
    let dt = seen.dt;
    let speed = ai.speed * effects.speed_multiplier();
    let to_player = flat_distance(transform.pos, seen.player_pos);
    ai.attack_timer = (ai.attack_timer - dt).max(0.0);

    match ai.state {
        AiState::Patrol => {
            if to_player < ai.aggro_radius {
                change_state(id, ai, AiState::Aggro, events);
                intents.push(Intent::Pull {
                    source: id,
                    around: transform.pos,
                });
                return;
            }
            let Some(&waypoint) = ai.patrol.get(ai.patrol_index) else {
                velocity.0 = Vec3::ZERO;
                return;
            };
            if flat_distance(transform.pos, waypoint) < PATROL_ARRIVE_DISTANCE {
                ai.patrol_index = (ai.patrol_index + 1) % ai.patrol.len();
            } else {
                step_toward(transform, velocity, waypoint, speed * PATROL_SPEED_FACTOR, arena, dt);
            }
        }
        AiState::Return => {
            if flat_distance(transform.pos, ai.home) < RETURN_ARRIVE_DISTANCE {
                velocity.0 = Vec3::ZERO;
                change_state(id, ai, AiState::Patrol, events);
            } else {
                step_toward(transform, velocity, ai.home, speed, arena, dt);
            }
        }
        AiState::Aggro | AiState::Kite => {
            let from_home = flat_distance(transform.pos, ai.home);
            if from_home > ai.leash || to_player > ai.aggro_radius * DISENGAGE_FACTOR {
                ai.pending_strike = None;
                change_state(id, ai, AiState::Return, events);
                return;
            }
            fight(
                id, transform, velocity, ai, health, speed, to_player, seen, arena, events, intents,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fight(
    id: Entity,
    transform: &mut Transform,
    velocity: &mut Velocity,
    ai: &mut EnemyAi,
    health: &Health,
    speed: f32,
    to_player: f32,
    seen: &Perception,
    arena: &Arena,
    events: &mut EventQueue,
    intents: &mut Vec<Intent>,
) {
    let dt = seen.dt;
    let toward = seen.player_pos - transform.pos;

    match ai.archetype {
        Archetype::Skirmisher if health.percentage() < SKIRMISHER_FLEE_THRESHOLD => {
            step_dir(transform, velocity, -toward, speed * SKIRMISHER_FLEE_SPEED, arena, dt);
        }
        Archetype::Ranged => {
            if ai.state == AiState::Aggro && to_player < ai.kite_range {
                change_state(id, ai, AiState::Kite, events);
            } else if ai.state == AiState::Kite && to_player > ai.range {
                change_state(id, ai, AiState::Aggro, events);
            }

            if ai.state == AiState::Kite {
                step_dir(transform, velocity, -toward, speed, arena, dt);
            } else if to_player > ai.range {
                step_dir(transform, velocity, toward, speed, arena, dt);
            } else {
                face(transform, velocity, seen.player_pos);
            }

            if to_player <= ai.range && ai.attack_timer <= 0.0 {
                intents.push(Intent::Shoot {
                    enemy: id,
                    from: transform.pos,
                    damage: ai.damage,
                });
                ai.attack_timer = ai.attack_interval;
            }
        }
        Archetype::Heavy => {
            if let Some(remaining) = ai.pending_strike {
                face(transform, velocity, seen.player_pos);
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    ai.pending_strike = Some(remaining);
                    return;
                }
                ai.pending_strike = None;
                ai.attack_timer = ai.attack_interval;
                if to_player <= ai.range * HEAVY_REACH_FACTOR {
                    intents.push(Intent::Strike {
                        enemy: id,
                        damage: ai.damage,
                    });
                }
                return;
            }
            if to_player > ai.range {
                step_dir(transform, velocity, toward, speed, arena, dt);
            } else {
                face(transform, velocity, seen.player_pos);
                if ai.attack_timer <= 0.0 {
                    debug!("{} winds up", ai.name);
                    ai.pending_strike = Some(HEAVY_TELEGRAPH_TIME);
                }
            }
        }
        Archetype::Melee | Archetype::Skirmisher => {
            if to_player > ai.range {
                step_dir(transform, velocity, toward, speed, arena, dt);
            } else {
                face(transform, velocity, seen.player_pos);
                if ai.attack_timer <= 0.0 {
                    intents.push(Intent::Strike {
                        enemy: id,
                        damage: ai.damage,
                    });
                    ai.attack_timer = ai.attack_interval;
                }
            }
        }
    }
}

/// Run one AI step for every live enemy
#[allow(clippy::too_many_arguments)]
pub fn update_enemies(
    world: &mut World,
    player: Entity,
    arena: &Arena,
    rules: &CombatRules,
    group_pull: bool,
    events: &mut EventQueue,
    dt: f32,
) {
    puffin::profile_function!();
    let Some(player_pos) = queries::position(world, player) else {
        return;
    };
    let seen = Perception { player_pos, dt };

    let mut intents = Vec::new();
    for (id, (transform, velocity, ai, health, effects, lifecycle)) in world.query_mut::<(
        &mut Transform,
        &mut Velocity,
        &mut EnemyAi,
        &Health,
        &StatusEffects,
        &Lifecycle,
    )>() {
        if !lifecycle.is_alive() {
            velocity.0 = Vec3::ZERO;
            continue;
        }
        think(id, transform, velocity, ai, health, effects, &seen, arena, events, &mut intents);
    }

    // Once the player is down and moved to camp, the rest of this tick's swings miss
    let mut player_down = false;
    for intent in intents {
        match intent {
            Intent::Strike { .. } if player_down => {}
            Intent::Strike { enemy, damage } => {
                let report = apply_damage(world, Some(enemy), player, damage, rules, events);
                player_down = report.defeated;
            }
            Intent::Shoot { enemy, from, damage } => {
                launch_projectile(
                    world,
                    Some(enemy),
                    from,
                    player,
                    player_pos,
                    ENEMY_PROJECTILE_SPEED,
                    damage,
                    false,
                );
            }
            Intent::Pull { source, around } if group_pull => {
                pull_allies(world, source, around, events);
            }
            Intent::Pull { .. } => {}
        }
    }
}

/// Patrolling allies near a fresh aggro join in
fn pull_allies(world: &mut World, source: Entity, around: Vec3, events: &mut EventQueue) {
    for (id, (transform, ai, lifecycle)) in
        world.query_mut::<(&Transform, &mut EnemyAi, &Lifecycle)>()
    {
        if id == source || !lifecycle.is_alive() || ai.state != AiState::Patrol {
            continue;
        }
        if flat_distance(transform.pos, around) <= GROUP_PULL_RADIUS {
            change_state(id, ai, AiState::Aggro, events);
        }
    }
}

/// Count down downed enemies and bring them back fresh at home
pub fn update_respawns(world: &mut World, events: &mut EventQueue, dt: f32) {
    puffin::profile_function!();
    for (id, (transform, health, shield, effects, ai, lifecycle)) in world.query_mut::<(
        &mut Transform,
        &mut Health,
        &mut Shield,
        &mut StatusEffects,
        &mut EnemyAi,
        &mut Lifecycle,
    )>() {
        let Lifecycle::Down { respawn_timer } = lifecycle else {
            continue;
        };
        *respawn_timer -= dt;
        if *respawn_timer > 0.0 {
            continue;
        }

        *lifecycle = Lifecycle::Alive;
        health.current = health.max;
        shield.amount = 0.0;
        effects.clear();
        transform.pos = ai.home;
        ai.attack_timer = 0.0;
        ai.pending_strike = None;
        ai.patrol_index = 0;
        change_state(id, ai, AiState::Patrol, events);
        debug!("{} respawned", ai.name);
        events.push(GameEvent::EnemyRespawned {
            entity: id,
            kind: ai.kind.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Body, Equipment, Inventory, Player, PlayerStats, Spellbook, Target};
    use crate::spawning::EnemyDef;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        world: World,
        player: Entity,
        arena: Arena,
        rules: CombatRules,
        events: EventQueue,
        rng: StdRng,
    }

    fn fixture(player_pos: Vec3) -> Fixture {
        let mut world = World::new();
        let player = world.spawn((
            Player,
            Transform::at(player_pos),
            Velocity::default(),
            Body { radius: PLAYER_RADIUS },
            Health::new(PLAYER_BASE_HEALTH),
            Shield::default(),
            PlayerStats::new(),
            Spellbook::default(),
            Target::default(),
            Inventory::new(),
            Equipment::default(),
        ));
        Fixture {
            world,
            player,
            arena: Arena::default(),
            rules: CombatRules::default(),
            events: EventQueue::new(),
            rng: StdRng::seed_from_u64(1337),
        }
    }

    fn def(kind: &str, archetype: Archetype, range: f32) -> EnemyDef {
        EnemyDef {
            kind: kind.into(),
            name: kind.into(),
            archetype,
            health: 70.0,
            damage: 7.0,
            speed: 4.5,
            range,
            aggro: 14.0,
            leash: DEFAULT_LEASH,
            xp: DEFAULT_ENEMY_XP,
            loot_table: "common".into(),
        }
    }

    impl Fixture {
        fn spawn(&mut self, def: &EnemyDef, pos: Vec3) -> Entity {
            def.spawn(&mut self.world, pos, &mut self.rng)
        }

        fn run(&mut self, seconds: f32) {
            let steps = (seconds / HEADLESS_STEP).round() as usize;
            for _ in 0..steps {
                update_enemies(
                    &mut self.world,
                    self.player,
                    &self.arena,
                    &self.rules,
                    true,
                    &mut self.events,
                    HEADLESS_STEP,
                );
            }
        }

        fn state(&self, enemy: Entity) -> AiState {
            self.world.get::<&EnemyAi>(enemy).unwrap().state
        }

        fn player_health(&self) -> f32 {
            self.world.get::<&Health>(self.player).unwrap().current
        }
    }

    #[test]
    fn test_patrol_aggro_and_strike() {
        let mut f = fixture(Vec3::new(5.0, 1.0, 0.0));
        let enemy = f.spawn(&def("stalker", Archetype::Melee, 2.2), Vec3::new(0.0, 1.0, 0.0));
        f.run(HEADLESS_STEP);
        assert_eq!(f.state(enemy), AiState::Aggro);

        f.run(3.0);
        assert!(f.player_health() < PLAYER_BASE_HEALTH);
    }

    #[test]
    fn test_leash_return_deals_no_damage() {
        let mut f = fixture(Vec3::new(26.5, 1.0, 0.0));
        let enemy = f.spawn(&def("stalker", Archetype::Melee, 2.2), Vec3::ZERO);
        {
            let mut ai = f.world.get::<&mut EnemyAi>(enemy).unwrap();
            ai.state = AiState::Aggro;
        }
        f.world.get::<&mut Transform>(enemy).unwrap().pos = Vec3::new(26.0, 1.0, 0.0);

        f.run(HEADLESS_STEP);
        assert_eq!(f.state(enemy), AiState::Return);

        f.run(2.0);
        assert_eq!(f.player_health(), PLAYER_BASE_HEALTH);
        assert_eq!(f.state(enemy), AiState::Return);

        f.run(10.0);
        assert_eq!(f.state(enemy), AiState::Patrol);
        assert_eq!(f.player_health(), PLAYER_BASE_HEALTH);
    }

    #[test]
    fn test_ranged_kites_then_resumes() {
        let mut f = fixture(Vec3::new(5.0, 1.0, 0.0));
        let enemy = f.spawn(&def("seer", Archetype::Ranged, 14.0), Vec3::ZERO);
        f.run(HEADLESS_STEP);
        assert_eq!(f.state(enemy), AiState::Aggro);
        f.run(HEADLESS_STEP);
        assert_eq!(f.state(enemy), AiState::Kite);

        // Still shooting while backing off
        f.run(1.0);
        assert!(f.world.query::<&crate::components::Projectile>().iter().count() > 0);

        f.run(5.0);
        let dist = flat_distance(
            queries::position(&f.world, enemy).unwrap(),
            queries::position(&f.world, f.player).unwrap(),
        );
        assert!(dist > 10.0);
    }

    #[test]
    fn test_heavy_telegraph_dodged() {
        let mut f = fixture(Vec3::new(2.0, 1.0, 0.0));
        let enemy = f.spawn(&def("brute", Archetype::Heavy, 2.8), Vec3::ZERO);
        f.run(HEADLESS_STEP * 2.0);
        assert!(f.world.get::<&EnemyAi>(enemy).unwrap().pending_strike.is_some());

        // Step out of reach before it lands
        f.world.get::<&mut Transform>(f.player).unwrap().pos = Vec3::new(10.0, 1.0, 0.0);
        f.run(HEADLESS_STEP * 3.0);
        {
            let mut ai = f.world.get::<&mut EnemyAi>(enemy).unwrap();
            ai.pending_strike = Some(HEADLESS_STEP / 2.0);
        }
        f.run(HEADLESS_STEP);
        assert_eq!(f.player_health(), PLAYER_BASE_HEALTH);
    }

    #[test]
    fn test_heavy_telegraph_lands() {
        let mut f = fixture(Vec3::new(2.0, 1.0, 0.0));
        let _enemy = f.spawn(&def("brute", Archetype::Heavy, 2.8), Vec3::ZERO);
        f.run(HEAVY_TELEGRAPH_TIME + 0.2);
        assert_eq!(f.player_health(), PLAYER_BASE_HEALTH - 7.0);
    }

    #[test]
    fn test_skirmisher_flees_when_hurt() {
        let mut f = fixture(Vec3::new(4.0, 1.0, 0.0));
        let enemy = f.spawn(&def("scout", Archetype::Skirmisher, 2.0), Vec3::ZERO);
        f.world.get::<&mut Health>(enemy).unwrap().current = 10.0;
        f.run(HEADLESS_STEP);
        let before = queries::position(&f.world, enemy).unwrap();
        f.run(0.5);
        let after = queries::position(&f.world, enemy).unwrap();
        assert!(after.x < before.x);
    }

    #[test]
    fn test_group_pull() {
        let mut f = fixture(Vec3::new(13.0, 1.0, 0.0));
        let first = f.spawn(&def("stalker", Archetype::Melee, 2.2), Vec3::ZERO);
        let buddy = f.spawn(&def("stalker", Archetype::Melee, 2.2), Vec3::new(-5.0, 1.0, 0.0));
        // Keep the buddy outside its own aggro radius
        f.world.get::<&mut EnemyAi>(buddy).unwrap().aggro_radius = 1.0;
        f.world.get::<&mut EnemyAi>(buddy).unwrap().patrol.clear();
        f.world.get::<&mut EnemyAi>(first).unwrap().patrol.clear();
        f.run(HEADLESS_STEP);
        assert_eq!(f.state(first), AiState::Aggro);
        assert_eq!(f.state(buddy), AiState::Aggro);
    }

    #[test]
    fn test_death_and_respawn() {
        let mut f = fixture(Vec3::new(100.0, 1.0, 100.0));
        let home = Vec3::new(0.0, 1.0, -25.0);
        let enemy = f.spawn(&def("stalker", Archetype::Melee, 2.2), home);
        f.world.get::<&mut Transform>(enemy).unwrap().pos = Vec3::new(3.0, 1.0, -20.0);
        apply_damage(&mut f.world, None, enemy, 500.0, &f.rules, &mut f.events);

        let Lifecycle::Down { respawn_timer } = *f.world.get::<&Lifecycle>(enemy).unwrap() else {
            panic!("enemy should be down");
        };
        assert!(respawn_timer > 0.0);

        let mut elapsed = 0.0;
        while elapsed < ENEMY_RESPAWN_TIME + 0.1 {
            update_respawns(&mut f.world, &mut f.events, 0.1);
            elapsed += 0.1;
        }
        assert!(f.world.get::<&Lifecycle>(enemy).unwrap().is_alive());
        assert_eq!(f.world.get::<&Health>(enemy).unwrap().current, 70.0);
        assert_eq!(f.state(enemy), AiState::Patrol);
        assert_eq!(queries::position(&f.world, enemy), Some(home));
    }

    #[test]
    fn test_one_defeat_per_tick() {
        let mut f = fixture(Vec3::new(0.0, 1.0, 0.0));
        let left = f.spawn(&def("stalker", Archetype::Melee, 2.2), Vec3::new(-1.0, 1.0, 0.0));
        let right = f.spawn(&def("stalker", Archetype::Melee, 2.2), Vec3::new(1.0, 1.0, 0.0));
        for enemy in [left, right] {
            f.world.get::<&mut EnemyAi>(enemy).unwrap().state = AiState::Aggro;
        }
        {
            let (health, stats) = f
                .world
                .query_one_mut::<(&mut Health, &mut PlayerStats)>(f.player)
                .unwrap();
            health.current = 1.0;
            stats.gold = 100;
        }

        f.run(HEADLESS_STEP);
        let defeats = f
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDefeated { .. }))
            .count();
        assert_eq!(defeats, 1);
        assert_eq!(f.world.get::<&PlayerStats>(f.player).unwrap().gold, 90);
        assert_eq!(f.player_health(), PLAYER_BASE_HEALTH * DEFEAT_RESTORE_FRACTION);
    }
}
