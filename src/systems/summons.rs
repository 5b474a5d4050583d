//! Summoned companions.
//!
//! A summon lives for a fixed time, seeks the nearest live enemy, closes to
//! engage range and fires homing bolts on its own timer. Its damage is
//! credited to the owner. With nothing to fight it trails the owner.

use glam::Vec3;
use hecs::{Entity, World};

use crate::collision::{flat, flat_distance, resolve, Arena};
use crate::components::{Summon, Transform};
use crate::constants::*;
use crate::queries;
use crate::systems::abilities::launch_projectile;

/// Distance a summon keeps from its owner when idle
const SUMMON_FOLLOW_DISTANCE: f32 = 3.0;

struct Volley {
    owner: Entity,
    from: Vec3,
    target: Entity,
    to: Vec3,
}

fn step_toward(transform: &mut Transform, target: Vec3, arena: &Arena, dt: f32) {
    let offset = flat(target - transform.pos);
    let dist = offset.length();
    if dist <= f32::EPSILON {
        return;
    }
    let dir = offset / dist;
    transform.yaw = dir.x.atan2(dir.z);
    let step = (SUMMON_SPEED * dt).min(dist);
    let (pos, _) = resolve(transform.pos + dir * step, ENEMY_RADIUS, arena);
    transform.pos = pos;
}

pub fn update_summons(world: &mut World, arena: &Arena, dt: f32) {
    puffin::profile_function!();

    // Work out each summon's target against the current world first
    let plans: Vec<(Entity, Option<(Entity, Vec3)>, Option<Vec3>)> = world
        .query::<(&Transform, &Summon)>()
        .iter()
        .map(|(id, (transform, summon))| {
            let target = queries::find_nearest_enemy(world, transform.pos, SUMMON_SEEK_RADIUS)
                .and_then(|e| queries::position(world, e).map(|pos| (e, pos)));
            (id, target, queries::position(world, summon.owner))
        })
        .collect();

    let mut expired = Vec::new();
    let mut volleys = Vec::new();
    for (id, target, owner_pos) in plans {
        let Ok((transform, summon)) = world.query_one_mut::<(&mut Transform, &mut Summon)>(id)
        else {
            continue;
        };
        summon.remaining -= dt;
        if summon.remaining <= 0.0 || owner_pos.is_none() {
            expired.push(id);
            continue;
        }
        summon.attack_timer = (summon.attack_timer - dt).max(0.0);

        match target {
            Some((enemy, enemy_pos)) => {
                if flat_distance(transform.pos, enemy_pos) > SUMMON_ENGAGE_RANGE {
                    step_toward(transform, enemy_pos, arena, dt);
                }
                if summon.attack_timer <= 0.0 {
                    summon.attack_timer = SUMMON_ATTACK_INTERVAL;
                    volleys.push(Volley {
                        owner: summon.owner,
                        from: transform.pos,
                        target: enemy,
                        to: enemy_pos,
                    });
                }
            }
            None => {
                if let Some(owner_pos) = owner_pos {
                    if flat_distance(transform.pos, owner_pos) > SUMMON_FOLLOW_DISTANCE {
                        step_toward(transform, owner_pos, arena, dt);
                    }
                }
            }
        }
    }

    for volley in volleys {
        launch_projectile(
            world,
            Some(volley.owner),
            volley.from,
            volley.target,
            volley.to,
            SUMMON_PROJECTILE_SPEED,
            SUMMON_DAMAGE,
            true,
        );
    }
    for id in expired {
        let _ = world.despawn(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Archetype, Projectile};
    use crate::spawning::{spawn_summon, EnemyDef};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn_enemy(world: &mut World, pos: Vec3) -> Entity {
        let def = EnemyDef {
            kind: "stalker".into(),
            name: "Wild Stalker".into(),
            archetype: Archetype::Melee,
            health: 70.0,
            damage: 7.0,
            speed: 4.5,
            range: 2.2,
            aggro: 14.0,
            leash: 25.0,
            xp: 25,
            loot_table: "common".into(),
        };
        def.spawn(world, pos, &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_summon_fires_homing_bolts_for_owner() {
        let mut world = World::new();
        let arena = Arena::default();
        let owner = world.spawn((Transform::at(Vec3::ZERO),));
        let enemy = spawn_enemy(&mut world, Vec3::new(9.0, 1.0, 0.0));
        spawn_summon(&mut world, owner, Vec3::new(1.5, 1.0, 0.0), SUMMON_LIFETIME);

        update_summons(&mut world, &arena, HEADLESS_STEP);
        let shots: Vec<Projectile> = world.query::<&Projectile>().iter().map(|(_, p)| *p).collect();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].source, Some(owner));
        assert_eq!(shots[0].target, enemy);
        assert!(shots[0].homing);

        // Next volley waits for the attack timer
        update_summons(&mut world, &arena, HEADLESS_STEP);
        assert_eq!(world.query::<&Projectile>().iter().count(), 1);
    }

    #[test]
    fn test_summon_closes_distance() {
        let mut world = World::new();
        let arena = Arena::default();
        let owner = world.spawn((Transform::at(Vec3::ZERO),));
        spawn_enemy(&mut world, Vec3::new(10.0, 1.0, 0.0));
        let summon = spawn_summon(&mut world, owner, Vec3::new(1.0, 1.0, 0.0), SUMMON_LIFETIME);

        for _ in 0..60 {
            update_summons(&mut world, &arena, HEADLESS_STEP);
        }
        let pos = queries::position(&world, summon).unwrap();
        assert!(flat_distance(pos, Vec3::new(10.0, 1.0, 0.0)) <= SUMMON_ENGAGE_RANGE + 0.1);
    }

    #[test]
    fn test_summon_expires() {
        let mut world = World::new();
        let arena = Arena::default();
        let owner = world.spawn((Transform::at(Vec3::ZERO),));
        let summon = spawn_summon(&mut world, owner, Vec3::new(1.5, 1.0, 0.0), 1.0);
        for _ in 0..30 {
            update_summons(&mut world, &arena, HEADLESS_STEP);
        }
        assert!(world.contains(summon));
        for _ in 0..31 {
            update_summons(&mut world, &arena, HEADLESS_STEP);
        }
        assert!(!world.contains(summon));
    }
}
