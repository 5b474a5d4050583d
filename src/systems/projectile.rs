//! Projectile flight, hits and cleanup.
//!
//! A projectile only ever connects with the entity it was aimed at. Homing
//! projectiles steer toward their target each tick and fizzle if it goes
//! away; straight ones fly on until their lifetime runs out.

use hecs::{Entity, World};

use crate::collision::{flat, flat_distance};
use crate::components::{Projectile, Transform};
use crate::config::CombatRules;
use crate::constants::PROJECTILE_HIT_RADIUS;
use crate::events::EventQueue;
use crate::queries;
use crate::systems::combat::apply_damage;

/// Advance every projectile by `dt`
pub fn update_projectiles(
    world: &mut World,
    rules: &CombatRules,
    events: &mut EventQueue,
    dt: f32,
) {
    puffin::profile_function!();

    // Snapshot live target positions before moving anything
    let targets: Vec<(Entity, Option<glam::Vec3>)> = world
        .query::<&Projectile>()
        .iter()
        .map(|(_, projectile)| {
            let target = projectile.target;
            let pos = queries::is_alive(world, target)
                .then(|| queries::position(world, target))
                .flatten();
            (target, pos)
        })
        .collect();
    let target_pos = |entity: Entity| {
        targets
            .iter()
            .find(|(id, _)| *id == entity)
            .and_then(|(_, pos)| *pos)
    };

    let mut hits = Vec::new();
    let mut expired = Vec::new();
    for (id, (transform, projectile)) in world.query_mut::<(&mut Transform, &mut Projectile)>() {
        projectile.life -= dt;
        let aim = target_pos(projectile.target);

        if projectile.homing {
            let Some(aim) = aim else {
                expired.push(id);
                continue;
            };
            let speed = projectile.velocity.length();
            projectile.velocity = flat(aim - transform.pos).normalize_or_zero() * speed;
        }

        transform.pos += projectile.velocity * dt;

        if let Some(aim) = aim {
            if flat_distance(transform.pos, aim) <= PROJECTILE_HIT_RADIUS {
                hits.push((id, *projectile));
                continue;
            }
        }
        if projectile.life <= 0.0 {
            expired.push(id);
        }
    }

    for (id, projectile) in hits {
        apply_damage(
            world,
            projectile.source,
            projectile.target,
            projectile.damage,
            rules,
            events,
        );
        let _ = world.despawn(id);
    }
    for id in expired {
        let _ = world.despawn(id);
    }
}
