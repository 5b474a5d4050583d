//! Tab-targeting.

use hecs::{Entity, World};

use crate::components::Target;
use crate::constants::TARGET_CYCLE_RADIUS;
use crate::queries;

/// Move the player's target to the next live enemy by distance, wrapping
/// back to the nearest. Returns the new target.
pub fn cycle_target(world: &mut World, player: Entity) -> Option<Entity> {
    let from = queries::position(world, player)?;
    let candidates = queries::enemies_within(world, from, TARGET_CYCLE_RADIUS);
    let current = world.get::<&Target>(player).ok().and_then(|t| t.0);

    let next = match current.and_then(|c| candidates.iter().position(|(id, _)| *id == c)) {
        Some(i) => candidates.get((i + 1) % candidates.len()),
        None => candidates.first(),
    }
    .map(|(id, _)| *id);

    if let Ok(mut target) = world.get::<&mut Target>(player) {
        target.0 = next;
    }
    next
}

/// Forget a target that died or despawned
pub fn clear_stale_target(world: &mut World, player: Entity) {
    let stale = world
        .get::<&Target>(player)
        .ok()
        .and_then(|t| t.0)
        .is_some_and(|t| !queries::is_live_enemy(world, t));
    if stale {
        if let Ok(mut target) = world.get::<&mut Target>(player) {
            target.0 = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Archetype, Lifecycle, Transform};
    use crate::spawning::EnemyDef;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (World, Entity, Vec<Entity>) {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let player = world.spawn((Transform::at(Vec3::ZERO), Target::default()));
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
        let enemies = [8.0, 3.0, 15.0, 40.0]
            .iter()
            .map(|&x| def.spawn(&mut world, Vec3::new(x, 0.0, 0.0), &mut rng))
            .collect();
        (world, player, enemies)
    }

    #[test]
    fn test_cycle_nearest_first_and_wraps() {
        let (mut world, player, enemies) = setup();
        assert_eq!(cycle_target(&mut world, player), Some(enemies[1]));
        assert_eq!(cycle_target(&mut world, player), Some(enemies[0]));
        assert_eq!(cycle_target(&mut world, player), Some(enemies[2]));
        // The one at 40 is out of range
        assert_eq!(cycle_target(&mut world, player), Some(enemies[1]));
    }

    #[test]
    fn test_dead_enemies_are_skipped_and_cleared() {
        let (mut world, player, enemies) = setup();
        cycle_target(&mut world, player);
        *world.get::<&mut Lifecycle>(enemies[1]).unwrap() = Lifecycle::Down { respawn_timer: 5.0 };

        clear_stale_target(&mut world, player);
        assert_eq!(world.get::<&Target>(player).unwrap().0, None);
        assert_eq!(cycle_target(&mut world, player), Some(enemies[0]));
    }
}
