//! World initialization - builds the arena and spawns the authored layout.

use glam::Vec3;
use hecs::{Entity, World};
use log::{debug, warn};
use rand::Rng;

use crate::collision::{flat_distance, Arena, Collider};
use crate::components::{
    Body, Equipment, Health, Inventory, Player, PlayerStats, Shield, Spellbook, Target, Transform,
    Velocity,
};
use crate::constants::*;
use crate::content::{ContentDb, ScatterDef, WorldLayout};
use crate::spawning::{spawn_interactable, spawn_npc};
use crate::systems::resources::recalc_player;

/// Points scattered props must keep clear of
fn authored_points(layout: &WorldLayout) -> Vec<Vec3> {
    let mut points = vec![Vec3::from(SAFE_POINT)];
    points.extend(layout.npcs.iter().map(|n| n.pos));
    points.extend(layout.npcs.iter().filter_map(|n| n.escort.as_ref().map(|e| e.destination)));
    points.extend(layout.interactables.iter().map(|i| i.pos));
    points.extend(layout.waypoints.iter().map(|w| w.pos));
    points.extend(layout.spawns.iter().map(|s| s.pos));
    points
}

/// Inclusive range that tolerates swapped bounds in content files
fn span(a: f32, b: f32) -> std::ops::RangeInclusive<f32> {
    a.min(b)..=a.max(b)
}

fn scatter_props(scatter: &ScatterDef, keep_clear: &[Vec3], arena: &mut Arena, rng: &mut impl Rng) {
    for _ in 0..scatter.count {
        let x = rng.gen_range(span(scatter.min[0], scatter.max[0]));
        let z = rng.gen_range(span(scatter.min[1], scatter.max[1]));
        let radius = rng.gen_range(span(scatter.radius[0], scatter.radius[1]));
        let center = Vec3::new(x, radius, z);
        if keep_clear
            .iter()
            .any(|p| flat_distance(*p, center) < radius + SCATTER_CLEARANCE)
        {
            continue;
        }
        arena.push(Collider::Sphere { center, radius });
    }
}

/// Authored props plus seeded tree/rock scatter
pub fn build_arena(layout: &WorldLayout, size: f32, rng: &mut impl Rng) -> Arena {
    let mut arena = Arena::with_colliders(size, layout.props.clone());
    let keep_clear = authored_points(layout);
    for scatter in &layout.scatter {
        scatter_props(scatter, &keep_clear, &mut arena, rng);
    }
    debug!("arena built with {} colliders", arena.colliders.len());
    arena
}

/// Spawn the player at the safe point with starting stats and an empty bag
pub fn spawn_player(world: &mut World, content: &ContentDb) -> Entity {
    let player = world.spawn((
        Player,
        Transform::at(Vec3::from(SAFE_POINT)),
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
    recalc_player(world, player, content);
    player
}

/// Spawn every enemy spawn point, skipping unknown enemy kinds
fn spawn_enemies(world: &mut World, content: &ContentDb, rng: &mut impl Rng) -> usize {
    let mut spawned = 0;
    for point in &content.layout().spawns {
        let Some(def) = content.enemy_type(&point.kind) else {
            warn!("spawn point {} uses unknown enemy kind {}", point.id, point.kind);
            continue;
        };
        def.spawn(world, point.pos, rng);
        spawned += 1;
    }
    spawned
}

/// Create the world: arena, player, NPCs, interactables and enemies.
pub fn init_world(
    content: &ContentDb,
    world_size: f32,
    rng: &mut impl Rng,
) -> (World, Entity, Arena) {
    let layout = content.layout();
    let arena = build_arena(layout, world_size, rng);

    let mut world = World::new();
    let player = spawn_player(&mut world, content);
    for npc in &layout.npcs {
        spawn_npc(&mut world, npc);
    }
    for object in &layout.interactables {
        spawn_interactable(&mut world, object);
    }
    let enemies = spawn_enemies(&mut world, content, rng);
    debug!(
        "world ready: {} npcs, {} interactables, {enemies} enemies",
        layout.npcs.len(),
        layout.interactables.len()
    );

    (world, player, arena)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EnemyAi, Npc};
    use crate::content::{ItemCatalog, SpawnPoint};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_world_spawns_everything() {
        let content = ContentDb::builtin();
        let mut rng = StdRng::seed_from_u64(1337);
        let (world, player, arena) = init_world(&content, WORLD_SIZE, &mut rng);

        let layout = content.layout();
        assert!(world.get::<&Player>(player).is_ok());
        assert_eq!(world.query::<&Npc>().iter().count(), layout.npcs.len());
        assert_eq!(world.query::<&EnemyAi>().iter().count(), layout.spawns.len());
        assert!(arena.colliders.len() > layout.props.len());
    }

    #[test]
    fn test_scatter_is_seeded_and_keeps_clear() {
        let content = ContentDb::builtin();
        let a = build_arena(content.layout(), WORLD_SIZE, &mut StdRng::seed_from_u64(9));
        let b = build_arena(content.layout(), WORLD_SIZE, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.colliders, b.colliders);

        let keep_clear = authored_points(content.layout());
        for collider in &a.colliders[content.layout().props.len()..] {
            let Collider::Sphere { center, radius } = *collider else {
                panic!("scatter should only add spheres");
            };
            assert!(keep_clear
                .iter()
                .all(|p| flat_distance(*p, center) >= radius + SCATTER_CLEARANCE));
        }
    }

    #[test]
    fn test_unknown_enemy_kind_is_skipped() {
        let mut layout = WorldLayout::default();
        layout.spawns.push(SpawnPoint {
            id: "ghost1".into(),
            kind: "ghost".into(),
            pos: Vec3::ZERO,
        });
        let content =
            ContentDb::new(Vec::new(), ItemCatalog::default(), Vec::new(), layout).unwrap();
        let (world, _, _) = init_world(&content, WORLD_SIZE, &mut StdRng::seed_from_u64(1));
        assert_eq!(world.query::<&EnemyAi>().iter().count(), 0);
    }
}
