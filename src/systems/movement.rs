//! Player movement system.
//!
//! Velocity eases toward the input direction (faster when stopping than when
//! starting) and the result is pushed out of world props every tick.

use glam::Vec3;
use hecs::{Entity, World};

use crate::collision::{resolve, Arena};
use crate::components::{Body, PlayerStats, Transform, Velocity};
use crate::constants::*;
use crate::input::MoveInput;
use crate::systems::resources::move_speed_multiplier;

/// Desired ground-plane direction for the given facing and input
pub fn input_direction(transform: &Transform, input: MoveInput) -> Vec3 {
    (transform.forward() * input.forward + transform.right() * input.strafe).normalize_or_zero()
}

/// Turn, accelerate and move the player, then resolve collisions.
/// Returns true if a prop was hit this tick.
pub fn update_player_movement(
    world: &mut World,
    player: Entity,
    input: MoveInput,
    arena: &Arena,
    dt: f32,
) -> bool {
    puffin::profile_function!();
    let input = input.sanitized();
    let Ok((transform, velocity, body, stats)) =
        world.query_one_mut::<(&mut Transform, &mut Velocity, &Body, &PlayerStats)>(player)
    else {
        return false;
    };

    transform.yaw += input.turn * PLAYER_TURN_RATE * dt;

    let target = input_direction(transform, input) * PLAYER_SPEED * move_speed_multiplier(stats);
    let rate = if input.is_idle() { PLAYER_DECEL } else { PLAYER_ACCEL };
    velocity.0 = velocity.0.lerp(target, (rate * dt).min(1.0));

    let (pos, collided) = resolve(transform.pos + velocity.0 * dt, body.radius, arena);
    transform.pos = pos;
    collided
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{flat_distance, Collider};
    use approx::assert_relative_eq;

    fn spawn_player(world: &mut World, pos: Vec3) -> Entity {
        world.spawn((
            Transform::at(pos),
            Velocity::default(),
            Body { radius: PLAYER_RADIUS },
            PlayerStats::new(),
        ))
    }

    fn run(world: &mut World, player: Entity, input: MoveInput, arena: &Arena, seconds: f32) {
        for _ in 0..(seconds / HEADLESS_STEP).round() as usize {
            update_player_movement(world, player, input, arena, HEADLESS_STEP);
        }
    }

    #[test]
    fn test_accelerates_to_full_speed() {
        let mut world = World::new();
        let arena = Arena::default();
        let player = spawn_player(&mut world, Vec3::new(0.0, 1.0, 0.0));
        let forward = MoveInput { forward: 1.0, ..Default::default() };
        run(&mut world, player, forward, &arena, 1.0);

        let velocity = world.get::<&Velocity>(player).unwrap().0;
        assert_relative_eq!(velocity.z, PLAYER_SPEED, epsilon = 1e-3);
        assert!(world.get::<&Transform>(player).unwrap().pos.z > 5.0);

        run(&mut world, player, MoveInput::default(), &arena, 1.0);
        assert!(world.get::<&Velocity>(player).unwrap().0.length() < 1e-3);
    }

    #[test]
    fn test_fatigue_slows_player() {
        let mut world = World::new();
        let arena = Arena::default();
        let player = spawn_player(&mut world, Vec3::ZERO);
        world.get::<&mut PlayerStats>(player).unwrap().fatigue.current = PLAYER_MAX_FATIGUE;
        run(&mut world, player, MoveInput { forward: 1.0, ..Default::default() }, &arena, 1.5);

        let speed = world.get::<&Velocity>(player).unwrap().0.length();
        assert_relative_eq!(speed, PLAYER_SPEED * (1.0 - FATIGUE_SPEED_PENALTY), epsilon = 1e-3);
    }

    #[test]
    fn test_turn_and_strafe() {
        let transform = Transform { pos: Vec3::ZERO, yaw: std::f32::consts::FRAC_PI_2 };
        let dir = input_direction(&transform, MoveInput { forward: 1.0, ..Default::default() });
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-5);
        let strafe = MoveInput {
            strafe: 1.0,
            ..Default::default()
        };
        let dir = input_direction(&Transform::at(Vec3::ZERO), strafe);
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-5);

        let mut world = World::new();
        let player = spawn_player(&mut world, Vec3::ZERO);
        let turn = MoveInput {
            turn: 1.0,
            ..Default::default()
        };
        update_player_movement(&mut world, player, turn, &Arena::default(), 0.5);
        assert_relative_eq!(world.get::<&Transform>(player).unwrap().yaw, PLAYER_TURN_RATE * 0.5);
    }

    #[test]
    fn test_walls_stop_the_player() {
        let mut world = World::new();
        let arena = Arena::with_colliders(
            WORLD_SIZE,
            vec![Collider::Sphere { center: Vec3::new(0.0, 1.0, 4.0), radius: 1.5 }],
        );
        let player = spawn_player(&mut world, Vec3::new(0.0, 1.0, 0.0));
        run(&mut world, player, MoveInput { forward: 1.0, ..Default::default() }, &arena, 2.0);

        let pos = world.get::<&Transform>(player).unwrap().pos;
        assert!(flat_distance(pos, Vec3::new(0.0, 1.0, 4.0)) >= 1.5 + PLAYER_RADIUS - 1e-3);
    }
}
