//! Ground-plane collision against static world props.
//!
//! Moving bodies are discs on the XZ plane. Props are spheres or boxes whose
//! vertical extent is ignored. Penetrations are resolved one collider at a
//! time in insertion order, so tight corners can leave a little residual
//! overlap that the next tick cleans up.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{COLLISION_EPSILON, WORLD_SIZE};

/// A static world volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum Collider {
    Sphere { center: Vec3, radius: f32 },
    #[serde(rename = "box")]
    Cuboid { center: Vec3, half_extents: Vec3 },
}

impl Collider {
    /// Push needed to move a disc at `pos` with `radius` out of this volume
    pub fn push_out(&self, pos: Vec3, radius: f32) -> Option<Vec3> {
        match *self {
            Collider::Sphere { center, radius: collider_radius } => {
                let offset = flat(pos - center);
                let dist = offset.length();
                let min_dist = radius + collider_radius;
                if dist >= min_dist {
                    return None;
                }
                let dir = if dist > f32::EPSILON { offset / dist } else { Vec3::X };
                Some(dir * (min_dist - dist + COLLISION_EPSILON))
            }
            Collider::Cuboid { center, half_extents } => {
                let closest = Vec3::new(
                    pos.x.clamp(center.x - half_extents.x, center.x + half_extents.x),
                    pos.y,
                    pos.z.clamp(center.z - half_extents.z, center.z + half_extents.z),
                );
                let offset = flat(pos - closest);
                let dist = offset.length();
                if dist >= radius {
                    return None;
                }
                if dist > f32::EPSILON {
                    return Some(offset / dist * (radius - dist + COLLISION_EPSILON));
                }
                // Centre is inside the box: leave through the nearest face
                let faces = [
                    (pos.x - (center.x - half_extents.x), Vec3::NEG_X),
                    ((center.x + half_extents.x) - pos.x, Vec3::X),
                    (pos.z - (center.z - half_extents.z), Vec3::NEG_Z),
                    ((center.z + half_extents.z) - pos.z, Vec3::Z),
                ];
                let (depth, dir) = faces
                    .into_iter()
                    .min_by(|a, b| a.0.total_cmp(&b.0))
                    .unwrap_or((0.0, Vec3::X));
                Some(dir * (depth + radius + COLLISION_EPSILON))
            }
        }
    }
}

/// Static collision set plus the square world boundary
#[derive(Debug, Clone)]
pub struct Arena {
    pub colliders: Vec<Collider>,
    pub size: f32,
}

impl Arena {
    pub fn new(size: f32) -> Self {
        Self { colliders: Vec::new(), size }
    }

    pub fn with_colliders(size: f32, colliders: Vec<Collider>) -> Self {
        Self { colliders, size }
    }

    pub fn push(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    fn clamp_to_bounds(&self, mut pos: Vec3, radius: f32) -> Vec3 {
        let half = (self.size * 0.5 - radius).max(0.0);
        pos.x = pos.x.clamp(-half, half);
        pos.z = pos.z.clamp(-half, half);
        pos
    }

    fn in_bounds(&self, pos: Vec3, radius: f32) -> bool {
        let half = (self.size * 0.5 - radius).max(0.0);
        pos.x.abs() <= half && pos.z.abs() <= half
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(WORLD_SIZE)
    }
}

/// Resolve a disc against every collider, then clamp it inside the world.
/// Returns the corrected position and whether any collider was hit.
pub fn resolve(position: Vec3, radius: f32, arena: &Arena) -> (Vec3, bool) {
    let mut pos = position;
    let mut collided = false;
    for collider in &arena.colliders {
        if let Some(push) = collider.push_out(pos, radius) {
            pos += push;
            collided = true;
        }
    }
    (arena.clamp_to_bounds(pos, radius), collided)
}

/// True if a disc at `position` overlaps a collider or leaves the world
pub fn is_blocked(position: Vec3, radius: f32, arena: &Arena) -> bool {
    !arena.in_bounds(position, radius)
        || arena
            .colliders
            .iter()
            .any(|collider| collider.push_out(position, radius).is_some())
}

/// Drop the vertical component
pub fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance on the ground plane
pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    flat(a - b).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_pushes_out_of_sphere() {
        let center = Vec3::new(10.0, 4.4, 10.0);
        let arena = Arena::with_colliders(240.0, vec![Collider::Sphere { center, radius: 1.2 }]);
        let start = Vec3::new(10.5, 1.0, 10.2);
        let (pos, collided) = resolve(start, 0.6, &arena);
        assert!(collided);
        assert!(flat_distance(pos, center) >= 1.8 - 1e-4);
    }

    #[test]
    fn test_resolve_sphere_dead_center() {
        let arena = Arena::with_colliders(
            240.0,
            vec![Collider::Sphere { center: Vec3::ZERO, radius: 2.0 }],
        );
        let (pos, collided) = resolve(Vec3::ZERO, 0.5, &arena);
        assert!(collided);
        assert!(flat_distance(pos, Vec3::ZERO) >= 2.5 - 1e-4);
    }

    #[test]
    fn test_resolve_box_edge() {
        let arena = Arena::with_colliders(
            240.0,
            vec![Collider::Cuboid {
                center: Vec3::ZERO,
                half_extents: Vec3::new(2.0, 1.0, 2.0),
            }],
        );
        let (pos, collided) = resolve(Vec3::new(2.3, 1.0, 0.0), 0.6, &arena);
        assert!(collided);
        assert_relative_eq!(pos.x, 2.6 + COLLISION_EPSILON, epsilon = 1e-4);
        assert_relative_eq!(pos.z, 0.0);
    }

    #[test]
    fn test_resolve_box_inside_leaves_nearest_face() {
        let arena = Arena::with_colliders(
            240.0,
            vec![Collider::Cuboid {
                center: Vec3::ZERO,
                half_extents: Vec3::new(4.0, 1.0, 2.0),
            }],
        );
        let (pos, collided) = resolve(Vec3::new(0.5, 0.0, 1.5), 0.5, &arena);
        assert!(collided);
        assert!(pos.z >= 2.5);
        assert_relative_eq!(pos.x, 0.5);
    }

    #[test]
    fn test_resolve_clamps_to_world() {
        let arena = Arena::new(100.0);
        let (pos, collided) = resolve(Vec3::new(80.0, 1.0, -80.0), 1.0, &arena);
        assert!(!collided);
        assert_relative_eq!(pos.x, 49.0);
        assert_relative_eq!(pos.z, -49.0);
    }

    #[test]
    fn test_no_collision_leaves_position() {
        let arena = Arena::with_colliders(
            240.0,
            vec![Collider::Sphere { center: Vec3::new(20.0, 0.0, 0.0), radius: 1.0 }],
        );
        let start = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(resolve(start, 0.6, &arena), (start, false));
        assert!(!is_blocked(start, 0.6, &arena));
        assert!(is_blocked(Vec3::new(20.5, 0.0, 0.0), 0.6, &arena));
    }
}
