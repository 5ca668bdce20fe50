//! Minimal kinematic collision for character bodies.
//!
//! Bodies are axis-aligned boxes moved one axis at a time against static
//! [`StaticCollider`] boxes. This is only what the locomotion controller
//! needs from a "mover"; there are no dynamic rigid bodies.

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;

/// Overlap below this depth counts as touching, not penetrating.
const CONTACT_EPSILON: f32 = 1e-4;

/// Distance below the feet that still counts as standing on a surface.
pub const GROUND_PROBE_DISTANCE: f32 = 0.02;

/// Static box that character bodies cannot pass through.
#[derive(Component, Debug, Clone, Copy)]
pub struct StaticCollider {
    pub half_extents: Vec3,
}

impl StaticCollider {
    pub fn bounds(&self, center: Vec3) -> Aabb3d {
        Aabb3d::new(center, self.half_extents)
    }
}

/// Collision state of a character; the transform translation is the body centre.
#[derive(Component, Debug, Clone)]
pub struct CharacterBody {
    pub height: f32,
    pub radius: f32,
    pub grounded: bool,
    pub ceiling: bool,
    pub enabled: bool,
}

impl CharacterBody {
    pub fn new(height: f32, radius: f32) -> Self {
        Self {
            height,
            radius,
            grounded: false,
            ceiling: false,
            enabled: true,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.radius, self.height * 0.5, self.radius)
    }

    pub fn bounds(&self, center: Vec3) -> Aabb3d {
        Aabb3d::new(center, self.half_extents())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    pub position: Vec3,
    pub grounded: bool,
    pub ceiling: bool,
}

/// Strict overlap test: boxes that only share a face do not penetrate.
pub fn penetrates(a: &Aabb3d, b: &Aabb3d) -> bool {
    let overlap = a.max.min(b.max) - a.min.max(b.min);
    overlap.min_element() > CONTACT_EPSILON
}

/// Moves a box of `half_extents` by `displacement`, resolving x, then z,
/// then y against `colliders`.
pub fn resolve_motion(
    position: Vec3,
    displacement: Vec3,
    half_extents: Vec3,
    colliders: &[Aabb3d],
) -> MotionOutcome {
    let mut position = position;
    let mut grounded = false;
    let mut ceiling = false;

    for axis in [0usize, 2, 1] {
        let delta = displacement[axis];
        if delta == 0.0 {
            continue;
        }

        position[axis] += delta;
        for collider in colliders {
            let bounds = Aabb3d::new(position, half_extents);
            if !penetrates(&bounds, collider) {
                continue;
            }

            if delta > 0.0 {
                position[axis] = collider.min[axis] - half_extents[axis];
                if axis == 1 {
                    ceiling = true;
                }
            } else {
                position[axis] = collider.max[axis] + half_extents[axis];
                if axis == 1 {
                    grounded = true;
                }
            }
        }
    }

    if !grounded && displacement.y <= 0.0 {
        grounded = probe_offset(position, half_extents, -GROUND_PROBE_DISTANCE, colliders);
    }

    MotionOutcome {
        position,
        grounded,
        ceiling,
    }
}

/// True when the box moved vertically by `offset` would penetrate a collider.
pub fn probe_offset(position: Vec3, half_extents: Vec3, offset: f32, colliders: &[Aabb3d]) -> bool {
    let probe = Aabb3d::new(position + Vec3::Y * offset, half_extents);
    colliders
        .iter()
        .any(|collider| penetrates(&probe, collider))
}

/// Distance along `direction` to the nearest box hit within `max_distance`.
pub fn ray_hit_distance(
    origin: Vec3,
    direction: Dir3,
    max_distance: f32,
    bounds: &Aabb3d,
) -> Option<f32> {
    RayCast3d::new(origin, direction, max_distance).aabb_intersection_at(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Aabb3d {
        Aabb3d::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0))
    }

    const BODY: Vec3 = Vec3::new(0.4, 1.0, 0.4);

    #[test]
    fn falling_body_lands_on_floor_top() {
        let outcome = resolve_motion(
            Vec3::new(0.0, 1.2, 0.0),
            Vec3::new(0.0, -0.5, 0.0),
            BODY,
            &[floor()],
        );
        assert!(outcome.grounded);
        assert!(!outcome.ceiling);
        assert!((outcome.position.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn resting_body_slides_along_floor() {
        let outcome = resolve_motion(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.3, -0.001, 0.2),
            BODY,
            &[floor()],
        );
        assert!(outcome.grounded);
        assert!((outcome.position.x - 0.3).abs() < 1e-5);
        assert!((outcome.position.z - 0.2).abs() < 1e-5);
    }

    #[test]
    fn rising_body_stops_under_ceiling() {
        let ceiling = Aabb3d::new(Vec3::new(0.0, 3.5, 0.0), Vec3::new(5.0, 0.5, 5.0));
        let outcome = resolve_motion(
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            BODY,
            &[ceiling],
        );
        assert!(outcome.ceiling);
        assert!((outcome.position.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn wall_blocks_horizontal_motion() {
        let wall = Aabb3d::new(Vec3::new(2.0, 1.0, 0.0), Vec3::new(0.5, 2.0, 5.0));
        let outcome = resolve_motion(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            BODY,
            &[wall],
        );
        assert!((outcome.position.x - 1.1).abs() < 1e-5);
    }

    #[test]
    fn touching_faces_do_not_penetrate() {
        let a = Aabb3d::new(Vec3::ZERO, Vec3::splat(0.5));
        let b = Aabb3d::new(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
        assert!(!penetrates(&a, &b));
    }

    #[test]
    fn ray_hits_box_in_front() {
        let target = Aabb3d::new(Vec3::new(0.0, 0.0, -3.0), Vec3::splat(0.5));
        let hit = ray_hit_distance(Vec3::ZERO, Dir3::NEG_Z, 5.0, &target);
        assert!(matches!(hit, Some(distance) if (distance - 2.5).abs() < 1e-4));
        assert!(ray_hit_distance(Vec3::ZERO, Dir3::NEG_Z, 2.0, &target).is_none());
    }
}
