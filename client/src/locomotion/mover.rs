use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;

use crate::physics::{self, CharacterBody};

/// Collision-resolving movement capability consumed by the locomotion controller.
pub trait Mover {
    /// Moves by `displacement`, resolving collisions and updating contact state.
    fn move_by(&mut self, displacement: Vec3);
    fn is_grounded(&self) -> bool;
    /// True when a surface lies within `range` above the head.
    fn probe_ceiling(&self, range: f32) -> bool;
    fn height(&self) -> f32;
    fn set_height(&mut self, height: f32);
    fn set_enabled(&mut self, enabled: bool);
    fn set_position(&mut self, position: Vec3);
    fn detach_from_parent(&mut self);
}

/// [`Mover`] over a [`CharacterBody`] and its transform, for one frame.
pub struct BodyMover<'a> {
    transform: &'a mut Transform,
    body: &'a mut CharacterBody,
    colliders: &'a [Aabb3d],
    detach_requested: bool,
}

impl<'a> BodyMover<'a> {
    pub fn new(
        transform: &'a mut Transform,
        body: &'a mut CharacterBody,
        colliders: &'a [Aabb3d],
    ) -> Self {
        Self {
            transform,
            body,
            colliders,
            detach_requested: false,
        }
    }

    /// Whether a teleport asked to be unparented; the caller owns `Commands`.
    pub fn detach_requested(&self) -> bool {
        self.detach_requested
    }
}

impl Mover for BodyMover<'_> {
    fn move_by(&mut self, displacement: Vec3) {
        if !self.body.enabled {
            return;
        }

        let outcome = physics::resolve_motion(
            self.transform.translation,
            displacement,
            self.body.half_extents(),
            self.colliders,
        );
        self.transform.translation = outcome.position;
        self.body.grounded = outcome.grounded;
        self.body.ceiling = outcome.ceiling;
    }

    fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    fn probe_ceiling(&self, range: f32) -> bool {
        physics::probe_offset(
            self.transform.translation,
            self.body.half_extents(),
            range,
            self.colliders,
        )
    }

    fn height(&self) -> f32 {
        self.body.height
    }

    fn set_height(&mut self, height: f32) {
        // Keep the feet planted while the box shrinks or grows.
        let delta = height - self.body.height;
        self.body.height = height;
        self.transform.translation.y += delta * 0.5;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.body.enabled = enabled;
        if !enabled {
            self.body.grounded = false;
            self.body.ceiling = false;
        }
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    fn detach_from_parent(&mut self) {
        self.detach_requested = true;
    }
}
