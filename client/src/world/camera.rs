use bevy::prelude::*;

use crate::input::PlayerInput;
use crate::locomotion::{Deactivated, LocomotionController, Player};
use crate::physics::CharacterBody;
use crate::settings::SettingsResource;

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.02;

/// Camera mounted on the player body; yaw turns the body, pitch tilts the camera.
#[derive(Component, Debug, Clone, Copy)]
pub struct FirstPersonCamera {
    pub pitch: f32,
    /// Distance from the top of the body down to the eyes.
    pub eye_drop: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            eye_drop: 0.1,
        }
    }
}

impl FirstPersonCamera {
    pub fn eye_height(&self, body_height: f32) -> f32 {
        body_height * 0.5 - self.eye_drop
    }
}

pub fn apply_mouse_look(
    input: Res<PlayerInput>,
    settings: Res<SettingsResource>,
    mut players: Query<
        (&mut Transform, &LocomotionController),
        (With<Player>, Without<Deactivated>, Without<FirstPersonCamera>),
    >,
    mut cameras: Query<(&mut Transform, &mut FirstPersonCamera, &ChildOf), Without<Player>>,
) {
    if input.look == Vec2::ZERO {
        return;
    }
    let controls = &settings.current.controls;
    let pitch_sign = if controls.invert_y { 1.0 } else { -1.0 };

    for (mut camera_transform, mut camera, child_of) in &mut cameras {
        let Ok((mut body, controller)) = players.get_mut(child_of.parent()) else {
            continue;
        };
        if !controller.movement_enabled() {
            continue;
        }

        body.rotate_y(-input.look.x * controls.mouse_sensitivity);
        camera.pitch = (camera.pitch + pitch_sign * input.look.y * controls.mouse_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
    }
}

pub fn sync_camera_eye_height(
    bodies: Query<&CharacterBody>,
    mut cameras: Query<(&mut Transform, &FirstPersonCamera, &ChildOf)>,
) {
    for (mut transform, camera, child_of) in &mut cameras {
        let Ok(body) = bodies.get(child_of.parent()) else {
            continue;
        };
        let eye_height = camera.eye_height(body.height);
        if transform.translation.y != eye_height {
            transform.translation.y = eye_height;
        }
    }
}
