//! Per-frame sampling of logical player actions.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use crate::locomotion::{ButtonSample, MovementInput};

#[derive(Resource, Debug, Clone)]
pub struct InputBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub sprint: KeyCode,
    pub crouch: KeyCode,
    pub interact: KeyCode,
    pub pause: KeyCode,
    pub debug_overlay: KeyCode,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
            sprint: KeyCode::ShiftLeft,
            crouch: KeyCode::ControlLeft,
            interact: KeyCode::KeyE,
            pause: KeyCode::Escape,
            debug_overlay: KeyCode::F3,
        }
    }
}

/// Everything gameplay systems read from the input devices this frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub movement: MovementInput,
    pub interact: ButtonSample,
    pub look: Vec2,
}

pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputBindings>()
            .init_resource::<PlayerInput>();
    }
}

pub fn sample_button(keys: &ButtonInput<KeyCode>, key: KeyCode) -> ButtonSample {
    ButtonSample {
        pressed: keys.just_pressed(key),
        released: keys.just_released(key),
        held: keys.pressed(key),
    }
}

fn axis(keys: &ButtonInput<KeyCode>, positive: KeyCode, negative: KeyCode) -> f32 {
    let mut value = 0.0;
    if keys.pressed(positive) {
        value += 1.0;
    }
    if keys.pressed(negative) {
        value -= 1.0;
    }
    value
}

pub fn sample_movement(keys: &ButtonInput<KeyCode>, bindings: &InputBindings) -> MovementInput {
    MovementInput {
        axes: Vec2::new(
            axis(keys, bindings.right, bindings.left),
            axis(keys, bindings.forward, bindings.back),
        ),
        jump: sample_button(keys, bindings.jump),
        sprint: sample_button(keys, bindings.sprint),
        crouch: sample_button(keys, bindings.crouch),
    }
}

pub fn sample_player_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mouse_motion: Option<Res<AccumulatedMouseMotion>>,
    bindings: Res<InputBindings>,
    mut input: ResMut<PlayerInput>,
) {
    let Some(keys) = keys else {
        *input = PlayerInput::default();
        return;
    };

    input.movement = sample_movement(&keys, &bindings);
    input.interact = sample_button(&keys, bindings.interact);
    input.look = mouse_motion.map(|motion| motion.delta).unwrap_or(Vec2::ZERO);
}
