use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::AppState;
use crate::companion::{CompanionBrain, FollowTarget};
use crate::gameplay::runtime::pipeline::GameplayPipelineSet;
use crate::input::InputBindings;
use crate::locomotion::{ActivePlayer, LocomotionController};
use crate::oxygen::OxygenHandler;
use crate::physics::CharacterBody;
use crate::settings::SettingsResource;

const HEAD_PROBE_COLOUR: Color = Color::srgb(1.0, 0.3, 0.3);
const VIEW_CONE_COLOUR: Color = Color::srgb(0.3, 1.0, 0.4);
const FOLLOW_RING_SEGMENTS: usize = 24;

pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            toggle_debug_overlay_shortcut
                .in_set(GameplayPipelineSet::Input)
                .run_if(in_state(AppState::Playing)),
        )
        .add_systems(
            Update,
            (draw_head_probe_gizmos, draw_companion_view_gizmos)
                .in_set(GameplayPipelineSet::UiSync)
                .run_if(in_state(AppState::Playing))
                .run_if(debug_gizmos_visible),
        )
        .add_systems(
            EguiPrimaryContextPass,
            draw_debug_readout
                .run_if(in_state(AppState::Playing))
                .run_if(debug_overlay_visible),
        );
    }
}

fn debug_overlay_visible(settings: Res<SettingsResource>) -> bool {
    settings.current.debug.overlay
}

fn debug_gizmos_visible(settings: Res<SettingsResource>) -> bool {
    settings.current.debug.overlay && settings.current.debug.gizmos
}

fn toggle_debug_overlay_shortcut(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<InputBindings>,
    mut settings: ResMut<SettingsResource>,
) {
    if keys.is_some_and(|keys| keys.just_pressed(bindings.debug_overlay)) {
        let overlay = !settings.current.debug.overlay;
        settings.current.debug.overlay = overlay;
        debug!("Debug overlay {}", if overlay { "shown" } else { "hidden" });
    }
}

/// Readout lines for a locomotion controller and its body.
pub fn locomotion_lines(controller: &LocomotionController, body: Option<&CharacterBody>) -> Vec<String> {
    let state = controller.state();
    let mut lines = vec![
        format!("speed {:.2}", state.speed),
        format!("stamina {:.2}", state.stamina),
        format!("vertical velocity {:.2}", state.vertical_velocity),
        format!("gravity {:.2} jump force {:.2}", state.gravity, state.jump_force),
        format!(
            "sprinting {} crouching {} movement {}",
            state.sprinting, state.crouching, state.movement_enabled
        ),
    ];
    if let Some(body) = body {
        lines.push(format!(
            "grounded {} ceiling {} height {:.2}",
            body.grounded, body.ceiling, body.height
        ));
    }
    lines
}

fn draw_debug_readout(
    mut contexts: EguiContexts,
    active: Res<ActivePlayer>,
    players: Query<(&Transform, &LocomotionController, Option<&CharacterBody>, Option<&OxygenHandler>)>,
    companions: Query<(&Transform, &CompanionBrain, &FollowTarget)>,
    targets: Query<&Transform>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Window::new("Debug")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .collapsible(true)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Player").strong());
            match active.0.and_then(|entity| players.get(entity).ok()) {
                Some((transform, controller, body, oxygen)) => {
                    let position = transform.translation;
                    ui.monospace(format!(
                        "position {:.2} {:.2} {:.2}",
                        position.x, position.y, position.z
                    ));
                    for line in locomotion_lines(controller, body) {
                        ui.monospace(line);
                    }
                    if let Some(oxygen) = oxygen {
                        ui.monospace(format!(
                            "oxygen {:.2} depleting {}",
                            oxygen.level(),
                            oxygen.is_depleting()
                        ));
                    }
                }
                None => {
                    ui.monospace("no active player");
                }
            }

            for (transform, brain, follow) in &companions {
                ui.separator();
                ui.label(egui::RichText::new("Companion").strong());
                let target = follow
                    .0
                    .and_then(|entity| targets.get(entity).ok())
                    .map(|target| target.translation);
                let mode = brain
                    .mode()
                    .map(|mode| mode.to_string())
                    .unwrap_or_else(|| "not started".to_string());
                ui.monospace(format!("mode {mode}"));
                ui.monospace(format!(
                    "distance {:.2} in view {}",
                    brain.distance_to(transform, target),
                    brain.target_in_view(transform, target)
                ));
            }
        });
}

fn draw_head_probe_gizmos(
    mut gizmos: Gizmos,
    active: Res<ActivePlayer>,
    players: Query<(&Transform, &LocomotionController, &CharacterBody)>,
) {
    let Some((transform, controller, body)) = active.0.and_then(|entity| players.get(entity).ok())
    else {
        return;
    };

    let range = controller.config().head_detection_range;
    let half = body.half_extents();
    let center = transform.translation + Vec3::Y * (half.y + range * 0.5);
    let size = Vec3::new(half.x * 2.0, range, half.z * 2.0);
    gizmos.cube(
        Transform::from_translation(center).with_scale(size),
        HEAD_PROBE_COLOUR,
    );
}

fn draw_companion_view_gizmos(
    mut gizmos: Gizmos,
    companions: Query<(&Transform, &CompanionBrain)>,
) {
    for (transform, brain) in &companions {
        let config = brain.config();
        let origin = transform.translation;
        let forward = transform.forward().as_vec3() * config.follow_distance;
        let half_angle = config.line_of_sight.to_radians();

        for angle in [-half_angle, half_angle] {
            let edge = Quat::from_rotation_y(angle) * forward;
            gizmos.line(origin, origin + edge, VIEW_CONE_COLOUR);
        }

        for segment in 0..FOLLOW_RING_SEGMENTS {
            let step = std::f32::consts::TAU / FOLLOW_RING_SEGMENTS as f32;
            let a = Quat::from_rotation_y(step * segment as f32) * forward;
            let b = Quat::from_rotation_y(step * (segment + 1) as f32) * forward;
            gizmos.line(origin + a, origin + b, VIEW_CONE_COLOUR.with_alpha(0.4));
        }
    }
}
