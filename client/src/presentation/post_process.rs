//! Screen feedback driven by the active player's oxygen level.

use bevy::post_process::dof::DepthOfField;
use bevy::prelude::*;
use bevy::render::view::ColorGrading;
use bevy::state::prelude::{OnEnter, OnExit};

use crate::AppState;
use crate::gameplay::runtime::pipeline::GameplayPipelineSet;
use crate::locomotion::ActivePlayer;
use crate::oxygen::{OxygenHandler, PostProcessParams};
use crate::world::FirstPersonCamera;

pub struct OxygenFeedbackPlugin;

impl Plugin for OxygenFeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Playing), spawn_feedback_overlays)
            .add_systems(OnExit(AppState::Playing), despawn_feedback_overlays)
            .add_systems(
                Update,
                (apply_camera_feedback, apply_overlay_feedback)
                    .in_set(GameplayPipelineSet::Feedback)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

/// Full-screen tint layers standing in for the vignette and colour filter.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOverlay {
    Vignette,
    ColourFilter,
}

impl FeedbackOverlay {
    pub fn colour(self, params: &PostProcessParams) -> Color {
        match self {
            Self::Vignette => Color::BLACK.with_alpha(params.vignette_alpha()),
            Self::ColourFilter => params.colour_filter_color(),
        }
    }
}

fn spawn_feedback_overlays(mut commands: Commands) {
    for (overlay, z_index) in [
        (FeedbackOverlay::ColourFilter, -20),
        (FeedbackOverlay::Vignette, -10),
    ] {
        commands.spawn((
            Name::new(format!("{overlay:?} Overlay")),
            overlay,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::NONE),
            GlobalZIndex(z_index),
        ));
    }
}

fn despawn_feedback_overlays(mut commands: Commands, overlays: Query<Entity, With<FeedbackOverlay>>) {
    for entity in &overlays {
        commands.entity(entity).try_despawn();
    }
}

/// Post-process parameters for the active player, if it breathes.
fn active_params(active: &ActivePlayer, handlers: &Query<&OxygenHandler>) -> Option<PostProcessParams> {
    let oxygen = handlers.get(active.0?).ok()?;
    Some(oxygen.config().feedback.evaluate(oxygen.level()))
}

fn apply_camera_feedback(
    active: Res<ActivePlayer>,
    handlers: Query<&OxygenHandler>,
    mut cameras: Query<
        (&ChildOf, Option<&mut DepthOfField>, Option<&mut ColorGrading>),
        With<FirstPersonCamera>,
    >,
) {
    let Some(params) = active_params(&active, &handlers) else {
        return;
    };

    for (child_of, depth_of_field, grading) in &mut cameras {
        if Some(child_of.parent()) != active.0 {
            continue;
        }
        if let Some(mut depth_of_field) = depth_of_field {
            depth_of_field.focal_distance = params.focal_distance;
        }
        if let Some(grading) = grading {
            let grading = grading.into_inner();
            grading.global.post_saturation = params.saturation;
            for section in [
                &mut grading.shadows,
                &mut grading.midtones,
                &mut grading.highlights,
            ] {
                section.contrast = params.contrast;
            }
        }
    }
}

fn apply_overlay_feedback(
    active: Res<ActivePlayer>,
    handlers: Query<&OxygenHandler>,
    mut overlays: Query<(&FeedbackOverlay, &mut BackgroundColor)>,
) {
    let params = active_params(&active, &handlers);

    for (overlay, mut background) in &mut overlays {
        let colour = params
            .as_ref()
            .map(|params| overlay.colour(params))
            .unwrap_or(Color::NONE);
        if background.0 != colour {
            background.0 = colour;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oxygen::FeedbackProfile;

    #[test]
    fn overlays_darken_as_oxygen_runs_out() {
        let profile = FeedbackProfile::default();
        let full = profile.evaluate(1.0);
        let empty = profile.evaluate(0.0);

        let full_alpha = FeedbackOverlay::Vignette.colour(&full).alpha();
        let empty_alpha = FeedbackOverlay::Vignette.colour(&empty).alpha();

        assert!(empty_alpha > full_alpha);
    }
}
