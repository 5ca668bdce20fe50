//! Completion scene shown after the final level goal.

use bevy::prelude::*;
use bevy::state::prelude::{OnEnter, OnExit};

use crate::gameplay::controllers::scene_controller::{SceneController, SceneId};

pub const FEEDBACK_URL: &str = "https://forms.gle/XoRZPWFpwxzbp8Ka9";

pub struct CompleteScene;

impl SceneController for CompleteScene {
    fn register(app: &mut App) {
        app.add_systems(OnEnter(crate::AppState::Complete), setup_complete_scene)
            .add_systems(OnExit(crate::AppState::Complete), cleanup_complete_scene);
    }

    fn scene_id() -> SceneId {
        SceneId::Complete
    }
}

#[derive(Component)]
pub struct CompleteSceneRoot;

fn setup_complete_scene(mut commands: Commands) {
    info!("All levels complete");
    commands.spawn((
        Name::new("Completion Camera"),
        CompleteSceneRoot,
        Camera2d,
    ));
}

fn cleanup_complete_scene(mut commands: Commands, roots: Query<Entity, With<CompleteSceneRoot>>) {
    for entity in &roots {
        commands.entity(entity).try_despawn();
    }
}
