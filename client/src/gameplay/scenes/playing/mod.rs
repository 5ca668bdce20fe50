//! Playing scene: owns the loaded level while the game is in progress.

use bevy::prelude::*;
use bevy::state::prelude::{OnEnter, OnExit};
use common::Level;

use crate::app::state::PauseState;
use crate::gameplay::controllers::scene_controller::{SceneController, SceneId};
use crate::gameplay::controllers::world_controller;
use crate::world::{CurrentLevel, LevelRequest, LevelRoot};

const START_LEVEL_ENV: &str = "PROTOTYPE_START_LEVEL";

pub struct PlayingScene;

impl SceneController for PlayingScene {
    fn register(app: &mut App) {
        app.init_resource::<PauseState>()
            .add_systems(OnEnter(crate::AppState::Playing), setup_playing_scene)
            .add_systems(OnExit(crate::AppState::Playing), cleanup_playing_scene);
    }

    fn scene_id() -> SceneId {
        SceneId::Playing
    }
}

/// Parses a level id override; unknown or malformed ids fall back to the first level.
pub fn parse_start_level(raw: Option<&str>) -> Level {
    let Some(raw_level) = raw else {
        return Level::first();
    };

    let trimmed = raw_level.trim();
    if let Some(level) = trimmed.parse::<u8>().ok().and_then(Level::from_id) {
        info!(
            "Using start level from {}: {} (ID: {})",
            START_LEVEL_ENV,
            level.name(),
            level as u8
        );
        return level;
    }

    warn!(
        "{}='{}' is not a valid level ID. Using default {} ({})",
        START_LEVEL_ENV,
        raw_level,
        Level::first().name(),
        Level::first() as u8
    );
    Level::first()
}

fn start_level() -> Level {
    parse_start_level(std::env::var(START_LEVEL_ENV).ok().as_deref())
}

fn setup_playing_scene(
    current_level: Res<CurrentLevel>,
    mut pause: ResMut<PauseState>,
    mut level_requests: MessageWriter<LevelRequest>,
) {
    pause.paused = false;
    if current_level.0.is_some() {
        return;
    }

    let level = start_level();
    info!("Setting up playing scene: {} (ID: {})", level.name(), level as u8);
    world_controller::request_level(&mut level_requests, level);
}

fn cleanup_playing_scene(
    mut commands: Commands,
    mut current_level: ResMut<CurrentLevel>,
    roots: Query<Entity, With<LevelRoot>>,
) {
    for entity in &roots {
        commands.entity(entity).try_despawn();
    }
    current_level.0 = None;
}
