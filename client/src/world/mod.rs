use std::path::PathBuf;

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use common::Level;

use crate::gameplay::runtime::pipeline::GameplayPipelineSet;
use crate::infra::assets::level_store;
use crate::settings::SettingsResource;

pub mod camera;
pub mod definition;
pub mod spawn;
pub mod visuals;

pub use camera::{FirstPersonCamera, apply_mouse_look, sync_camera_eye_height};
pub use definition::{LevelDefinition, LevelLoadError};
pub use spawn::{LevelSun, spawn_level};
pub use visuals::{LevelVisual, VisualShape, attach_level_visuals};

/// Asks the world to replace the current level.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRequest(pub Level);

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReady(pub Level);

/// Tags every entity that belongs to the loaded level.
#[derive(Component, Debug, Default)]
pub struct LevelRoot;

#[derive(Resource, Debug, Default)]
pub struct CurrentLevel(pub Option<Level>);

/// Where level files are read from.
#[derive(Resource, Debug, Clone)]
pub struct LevelCatalogue {
    pub asset_root: PathBuf,
}

impl Default for LevelCatalogue {
    fn default() -> Self {
        Self {
            asset_root: level_store::default_asset_root_path(),
        }
    }
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLevel>()
            .init_resource::<LevelCatalogue>()
            .add_message::<LevelRequest>()
            .add_message::<LevelReady>()
            .insert_resource(GlobalAmbientLight {
                color: Color::WHITE,
                brightness: 300.0,
                affects_lightmapped_meshes: true,
            })
            .add_systems(
                Update,
                (process_level_requests, attach_level_visuals)
                    .chain()
                    .before(GameplayPipelineSet::Input),
            );
    }
}

fn process_level_requests(
    mut commands: Commands,
    mut current_level: ResMut<CurrentLevel>,
    mut requests: MessageReader<LevelRequest>,
    mut ready_writer: MessageWriter<LevelReady>,
    catalogue: Res<LevelCatalogue>,
    settings: Res<SettingsResource>,
    roots: Query<Entity, With<LevelRoot>>,
) {
    // Only the newest request matters when several arrive in one frame.
    let Some(LevelRequest(level)) = requests.read().last().copied() else {
        return;
    };

    for entity in &roots {
        commands.entity(entity).try_despawn();
    }

    let definition = match level_store::load_level_definition(&catalogue.asset_root, level) {
        Ok(definition) => definition,
        Err(error) => {
            warn!("{error}; spawning an empty {level}");
            LevelDefinition::fallback(level.name())
        }
    };

    info!("Spawning level: {} (ID: {})", level.name(), level as u8);
    spawn_level(
        &mut commands,
        &definition,
        &settings.current.gameplay,
        &mut rand::thread_rng(),
    );
    current_level.0 = Some(level);
    ready_writer.write(LevelReady(level));
}
