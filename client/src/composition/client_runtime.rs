use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy_egui::EguiPlugin;

use crate::AppState;
use crate::app::plugins::{build_bevy_plugins, create_winit_settings};
use crate::gameplay::controllers::scene_controller::SceneControllerPlugin;
use crate::gameplay::runtime::registration::register_gameplay_runtime;
use crate::gameplay::scenes::complete::CompleteScene;
use crate::gameplay::scenes::playing::PlayingScene;
use crate::input::PlayerInputPlugin;
use crate::presentation::PresentationPlugin;
use crate::settings::{GameSettings, SettingsPlugin, SettingsResource};
use crate::world::WorldPlugin;

pub fn configure_client_app(app: &mut App, startup_settings: &GameSettings) {
    app.insert_resource(SettingsResource::new(startup_settings.clone()))
        .add_plugins(build_bevy_plugins(startup_settings))
        .insert_resource(create_winit_settings(startup_settings))
        .add_plugins(bevy::diagnostic::FrameTimeDiagnosticsPlugin::default())
        .add_plugins(EguiPlugin::default())
        .add_plugins(WorldPlugin)
        .add_plugins(SettingsPlugin)
        .add_plugins(PlayerInputPlugin)
        .add_plugins(PresentationPlugin)
        .init_state::<AppState>()
        .add_plugins(SceneControllerPlugin::<PlayingScene>::default())
        .add_plugins(SceneControllerPlugin::<CompleteScene>::default());

    register_gameplay_runtime(app);
}
