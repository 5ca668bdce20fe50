use bevy::prelude::*;

pub mod debug;
pub mod hud;
pub mod menu;
pub mod post_process;

/// HUD, menus, debug overlay and oxygen screen feedback. Expects
/// `EguiPlugin` to be installed by the app composition.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            hud::HudPlugin,
            menu::MenuPlugin,
            debug::DebugOverlayPlugin,
            post_process::OxygenFeedbackPlugin,
        ));
    }
}
