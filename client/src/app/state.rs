use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Playing,
    Complete,
}

/// Whether the pause menu currently holds the game.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseState {
    pub paused: bool,
}

pub fn game_is_running(state: Res<State<AppState>>, pause: Res<PauseState>) -> bool {
    matches!(state.get(), AppState::Playing) && !pause.paused
}
