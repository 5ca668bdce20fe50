use crate::app::state::{AppState, PauseState, game_is_running};
use crate::companion::{start_companions, steer_nav_agents, update_companions};
use crate::gameplay::runtime::pipeline::GameplayPipelineSet;
use crate::input::sample_player_input;
use crate::interaction::{Interacted, probe_interactions};
use crate::locomotion::{
    ActivePlayer, PlayerJumped, claim_active_player, drive_active_player, play_jump_sounds,
    release_active_player,
};
use crate::oxygen::{
    OxygenAdded, OxygenDepleted, PlayerBreathed, play_breath_sounds, play_pickup_sounds,
    respawn_depleted_players, tick_oxygen,
};
use crate::volumes::{
    VolumeEntered, VolumeExited, apply_gravity_zones, apply_oxygen_zones, apply_respawn_zones,
    collect_oxygen_pickups, detect_volume_occupancy, reach_level_goal,
};
use crate::world::{apply_mouse_look, sync_camera_eye_height};
use bevy::prelude::*;

pub fn register_gameplay_runtime(app: &mut App) {
    app.add_message::<PlayerJumped>()
        .add_message::<VolumeEntered>()
        .add_message::<VolumeExited>()
        .add_message::<OxygenDepleted>()
        .add_message::<PlayerBreathed>()
        .add_message::<OxygenAdded>()
        .add_message::<Interacted>()
        .init_resource::<ActivePlayer>()
        .init_resource::<PauseState>()
        .configure_sets(
            Update,
            (
                GameplayPipelineSet::Input,
                GameplayPipelineSet::Triggers,
                GameplayPipelineSet::Simulate,
                GameplayPipelineSet::Move,
                GameplayPipelineSet::Feedback,
                GameplayPipelineSet::UiSync,
            )
                .chain(),
        )
        .add_systems(
            Update,
            sample_player_input.in_set(GameplayPipelineSet::Input),
        )
        // Ownership of the player is tracked even while paused so a level
        // swap under the menu cannot leave a stale active entity.
        .add_systems(
            Update,
            (release_active_player, claim_active_player)
                .chain()
                .in_set(GameplayPipelineSet::Input)
                .after(sample_player_input),
        )
        .add_systems(
            Update,
            (
                detect_volume_occupancy,
                (
                    apply_gravity_zones,
                    apply_oxygen_zones,
                    collect_oxygen_pickups,
                    apply_respawn_zones,
                    reach_level_goal,
                ),
            )
                .chain()
                .in_set(GameplayPipelineSet::Triggers)
                .run_if(game_is_running),
        )
        .add_systems(
            Update,
            (
                (start_companions, update_companions).chain(),
                (tick_oxygen, respawn_depleted_players).chain(),
                probe_interactions,
            )
                .in_set(GameplayPipelineSet::Simulate)
                .run_if(game_is_running),
        )
        .add_systems(
            Update,
            (
                apply_mouse_look,
                drive_active_player,
                steer_nav_agents,
                sync_camera_eye_height,
            )
                .chain()
                .in_set(GameplayPipelineSet::Move)
                .run_if(game_is_running),
        )
        .add_systems(
            Update,
            (play_jump_sounds, play_breath_sounds, play_pickup_sounds)
                .in_set(GameplayPipelineSet::Feedback)
                .run_if(in_state(AppState::Playing)),
        );
}
