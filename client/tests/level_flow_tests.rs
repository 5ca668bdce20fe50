use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use common::Level;

use prototype::AppState;
use prototype::gameplay::controllers::scene_controller::{SceneControllerPlugin, transition_to};
use prototype::gameplay::runtime::registration::register_gameplay_runtime;
use prototype::gameplay::scenes::complete::CompleteScene;
use prototype::gameplay::scenes::playing::PlayingScene;
use prototype::input::PlayerInputPlugin;
use prototype::locomotion::{ActivePlayer, Player};
use prototype::settings::{GameSettings, SettingsPlugin, SettingsResource};
use prototype::volumes::LevelGoal;
use prototype::world::{CurrentLevel, LevelRequest, LevelRoot, LevelSun, WorldPlugin};

fn playing_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
        .insert_resource(SettingsResource::new(GameSettings::default()))
        .add_plugins((WorldPlugin, SettingsPlugin, PlayerInputPlugin))
        .init_state::<AppState>()
        .add_plugins(SceneControllerPlugin::<PlayingScene>::default())
        .add_plugins(SceneControllerPlugin::<CompleteScene>::default());
    register_gameplay_runtime(&mut app);
    app
}

fn update_times(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
    let mut query = world.query_filtered::<Entity, F>();
    query.iter(world).count()
}

fn current_level(app: &App) -> Option<Level> {
    app.world().resource::<CurrentLevel>().0
}

fn load(app: &mut App, level: Level) {
    app.world_mut().write_message(LevelRequest(level));
    update_times(app, 2);
}

#[test]
fn entering_playing_loads_a_level_with_one_active_player() {
    let mut app = playing_app();
    update_times(&mut app, 3);

    assert!(current_level(&app).is_some());
    assert_eq!(count::<With<Player>>(app.world_mut()), 1);
    assert_eq!(count::<With<LevelSun>>(app.world_mut()), 1);
    assert_eq!(count::<With<LevelGoal>>(app.world_mut()), 1);

    let active = app.world().resource::<ActivePlayer>().0;
    assert!(active.is_some());
}

#[test]
fn level_request_replaces_the_previous_level() {
    let mut app = playing_app();
    update_times(&mut app, 3);

    load(&mut app, Level::Hydroponics);

    assert_eq!(current_level(&app), Some(Level::Hydroponics));
    assert_eq!(count::<With<Player>>(app.world_mut()), 1);
    assert_eq!(count::<With<LevelSun>>(app.world_mut()), 1);

    let active = app.world().resource::<ActivePlayer>().0;
    let mut players = app.world_mut().query_filtered::<Entity, With<Player>>();
    let player = players.single(app.world()).expect("one player");
    assert_eq!(active, Some(player));
}

#[test]
fn reaching_a_goal_loads_the_next_level() {
    let mut app = playing_app();
    update_times(&mut app, 3);
    load(&mut app, Level::Airlock);

    step_player_into_goal(&mut app);
    update_times(&mut app, 3);

    assert_eq!(current_level(&app), Some(Level::Hydroponics));
    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Playing);
}

#[test]
fn final_goal_completes_the_game_and_clears_the_level() {
    let mut app = playing_app();
    update_times(&mut app, 3);
    load(&mut app, Level::Observatory);

    step_player_into_goal(&mut app);
    update_times(&mut app, 3);

    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Complete);
    assert_eq!(current_level(&app), None);
    assert_eq!(count::<With<LevelRoot>>(app.world_mut()), 0);

    transition_to(
        &mut app.world_mut().resource_mut::<NextState<AppState>>(),
        AppState::Playing,
    );
    update_times(&mut app, 3);

    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Playing);
    assert!(current_level(&app).is_some());
    assert_eq!(count::<With<Player>>(app.world_mut()), 1);
}

fn step_player_into_goal(app: &mut App) {
    let mut goals = app
        .world_mut()
        .query_filtered::<&Transform, With<LevelGoal>>();
    let goal = goals
        .single(app.world())
        .expect("level should have a goal")
        .translation;

    let mut players = app
        .world_mut()
        .query_filtered::<&mut Transform, With<Player>>();
    let mut player = players
        .single_mut(app.world_mut())
        .expect("level should have a player");
    player.translation = goal;
}
