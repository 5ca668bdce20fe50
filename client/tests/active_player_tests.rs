use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy::time::TimeUpdateStrategy;

use prototype::AppState;
use prototype::gameplay::runtime::registration::register_gameplay_runtime;
use prototype::input::PlayerInputPlugin;
use prototype::locomotion::{ActivePlayer, Deactivated, LocomotionConfig, LocomotionController};
use prototype::oxygen::{OxygenConfig, OxygenHandler};
use prototype::settings::{GameSettings, SettingsPlugin, SettingsResource};
use prototype::world::WorldPlugin;

fn gameplay_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
        .insert_resource(SettingsResource::new(GameSettings::default()))
        .add_plugins((WorldPlugin, SettingsPlugin, PlayerInputPlugin))
        .init_state::<AppState>();
    register_gameplay_runtime(&mut app);
    app
}

fn spawn_controller(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            LocomotionController::new(LocomotionConfig::default(), 1.8),
            Transform::default(),
            Visibility::default(),
        ))
        .id()
}

#[test]
fn first_controller_becomes_the_active_player() {
    let mut app = gameplay_app();
    let first = spawn_controller(&mut app);
    app.update();

    assert_eq!(app.world().resource::<ActivePlayer>().0, Some(first));
    assert!(app.world().get::<Deactivated>(first).is_none());
}

#[test]
fn duplicate_controller_is_deactivated_and_hidden() {
    let mut app = gameplay_app();
    let first = spawn_controller(&mut app);
    app.update();

    let second = spawn_controller(&mut app);
    app.update();

    assert_eq!(app.world().resource::<ActivePlayer>().0, Some(first));
    assert!(app.world().get::<Deactivated>(second).is_some());
    assert_eq!(
        app.world().get::<Visibility>(second),
        Some(&Visibility::Hidden)
    );
}

#[test]
fn despawning_the_active_player_frees_the_slot() {
    let mut app = gameplay_app();
    let first = spawn_controller(&mut app);
    app.update();

    app.world_mut().despawn(first);
    app.update();
    assert_eq!(app.world().resource::<ActivePlayer>().0, None);

    let replacement = spawn_controller(&mut app);
    app.update();
    assert_eq!(app.world().resource::<ActivePlayer>().0, Some(replacement));
    assert!(app.world().get::<Deactivated>(replacement).is_none());
}

#[test]
fn duplicate_player_stops_rendering_and_breathing() {
    let mut app = gameplay_app();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    spawn_controller(&mut app);
    app.update();

    let mut oxygen = OxygenHandler::new(OxygenConfig::default());
    oxygen.set_depleting(true);
    let mut camera = Entity::PLACEHOLDER;
    let duplicate = app
        .world_mut()
        .spawn((
            LocomotionController::new(LocomotionConfig::default(), 1.8),
            oxygen,
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            camera = parent.spawn((Camera::default(), Transform::default())).id();
        })
        .id();

    app.update();
    let settled = app
        .world()
        .get::<OxygenHandler>(duplicate)
        .map(OxygenHandler::level);
    assert!(settled.is_some());
    for _ in 0..5 {
        app.update();
    }

    assert!(app.world().get::<Deactivated>(duplicate).is_some());
    assert!(app.world().get::<Deactivated>(camera).is_some());
    assert_eq!(app.world().get::<Camera>(camera).map(|camera| camera.is_active), Some(false));
    assert_eq!(
        app.world().get::<OxygenHandler>(duplicate).map(OxygenHandler::level),
        settled
    );
}
