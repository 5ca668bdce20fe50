use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy::time::TimeUpdateStrategy;

use prototype::AppState;
use prototype::gameplay::runtime::pipeline::GameplayPipelineSet;
use prototype::gameplay::runtime::registration::register_gameplay_runtime;
use prototype::input::PlayerInputPlugin;
use prototype::locomotion::{LocomotionConfig, LocomotionController, Player};
use prototype::oxygen::{OxygenAdded, OxygenConfig, OxygenHandler};
use prototype::physics::CharacterBody;
use prototype::settings::{GameSettings, SettingsPlugin, SettingsResource};
use prototype::volumes::{
    GravityZone, OxygenPickup, OxygenZone, RespawnZone, TriggerVolume, VolumeEntered,
    VolumeExited,
};
use prototype::world::WorldPlugin;

#[derive(Resource, Default)]
struct Seen {
    entered: Vec<VolumeEntered>,
    exited: Vec<VolumeExited>,
    oxygen_added: usize,
}

fn record_messages(
    mut seen: ResMut<Seen>,
    mut entered: MessageReader<VolumeEntered>,
    mut exited: MessageReader<VolumeExited>,
    mut added: MessageReader<OxygenAdded>,
) {
    seen.entered.extend(entered.read().copied());
    seen.exited.extend(exited.read().copied());
    seen.oxygen_added += added.read().count();
}

fn volume_app(frame: Duration) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(frame))
        .insert_resource(SettingsResource::new(GameSettings::default()))
        .add_plugins((WorldPlugin, SettingsPlugin, PlayerInputPlugin))
        .init_state::<AppState>()
        .init_resource::<Seen>()
        .add_systems(Update, record_messages.after(GameplayPipelineSet::Triggers));
    register_gameplay_runtime(&mut app);
    app
}

fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            LocomotionController::new(LocomotionConfig::default(), 1.8),
            CharacterBody::new(1.8, 0.35),
            OxygenHandler::new(OxygenConfig::default()),
            Transform::from_translation(position),
        ))
        .id()
}

fn move_player(app: &mut App, player: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation = position;
    }
}

fn spawn_volume(app: &mut App, center: Vec3, half_extents: Vec3, effect: impl Bundle) -> Entity {
    app.world_mut()
        .spawn((
            TriggerVolume::new(half_extents),
            Transform::from_translation(center),
            effect,
        ))
        .id()
}

const OUTSIDE: Vec3 = Vec3::new(50.0, 1.0, 50.0);

#[test]
fn enter_and_exit_fire_once_per_transition() {
    let mut app = volume_app(Duration::ZERO);
    let volume = spawn_volume(&mut app, Vec3::ZERO, Vec3::splat(2.0), GravityZone::default());
    let player = spawn_player(&mut app, OUTSIDE);
    app.update();

    move_player(&mut app, player, Vec3::new(0.0, 1.0, 0.0));
    for _ in 0..4 {
        app.update();
    }
    move_player(&mut app, player, OUTSIDE);
    for _ in 0..4 {
        app.update();
    }

    let seen = app.world().resource::<Seen>();
    assert_eq!(seen.entered, vec![VolumeEntered { volume, entity: player }]);
    assert_eq!(seen.exited, vec![VolumeExited { volume, entity: player }]);
}

#[test]
fn gravity_zone_scales_and_restores_the_controller() {
    let mut app = volume_app(Duration::ZERO);
    spawn_volume(&mut app, Vec3::ZERO, Vec3::splat(2.0), GravityZone::default());
    let player = spawn_player(&mut app, OUTSIDE);
    app.update();

    let (gravity, jump_force) = {
        let controller = app.world().get::<LocomotionController>(player).unwrap();
        (controller.gravity(), controller.jump_force())
    };

    move_player(&mut app, player, Vec3::new(0.0, 1.0, 0.0));
    app.update();
    {
        let controller = app.world().get::<LocomotionController>(player).unwrap();
        assert!((controller.gravity() - gravity * 0.25).abs() < 1e-5);
        assert!((controller.jump_force() - jump_force * 1.25).abs() < 1e-5);
    }

    move_player(&mut app, player, OUTSIDE);
    app.update();
    let controller = app.world().get::<LocomotionController>(player).unwrap();
    assert_eq!(controller.gravity(), gravity);
    assert_eq!(controller.jump_force(), jump_force);
}

#[test]
fn oxygen_zone_toggles_depletion_and_records_respawn_point() {
    let mut app = volume_app(Duration::ZERO);
    let respawn_point = Vec3::new(3.0, 1.0, 3.0);
    spawn_volume(
        &mut app,
        Vec3::ZERO,
        Vec3::splat(2.0),
        OxygenZone {
            deplete: true,
            respawn_point,
        },
    );
    let player = spawn_player(&mut app, OUTSIDE);
    app.update();

    move_player(&mut app, player, Vec3::new(0.0, 1.0, 0.0));
    app.update();
    {
        let oxygen = app.world().get::<OxygenHandler>(player).unwrap();
        assert!(oxygen.is_depleting());
        assert_eq!(oxygen.respawn_point(), Some(respawn_point));
    }

    move_player(&mut app, player, OUTSIDE);
    app.update();
    let oxygen = app.world().get::<OxygenHandler>(player).unwrap();
    assert!(!oxygen.is_depleting());
}

#[test]
fn oxygen_pickup_refills_and_disappears() {
    let mut app = volume_app(Duration::ZERO);
    let pickup = spawn_volume(
        &mut app,
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::splat(0.3),
        OxygenPickup { surplus: 0.25 },
    );
    let player = spawn_player(&mut app, OUTSIDE);
    app.update();

    let before = {
        let mut oxygen = app.world_mut().get_mut::<OxygenHandler>(player).unwrap();
        oxygen.set_depleting(true);
        oxygen.tick(5.0);
        oxygen.set_depleting(false);
        oxygen.level()
    };
    assert!(before < 0.75);

    move_player(&mut app, player, Vec3::new(0.0, 1.0, 0.0));
    app.update();

    let oxygen = app.world().get::<OxygenHandler>(player).unwrap();
    assert!((oxygen.level() - (before + 0.25)).abs() < 1e-5);
    assert!(app.world().get_entity(pickup).is_err());
    assert_eq!(app.world().resource::<Seen>().oxygen_added, 1);
}

#[test]
fn respawn_zone_teleports_the_player() {
    let mut app = volume_app(Duration::ZERO);
    let respawn_point = Vec3::new(4.0, 1.0, -2.0);
    spawn_volume(
        &mut app,
        Vec3::new(0.0, -20.0, 0.0),
        Vec3::new(100.0, 1.0, 100.0),
        RespawnZone { respawn_point },
    );
    let player = spawn_player(&mut app, OUTSIDE);
    app.update();

    move_player(&mut app, player, Vec3::new(0.0, -20.0, 0.0));
    app.update();

    let transform = app.world().get::<Transform>(player).unwrap();
    assert_eq!(transform.translation, respawn_point);
}

#[test]
fn running_out_of_oxygen_respawns_at_the_last_zone_point() {
    let mut app = volume_app(Duration::from_millis(100));
    let player = spawn_player(&mut app, OUTSIDE);
    let respawn_point = Vec3::new(5.0, 1.0, 5.0);
    {
        let mut oxygen = app.world_mut().get_mut::<OxygenHandler>(player).unwrap();
        oxygen.set_respawn_point(respawn_point);
        oxygen.set_depleting(true);
        // Leaves a sliver that one 100 ms frame of depletion finishes off.
        oxygen.tick(12.45);
        assert!(oxygen.level() > 0.0);
    }

    app.update();
    app.update();

    let transform = app.world().get::<Transform>(player).unwrap();
    assert_eq!(transform.translation.x, respawn_point.x);
    assert_eq!(transform.translation.z, respawn_point.z);
    assert!((transform.translation.y - respawn_point.y).abs() < 1.0);
}
