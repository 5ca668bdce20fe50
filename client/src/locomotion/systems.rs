use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;
use rand::seq::SliceRandom;

use super::controller::{LocomotionController, MovementBasis};
use super::mover::BodyMover;
use crate::input::PlayerInput;
use crate::physics::{CharacterBody, StaticCollider};
use crate::settings::AudioCategoryState;

/// Marks the player character; trigger volumes only react to this entity.
#[derive(Component, Debug, Default)]
pub struct Player;

/// A locomotion controller that lost the race for [`ActivePlayer`].
#[derive(Component, Debug)]
pub struct Deactivated;

/// The one controller allowed to apply movement this session.
#[derive(Resource, Debug, Default)]
pub struct ActivePlayer(pub Option<Entity>);

#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerJumped {
    pub entity: Entity,
}

pub type ColliderQuery<'w, 's> = Query<'w, 's, (&'static Transform, &'static StaticCollider)>;

pub fn collider_bounds(colliders: &ColliderQuery) -> Vec<Aabb3d> {
    colliders
        .iter()
        .map(|(transform, collider)| collider.bounds(transform.translation))
        .collect()
}

pub fn claim_active_player(
    mut commands: Commands,
    mut active: ResMut<ActivePlayer>,
    added: Query<Entity, Added<LocomotionController>>,
    controllers: Query<(), (With<LocomotionController>, Without<Deactivated>)>,
    children: Query<&Children>,
    mut cameras: Query<&mut Camera>,
) {
    for entity in &added {
        match active.0 {
            Some(current) if current != entity && controllers.contains(current) => {
                warn!(
                    "Locomotion controller {:?} spawned while {:?} is active; deactivating it",
                    entity, current
                );
                commands
                    .entity(entity)
                    .insert((Deactivated, Visibility::Hidden));
                for child in children.iter_descendants(entity) {
                    if let Ok(mut camera) = cameras.get_mut(child) {
                        camera.is_active = false;
                        commands.entity(child).insert(Deactivated);
                    }
                }
            }
            _ => {
                debug!("Locomotion controller {:?} is now the active player", entity);
                active.0 = Some(entity);
            }
        }
    }
}

pub fn release_active_player(
    mut active: ResMut<ActivePlayer>,
    mut removed: RemovedComponents<LocomotionController>,
) {
    for entity in removed.read() {
        if active.0 == Some(entity) {
            active.0 = None;
        }
    }
}

pub fn drive_active_player(
    time: Res<Time>,
    input: Res<PlayerInput>,
    active: Res<ActivePlayer>,
    colliders: ColliderQuery,
    mut players: Query<
        (
            &mut Transform,
            &mut LocomotionController,
            Option<&mut CharacterBody>,
        ),
        (Without<Deactivated>, Without<StaticCollider>),
    >,
    mut jumped: MessageWriter<PlayerJumped>,
) {
    let Some(entity) = active.0 else {
        return;
    };
    let Ok((mut transform, mut controller, body)) = players.get_mut(entity) else {
        return;
    };

    let bounds = collider_bounds(&colliders);
    let basis = MovementBasis::from_transform(&transform);
    let dt = time.delta_secs();

    let report = match body {
        Some(mut body) => {
            let mut mover = BodyMover::new(&mut transform, &mut body, &bounds);
            controller.tick(Some(&mut mover), &input.movement, basis, dt)
        }
        None => controller.tick(None, &input.movement, basis, dt),
    };

    if report.jumped {
        jumped.write(PlayerJumped { entity });
    }
    if report.sprint_exhausted {
        debug!("Stamina exhausted; sprint released");
    }
}

/// Teleports `entity` through its controller, unparenting it when asked to.
pub fn teleport_entity(
    commands: &mut Commands,
    entity: Entity,
    controller: &mut LocomotionController,
    transform: &mut Transform,
    body: Option<&mut CharacterBody>,
    position: Vec3,
) -> bool {
    let Some(body) = body else {
        return controller.teleport(None, position);
    };

    let mut mover = BodyMover::new(transform, body, &[]);
    let teleported = controller.teleport(Some(&mut mover), position);
    if mover.detach_requested() {
        commands.entity(entity).remove::<ChildOf>();
    }
    teleported
}

pub fn play_jump_sounds(
    mut commands: Commands,
    mut jumped: MessageReader<PlayerJumped>,
    controllers: Query<&LocomotionController>,
    audio: Res<AudioCategoryState>,
    asset_server: Option<Res<AssetServer>>,
) {
    let Some(asset_server) = asset_server else {
        jumped.clear();
        return;
    };
    for PlayerJumped { entity } in jumped.read() {
        if !audio.effects_enabled {
            continue;
        }
        let Ok(controller) = controllers.get(*entity) else {
            continue;
        };
        let Some(clip) = controller
            .config()
            .jump_clips
            .choose(&mut rand::thread_rng())
        else {
            continue;
        };

        commands.spawn((
            AudioPlayer::new(asset_server.load::<AudioSource>(clip.clone())),
            PlaybackSettings::DESPAWN,
        ));
    }
}
