use bevy::prelude::*;
use rand::seq::SliceRandom;

use super::handler::{BreathTier, OxygenHandler};
use crate::locomotion::{Deactivated, LocomotionController, teleport_entity};
use crate::physics::CharacterBody;
use crate::settings::AudioCategoryState;

#[derive(Message, Debug, Clone, Copy)]
pub struct OxygenDepleted {
    pub entity: Entity,
    pub respawn_point: Option<Vec3>,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerBreathed {
    pub entity: Entity,
    pub tier: BreathTier,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct OxygenAdded {
    pub entity: Entity,
}

pub fn tick_oxygen(
    time: Res<Time>,
    mut handlers: Query<(Entity, &mut OxygenHandler), Without<Deactivated>>,
    mut depleted: MessageWriter<OxygenDepleted>,
    mut breathed: MessageWriter<PlayerBreathed>,
) {
    let dt = time.delta_secs();
    for (entity, mut oxygen) in &mut handlers {
        let report = oxygen.tick(dt);
        if report.depleted {
            info!("Oxygen depleted for {:?}", entity);
            depleted.write(OxygenDepleted {
                entity,
                respawn_point: oxygen.respawn_point(),
            });
        }
        if let Some(tier) = report.breath {
            breathed.write(PlayerBreathed { entity, tier });
        }
    }
}

pub fn respawn_depleted_players(
    mut commands: Commands,
    mut depleted: MessageReader<OxygenDepleted>,
    mut players: Query<(
        &mut LocomotionController,
        &mut Transform,
        Option<&mut CharacterBody>,
    )>,
) {
    for OxygenDepleted {
        entity,
        respawn_point,
    } in depleted.read()
    {
        let Some(point) = respawn_point else {
            warn!("No respawn point registered for {:?}; staying in place", entity);
            continue;
        };
        let Ok((mut controller, mut transform, body)) = players.get_mut(*entity) else {
            continue;
        };
        if teleport_entity(
            &mut commands,
            *entity,
            &mut controller,
            &mut transform,
            body.map(|body| body.into_inner()),
            *point,
        ) {
            info!("Respawned {:?} at {}", entity, point);
        }
    }
}

fn play_random_clip(
    commands: &mut Commands,
    asset_server: &AssetServer,
    clips: &[String],
) {
    let Some(clip) = clips.choose(&mut rand::thread_rng()) else {
        return;
    };
    commands.spawn((
        AudioPlayer::new(asset_server.load::<AudioSource>(clip.clone())),
        PlaybackSettings::DESPAWN,
    ));
}

pub fn play_breath_sounds(
    mut commands: Commands,
    mut breathed: MessageReader<PlayerBreathed>,
    handlers: Query<&OxygenHandler>,
    audio: Res<AudioCategoryState>,
    asset_server: Option<Res<AssetServer>>,
) {
    let Some(asset_server) = asset_server else {
        breathed.clear();
        return;
    };
    for PlayerBreathed { entity, tier } in breathed.read() {
        if !audio.effects_enabled {
            continue;
        }
        let Ok(oxygen) = handlers.get(*entity) else {
            continue;
        };
        play_random_clip(&mut commands, &asset_server, oxygen.config().breathing.clips(*tier));
    }
}

pub fn play_pickup_sounds(
    mut commands: Commands,
    mut added: MessageReader<OxygenAdded>,
    handlers: Query<&OxygenHandler>,
    audio: Res<AudioCategoryState>,
    asset_server: Option<Res<AssetServer>>,
) {
    let Some(asset_server) = asset_server else {
        added.clear();
        return;
    };
    for OxygenAdded { entity } in added.read() {
        if !audio.effects_enabled {
            continue;
        }
        let Ok(oxygen) = handlers.get(*entity) else {
            continue;
        };
        play_random_clip(
            &mut commands,
            &asset_server,
            std::slice::from_ref(&oxygen.config().pickup_clip),
        );
    }
}
