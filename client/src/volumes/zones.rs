use bevy::prelude::*;

use super::trigger::{VolumeEntered, VolumeExited};
use crate::AppState;
use crate::locomotion::{LocomotionController, teleport_entity};
use crate::oxygen::{OxygenAdded, OxygenHandler};
use crate::physics::CharacterBody;
use crate::world::{CurrentLevel, LevelRequest};

/// Scales gravity and jump force while the player is inside.
#[derive(Component, Debug, Clone, Copy)]
pub struct GravityZone {
    /// Applies the modifiers on exit instead of on enter.
    pub invert: bool,
    pub gravity_modifier: f32,
    pub jump_force_modifier: f32,
}

impl Default for GravityZone {
    fn default() -> Self {
        Self {
            invert: false,
            gravity_modifier: 0.25,
            jump_force_modifier: 1.25,
        }
    }
}

impl GravityZone {
    fn modify(&self, controller: &mut LocomotionController) {
        let gravity = controller.gravity() * self.gravity_modifier;
        let jump_force = controller.jump_force() * self.jump_force_modifier;
        controller.modify_gravity(Some(gravity), Some(jump_force));
    }

    pub fn on_enter(&self, controller: &mut LocomotionController) {
        if self.invert {
            controller.modify_gravity(None, None);
        } else {
            self.modify(controller);
        }
    }

    pub fn on_exit(&self, controller: &mut LocomotionController) {
        if self.invert {
            self.modify(controller);
        } else {
            controller.modify_gravity(None, None);
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct OxygenZone {
    pub deplete: bool,
    pub respawn_point: Vec3,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct OxygenPickup {
    pub surplus: f32,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct RespawnZone {
    pub respawn_point: Vec3,
}

/// Level exit; reaching it loads the next level.
#[derive(Component, Debug, Clone, Default)]
pub struct LevelGoal {
    pub spawn_points: Vec<Vec3>,
}

pub fn apply_gravity_zones(
    mut entered: MessageReader<VolumeEntered>,
    mut exited: MessageReader<VolumeExited>,
    zones: Query<&GravityZone>,
    mut controllers: Query<&mut LocomotionController>,
) {
    for VolumeEntered { volume, entity } in entered.read() {
        let (Ok(zone), Ok(mut controller)) = (zones.get(*volume), controllers.get_mut(*entity))
        else {
            continue;
        };
        zone.on_enter(&mut controller);
        debug!(
            "Gravity zone entered; gravity {} jump force {}",
            controller.gravity(),
            controller.jump_force()
        );
    }

    for VolumeExited { volume, entity } in exited.read() {
        let (Ok(zone), Ok(mut controller)) = (zones.get(*volume), controllers.get_mut(*entity))
        else {
            continue;
        };
        zone.on_exit(&mut controller);
        debug!(
            "Gravity zone exited; gravity {} jump force {}",
            controller.gravity(),
            controller.jump_force()
        );
    }
}

pub fn apply_oxygen_zones(
    mut entered: MessageReader<VolumeEntered>,
    mut exited: MessageReader<VolumeExited>,
    zones: Query<&OxygenZone>,
    mut handlers: Query<&mut OxygenHandler>,
) {
    for VolumeEntered { volume, entity } in entered.read() {
        let (Ok(zone), Ok(mut oxygen)) = (zones.get(*volume), handlers.get_mut(*entity)) else {
            continue;
        };
        oxygen.set_depleting(zone.deplete);
        oxygen.set_respawn_point(zone.respawn_point);
        debug!("Oxygen zone entered; depleting {}", zone.deplete);
    }

    for VolumeExited { volume, entity } in exited.read() {
        let (Ok(zone), Ok(mut oxygen)) = (zones.get(*volume), handlers.get_mut(*entity)) else {
            continue;
        };
        oxygen.set_depleting(!zone.deplete);
    }
}

pub fn collect_oxygen_pickups(
    mut commands: Commands,
    mut entered: MessageReader<VolumeEntered>,
    pickups: Query<&OxygenPickup>,
    mut handlers: Query<&mut OxygenHandler>,
    mut added: MessageWriter<OxygenAdded>,
) {
    for VolumeEntered { volume, entity } in entered.read() {
        let (Ok(pickup), Ok(mut oxygen)) = (pickups.get(*volume), handlers.get_mut(*entity)) else {
            continue;
        };
        if oxygen.add_oxygen(pickup.surplus) {
            added.write(OxygenAdded { entity: *entity });
        }
        info!("Oxygen pickup collected (+{})", pickup.surplus);
        commands.entity(*volume).try_despawn();
    }
}

pub fn apply_respawn_zones(
    mut commands: Commands,
    mut entered: MessageReader<VolumeEntered>,
    zones: Query<&RespawnZone>,
    mut players: Query<(
        &mut LocomotionController,
        &mut Transform,
        Option<&mut CharacterBody>,
    )>,
) {
    for VolumeEntered { volume, entity } in entered.read() {
        let Ok(zone) = zones.get(*volume) else {
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
            zone.respawn_point,
        ) {
            info!("Player fell out of bounds; respawned at {}", zone.respawn_point);
        }
    }
}

pub fn reach_level_goal(
    mut commands: Commands,
    mut entered: MessageReader<VolumeEntered>,
    goals: Query<(), With<LevelGoal>>,
    current: Res<CurrentLevel>,
    mut requests: MessageWriter<LevelRequest>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(VolumeEntered { volume, .. }) = entered
        .read()
        .find(|message| goals.contains(message.volume))
    else {
        return;
    };
    commands.entity(*volume).try_despawn();

    match current.0.and_then(|level| level.next()) {
        Some(next) => {
            info!("Level goal reached; loading {}", next);
            requests.write(LevelRequest(next));
        }
        None => {
            info!("Final level goal reached");
            next_state.set(AppState::Complete);
        }
    }
}
