use bevy::math::bounding::Aabb3d;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::locomotion::{Deactivated, Player};
use crate::physics::{CharacterBody, penetrates};

/// Box that reports the player body entering and leaving it.
#[derive(Component, Debug, Clone, Default)]
pub struct TriggerVolume {
    pub half_extents: Vec3,
    occupants: HashSet<Entity>,
}

impl TriggerVolume {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            occupants: HashSet::default(),
        }
    }

    pub fn bounds(&self, center: Vec3) -> Aabb3d {
        Aabb3d::new(center, self.half_extents)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.occupants.contains(&entity)
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeEntered {
    pub volume: Entity,
    pub entity: Entity,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeExited {
    pub volume: Entity,
    pub entity: Entity,
}

pub fn detect_volume_occupancy(
    mut volumes: Query<(Entity, &Transform, &mut TriggerVolume)>,
    players: Query<(Entity, &Transform, &CharacterBody), (With<Player>, Without<Deactivated>)>,
    mut entered: MessageWriter<VolumeEntered>,
    mut exited: MessageWriter<VolumeExited>,
) {
    for (volume, volume_transform, mut trigger) in &mut volumes {
        let bounds = trigger.bounds(volume_transform.translation);

        for (entity, transform, body) in &players {
            let inside = penetrates(&body.bounds(transform.translation), &bounds);
            let was_inside = trigger.contains(entity);

            if inside && !was_inside {
                trigger.occupants.insert(entity);
                entered.write(VolumeEntered { volume, entity });
            } else if !inside && was_inside {
                trigger.occupants.remove(&entity);
                exited.write(VolumeExited { volume, entity });
            }
        }

        if trigger
            .occupants
            .iter()
            .any(|occupant| !players.contains(*occupant))
        {
            trigger
                .occupants
                .retain(|occupant| players.contains(*occupant));
        }
    }
}
