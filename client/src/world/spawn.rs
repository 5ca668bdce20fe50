use bevy::post_process::dof::{DepthOfField, DepthOfFieldMode};
use bevy::prelude::*;
use bevy::render::view::ColorGrading;
use common::crafting::CraftedItem;
use rand::Rng;
use rand::seq::SliceRandom;

use super::LevelRoot;
use super::camera::FirstPersonCamera;
use super::definition::{LevelDefinition, vec3};
use super::visuals::LevelVisual;
use crate::companion::{CompanionBrain, FollowTarget, NavAgent};
use crate::interaction::{InspectItem, InteractionBounds, InteractionProbe, InteractionTarget};
use crate::locomotion::{LocomotionController, Player};
use crate::oxygen::OxygenHandler;
use crate::physics::{CharacterBody, StaticCollider};
use crate::settings::GameplaySettings;
use crate::volumes::{
    GravityZone, LevelGoal, OxygenPickup, OxygenZone, RespawnZone, TriggerVolume,
};

/// Directional light of the current level; shadow settings apply to it.
#[derive(Component, Debug, Default)]
pub struct LevelSun;

#[derive(Debug, Clone, Copy)]
pub struct SpawnedLevel {
    pub player: Entity,
    pub companion: Option<Entity>,
    pub goal: Option<Entity>,
}

const PLATFORM_COLOUR: Color = Color::srgb(0.42, 0.44, 0.48);
const GRAVITY_ZONE_COLOUR: Color = Color::srgba(0.3, 0.5, 1.0, 0.18);
const OXYGEN_ZONE_COLOUR: Color = Color::srgba(1.0, 0.35, 0.25, 0.12);
const SAFE_ZONE_COLOUR: Color = Color::srgba(0.3, 1.0, 0.5, 0.08);
const PICKUP_COLOUR: Color = Color::srgb(0.4, 0.9, 1.0);
const ITEM_COLOUR: Color = Color::srgb(0.95, 0.65, 0.2);
const GOAL_COLOUR: Color = Color::srgb(1.0, 0.85, 0.1);
const COMPANION_COLOUR: Color = Color::srgb(0.75, 0.4, 0.9);

const PICKUP_RADIUS: f32 = 0.3;
const ITEM_SIZE: f32 = 0.5;

pub fn spawn_level<R: Rng + ?Sized>(
    commands: &mut Commands,
    definition: &LevelDefinition,
    gameplay: &GameplaySettings,
    rng: &mut R,
) -> SpawnedLevel {
    commands.spawn((
        Name::new("Level Sun"),
        LevelRoot,
        LevelSun,
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    for platform in &definition.platforms {
        let size = vec3(platform.size);
        let colour = platform
            .colour
            .map(|[r, g, b]| Color::srgb(r, g, b))
            .unwrap_or(PLATFORM_COLOUR);
        commands.spawn((
            Name::new("Platform"),
            LevelRoot,
            StaticCollider {
                half_extents: size * 0.5,
            },
            LevelVisual::cuboid(size, colour),
            Transform::from_translation(vec3(platform.center)),
            Visibility::default(),
        ));
    }

    for zone in &definition.gravity_zones {
        let size = vec3(zone.size);
        commands.spawn((
            Name::new("Gravity Zone"),
            LevelRoot,
            TriggerVolume::new(size * 0.5),
            GravityZone {
                invert: zone.invert,
                gravity_modifier: zone.gravity_modifier,
                jump_force_modifier: zone.jump_force_modifier,
            },
            LevelVisual::cuboid(size, GRAVITY_ZONE_COLOUR),
            Transform::from_translation(vec3(zone.center)),
            Visibility::default(),
        ));
    }

    for zone in &definition.oxygen_zones {
        let size = vec3(zone.size);
        let colour = if zone.deplete {
            OXYGEN_ZONE_COLOUR
        } else {
            SAFE_ZONE_COLOUR
        };
        commands.spawn((
            Name::new("Oxygen Zone"),
            LevelRoot,
            TriggerVolume::new(size * 0.5),
            OxygenZone {
                deplete: zone.deplete,
                respawn_point: vec3(zone.respawn_point),
            },
            LevelVisual::cuboid(size, colour),
            Transform::from_translation(vec3(zone.center)),
            Visibility::default(),
        ));
    }

    for pickup in &definition.oxygen_pickups {
        commands.spawn((
            Name::new("Oxygen Pickup"),
            LevelRoot,
            TriggerVolume::new(Vec3::splat(PICKUP_RADIUS)),
            OxygenPickup {
                surplus: pickup.surplus,
            },
            LevelVisual::sphere(PICKUP_RADIUS, PICKUP_COLOUR),
            Transform::from_translation(vec3(pickup.position)),
            Visibility::default(),
        ));
    }

    for zone in &definition.respawn_zones {
        commands.spawn((
            Name::new("Respawn Zone"),
            LevelRoot,
            TriggerVolume::new(vec3(zone.size) * 0.5),
            RespawnZone {
                respawn_point: vec3(zone.respawn_point),
            },
            Transform::from_translation(vec3(zone.center)),
        ));
    }

    for item in &definition.items {
        let crafted = CraftedItem::from_name(item.name.clone(), rng);
        debug!("Crafted item parsed: {}", crafted.to_string().trim_end());
        let size = ITEM_SIZE * item.scale;
        commands.spawn((
            Name::new(item.name.clone()),
            LevelRoot,
            InteractionTarget(Box::new(InspectItem::new(crafted))),
            InteractionBounds {
                half_extents: Vec3::splat(size * 0.5),
            },
            LevelVisual::cuboid(Vec3::splat(size), ITEM_COLOUR),
            Transform::from_translation(vec3(item.position)),
            Visibility::default(),
        ));
    }

    let goal = definition.goal.as_ref().map(|goal| {
        let spawn_points: Vec<Vec3> = goal.spawn_points.iter().copied().map(vec3).collect();
        let position = match spawn_points.choose(rng) {
            Some(point) => *point,
            None => {
                warn!("Level goal has no spawn points; placing it at the origin");
                Vec3::ZERO
            }
        };
        let size = vec3(goal.size);
        commands
            .spawn((
                Name::new("Level Goal"),
                LevelRoot,
                TriggerVolume::new(size * 0.5),
                LevelGoal { spawn_points },
                LevelVisual::capsule(size.x * 0.5, (size.y - size.x).max(0.0), GOAL_COLOUR),
                Transform::from_translation(position),
                Visibility::default(),
            ))
            .id()
    });

    let player = spawn_player(commands, vec3(definition.player_start), gameplay);

    let companion = definition.companion_start.map(|start| {
        let start = vec3(start);
        commands
            .spawn((
                Name::new("Companion"),
                LevelRoot,
                CompanionBrain::new(gameplay.companion.clone()),
                FollowTarget(Some(player)),
                NavAgent::new(gameplay.nav_agent.clone(), start.y),
                LevelVisual::capsule(0.3, 0.8, COMPANION_COLOUR),
                Transform::from_translation(start),
                Visibility::default(),
            ))
            .id()
    });

    SpawnedLevel {
        player,
        companion,
        goal,
    }
}

fn spawn_player(commands: &mut Commands, start: Vec3, gameplay: &GameplaySettings) -> Entity {
    let locomotion = &gameplay.locomotion;
    let camera = FirstPersonCamera::default();
    let baseline = gameplay.oxygen.feedback.baseline;

    commands
        .spawn((
            Name::new("Player"),
            LevelRoot,
            Player,
            LocomotionController::new(locomotion.clone(), locomotion.body_height),
            CharacterBody::new(locomotion.body_height, locomotion.body_radius),
            OxygenHandler::new(gameplay.oxygen.clone()),
            Transform::from_translation(start),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("First Person Camera"),
                camera,
                Camera3d::default(),
                InteractionProbe::new(gameplay.interaction_distance),
                DepthOfField {
                    mode: DepthOfFieldMode::Gaussian,
                    focal_distance: baseline.focal_distance,
                    ..default()
                },
                ColorGrading::default(),
                Transform::from_xyz(0.0, camera.eye_height(locomotion.body_height), 0.0),
            ));
        })
        .id()
}
