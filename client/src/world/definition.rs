use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read level file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to decode level file '{path}': {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

fn one() -> f32 {
    1.0
}

fn default_gravity_modifier() -> f32 {
    0.25
}

fn default_jump_force_modifier() -> f32 {
    1.25
}

fn default_surplus() -> f32 {
    0.25
}

fn default_goal_size() -> [f32; 3] {
    [1.0, 2.0, 1.0]
}

pub fn vec3(value: [f32; 3]) -> Vec3 {
    Vec3::from_array(value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDefinition {
    pub center: [f32; 3],
    pub size: [f32; 3],
    #[serde(default)]
    pub colour: Option<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityZoneDefinition {
    pub center: [f32; 3],
    pub size: [f32; 3],
    #[serde(default)]
    pub invert: bool,
    #[serde(default = "default_gravity_modifier")]
    pub gravity_modifier: f32,
    #[serde(default = "default_jump_force_modifier")]
    pub jump_force_modifier: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxygenZoneDefinition {
    pub center: [f32; 3],
    pub size: [f32; 3],
    #[serde(default)]
    pub deplete: bool,
    pub respawn_point: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxygenPickupDefinition {
    pub position: [f32; 3],
    #[serde(default = "default_surplus")]
    pub surplus: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespawnZoneDefinition {
    pub center: [f32; 3],
    pub size: [f32; 3],
    pub respawn_point: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftedItemDefinition {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default = "one")]
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDefinition {
    #[serde(default = "default_goal_size")]
    pub size: [f32; 3],
    pub spawn_points: Vec<[f32; 3]>,
}

/// A hand-authored level layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub player_start: [f32; 3],
    #[serde(default)]
    pub companion_start: Option<[f32; 3]>,
    #[serde(default)]
    pub platforms: Vec<PlatformDefinition>,
    #[serde(default)]
    pub gravity_zones: Vec<GravityZoneDefinition>,
    #[serde(default)]
    pub oxygen_zones: Vec<OxygenZoneDefinition>,
    #[serde(default)]
    pub oxygen_pickups: Vec<OxygenPickupDefinition>,
    #[serde(default)]
    pub respawn_zones: Vec<RespawnZoneDefinition>,
    #[serde(default)]
    pub items: Vec<CraftedItemDefinition>,
    #[serde(default)]
    pub goal: Option<GoalDefinition>,
}

impl LevelDefinition {
    /// Floor-only layout used when a level file cannot be loaded.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player_start: [0.0, 1.0, 0.0],
            companion_start: None,
            platforms: vec![PlatformDefinition {
                center: [0.0, -0.5, 0.0],
                size: [40.0, 1.0, 40.0],
                colour: None,
            }],
            gravity_zones: Vec::new(),
            oxygen_zones: Vec::new(),
            oxygen_pickups: Vec::new(),
            respawn_zones: Vec::new(),
            items: Vec::new(),
            goal: None,
        }
    }
}

pub fn decode_level_definition(path: &str, raw: &str) -> Result<LevelDefinition, LevelLoadError> {
    serde_json::from_str(raw).map_err(|source| LevelLoadError::Decode {
        path: path.to_string(),
        source,
    })
}
