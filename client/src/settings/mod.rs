use bevy::light::{CascadeShadowConfig, CascadeShadowConfigBuilder, DirectionalLightShadowMap};
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode, WindowResolution};
use bevy::winit::{UpdateMode, WinitSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::companion::{CompanionConfig, NavAgentConfig};
use crate::locomotion::LocomotionConfig;
use crate::oxygen::OxygenConfig;
use crate::world::LevelSun;

pub const SETTINGS_FILE_PATH: &str = "./settings.yaml";

const RESOLUTION_PRESETS: [ResolutionSetting; 4] = [
    ResolutionSetting {
        width: 1280,
        height: 720,
    },
    ResolutionSetting {
        width: 1600,
        height: 900,
    },
    ResolutionSetting {
        width: 1920,
        height: 1080,
    },
    ResolutionSetting {
        width: 2560,
        height: 1440,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowModeSetting {
    Windowed,
    Fullscreen,
}

impl Default for WindowModeSetting {
    fn default() -> Self {
        Self::Windowed
    }
}

impl WindowModeSetting {
    pub const ALL: [Self; 2] = [Self::Windowed, Self::Fullscreen];

    pub fn to_bevy(self) -> WindowMode {
        match self {
            Self::Windowed => WindowMode::Windowed,
            Self::Fullscreen => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windowed => "Windowed",
            Self::Fullscreen => "Fullscreen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowQualitySetting {
    Off,
    Low,
    High,
}

impl Default for ShadowQualitySetting {
    fn default() -> Self {
        Self::Low
    }
}

impl ShadowQualitySetting {
    pub const ALL: [Self; 3] = [Self::Off, Self::Low, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Low => "Low",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpsLimitSetting {
    Default60,
    Monitor,
    Unlimited,
}

impl Default for FpsLimitSetting {
    fn default() -> Self {
        Self::Default60
    }
}

impl FpsLimitSetting {
    pub const ALL: [Self; 3] = [Self::Default60, Self::Monitor, Self::Unlimited];

    pub fn to_update_mode(self) -> UpdateMode {
        match self {
            Self::Default60 => UpdateMode::reactive(Duration::from_secs_f64(1.0 / 60.0)),
            Self::Monitor | Self::Unlimited => UpdateMode::Continuous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default60 => "60 FPS",
            Self::Monitor => "Monitor",
            Self::Unlimited => "Unlimited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSetting {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionSetting {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ResolutionSetting {
    pub fn presets() -> &'static [Self] {
        &RESOLUTION_PRESETS
    }

    pub fn label(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub window_mode: WindowModeSetting,
    pub resolution: ResolutionSetting,
    pub shadow_quality: ShadowQualitySetting,
    pub vsync: bool,
    pub fps_limit: FpsLimitSetting,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeSetting::Windowed,
            resolution: ResolutionSetting::default(),
            shadow_quality: ShadowQualitySetting::Low,
            vsync: true,
            fps_limit: FpsLimitSetting::Default60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub effects_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            effects_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Radians of camera rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            invert_y: false,
        }
    }
}

/// Tunables handed to gameplay components when a level spawns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    pub locomotion: LocomotionConfig,
    pub companion: CompanionConfig,
    pub nav_agent: NavAgentConfig,
    pub oxygen: OxygenConfig,
    pub interaction_distance: f32,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            locomotion: LocomotionConfig::default(),
            companion: CompanionConfig::default(),
            nav_agent: NavAgentConfig::default(),
            oxygen: OxygenConfig::default(),
            interaction_distance: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub overlay: bool,
    pub gizmos: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            overlay: false,
            gizmos: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource, Default)]
#[serde(default)]
pub struct GameSettings {
    pub graphics: GraphicsSettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub gameplay: GameplaySettings,
    pub debug: DebugSettings,
}

#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file: {0}")]
    Read(std::io::Error),
    #[error("failed to write settings file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML settings: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML settings: {0}")]
    Serialize(serde_yaml::Error),
}

#[derive(Resource, Clone)]
pub struct SettingsResource {
    pub current: GameSettings,
    path: PathBuf,
}

impl SettingsResource {
    pub fn new(current: GameSettings) -> Self {
        Self {
            current,
            path: PathBuf::from(SETTINGS_FILE_PATH),
        }
    }

    pub fn save_to_disk(&self) -> Result<(), SettingsIoError> {
        write_settings_to_path(&self.current, &self.path)
    }
}

#[derive(Resource, Clone, Debug)]
pub struct AudioCategoryState {
    pub effects_enabled: bool,
}

impl Default for AudioCategoryState {
    fn default() -> Self {
        Self {
            effects_enabled: true,
        }
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AudioCategoryState>()
            .add_systems(Update, apply_runtime_settings);
    }
}

pub fn load_settings_or_default() -> GameSettings {
    let path = Path::new(SETTINGS_FILE_PATH);

    if !path.exists() {
        return GameSettings::default();
    }

    match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from '{}': {}. Falling back to defaults.",
                SETTINGS_FILE_PATH, error
            );
            GameSettings::default()
        }
    }
}

pub fn ensure_settings_file_exists(settings: &GameSettings) -> Result<(), SettingsIoError> {
    let path = Path::new(SETTINGS_FILE_PATH);
    if path.exists() {
        return Ok(());
    }

    write_settings_to_path(settings, path)
}

pub fn present_mode_for(graphics: &GraphicsSettings) -> PresentMode {
    if matches!(graphics.fps_limit, FpsLimitSetting::Unlimited) {
        PresentMode::AutoNoVsync
    } else if graphics.vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    }
}

pub fn decode_settings(raw: &str) -> Result<GameSettings, SettingsIoError> {
    serde_yaml::from_str::<GameSettings>(raw).map_err(SettingsIoError::Deserialize)
}

fn load_settings_from_path(path: &Path) -> Result<GameSettings, SettingsIoError> {
    let raw = fs::read_to_string(path).map_err(SettingsIoError::Read)?;
    decode_settings(&raw)
}

fn write_settings_to_path(settings: &GameSettings, path: &Path) -> Result<(), SettingsIoError> {
    let encoded = serde_yaml::to_string(settings).map_err(SettingsIoError::Serialize)?;
    fs::write(path, encoded).map_err(SettingsIoError::Write)
}

fn apply_runtime_settings(
    settings: Res<SettingsResource>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    winit_settings: Option<ResMut<WinitSettings>>,
    mut sun_query: Query<(&mut DirectionalLight, &mut CascadeShadowConfig), With<LevelSun>>,
    mut shadow_map: Option<ResMut<DirectionalLightShadowMap>>,
    added_sun_query: Query<(), Added<LevelSun>>,
    mut audio_categories: ResMut<AudioCategoryState>,
    mut last_applied: Local<Option<GameSettings>>,
) {
    let sun_spawned = !added_sun_query.is_empty();
    if last_applied.as_ref() == Some(&settings.current) && !sun_spawned {
        return;
    }

    if let Ok(mut window) = windows.single_mut() {
        let target_mode = settings.current.graphics.window_mode.to_bevy();
        window.mode = target_mode;

        // Borderless fullscreen keeps the monitor's native size.
        if matches!(target_mode, WindowMode::Windowed) {
            window.resolution = WindowResolution::new(
                settings.current.graphics.resolution.width,
                settings.current.graphics.resolution.height,
            );
        }

        window.present_mode = present_mode_for(&settings.current.graphics);
    }

    if let Some(mut winit_settings) = winit_settings {
        let update_mode = settings.current.graphics.fps_limit.to_update_mode();
        winit_settings.focused_mode = update_mode;
        winit_settings.unfocused_mode = update_mode;
    }

    apply_shadow_quality(
        settings.current.graphics.shadow_quality,
        &mut sun_query,
        shadow_map.as_deref_mut(),
    );

    audio_categories.effects_enabled = settings.current.audio.effects_enabled;

    *last_applied = Some(settings.current.clone());
}

fn apply_shadow_quality(
    mode: ShadowQualitySetting,
    sun_query: &mut Query<(&mut DirectionalLight, &mut CascadeShadowConfig), With<LevelSun>>,
    shadow_map: Option<&mut DirectionalLightShadowMap>,
) {
    let (enabled, map_size, num_cascades) = match mode {
        ShadowQualitySetting::Off => (false, 1024, 1),
        ShadowQualitySetting::Low => (true, 1024, 1),
        ShadowQualitySetting::High => (true, 4096, 2),
    };

    if let Some(map) = shadow_map {
        map.size = map_size;
    }

    for (mut light, mut cascade_config) in sun_query.iter_mut() {
        light.shadows_enabled = enabled;
        if enabled {
            *cascade_config = CascadeShadowConfigBuilder {
                num_cascades,
                minimum_distance: 0.1,
                maximum_distance: 80.0,
                first_cascade_far_bound: 20.0,
                overlap_proportion: 0.2,
            }
            .into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_sections() {
        let raw = "audio:\n  effects_enabled: false\ngameplay:\n  locomotion:\n    jump_force: 9.0\n";

        let settings = decode_settings(raw).expect("settings should decode");

        assert!(!settings.audio.effects_enabled);
        assert_eq!(settings.gameplay.locomotion.jump_force, 9.0);
        assert_eq!(
            settings.gameplay.locomotion.gravity,
            LocomotionConfig::default().gravity
        );
        assert_eq!(settings.graphics, GraphicsSettings::default());
        assert_eq!(settings.gameplay.companion, CompanionConfig::default());
    }

    #[test]
    fn malformed_yaml_is_a_decode_error() {
        let error = decode_settings("graphics: [1, 2").expect_err("decode should fail");
        assert!(matches!(error, SettingsIoError::Deserialize(_)));
    }

    #[test]
    fn unlimited_fps_disables_vsync() {
        let graphics = GraphicsSettings {
            fps_limit: FpsLimitSetting::Unlimited,
            vsync: true,
            ..GraphicsSettings::default()
        };
        assert_eq!(present_mode_for(&graphics), PresentMode::AutoNoVsync);
        assert_eq!(
            present_mode_for(&GraphicsSettings::default()),
            PresentMode::AutoVsync
        );
    }
}
