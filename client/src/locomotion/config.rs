use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Walking speed in metres per second.
    pub default_speed: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub jump_disabled: bool,
    /// How far above the head a ceiling still cancels upward velocity.
    pub head_detection_range: f32,
    pub sprint_enabled: bool,
    pub sprint_multiplier: f32,
    pub stamina_drain_rate: f32,
    pub stamina_charge_rate: f32,
    /// Seconds taken to move between standing and crouched height.
    pub crouch_time: f32,
    pub crouch_multiplier: f32,
    pub body_height: f32,
    pub body_radius: f32,
    pub jump_clips: Vec<String>,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            default_speed: 4.0,
            gravity: 20.0,
            jump_force: 7.5,
            jump_disabled: false,
            head_detection_range: 0.1,
            sprint_enabled: true,
            sprint_multiplier: 2.0,
            stamina_drain_rate: 0.5,
            stamina_charge_rate: 0.7,
            crouch_time: 0.2,
            crouch_multiplier: 0.5,
            body_height: 1.8,
            body_radius: 0.35,
            jump_clips: vec![
                "audio/jump_01.ogg".to_string(),
                "audio/jump_02.ogg".to_string(),
            ],
        }
    }
}
