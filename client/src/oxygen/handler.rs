use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::feedback::FeedbackProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreathTier {
    Normal,
    Deep,
    Heavy,
    Laboured,
}

impl BreathTier {
    /// Tier whose band contains `oxygen`. Bands are `(lower, upper]` except
    /// the laboured band, which also includes zero.
    pub fn for_level(oxygen: f32) -> Option<BreathTier> {
        match oxygen {
            level if level > 0.7 && level <= 1.0 => Some(BreathTier::Normal),
            level if level > 0.4 && level <= 0.7 => Some(BreathTier::Deep),
            level if level > 0.15 && level <= 0.4 => Some(BreathTier::Heavy),
            level if (0.0..=0.15).contains(&level) => Some(BreathTier::Laboured),
            _ => None,
        }
    }
}

impl fmt::Display for BreathTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BreathTier::Normal => "normal",
            BreathTier::Deep => "deep",
            BreathTier::Heavy => "heavy",
            BreathTier::Laboured => "laboured",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    pub normal_interval: f32,
    pub deep_interval: f32,
    pub heavy_interval: f32,
    pub laboured_interval: f32,
    pub normal_clips: Vec<String>,
    pub deep_clips: Vec<String>,
    pub heavy_clips: Vec<String>,
    pub laboured_clips: Vec<String>,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            normal_interval: 1.5,
            deep_interval: 1.0,
            heavy_interval: 0.8,
            laboured_interval: 0.5,
            normal_clips: vec!["audio/breath_normal_01.ogg".to_string()],
            deep_clips: vec!["audio/breath_deep_01.ogg".to_string()],
            heavy_clips: vec!["audio/breath_heavy_01.ogg".to_string()],
            laboured_clips: vec!["audio/breath_laboured_01.ogg".to_string()],
        }
    }
}

impl BreathingConfig {
    pub fn interval(&self, tier: BreathTier) -> f32 {
        match tier {
            BreathTier::Normal => self.normal_interval,
            BreathTier::Deep => self.deep_interval,
            BreathTier::Heavy => self.heavy_interval,
            BreathTier::Laboured => self.laboured_interval,
        }
    }

    pub fn clips(&self, tier: BreathTier) -> &[String] {
        match tier {
            BreathTier::Normal => &self.normal_clips,
            BreathTier::Deep => &self.deep_clips,
            BreathTier::Heavy => &self.heavy_clips,
            BreathTier::Laboured => &self.laboured_clips,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OxygenConfig {
    /// Fraction lost per second while depleting.
    pub depletion_rate: f32,
    /// Fraction regained per second otherwise.
    pub recharge_rate: f32,
    pub breathing: BreathingConfig,
    pub pickup_clip: String,
    pub feedback: FeedbackProfile,
}

impl Default for OxygenConfig {
    fn default() -> Self {
        Self {
            depletion_rate: 0.08,
            recharge_rate: 0.25,
            breathing: BreathingConfig::default(),
            pickup_clip: "audio/oxygen_pickup.ogg".to_string(),
            feedback: FeedbackProfile::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OxygenTick {
    /// Oxygen hit zero during this tick.
    pub depleted: bool,
    pub breath: Option<BreathTier>,
    pub level_changed: bool,
}

/// Player oxygen reserve and breathing cadence.
#[derive(Component, Debug, Clone)]
pub struct OxygenHandler {
    config: OxygenConfig,
    level: f32,
    depleting: bool,
    breath_timer: f32,
    respawn_point: Option<Vec3>,
}

impl OxygenHandler {
    pub fn new(config: OxygenConfig) -> Self {
        let breath_timer = config.breathing.normal_interval;
        Self {
            config,
            level: 1.0,
            depleting: false,
            breath_timer,
            respawn_point: None,
        }
    }

    pub fn config(&self) -> &OxygenConfig {
        &self.config
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_depleting(&self) -> bool {
        self.depleting
    }

    pub fn respawn_point(&self) -> Option<Vec3> {
        self.respawn_point
    }

    pub fn set_depleting(&mut self, depleting: bool) {
        self.depleting = depleting;
    }

    pub fn set_respawn_point(&mut self, point: Vec3) {
        self.respawn_point = Some(point);
    }

    /// Returns whether any oxygen was added.
    pub fn add_oxygen(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        self.level = (self.level + amount).min(1.0);
        true
    }

    pub fn tick(&mut self, dt: f32) -> OxygenTick {
        let mut report = OxygenTick::default();

        if self.depleting {
            if self.level > 0.0 {
                self.level -= self.config.depletion_rate * dt;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    report.depleted = true;
                }
                report.level_changed = true;
            }
        } else if self.level < 1.0 {
            self.level = (self.level + self.config.recharge_rate * dt).min(1.0);
            report.level_changed = true;
        }

        self.breath_timer += dt;
        if let Some(tier) = BreathTier::for_level(self.level) {
            if self.breath_timer >= self.config.breathing.interval(tier) {
                self.breath_timer = 0.0;
                report.breath = Some(tier);
            }
        }

        report
    }
}
