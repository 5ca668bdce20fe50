use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::{PathAgent, rotate_towards};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanionMode {
    Idle,
    Follow,
}

impl fmt::Display for CompanionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanionMode::Idle => write!(f, "Idle"),
            CompanionMode::Follow => write!(f, "Follow"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    pub follow_distance: f32,
    /// Half angle of the view cone, in degrees.
    pub line_of_sight: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub offset_upper_depth: f32,
    pub offset_lower_depth: f32,
    pub offset_rate: f32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            follow_distance: 2.5,
            line_of_sight: 45.0,
            rotation_speed: 90.0,
            offset_upper_depth: 1.5,
            offset_lower_depth: 1.25,
            offset_rate: 0.5,
        }
    }
}

const RETURN_TO_IDLE_FACTOR: f32 = 0.9;

/// Two-state follow/idle behaviour of the companion.
///
/// The brain owns no engine state: the companion transform, the target
/// position and the path agent are handed in on every call, and any of the
/// optional collaborators may be missing without the brain failing.
#[derive(Component, Debug, Clone)]
pub struct CompanionBrain {
    config: CompanionConfig,
    mode: Option<CompanionMode>,
    missing_agent_logged: bool,
}

impl CompanionBrain {
    pub fn new(config: CompanionConfig) -> Self {
        Self {
            config,
            mode: None,
            missing_agent_logged: false,
        }
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    pub fn mode(&self) -> Option<CompanionMode> {
        self.mode
    }

    /// Enters the initial state.
    pub fn start(&mut self, target: Option<Vec3>, mut agent: Option<&mut dyn PathAgent>) {
        if self.mode.is_none() {
            self.transition(CompanionMode::Idle, target, &mut agent);
        }
    }

    /// Leaves the current state and enters `next`, following redirects from
    /// enter hooks until a state accepts.
    pub fn set_state(
        &mut self,
        next: CompanionMode,
        target: Option<Vec3>,
        mut agent: Option<&mut dyn PathAgent>,
    ) {
        self.transition(next, target, &mut agent);
    }

    pub fn update(
        &mut self,
        transform: &mut Transform,
        target: Option<Vec3>,
        mut agent: Option<&mut dyn PathAgent>,
        dt: f32,
    ) {
        if self.mode.is_none() {
            self.transition(CompanionMode::Idle, target, &mut agent);
        }
        let Some(target_position) = target else {
            return;
        };

        let distance = transform.translation.distance(target_position);
        let depth = target_position.z - transform.translation.z;

        match self.mode {
            Some(CompanionMode::Idle) => {
                if !self.target_in_view(transform, Some(target_position)) {
                    self.turn_towards(transform, target_position, dt);
                }
                self.adjust_offset(&mut agent, depth, -1.0, dt);

                if distance > self.config.follow_distance {
                    if agent.is_some() {
                        self.transition(CompanionMode::Follow, target, &mut agent);
                    } else {
                        self.warn_missing_agent();
                    }
                }
            }
            Some(CompanionMode::Follow) => {
                self.adjust_offset(&mut agent, depth, 1.0, dt);

                if distance <= self.config.follow_distance * RETURN_TO_IDLE_FACTOR {
                    self.transition(CompanionMode::Idle, target, &mut agent);
                } else if let Some(agent) = agent.as_mut() {
                    agent.set_destination(target_position);
                }
            }
            None => {}
        }
    }

    /// Distance to the target, or zero without one.
    pub fn distance_to(&self, transform: &Transform, target: Option<Vec3>) -> f32 {
        target.map_or(0.0, |target| transform.translation.distance(target))
    }

    /// Whether the target lies within the symmetric view cone.
    pub fn target_in_view(&self, transform: &Transform, target: Option<Vec3>) -> bool {
        let Some(target) = target else {
            return false;
        };
        let angle = planar_angle(transform, target);
        (-self.config.line_of_sight..=self.config.line_of_sight).contains(&angle)
    }

    fn transition(
        &mut self,
        next: CompanionMode,
        target: Option<Vec3>,
        agent: &mut Option<&mut dyn PathAgent>,
    ) {
        let mut pending = Some(next);
        while let Some(mode) = pending.take() {
            if let Some(current) = self.mode {
                self.exit(current, agent);
            }
            debug!("Companion entering {mode}");
            self.mode = Some(mode);
            pending = self.enter(mode, target, agent);
        }
    }

    fn enter(
        &mut self,
        mode: CompanionMode,
        target: Option<Vec3>,
        agent: &mut Option<&mut dyn PathAgent>,
    ) -> Option<CompanionMode> {
        match mode {
            CompanionMode::Idle => {
                if let Some(agent) = agent.as_mut() {
                    agent.set_stopped(true);
                }
                None
            }
            CompanionMode::Follow => {
                let Some(target) = target else {
                    return Some(CompanionMode::Idle);
                };
                if let Some(agent) = agent.as_mut() {
                    agent.set_stopped(false);
                    agent.set_destination(target);
                }
                None
            }
        }
    }

    fn exit(&mut self, mode: CompanionMode, agent: &mut Option<&mut dyn PathAgent>) {
        if mode == CompanionMode::Idle {
            if let Some(agent) = agent.as_mut() {
                agent.set_stopped(false);
            }
        }
    }

    /// `direction` is +1 when a deep target should raise the agent.
    fn adjust_offset(
        &self,
        agent: &mut Option<&mut dyn PathAgent>,
        depth: f32,
        direction: f32,
        dt: f32,
    ) {
        let Some(agent) = agent.as_mut() else {
            return;
        };
        let step = self.config.offset_rate * dt;
        if depth > self.config.offset_upper_depth {
            agent.set_base_offset(agent.base_offset() + step * direction);
        } else if depth < self.config.offset_lower_depth {
            agent.set_base_offset(agent.base_offset() - step * direction);
        }
    }

    fn turn_towards(&self, transform: &mut Transform, target: Vec3, dt: f32) {
        let planar = Vec3::new(
            target.x - transform.translation.x,
            0.0,
            target.z - transform.translation.z,
        );
        let Ok(direction) = Dir3::new(planar) else {
            return;
        };
        let facing = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
        let max_turn = self.config.rotation_speed.to_radians() * dt;
        transform.rotation = rotate_towards(transform.rotation, facing, max_turn);
    }

    fn warn_missing_agent(&mut self) {
        if self.missing_agent_logged {
            return;
        }
        self.missing_agent_logged = true;
        warn!("Companion has no path agent; it will stay idle");
    }
}

/// Signed yaw in degrees from the transform's forward to the target.
fn planar_angle(transform: &Transform, target: Vec3) -> f32 {
    let forward = transform.forward();
    let to_target = target - transform.translation;
    let cross = forward.x * to_target.z - forward.z * to_target.x;
    let dot = forward.x * to_target.x + forward.z * to_target.z;
    cross.atan2(dot).to_degrees()
}
