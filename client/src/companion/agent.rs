use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Path-following capability consumed by the companion state machine.
pub trait PathAgent {
    fn set_destination(&mut self, destination: Vec3);
    fn destination(&self) -> Option<Vec3>;
    fn is_stopped(&self) -> bool;
    fn set_stopped(&mut self, stopped: bool);
    /// Vertical offset of the agent above its ground height.
    fn base_offset(&self) -> f32;
    fn set_base_offset(&mut self, offset: f32);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavAgentConfig {
    pub speed: f32,
    pub stopping_distance: f32,
    /// Degrees per second while turning to face the travel direction.
    pub angular_speed: f32,
    pub min_base_offset: f32,
    pub max_base_offset: f32,
}

impl Default for NavAgentConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 0.5,
            angular_speed: 360.0,
            min_base_offset: -0.25,
            max_base_offset: 1.0,
        }
    }
}

/// Straight-line steering agent; levels are open rooms so no mesh is needed.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    pub config: NavAgentConfig,
    pub ground_height: f32,
    destination: Option<Vec3>,
    stopped: bool,
    base_offset: f32,
}

impl NavAgent {
    pub fn new(config: NavAgentConfig, ground_height: f32) -> Self {
        Self {
            config,
            ground_height,
            destination: None,
            stopped: true,
            base_offset: 0.0,
        }
    }
}

impl PathAgent for NavAgent {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn base_offset(&self) -> f32 {
        self.base_offset
    }

    fn set_base_offset(&mut self, offset: f32) {
        self.base_offset = offset.clamp(self.config.min_base_offset, self.config.max_base_offset);
    }
}

/// Advances `transform` one step along the agent's path.
pub fn steer(transform: &mut Transform, agent: &NavAgent, dt: f32) {
    transform.translation.y = agent.ground_height + agent.base_offset;

    if agent.stopped {
        return;
    }
    let Some(destination) = agent.destination else {
        return;
    };

    let planar = Vec3::new(
        destination.x - transform.translation.x,
        0.0,
        destination.z - transform.translation.z,
    );
    let distance = planar.length();
    if distance <= agent.config.stopping_distance {
        return;
    }

    let direction = planar / distance;
    let step = (agent.config.speed * dt).min(distance - agent.config.stopping_distance);
    transform.translation += direction * step;

    let facing = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
    let max_turn = agent.config.angular_speed.to_radians() * dt;
    transform.rotation = rotate_towards(transform.rotation, facing, max_turn);
}

/// Rotates `from` toward `to` by at most `max_angle` radians.
pub fn rotate_towards(from: Quat, to: Quat, max_angle: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_angle || angle <= f32::EPSILON {
        return to;
    }
    from.slerp(to, max_angle / angle)
}

pub fn steer_nav_agents(time: Res<Time>, mut agents: Query<(&mut Transform, &NavAgent)>) {
    let dt = time.delta_secs();
    for (mut transform, agent) in &mut agents {
        steer(&mut transform, agent, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_agent_holds_position() {
        let mut agent = NavAgent::new(NavAgentConfig::default(), 0.0);
        agent.set_destination(Vec3::new(10.0, 0.0, 0.0));
        let mut transform = Transform::default();

        steer(&mut transform, &agent, 1.0);

        assert_eq!(transform.translation, Vec3::ZERO);
    }

    #[test]
    fn moving_agent_halts_at_stopping_distance() {
        let mut agent = NavAgent::new(NavAgentConfig::default(), 0.0);
        agent.set_destination(Vec3::new(2.0, 0.0, 0.0));
        agent.set_stopped(false);
        let mut transform = Transform::default();

        for _ in 0..10 {
            steer(&mut transform, &agent, 0.5);
        }

        assert!((transform.translation.x - 1.5).abs() < 1e-5);
    }

    #[test]
    fn base_offset_is_clamped_and_lifts_the_agent() {
        let mut agent = NavAgent::new(NavAgentConfig::default(), 1.0);
        agent.set_base_offset(5.0);
        assert_eq!(agent.base_offset(), agent.config.max_base_offset);

        let mut transform = Transform::default();
        steer(&mut transform, &agent, 0.1);
        assert_eq!(transform.translation.y, 1.0 + agent.config.max_base_offset);
    }

    #[test]
    fn rotate_towards_respects_step() {
        let from = Quat::IDENTITY;
        let to = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        let partial = rotate_towards(from, to, 0.1);
        assert!((from.angle_between(partial) - 0.1).abs() < 1e-4);
        assert_eq!(rotate_towards(from, to, 10.0), to);
    }
}
