pub mod agent;
pub mod brain;
pub mod systems;

pub use agent::{NavAgent, NavAgentConfig, PathAgent, rotate_towards, steer, steer_nav_agents};
pub use brain::{CompanionBrain, CompanionConfig, CompanionMode};
pub use systems::{FollowTarget, start_companions, update_companions};
