pub mod feedback;
pub mod handler;
pub mod systems;

pub use feedback::{FeedbackCurve, FeedbackProfile, PostProcessParams};
pub use handler::{BreathTier, BreathingConfig, OxygenConfig, OxygenHandler, OxygenTick};
pub use systems::{
    OxygenAdded, OxygenDepleted, PlayerBreathed, play_breath_sounds, play_pickup_sounds,
    respawn_depleted_players, tick_oxygen,
};
