pub mod config;
pub mod controller;
pub mod mover;
pub mod systems;

pub use config::LocomotionConfig;
pub use controller::{
    ButtonSample, CrouchTransition, LocomotionController, LocomotionState, MovementBasis,
    MovementInput, TickReport,
};
pub use mover::{BodyMover, Mover};
pub use systems::{
    ActivePlayer, ColliderQuery, Deactivated, Player, PlayerJumped, claim_active_player,
    collider_bounds, drive_active_player, play_jump_sounds, release_active_player,
    teleport_entity,
};
