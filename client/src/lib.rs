#![allow(
    private_interfaces,
    clippy::collapsible_if,
    clippy::derivable_impls,
    clippy::needless_update,
    clippy::too_many_arguments,
    clippy::type_complexity
)]

pub mod app;
pub mod companion;
pub mod composition;
pub mod gameplay;
pub mod infra;
pub mod input;
pub mod interaction;
pub mod locomotion;
pub mod oxygen;
pub mod physics;
pub mod presentation;
pub mod settings;
pub mod volumes;
pub mod world;

pub use app::state::AppState;
