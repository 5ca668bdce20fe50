pub mod scene_controller;
pub mod world_controller;
