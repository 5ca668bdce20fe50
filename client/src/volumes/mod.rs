pub mod trigger;
pub mod zones;

pub use trigger::{TriggerVolume, VolumeEntered, VolumeExited, detect_volume_occupancy};
pub use zones::{
    GravityZone, LevelGoal, OxygenPickup, OxygenZone, RespawnZone, apply_gravity_zones,
    apply_oxygen_zones, apply_respawn_zones, collect_oxygen_pickups, reach_level_goal,
};
