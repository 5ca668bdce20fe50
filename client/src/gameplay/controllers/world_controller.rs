use bevy::prelude::MessageWriter;
use common::Level;

use crate::world::LevelRequest;

pub fn request_level(level_requests: &mut MessageWriter<LevelRequest>, level: Level) {
    level_requests.write(LevelRequest(level));
}
