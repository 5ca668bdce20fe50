use std::fs;
use std::path::{Path, PathBuf};

use common::Level;

use crate::world::definition::{LevelDefinition, LevelLoadError, decode_level_definition};

const LEVEL_DIRECTORY: &str = "levels";

pub fn default_asset_root_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../assets"))
}

pub fn level_path(asset_root: &Path, level: Level) -> PathBuf {
    asset_root.join(LEVEL_DIRECTORY).join(level.file_name())
}

pub fn load_level_definition(
    asset_root: &Path,
    level: Level,
) -> Result<LevelDefinition, LevelLoadError> {
    let path = level_path(asset_root, level);
    let display = path.display().to_string();
    let raw = fs::read_to_string(&path).map_err(|source| LevelLoadError::Read {
        path: display.clone(),
        source,
    })?;
    decode_level_definition(&display, &raw)
}
