//! Prototype Level Definitions
//!
//! This crate defines the ordered level catalogue of the prototype and the
//! crafted-item keyword parser. Nothing in here depends on the engine.
//!
//! Enum discriminant values match the level file numbers
//! (`level_01.json`, `level_02.json`, ...) shipped under `assets/levels/`.

pub mod crafting;

/// Represents every playable level, in play order.
///
/// The ID values correspond to the level file numbers
/// (e.g. `Airlock = 1` matches `level_01.json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// level_01: Airlock - movement, crouch and the first oxygen zone
    Airlock = 1,

    /// level_02: Hydroponics - low gravity zones and pickups
    Hydroponics = 2,

    /// level_03: Observatory - long breath-holding traverse
    Observatory = 3,
}

impl Level {
    pub const ALL: &'static [Level] = &[Level::Airlock, Level::Hydroponics, Level::Observatory];

    /// Returns a human-readable name for the level
    pub fn name(&self) -> &'static str {
        match self {
            Level::Airlock => "Airlock",
            Level::Hydroponics => "Hydroponics",
            Level::Observatory => "Observatory",
        }
    }

    /// File name of the level definition inside `assets/levels/`.
    pub fn file_name(&self) -> String {
        format!("level_{:02}.json", *self as u8)
    }

    pub fn first() -> Level {
        Level::ALL[0]
    }

    /// The level that follows this one, or `None` after the final level.
    pub fn next(&self) -> Option<Level> {
        Level::from_id(*self as u8 + 1)
    }

    pub fn is_final(&self) -> bool {
        self.next().is_none()
    }

    pub fn from_id(id: u8) -> Option<Level> {
        match id {
            1 => Some(Level::Airlock),
            2 => Some(Level::Hydroponics),
            3 => Some(Level::Observatory),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
