pub mod assets;
pub mod persistence;
