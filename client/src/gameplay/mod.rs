pub mod controllers;
pub mod runtime;
pub mod scenes;
