pub mod level_store;
