pub mod pipeline;
pub mod registration;
