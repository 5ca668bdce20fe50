pub mod complete;
pub mod playing;
