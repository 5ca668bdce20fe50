use bevy::prelude::*;

/// Per-frame gameplay stages, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum GameplayPipelineSet {
    Input,
    Triggers,
    Simulate,
    Move,
    Feedback,
    UiSync,
}
