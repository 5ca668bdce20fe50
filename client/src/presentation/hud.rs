//! In-game HUD drawn with `bevy_ui`.

use bevy::prelude::*;
use bevy::state::prelude::{OnEnter, OnExit};

use crate::AppState;
use crate::gameplay::runtime::pipeline::GameplayPipelineSet;
use crate::interaction::{InteractionProbe, InteractionTarget, engaged_panel_text};
use crate::locomotion::{ActivePlayer, LocomotionController};
use crate::oxygen::OxygenHandler;

const BAR_WIDTH: f32 = 220.0;
const BAR_HEIGHT: f32 = 10.0;
const BAR_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);
const STAMINA_COLOUR: Color = Color::srgb(0.95, 0.8, 0.3);
const OXYGEN_COLOUR: Color = Color::srgb(0.35, 0.75, 1.0);
const TEXT_COLOUR: Color = Color::srgb(0.9, 0.95, 0.95);

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Playing), spawn_hud)
            .add_systems(OnExit(AppState::Playing), despawn_hud)
            .add_systems(
                Update,
                (update_status_bars, update_interaction_prompt, update_item_panel)
                    .in_set(GameplayPipelineSet::UiSync)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

#[derive(Component)]
pub struct HudRoot;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBar {
    Stamina,
    Oxygen,
}

#[derive(Component)]
pub struct InteractionPromptText;

#[derive(Component)]
pub struct ItemPanel;

#[derive(Component)]
pub struct ItemPanelText;

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Name::new("HUD"),
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
        ))
        .with_children(|root| {
            root.spawn((
                Name::new("Crosshair"),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(50.0),
                    top: Val::Percent(50.0),
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    margin: UiRect::new(Val::Px(-2.0), Val::ZERO, Val::Px(-2.0), Val::ZERO),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
            ));

            root.spawn((
                InteractionPromptText,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(TEXT_COLOUR),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(50.0),
                    top: Val::Percent(54.0),
                    ..default()
                },
            ));

            root.spawn((
                Name::new("Status Bars"),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(20.0),
                    bottom: Val::Px(20.0),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(6.0),
                    ..default()
                },
            ))
            .with_children(|bars| {
                spawn_status_bar(bars, StatusBar::Stamina, STAMINA_COLOUR);
                spawn_status_bar(bars, StatusBar::Oxygen, OXYGEN_COLOUR);
            });

            root.spawn((
                Name::new("Item Panel"),
                ItemPanel,
                Node {
                    position_type: PositionType::Absolute,
                    right: Val::Px(24.0),
                    top: Val::Px(24.0),
                    padding: UiRect::all(Val::Px(12.0)),
                    display: Display::None,
                    ..default()
                },
                BackgroundColor(Color::srgba(0.05, 0.05, 0.08, 0.8)),
            ))
            .with_children(|panel| {
                panel.spawn((
                    ItemPanelText,
                    Text::new(""),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOUR),
                ));
            });
        });
}

fn spawn_status_bar(parent: &mut ChildSpawnerCommands, bar: StatusBar, colour: Color) {
    parent
        .spawn((
            Node {
                width: Val::Px(BAR_WIDTH),
                height: Val::Px(BAR_HEIGHT),
                ..default()
            },
            BackgroundColor(BAR_BACKGROUND),
        ))
        .with_children(|track| {
            track.spawn((
                bar,
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(colour),
            ));
        });
}

fn despawn_hud(mut commands: Commands, roots: Query<Entity, With<HudRoot>>) {
    for entity in &roots {
        commands.entity(entity).try_despawn();
    }
}

/// Fill fraction shown by a status bar; empty while no player is active.
pub fn status_fraction(
    bar: StatusBar,
    controller: Option<&LocomotionController>,
    oxygen: Option<&OxygenHandler>,
) -> f32 {
    let value = match bar {
        StatusBar::Stamina => controller.map(LocomotionController::stamina),
        StatusBar::Oxygen => oxygen.map(OxygenHandler::level),
    };
    value.unwrap_or(0.0).clamp(0.0, 1.0)
}

fn update_status_bars(
    active: Res<ActivePlayer>,
    players: Query<(Option<&LocomotionController>, Option<&OxygenHandler>)>,
    mut bars: Query<(&StatusBar, &mut Node)>,
) {
    let (controller, oxygen) = active
        .0
        .and_then(|entity| players.get(entity).ok())
        .unwrap_or((None, None));

    for (bar, mut node) in &mut bars {
        let width = Val::Percent(status_fraction(*bar, controller, oxygen) * 100.0);
        if node.width != width {
            node.width = width;
        }
    }
}

fn update_interaction_prompt(
    probes: Query<&InteractionProbe>,
    targets: Query<&InteractionTarget>,
    mut prompts: Query<&mut Text, With<InteractionPromptText>>,
) {
    let prompt = probes
        .iter()
        .find_map(|probe| {
            if probe.engaged.is_some() {
                return Some("[E] Put down".to_string());
            }
            probe
                .hovered
                .and_then(|entity| targets.get(entity).ok())
                .map(|target| format!("[E] {}", target.0.label()))
        })
        .unwrap_or_default();

    for mut text in &mut prompts {
        if text.0 != prompt {
            text.0 = prompt.clone();
        }
    }
}

fn update_item_panel(
    probes: Query<&InteractionProbe>,
    targets: Query<&InteractionTarget>,
    mut panels: Query<&mut Node, With<ItemPanel>>,
    mut texts: Query<&mut Text, With<ItemPanelText>>,
) {
    let panel_text = probes
        .iter()
        .find_map(|probe| engaged_panel_text(probe, &targets));

    let display = if panel_text.is_some() {
        Display::Flex
    } else {
        Display::None
    };
    for mut node in &mut panels {
        if node.display != display {
            node.display = display;
        }
    }

    let Some(panel_text) = panel_text else {
        return;
    };
    for mut text in &mut texts {
        if text.0 != panel_text {
            text.0 = panel_text.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion::LocomotionConfig;
    use crate::oxygen::OxygenConfig;

    #[test]
    fn status_bars_read_the_active_player() {
        let controller = LocomotionController::new(LocomotionConfig::default(), 1.8);
        let oxygen = OxygenHandler::new(OxygenConfig::default());

        assert_eq!(
            status_fraction(StatusBar::Stamina, Some(&controller), Some(&oxygen)),
            1.0
        );
        assert_eq!(
            status_fraction(StatusBar::Oxygen, Some(&controller), Some(&oxygen)),
            1.0
        );
        assert_eq!(status_fraction(StatusBar::Oxygen, None, None), 0.0);
    }
}
