use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::AppState;
use crate::app::state::PauseState;
use crate::gameplay::controllers::scene_controller::transition_to;
use crate::gameplay::runtime::pipeline::GameplayPipelineSet;
use crate::gameplay::scenes::complete::FEEDBACK_URL;
use crate::infra::persistence::settings_store;
use crate::input::InputBindings;
use crate::locomotion::{ActivePlayer, LocomotionController};
use crate::settings::{
    self, FpsLimitSetting, GameSettings, ResolutionSetting, SettingsResource,
    ShadowQualitySetting, WindowModeSetting,
};

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuUiState>()
            .add_systems(
                Update,
                toggle_pause_with_escape
                    .in_set(GameplayPipelineSet::Input)
                    .run_if(in_state(AppState::Playing)),
            )
            .add_systems(Update, sync_cursor_grab)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    draw_pause_menu.run_if(in_state(AppState::Playing)),
                    draw_completion_screen.run_if(in_state(AppState::Complete)),
                ),
            );
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum SettingsTab {
    #[default]
    Graphics,
    Audio,
    Controls,
}

#[derive(Resource, Default)]
struct MenuUiState {
    tab: SettingsTab,
    draft: GameSettings,
}

/// Pauses or resumes the game and freezes the active controller with it.
/// Returns whether the pause flag changed.
pub fn set_paused(
    pause: &mut PauseState,
    paused: bool,
    controller: Option<&mut LocomotionController>,
) -> bool {
    if pause.paused == paused {
        return false;
    }
    pause.paused = paused;
    if let Some(controller) = controller {
        controller.set_movement_enabled(!paused);
    }
    info!("Game {}", if paused { "paused" } else { "resumed" });
    true
}

fn toggle_pause_with_escape(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<InputBindings>,
    active: Res<ActivePlayer>,
    settings_resource: Res<SettingsResource>,
    mut pause: ResMut<PauseState>,
    mut menu_state: ResMut<MenuUiState>,
    mut controllers: Query<&mut LocomotionController>,
) {
    let Some(keys) = keys else {
        return;
    };
    if !keys.just_pressed(bindings.pause) {
        return;
    }

    let paused = !pause.paused;
    if paused {
        menu_state.draft = settings_resource.current.clone();
        menu_state.tab = SettingsTab::Graphics;
    }
    let controller = active
        .0
        .and_then(|entity| controllers.get_mut(entity).ok())
        .map(Mut::into_inner);
    set_paused(&mut pause, paused, controller);
}

fn sync_cursor_grab(
    state: Res<State<AppState>>,
    pause: Option<Res<PauseState>>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let captured = matches!(state.get(), AppState::Playing)
        && !pause.is_some_and(|pause| pause.paused);
    let grab_mode = if captured {
        CursorGrabMode::Locked
    } else {
        CursorGrabMode::None
    };

    for mut cursor in &mut cursors {
        if cursor.grab_mode != grab_mode {
            cursor.grab_mode = grab_mode;
            cursor.visible = !captured;
        }
    }
}

fn apply_prototype_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(14);
    style.visuals.window_corner_radius = egui::CornerRadius::same(12);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(8);
    ctx.set_style(style);
}

fn draw_pause_menu(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<MenuUiState>,
    mut settings_resource: ResMut<SettingsResource>,
    active: Res<ActivePlayer>,
    mut pause: ResMut<PauseState>,
    mut controllers: Query<&mut LocomotionController>,
    mut exit: MessageWriter<AppExit>,
    mut theme_initialized: Local<bool>,
) {
    if !pause.paused {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    if !*theme_initialized {
        apply_prototype_theme(ctx);
        *theme_initialized = true;
    }

    let mut should_resume = false;
    let mut should_save = false;
    let mut should_quit = false;

    egui::Window::new("Paused")
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .default_width(520.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut menu_state.tab, SettingsTab::Graphics, "Graphics");
                ui.selectable_value(&mut menu_state.tab, SettingsTab::Audio, "Audio");
                ui.selectable_value(&mut menu_state.tab, SettingsTab::Controls, "Controls");
            });
            ui.separator();

            let tab = menu_state.tab;
            let draft = &mut menu_state.draft;
            match tab {
                SettingsTab::Graphics => draw_graphics_settings_tab(ui, draft),
                SettingsTab::Audio => draw_audio_settings_tab(ui, draft),
                SettingsTab::Controls => draw_controls_settings_tab(ui, draft),
            }

            ui.separator();
            ui.horizontal(|ui| {
                should_quit = ui
                    .add(egui::Button::new("Quit").fill(egui::Color32::from_rgb(121, 42, 42)))
                    .clicked();

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    should_resume = ui.button("Resume").clicked();
                    should_save = ui.button("Save").clicked();
                });
            });
        });

    if should_save {
        settings_resource.current = menu_state.draft.clone();
        if let Err(error) = settings_store::save(&settings_resource) {
            warn!(
                "Failed to save settings file '{}': {}",
                settings::SETTINGS_FILE_PATH,
                error
            );
        }
    }

    if should_resume {
        menu_state.draft = settings_resource.current.clone();
        let controller = active
            .0
            .and_then(|entity| controllers.get_mut(entity).ok())
            .map(Mut::into_inner);
        set_paused(&mut pause, false, controller);
    }

    if should_quit {
        exit.write(AppExit::Success);
    }
}

fn draw_graphics_settings_tab(ui: &mut egui::Ui, draft: &mut GameSettings) {
    egui::ComboBox::from_label("Window mode")
        .selected_text(draft.graphics.window_mode.label())
        .show_ui(ui, |ui| {
            for option in WindowModeSetting::ALL {
                ui.selectable_value(&mut draft.graphics.window_mode, option, option.label());
            }
        });

    egui::ComboBox::from_label("Resolution")
        .selected_text(draft.graphics.resolution.label())
        .show_ui(ui, |ui| {
            for option in ResolutionSetting::presets() {
                ui.selectable_value(&mut draft.graphics.resolution, *option, option.label());
            }
        });

    egui::ComboBox::from_label("Shadows")
        .selected_text(draft.graphics.shadow_quality.label())
        .show_ui(ui, |ui| {
            for option in ShadowQualitySetting::ALL {
                ui.selectable_value(&mut draft.graphics.shadow_quality, option, option.label());
            }
        });

    egui::ComboBox::from_label("FPS limit")
        .selected_text(draft.graphics.fps_limit.label())
        .show_ui(ui, |ui| {
            for option in FpsLimitSetting::ALL {
                ui.selectable_value(&mut draft.graphics.fps_limit, option, option.label());
            }
        });

    ui.checkbox(&mut draft.graphics.vsync, "VSync");
}

fn draw_audio_settings_tab(ui: &mut egui::Ui, draft: &mut GameSettings) {
    ui.checkbox(&mut draft.audio.effects_enabled, "Sound effects");
}

fn draw_controls_settings_tab(ui: &mut egui::Ui, draft: &mut GameSettings) {
    ui.add(
        egui::Slider::new(&mut draft.controls.mouse_sensitivity, 0.0005..=0.01)
            .logarithmic(true)
            .text("Mouse sensitivity"),
    );
    ui.checkbox(&mut draft.controls.invert_y, "Invert Y");
    ui.checkbox(&mut draft.debug.gizmos, "Debug gizmos");
}

fn draw_completion_screen(
    mut contexts: EguiContexts,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: MessageWriter<AppExit>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Window::new("Complete")
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, -30.0))
        .collapsible(false)
        .resizable(false)
        .movable(false)
        .title_bar(false)
        .default_width(420.0)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Thanks for playing!");
                ui.label("You reached the end of the prototype.");
                ui.add_space(6.0);
                ui.hyperlink_to("Share your feedback", FEEDBACK_URL);
                ui.add_space(10.0);

                if ui
                    .add_sized(egui::vec2(240.0, 34.0), egui::Button::new("Play again"))
                    .clicked()
                {
                    transition_to(&mut next_state, AppState::Playing);
                }
                if ui
                    .add_sized(egui::vec2(240.0, 34.0), egui::Button::new("Quit"))
                    .clicked()
                {
                    exit.write(AppExit::Success);
                }
            });
        });
}
