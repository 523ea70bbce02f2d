//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types. Future control-panel widgets should
//! be added here via `draw_control_panel_ui`.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use maze_escape_core::{Difficulty, GameState};
use maze_escape_rendering::HudPresentation;

/// Outcome of rendering the control panel UI during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ControlPanelUiResult {
    /// Whether the start/reset button was pressed during this frame.
    pub start_pressed: bool,
    /// Difficulty button pressed during this frame, if any.
    pub difficulty_selected: Option<Difficulty>,
    /// New master volume when the slider moved during this frame.
    pub volume_selected: Option<f32>,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub background: Color,
    /// Session status shown by the panel labels and widgets.
    pub hud: HudPresentation,
}

/// Renders the control panel's interactive elements for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = ControlPanelUiResult::default();
    let mut volume = context.hud.volume;
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        ui.label(None, context.hud.timer_label().as_str());

        let state_label = match context.hud.game_state {
            GameState::NotStarted => "Pick a difficulty and start.",
            GameState::Playing => "Find the red goal cell.",
            GameState::Won => "Maze solved!",
        };
        ui.label(None, state_label);

        ui.label(None, "Difficulty");
        for difficulty in Difficulty::ALL {
            let marker = if difficulty == context.hud.difficulty {
                "> "
            } else {
                "  "
            };
            let label = format!("{marker}{}", difficulty.label());
            if ui.button(None, label.as_str()) {
                result.difficulty_selected = Some(difficulty);
            }
        }

        if ui.button(None, context.hud.start_button_label()) {
            result.start_pressed = true;
        }

        ui.slider(hash!("volume"), "Volume", 0.0..1.0, &mut volume);
    });

    ui.pop_skin();

    if (volume - context.hud.volume).abs() > f32::EPSILON {
        result.volume_selected = Some(volume.clamp(0.0, 1.0));
    }

    result
}
