//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use neon_snake_core::Direction;

use crate::ControlPanelAction;

/// Outcome of rendering the control panel UI during the current frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Buttons pressed during this frame, in layout order.
    pub(crate) actions: Vec<ControlPanelAction>,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub(crate) background: Color,
    /// Current score shown at the top of the panel.
    pub(crate) score_label: String,
    /// Best score loaded from storage.
    pub(crate) best_label: String,
    /// Caption of the speed button.
    pub(crate) speed_label: String,
    /// Caption of the mode button.
    pub(crate) mode_label: String,
}

/// Renders the control panel's labels and buttons for the current frame.
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
        .color(Color::from_rgba(18, 44, 58, 255))
        .color_hovered(Color::from_rgba(124, 92, 255, 255))
        .color_clicked(Color::from_rgba(0, 245, 160, 255))
        .color_selected(Color::from_rgba(18, 44, 58, 255))
        .color_selected_hovered(Color::from_rgba(124, 92, 255, 255))
        .color_inactive(Color::from_rgba(18, 44, 58, 200))
        .margin(RectOffset::new(8.0, 8.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut actions = Vec::new();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        ui.label(None, &context.score_label);
        ui.label(None, &context.best_label);
        ui.separator();

        if ui.button(None, "Start") {
            actions.push(ControlPanelAction::Start);
        }
        if ui.button(None, "Pause") {
            actions.push(ControlPanelAction::TogglePause);
        }
        if ui.button(None, "Resume") {
            actions.push(ControlPanelAction::Resume);
        }
        if ui.button(None, "Restart") {
            actions.push(ControlPanelAction::Restart);
        }
        if ui.button(None, context.speed_label.as_str()) {
            actions.push(ControlPanelAction::CycleSpeed);
        }
        if ui.button(None, context.mode_label.as_str()) {
            actions.push(ControlPanelAction::ToggleMode);
        }
        ui.separator();

        // One press queues one turn.
        if ui.button(None, "Up") {
            actions.push(ControlPanelAction::Steer(Direction::Up));
        }
        if ui.button(None, "Left") {
            actions.push(ControlPanelAction::Steer(Direction::Left));
        }
        ui.same_line(0.0);
        if ui.button(None, "Right") {
            actions.push(ControlPanelAction::Steer(Direction::Right));
        }
        if ui.button(None, "Down") {
            actions.push(ControlPanelAction::Steer(Direction::Down));
        }
        ui.separator();

        ui.label(None, "Arrows/WASD steer, Space pauses");
        ui.label(None, "Enter starts, R restarts");
        ui.label(None, "V speed, M mode, Esc quits");
    });

    ui.pop_skin();

    ControlPanelUiResult { actions }
}
