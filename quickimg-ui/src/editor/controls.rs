// Left-hand control panel of the editor.

use quickimg_core::EditorSession;
use quickimg_platform::Settings;
use std::num::ParseIntError;
use tracing::trace;

use crate::app::Action;

#[derive(Debug, Clone)]
pub struct ControlsState {
    pub width_input: String,
    pub height_input: String,
    pub scale: f32,
}

impl Default for ControlsState {
    fn default() -> Self {
        Self {
            width_input: String::new(),
            height_input: String::new(),
            scale: quickimg_core::DEFAULT_SCALE,
        }
    }
}

impl ControlsState {
    // Mirror the session after an action
    pub fn sync(&mut self, session: &EditorSession) {
        match session.processed() {
            Some(processed) => {
                self.width_input = processed.width().to_string();
                self.height_input = processed.height().to_string();
            }
            None => {
                self.width_input.clear();
                self.height_input.clear();
            }
        }
        self.scale = session.scale_percent();
    }

    // Parse the width/height fields; range checks happen in the transform
    pub fn dimensions(&self) -> Result<(i64, i64), ParseIntError> {
        let width = self.width_input.trim().parse()?;
        let height = self.height_input.trim().parse()?;
        Ok((width, height))
    }
}

pub fn show(
    ui: &mut egui::Ui,
    state: &mut ControlsState,
    session: &EditorSession,
    settings: &Settings,
) -> Vec<Action> {
    let mut actions = Vec::new();
    let has_image = session.has_image();

    ui.add_space(4.0);
    for (label, action) in [
        ("Load from Clipboard", Action::LoadFromClipboard),
        ("Choose Image", Action::ChooseImage),
    ] {
        if wide_button(ui, true, label) {
            actions.push(action);
        }
    }
    if wide_button(ui, has_image, "Revert to Original") {
        actions.push(Action::RevertToOriginal);
    }

    ui.separator();
    for (label, action) in [
        ("Convert to Grayscale", Action::Grayscale),
        ("Lower Quality", Action::LowerQuality),
    ] {
        if wide_button(ui, has_image, label) {
            actions.push(action);
        }
    }

    ui.separator();
    ui.horizontal(|ui| {
        ui.label("W");
        ui.add(egui::TextEdit::singleline(&mut state.width_input).desired_width(60.0));
        ui.label("H");
        ui.add(egui::TextEdit::singleline(&mut state.height_input).desired_width(60.0));
    });
    if wide_button(ui, has_image, "Resize") {
        actions.push(Action::Resize);
    }

    ui.separator();
    let range = settings.min_scale as f32..=settings.max_scale as f32;
    let slider = ui.add_enabled(
        has_image,
        egui::Slider::new(&mut state.scale, range)
            .integer()
            .suffix("%"),
    );
    if slider.changed() {
        trace!("Scale slider moved to {}", state.scale);
        actions.push(Action::ScalePreview(state.scale));
    }
    // Keyboard changes don't drag, commit them right away
    if slider.drag_stopped() || (slider.changed() && !slider.dragged()) {
        actions.push(Action::ScaleCommit);
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(session.can_undo(), egui::Button::new("Undo"))
            .clicked()
        {
            actions.push(Action::Undo);
        }
        if ui
            .add_enabled(session.can_redo(), egui::Button::new("Redo"))
            .clicked()
        {
            actions.push(Action::Redo);
        }
    });

    ui.separator();
    for (label, action) in [("Copy Image", Action::Copy), ("Save Image", Action::Save)] {
        if wide_button(ui, has_image, label) {
            actions.push(action);
        }
    }

    ui.separator();
    if wide_button(ui, true, "Options") {
        actions.push(Action::OpenOptions);
    }

    actions
}

fn wide_button(ui: &mut egui::Ui, enabled: bool, label: &str) -> bool {
    ui.add_enabled(
        enabled,
        egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 0.0)),
    )
    .clicked()
}
