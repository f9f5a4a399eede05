// Options window: hotkey, scale range and launch at login.

use quickimg_core::HotkeyError;
use quickimg_platform::Settings;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid hotkey: {0}")]
    Hotkey(#[from] HotkeyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsOutcome {
    Open,
    Save,
    Closed,
}

/// Editable copy of the settings while the window is open.
#[derive(Debug, Clone)]
pub struct OptionsDraft {
    pub hotkey: String,
    pub min_scale: String,
    pub max_scale: String,
    pub run_at_startup: bool,
    pub error: Option<String>,
}

impl OptionsDraft {
    pub fn new(settings: &Settings) -> Self {
        Self {
            hotkey: settings.hotkey.clone(),
            min_scale: settings.min_scale.to_string(),
            max_scale: settings.max_scale.to_string(),
            run_at_startup: settings.run_at_startup,
            error: None,
        }
    }

    /// Validate the draft into normalized settings.
    pub fn to_settings(&self) -> Result<Settings, OptionsError> {
        let settings = Settings {
            hotkey: self.hotkey.clone(),
            min_scale: parse_scale("Min scale", &self.min_scale)?,
            max_scale: parse_scale("Max scale", &self.max_scale)?,
            run_at_startup: self.run_at_startup,
        }
        .normalized();

        settings.parsed_hotkey()?;
        debug!(?settings, "options validated");
        Ok(settings)
    }

    pub fn show(&mut self, ctx: &egui::Context) -> OptionsOutcome {
        let mut open = true;
        let mut save = false;

        egui::Window::new("Options")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_size([400.0, 300.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Toggle Visibility Hotkey:");
                    ui.text_edit_singleline(&mut self.hotkey);
                });
                ui.horizontal(|ui| {
                    ui.label("Min Scale:");
                    ui.add(egui::TextEdit::singleline(&mut self.min_scale).desired_width(60.0));
                    ui.label("Max Scale:");
                    ui.add(egui::TextEdit::singleline(&mut self.max_scale).desired_width(60.0));
                });
                ui.checkbox(&mut self.run_at_startup, "Run at startup");

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                }

                ui.add_space(8.0);
                if ui.button("Save Settings").clicked() {
                    save = true;
                }
            });

        if save {
            OptionsOutcome::Save
        } else if open {
            OptionsOutcome::Open
        } else {
            OptionsOutcome::Closed
        }
    }
}

fn parse_scale(field: &'static str, value: &str) -> Result<u32, OptionsError> {
    value
        .trim()
        .parse()
        .map_err(|_| OptionsError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
