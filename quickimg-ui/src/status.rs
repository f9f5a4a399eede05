use chrono::Local;

/// One-line status bar: `[HH:MM:SS] message`.
#[derive(Debug, Default)]
pub struct StatusLine {
    text: String,
}

impl StatusLine {
    pub fn set(&mut self, message: impl AsRef<str>) {
        self.text = format!("[{}] {}", Local::now().format("%H:%M:%S"), message.as_ref());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.weak(&self.text);
        });
    }
}
