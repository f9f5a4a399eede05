//! Main application window.
//!
//! UI callbacks never mutate state directly: panels and shortcuts return
//! [`Action`]s, and [`QuickImgApp::dispatch`] applies them to the session on
//! the UI thread.

use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;
use quickimg_core::{ClipboardService, EditorSession, SessionError};
use quickimg_platform::{settings, startup, Settings, SystemClipboard};
use tracing::{error, info, warn};

use crate::desktop::{self, GlobalToggle, HotkeyEvents, MenuEvents, ToggleHotkey, TrayHandle};
use crate::editor::{controls, ControlsState, OptionsDraft, OptionsOutcome, PreviewTexture};
use crate::keyboard;
use crate::status::StatusLine;
use crate::tray::{TrayCommand, TrayListener};

/// A user request coming from a button, shortcut or the tray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    LoadFromClipboard,
    ChooseImage,
    RevertToOriginal,
    Grayscale,
    LowerQuality,
    Resize,
    ScalePreview(f32),
    ScaleCommit,
    Undo,
    Redo,
    Copy,
    Save,
    OpenOptions,
    ToggleVisibility,
    Exit,
}

impl From<TrayCommand> for Action {
    fn from(command: TrayCommand) -> Self {
        match command {
            TrayCommand::Toggle => Action::ToggleVisibility,
            TrayCommand::ShowOptions => Action::OpenOptions,
            TrayCommand::Exit => Action::Exit,
        }
    }
}

/// Startup configuration handed over by `main`.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub settings: Settings,
    /// Where settings are saved; `None` disables persistence.
    pub settings_path: Option<PathBuf>,
}

pub struct QuickImgApp {
    session: EditorSession,
    clipboard: Box<dyn ClipboardService>,
    settings: Settings,
    settings_path: Option<PathBuf>,
    toggle_shortcut: Option<egui::KeyboardShortcut>,
    controls: ControlsState,
    preview: PreviewTexture,
    status: StatusLine,
    options: Option<OptionsDraft>,
    tray: Option<TrayListener>,
    tray_icon: Option<TrayHandle>,
    global_toggle: Option<Box<dyn ToggleHotkey>>,
    // Close requests minimise instead while a tray can bring the window back
    close_to_tray: bool,
    exiting: bool,
    minimized: bool,
}

impl QuickImgApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self::with_clipboard(config, Box::new(SystemClipboard::new()));
        app.attach_desktop(&cc.egui_ctx);
        app.load_initial_image();
        app
    }

    /// Build the app around any clipboard implementation.
    pub fn with_clipboard(config: AppConfig, clipboard: Box<dyn ClipboardService>) -> Self {
        let mut app = Self {
            session: EditorSession::new(),
            clipboard,
            settings: config.settings,
            settings_path: config.settings_path,
            toggle_shortcut: None,
            controls: ControlsState::default(),
            preview: PreviewTexture::default(),
            status: StatusLine::default(),
            options: None,
            tray: None,
            tray_icon: None,
            global_toggle: None,
            close_to_tray: false,
            exiting: false,
            minimized: false,
        };
        app.bind_toggle();
        app
    }

    /// Receive commands from a tray listener. Closing the window then only
    /// minimises it.
    pub fn with_tray(mut self, tray: TrayListener) -> Self {
        self.tray = Some(tray);
        self.close_to_tray = true;
        self
    }

    /// Bind the toggle hotkey system-wide instead of in the window.
    pub fn with_toggle_hotkey(mut self, toggle: Box<dyn ToggleHotkey>) -> Self {
        self.global_toggle = Some(toggle);
        self.bind_toggle();
        self
    }

    // Tray icon and global hotkey; either may be missing on this desktop
    fn attach_desktop(&mut self, ctx: &egui::Context) {
        let repaint = ctx.clone();
        let wake: Arc<dyn Fn() + Send + Sync> = Arc::new(move || repaint.request_repaint());
        let mut listener = TrayListener::new();

        match desktop::start_tray() {
            Ok(handle) => match listener.listen("tray-menu", MenuEvents, Arc::clone(&wake)) {
                Ok(()) => {
                    self.tray_icon = Some(handle);
                    self.close_to_tray = true;
                }
                Err(e) => error!("Failed to start tray listener: {e}"),
            },
            Err(e) => warn!("System tray unavailable: {e}"),
        }

        match GlobalToggle::new() {
            Ok(toggle) => match listener.listen("hotkey", HotkeyEvents, wake) {
                Ok(()) => {
                    self.global_toggle = Some(Box::new(toggle));
                    self.bind_toggle();
                }
                Err(e) => error!("Failed to start hotkey listener: {e}"),
            },
            Err(e) => warn!("Global hotkeys unavailable, using in-window shortcut: {e}"),
        }

        self.tray = Some(listener);
    }

    // The in-window shortcut is only used when no system-wide binding is active
    fn bind_toggle(&mut self) {
        let hotkey = match self.settings.parsed_hotkey() {
            Ok(hotkey) => hotkey,
            Err(e) => {
                warn!(hotkey = %self.settings.hotkey, "ignoring hotkey: {e}");
                self.toggle_shortcut = None;
                return;
            }
        };

        let global = match self.global_toggle.as_mut() {
            Some(toggle) => match toggle.bind(&hotkey) {
                Ok(()) => true,
                Err(e) => {
                    warn!(%hotkey, "Global hotkey unavailable, using in-window shortcut: {e}");
                    false
                }
            },
            None => false,
        };
        self.toggle_shortcut = if global {
            None
        } else {
            keyboard::to_shortcut(&hotkey)
        };
    }

    /// Handle a window close request. Returns `true` when the close was
    /// turned into a minimise because the tray can restore the window.
    pub fn intercept_close(&mut self, ctx: &egui::Context) -> bool {
        if !self.close_to_tray || self.exiting {
            return false;
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        self.minimized = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
        info!("Window hidden to tray");
        true
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn status(&self) -> &str {
        self.status.text()
    }

    pub fn has_tray_icon(&self) -> bool {
        self.tray_icon.is_some()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controls_mut(&mut self) -> &mut ControlsState {
        &mut self.controls
    }

    fn load_initial_image(&mut self) {
        match self.session.load_from_clipboard(self.clipboard.as_mut()) {
            Ok(()) => self.status.set("Loaded initial image from clipboard"),
            Err(_) => self.status.set("No image in clipboard"),
        }
        self.controls.sync(&self.session);
    }

    /// Apply one action to the session and report the outcome.
    pub fn dispatch(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::LoadFromClipboard => {
                match self.session.load_from_clipboard(self.clipboard.as_mut()) {
                    Ok(()) => self.status.set("Image loaded from clipboard"),
                    Err(e) => self.report("Load", e),
                }
            }
            Action::ChooseImage => self.choose_image(),
            Action::RevertToOriginal => {
                let result = self.session.revert_to_original();
                self.finish(result, "Reverted to original image", "Revert");
            }
            Action::Grayscale => {
                let result = self.session.grayscale();
                self.finish(result, "Converted to grayscale", "Grayscale");
            }
            Action::LowerQuality => {
                let result = self.session.reduce_quality();
                self.finish(result, "Applied low quality", "Lower quality");
            }
            Action::Resize => self.resize(),
            Action::ScalePreview(percent) => {
                if let Err(e) = self.session.preview_scale(percent).map(|_| ()) {
                    self.report("Scale", e);
                }
            }
            Action::ScaleCommit => match self.session.commit_scale() {
                Ok(true) => {
                    let (w, h) = self
                        .session
                        .processed()
                        .map(|p| p.dimensions())
                        .unwrap_or_default();
                    self.status.set(format!("Scaled to {w}x{h}"));
                }
                Ok(false) => {}
                Err(e) => self.report("Scale", e),
            },
            Action::Undo => {
                if self.session.undo() {
                    self.status.set("Undo");
                } else {
                    self.status.set("Nothing to undo");
                }
            }
            Action::Redo => {
                if self.session.redo() {
                    self.status.set("Redo");
                } else {
                    self.status.set("Nothing to redo");
                }
            }
            Action::Copy => match self.session.copy_to_clipboard(self.clipboard.as_mut()) {
                Ok(()) => self.status.set("Image copied to clipboard"),
                Err(e) => self.report("Copy", e),
            },
            Action::Save => self.save_image(),
            Action::OpenOptions => {
                if self.options.is_none() {
                    self.options = Some(OptionsDraft::new(&self.settings));
                }
            }
            Action::ToggleVisibility => self.toggle_visibility(ctx),
            Action::Exit => {
                info!("Exit requested");
                self.exiting = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }

        // Size fields and slider follow the session
        self.controls.sync(&self.session);
    }

    fn finish(&mut self, result: Result<(), SessionError>, done: &str, what: &str) {
        match result {
            Ok(()) => self.status.set(done),
            Err(e) => self.report(what, e),
        }
    }

    fn report(&mut self, what: &str, e: SessionError) {
        match e {
            SessionError::NoImage | SessionError::ClipboardEmpty => {
                warn!("{what}: {e}");
                self.status.set(capitalize(&e.to_string()));
            }
            _ => {
                error!("{what} failed: {e}");
                self.status.set(format!("{what} error: {e}"));
            }
        }
    }

    fn resize(&mut self) {
        let (w, h) = match self.controls.dimensions() {
            Ok(dims) => dims,
            Err(e) => {
                warn!("Resize failed: {e}");
                self.status
                    .set("Resize error: width and height must be whole numbers");
                return;
            }
        };
        let result = self.session.resize(w, h);
        self.finish(result, &format!("Resized to {w}x{h}"), "Resize");
    }

    fn choose_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Choose Image")
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif"])
            .add_filter("All", &["*"])
            .pick_file()
        else {
            return;
        };

        match self.session.open_file(&path) {
            Ok(()) => self.status.set(format!("Loaded: {}", path.display())),
            Err(e) => {
                warn!("Failed loading image: {e}");
                self.status.set("Error loading image");
            }
        }
    }

    fn save_image(&mut self) {
        if !self.session.has_image() {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save Image")
            .add_filter("PNG", &["png"])
            .add_filter("All", &["*"])
            .set_file_name("image.png")
            .save_file()
        else {
            return;
        };

        match self.session.save_to(&path) {
            Ok(()) => self.status.set(format!("Saved to: {}", path.display())),
            Err(e) => {
                warn!("Save failed: {e}");
                self.status.set("Save error");
            }
        }
    }

    fn toggle_visibility(&mut self, ctx: &egui::Context) {
        self.minimized = !self.minimized;
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(self.minimized));
        if !self.minimized {
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            match self.session.load_from_clipboard(self.clipboard.as_mut()) {
                Ok(()) => self.status.set("Image loaded from clipboard"),
                Err(_) => self.status.set("No image in clipboard"),
            }
        }
    }

    /// Validate and persist the options draft. Keeps the window open with an
    /// error message on invalid input.
    pub fn save_options(&mut self) {
        let Some(draft) = self.options.as_mut() else {
            return;
        };

        let new_settings = match draft.to_settings() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Error saving settings: {e}");
                draft.error = Some(e.to_string());
                self.status.set(format!("Error saving settings: {e}"));
                return;
            }
        };

        if new_settings.run_at_startup != self.settings.run_at_startup {
            startup::apply(new_settings.run_at_startup);
        }
        let hotkey_changed = new_settings.hotkey != self.settings.hotkey;
        self.settings = new_settings;
        if hotkey_changed {
            self.bind_toggle();
        }

        if let Some(path) = &self.settings_path {
            if let Err(e) = settings::save(path, &self.settings) {
                error!("Error saving settings: {e:#}");
                self.status.set(format!("Error saving settings: {e}"));
                self.options = None;
                return;
            }
        }

        self.options = None;
        self.status.set("Settings saved successfully");
    }

    fn drain_tray(&mut self) -> Vec<Action> {
        let Some(tray) = &self.tray else {
            return Vec::new();
        };
        tray.drain().into_iter().map(Action::from).collect()
    }
}

impl eframe::App for QuickImgApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.intercept_close(ctx);
        }

        let mut actions = self.drain_tray();
        actions.extend(keyboard::shortcuts(ctx, self.toggle_shortcut));

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status.show(ui);
        });

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                actions.extend(controls::show(
                    ui,
                    &mut self.controls,
                    &self.session,
                    &self.settings,
                ));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| self.preview.show(ui));
        });

        if let Some(draft) = self.options.as_mut() {
            match draft.show(ctx) {
                OptionsOutcome::Open => {}
                OptionsOutcome::Save => self.save_options(),
                OptionsOutcome::Closed => self.options = None,
            }
        }

        let changed = !actions.is_empty();
        for action in actions {
            self.dispatch(ctx, action);
        }

        self.preview.update(ctx, self.session.processed());
        if changed {
            ctx.request_repaint();
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
