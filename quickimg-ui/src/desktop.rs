//! Native desktop integration: the tray icon and the system-wide toggle
//! hotkey. Both feed [`TrayCommand`]s into a [`crate::tray::TrayListener`].

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use quickimg_core::Hotkey;
use thiserror::Error;
use tracing::{debug, info, warn};
use tray_icon::menu::{Menu, MenuEvent, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::tray::TrayCommand;

pub const MENU_OPEN: &str = "open";
pub const MENU_OPTIONS: &str = "options";
pub const MENU_EXIT: &str = "exit";

const ICON_SIZE: u32 = 32;

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("global hotkey: {0}")]
    Hotkey(#[from] global_hotkey::Error),

    #[error("unsupported hotkey: {0}")]
    HotkeyParse(#[from] global_hotkey::hotkey::HotKeyParseError),

    #[error("tray icon: {0}")]
    Tray(#[from] tray_icon::Error),

    #[error("tray menu: {0}")]
    Menu(#[from] tray_icon::menu::Error),

    #[error("tray icon image: {0}")]
    Icon(#[from] tray_icon::BadIcon),

    #[error("tray thread: {0}")]
    Thread(#[from] std::io::Error),

    #[error("tray thread exited before the icon was created")]
    TrayThreadGone,
}

/// Something that can bind the window toggle hotkey system-wide.
pub trait ToggleHotkey {
    /// Replace the current binding with `hotkey`.
    fn bind(&mut self, hotkey: &Hotkey) -> Result<(), DesktopError>;
}

/// Toggle hotkey registered with the OS through `global-hotkey`.
pub struct GlobalToggle {
    manager: GlobalHotKeyManager,
    current: Option<HotKey>,
}

impl GlobalToggle {
    /// Must be created on the UI thread.
    pub fn new() -> Result<Self, DesktopError> {
        Ok(Self {
            manager: GlobalHotKeyManager::new()?,
            current: None,
        })
    }
}

impl ToggleHotkey for GlobalToggle {
    fn bind(&mut self, hotkey: &Hotkey) -> Result<(), DesktopError> {
        let next = to_global(hotkey)?;
        if self.current == Some(next) {
            return Ok(());
        }

        if let Some(previous) = self.current.take() {
            if let Err(e) = self.manager.unregister(previous) {
                warn!("Failed to release previous hotkey: {e}");
            }
        }
        self.manager.register(next)?;
        self.current = Some(next);
        info!(%hotkey, "global hotkey registered");
        Ok(())
    }
}

/// Convert a parsed hotkey into its `global-hotkey` form.
pub fn to_global(hotkey: &Hotkey) -> Result<HotKey, DesktopError> {
    // Canonical form ("ctrl+alt+shift+cmd+b", "f5", "7") is accepted as is
    Ok(hotkey.to_string().parse::<HotKey>()?)
}

/// Global hotkey presses, as toggle commands.
pub struct HotkeyEvents;

impl Iterator for HotkeyEvents {
    type Item = TrayCommand;

    fn next(&mut self) -> Option<TrayCommand> {
        loop {
            let event = GlobalHotKeyEvent::receiver().recv().ok()?;
            if event.state == HotKeyState::Pressed {
                return Some(TrayCommand::Toggle);
            }
        }
    }
}

/// Tray menu clicks, as commands.
pub struct MenuEvents;

impl Iterator for MenuEvents {
    type Item = TrayCommand;

    fn next(&mut self) -> Option<TrayCommand> {
        loop {
            let event = MenuEvent::receiver().recv().ok()?;
            match command_for(&event.id.0) {
                Some(command) => return Some(command),
                None => debug!(id = %event.id.0, "ignoring unknown menu item"),
            }
        }
    }
}

pub fn command_for(menu_id: &str) -> Option<TrayCommand> {
    match menu_id {
        MENU_OPEN => Some(TrayCommand::Toggle),
        MENU_OPTIONS => Some(TrayCommand::ShowOptions),
        MENU_EXIT => Some(TrayCommand::Exit),
        _ => None,
    }
}

/// Keeps the tray icon alive for as long as it is held.
pub enum TrayHandle {
    /// Icon owned by the UI thread.
    Local(TrayIcon),
    /// Icon owned by a GTK main loop on its own thread.
    Thread(std::thread::JoinHandle<()>),
}

/// Create the tray icon with its Open / Options / Exit menu.
#[cfg(not(target_os = "linux"))]
pub fn start_tray() -> Result<TrayHandle, DesktopError> {
    build_tray_icon().map(TrayHandle::Local)
}

/// Create the tray icon with its Open / Options / Exit menu.
///
/// On Linux the icon lives on a GTK thread; this waits until it exists.
#[cfg(target_os = "linux")]
pub fn start_tray() -> Result<TrayHandle, DesktopError> {
    let (ready_tx, ready_rx) = std::sync::mpsc::channel();
    let handle = std::thread::Builder::new()
        .name("tray-gtk".into())
        .spawn(move || {
            if let Err(e) = gtk::init() {
                warn!("GTK init failed: {e}");
                return;
            }
            match build_tray_icon() {
                Ok(icon) => {
                    ready_tx.send(Ok(())).ok();
                    gtk::main();
                    drop(icon);
                }
                Err(e) => {
                    ready_tx.send(Err(e)).ok();
                }
            }
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(TrayHandle::Thread(handle)),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(DesktopError::TrayThreadGone),
    }
}

fn build_tray_icon() -> Result<TrayIcon, DesktopError> {
    let menu = Menu::new();
    let open = MenuItem::with_id(MENU_OPEN, "Open", true, None);
    let options = MenuItem::with_id(MENU_OPTIONS, "Options", true, None);
    let exit = MenuItem::with_id(MENU_EXIT, "Exit", true, None);
    menu.append_items(&[&open, &options, &exit])?;

    let icon = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip("Image Editor")
        .with_icon(Icon::from_rgba(icon_rgba(), ICON_SIZE, ICON_SIZE)?)
        .build()?;
    info!("tray icon created");
    Ok(icon)
}

// Blue square with a white frame.
fn icon_rgba() -> Vec<u8> {
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let frame = x < 3 || y < 3 || x >= ICON_SIZE - 3 || y >= ICON_SIZE - 3;
            let pixel: [u8; 4] = if frame {
                [255, 255, 255, 255]
            } else {
                [40, 110, 200, 255]
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    rgba
}
