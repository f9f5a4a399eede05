//! quickimg-ui: desktop shell for QuickImg.

pub mod app;
pub mod desktop;
pub mod editor;
pub mod keyboard;
pub mod status;
pub mod tray;

pub use app::{Action, AppConfig, QuickImgApp};
