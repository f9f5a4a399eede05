//! quickimg-platform: OS-facing services for QuickImg.
//!
//! Everything here is best-effort. Failures are returned or logged, never
//! fatal, and the editing model in quickimg-core never depends on them.

pub mod clipboard;
pub mod settings;
pub mod startup;

pub use clipboard::SystemClipboard;
pub use settings::{Settings, SETTINGS_FILE_NAME};
pub use startup::StartupRegistration;
