//! quickimg-core: editing model for QuickImg.
//!
//! Design rules:
//! - Snapshots are immutable; every edit produces a new one.
//! - Only committed edits enter the history, never live previews.
//! - Boundary cases of undo/redo are empty results, not errors.
//! - Nothing here touches the OS; clipboard access goes through a trait.

pub mod clipboard;
pub mod history;
pub mod hotkey;
pub mod session;
pub mod snapshot;
pub mod transform;

pub use clipboard::{ClipboardError, ClipboardService};
pub use history::{ChangesHistory, DEFAULT_CAPACITY};
pub use hotkey::{Hotkey, HotkeyError, Key, Modifiers};
pub use session::{EditorSession, SessionError, DEFAULT_SCALE};
pub use snapshot::Snapshot;
pub use transform::{TransformError, PREVIEW_SIZE};
