// Clipboard boundary. The OS-backed implementation lives in quickimg-platform.

use thiserror::Error;

use crate::Snapshot;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Access to an image clipboard.
pub trait ClipboardService {
    /// The clipboard image, or `None` when the clipboard holds no image or
    /// cannot be read.
    fn read_image(&mut self) -> Option<Snapshot>;

    fn write_image(&mut self, snapshot: &Snapshot) -> Result<(), ClipboardError>;
}
