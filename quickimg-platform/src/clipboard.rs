// System clipboard backed by arboard.

use arboard::Clipboard;
use image::DynamicImage;
use quickimg_core::{ClipboardError, ClipboardService, Snapshot};
use std::borrow::Cow;
use tracing::{debug, error, info, warn};

/// The desktop clipboard.
///
/// The arboard handle is opened on first use and kept for the lifetime of
/// the value; on X11 the copied image is only served while it is alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.handle.is_none() {
            debug!("opening system clipboard");
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard handle missing".into()))
    }
}

impl ClipboardService for SystemClipboard {
    fn read_image(&mut self) -> Option<Snapshot> {
        let clipboard = match self.handle() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                error!("Clipboard retrieval error: {}", e);
                return None;
            }
        };

        let data = match clipboard.get_image() {
            Ok(data) => data,
            Err(arboard::Error::ContentNotAvailable) => {
                warn!("Clipboard content is not an image");
                return None;
            }
            Err(e) => {
                error!("Clipboard retrieval error: {}", e);
                return None;
            }
        };

        let snapshot = snapshot_from_clipboard(data.width, data.height, data.bytes.into_owned())?;
        info!("Image retrieved from clipboard");
        Some(snapshot)
    }

    fn write_image(&mut self, snapshot: &Snapshot) -> Result<(), ClipboardError> {
        let rgba = snapshot.to_rgba8();
        let (width, height) = rgba.dimensions();
        let clipboard = self.handle()?;

        clipboard
            .set_image(arboard::ImageData {
                width: width as usize,
                height: height as usize,
                bytes: Cow::Owned(rgba.into_raw()),
            })
            .map_err(|e| {
                error!("Clipboard copy failed: {}", e);
                ClipboardError::Write(e.to_string())
            })?;

        info!("Image copied to clipboard");
        Ok(())
    }
}

// Alpha is dropped on the way in.
fn snapshot_from_clipboard(width: usize, height: usize, bytes: Vec<u8>) -> Option<Snapshot> {
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        error!(width, height, "clipboard image dimensions out of range");
        return None;
    };

    match Snapshot::from_rgba(w, h, bytes) {
        Some(rgba) => Some(Snapshot::new(DynamicImage::ImageRgb8(rgba.image().to_rgb8()))),
        None => {
            error!(width, height, "clipboard image buffer has unexpected length");
            None
        }
    }
}
