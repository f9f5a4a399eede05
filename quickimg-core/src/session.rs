//! Editor session for QuickImg.
//!
//! The session owns every image reference the editor works with:
//! - `original`: the image as it was loaded
//! - `base`: the last committed edit, input to the next transform
//! - `processed`: what the preview shows (a live scale preview or `base`)
//!
//! Committed edits are recorded in a [`ChangesHistory`]; live scale previews
//! are not.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::clipboard::{ClipboardError, ClipboardService};
use crate::history::ChangesHistory;
use crate::transform::{self, TransformError};
use crate::Snapshot;

/// Neutral scale, in percent.
pub const DEFAULT_SCALE: f32 = 100.0;

#[derive(Debug, Default)]
pub struct EditorSession {
    original: Option<Snapshot>,
    base: Option<Snapshot>,
    processed: Option<Snapshot>,
    scale_percent: Option<f32>,
    history: ChangesHistory<Snapshot>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom history capacity.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            history: ChangesHistory::new(capacity),
            ..Self::default()
        }
    }

    pub fn original(&self) -> Option<&Snapshot> {
        self.original.as_ref()
    }

    pub fn base(&self) -> Option<&Snapshot> {
        self.base.as_ref()
    }

    pub fn processed(&self) -> Option<&Snapshot> {
        self.processed.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.base.is_some()
    }

    /// Scale of the live preview relative to `base`, in percent.
    pub fn scale_percent(&self) -> f32 {
        self.scale_percent.unwrap_or(DEFAULT_SCALE)
    }

    pub fn history(&self) -> &ChangesHistory<Snapshot> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Start editing a new image. The history restarts with this image as
    /// its first entry.
    pub fn load(&mut self, snapshot: Snapshot) {
        info!(
            "Loading {}x{} image into session",
            snapshot.width(),
            snapshot.height()
        );
        self.original = Some(snapshot.clone());
        self.base = Some(snapshot.clone());
        self.processed = Some(snapshot.clone());
        self.scale_percent = None;
        self.history.clear();
        self.history.add(snapshot);
    }

    /// Load whatever image the clipboard holds.
    pub fn load_from_clipboard(
        &mut self,
        clipboard: &mut dyn ClipboardService,
    ) -> Result<(), SessionError> {
        let snapshot = clipboard.read_image().ok_or(SessionError::ClipboardEmpty)?;
        self.load(snapshot);
        Ok(())
    }

    /// Load an image file from disk.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed loading image");
            e
        })?;
        self.load(Snapshot::new(image));
        Ok(())
    }

    pub fn grayscale(&mut self) -> Result<(), SessionError> {
        let next = transform::grayscale(self.require_base()?);
        self.commit(next);
        Ok(())
    }

    pub fn reduce_quality(&mut self) -> Result<(), SessionError> {
        let next = transform::reduce_quality(self.require_base()?);
        self.commit(next);
        Ok(())
    }

    /// Resize `base` to exactly `width` x `height`. Invalid dimensions leave
    /// the session untouched.
    pub fn resize(&mut self, width: i64, height: i64) -> Result<(), SessionError> {
        let next = transform::resize(self.require_base()?, width, height)?;
        self.commit(next);
        Ok(())
    }

    /// Live preview of `base` at `percent`. Not recorded in history.
    pub fn preview_scale(&mut self, percent: f32) -> Result<&Snapshot, SessionError> {
        let base = self.require_base()?;
        let preview = transform::scale(base, f64::from(percent) / f64::from(DEFAULT_SCALE))?;
        debug!(percent, "scale preview {}x{}", preview.width(), preview.height());

        self.scale_percent = Some(percent);
        let shown: &Snapshot = self.processed.insert(preview);
        Ok(shown)
    }

    /// Commit the current scale preview. Returns `false` when there was
    /// nothing to commit.
    pub fn commit_scale(&mut self) -> Result<bool, SessionError> {
        let base = self.require_base()?.clone();
        let Some(percent) = self.scale_percent.take() else {
            return Ok(false);
        };

        let processed = self.processed.clone().unwrap_or_else(|| base.clone());
        if percent == DEFAULT_SCALE || processed.dimensions() == base.dimensions() {
            self.processed = Some(base);
            return Ok(false);
        }

        info!(percent, "committing scale");
        self.commit(processed);
        Ok(true)
    }

    /// Go back to the image as it was loaded. Recorded as an edit so it can
    /// itself be undone.
    pub fn revert_to_original(&mut self) -> Result<(), SessionError> {
        let original = self.original.clone().ok_or(SessionError::NoImage)?;
        self.commit(original);
        Ok(())
    }

    /// Show the previous committed edit. Returns `false` when there is
    /// nothing to undo; the image is then left unchanged.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.show(snapshot);
                true
            }
            None => {
                debug!("nothing to undo");
                false
            }
        }
    }

    /// Show the next committed edit. Returns `false` when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.show(snapshot);
                true
            }
            None => {
                debug!("nothing to redo");
                false
            }
        }
    }

    /// Put the current preview on the clipboard.
    pub fn copy_to_clipboard(
        &self,
        clipboard: &mut dyn ClipboardService,
    ) -> Result<(), SessionError> {
        let processed = self.processed.as_ref().ok_or(SessionError::NoImage)?;
        clipboard.write_image(processed)?;
        debug!("{}x{} image handed to clipboard", processed.width(), processed.height());
        Ok(())
    }

    /// Write the current preview to disk; the format follows the extension.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let processed = self.processed.as_ref().ok_or(SessionError::NoImage)?;
        processed.image().save(path)?;
        info!(path = %path.display(), "image saved");
        Ok(())
    }

    fn require_base(&self) -> Result<&Snapshot, SessionError> {
        self.base.as_ref().ok_or(SessionError::NoImage)
    }

    fn commit(&mut self, snapshot: Snapshot) {
        self.history.add(snapshot.clone());
        self.show(snapshot);
    }

    fn show(&mut self, snapshot: Snapshot) {
        self.base = Some(snapshot.clone());
        self.processed = Some(snapshot);
        self.scale_percent = None;
    }
}

/// Errors surfaced to the user as status messages. None of them leave the
/// session in a changed state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no image loaded")]
    NoImage,

    #[error("no image in clipboard")]
    ClipboardEmpty,

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error("image file error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn solid(width: u32, height: u32, value: u8) -> Snapshot {
        Snapshot::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([value, value / 2, 255 - value]),
        )))
    }

    #[test]
    fn test_empty_session_rejects_edits() {
        let mut session = EditorSession::new();
        assert!(matches!(session.grayscale(), Err(SessionError::NoImage)));
        assert!(matches!(session.resize(10, 10), Err(SessionError::NoImage)));
        assert!(matches!(session.preview_scale(50.0), Err(SessionError::NoImage)));
        assert!(!session.undo());
        assert!(!session.redo());
    }

    #[test]
    fn test_load_seeds_history() {
        let mut session = EditorSession::new();
        let img = solid(4, 4, 10);
        session.load(img.clone());

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.processed(), Some(&img));
        assert_eq!(session.original(), Some(&img));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_resize_then_undo() {
        let mut session = EditorSession::new();
        session.load(solid(10, 10, 10));
        session.resize(20, 5).unwrap();
        assert_eq!(session.processed().unwrap().dimensions(), (20, 5));

        assert!(session.undo());
        assert_eq!(session.processed().unwrap().dimensions(), (10, 10));
        assert!(!session.undo());
        assert_eq!(session.processed().unwrap().dimensions(), (10, 10));

        assert!(session.redo());
        assert_eq!(session.base().unwrap().dimensions(), (20, 5));
    }

    #[test]
    fn test_invalid_resize_keeps_state() {
        let mut session = EditorSession::new();
        session.load(solid(10, 10, 10));

        let err = session.resize(0, 10).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transform(TransformError::InvalidDimension { .. })
        ));
        assert_eq!(session.processed().unwrap().dimensions(), (10, 10));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_scale_preview_is_not_recorded() {
        let mut session = EditorSession::new();
        session.load(solid(100, 50, 10));

        session.preview_scale(150.0).unwrap();
        session.preview_scale(50.0).unwrap();
        assert_eq!(session.processed().unwrap().dimensions(), (50, 25));
        assert_eq!(session.base().unwrap().dimensions(), (100, 50));
        assert_eq!(session.history().len(), 1);

        assert!(session.commit_scale().unwrap());
        assert_eq!(session.base().unwrap().dimensions(), (50, 25));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.scale_percent(), DEFAULT_SCALE);
    }

    #[test]
    fn test_commit_scale_without_change() {
        let mut session = EditorSession::new();
        session.load(solid(10, 10, 10));
        assert!(!session.commit_scale().unwrap());

        session.preview_scale(100.0).unwrap();
        assert!(!session.commit_scale().unwrap());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_revert_is_undoable() {
        let mut session = EditorSession::new();
        let img = solid(6, 6, 200);
        session.load(img.clone());
        session.grayscale().unwrap();
        session.revert_to_original().unwrap();

        assert_eq!(session.processed(), Some(&img));
        assert!(session.undo());
        assert_ne!(session.processed(), Some(&img));
    }
}
