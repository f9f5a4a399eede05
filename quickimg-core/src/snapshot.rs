// Immutable image values shared between the session, history and preview.

use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

/// A captured image state.
///
/// Cloning is cheap: the pixel buffer is shared and never mutated once the
/// snapshot exists. Equality compares dimensions and pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<DynamicImage>);

impl Snapshot {
    pub fn new(image: DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    /// Build a snapshot from raw RGBA8 bytes. Returns `None` when the buffer
    /// length does not match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, bytes)
            .map(|buf| Self::new(DynamicImage::ImageRgba8(buf)))
    }

    pub fn image(&self) -> &DynamicImage {
        &self.0
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        self.0.to_rgba8()
    }

    /// True when both snapshots share the same pixel buffer.
    pub fn same_buffer(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<DynamicImage> for Snapshot {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Snapshot::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Snapshot::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_clone_shares_buffer() {
        let a = Snapshot::from_rgba(1, 1, vec![1, 2, 3, 255]).unwrap();
        let b = a.clone();
        let c = Snapshot::from_rgba(1, 1, vec![1, 2, 3, 255]).unwrap();

        assert!(a.same_buffer(&b));
        assert!(!a.same_buffer(&c));
        assert_eq!(a, c);
        assert_eq!(a.dimensions(), (1, 1));
    }
}
