//! Image transforms applied by the editor.
//!
//! Every function is pure: it reads the input snapshot and returns a new one.
//! Resampling uses Lanczos3 throughout.

use image::imageops::FilterType;
use thiserror::Error;
use tracing::{debug, trace};

use crate::Snapshot;

/// Bounding box of the on-screen preview.
pub const PREVIEW_SIZE: (u32, u32) = (700, 700);

/// Divisor used by [`reduce_quality`] for the intermediate downsample.
const QUALITY_DIVISOR: u32 = 3;

const FILTER: FilterType = FilterType::Lanczos3;

/// Errors raised by transforms with bad parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("dimensions must be positive integers, got {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },

    #[error("scale factor must be a positive finite number, got {factor}")]
    InvalidScale { factor: f64 },
}

/// Scale both dimensions by `factor`. Each side is truncated and kept at
/// least one pixel.
pub fn scale(image: &Snapshot, factor: f64) -> Result<Snapshot, TransformError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TransformError::InvalidScale { factor });
    }

    let width = ((image.width() as f64 * factor) as u32).max(1);
    let height = ((image.height() as f64 * factor) as u32).max(1);
    trace!(factor, width, height, "scaling image");

    Ok(Snapshot::new(
        image.image().resize_exact(width, height, FILTER),
    ))
}

/// Resize to exactly `width` x `height`.
pub fn resize(image: &Snapshot, width: i64, height: i64) -> Result<Snapshot, TransformError> {
    let invalid = TransformError::InvalidDimension { width, height };
    if width <= 0 || height <= 0 {
        return Err(invalid);
    }
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(invalid),
    };

    debug!(
        "Resizing {}x{} -> {}x{}",
        image.width(),
        image.height(),
        w,
        h
    );
    Ok(Snapshot::new(image.image().resize_exact(w, h, FILTER)))
}

pub fn grayscale(image: &Snapshot) -> Snapshot {
    debug!("Converting {}x{} image to grayscale", image.width(), image.height());
    Snapshot::new(image.image().grayscale())
}

/// Lossy quality reduction: downsample to a third, then back up.
pub fn reduce_quality(image: &Snapshot) -> Snapshot {
    let (width, height) = image.dimensions();
    let small_w = (width / QUALITY_DIVISOR).max(1);
    let small_h = (height / QUALITY_DIVISOR).max(1);
    debug!(width, height, small_w, small_h, "reducing image quality");

    let small = image.image().resize_exact(small_w, small_h, FILTER);
    Snapshot::new(small.resize_exact(width, height, FILTER))
}

/// Shrink to fit inside `max_width` x `max_height`, keeping the aspect ratio.
/// Images that already fit are returned as-is.
pub fn fit_within(image: &Snapshot, max_width: u32, max_height: u32) -> Snapshot {
    if image.width() <= max_width && image.height() <= max_height {
        return image.clone();
    }
    Snapshot::new(image.image().resize(max_width, max_height, FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> Snapshot {
        let buf = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 128])
        });
        Snapshot::new(DynamicImage::ImageRgb8(buf))
    }

    #[test]
    fn test_scale_half() {
        let img = gradient(40, 20);
        let scaled = scale(&img, 0.5).unwrap();
        assert_eq!(scaled.dimensions(), (20, 10));
    }

    #[test]
    fn test_scale_never_collapses_to_zero() {
        let img = gradient(3, 3);
        let scaled = scale(&img, 0.1).unwrap();
        assert_eq!(scaled.dimensions(), (1, 1));
    }

    #[test]
    fn test_scale_rejects_bad_factor() {
        let img = gradient(3, 3);
        assert!(scale(&img, 0.0).is_err());
        assert!(scale(&img, -1.0).is_err());
        assert!(scale(&img, f64::NAN).is_err());
    }

    #[test]
    fn test_resize_exact() {
        let img = gradient(10, 10);
        let resized = resize(&img, 33, 7).unwrap();
        assert_eq!(resized.dimensions(), (33, 7));
    }

    #[test]
    fn test_resize_invalid_dimension() {
        let img = gradient(10, 10);
        assert_eq!(
            resize(&img, 0, 5),
            Err(TransformError::InvalidDimension {
                width: 0,
                height: 5
            })
        );
        assert!(resize(&img, 5, -2).is_err());
        assert!(resize(&img, i64::MAX, 5).is_err());
    }

    #[test]
    fn test_grayscale_equal_channels() {
        let img = grayscale(&gradient(8, 8));
        let rgb = img.image().to_rgb8();
        for px in rgb.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_reduce_quality_keeps_size() {
        let img = gradient(30, 12);
        let reduced = reduce_quality(&img);
        assert_eq!(reduced.dimensions(), (30, 12));

        let tiny = reduce_quality(&gradient(2, 2));
        assert_eq!(tiny.dimensions(), (2, 2));
    }

    #[test]
    fn test_fit_within() {
        let small = gradient(100, 50);
        assert!(fit_within(&small, 700, 700).same_buffer(&small));

        let large = gradient(1400, 700);
        let fitted = fit_within(&large, 700, 700);
        assert_eq!(fitted.dimensions(), (700, 350));
    }
}
