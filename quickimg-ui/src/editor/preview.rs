// Preview pane for the editor.
// Keeps a GPU texture of the processed image, shrunk to the preview box.

use egui::{ColorImage, TextureHandle, TextureOptions};
use quickimg_core::{transform, Snapshot, PREVIEW_SIZE};
use tracing::{debug, trace};

#[derive(Default)]
pub struct PreviewTexture {
    texture: Option<TextureHandle>,
    // Snapshot the texture was built from
    shown: Option<Snapshot>,
}

impl PreviewTexture {
    // Rebuild the texture when the snapshot changed
    pub fn update(&mut self, ctx: &egui::Context, snapshot: Option<&Snapshot>) {
        let Some(snapshot) = snapshot else {
            if self.shown.take().is_some() {
                debug!("Clearing preview");
                self.texture = None;
            }
            return;
        };

        if self
            .shown
            .as_ref()
            .is_some_and(|shown| shown.same_buffer(snapshot))
        {
            return;
        }

        let thumbnail = transform::fit_within(snapshot, PREVIEW_SIZE.0, PREVIEW_SIZE.1);
        let image = to_color_image(&thumbnail);
        debug!(
            "Updating preview {}x{} (source {}x{})",
            thumbnail.width(),
            thumbnail.height(),
            snapshot.width(),
            snapshot.height()
        );

        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("preview", image, TextureOptions::LINEAR))
            }
        }
        self.shown = Some(snapshot.clone());
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.texture {
            Some(texture) => {
                ui.image((texture.id(), texture.size_vec2()));
            }
            None => {
                ui.weak("No image loaded");
            }
        }
    }
}

// Convert a snapshot to an egui image
pub fn to_color_image(snapshot: &Snapshot) -> ColorImage {
    let rgba = snapshot.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    trace!("Converting {}x{} snapshot to color image", size[0], size[1]);
    ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn test_to_color_image() {
        let snapshot = Snapshot::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            3,
            2,
            Rgb([255, 0, 0]),
        )));
        let image = to_color_image(&snapshot);

        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels.len(), 6);
        assert!(image.pixels.iter().all(|p| *p == Color32::RED));
    }

    #[test]
    fn test_preview_tracks_snapshot() {
        let ctx = egui::Context::default();
        let mut preview = PreviewTexture::default();
        let snapshot = Snapshot::new(DynamicImage::ImageRgb8(RgbImage::new(4, 4)));

        preview.update(&ctx, Some(&snapshot));
        assert!(preview.texture.is_some());

        preview.update(&ctx, None);
        assert!(preview.texture.is_none());
    }
}
