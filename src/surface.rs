//! Offscreen RGBA drawing surface.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};

use crate::geometry::ClipPath;

/// A square pixel buffer owned by a single composite operation.
///
/// Drawing follows source-over alpha blending, the same rule a browser canvas applies to
/// `drawImage` and `fill`.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl RasterSurface {
    /// Allocates a `size` x `size` surface filled with `background`.
    pub fn new(size: u32, background: Rgba<u8>) -> Self {
        RasterSurface {
            pixels: RgbaImage::from_pixel(size, size, background),
        }
    }

    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// Draws `image` stretched over the whole surface, ignoring its aspect ratio.
    pub fn draw_stretched(&mut self, image: &DynamicImage) {
        let size = self.size();
        let scaled = fit_exactly(image, size, size);
        imageops::overlay(&mut self.pixels, &scaled, 0, 0);
    }

    /// Fills every pixel inside `path` with `color`.
    pub fn fill_path(&mut self, path: &ClipPath, color: Rgba<u8>) {
        let bounds = path.bounds();
        for y in bounds.y..bounds.bottom().min(self.size()) {
            for x in bounds.x..bounds.right().min(self.size()) {
                if path.contains(x, y) {
                    self.pixels.get_pixel_mut(x, y).blend(&color);
                }
            }
        }
    }

    /// Draws `image` scaled to the bounds of `path`, keeping only the pixels inside `path`.
    pub fn draw_clipped(&mut self, image: &DynamicImage, path: &ClipPath) {
        let bounds = path.bounds();
        if bounds.is_empty() {
            return;
        }
        let scaled = fit_exactly(image, bounds.width, bounds.height);
        for (dx, dy, source) in scaled.enumerate_pixels() {
            let (x, y) = (bounds.x + dx, bounds.y + dy);
            if x >= self.size() || y >= self.size() || !path.contains(x, y) {
                continue;
            }
            self.pixels.get_pixel_mut(x, y).blend(source);
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Serializes the surface as PNG, consuming it.
    pub fn into_png(self) -> Result<Vec<u8>, image::ImageError> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.pixels).write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

fn fit_exactly(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let rgba = image.to_rgba8();
    if rgba.dimensions() == (width, height) {
        return rgba;
    }
    imageops::resize(&rgba, width, height, FilterType::Triangle)
}
