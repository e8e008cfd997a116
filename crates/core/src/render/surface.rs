//! Owned RGBA raster that drawing stages paint into.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

/// Fixed-size raster surface. All drawing clips to the canvas.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    image: RgbaImage,
}

impl RenderTarget {
    /// A `width × height` canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), background),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Fill a rectangle. Parts outside the canvas are ignored.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i64).min(self.width() as i64);
        let y1 = (y + height as i64).min(self.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    /// Outline a rectangle with an inset border of `thickness` pixels.
    pub fn stroke_rect(&mut self, x: i64, y: i64, width: u32, height: u32, thickness: u32, color: Rgba<u8>) {
        let t = thickness.max(1).min(width).min(height);
        self.fill_rect(x, y, width, t, color);
        self.fill_rect(x, y + (height - t) as i64, width, t, color);
        self.fill_rect(x, y, t, height, color);
        self.fill_rect(x + (width - t) as i64, y, t, height, color);
    }

    /// Mix `color` into one pixel by `coverage` in [0, 1]. Off-canvas is ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let c = coverage.clamp(0.0, 1.0);
        if c <= 0.0 {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        for (dst, &src) in px.0.iter_mut().zip(color.0.iter()) {
            *dst = (*dst as f32 + (src as f32 - *dst as f32) * c).round() as u8;
        }
    }

    /// Alpha-composite `top` with its top-left corner at (x, y).
    pub fn draw_image(&mut self, top: &RgbaImage, x: i64, y: i64) {
        image::imageops::overlay(&mut self.image, top, x, y);
    }

    /// Serialize to PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf).write_image(
            self.image.as_raw(),
            self.width(),
            self.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(buf)
    }
}
