//! Text rasterized from the embedded DejaVu Sans Mono Bold face.
//!
//! Sizes are in CSS terms: one em spans `font_size` pixels.

use ab_glyph::{point, Font, FontRef, GlyphId, InvalidFont, PxScale, ScaleFont};
use image::Rgba;

use super::surface::RenderTarget;

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSansMono-Bold.ttf");

/// Embedded face at one pixel size.
#[derive(Clone)]
pub struct TextFont {
    font: FontRef<'static>,
    size: f32,
    scale: PxScale,
}

impl TextFont {
    /// Parse the embedded face at `font_size` pixels per em.
    pub fn embedded(font_size: f32) -> Result<Self, InvalidFont> {
        let font = FontRef::try_from_slice(FONT_DATA)?;
        Ok(Self::with_font(font, font_size))
    }

    /// Same face at another size.
    pub fn resized(&self, font_size: f32) -> Self {
        Self::with_font(self.font.clone(), font_size)
    }

    fn with_font(font: FontRef<'static>, font_size: f32) -> Self {
        let size = font_size.max(1.0);
        // ab_glyph scales by ascent-to-descent height, not by em
        let units_per_em = font.units_per_em().unwrap_or_else(|| font.height_unscaled());
        let scale = PxScale::from(size * font.height_unscaled() / units_per_em);
        Self { font, size, scale }
    }

    /// Pixels per em.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Ascent-to-descent height in pixels.
    pub fn glyph_height(&self) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.ascent() - scaled.descent()
    }

    /// Advance width of `text` in pixels, kerning included.
    pub fn measure(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    /// Draw `text` with the top of its line box at `y`, starting at `x`.
    pub fn draw_text(&self, target: &mut RenderTarget, x: f32, y: f32, text: &str, color: Rgba<u8>) {
        let scaled = self.font.as_scaled(self.scale);
        let baseline = y + scaled.ascent();
        let mut caret = x;
        let mut prev: Option<GlyphId> = None;

        for ch in text.chars() {
            let mut glyph = scaled.scaled_glyph(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, glyph.id);
            }
            glyph.position = point(caret, baseline);
            caret += scaled.h_advance(glyph.id);
            prev = Some(glyph.id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (ox, oy) = (bounds.min.x as i64, bounds.min.y as i64);
                outlined.draw(|gx, gy, coverage| {
                    target.blend_pixel(ox + gx as i64, oy + gy as i64, color, coverage);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn render(text: &str, size: f32) -> RenderTarget {
        let mut t = RenderTarget::new(200, 40, WHITE);
        TextFont::embedded(size).unwrap().draw_text(&mut t, 2.0, 2.0, text, BLACK);
        t
    }

    #[test]
    fn test_monospace_advance() {
        let f = TextFont::embedded(20.0).unwrap();
        assert_eq!(f.measure(""), 0.0);
        let one = f.measure("i");
        assert!(one > 0.0);
        assert!((f.measure("iiii") - 4.0 * one).abs() < 1e-3);
        assert!((f.measure("WWWW") - f.measure("iiii")).abs() < 1e-3);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let small = TextFont::embedded(10.0).unwrap().measure("Hello");
        let large = TextFont::embedded(40.0).unwrap().measure("Hello");
        assert!((large - 4.0 * small).abs() < 0.05, "{} vs {}", small, large);
    }

    #[test]
    fn test_glyph_height_covers_em() {
        let f = TextFont::embedded(86.4).unwrap();
        assert!(f.glyph_height() >= 86.4);
        assert!(f.glyph_height() < 1.2 * 86.4);
        assert_eq!(f.resized(14.4).size(), 14.4);
    }

    #[test]
    fn test_space_draws_nothing() {
        let t = render("   ", 14.0);
        assert!(t.image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_draws_ink() {
        let t = render("Hi", 20.0);
        assert!(t.image().pixels().any(|p| *p != WHITE));
    }

    #[test]
    fn test_accented_text_differs_from_question_marks() {
        let accented = render("Mamá José", 20.0);
        let fallback = render("Mam? Jos?", 20.0);
        assert_ne!(accented.image().as_raw(), fallback.image().as_raw());
    }

    #[test]
    fn test_non_latin_text_renders() {
        let t = render("Ωμέγα", 20.0);
        assert!(t.image().pixels().any(|p| *p != WHITE));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(render("Our song", 18.0).image().as_raw(), render("Our song", 18.0).image().as_raw());
    }
}
