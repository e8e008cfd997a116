//! Title banner: greedy word wrap, block centered in the title band.

use image::Rgba;

use super::font::TextFont;
use super::layout::Rect;
use super::surface::RenderTarget;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Greedily wrap `text` into lines no wider than `max_width`.
///
/// A word wider than `max_width` gets a line of its own and overflows.
/// Empty or all-whitespace text yields a single empty line.
pub fn wrap_title(text: &str, max_width: u32, font: &TextFont) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if font.measure(&candidate) <= max_width as f32 {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    lines.push(current);
    lines
}

/// Draw `text` wrapped and centered inside `region`.
///
/// Returns the wrapped lines so callers can log or inspect them.
pub fn draw_title(
    target: &mut RenderTarget,
    region: &Rect,
    text: &str,
    font: &TextFont,
    color: Rgba<u8>,
) -> Vec<String> {
    let lines = wrap_title(text, region.width, font);

    let line_height = LINE_HEIGHT * font.size();
    let block_height = line_height * lines.len() as f32;
    let block_top = region.y as f32 + (region.height as f32 - block_height) / 2.0;
    // Glyph box sits centered within its line box
    let glyph_offset = (line_height - font.glyph_height()) / 2.0;

    for (i, line) in lines.iter().enumerate() {
        let x = region.x as f32 + (region.width as f32 - font.measure(line)) / 2.0;
        let y = block_top + i as f32 * line_height + glyph_offset;
        font.draw_text(target, x, y, line, color);
    }

    if lines.len() > 1 {
        log::debug!("Title wrapped to {} lines", lines.len());
    }
    lines
}
