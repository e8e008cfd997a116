//! Mirrored-bar waveform drawing.

use image::Rgba;

use super::layout::Rect;
use super::surface::RenderTarget;
use crate::waveform::PeakSeries;

/// Vertical inset inside the waveform band, as a fraction of its height.
const INNER_PAD: f32 = 0.1;

/// Source columns per extra pixel of bar width.
const BAR_WIDTH_DIVISOR: u32 = 800;

/// Map an amplitude in [-1, 1] to a canvas row; +1 is the top.
fn y_map(region: &Rect, v: f32) -> f32 {
    let h = region.height as f32;
    let inner = INNER_PAD * h;
    region.y as f32 + h - inner - (v + 1.0) / 2.0 * (h - 2.0 * inner)
}

/// Draw one bar per pixel column of `region`.
///
/// Empty-window columns are skipped; every other bar is at least 1px tall.
pub fn draw_waveform(target: &mut RenderTarget, region: &Rect, peaks: &PeakSeries, color: Rgba<u8>) {
    let n = peaks.len();
    if n == 0 || region.width == 0 {
        return;
    }
    let bar_width = (region.width / BAR_WIDTH_DIVISOR).max(1);

    for x in 0..region.width {
        let i = (x as usize * n) / region.width as usize;
        if peaks.is_empty_window(i) {
            continue;
        }
        let (lo, hi) = peaks.pair(i);
        let y_top = y_map(region, hi).round();
        let y_bottom = y_map(region, lo).round();
        let height = ((y_bottom - y_top).abs() as u32).max(1);

        target.fill_rect(
            (region.x + x) as i64,
            y_top.min(y_bottom) as i64,
            bar_width,
            height,
            color,
        );
    }
}
