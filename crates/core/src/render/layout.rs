//! Canvas geometry: title band, waveform band, and QR square.
//!
//! Top to bottom the canvas is: title, padding, waveform, padding, QR,
//! padding. The QR square is inset at the left padding.

use serde::{Deserialize, Serialize};

/// Rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }
}

/// Proportions that drive [`compute_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutFractions {
    /// Title band height / canvas height
    pub title: f32,
    /// QR square side / canvas height
    pub qr: f32,
    /// Padding / canvas width
    pub padding: f32,
    /// Waveform band width / canvas width
    pub waveform_width: f32,
}

impl Default for LayoutFractions {
    fn default() -> Self {
        Self {
            title: 0.13,
            qr: 0.2,
            padding: 0.02,
            waveform_width: 0.7,
        }
    }
}

impl LayoutFractions {
    /// Name of the first fraction outside [0, 1], if any.
    pub fn out_of_range(&self) -> Option<&'static str> {
        [
            ("title", self.title),
            ("qr", self.qr),
            ("padding", self.padding),
            ("waveform_width", self.waveform_width),
        ]
        .into_iter()
        .find(|(_, v)| !(0.0..=1.0).contains(v))
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Rect,
    pub waveform: Rect,
    pub qr: Rect,
    pub padding: u32,
}

/// Derive the three regions for a canvas.
///
/// Every region is at least 1×1 even for degenerate canvases; in that case
/// regions may overrun the canvas and drawing clips them.
pub fn compute_layout(canvas_width: u32, canvas_height: u32, fractions: &LayoutFractions) -> Layout {
    let w = canvas_width.max(1);
    let h = canvas_height.max(1);
    // Fractions outside [0, 1] are clamped so no region exceeds its dimension
    let scaled = |frac: f32, dim: u32| (frac.clamp(0.0, 1.0) * dim as f32).round() as u32;
    let raw_padding = scaled(fractions.padding, w);

    let title_h = scaled(fractions.title, h).max(1);
    let qr_size = scaled(fractions.qr, h)
        .min(w.saturating_sub(raw_padding.saturating_mul(2)))
        .max(1);
    // Wide, short canvases would otherwise spend the whole height on padding
    let padding = raw_padding.min(h.saturating_sub(title_h.saturating_add(qr_size).saturating_add(1)) / 3);

    let wave_w = scaled(fractions.waveform_width, w).clamp(1, w);
    let wave_h = h
        .saturating_sub(title_h)
        .saturating_sub(qr_size)
        .saturating_sub(padding.saturating_mul(3))
        .max(1);

    let title = Rect {
        x: padding,
        y: 0,
        width: w.saturating_sub(padding.saturating_mul(2)).max(1),
        height: title_h,
    };
    let waveform = Rect {
        x: (w - wave_w) / 2,
        y: title.bottom() + padding,
        width: wave_w,
        height: wave_h,
    };
    let qr = Rect {
        x: padding,
        y: waveform.bottom() + padding,
        width: qr_size,
        height: qr_size,
    };

    log::debug!(
        "Layout {}x{}: title={:?} waveform={:?} qr={:?} padding={}",
        w, h, title, waveform, qr, padding
    );

    Layout { title, waveform, qr, padding }
}
