//! QR region: composite the service's QR image, or a local placeholder.
//!
//! One fetch attempt is made per render. Any failure (network, timeout,
//! non-image body) falls back to the placeholder so a render always
//! completes.

use std::time::Duration;

use image::imageops::FilterType;
use image::RgbaImage;

use super::font::TextFont;
use super::profile::Palette;
use super::surface::RenderTarget;
use crate::error::QrError;
use crate::types::QrOutcome;

const PLACEHOLDER_LABEL: &str = "QR Code";

/// Placeholder label size relative to the square's side.
const PLACEHOLDER_FONT_FRACTION: f32 = 0.12;

/// Source of QR image bytes.
pub trait QrFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, QrError>;
}

/// Fetches QR images over HTTP with a hard timeout.
pub struct HttpQrFetcher {
    client: reqwest::blocking::Client,
}

impl HttpQrFetcher {
    pub fn new(timeout: Duration) -> Result<Self, QrError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl QrFetcher for HttpQrFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, QrError> {
        log::debug!("Fetching QR image: {}", url);
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(QrError::Status(response.status().as_u16()));
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Build a QR service URL encoding `data` at `size × size` pixels.
pub fn qr_service_url(endpoint: &str, data: &str, size: u32) -> Result<String, QrError> {
    let dims = format!("{}x{}", size, size);
    let url = url::Url::parse_with_params(
        endpoint,
        &[("size", dims.as_str()), ("margin", "1"), ("data", data)],
    )?;
    Ok(url.into())
}

/// Fetch `url` and draw it scaled into the `size × size` square at (x, y).
pub fn draw_qr_code(
    target: &mut RenderTarget,
    x: u32,
    y: u32,
    size: u32,
    url: &str,
    fetcher: &dyn QrFetcher,
) -> Result<(), QrError> {
    let bytes = fetcher.fetch(url)?;
    let qr = load_qr_image(&bytes, size)?;
    target.draw_image(&qr, x as i64, y as i64);
    Ok(())
}

/// Decode and scale a QR image. Nearest-neighbour keeps modules crisp.
fn load_qr_image(bytes: &[u8], size: u32) -> Result<RgbaImage, QrError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    if decoded.dimensions() == (size, size) {
        return Ok(decoded);
    }
    Ok(image::imageops::resize(&decoded, size, size, FilterType::Nearest))
}

/// Light-gray bordered square with a centered "QR Code" label.
pub fn draw_qr_placeholder(target: &mut RenderTarget, x: u32, y: u32, size: u32, palette: &Palette) {
    target.fill_rect(x as i64, y as i64, size, size, Palette::rgba(palette.placeholder_fill));
    let border = (size / 120).max(1);
    target.stroke_rect(x as i64, y as i64, size, size, border, Palette::rgba(palette.placeholder_border));

    let font = match TextFont::embedded(size as f32 * PLACEHOLDER_FONT_FRACTION) {
        Ok(font) => font,
        Err(e) => {
            log::warn!("Placeholder label skipped: {}", e);
            return;
        }
    };
    font.draw_text(
        target,
        x as f32 + (size as f32 - font.measure(PLACEHOLDER_LABEL)) / 2.0,
        y as f32 + (size as f32 - font.glyph_height()) / 2.0,
        PLACEHOLDER_LABEL,
        Palette::rgba(palette.placeholder_text),
    );
}

/// Try the external QR image, else draw the placeholder. Never fails.
pub fn draw_qr_or_placeholder(
    target: &mut RenderTarget,
    x: u32,
    y: u32,
    size: u32,
    url: Option<&str>,
    fetcher: &dyn QrFetcher,
    palette: &Palette,
) -> QrOutcome {
    let Some(url) = url else {
        draw_qr_placeholder(target, x, y, size, palette);
        return QrOutcome::Placeholder;
    };

    match draw_qr_code(target, x, y, size, url, fetcher) {
        Ok(()) => QrOutcome::Fetched,
        Err(e) => {
            log::warn!("QR image unavailable ({}); drawing placeholder", e);
            draw_qr_placeholder(target, x, y, size, palette);
            QrOutcome::Placeholder
        }
    }
}
