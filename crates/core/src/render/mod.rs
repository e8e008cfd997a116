//! Raster drawing stages for the memory image.

pub mod font;
pub mod layout;
pub mod profile;
pub mod qr;
pub mod surface;
pub mod title;
pub mod waveform;

pub use font::TextFont;
pub use layout::{compute_layout, Layout, LayoutFractions, Rect};
pub use profile::{Palette, RenderProfile};
pub use qr::{draw_qr_or_placeholder, qr_service_url, HttpQrFetcher, QrFetcher};
pub use surface::RenderTarget;
