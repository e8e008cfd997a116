//! Memory image synthesis: title, waveform, and QR code on one canvas.

use std::path::Path;
use std::time::Instant;

use sha2::{Digest, Sha256};

use crate::audio::decode_file;
use crate::error::SynthError;
use crate::render::font::TextFont;
use crate::render::layout::compute_layout;
use crate::render::profile::{Palette, RenderProfile};
use crate::render::qr::{draw_qr_or_placeholder, QrFetcher};
use crate::render::surface::RenderTarget;
use crate::render::title::draw_title;
use crate::render::waveform::draw_waveform;
use crate::types::{AudioSignal, QrOutcome};
use crate::waveform::compute_peaks;

/// Encoded output of one synthesis call.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// SHA-256 of `png`, lowercase hex
    pub sha256: String,
    pub qr: QrOutcome,
}

/// Renders memory images. Holds only the QR fetcher, so one instance can
/// serve many concurrent calls.
pub struct Synthesizer {
    fetcher: Box<dyn QrFetcher>,
}

impl Synthesizer {
    pub fn new(fetcher: Box<dyn QrFetcher>) -> Self {
        Self { fetcher }
    }

    /// Render `signal` and `title` at `profile`'s resolution.
    ///
    /// `qr_url` is the QR service URL to composite; `None` draws the
    /// placeholder. QR failures never fail the call.
    pub fn synthesize(
        &self,
        signal: &AudioSignal,
        title: &str,
        qr_url: Option<&str>,
        profile: &RenderProfile,
    ) -> Result<ImageBlob, SynthError> {
        let started = Instant::now();
        let palette = &profile.palette;

        let mut target = RenderTarget::new(
            profile.width,
            profile.height,
            Palette::rgba(palette.background),
        );
        let layout = compute_layout(target.width(), target.height(), &profile.fractions);

        let peaks = compute_peaks(signal.samples(), layout.waveform.width as usize);
        let font = TextFont::embedded(profile.font_size())?;

        draw_title(&mut target, &layout.title, title, &font, Palette::rgba(palette.title));
        draw_waveform(&mut target, &layout.waveform, &peaks, Palette::rgba(palette.waveform));
        let qr = draw_qr_or_placeholder(
            &mut target,
            layout.qr.x,
            layout.qr.y,
            layout.qr.width,
            qr_url,
            self.fetcher.as_ref(),
            palette,
        );
        log::debug!("Drew {} canvas in {:?}", profile.name, started.elapsed());

        let png = target.encode_png()?;
        let sha256 = format!("{:x}", Sha256::digest(&png));
        log::debug!(
            "Encoded {} PNG: {} bytes ({}...) in {:?}",
            profile.name,
            png.len(),
            &sha256[..12],
            started.elapsed()
        );

        Ok(ImageBlob {
            png,
            width: target.width(),
            height: target.height(),
            sha256,
            qr,
        })
    }

    /// Decode `path`, then render it. Decode failures abort before drawing.
    pub fn synthesize_file(
        &self,
        path: &Path,
        title: &str,
        qr_url: Option<&str>,
        profile: &RenderProfile,
    ) -> Result<ImageBlob, SynthError> {
        let signal = decode_file(path)?;
        self.synthesize(&signal, title, qr_url, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::render::layout::LayoutFractions;
    use crate::render::qr::tests::{fake_qr_png, StaticQrFetcher};
    use crate::render::qr::HttpQrFetcher;
    use crate::render::title::LINE_HEIGHT;
    use image::Rgba;
    use std::time::Duration;

    fn decode(blob: &ImageBlob) -> image::RgbaImage {
        image::load_from_memory(&blob.png).unwrap().to_rgba8()
    }

    fn sine(seconds: f64, sr: u32) -> AudioSignal {
        let n = (seconds * sr as f64) as usize;
        let samples = (0..n)
            .map(|i| 0.8 * (std::f64::consts::TAU * 220.0 * i as f64 / sr as f64).sin())
            .collect();
        AudioSignal::new(samples, sr)
    }

    #[test]
    fn test_silent_print_end_to_end() {
        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let profile = RenderProfile::print();
        let blob = synth
            .synthesize(&AudioSignal::silence(1.0, 44100), "Test", None, &profile)
            .unwrap();

        assert_eq!((blob.width, blob.height), (3600, 2400));
        assert_eq!(&blob.png[0..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(blob.qr, QrOutcome::Placeholder);

        let img = decode(&blob);
        assert_eq!(img.dimensions(), (3600, 2400));

        let palette = &profile.palette;
        let layout = compute_layout(3600, 2400, &LayoutFractions::default());

        // Placeholder square in the bottom-left inset
        let fill = Rgba(palette.placeholder_fill);
        assert_eq!(*img.get_pixel(layout.qr.x + 20, layout.qr.y + 20), fill);
        assert_eq!(*img.get_pixel(layout.qr.x + 20, layout.qr.bottom() - 20), fill);
        assert_eq!(*img.get_pixel(layout.qr.x - 1, layout.qr.y + 20), Rgba(palette.background));

        // Flat waveform: a 1px line through the band's middle, nothing above or below
        let ink = Rgba(palette.waveform);
        let mid = 1080;
        let x = 1800;
        assert_eq!(*img.get_pixel(x, mid), ink);
        assert_eq!(*img.get_pixel(x, mid - 2), Rgba(palette.background));
        assert_eq!(*img.get_pixel(x, mid + 2), Rgba(palette.background));
        assert_eq!(*img.get_pixel(x, layout.waveform.y + 200), Rgba(palette.background));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let profile = RenderProfile::preview();
        let signal = sine(0.5, 16000);

        let a = synth.synthesize(&signal, "Our song", Some("http://qr.test/a"), &profile).unwrap();
        let b = synth.synthesize(&signal, "Our song", Some("http://qr.test/a"), &profile).unwrap();
        assert_eq!(a.png, b.png);
        assert_eq!(a.sha256, b.sha256);
        assert_eq!(a.sha256.len(), 64);
    }

    #[test]
    fn test_fetched_qr_lands_in_qr_region() {
        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let profile = RenderProfile::preview();
        let blob = synth
            .synthesize(&sine(0.25, 8000), "Hi", Some("http://qr.test/a"), &profile)
            .unwrap();
        assert_eq!(blob.qr, QrOutcome::Fetched);

        let img = decode(&blob);
        let layout = compute_layout(600, 400, &profile.fractions);
        assert_eq!(*img.get_pixel(layout.qr.x, layout.qr.y), Rgba([0, 0, 0, 255]));
        assert_eq!(
            *img.get_pixel(layout.qr.right() - 1, layout.qr.bottom() - 1),
            Rgba([255, 255, 255, 255])
        );
    }

    #[test]
    fn test_invalid_qr_url_still_renders() {
        let synth = Synthesizer::new(Box::new(HttpQrFetcher::new(Duration::from_secs(5)).unwrap()));
        let profile = RenderProfile::preview();
        let blob = synth
            .synthesize(&sine(0.25, 8000), "Fallback", Some("http://127.0.0.1:9/nope"), &profile)
            .unwrap();
        assert_eq!(blob.qr, QrOutcome::Placeholder);
        assert_eq!(decode(&blob).dimensions(), (600, 400));
    }

    #[test]
    fn test_loud_signal_fills_waveform_band() {
        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let profile = RenderProfile::preview();
        let loud = AudioSignal::new(
            (0..16000).map(|i| if i % 2 == 0 { 0.8 } else { -0.8 }).collect(),
            16000,
        );
        let blob = synth.synthesize(&loud, "", None, &profile).unwrap();

        let img = decode(&blob);
        let layout = compute_layout(600, 400, &profile.fractions);
        let ink = Rgba(profile.palette.waveform);
        let cx = layout.waveform.x + layout.waveform.width / 2;
        let quarter = layout.waveform.y + layout.waveform.height / 4;
        assert_eq!(*img.get_pixel(cx, quarter), ink);
        assert_eq!(*img.get_pixel(layout.waveform.x - 2, quarter), Rgba(profile.palette.background));
    }

    #[test]
    fn test_long_title_wraps_within_title_band() {
        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let profile = RenderProfile::print();
        let blob = synth
            .synthesize(
                &AudioSignal::silence(0.1, 8000),
                "This is a very long memory title that should wrap across multiple lines",
                None,
                &profile,
            )
            .unwrap();

        let img = decode(&blob);
        let layout = compute_layout(3600, 2400, &profile.fractions);
        let bg = Rgba(profile.palette.background);
        let rows: Vec<u32> = (0..layout.title.bottom())
            .filter(|&y| (0..3600).step_by(2).any(|x| *img.get_pixel(x, y) != bg))
            .collect();
        assert!(!rows.is_empty());

        // Ink spans more than one line box
        let first = rows[0];
        let last = *rows.last().unwrap();
        let line_height = (LINE_HEIGHT * profile.font_size()) as u32;
        assert!(last - first > line_height, "ink spans {}..{}", first, last);
        let above = first;
        let below = layout.title.bottom() - (last + 1);
        assert!(above.abs_diff(below) <= 24, "above={} below={}", above, below);
    }

    #[test]
    fn test_accented_title_renders_distinct_pixels() {
        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let profile = RenderProfile::preview();
        let signal = AudioSignal::silence(0.1, 8000);
        let accented = synth.synthesize(&signal, "Mamá José", None, &profile).unwrap();
        let fallback = synth.synthesize(&signal, "Mam? Jos?", None, &profile).unwrap();
        assert_ne!(accented.sha256, fallback.sha256);
    }

    #[test]
    fn test_decode_failure_is_typed() {
        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let err = synth
            .synthesize_file(Path::new("/no/such/recording.mp3"), "x", None, &RenderProfile::preview())
            .unwrap_err();
        assert!(matches!(err, SynthError::Decode(DecodeError::Open { .. })));
    }

    #[test]
    fn test_synthesize_file_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        crate::audio::write_wav(&path, sine(0.5, 16000).samples(), 16000).unwrap();

        let synth = Synthesizer::new(Box::new(StaticQrFetcher(fake_qr_png())));
        let blob = synth
            .synthesize_file(&path, "Voice", Some("http://qr.test/v"), &RenderProfile::preview())
            .unwrap();
        assert_eq!((blob.width, blob.height), (600, 400));
        assert_eq!(blob.qr, QrOutcome::Fetched);
    }

    #[test]
    fn test_synthesizer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Synthesizer>();
    }
}
