//! Render a preview image of a synthetic recording without touching the network.
//!
//! Run with: cargo run -p memowindow-core --example render_demo -- out.png

use memowindow_core::render::QrFetcher;
use memowindow_core::{AudioSignal, QrError, RenderProfile, Synthesizer};

/// Always fails, so the placeholder QR square is drawn.
struct OfflineFetcher;

impl QrFetcher for OfflineFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, QrError> {
        Err(QrError::Status(503))
    }
}

fn main() {
    let output = std::env::args().nth(1).unwrap_or_else(|| "render_demo.png".to_string());

    // 3 seconds of a 220 Hz tone under a slow swell, like a held note
    let sr = 16000u32;
    let samples: Vec<f64> = (0..sr * 3)
        .map(|i| {
            let t = i as f64 / sr as f64;
            let envelope = (std::f64::consts::PI * t / 3.0).sin();
            envelope * (std::f64::consts::TAU * 220.0 * t).sin()
        })
        .collect();
    let signal = AudioSignal::new(samples, sr);

    let synth = Synthesizer::new(Box::new(OfflineFetcher));
    match synth.synthesize(&signal, "Render demo", Some("offline://qr"), &RenderProfile::preview()) {
        Ok(blob) => {
            if let Err(e) = std::fs::write(&output, &blob.png) {
                eprintln!("Failed to write {}: {}", output, e);
                std::process::exit(1);
            }
            println!("Wrote {} ({}x{}, sha256 {})", output, blob.width, blob.height, blob.sha256);
        }
        Err(e) => {
            eprintln!("Synthesis failed: {}", e);
            std::process::exit(1);
        }
    }
}
