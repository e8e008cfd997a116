use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Decoded mono audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Samples in [-1, 1]
    samples: Vec<f64>,
    /// Samples per second
    sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// `seconds` of digital silence.
    pub fn silence(seconds: f64, sample_rate: u32) -> Self {
        let n = (seconds * sample_rate as f64).round() as usize;
        Self::new(vec![0.0; n], sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_s(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// A memory as the surrounding app knows it: the thing a QR code points at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    pub id: Uuid,
    pub title: String,
    /// Public play page encoded into the QR code
    pub play_url: String,
}

impl Memory {
    /// New memory with a random id and a play URL under `play_base_url`.
    pub fn new(title: &str, play_base_url: &str) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            title: title.to_string(),
            play_url: crate::config::play_page_url(play_base_url, &id),
        }
    }
}

/// How the QR region of an image was filled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QrOutcome {
    /// The service image was fetched and composited.
    Fetched,
    /// The local gray placeholder was drawn.
    Placeholder,
}

/// One image written by a render run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputImage {
    pub profile: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// SHA-256 of the PNG bytes
    pub sha256: String,
    pub qr: QrOutcome,
}

/// Summary of rendering one source recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub memory: Memory,
    pub source: PathBuf,
    pub sample_rate: u32,
    pub duration_s: f64,
    pub images: Vec<OutputImage>,
}
