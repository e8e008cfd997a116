//! MemoWindow core: turns an audio recording and a title into a printable
//! waveform image with a QR code linking back to the memory's play page.

pub mod audio;
pub mod config;
pub mod error;
pub mod names;
pub mod render;
pub mod synth;
pub mod types;
pub mod waveform;

pub use error::{DecodeError, QrError, SynthError};
pub use render::profile::RenderProfile;
pub use synth::{ImageBlob, Synthesizer};
pub use types::AudioSignal;
