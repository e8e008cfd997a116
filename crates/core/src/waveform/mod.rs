//! Waveform reduction for display.

pub mod peaks;

pub use peaks::{compute_peaks, PeakSeries, EMPTY_WINDOW};
