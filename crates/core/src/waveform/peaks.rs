//! Per-column (min, max) peak extraction.

use serde::{Deserialize, Serialize};

/// Sentinel pair stored for a window that covered no samples.
pub const EMPTY_WINDOW: (f32, f32) = (1.0, -1.0);

/// One (min, max) pair per output column.
///
/// `min[i] <= max[i]` for every non-empty window; empty windows hold
/// [`EMPTY_WINDOW`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSeries {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
    /// How many source samples each window covers.
    pub hop: usize,
}

impl PeakSeries {
    /// Number of columns.
    pub fn len(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    /// (min, max) for column `i`.
    pub fn pair(&self, i: usize) -> (f32, f32) {
        (self.min[i], self.max[i])
    }

    /// Whether column `i` holds the empty-window sentinel.
    pub fn is_empty_window(&self, i: usize) -> bool {
        self.min[i] > self.max[i]
    }
}

/// Reduce `samples` to `width` (min, max) pairs.
///
/// Windows are `hop = max(1, N / width)` samples long, so when `N` is not a
/// multiple of `width` the trailing `N - width*hop` samples are not read.
/// A `width` of 0 is treated as 1.
pub fn compute_peaks(samples: &[f64], width: usize) -> PeakSeries {
    let width = width.max(1);
    let n = samples.len();
    let hop = (n / width).max(1);

    let mut min = Vec::with_capacity(width);
    let mut max = Vec::with_capacity(width);

    for i in 0..width {
        let start = (i * hop).min(n);
        let end = ((i + 1) * hop).min(n);

        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &s in &samples[start..end] {
            if s < lo { lo = s; }
            if s > hi { hi = s; }
        }

        if start < end {
            min.push(lo as f32);
            max.push(hi as f32);
        } else {
            min.push(EMPTY_WINDOW.0);
            max.push(EMPTY_WINDOW.1);
        }
    }

    PeakSeries { min, max, hop }
}
