//! Data preparation for the small inspector charts: weight-distribution
//! histograms and activation-function curves. Output is plain data for a
//! renderer to draw.

use serde::Serialize;

use crate::layer::LayerKind;

#[derive(Serialize, Copy, Clone, Debug, PartialEq)]
pub struct HistogramBin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

/// Bucket a weight matrix into equal-width bins over its observed extent.
/// Returns an empty vec for empty input or a degenerate extent.
pub fn weight_histogram(weights: &[Vec<f64>], bin_count: usize) -> Vec<HistogramBin> {
    let flat: Vec<f64> = weights.iter().flatten().copied().collect();
    if flat.is_empty() || bin_count == 0 {
        return Vec::new();
    }
    let min = flat.iter().copied().fold(f64::INFINITY, f64::min);
    let max = flat.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return Vec::new();
    }
    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            x0: min + i as f64 * width,
            x1: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for w in flat {
        let idx = (((w - min) / width) as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Number of bins used by the mini histogram in the metrics panel.
pub const MINI_HISTOGRAM_BINS: usize = 12;

/// Sample an activation function over [-5, 5] at 0.1 steps. Only relu,
/// sigmoid and tanh have curves in the panel; other kinds yield `None`.
pub fn activation_curve(kind: LayerKind) -> Option<Vec<(f64, f64)>> {
    let f: fn(f64) -> f64 = match kind {
        LayerKind::Relu => |x| x.max(0.0),
        LayerKind::Sigmoid => |x| 1.0 / (1.0 + (-x).exp()),
        LayerKind::Tanh => f64::tanh,
        _ => return None,
    };
    let samples = (0..=100)
        .map(|i| {
            let x = -5.0 + i as f64 * 0.1;
            (x, f(x))
        })
        .collect();
    Some(samples)
}
