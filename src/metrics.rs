//! Synthetic training curves for the metrics panel.
//!
//! There is no training anywhere in this tool; the curves are generated
//! noise shaped like a typical run so the panel has something to plot.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainingMetrics {
    pub epoch: u32,
    pub loss: f64,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_accuracy: Option<f64>,
}

/// The default run length shown in the panel.
pub const DEFAULT_EPOCHS: u32 = 50;

/// Generate a plausible-looking run: loss decays toward a floor, accuracy
/// climbs toward a ceiling, validation tracks both with more jitter.
pub fn synthetic_run(epochs: u32) -> Vec<TrainingMetrics> {
    let mut rng = rand::thread_rng();
    (0..epochs)
        .map(|i| {
            let i = f64::from(i);
            TrainingMetrics {
                epoch: i as u32 + 1,
                loss: (2.0 - i * 0.03 + rng.gen::<f64>() * 0.1).max(0.1),
                accuracy: (i * 0.018 + rng.gen::<f64>() * 0.02).min(0.95),
                val_loss: Some((2.2 - i * 0.035 + rng.gen::<f64>() * 0.15).max(0.15)),
                val_accuracy: Some((i * 0.015 + rng.gen::<f64>() * 0.03).min(0.92)),
            }
        })
        .collect()
}
