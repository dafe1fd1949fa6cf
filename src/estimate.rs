//! Closed-form per-layer parameter/FLOP figures.
//!
//! These are illustrative numbers, not real tensor-shape propagation: dense
//! layers assume a fixed input width of 128 and conv2d layers assume 3 input
//! channels and a 28x28 feature map, regardless of what actually feeds them.

use indexmap::IndexMap;
use serde::Serialize;

use crate::layer::{Layer, LayerKind};
use crate::network::Network;

/// Input width assumed by the dense estimator.
pub const ESTIMATOR_INPUT_WIDTH: u64 = 128;

const ESTIMATOR_CONV_CHANNELS: u64 = 3;
const ESTIMATOR_FEATURE_MAP: u64 = 28;

#[derive(Serialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerFigures {
    pub parameters: u64,
    pub outputs: u64,
    pub flops: u64,
}

/// Per-layer figures. Kinds other than dense and conv2d report zeros.
pub fn layer_figures(layer: &Layer) -> LayerFigures {
    match layer.kind {
        LayerKind::Dense => {
            let units = u64::from(layer.params.units.unwrap_or(0));
            LayerFigures {
                parameters: units * ESTIMATOR_INPUT_WIDTH + units,
                outputs: units,
                flops: units * ESTIMATOR_INPUT_WIDTH * 2,
            }
        }
        LayerKind::Conv2d => {
            let filters = u64::from(layer.params.filters.unwrap_or(0));
            let [kh, kw] = layer.params.kernel_size.unwrap_or([3, 3]);
            let kernel = u64::from(kh) * u64::from(kw);
            LayerFigures {
                parameters: filters * kernel * ESTIMATOR_CONV_CHANNELS + filters,
                outputs: filters,
                flops: filters * kernel * ESTIMATOR_FEATURE_MAP * ESTIMATOR_FEATURE_MAP,
            }
        }
        _ => LayerFigures::default(),
    }
}

/// Whole-architecture roll-up shown in the metrics panel.
#[derive(Serialize, Clone, Debug, Default)]
pub struct NetworkSummary {
    pub total_layers: usize,
    pub total_parameters: u64,
    /// Sum of dense units and conv2d filters.
    pub unit_count: u64,
    pub kind_counts: IndexMap<String, usize>,
}

pub fn summarize(network: &Network) -> NetworkSummary {
    let mut summary = NetworkSummary {
        total_layers: network.len(),
        ..Default::default()
    };
    for layer in network.layers() {
        summary.total_parameters += layer_figures(layer).parameters;
        summary.unit_count += match layer.kind {
            LayerKind::Dense => u64::from(layer.params.units.unwrap_or(0)),
            LayerKind::Conv2d => u64::from(layer.params.filters.unwrap_or(0)),
            _ => 0,
        };
        *summary
            .kind_counts
            .entry(layer.kind.as_str().to_string())
            .or_insert(0) += 1;
    }
    summary
}
