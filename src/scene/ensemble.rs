//! Ensemble scene: the detailed 3D view. Dense layers expand to one sphere
//! per unit with fully-connected lines to a following dense layer, conv2d
//! layers to a grid of filter cuboids, input and pooling layers to a single
//! cuboid sized from their parameters.

use serde::Serialize;

use crate::layer::{Layer, LayerKind};
use crate::network::Network;
use crate::scene::{style_for, Point3, SceneElement, CONNECTION_COLOR};

const LAYER_SPACING: f64 = 4.0;
const UNIT_RADIUS: f64 = 0.1;
const UNIT_SPACING: f64 = 0.3;
const FILTER_SPACING: f64 = 0.2;
/// Filters beyond this are not drawn; large conv layers would swamp the view.
const MAX_DRAWN_FILTERS: usize = 16;
const LABEL_SIZE: f64 = 0.15;

#[derive(Serialize, Clone, Debug, Default)]
pub struct EnsembleScene {
    pub elements: Vec<SceneElement>,
}

impl EnsembleScene {
    pub fn from_network(network: &Network) -> Self {
        let layers: Vec<&Layer> = network.layers().collect();
        let mut elements = Vec::new();
        for (index, layer) in layers.iter().enumerate() {
            let next = layers.get(index + 1).copied();
            describe_layer(layer, index, next, &mut elements);
        }
        Self { elements }
    }
}

fn base_x(index: usize) -> f64 {
    index as f64 * LAYER_SPACING
}

fn unit_positions(layer: &Layer, index: usize) -> Vec<Point3> {
    let units = layer.params.units.unwrap_or(1) as usize;
    let start_y = -((units as f64 - 1.0) * UNIT_SPACING) / 2.0;
    (0..units)
        .map(|i| [base_x(index), start_y + i as f64 * UNIT_SPACING, 0.0])
        .collect()
}

fn describe_layer(
    layer: &Layer,
    index: usize,
    next: Option<&Layer>,
    elements: &mut Vec<SceneElement>,
) {
    let style = style_for(layer.kind);
    match layer.kind {
        LayerKind::Dense => {
            let positions = unit_positions(layer, index);
            for center in &positions {
                elements.push(SceneElement::Sphere {
                    center: *center,
                    radius: UNIT_RADIUS,
                    color: style.color.to_string(),
                    opacity: 0.8,
                });
            }
            if let Some(next) = next.filter(|n| n.kind == LayerKind::Dense) {
                let next_positions = unit_positions(next, index + 1);
                for start in &positions {
                    for end in &next_positions {
                        elements.push(SceneElement::Line {
                            start: *start,
                            end: *end,
                            color: CONNECTION_COLOR.to_string(),
                            opacity: 0.2,
                        });
                    }
                }
            }
            let label_y = positions.first().map(|p| p[1]).unwrap_or(0.0) - 0.8;
            elements.push(SceneElement::Label {
                position: [base_x(index), label_y, 0.0],
                text: layer.name.clone(),
                size: LABEL_SIZE,
            });
        }
        LayerKind::Conv2d => {
            let filters = layer.params.filters.unwrap_or(32) as usize;
            let [kh, kw] = layer.params.kernel_size.unwrap_or([3, 3]);
            let dims = [f64::from(kh) * 0.1, f64::from(kw) * 0.1, 0.05];
            let per_row = (filters as f64).sqrt().ceil() as usize;
            let grid_half = per_row as f64 * FILTER_SPACING / 2.0;
            for i in 0..filters.min(MAX_DRAWN_FILTERS) {
                let row = i / per_row;
                let col = i % per_row;
                elements.push(SceneElement::Cuboid {
                    center: [
                        base_x(index) + col as f64 * FILTER_SPACING,
                        row as f64 * FILTER_SPACING - grid_half,
                        0.0,
                    ],
                    dims,
                    color: style.color.to_string(),
                    opacity: 0.7,
                });
            }
            elements.push(SceneElement::Label {
                position: [base_x(index), -grid_half - 0.5, 0.0],
                text: layer.name.clone(),
                size: LABEL_SIZE,
            });
        }
        LayerKind::Input => {
            let shape = layer
                .params
                .input_shape
                .clone()
                .unwrap_or_else(|| vec![28, 28, 1]);
            let h = f64::from(*shape.first().unwrap_or(&28)).min(10.0);
            let w = f64::from(*shape.get(1).unwrap_or(&28)).min(10.0);
            let c = f64::from(*shape.get(2).unwrap_or(&1));
            elements.push(SceneElement::Cuboid {
                center: [base_x(index), 0.0, 0.0],
                dims: [h * 0.02, w * 0.02, c * 0.05],
                color: style.color.to_string(),
                opacity: 0.7,
            });
            elements.push(SceneElement::Label {
                position: [base_x(index), -0.8, 0.0],
                text: layer.name.clone(),
                size: LABEL_SIZE,
            });
        }
        LayerKind::Maxpool | LayerKind::Avgpool => {
            let [ph, pw] = layer.params.pool_size.unwrap_or([2, 2]);
            elements.push(SceneElement::Cuboid {
                center: [base_x(index), 0.0, 0.0],
                dims: [f64::from(ph) * 0.1, f64::from(pw) * 0.1, 0.1],
                color: style.color.to_string(),
                opacity: 0.7,
            });
            elements.push(SceneElement::Label {
                position: [base_x(index), -0.8, 0.0],
                text: layer.name.clone(),
                size: LABEL_SIZE,
            });
        }
        _ => {
            elements.push(SceneElement::Sphere {
                center: [base_x(index), 0.0, 0.0],
                radius: 0.2,
                color: style.color.to_string(),
                opacity: 0.8,
            });
        }
    }
}
