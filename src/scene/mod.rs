//! Scene derivation: pure functions from layer parameters to serializable
//! geometry. The three views (2D flow projection, 3D orbit scene, 3D
//! ensemble scene) share one visual style table instead of each carrying
//! its own switch on layer type.

pub mod ensemble;
pub mod flow;
pub mod orbit;

use serde::Serialize;

use crate::layer::{Layer, LayerKind};

pub type Point3 = [f64; 3];

/// One drawable primitive. Colors are CSS hex strings; opacity is 0..=1.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SceneElement {
    Sphere {
        center: Point3,
        radius: f64,
        color: String,
        opacity: f64,
    },
    Cuboid {
        center: Point3,
        dims: [f64; 3],
        color: String,
        opacity: f64,
    },
    Line {
        start: Point3,
        end: Point3,
        color: String,
        opacity: f64,
    },
    Label {
        position: Point3,
        text: String,
        size: f64,
    },
}

/// Shared per-kind visual style consumed by every renderer.
#[derive(Serialize, Copy, Clone, Debug, PartialEq)]
pub struct VisualStyle {
    pub color: &'static str,
    /// Sphere radius used when the layer is drawn as a single node.
    pub node_radius: f64,
}

pub const CONNECTION_COLOR: &str = "#8B5CF6";
const DEFAULT_COLOR: &str = "#6B7280";

pub fn style_for(kind: LayerKind) -> VisualStyle {
    let (color, node_radius) = match kind {
        LayerKind::Input => ("#8B5CF6", 0.8),
        LayerKind::Dense => ("#06B6D4", 0.6),
        LayerKind::Conv2d => ("#10B981", 0.7),
        LayerKind::Maxpool => ("#F59E0B", 0.5),
        LayerKind::Avgpool => ("#EF4444", 0.5),
        _ => (DEFAULT_COLOR, 0.5),
    };
    VisualStyle { color, node_radius }
}

/// Bias-magnitude color ramp used when a node is colored by its mean bias:
/// strongly negative red through neutral gray to strongly positive green.
pub fn bias_color(bias: f64) -> &'static str {
    if bias < -0.5 {
        "#EF4444"
    } else if bias < -0.2 {
        "#F97316"
    } else if bias < 0.2 {
        "#6B7280"
    } else if bias < 0.5 {
        "#3B82F6"
    } else {
        "#22C55E"
    }
}

/// Node color for a layer: bias-driven when biases exist, otherwise the
/// kind's style color.
pub fn layer_color(layer: &Layer) -> String {
    match layer.mean_bias() {
        Some(bias) => bias_color(bias).to_string(),
        None => style_for(layer.kind).color.to_string(),
    }
}
