//! Orbit scene: one sphere per layer arranged on a rising circle, with a
//! line per connection. This is the coarse 3D overview.

use serde::Serialize;
use std::f64::consts::PI;

use crate::network::Network;
use crate::scene::{style_for, Point3, SceneElement, CONNECTION_COLOR};

const ORBIT_RADIUS: f64 = 3.0;
const VERTICAL_STEP: f64 = 1.5;
const LABEL_SIZE: f64 = 0.2;

#[derive(Serialize, Clone, Debug, Default)]
pub struct OrbitScene {
    pub elements: Vec<SceneElement>,
}

/// Position of the `index`-th of `count` layers on the orbit.
pub fn layer_position(index: usize, count: usize) -> Point3 {
    let angle = index as f64 / count.max(1) as f64 * 2.0 * PI;
    [
        angle.cos() * ORBIT_RADIUS,
        (index as f64 - count as f64 / 2.0) * VERTICAL_STEP,
        angle.sin() * ORBIT_RADIUS,
    ]
}

impl OrbitScene {
    pub fn from_network(network: &Network) -> Self {
        let count = network.len();
        let positions: Vec<(&str, Point3)> = network
            .layers()
            .enumerate()
            .map(|(index, layer)| (layer.id.as_str(), layer_position(index, count)))
            .collect();

        let mut elements = Vec::new();
        for (index, layer) in network.layers().enumerate() {
            let style = style_for(layer.kind);
            let center = positions[index].1;
            elements.push(SceneElement::Sphere {
                center,
                radius: style.node_radius,
                color: style.color.to_string(),
                opacity: 0.8,
            });
            elements.push(SceneElement::Label {
                position: [center[0], center[1] - 1.0, center[2]],
                text: layer.name.clone(),
                size: LABEL_SIZE,
            });
        }

        for (source, target) in network.edges() {
            let start = positions.iter().find(|(id, _)| *id == source);
            let end = positions.iter().find(|(id, _)| *id == target);
            if let (Some((_, start)), Some((_, end))) = (start, end) {
                elements.push(SceneElement::Line {
                    start: *start,
                    end: *end,
                    color: CONNECTION_COLOR.to_string(),
                    opacity: 0.6,
                });
            }
        }

        Self { elements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerKind;

    #[test]
    fn positions_sit_on_the_orbit_circle() {
        let p = layer_position(0, 4);
        assert!((p[0] - ORBIT_RADIUS).abs() < 1e-9);
        assert!((p[2]).abs() < 1e-9);
        assert!((p[1] - -3.0).abs() < 1e-9);

        let q = layer_position(1, 4);
        assert!((q[0]).abs() < 1e-9);
        assert!((q[2] - ORBIT_RADIUS).abs() < 1e-9);
    }

    #[test]
    fn scene_has_a_sphere_and_label_per_layer_plus_edge_lines() {
        let mut network = Network::new("orbit");
        let dense = network.add_layer(LayerKind::Dense);
        network.connect("input-1", &dense).unwrap();

        let scene = OrbitScene::from_network(&network);
        let spheres = scene
            .elements
            .iter()
            .filter(|e| matches!(e, SceneElement::Sphere { .. }))
            .count();
        let labels = scene
            .elements
            .iter()
            .filter(|e| matches!(e, SceneElement::Label { .. }))
            .count();
        let lines = scene
            .elements
            .iter()
            .filter(|e| matches!(e, SceneElement::Line { .. }))
            .count();
        assert_eq!(spheres, 2);
        assert_eq!(labels, 2);
        assert_eq!(lines, 1);
    }

    #[test]
    fn sphere_sizes_follow_the_style_table() {
        let network = Network::new("sizes");
        let scene = OrbitScene::from_network(&network);
        match &scene.elements[0] {
            SceneElement::Sphere { radius, color, .. } => {
                assert!((radius - 0.8).abs() < f64::EPSILON);
                assert_eq!(color, "#8B5CF6");
            }
            other => panic!("expected sphere, got {:?}", other),
        }
    }
}
