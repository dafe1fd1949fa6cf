//! 2D node-link projection of the network for the drag-and-drop canvas.

use serde::Serialize;

use crate::layer::{LayerKind, Position};
use crate::network::Network;
use crate::scene::layer_color;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FlowNode {
    pub id: String,
    pub name: String,
    pub kind: LayerKind,
    pub position: Position,
    pub color: String,
    pub deletable: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct FlowProjection {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowProjection {
    pub fn from_network(network: &Network) -> Self {
        let nodes = network
            .layers()
            .map(|layer| FlowNode {
                id: layer.id.clone(),
                name: layer.name.clone(),
                kind: layer.kind,
                position: layer.position,
                color: layer_color(layer),
                deletable: layer.kind != LayerKind::Input,
            })
            .collect();
        let edges = network
            .edges()
            .map(|(source, target)| FlowEdge {
                id: format!("{}-{}", source, target),
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect();
        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_mirrors_layers_and_edges() {
        let mut network = Network::new("flow");
        let dense = network.add_layer(LayerKind::Dense);
        network.connect("input-1", &dense).unwrap();

        let projection = FlowProjection::from_network(&network);
        assert_eq!(projection.nodes.len(), 2);
        assert_eq!(projection.edges.len(), 1);
        assert_eq!(projection.nodes[0].id, "input-1");
        assert!(!projection.nodes[0].deletable);
        assert!(projection.nodes[1].deletable);
        assert_eq!(projection.edges[0].source, "input-1");
        assert_eq!(projection.edges[0].target, dense);
        assert_eq!(projection.edges[0].id, format!("input-1-{}", dense));
    }

    #[test]
    fn node_positions_come_from_the_canvas() {
        let network = Network::new("pos");
        let projection = FlowProjection::from_network(&network);
        assert!((projection.nodes[0].position.x - 100.0).abs() < f64::EPSILON);
        assert!((projection.nodes[0].position.y - 100.0).abs() < f64::EPSILON);
    }
}
