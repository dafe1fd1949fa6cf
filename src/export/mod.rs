pub mod to_dot;
pub mod to_json;
pub mod to_mermaid;

use std::error::Error;

use clap::ValueEnum;

use crate::network::Network;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Dot,
    Mermaid,
}

pub fn render(network: &Network, format: ExportFormat) -> Result<String, Box<dyn Error>> {
    match format {
        ExportFormat::Json => to_json::render(network),
        ExportFormat::Dot => to_dot::render(network),
        ExportFormat::Mermaid => to_mermaid::render(network),
    }
}

/// Shared template plumbing for the diagram exporters.
pub mod renderer {
    use handlebars::Handlebars;
    use serde_json::{json, Value};

    use crate::network::Network;
    use crate::scene::flow::FlowProjection;

    pub fn get_handlebars() -> Handlebars<'static> {
        Handlebars::new()
    }

    /// Standard context for diagram templates. Each node carries the raw
    /// layer id plus a short `mid` (n0, n1, ...) for formats that cannot
    /// cope with arbitrary id characters; edges carry both spellings.
    pub fn diagram_context(network: &Network) -> Value {
        let projection = FlowProjection::from_network(network);
        let mid_of = |id: &str| {
            projection
                .nodes
                .iter()
                .position(|n| n.id == id)
                .map(|i| format!("n{}", i))
                .unwrap_or_default()
        };
        let nodes: Vec<Value> = projection
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                json!({
                    "id": node.id,
                    "mid": format!("n{}", i),
                    "label": node.name,
                    "kind": node.kind,
                    "color": node.color,
                })
            })
            .collect();
        let edges: Vec<Value> = projection
            .edges
            .iter()
            .map(|edge| {
                json!({
                    "source": edge.source,
                    "target": edge.target,
                    "source_mid": mid_of(&edge.source),
                    "target_mid": mid_of(&edge.target),
                })
            })
            .collect();
        json!({
            "name": network.name,
            "nodes": nodes,
            "edges": edges,
        })
    }

    pub fn render_template(
        network: &Network,
        template: &str,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let handlebars = get_handlebars();
        let res = handlebars.render_template(template, &diagram_context(network))?;
        Ok(res)
    }
}
