use std::error::Error;

use crate::export::renderer;
use crate::network::Network;

pub fn render(network: &Network) -> Result<String, Box<dyn Error>> {
    renderer::render_template(network, &get_template())
}

pub fn get_template() -> String {
    // Mermaid node ids cannot carry the uuid-suffixed layer ids, so the
    // template uses the short mids from the diagram context.
    let template = r##"flowchart LR
{{#each nodes as |node|}}
  {{node.mid}}["{{{node.label}}}"]
  style {{node.mid}} fill:{{node.color}}
{{/each}}
{{#each edges as |edge|}}
  {{edge.source_mid}} --> {{edge.target_mid}}
{{/each}}
"##;
    template.to_string()
}
