use std::error::Error;

use crate::export::renderer;
use crate::network::Network;

pub fn render(network: &Network) -> Result<String, Box<dyn Error>> {
    renderer::render_template(network, &get_template())
}

pub fn get_template() -> String {
    let template = r##"digraph "{{name}}" {
  rankdir=LR;
  node [shape=box, style="rounded,filled", fontcolor=white];
{{#each nodes as |node|}}
  "{{{node.id}}}" [label="{{{node.label}}}", fillcolor="{{node.color}}"];
{{/each}}
{{#each edges as |edge|}}
  "{{{edge.source}}}" -> "{{{edge.target}}}";
{{/each}}
}
"##;
    template.to_string()
}
