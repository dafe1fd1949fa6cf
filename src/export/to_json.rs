use std::error::Error;

use crate::network::Network;

/// The canonical document shape, pretty-printed.
pub fn render(network: &Network) -> Result<String, Box<dyn Error>> {
    let document = network.to_document();
    Ok(document.to_json_pretty()?)
}
