//! The JSON document shape used for export, import and persistence.
//!
//! A document is the flat form of a [`Network`]: an ordered layer-record
//! array with each record's outgoing connections inlined. Import replaces
//! the current network wholesale; a malformed document is reported without
//! touching anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::layer::Layer;
use crate::network::{Network, NetworkError};

/// One serialized layer: the record plus its inlined outgoing connections.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayerRecord {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkDocument {
    pub id: String,
    pub name: String,
    pub layers: Vec<LayerRecord>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl NetworkDocument {
    pub fn from_network(network: &Network) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: network.name.clone(),
            layers: layer_records(network),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn parse(json: &str) -> Result<Self, NetworkError> {
        serde_json::from_str(json).map_err(|e| NetworkError::InvalidDocument(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, NetworkError> {
        serde_json::to_string_pretty(self).map_err(|e| NetworkError::InvalidDocument(e.to_string()))
    }

    /// Rebuild the editable graph from the flat layer array. Connections
    /// pointing at ids that are not part of the document are dropped with a
    /// warning, keeping the adjacency invariant intact.
    pub fn into_network(self) -> Result<Network, NetworkError> {
        let mut network = Network::empty(self.name);
        for record in &self.layers {
            network.insert_layer(record.layer.clone(), Vec::new())?;
        }
        for record in self.layers {
            let source = record.layer.id;
            for target in record.connections.unwrap_or_default() {
                match network.connect(&source, &target) {
                    Ok(()) => {}
                    Err(NetworkError::UnknownEndpoint(missing)) => {
                        warn!(
                            "Dropping connection {} -> {}: {} is not in the document",
                            source, target, missing
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(network)
    }
}

fn layer_records(network: &Network) -> Vec<LayerRecord> {
    network
        .layers()
        .map(|layer| LayerRecord {
            layer: layer.clone(),
            connections: Some(network.connections_of(&layer.id).to_vec()),
        })
        .collect()
}

impl Network {
    pub fn to_document(&self) -> NetworkDocument {
        NetworkDocument::from_network(self)
    }

    /// Parse a document and build a replacement network from it. The caller
    /// swaps in the result only on success, so a failed import leaves the
    /// current network untouched.
    pub fn import_json(json: &str) -> Result<Network, NetworkError> {
        NetworkDocument::parse(json)?.into_network()
    }
}
