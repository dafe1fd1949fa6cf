use anyhow::{anyhow, Result};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::database::entities::neural_models::Entity as NeuralModels;
use crate::document::{LayerRecord, NetworkDocument};
use crate::network::Network;

/// The payload stored in a model row's `model_data` column.
#[derive(Serialize, Deserialize)]
struct ModelData {
    layers: Vec<LayerRecord>,
}

pub struct ModelService {
    db: DatabaseConnection,
}

impl ModelService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Serialize a layer array into the stored `{ "layers": [...] }` text.
    pub fn encode_layers(layers: &[LayerRecord]) -> Result<String> {
        Ok(serde_json::to_string(&json!({ "layers": layers }))?)
    }

    /// Parse the stored `model_data` text back into the layer array.
    pub fn decode_layers(model_data: &str) -> Result<Vec<LayerRecord>> {
        let data: ModelData = serde_json::from_str(model_data)?;
        Ok(data.layers)
    }

    /// Load a saved model row and rebuild the editable graph from it.
    pub async fn build_network(&self, model_id: &str) -> Result<Network> {
        let row = NeuralModels::find_by_id(model_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("model not found: {}", model_id))?;

        let document = NetworkDocument {
            id: row.id,
            name: row.name,
            layers: Self::decode_layers(&row.model_data)?,
            created_at: row.created_at,
            modified_at: row.updated_at,
        };
        Ok(document.into_network()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerKind;

    #[test]
    fn encode_decode_round_trips_the_layer_array() {
        let mut network = Network::new("svc");
        let dense = network.add_layer(LayerKind::Dense);
        network.connect("input-1", &dense).unwrap();

        let layers = network.to_document().layers;
        let encoded = ModelService::encode_layers(&layers).unwrap();
        assert!(encoded.starts_with(r#"{"layers":"#));
        let decoded = ModelService::decode_layers(&encoded).unwrap();
        assert_eq!(decoded, layers);
    }

    #[test]
    fn decode_rejects_payloads_without_layers() {
        assert!(ModelService::decode_layers(r#"{"nope": []}"#).is_err());
        assert!(ModelService::decode_layers("garbage").is_err());
    }
}
