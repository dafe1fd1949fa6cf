use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::layer::{Layer, LayerKind, LayerParams, Position};
use crate::weights;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("layer not found: {0}")]
    LayerNotFound(String),
    #[error("input layers cannot be removed")]
    InputLayerProtected,
    #[error("connection endpoint not found: {0}")]
    UnknownEndpoint(String),
    #[error("duplicate layer id: {0}")]
    DuplicateLayerId(String),
    #[error("layer {0} has no weight matrix")]
    NoWeights(String),
    #[error("weight index out of bounds: row {row}, col {col}")]
    WeightOutOfBounds { row: usize, col: usize },
    #[error("bias index out of bounds: {0}")]
    BiasOutOfBounds(usize),
    #[error("invalid network document: {0}")]
    InvalidDocument(String),
}

/// An editable layer graph. Layers are kept in an insertion-ordered map so
/// the editor's layer list stays stable, and edges live in a separate
/// adjacency list keyed by source layer id. Removing a layer prunes every
/// edge that references it, so the adjacency list never dangles.
#[derive(Clone, Debug, Default)]
pub struct Network {
    pub name: String,
    layers: IndexMap<String, Layer>,
    adjacency: IndexMap<String, Vec<String>>,
}

impl Network {
    /// A fresh editor network: one undeletable input layer, nothing else.
    pub fn new(name: impl Into<String>) -> Self {
        let mut network = Self::empty(name);
        let mut input = Layer::new("input-1", LayerKind::Input, Position::new(100.0, 100.0));
        input.name = "Input Layer".to_string();
        network.layers.insert(input.id.clone(), input);
        network.adjacency.insert("input-1".to_string(), Vec::new());
        network
    }

    /// A network with no layers at all, used when importing a document.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: IndexMap::new(),
            adjacency: IndexMap::new(),
        }
    }

    /// Drop everything and return to the single-input-layer starting state.
    pub fn reset(&mut self) {
        let fresh = Network::new(self.name.clone());
        self.layers = fresh.layers;
        self.adjacency = fresh.adjacency;
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    pub fn get_layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn get_layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.get_mut(id)
    }

    /// Place a new layer with that kind's defaults. Weight-carrying kinds get
    /// freshly randomized weight/bias arrays at creation time. Returns the
    /// id of the new layer.
    pub fn add_layer(&mut self, kind: LayerKind) -> String {
        let id = format!("{}-{}", kind.as_str(), Uuid::new_v4().simple());
        let position = Position::new(200.0 + self.layers.len() as f64 * 150.0, 100.0);
        let mut layer = Layer::new(id.clone(), kind, position);
        if let Some((w, b)) = weights::initialize(kind, &layer.params) {
            layer.weights = Some(w);
            layer.biases = Some(b);
        }
        debug!("Adding layer {} ({})", id, kind);
        self.layers.insert(id.clone(), layer);
        self.adjacency.insert(id.clone(), Vec::new());
        id
    }

    /// Insert an already-built layer record, as when loading a document.
    pub fn insert_layer(
        &mut self,
        layer: Layer,
        connections: Vec<String>,
    ) -> Result<(), NetworkError> {
        if self.layers.contains_key(&layer.id) {
            return Err(NetworkError::DuplicateLayerId(layer.id));
        }
        let id = layer.id.clone();
        self.layers.insert(id.clone(), layer);
        self.adjacency.insert(id, connections);
        Ok(())
    }

    pub fn rename_layer(&mut self, id: &str, name: impl Into<String>) -> Result<(), NetworkError> {
        let layer = self
            .layers
            .get_mut(id)
            .ok_or_else(|| NetworkError::LayerNotFound(id.to_string()))?;
        layer.name = name.into();
        Ok(())
    }

    pub fn move_layer(&mut self, id: &str, position: Position) -> Result<(), NetworkError> {
        let layer = self
            .layers
            .get_mut(id)
            .ok_or_else(|| NetworkError::LayerNotFound(id.to_string()))?;
        layer.position = position;
        Ok(())
    }

    pub fn set_params(&mut self, id: &str, params: LayerParams) -> Result<(), NetworkError> {
        let layer = self
            .layers
            .get_mut(id)
            .ok_or_else(|| NetworkError::LayerNotFound(id.to_string()))?;
        layer.params = params;
        Ok(())
    }

    /// Add a directed edge. Both endpoints must exist; duplicates are
    /// ignored.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), NetworkError> {
        if !self.layers.contains_key(source) {
            return Err(NetworkError::UnknownEndpoint(source.to_string()));
        }
        if !self.layers.contains_key(target) {
            return Err(NetworkError::UnknownEndpoint(target.to_string()));
        }
        let targets = self.adjacency.entry(source.to_string()).or_default();
        if !targets.iter().any(|t| t == target) {
            targets.push(target.to_string());
        }
        Ok(())
    }

    pub fn disconnect(&mut self, source: &str, target: &str) -> Result<(), NetworkError> {
        let targets = self
            .adjacency
            .get_mut(source)
            .ok_or_else(|| NetworkError::LayerNotFound(source.to_string()))?;
        targets.retain(|t| t != target);
        Ok(())
    }

    /// Outgoing connections of a layer, in insertion order.
    pub fn connections_of(&self, id: &str) -> &[String] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges as (source, target) pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.adjacency.iter().flat_map(|(source, targets)| {
            targets
                .iter()
                .map(move |target| (source.as_str(), target.as_str()))
        })
    }

    /// Remove a layer and prune every edge that references it. Input layers
    /// are protected: the editor never offers deletion for them.
    pub fn remove_layer(&mut self, id: &str) -> Result<Layer, NetworkError> {
        let layer = self
            .layers
            .get(id)
            .ok_or_else(|| NetworkError::LayerNotFound(id.to_string()))?;
        if layer.kind == LayerKind::Input {
            return Err(NetworkError::InputLayerProtected);
        }
        let removed = self
            .layers
            .shift_remove(id)
            .ok_or_else(|| NetworkError::LayerNotFound(id.to_string()))?;
        self.adjacency.shift_remove(id);
        for targets in self.adjacency.values_mut() {
            targets.retain(|t| t != id);
        }
        debug!("Removed layer {} ({})", id, removed.kind);
        Ok(removed)
    }

    pub fn stats(&self) -> String {
        format!(
            "Layers: {}, Edges: {}",
            self.layers.len(),
            self.edges().count()
        )
    }

    /// Structural checks: adjacency endpoints must exist, weight and bias
    /// arrays must be rectangular, and the first layer is conventionally an
    /// input layer.
    pub fn verify_integrity(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (source, targets) in &self.adjacency {
            if !self.layers.contains_key(source) {
                errors.push(format!("Adjacency source {:?} not found in layers", source));
            }
            for target in targets {
                if !self.layers.contains_key(target) {
                    errors.push(format!(
                        "Connection {:?} -> {:?} references a missing layer",
                        source, target
                    ));
                }
            }
        }

        for layer in self.layers.values() {
            if let Some(rows) = &layer.weights {
                let width = rows.first().map(Vec::len).unwrap_or(0);
                if rows.iter().any(|row| row.len() != width) {
                    errors.push(format!("Layer {:?} has a ragged weight matrix", layer.id));
                }
            }
        }

        if let Some(first) = self.layers.values().next() {
            if first.kind != LayerKind::Input {
                warn!("First layer {} is not an input layer", first.id);
                errors.push(format!(
                    "First layer {:?} is of type {} rather than input",
                    first.id, first.kind
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
