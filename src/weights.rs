//! Random weight/bias initialization and in-place editing.
//!
//! The arrays here are illustrative: uniform noise sized from the layer
//! parameters, never the result of training.

use rand::Rng;

use crate::layer::{Layer, LayerKind, LayerParams};
use crate::network::NetworkError;

/// Input width assumed for dense layers that have no existing weight matrix.
pub const DENSE_INPUT_WIDTH: usize = 128;

const CONV_INPUT_CHANNELS: usize = 3;

fn noise(rows: usize, cols: usize, scale: f64) -> Vec<Vec<f64>> {
    let mut rng = rand::thread_rng();
    (0..rows)
        .map(|_| (0..cols).map(|_| (rng.gen::<f64>() - 0.5) * scale).collect())
        .collect()
}

fn noise_vec(len: usize, scale: f64) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| (rng.gen::<f64>() - 0.5) * scale).collect()
}

/// Fresh weight and bias arrays for a layer of the given kind, or `None`
/// when the kind carries no arrays.
///
/// Dense: `input_width x units` weights in (-0.1, 0.1), `units` biases in
/// (-0.01, 0.01). Conv2d: `filters x (kh*kw*channels)` weights in
/// (-0.05, 0.05), `filters` biases in (-0.005, 0.005).
pub fn initialize(kind: LayerKind, params: &LayerParams) -> Option<(Vec<Vec<f64>>, Vec<f64>)> {
    initialize_with_width(kind, params, None)
}

fn initialize_with_width(
    kind: LayerKind,
    params: &LayerParams,
    input_width: Option<usize>,
) -> Option<(Vec<Vec<f64>>, Vec<f64>)> {
    if !kind.has_weight_arrays() {
        return None;
    }
    match kind {
        LayerKind::Dense => {
            let units = params.units.unwrap_or(128) as usize;
            let width = input_width.unwrap_or(DENSE_INPUT_WIDTH);
            Some((noise(width, units, 0.2), noise_vec(units, 0.02)))
        }
        LayerKind::Conv2d => {
            let filters = params.filters.unwrap_or(32) as usize;
            let [kh, kw] = params.kernel_size.unwrap_or([3, 3]);
            let cols = kh as usize * kw as usize * CONV_INPUT_CHANNELS;
            Some((noise(filters, cols, 0.1), noise_vec(filters, 0.01)))
        }
        _ => None,
    }
}

impl Layer {
    /// Re-roll this layer's weight and bias arrays. A dense layer keeps its
    /// existing input width; everything else is sized from the parameters.
    /// No-op for kinds without weight arrays.
    pub fn regenerate_weights(&mut self) {
        let width = match self.kind {
            LayerKind::Dense => self.weights.as_ref().map(Vec::len),
            _ => None,
        };
        if let Some((w, b)) = initialize_with_width(self.kind, &self.params, width) {
            self.weights = Some(w);
            self.biases = Some(b);
        }
    }

    pub fn set_weight(&mut self, row: usize, col: usize, value: f64) -> Result<(), NetworkError> {
        let weights = self
            .weights
            .as_mut()
            .ok_or_else(|| NetworkError::NoWeights(self.id.clone()))?;
        let cell = weights
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(NetworkError::WeightOutOfBounds { row, col })?;
        *cell = value;
        Ok(())
    }

    pub fn set_bias(&mut self, index: usize, value: f64) -> Result<(), NetworkError> {
        let biases = self
            .biases
            .as_mut()
            .ok_or_else(|| NetworkError::NoWeights(self.id.clone()))?;
        let slot = biases
            .get_mut(index)
            .ok_or(NetworkError::BiasOutOfBounds(index))?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Position;

    #[test]
    fn dense_arrays_are_sized_from_units() {
        let params = LayerParams {
            units: Some(16),
            ..Default::default()
        };
        let (weights, biases) = initialize(LayerKind::Dense, &params).unwrap();
        assert_eq!(weights.len(), DENSE_INPUT_WIDTH);
        assert!(weights.iter().all(|row| row.len() == 16));
        assert_eq!(biases.len(), 16);
        assert!(weights.iter().flatten().all(|w| w.abs() < 0.1));
        assert!(biases.iter().all(|b| b.abs() < 0.01));
    }

    #[test]
    fn conv2d_arrays_are_sized_from_filters_and_kernel() {
        let params = LayerParams {
            filters: Some(8),
            kernel_size: Some([5, 5]),
            ..Default::default()
        };
        let (weights, biases) = initialize(LayerKind::Conv2d, &params).unwrap();
        assert_eq!(weights.len(), 8);
        assert!(weights.iter().all(|row| row.len() == 5 * 5 * 3));
        assert_eq!(biases.len(), 8);
        assert!(weights.iter().flatten().all(|w| w.abs() < 0.05));
    }

    #[test]
    fn initialization_follows_the_weight_array_predicate() {
        for kind in [
            LayerKind::Input,
            LayerKind::Dense,
            LayerKind::Conv2d,
            LayerKind::Maxpool,
            LayerKind::Flatten,
            LayerKind::Relu,
            LayerKind::Lstm,
        ] {
            assert_eq!(
                initialize(kind, &kind.default_params()).is_some(),
                kind.has_weight_arrays()
            );
        }
    }

    #[test]
    fn regenerate_keeps_dense_input_width() {
        let mut layer = Layer::new("dense-1", LayerKind::Dense, Position::default());
        layer.weights = Some(vec![vec![0.0; 4]; 32]);
        layer.biases = Some(vec![0.0; 4]);
        layer.params.units = Some(4);
        layer.regenerate_weights();
        let weights = layer.weights.as_ref().unwrap();
        assert_eq!(weights.len(), 32);
        assert!(weights.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn weight_edits_are_bounds_checked() {
        let mut layer = Layer::new("dense-1", LayerKind::Dense, Position::default());
        assert!(matches!(
            layer.set_weight(0, 0, 1.0),
            Err(NetworkError::NoWeights(_))
        ));

        layer.weights = Some(vec![vec![0.0; 2]; 2]);
        layer.biases = Some(vec![0.0; 2]);
        layer.set_weight(1, 1, 0.25).unwrap();
        assert_eq!(layer.weights.as_ref().unwrap()[1][1], 0.25);
        assert!(matches!(
            layer.set_weight(2, 0, 1.0),
            Err(NetworkError::WeightOutOfBounds { .. })
        ));

        layer.set_bias(0, -0.5).unwrap();
        assert_eq!(layer.biases.as_ref().unwrap()[0], -0.5);
        assert!(matches!(
            layer.set_bias(9, 0.0),
            Err(NetworkError::BiasOutOfBounds(9))
        ));
    }
}
