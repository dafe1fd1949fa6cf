use serde::{Deserialize, Serialize};

/// Fixed set of layer types the editor knows how to place.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Input,
    // Core layers (trainable)
    Dense,
    Conv1d,
    Conv2d,
    Conv3d,
    Depthwise,
    Transposed,
    Embedding,
    Attention,
    MultiheadAttention,
    TransformerEncoder,
    TransformerDecoder,
    Rnn,
    Lstm,
    Gru,
    // Operators (stateless)
    Maxpool,
    Avgpool,
    Globalmax,
    Globalavg,
    Softmax,
    Batchnorm,
    Layernorm,
    Groupnorm,
    Instancenorm,
    Dropout,
    Flatten,
    Reshape,
    Concatenate,
    Split,
    Padding,
    Cropping,
    // Activations
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    Prelu,
    Elu,
    Relu6,
    Gelu,
    Swish,
    Mish,
    Softsign,
    HardSigmoid,
    HardTanh,
    Maxout,
    // Sequential (memory)
    BidirectionalRnn,
    BidirectionalLstm,
    BidirectionalGru,
    AttentionSeq,
    TransformerSeq,
    // Structural
    Residual,
    Highway,
    Gcn,
    Gat,
    Graphsage,
    Capsule,
    // Output layers
    LinearOutput,
    SoftmaxOutput,
    SigmoidOutput,
}

impl LayerKind {
    /// Wire name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Input => "input",
            LayerKind::Dense => "dense",
            LayerKind::Conv1d => "conv1d",
            LayerKind::Conv2d => "conv2d",
            LayerKind::Conv3d => "conv3d",
            LayerKind::Depthwise => "depthwise",
            LayerKind::Transposed => "transposed",
            LayerKind::Embedding => "embedding",
            LayerKind::Attention => "attention",
            LayerKind::MultiheadAttention => "multihead_attention",
            LayerKind::TransformerEncoder => "transformer_encoder",
            LayerKind::TransformerDecoder => "transformer_decoder",
            LayerKind::Rnn => "rnn",
            LayerKind::Lstm => "lstm",
            LayerKind::Gru => "gru",
            LayerKind::Maxpool => "maxpool",
            LayerKind::Avgpool => "avgpool",
            LayerKind::Globalmax => "globalmax",
            LayerKind::Globalavg => "globalavg",
            LayerKind::Softmax => "softmax",
            LayerKind::Batchnorm => "batchnorm",
            LayerKind::Layernorm => "layernorm",
            LayerKind::Groupnorm => "groupnorm",
            LayerKind::Instancenorm => "instancenorm",
            LayerKind::Dropout => "dropout",
            LayerKind::Flatten => "flatten",
            LayerKind::Reshape => "reshape",
            LayerKind::Concatenate => "concatenate",
            LayerKind::Split => "split",
            LayerKind::Padding => "padding",
            LayerKind::Cropping => "cropping",
            LayerKind::Sigmoid => "sigmoid",
            LayerKind::Tanh => "tanh",
            LayerKind::Relu => "relu",
            LayerKind::LeakyRelu => "leaky_relu",
            LayerKind::Prelu => "prelu",
            LayerKind::Elu => "elu",
            LayerKind::Relu6 => "relu6",
            LayerKind::Gelu => "gelu",
            LayerKind::Swish => "swish",
            LayerKind::Mish => "mish",
            LayerKind::Softsign => "softsign",
            LayerKind::HardSigmoid => "hard_sigmoid",
            LayerKind::HardTanh => "hard_tanh",
            LayerKind::Maxout => "maxout",
            LayerKind::BidirectionalRnn => "bidirectional_rnn",
            LayerKind::BidirectionalLstm => "bidirectional_lstm",
            LayerKind::BidirectionalGru => "bidirectional_gru",
            LayerKind::AttentionSeq => "attention_seq",
            LayerKind::TransformerSeq => "transformer_seq",
            LayerKind::Residual => "residual",
            LayerKind::Highway => "highway",
            LayerKind::Gcn => "gcn",
            LayerKind::Gat => "gat",
            LayerKind::Graphsage => "graphsage",
            LayerKind::Capsule => "capsule",
            LayerKind::LinearOutput => "linear_output",
            LayerKind::SoftmaxOutput => "softmax_output",
            LayerKind::SigmoidOutput => "sigmoid_output",
        }
    }

    /// Default display name shown when the layer is placed: the wire name
    /// with its first letter capitalized, followed by " Layer".
    pub fn default_name(&self) -> String {
        let slug = self.as_str();
        let mut chars = slug.chars();
        match chars.next() {
            Some(first) => format!("{}{} Layer", first.to_uppercase(), chars.as_str()),
            None => "Layer".to_string(),
        }
    }

    /// Kinds that carry weight/bias arrays once initialized. Only dense and
    /// conv2d get concrete arrays; the remaining trainable kinds are placed
    /// without them.
    pub fn has_weight_arrays(&self) -> bool {
        matches!(self, LayerKind::Dense | LayerKind::Conv2d)
    }

    /// Default parameter bag assigned when a layer of this kind is placed.
    pub fn default_params(&self) -> LayerParams {
        match self {
            LayerKind::Input => LayerParams {
                input_shape: Some(vec![28, 28, 1]),
                ..Default::default()
            },
            LayerKind::Dense => LayerParams {
                units: Some(128),
                activation: Some("relu".to_string()),
                dropout: Some(0.0),
                ..Default::default()
            },
            LayerKind::Conv2d => LayerParams {
                filters: Some(32),
                kernel_size: Some([3, 3]),
                strides: Some([1, 1]),
                padding: Some(PaddingMode::Valid),
                ..Default::default()
            },
            LayerKind::Maxpool | LayerKind::Avgpool => LayerParams {
                pool_size: Some([2, 2]),
                strides: Some([2, 2]),
                ..Default::default()
            },
            _ => LayerParams::default(),
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaddingMode {
    Valid,
    Same,
}

/// 2D canvas position of a layer in the node editor.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Type-dependent parameter bag. Absent fields stay off the wire so a dense
/// layer never serializes conv parameters and vice versa.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct LayerParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l1_regularization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l2_regularization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_size: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strides: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<PaddingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_shape: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_layers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_sequences: Option<bool>,
}

/// One layer record: type, display name, canvas position, parameters and the
/// optional weight/bias arrays. Outgoing connections live in the network's
/// adjacency list, not here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub name: String,
    pub position: Position,
    pub params: LayerParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biases: Option<Vec<f64>>,
}

impl Layer {
    pub fn new(id: impl Into<String>, kind: LayerKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            name: kind.default_name(),
            position,
            params: kind.default_params(),
            weights: None,
            biases: None,
        }
    }

    /// Mean of the bias vector, used for bias-based node coloring.
    pub fn mean_bias(&self) -> Option<f64> {
        let biases = self.biases.as_ref()?;
        if biases.is_empty() {
            return None;
        }
        Some(biases.iter().sum::<f64>() / biases.len() as f64)
    }
}
