//! Architecture configuration structures
//!
//! Describes the network as an ordered list of dense layers in JSON, so layer
//! sizes and activations can change without touching code.

use crate::error::{NetworkError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::network::NeuralNetwork;
use crate::utils::activations::Activation;
use crate::utils::rng::SimpleRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One dense layer: `(input_size, neurons, activation)`.
///
/// # Example
///
/// ```json
/// { "input_size": 784, "neurons": 64, "activation": "sigmoid" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    pub input_size: usize,
    pub neurons: usize,
    /// Defaults to sigmoid
    #[serde(default)]
    pub activation: Activation,
}

/// Sequence of layers applied in order.
///
/// # Example
///
/// ```json
/// {
///   "layers": [
///     { "input_size": 784, "neurons": 64, "activation": "sigmoid" },
///     { "input_size": 64, "neurons": 10, "activation": "sigmoid" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    pub layers: Vec<LayerConfig>,
}

impl ArchitectureConfig {
    /// 784 -> 64 -> 10 with sigmoid everywhere.
    pub fn mnist_default() -> Self {
        Self {
            layers: vec![
                LayerConfig {
                    input_size: 784,
                    neurons: 64,
                    activation: Activation::Sigmoid,
                },
                LayerConfig {
                    input_size: 64,
                    neurons: 10,
                    activation: Activation::Sigmoid,
                },
            ],
        }
    }
}

/// Loads and validates an architecture from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use backprop_mlp::architecture::load_architecture;
///
/// let arch = load_architecture("config/mnist_architecture.json").unwrap();
/// assert!(!arch.layers.is_empty());
/// ```
pub fn load_architecture<P: AsRef<Path>>(path: P) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

/// Validates an architecture configuration.
///
/// Checks that:
/// - there is at least one layer
/// - every size is positive and every activation parameter is valid
/// - layer i's neuron count equals layer i+1's input size
pub fn validate_architecture(config: &ArchitectureConfig) -> Result<()> {
    if config.layers.is_empty() {
        return Err(NetworkError::Config(
            "Architecture must have at least one layer".to_string(),
        ));
    }

    for (i, layer) in config.layers.iter().enumerate() {
        validate_layer(layer, i)?;
    }

    for (i, pair) in config.layers.windows(2).enumerate() {
        if pair[0].neurons != pair[1].input_size {
            return Err(NetworkError::Config(format!(
                "Layer connection mismatch: Layer {} output size ({}) does not match Layer {} input size ({})",
                i,
                pair[0].neurons,
                i + 1,
                pair[1].input_size
            )));
        }
    }

    Ok(())
}

fn validate_layer(layer: &LayerConfig, index: usize) -> Result<()> {
    if layer.input_size == 0 {
        return Err(NetworkError::Config(format!(
            "Layer {}: input_size must be greater than 0",
            index
        )));
    }
    if layer.neurons == 0 {
        return Err(NetworkError::Config(format!(
            "Layer {}: neurons must be greater than 0",
            index
        )));
    }
    layer
        .activation
        .validate()
        .map_err(|msg| NetworkError::Config(format!("Layer {}: {}", index, msg)))
}

/// Builds a network from a validated architecture.
///
/// # Examples
///
/// ```
/// use backprop_mlp::architecture::{build_network, ArchitectureConfig};
/// use backprop_mlp::layers::WeightInit;
/// use backprop_mlp::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let nn = build_network(&ArchitectureConfig::mnist_default(), WeightInit::Xavier, &mut rng).unwrap();
/// assert_eq!(nn.input_size(), 784);
/// assert_eq!(nn.output_size(), 10);
/// ```
pub fn build_network(
    config: &ArchitectureConfig,
    init: WeightInit,
    rng: &mut SimpleRng,
) -> Result<NeuralNetwork> {
    validate_architecture(config)?;

    let layers = config
        .layers
        .iter()
        .map(|layer| DenseLayer::new(layer.input_size, layer.neurons, layer.activation, init, rng))
        .collect();
    NeuralNetwork::new(layers)
}
