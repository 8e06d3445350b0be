//! Dense (fully connected) layer implementation
//!
//! This module provides a DenseLayer that performs the transformation
//! `activated = f(Wᵀ·input + b)` on a single sample, caches the linear and
//! activated outputs for backpropagation, and holds the error signal (delta)
//! handed to it by the network.

use crate::error::{ensure_len, NetworkError, Result};
use crate::utils::activations::Activation;
use crate::utils::rng::SimpleRng;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Weight initialization scheme. Biases always start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Xavier/Glorot uniform: [-limit, limit] with limit = sqrt(6 / (fan_in + fan_out)).
    #[default]
    Xavier,
    /// Plain uniform in [-1, 1].
    Uniform,
}

impl WeightInit {
    /// Half-width of the sampling interval for a layer of the given shape.
    pub fn limit(self, input_size: usize, neurons: usize) -> f64 {
        match self {
            WeightInit::Xavier => (6.0 / (input_size + neurons) as f64).sqrt(),
            WeightInit::Uniform => 1.0,
        }
    }
}

/// Outputs of the most recent forward pass.
#[derive(Debug, Clone)]
struct ActivationCache {
    linear: Array1<f64>,
    activated: Array1<f64>,
}

/// Dense layer with weights, biases and an activation function.
///
/// # Fields
///
/// * `weights` - (input_size × neurons) matrix
/// * `biases` - bias vector (neurons)
/// * `cache` - linear and activated output of the last forward pass
/// * `delta` - error signal for the current example, set by the network
///
/// # Example
///
/// ```
/// use backprop_mlp::layers::{DenseLayer, WeightInit};
/// use backprop_mlp::utils::{Activation, SimpleRng};
/// use ndarray::Array1;
///
/// let mut rng = SimpleRng::new(42);
/// let mut layer = DenseLayer::new(4, 3, Activation::Sigmoid, WeightInit::Xavier, &mut rng);
/// let output = layer.forward(&Array1::zeros(4)).unwrap();
/// assert_eq!(output.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DenseLayer {
    input_size: usize,
    neurons: usize,
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
    cache: Option<ActivationCache>,
    delta: Option<Array1<f64>>,
}

impl DenseLayer {
    /// Create a layer with random weights and zero biases.
    pub fn new(
        input_size: usize,
        neurons: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut SimpleRng,
    ) -> Self {
        let limit = init.limit(input_size, neurons);
        let weights = Array2::from_shape_fn((input_size, neurons), |_| {
            rng.gen_range_f64(-limit, limit)
        });

        Self {
            input_size,
            neurons,
            weights,
            biases: Array1::zeros(neurons),
            activation,
            cache: None,
            delta: None,
        }
    }

    /// Create a layer from explicit parameters.
    ///
    /// `weights` is (input_size × neurons); `biases` must have `neurons` entries.
    pub fn from_parameters(
        weights: Array2<f64>,
        biases: Array1<f64>,
        activation: Activation,
    ) -> Result<Self> {
        let (input_size, neurons) = weights.dim();
        if input_size == 0 || neurons == 0 {
            return Err(NetworkError::Config(format!(
                "layer dimensions must be positive, got {}x{}",
                input_size, neurons
            )));
        }
        ensure_len("bias vector", neurons, biases.len())?;

        Ok(Self {
            input_size,
            neurons,
            weights,
            biases,
            activation,
            cache: None,
            delta: None,
        })
    }

    /// Forward pass: caches `linear = Wᵀ·input + b` and `f(linear)`.
    ///
    /// Starting a new forward pass discards the delta of the previous example.
    pub fn forward(&mut self, input: &Array1<f64>) -> Result<&Array1<f64>> {
        ensure_len("layer input", self.input_size, input.len())?;

        let linear = self.weights.t().dot(input) + &self.biases;
        let activated = self.activation.apply(&linear);
        self.delta = None;

        let cache = self.cache.insert(ActivationCache { linear, activated });
        Ok(&cache.activated)
    }

    /// Activated output of the last forward pass.
    pub fn output(&self) -> Result<&Array1<f64>> {
        self.cache
            .as_ref()
            .map(|cache| &cache.activated)
            .ok_or(NetworkError::UninitializedState("activation cache"))
    }

    /// Activation derivative at the cached linear output.
    pub fn activation_derivative(&self) -> Result<Array1<f64>> {
        let cache = self
            .cache
            .as_ref()
            .ok_or(NetworkError::UninitializedState("activation cache"))?;
        Ok(self.activation.derivative(&cache.linear))
    }

    /// Stores the error signal for the current example.
    pub fn set_delta(&mut self, delta: Array1<f64>) -> Result<()> {
        ensure_len("delta", self.neurons, delta.len())?;
        self.delta = Some(delta);
        Ok(())
    }

    /// Error signal set since the last update.
    pub fn delta(&self) -> Result<&Array1<f64>> {
        self.delta
            .as_ref()
            .ok_or(NetworkError::UninitializedState("delta"))
    }

    /// Outer product `layer_input ⊗ delta`, shaped like the weight matrix.
    pub fn weight_gradient(&self, layer_input: &Array1<f64>) -> Result<Array2<f64>> {
        let delta = self.delta()?;
        ensure_len("layer input", self.input_size, layer_input.len())?;

        let column = layer_input.view().insert_axis(Axis(1));
        let row = delta.view().insert_axis(Axis(0));
        Ok(column.dot(&row))
    }

    /// Gradient descent step: `W -= lr * (input ⊗ delta)`, `b -= lr * delta`.
    ///
    /// Consumes the delta, so every update needs a fresh `set_delta`.
    pub fn update_weights(&mut self, layer_input: &Array1<f64>, learning_rate: f64) -> Result<()> {
        let gradient = self.weight_gradient(layer_input)?;
        let delta = self
            .delta
            .take()
            .ok_or(NetworkError::UninitializedState("delta"))?;

        self.weights.scaled_add(-learning_rate, &gradient);
        self.biases.scaled_add(-learning_rate, &delta);
        Ok(())
    }

    /// Weight matrix (input_size × neurons).
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Bias vector (neurons).
    pub fn biases(&self) -> &Array1<f64> {
        &self.biases
    }

    /// Activation applied to the linear output.
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Length of the expected input vector.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Number of neurons, i.e. the output length.
    pub fn neurons(&self) -> usize {
        self.neurons
    }

    /// input_size × neurons weights plus neurons biases.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}
