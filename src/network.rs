//! Feedforward network: layer chaining, backpropagation and the train/test loops
//!
//! Training is online gradient descent: every sample runs a forward pass, then
//! a backward pass that first computes all layer deltas from the current
//! parameters and only afterwards updates the weights.

use crate::error::{ensure_len, NetworkError, Result};
use crate::layers::DenseLayer;
use crate::utils::loss::{argmax, half_squared_error, half_squared_error_derivative};
use ndarray::Array1;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of `NeuralNetwork::test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// Fraction of correct predictions, or `None` when no sample was seen.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total as f64)
        }
    }
}

/// Ordered, non-empty sequence of dense layers.
///
/// The network owns its layers; for every adjacent pair the predecessor's
/// neuron count equals the successor's input size.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    layers: Vec<DenseLayer>,
}

impl NeuralNetwork {
    /// Takes ownership of `layers` after checking that they chain.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }
        for pair in layers.windows(2) {
            ensure_len("layer connection", pair[0].neurons(), pair[1].input_size())?;
        }

        for (i, layer) in layers.iter().enumerate() {
            debug!(
                "layer {}: {} -> {} ({})",
                i,
                layer.input_size(),
                layer.neurons(),
                layer.activation().name()
            );
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.last_layer().neurons()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(DenseLayer::parameter_count).sum()
    }

    fn last_layer(&self) -> &DenseLayer {
        &self.layers[self.layers.len() - 1]
    }

    /// Shape checks for a whole dataset, run before any sample is processed.
    fn check_samples(&self, inputs: &[Array1<f64>], targets: &[Array1<f64>]) -> Result<()> {
        ensure_len("target count", inputs.len(), targets.len())?;
        for (input, target) in inputs.iter().zip(targets) {
            ensure_len("network input", self.input_size(), input.len())?;
            ensure_len("target", self.output_size(), target.len())?;
        }
        Ok(())
    }

    /// Runs `input` through every layer, refreshing each activation cache.
    pub fn forward(&mut self, input: &Array1<f64>) -> Result<()> {
        ensure_len("network input", self.input_size(), input.len())?;

        let mut current = input;
        for layer in self.layers.iter_mut() {
            current = layer.forward(current)?;
        }
        Ok(())
    }

    /// Activated output of the last layer after the most recent `forward`.
    pub fn output(&self) -> Result<&Array1<f64>> {
        self.last_layer().output()
    }

    /// Forward pass followed by the index of the strongest output.
    pub fn predict(&mut self, input: &Array1<f64>) -> Result<usize> {
        self.forward(input)?;
        Ok(argmax(self.output()?))
    }

    /// Backpropagation for one example, after `forward(input)`.
    ///
    /// All deltas are derived from the parameters as they were when the call
    /// started; no layer is updated until every delta exists.
    pub fn backward(
        &mut self,
        input: &Array1<f64>,
        target: &Array1<f64>,
        learning_rate: f64,
    ) -> Result<()> {
        ensure_len("network input", self.input_size(), input.len())?;
        self.compute_deltas(target)?;
        self.apply_updates(input, learning_rate)
    }

    /// Sets every layer's delta, output layer first.
    pub fn compute_deltas(&mut self, target: &Array1<f64>) -> Result<()> {
        ensure_len("target", self.output_size(), target.len())?;
        let last = self.layers.len() - 1;

        let output_error = half_squared_error_derivative(self.output()?, target);
        let output_delta = output_error * &self.layers[last].activation_derivative()?;
        self.layers[last].set_delta(output_delta)?;

        for i in (0..last).rev() {
            let next = &self.layers[i + 1];
            let hidden_error = next.weights().dot(next.delta()?);
            let hidden_delta = hidden_error * &self.layers[i].activation_derivative()?;
            self.layers[i].set_delta(hidden_delta)?;
        }
        Ok(())
    }

    /// Applies every layer's delta. Layer 0 sees `input`, later layers see
    /// their predecessor's cached output.
    pub fn apply_updates(&mut self, input: &Array1<f64>, learning_rate: f64) -> Result<()> {
        for i in 0..self.layers.len() {
            let (previous, current) = self.layers.split_at_mut(i);
            let layer_input = match previous.last() {
                Some(layer) => layer.output()?,
                None => input,
            };
            current[0].update_weights(layer_input, learning_rate)?;
        }
        Ok(())
    }

    /// Online training over `epochs` passes, samples in the given order.
    ///
    /// Returns the mean half squared error of each epoch. An empty dataset
    /// runs no iterations and yields an empty vector. Every sample is
    /// shape-checked before the first update, so a rejected dataset leaves
    /// the parameters untouched.
    pub fn train(
        &mut self,
        inputs: &[Array1<f64>],
        targets: &[Array1<f64>],
        learning_rate: f64,
        epochs: usize,
    ) -> Result<Vec<f64>> {
        self.check_samples(inputs, targets)?;
        if inputs.is_empty() {
            warn!("training skipped: dataset is empty");
            return Ok(Vec::new());
        }

        let mut epoch_losses = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let start_time = Instant::now();
            let mut total_loss = 0.0;

            for (input, target) in inputs.iter().zip(targets) {
                self.forward(input)?;
                total_loss += half_squared_error(self.output()?, target);
                self.backward(input, target, learning_rate)?;
            }

            let mean_loss = total_loss / inputs.len() as f64;
            info!(
                "Epoch {}/{} - Loss: {:.6} Time: {:.3}s",
                epoch + 1,
                epochs,
                mean_loss,
                start_time.elapsed().as_secs_f64()
            );
            epoch_losses.push(mean_loss);
        }

        Ok(epoch_losses)
    }

    /// Counts samples whose predicted class matches the target's class.
    pub fn test(&mut self, inputs: &[Array1<f64>], targets: &[Array1<f64>]) -> Result<Evaluation> {
        self.check_samples(inputs, targets)?;

        let mut correct = 0usize;
        for (input, target) in inputs.iter().zip(targets) {
            if self.predict(input)? == argmax(target) {
                correct += 1;
            }
        }

        let evaluation = Evaluation {
            correct,
            total: inputs.len(),
        };
        match evaluation.accuracy() {
            Some(accuracy) => info!(
                "Test Accuracy: {:.4} ({}/{})",
                accuracy, evaluation.correct, evaluation.total
            ),
            None => warn!("evaluation skipped: dataset is empty"),
        }
        Ok(evaluation)
    }
}
