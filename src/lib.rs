//! Backpropagation MLP library
//!
//! A fully-connected feedforward network trained one sample at a time with
//! plain gradient descent, plus the IDX loader used to feed it MNIST digits.
//!
//! # Modules
//!
//! - `layers`: the dense layer (weights, biases, activation cache, delta slot)
//! - `network`: layer chaining, backpropagation, train and test loops
//! - `data`: IDX image/label decoding and the `Dataset` pair
//! - `utils`: activations, loss helpers and the seedable RNG
//! - `config`: training hyperparameters loaded from JSON
//! - `architecture`: layer list loaded from JSON and turned into a network
//! - `error`: the crate error type

pub mod architecture;
pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod network;
pub mod utils;

pub use error::{NetworkError, Result};
pub use layers::DenseLayer;
pub use network::{Evaluation, NeuralNetwork};
pub use utils::activations::Activation;
