//! Shared numeric helpers: activations, loss, random number generation.

pub mod activations;
pub mod loss;
pub mod rng;

pub use activations::{sigmoid, sigmoid_derivative, Activation};
pub use loss::{argmax, half_squared_error, half_squared_error_derivative};
pub use rng::SimpleRng;
