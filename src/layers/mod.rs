//! Layer abstractions for the feedforward network
//!
//! Only fully connected layers exist; each one owns its parameters and the
//! per-example state (activation cache and delta) used by backpropagation.

pub mod dense;

pub use dense::{DenseLayer, WeightInit};
