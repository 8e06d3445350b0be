//! Activation functions for dense layers
//!
//! Every function is paired with its derivative inside the `Activation` enum,
//! so a layer can never hold a derivative that belongs to another function.
//! Derivatives are evaluated on the pre-activation (linear) output.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Sigmoid activation: 1 / (1 + exp(-z))
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Sigmoid derivative evaluated at the pre-activation `z`.
///
/// Returns s * (1 - s) with s = sigmoid(z).
pub fn sigmoid_derivative(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

/// ReLU activation: max(0, z)
pub fn relu(z: f64) -> f64 {
    if z > 0.0 {
        z
    } else {
        0.0
    }
}

/// ReLU derivative; the kink at zero takes the left slope.
pub fn relu_derivative(z: f64) -> f64 {
    if z > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Leaky ReLU activation: z for z > 0, alpha * z otherwise
pub fn leaky_relu(z: f64, alpha: f64) -> f64 {
    if z > 0.0 {
        z
    } else {
        alpha * z
    }
}

/// Leaky ReLU derivative: 1 for z > 0, alpha otherwise
pub fn leaky_relu_derivative(z: f64, alpha: f64) -> f64 {
    if z > 0.0 {
        1.0
    } else {
        alpha
    }
}

/// Tanh derivative evaluated at the pre-activation `z`: 1 - tanh(z)^2
pub fn tanh_derivative(z: f64) -> f64 {
    let t = z.tanh();
    1.0 - t * t
}

/// Element-wise nonlinearity applied to a layer's linear output.
///
/// Deserializes from `"sigmoid"`, `"relu"`, `"tanh"` or
/// `{"leaky_relu": {"alpha": 0.01}}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Sigmoid,
    Relu,
    LeakyRelu {
        alpha: f64,
    },
    Tanh,
}

impl Activation {
    /// Applies the function to a single pre-activation value.
    pub fn apply_scalar(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(z),
            Activation::Relu => relu(z),
            Activation::LeakyRelu { alpha } => leaky_relu(z, alpha),
            Activation::Tanh => z.tanh(),
        }
    }

    /// Derivative at a single pre-activation value.
    pub fn derivative_scalar(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid_derivative(z),
            Activation::Relu => relu_derivative(z),
            Activation::LeakyRelu { alpha } => leaky_relu_derivative(z, alpha),
            Activation::Tanh => tanh_derivative(z),
        }
    }

    /// Element-wise `apply_scalar` over a linear output vector.
    pub fn apply(self, linear: &Array1<f64>) -> Array1<f64> {
        linear.mapv(|z| self.apply_scalar(z))
    }

    /// Element-wise `derivative_scalar` over a linear output vector.
    pub fn derivative(self, linear: &Array1<f64>) -> Array1<f64> {
        linear.mapv(|z| self.derivative_scalar(z))
    }

    /// Short lowercase name, used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::Relu => "relu",
            Activation::LeakyRelu { .. } => "leaky_relu",
            Activation::Tanh => "tanh",
        }
    }

    /// Checks the variant's parameters, if it has any.
    pub fn validate(self) -> Result<(), String> {
        match self {
            Activation::LeakyRelu { alpha } if !alpha.is_finite() || alpha < 0.0 => Err(format!(
                "leaky_relu alpha must be finite and non-negative, got {}",
                alpha
            )),
            _ => Ok(()),
        }
    }
}
