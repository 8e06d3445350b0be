// Tests for activation functions and their derivatives.

use approx::assert_relative_eq;
use backprop_mlp::utils::{sigmoid, sigmoid_derivative};
use backprop_mlp::Activation;
use ndarray::array;

const ALL: [Activation; 4] = [
    Activation::Sigmoid,
    Activation::Relu,
    Activation::LeakyRelu { alpha: 0.01 },
    Activation::Tanh,
];

#[test]
fn test_sigmoid_known_values() {
    assert_relative_eq!(sigmoid(0.0), 0.5);
    assert_relative_eq!(sigmoid(2.0), 1.0 / (1.0 + (-2.0f64).exp()));
    assert_relative_eq!(sigmoid(-3.0) + sigmoid(3.0), 1.0, epsilon = 1e-12);
}

#[test]
fn test_sigmoid_saturates_without_nan() {
    assert!(sigmoid(1000.0).is_finite());
    assert!(sigmoid(-1000.0).is_finite());
    assert_relative_eq!(sigmoid(1000.0), 1.0);
    assert_relative_eq!(sigmoid(-1000.0), 0.0);
}

#[test]
fn test_sigmoid_derivative_takes_pre_activation() {
    assert_relative_eq!(sigmoid_derivative(0.0), 0.25);
    let s = sigmoid(1.5);
    assert_relative_eq!(sigmoid_derivative(1.5), s * (1.0 - s));
}

#[test]
fn test_derivatives_match_finite_differences() {
    let eps = 1e-6;
    // Stay away from the ReLU kink at zero.
    for activation in ALL {
        for z in [-2.0, -0.7, 0.3, 1.9] {
            let numerical = (activation.apply_scalar(z + eps) - activation.apply_scalar(z - eps))
                / (2.0 * eps);
            assert_relative_eq!(
                activation.derivative_scalar(z),
                numerical,
                epsilon = 1e-6,
                max_relative = 1e-6
            );
        }
    }
}

#[test]
fn test_vector_forms_match_scalar_forms() {
    let linear = array![-1.5, 0.0, 0.25, 4.0];
    for activation in ALL {
        let applied = activation.apply(&linear);
        let derived = activation.derivative(&linear);
        for (i, &z) in linear.iter().enumerate() {
            assert_relative_eq!(applied[i], activation.apply_scalar(z));
            assert_relative_eq!(derived[i], activation.derivative_scalar(z));
        }
    }
}

#[test]
fn test_relu_family_at_negative_input() {
    assert_eq!(Activation::Relu.apply_scalar(-2.0), 0.0);
    assert_eq!(Activation::Relu.derivative_scalar(-2.0), 0.0);
    let leaky = Activation::LeakyRelu { alpha: 0.1 };
    assert_relative_eq!(leaky.apply_scalar(-2.0), -0.2);
    assert_relative_eq!(leaky.derivative_scalar(-2.0), 0.1);
}

#[test]
fn test_negative_alpha_is_invalid() {
    assert!(Activation::LeakyRelu { alpha: -0.5 }.validate().is_err());
    assert!(Activation::LeakyRelu { alpha: f64::NAN }.validate().is_err());
    assert!(Activation::Tanh.validate().is_ok());
}
