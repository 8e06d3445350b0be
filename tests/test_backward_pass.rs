// Tests for backward propagation: the update rule on hand-computed values
// and the ordering rules between forward, delta computation and updates.

use approx::assert_abs_diff_eq;
use backprop_mlp::layers::DenseLayer;
use backprop_mlp::{Activation, NetworkError, NeuralNetwork};
use ndarray::{array, Array1};

// 2 -> 1 sigmoid layer whose linear output is 0 for input [1, 1].
fn balanced_network() -> NeuralNetwork {
    let layer = DenseLayer::from_parameters(
        array![[0.5], [-0.5]],
        array![0.0],
        Activation::Sigmoid,
    )
    .unwrap();
    NeuralNetwork::new(vec![layer]).unwrap()
}

fn two_layer_network() -> NeuralNetwork {
    let hidden = DenseLayer::from_parameters(
        array![[0.1, -0.2, 0.3], [0.4, 0.5, -0.6]],
        array![0.0, 0.1, -0.1],
        Activation::Sigmoid,
    )
    .unwrap();
    let output = DenseLayer::from_parameters(
        array![[0.7, -0.3], [-0.1, 0.2], [0.5, 0.4]],
        array![0.05, -0.05],
        Activation::Sigmoid,
    )
    .unwrap();
    NeuralNetwork::new(vec![hidden, output]).unwrap()
}

// ============================================================================
// Update rule
// ============================================================================

#[test]
fn test_single_step_hand_computed() {
    let mut nn = balanced_network();
    let input = array![1.0, 1.0];

    nn.forward(&input).unwrap();
    assert_abs_diff_eq!(nn.output().unwrap()[0], 0.5, epsilon = 1e-12);

    // delta = (0.5 - 1.0) * 0.25 = -0.125
    nn.backward(&input, &array![1.0], 1.0).unwrap();

    let layer = &nn.layers()[0];
    assert_abs_diff_eq!(layer.weights()[[0, 0]], 0.625, epsilon = 1e-12);
    assert_abs_diff_eq!(layer.weights()[[1, 0]], -0.375, epsilon = 1e-12);
    assert_abs_diff_eq!(layer.biases()[0], 0.125, epsilon = 1e-12);
}

#[test]
fn test_learning_rate_scales_the_step() {
    let input = array![1.0, 1.0];
    let target = array![1.0];

    let mut full = balanced_network();
    full.forward(&input).unwrap();
    full.backward(&input, &target, 1.0).unwrap();

    let mut tenth = balanced_network();
    tenth.forward(&input).unwrap();
    tenth.backward(&input, &target, 0.1).unwrap();

    let start = balanced_network().layers()[0].weights().clone();
    let full_step = &start - full.layers()[0].weights();
    let tenth_step = &start - tenth.layers()[0].weights();
    for (a, b) in full_step.iter().zip(tenth_step.iter()) {
        assert_abs_diff_eq!(a * 0.1, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_matching_target_leaves_parameters_unchanged() {
    let mut nn = balanced_network();
    let input = array![1.0, 1.0];
    nn.forward(&input).unwrap();
    nn.backward(&input, &array![0.5], 0.7).unwrap();

    assert_eq!(nn.layers()[0].weights(), &array![[0.5], [-0.5]]);
    assert_eq!(nn.layers()[0].biases(), &array![0.0]);
}

#[test]
fn test_backward_step_reduces_loss_on_the_same_example() {
    let mut nn = two_layer_network();
    let input = array![0.9, 0.1];
    let target = array![1.0, 0.0];

    let loss = |nn: &mut NeuralNetwork| -> f64 {
        nn.forward(&input).unwrap();
        let out: &Array1<f64> = nn.output().unwrap();
        0.5 * (out - &target).mapv(|e| e * e).sum()
    };

    let before = loss(&mut nn);
    nn.forward(&input).unwrap();
    nn.backward(&input, &target, 0.1).unwrap();
    let after = loss(&mut nn);

    assert!(after < before, "loss went from {} to {}", before, after);
}

// ============================================================================
// Ordering rules
// ============================================================================

#[test]
fn test_backward_before_forward_is_rejected() {
    let mut nn = two_layer_network();
    let err = nn
        .backward(&array![0.9, 0.1], &array![1.0, 0.0], 0.1)
        .unwrap_err();
    assert!(matches!(err, NetworkError::UninitializedState(_)));
}

#[test]
fn test_updates_without_deltas_are_rejected() {
    let mut nn = two_layer_network();
    let input = array![0.9, 0.1];
    nn.forward(&input).unwrap();
    assert!(matches!(
        nn.apply_updates(&input, 0.1),
        Err(NetworkError::UninitializedState("delta"))
    ));
}

#[test]
fn test_deltas_are_consumed_by_updates() {
    let mut nn = two_layer_network();
    let input = array![0.9, 0.1];
    nn.forward(&input).unwrap();
    nn.compute_deltas(&array![1.0, 0.0]).unwrap();
    nn.apply_updates(&input, 0.1).unwrap();

    assert!(nn.apply_updates(&input, 0.1).is_err());
}

#[test]
fn test_forward_discards_pending_deltas() {
    let mut nn = two_layer_network();
    let input = array![0.9, 0.1];
    nn.forward(&input).unwrap();
    nn.compute_deltas(&array![1.0, 0.0]).unwrap();
    nn.forward(&input).unwrap();

    assert!(nn.layers().iter().all(|layer| layer.delta().is_err()));
}

#[test]
fn test_wrong_target_length() {
    let mut nn = two_layer_network();
    let input = array![0.9, 0.1];
    nn.forward(&input).unwrap();
    assert!(matches!(
        nn.backward(&input, &array![1.0], 0.1),
        Err(NetworkError::ShapeMismatch {
            context: "target",
            expected: 2,
            actual: 1
        })
    ));
}
