//! Half squared error and class selection helpers.

use ndarray::Array1;

/// 0.5 * ||output - target||^2
pub fn half_squared_error(output: &Array1<f64>, target: &Array1<f64>) -> f64 {
    0.5 * (output - target).mapv(|d| d * d).sum()
}

/// Gradient of `half_squared_error` with respect to `output`.
pub fn half_squared_error_derivative(output: &Array1<f64>, target: &Array1<f64>) -> Array1<f64> {
    output - target
}

/// Index of the largest element; the lowest index wins ties.
///
/// NaN entries are skipped. Returns 0 for an empty vector or one that holds
/// only NaN.
pub fn argmax(values: &Array1<f64>) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best.map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_half_squared_error() {
        let loss = half_squared_error(&array![1.0, 0.0], &array![0.0, 0.0]);
        assert_eq!(loss, 0.5);
        assert_eq!(half_squared_error(&array![0.3, 0.7], &array![0.3, 0.7]), 0.0);
    }

    #[test]
    fn test_derivative_is_difference() {
        let grad = half_squared_error_derivative(&array![0.75, 0.25], &array![1.0, 0.0]);
        assert_eq!(grad, array![-0.25, 0.25]);
    }

    #[test]
    fn test_argmax_ties_pick_lowest_index() {
        assert_eq!(argmax(&array![0.2, 0.9, 0.9, 0.1]), 1);
        assert_eq!(argmax(&array![0.5, 0.5]), 0);
        assert_eq!(argmax(&array![0.0, 0.0, 1.0]), 2);
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&array![f64::NAN, 0.2, 0.7]), 2);
        assert_eq!(argmax(&array![0.4, f64::NAN, 0.1]), 0);
        assert_eq!(argmax(&array![f64::NAN, f64::NAN]), 0);
        assert_eq!(argmax(&Array1::<f64>::zeros(0)), 0);
    }
}
