use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Element-wise nonlinearity φ applied to every non-input layer.
///
/// The output layer additionally goes through softmax after φ; that step
/// lives in `Network::forward()`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    /// Linear layers; used for single-crossing networks and gradient checks.
    Identity,
}

impl Default for ActivationFunction {
    fn default() -> Self {
        ActivationFunction::ReLU
    }
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative φ'(z), evaluated at the pre-activation `z`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn relu_clamps_negatives() {
        let relu = ActivationFunction::ReLU;
        assert_eq!(relu.function(-2.0), 0.0);
        assert_eq!(relu.function(1.5), 1.5);
        assert_eq!(relu.derivative(-2.0), 0.0);
        assert_eq!(relu.derivative(0.0), 0.0);
        assert_eq!(relu.derivative(0.3), 1.0);
    }

    #[test]
    fn sigmoid_derivative_matches_finite_difference() {
        let sigmoid = ActivationFunction::Sigmoid;
        let h = 1e-6;
        for &x in &[-3.0, -0.5, 0.0, 0.7, 4.0] {
            let numeric = (sigmoid.function(x + h) - sigmoid.function(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(sigmoid.derivative(x), numeric, epsilon = 1e-8);
        }
        assert_abs_diff_eq!(sigmoid.function(0.0), 0.5);
    }
}
