use crate::math::vector::argmax;

/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Lower clamp on the probability fed to ln(), so a zero prediction yields a
/// large finite loss instead of +inf.
pub const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// `-ln(predicted[argmax(expected)])` for a one-hot `expected`.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let p = predicted.get(argmax(expected)).copied().unwrap_or(0.0);
        -p.max(EPS).ln()
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the output
    /// layer: `predicted[i] - expected[i]`. This is the output-layer delta
    /// that seeds the backward pass.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}
