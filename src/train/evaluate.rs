use rand::Rng;

use crate::error::{NetworkError, Result};
use crate::math::vector::argmax;
use crate::network::network::Network;

/// Estimates accuracy from `n` samples drawn uniformly with replacement.
///
/// Only the first `min(inputs.len(), labels.len())` pairs are eligible. This
/// is a cheap estimate, not an exhaustive pass; seed `rng` to make it
/// repeatable.
pub fn evaluate<R: Rng + ?Sized>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    n: usize,
    rng: &mut R,
) -> Result<f64> {
    let available = inputs.len().min(labels.len());
    if available == 0 || n == 0 {
        return Err(NetworkError::InvalidData(format!(
            "cannot evaluate {n} samples from a set of {available}"
        )));
    }

    let mut correct = 0usize;
    for _ in 0..n {
        let idx = rng.gen_range(0..available);
        if network.predict(&inputs[idx])? == argmax(&labels[idx]) {
            correct += 1;
        }
    }
    Ok(correct as f64 / n as f64)
}
