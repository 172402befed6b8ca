use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    activation::activation::ActivationFunction,
    error::{NetworkError, Result},
    math::{matrix::Matrix, vector::hadamard},
};

/// Standard deviation of the Gaussian bias initialization.
const BIAS_STD_DEV: f64 = 0.1;

/// State for one crossing `l >= 1`: parameters, gradient accumulators and the
/// per-sample values of the last forward/backward pass.
#[derive(Debug, Clone)]
pub struct Layer{
    pub size: usize,
    pub input_size: usize,
    pub neurons: Vec<f64>,      // a[l]
    pub pre_neurons: Vec<f64>,  // z[l] = W·a[l-1] + b
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub weights_grad: Matrix,
    pub biases_grad: Vec<f64>,
    pub delta: Vec<f64>,
}

impl Layer {
    /// Weights uniform in ±1/√input_size, biases from N(0, 0.1).
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Result<Layer> {
        let bound = 1.0 / (input_size as f64).sqrt();
        let weights = Matrix::uniform(size, input_size, bound, rng);
        let normal = Normal::new(0.0, BIAS_STD_DEV)
            .map_err(|e| NetworkError::Configuration(e.to_string()))?;
        let biases = (0..size).map(|_| normal.sample(rng)).collect();

        Ok(Layer::from_parameters(weights, biases))
    }

    /// Wraps existing parameters; the caller has checked their dimensions.
    pub fn from_parameters(weights: Matrix, biases: Vec<f64>) -> Layer {
        let (size, input_size) = (weights.rows, weights.cols);
        Layer {
            size,
            input_size,
            neurons: vec![0.0; size],
            pre_neurons: vec![0.0; size],
            weights_grad: Matrix::zeros(size, input_size),
            biases_grad: vec![0.0; size],
            delta: vec![0.0; size],
            weights,
            biases,
        }
    }

    /// Computes and stores `z = W·input + b` and `a = φ(z)`.
    pub fn feed_from(&mut self, input: &[f64], activator: ActivationFunction) {
        self.pre_neurons = self.weights.mul_vec(input)
            .into_iter()
            .zip(&self.biases)
            .map(|(wx, b)| wx + b)
            .collect();
        self.neurons = self.pre_neurons.iter().map(|&z| activator.function(z)).collect();
    }

    /// Sets this layer's delta from the delta of the layer above:
    /// `δ = (W_nextᵀ · δ_next) ⊙ φ'(z)`.
    pub fn set_hidden_delta(&mut self, next: &Layer, activator: ActivationFunction) {
        let back = next.weights.transpose_mul_vec(&next.delta);
        let act_derivative: Vec<f64> = self.pre_neurons.iter()
            .map(|&z| activator.derivative(z))
            .collect();
        self.delta = hadamard(&back, &act_derivative);
    }

    /// Adds this sample's contribution to the gradient accumulators:
    /// `∇W += δ · inputsᵀ`, `∇b += δ`.
    pub fn accumulate_gradients(&mut self, inputs: &[f64]) {
        self.weights_grad.add_outer(&self.delta, inputs);
        for (g, d) in self.biases_grad.iter_mut().zip(&self.delta) {
            *g += d;
        }
    }

    pub fn zero_gradients(&mut self) {
        self.weights_grad.fill(0.0);
        self.biases_grad.iter_mut().for_each(|g| *g = 0.0);
    }

    /// Applies the accumulated gradients scaled by lr.
    pub fn apply_gradients(&mut self, lr: f64) {
        self.weights.scaled_sub_assign(&self.weights_grad, lr);
        for (b, g) in self.biases.iter_mut().zip(&self.biases_grad) {
            *b -= lr * g;
        }
    }
}
