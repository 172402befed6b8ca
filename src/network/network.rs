use rand::Rng;
use tracing::debug;

use crate::{
    activation::{activation::ActivationFunction, softmax::softmax},
    error::{NetworkError, Result},
    layers::dense::Layer,
    loss::cross_entropy::CrossEntropyLoss,
    math::{matrix::Matrix, vector::argmax},
    network::shape::LayerShape,
};

/// Offset subtracted from every input component, mapping [0, 1] onto [-0.5, 0.5].
const INPUT_CENTER: f64 = 0.5;

/// Fully-connected feedforward classifier with a softmax output.
///
/// Layer `l` in the accessors follows the shape's indexing: `0` is the input
/// layer, `shape.len() - 1` the output layer. Crossing `l >= 1` is stored in
/// `layers[l - 1]`.
#[derive(Debug, Clone)]
pub struct Network {
    shape: LayerShape,
    activation: ActivationFunction,
    input: Vec<f64>,  // a[0], the centered input
    layers: Vec<Layer>,
    has_forward_state: bool,
}

impl Network {
    /// Builds a randomly initialized network.
    pub fn new<R: Rng + ?Sized>(
        shape: LayerShape,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<Network> {
        let layers = shape.crossings()
            .map(|(input_size, size)| Layer::new(size, input_size, rng))
            .collect::<Result<Vec<_>>>()?;
        debug!(shape = ?shape.sizes(), ?activation, "Network initialized.");

        Ok(Network::assemble(shape, activation, layers))
    }

    /// Builds a network from explicit parameters, one weight matrix and one
    /// bias vector per crossing. Weight matrix `l` must be
    /// `shape[l] x shape[l - 1]`.
    pub fn from_parameters(
        shape: LayerShape,
        activation: ActivationFunction,
        weights: Vec<Matrix>,
        biases: Vec<Vec<f64>>,
    ) -> Result<Network> {
        let crossings = shape.len() - 1;
        if weights.len() != crossings || biases.len() != crossings {
            return Err(NetworkError::Configuration(format!(
                "shape has {crossings} crossings but got {} weight matrices and {} bias vectors",
                weights.len(),
                biases.len()
            )));
        }

        let mut layers = Vec::with_capacity(crossings);
        for (l, ((w, b), (input_size, size))) in weights.into_iter()
            .zip(biases)
            .zip(shape.crossings())
            .enumerate()
        {
            let l = l + 1;
            if w.cols != input_size {
                return Err(NetworkError::Configuration(format!(
                    "weight matrix {l} has {} columns, layer {} has {input_size} units",
                    w.cols,
                    l - 1
                )));
            }
            if w.rows != size || b.len() != size {
                return Err(NetworkError::Configuration(format!(
                    "crossing {l} expects {size} outputs, got {} weight rows and {} biases",
                    w.rows,
                    b.len()
                )));
            }
            layers.push(Layer::from_parameters(w, b));
        }

        Ok(Network::assemble(shape, activation, layers))
    }

    fn assemble(shape: LayerShape, activation: ActivationFunction, layers: Vec<Layer>) -> Network {
        Network {
            input: vec![0.0; shape.input_size()],
            shape,
            activation,
            layers,
            has_forward_state: false,
        }
    }

    /// Forward pass. Centers `x`, feeds it through every crossing and applies
    /// softmax to the output layer. Overwrites all stored activations and
    /// returns the output distribution.
    pub fn forward(&mut self, x: &[f64]) -> Result<&[f64]> {
        if x.len() != self.shape.input_size() {
            return Err(NetworkError::mismatch("forward input", self.shape.input_size(), x.len()));
        }

        self.input = x.iter().map(|v| v - INPUT_CENTER).collect();
        let mut prev: &[f64] = &self.input;
        for layer in self.layers.iter_mut() {
            layer.feed_from(prev, self.activation);
            prev = &layer.neurons;
        }

        let out = self.output_layer_mut();
        out.neurons = softmax(&out.neurons);
        self.has_forward_state = true;

        Ok(self.output())
    }

    /// Cross-entropy of a prediction against a one-hot label.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        CrossEntropyLoss::loss(predicted, expected)
    }

    /// Backpropagates the error of the sample last passed to `forward()` and
    /// adds its weight and bias gradients to the accumulators. Parameters are
    /// left untouched.
    ///
    /// The input is not passed again: the centered sample stored by
    /// `forward()` (`activations(0)`) is used for the first crossing.
    pub fn backward(&mut self, y: &[f64]) -> Result<()> {
        if y.len() != self.shape.output_size() {
            return Err(NetworkError::mismatch("backward label", self.shape.output_size(), y.len()));
        }
        if !self.has_forward_state {
            return Err(NetworkError::NoForwardPass);
        }

        let out = self.output_layer_mut();
        out.delta = CrossEntropyLoss::derivative(&out.neurons, y);

        for i in (0..self.layers.len() - 1).rev() {
            let (lower, upper) = self.layers.split_at_mut(i + 1);
            lower[i].set_hidden_delta(&upper[0], self.activation);
        }

        self.layers[0].accumulate_gradients(&self.input);
        for i in 1..self.layers.len() {
            let (lower, upper) = self.layers.split_at_mut(i);
            upper[0].accumulate_gradients(&lower[i - 1].neurons);
        }

        Ok(())
    }

    /// Index of the most probable class for `x`.
    pub fn predict(&mut self, x: &[f64]) -> Result<usize> {
        Ok(argmax(self.forward(x)?))
    }

    /// Probability assigned to `class` by the most recent forward pass, or
    /// `None` if there has been none or `class` is out of range.
    pub fn predict_confidence(&self, class: usize) -> Option<f64> {
        if !self.has_forward_state {
            return None;
        }
        self.output().get(class).copied()
    }

    /// Resets every weight and bias gradient accumulator to zero.
    pub fn zero_gradients(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.zero_gradients();
        }
    }

    pub fn shape(&self) -> &LayerShape {
        &self.shape
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Output distribution of the last forward pass.
    pub fn output(&self) -> &[f64] {
        &self.output_layer().neurons
    }

    /// `a[l]`; `activations(0)` is the centered input.
    ///
    /// # Panics
    /// Panics if `l >= shape.len()`.
    pub fn activations(&self, l: usize) -> &[f64] {
        if l == 0 { &self.input } else { &self.crossing(l).neurons }
    }

    /// `z[l]` for `l >= 1`.
    pub fn preactivations(&self, l: usize) -> &[f64] {
        &self.crossing(l).pre_neurons
    }

    pub fn weights(&self, l: usize) -> &Matrix {
        &self.crossing(l).weights
    }

    pub fn weights_mut(&mut self, l: usize) -> &mut Matrix {
        &mut self.crossing_mut(l).weights
    }

    pub fn biases(&self, l: usize) -> &[f64] {
        &self.crossing(l).biases
    }

    pub fn biases_mut(&mut self, l: usize) -> &mut [f64] {
        &mut self.crossing_mut(l).biases
    }

    pub fn weight_gradient(&self, l: usize) -> &Matrix {
        &self.crossing(l).weights_grad
    }

    pub fn bias_gradient(&self, l: usize) -> &[f64] {
        &self.crossing(l).biases_grad
    }

    pub fn delta(&self, l: usize) -> &[f64] {
        &self.crossing(l).delta
    }

    fn crossing(&self, l: usize) -> &Layer {
        assert!(l >= 1 && l < self.shape.len(), "layer {l} has no crossing");
        &self.layers[l - 1]
    }

    fn crossing_mut(&mut self, l: usize) -> &mut Layer {
        assert!(l >= 1 && l < self.shape.len(), "layer {l} has no crossing");
        &mut self.layers[l - 1]
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    fn output_layer_mut(&mut self) -> &mut Layer {
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }
}
