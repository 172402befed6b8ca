use crate::{layers::dense::Layer, network::network::Network};

/// Vanilla gradient descent. The accumulated gradients are the raw sum over
/// the mini-batch; the learning rate alone sets the step size.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update to a layer from its accumulated gradients.
    pub fn step(&self, layer: &mut Layer) {
        layer.apply_gradients(self.learning_rate);
    }

    /// Applies one update to every crossing of `network`.
    pub fn update(&self, network: &mut Network) {
        for layer in network.layers_mut() {
            self.step(layer);
        }
    }
}
