use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Unit counts per layer, input first, output last.
///
/// A shape of length `L` has `L - 1` crossings; crossing `l` (for `l >= 1`)
/// connects `shape[l - 1]` inputs to `shape[l]` outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct LayerShape(Vec<usize>);

impl LayerShape {
    pub fn new(sizes: Vec<usize>) -> Result<LayerShape> {
        if sizes.len() < 2 {
            return Err(NetworkError::Configuration(format!(
                "layer shape needs an input and an output layer, got {} layer(s)",
                sizes.len()
            )));
        }
        if let Some(l) = sizes.iter().position(|&s| s == 0) {
            return Err(NetworkError::Configuration(format!("layer {l} has zero units")));
        }
        Ok(LayerShape(sizes))
    }

    /// Number of layers, `L`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a valid shape has at least two layers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }

    pub fn output_size(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    /// `(input_size, output_size)` for every crossing, in order.
    pub fn crossings(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}

impl Default for LayerShape {
    fn default() -> Self {
        LayerShape(vec![784, 20, 20, 10])
    }
}

impl TryFrom<Vec<usize>> for LayerShape {
    type Error = NetworkError;

    fn try_from(sizes: Vec<usize>) -> Result<Self> {
        LayerShape::new(sizes)
    }
}

impl From<LayerShape> for Vec<usize> {
    fn from(shape: LayerShape) -> Self {
        shape.0
    }
}

impl std::ops::Index<usize> for LayerShape {
    type Output = usize;

    fn index(&self, l: usize) -> &usize {
        &self.0[l]
    }
}
