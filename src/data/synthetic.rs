use rand::Rng;

use crate::data::dataset::one_hot;
use crate::error::{NetworkError, Result};

/// Generator of toy classification samples: class `k` lights up the `k`-th
/// contiguous block of the input vector on a flat background, with optional
/// uniform pixel noise.
#[derive(Debug, Clone)]
pub struct BlockPatterns {
    pub classes: usize,
    pub input_len: usize,
    /// Intensity of unlit pixels, in [0, 1].
    pub background: f64,
    /// Maximum magnitude of the noise added to each pixel.
    pub noise: f64,
}

impl BlockPatterns {
    pub fn new(classes: usize, input_len: usize) -> BlockPatterns {
        BlockPatterns { classes, input_len, background: 0.0, noise: 0.0 }
    }

    pub fn with_background(mut self, background: f64) -> Self {
        self.background = background;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Width of each class's block.
    pub fn block_len(&self) -> usize {
        self.input_len / self.classes
    }

    /// The noise-free input for `class`.
    pub fn pattern(&self, class: usize) -> Vec<f64> {
        let width = self.block_len();
        (0..self.input_len)
            .map(|i| if i / width == class { 1.0 } else { self.background })
            .collect()
    }

    /// `samples_per_class` samples of every class, interleaved by class, as
    /// `(inputs, one-hot labels)`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        samples_per_class: usize,
        rng: &mut R,
    ) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
        if self.classes == 0 || self.block_len() == 0 {
            return Err(NetworkError::Configuration(format!(
                "cannot fit {} class blocks into {} inputs",
                self.classes, self.input_len
            )));
        }

        let mut inputs = Vec::with_capacity(samples_per_class * self.classes);
        let mut labels = Vec::with_capacity(samples_per_class * self.classes);
        for _ in 0..samples_per_class {
            for class in 0..self.classes {
                let x = self.pattern(class)
                    .into_iter()
                    .map(|p| {
                        let jitter = if self.noise > 0.0 { rng.gen_range(-self.noise..self.noise) } else { 0.0 };
                        (p + jitter).clamp(0.0, 1.0)
                    })
                    .collect();
                inputs.push(x);
                labels.push(one_hot(class, self.classes)?);
            }
        }
        Ok((inputs, labels))
    }
}
