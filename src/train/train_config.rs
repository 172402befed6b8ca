use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::network::shape::LayerShape;

/// Configuration for a training run.
///
/// # Fields
/// - `shape`                     — layer sizes, input first
/// - `activation`                — nonlinearity used by every non-input layer
/// - `batch_size`                — samples per mini-batch
/// - `learning_rate`             — step size applied to the summed batch gradient
/// - `epochs`                    — number of passes over the training data
/// - `eval_samples`              — random samples drawn per accuracy estimate
/// - `stats_interval_secs`       — minimum wall-clock gap between statistics reports
/// - `predictions_interval_secs` — minimum wall-clock gap between prediction reports
/// - `seed`                      — fixes initialization, permutations and evaluation
///                                 draws; `None` seeds from the OS
///
/// Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub shape: LayerShape,
    pub activation: ActivationFunction,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub eval_samples: usize,
    pub stats_interval_secs: f64,
    pub predictions_interval_secs: f64,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            shape: LayerShape::default(),
            activation: ActivationFunction::ReLU,
            batch_size: 256,
            learning_rate: 0.0001,
            epochs: 30,
            eval_samples: 1000,
            stats_interval_secs: 10.0,
            predictions_interval_secs: 20.0,
            seed: None,
        }
    }
}

impl TrainConfig {
    /// Rejects settings that would make training meaningless or panic.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetworkError::Configuration("batch_size must be at least 1".into()));
        }
        if !self.learning_rate.is_finite() {
            return Err(NetworkError::Configuration("learning_rate must be finite".into()));
        }
        if self.eval_samples == 0 {
            return Err(NetworkError::Configuration("eval_samples must be at least 1".into()));
        }
        self.stats_interval()?;
        self.predictions_interval()?;
        Ok(())
    }

    pub fn stats_interval(&self) -> Result<Duration> {
        interval("stats_interval_secs", self.stats_interval_secs)
    }

    pub fn predictions_interval(&self) -> Result<Duration> {
        interval("predictions_interval_secs", self.predictions_interval_secs)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a config from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

fn interval(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| NetworkError::Configuration(format!("{name}: {e}")))
}
